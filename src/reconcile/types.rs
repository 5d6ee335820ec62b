//! Data model for scoreboard reconciliation.
//!
//! Everything here is transient: one screenshot's worth of state, built up
//! and discarded within a single reconciliation run.

/// Axis-aligned bounding box in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    /// Vertical center of the box; the row grouper keys on this.
    pub fn center_y(&self) -> i64 {
        self.top as i64 + self.height as i64 / 2
    }
}

/// One raw OCR reading: bounding box + text + confidence.
#[derive(Debug, Clone)]
pub struct Detection {
    pub bounds: BoundingBox,
    pub text: String,
    pub confidence: f32,
}

impl Detection {
    pub fn new(bounds: BoundingBox, text: impl Into<String>, confidence: f32) -> Self {
        Self {
            bounds,
            text: text.into(),
            confidence,
        }
    }
}

/// A horizontal band of cell texts believed to belong to one table row,
/// ordered left to right.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    pub cells: Vec<String>,
}

impl Row {
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    /// All cell text joined with spaces and lower-cased, for marker searches.
    pub fn joined_lower(&self) -> String {
        self.cells.join(" ").to_lowercase()
    }
}

/// Mapping from lower-cased column label to its cell index in the header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    indexes: std::collections::HashMap<String, usize>,
}

impl ColumnMap {
    pub fn insert(&mut self, label: &str, index: usize) {
        self.indexes.insert(label.to_lowercase(), index);
    }

    pub fn get(&self, label: &str) -> Option<usize> {
        self.indexes.get(&label.to_lowercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }
}

/// The raw readings gathered for one logical field of one row. Multiple OCR
/// passes over the same cell each contribute one reading.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    values: Vec<String>,
}

impl CandidateSet {
    pub fn single(value: impl Into<String>) -> Self {
        Self {
            values: vec![value.into()],
        }
    }

    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn absorb(&mut self, other: &CandidateSet) {
        self.values.extend(other.values.iter().cloned());
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}

/// One player row before consensus: a candidate set per logical field.
#[derive(Debug, Clone)]
pub struct CandidateRow {
    pub team: Option<String>,
    pub name: CandidateSet,
    pub stats: Vec<CandidateSet>,
    pub score: CandidateSet,
    pub is_mvp: bool,
}

impl CandidateRow {
    /// Folds another pass's reading of the same physical row into this one.
    pub fn absorb(&mut self, other: &CandidateRow) {
        self.name.absorb(&other.name);
        for (mine, theirs) in self.stats.iter_mut().zip(&other.stats) {
            mine.absorb(theirs);
        }
        self.score.absorb(&other.score);
        self.is_mvp |= other.is_mvp;
    }
}

/// Advisory cross-check between the weighted stat sum and the OCR'd score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Checksum {
    /// A stat or the score was non-numeric; the check was skipped.
    #[default]
    Undetermined,
    Match {
        expected: u32,
    },
    Mismatch {
        expected: u32,
        actual: u32,
    },
}

/// One resolved player row. Stats are string-encoded non-negative integers
/// or empty, aligned with the configured stat field order.
#[derive(Debug, Clone)]
pub struct PlayerRow {
    pub team: Option<String>,
    pub name: String,
    pub stats: Vec<String>,
    pub score: String,
    pub is_mvp: bool,
    pub checksum: Checksum,
}

/// The two extraction strategies: full-table header-mapped parsing, or
/// independent per-row positional parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Primary,
    Fallback,
}
