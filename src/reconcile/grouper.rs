//! Groups scattered OCR detections into table rows by vertical proximity.

use super::types::{Detection, Row};

/// Clusters detections into rows. Each detection joins the first bucket whose
/// representative vertical center lies within `y_tolerance` pixels; otherwise
/// it opens a new bucket keyed by its own center. Membership is first-match,
/// not nearest-center.
///
/// Buckets are emitted top-to-bottom; cells within a row left-to-right.
pub fn group_by_row(detections: &[Detection], y_tolerance: i64) -> Vec<Row> {
    let mut buckets: Vec<(i64, Vec<(u32, String)>)> = Vec::new();

    for det in detections {
        let y = det.bounds.center_y();
        match buckets
            .iter_mut()
            .find(|(key, _)| (y - *key).abs() <= y_tolerance)
        {
            Some((_, members)) => members.push((det.bounds.left, det.text.clone())),
            None => buckets.push((y, vec![(det.bounds.left, det.text.clone())])),
        }
    }

    buckets.sort_by_key(|(key, _)| *key);

    buckets
        .into_iter()
        .map(|(_, mut members)| {
            members.sort_by_key(|(left, _)| *left);
            Row::new(members.into_iter().map(|(_, text)| text).collect())
        })
        .collect()
}
