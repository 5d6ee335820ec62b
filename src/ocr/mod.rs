pub mod engine;
pub mod preprocess;
pub mod setup;

pub use engine::{recognize_detections, recognize_row_line};
pub use preprocess::threshold_bright_pixels;

use anyhow::Result;
use image::{ImageBuffer, Rgba};

use crate::config::ScoreboardConfig;
use crate::reconcile::types::Detection;
use crate::reconcile::RowSource;

/// Full-table OCR: one pass per configured binarization threshold, each
/// returning the raw word detections for the whole screenshot.
pub fn scan_table(
    img: &ImageBuffer<Rgba<u8>, Vec<u8>>,
    cfg: &ScoreboardConfig,
) -> Result<Vec<Vec<Detection>>> {
    let mut passes = Vec::with_capacity(cfg.ocr_thresholds.len());

    for &threshold in &cfg.ocr_thresholds {
        let binary = preprocess::threshold_bright_pixels(img, threshold);
        let detections = engine::recognize_detections(&binary)?;

        let avg_conf = if detections.is_empty() {
            0.0
        } else {
            detections.iter().map(|d| d.confidence).sum::<f32>() / detections.len() as f32
        };
        crate::log(&format!(
            "OCR pass at threshold {}: {} detections (avg conf {:.0}%)",
            threshold,
            detections.len(),
            avg_conf
        ));

        passes.push(detections);
    }

    Ok(passes)
}

/// Row-crop OCR collaborator backing the FALLBACK strategy: OCRs each
/// configured row rectangle in isolation, one best-guess line per region.
pub struct CroppedRows<'a> {
    pub image: &'a ImageBuffer<Rgba<u8>, Vec<u8>>,
    pub config: &'a ScoreboardConfig,
}

impl RowSource for CroppedRows<'_> {
    fn read_rows(&mut self) -> Result<Vec<String>> {
        if self.config.row_regions.is_empty() {
            crate::log("[WARN] No row regions configured; fallback has nothing to crop");
            return Ok(Vec::new());
        }

        let threshold = self.config.ocr_thresholds.first().copied().unwrap_or(190);

        let mut lines = Vec::with_capacity(self.config.row_regions.len());
        for rect in &self.config.row_regions {
            let cropped = preprocess::crop_rect(self.image, rect);
            let binary = preprocess::threshold_bright_pixels(&cropped, threshold);
            let line = engine::recognize_row_line(&binary)?;
            crate::log(&format!("Row crop at y={}: '{}'", rect.y, line));
            lines.push(line);
        }
        Ok(lines)
    }
}
