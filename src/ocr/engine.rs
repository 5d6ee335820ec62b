use anyhow::{anyhow, Result};
use image::{ImageBuffer, Luma};
use std::process::Command;
use tempfile::NamedTempFile;

use super::setup::find_tesseract_executable;
use crate::reconcile::types::{BoundingBox, Detection};

/// Runs Tesseract on a preprocessed full-table image and returns one
/// Detection per recognized word, with pixel bounds and confidence.
pub fn recognize_detections(img: &ImageBuffer<Luma<u8>, Vec<u8>>) -> Result<Vec<Detection>> {
    let tesseract_exe = find_tesseract_executable()?;

    let temp_input = NamedTempFile::with_suffix(".png")?;
    img.save(temp_input.path())?;

    // Tesseract appends .tsv to the output base name.
    let temp_output = NamedTempFile::new()?;
    let output_base = temp_output.path().to_string_lossy().to_string();

    let output = Command::new(&tesseract_exe)
        .arg(temp_input.path())
        .arg(&output_base)
        .arg("-l")
        .arg("eng")
        .arg("--psm")
        .arg("6") // Assume single uniform block of text
        .arg("tsv")
        .output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!("Tesseract failed: {}", stderr));
    }

    let tsv_path = format!("{}.tsv", output_base);
    let tsv_content = std::fs::read_to_string(&tsv_path)
        .map_err(|e| anyhow!("Failed to read Tesseract output: {}", e))?;
    let _ = std::fs::remove_file(&tsv_path);

    parse_tsv_output(&tsv_content)
}

/// Parses Tesseract TSV output into Detections, one per word entry.
fn parse_tsv_output(tsv: &str) -> Result<Vec<Detection>> {
    let mut detections = Vec::new();

    for line in tsv.lines().skip(1) {
        // TSV fields: level, page_num, block_num, par_num, line_num, word_num,
        //             left, top, width, height, conf, text
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 12 {
            continue;
        }

        let level: i32 = fields[0].parse().unwrap_or(-1);
        if level != 5 {
            // Only level 5 entries are words; the rest are layout structure.
            continue;
        }

        let conf: f32 = fields[10].parse().unwrap_or(-1.0);
        let text = fields[11].trim();
        if conf < 0.0 || text.is_empty() {
            continue;
        }

        let left: u32 = fields[6].parse().unwrap_or(0);
        let top: u32 = fields[7].parse().unwrap_or(0);
        let width: u32 = fields[8].parse().unwrap_or(0);
        let height: u32 = fields[9].parse().unwrap_or(0);

        detections.push(Detection::new(
            BoundingBox {
                left,
                top,
                width,
                height,
            },
            text,
            conf,
        ));
    }

    Ok(detections)
}

/// Single-line OCR for one cropped row region: returns the best-guess text
/// line, empty when Tesseract saw nothing.
pub fn recognize_row_line(img: &ImageBuffer<Luma<u8>, Vec<u8>>) -> Result<String> {
    let tesseract_exe = find_tesseract_executable()?;

    let temp_input = NamedTempFile::with_suffix(".png")?;
    img.save(temp_input.path())?;

    let output = Command::new(&tesseract_exe)
        .arg(temp_input.path())
        .arg("stdout")
        .arg("-l")
        .arg("eng")
        .arg("--psm")
        .arg("7") // Treat the image as a single text line
        .output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!("Tesseract failed: {}", stderr));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
