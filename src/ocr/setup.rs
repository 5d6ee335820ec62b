use anyhow::{anyhow, Result};
use std::path::PathBuf;

/// Finds the Tesseract executable: `TESSERACT_EXE` override first, then an
/// exe-adjacent `tesseract/` directory, then the system PATH.
pub fn find_tesseract_executable() -> Result<PathBuf> {
    if let Ok(exe) = std::env::var("TESSERACT_EXE") {
        let path = PathBuf::from(exe);
        if path.exists() {
            return Ok(path);
        }
    }

    let bundled = crate::paths::get_exe_dir().join("tesseract");
    for name in ["tesseract", "tesseract.exe"] {
        let candidate = bundled.join(name);
        if candidate.exists() {
            return Ok(candidate);
        }
    }

    // Probe PATH.
    if let Ok(output) = std::process::Command::new("tesseract")
        .arg("--version")
        .output()
    {
        if output.status.success() {
            return Ok(PathBuf::from("tesseract"));
        }
    }

    Err(anyhow!(
        "Tesseract not found. Install Tesseract-OCR, add it to PATH, or set TESSERACT_EXE."
    ))
}
