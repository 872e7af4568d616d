//! Tesseract OCR engine.
//!
//! Wraps the external `tesseract` binary. The prepared image is written to a
//! temporary PNG and the recognized text is read back from stdout.

use anyhow::{anyhow, Context, Result};
use image::{DynamicImage, ImageFormat};
use std::path::{Path, PathBuf};
use std::process::Command;

use super::Recognizer;
use crate::config::{self, Settings};

pub struct TesseractEngine {
    program: PathBuf,
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new(resolve_program(None))
    }
}

impl TesseractEngine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        TesseractEngine { program: program.into() }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(resolve_program(settings.tesseract_path.as_deref()))
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Languages installed for this tesseract (`--list-langs`).
    pub fn list_languages(&self) -> Result<Vec<String>> {
        let output = Command::new(&self.program)
            .arg("--list-langs")
            .output()
            .with_context(|| format!("failed to run {} --list-langs", self.program.display()))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("tesseract --list-langs failed: {}", stderr.trim()));
        }
        Ok(parse_language_list(&String::from_utf8_lossy(&output.stdout)))
    }
}

impl Recognizer for TesseractEngine {
    fn recognize(&self, image: &DynamicImage, language: &str) -> Result<String> {
        // Write our input to a temporary file.
        let input = tempfile::Builder::new()
            .prefix("ocr-translate")
            .suffix(".png")
            .tempfile()
            .context("cannot create tesseract input file")?;
        image
            .save_with_format(input.path(), ImageFormat::Png)
            .context("cannot write tesseract input file")?;

        crate::log_debug!(
            "Running {} on {}x{} image (lang={})",
            self.program.display(), image.width(), image.height(), language
        );

        let output = Command::new(&self.program)
            .arg(input.path())
            .arg("stdout")
            .arg("-l")
            .arg(language)
            .output()
            .with_context(|| {
                format!(
                    "failed to start {} (is tesseract-ocr installed and on PATH?)",
                    self.program.display()
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("tesseract exited with {}: {}", output.status, stderr.trim()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// Pick the tesseract binary: explicit path, then the Windows install
/// location, then whatever `tesseract` is on PATH.
pub fn resolve_program(configured: Option<&Path>) -> PathBuf {
    if let Some(path) = configured {
        if !path.exists() {
            crate::log_warn!("Configured tesseract {} does not exist, trying anyway", path.display());
        }
        return path.to_path_buf();
    }

    let windows_default = Path::new(config::ocr::WINDOWS_TESSERACT_PATH);
    if windows_default.exists() {
        return windows_default.to_path_buf();
    }

    PathBuf::from(config::ocr::TESSERACT_PROGRAM)
}

/// First line of `--list-langs` is a header ("List of available languages ...").
fn parse_language_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .skip(1)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, GrayImage};

    #[test]
    fn test_parse_language_list() {
        let stdout = "List of available languages in \"/usr/share/tessdata/\" (3):\neng\nosd\nvie\n\n";
        assert_eq!(parse_language_list(stdout), vec!["eng", "osd", "vie"]);
        assert!(parse_language_list("").is_empty());
    }

    #[test]
    fn test_explicit_program_wins() {
        let program = resolve_program(Some(Path::new("/opt/tess/bin/tesseract")));
        assert_eq!(program, PathBuf::from("/opt/tess/bin/tesseract"));
    }

    #[test]
    fn test_missing_binary_is_an_error() {
        let engine = TesseractEngine::new("/nonexistent/ocr-translate-tesseract");
        let image = DynamicImage::ImageLuma8(GrayImage::from_pixel(4, 4, Luma([255])));
        let err = engine.recognize(&image, "eng").unwrap_err();
        assert!(format!("{:#}", err).contains("tesseract-ocr installed"));
    }
}
