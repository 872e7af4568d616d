/// Configuration constants and runtime settings for ocr-translate
use std::path::PathBuf;

use serde::Serialize;

use crate::preprocess::PrepareOptions;

/// OCR Constants
pub mod ocr {
    pub const DEFAULT_LANGUAGE: &str = "eng";
    pub const TESSERACT_PROGRAM: &str = "tesseract";
    /// Where the Windows installer puts tesseract
    pub const WINDOWS_TESSERACT_PATH: &str = r"C:\Program Files\Tesseract-OCR\tesseract.exe";
}

/// Preprocessing Constants
pub mod preprocess {
    pub const MIN_DIMENSION: u32 = 300;
    pub const UPSCALE_FACTOR: u32 = 2;
    pub const INVERT_THRESHOLD: f64 = 127.0; // Midpoint of 0..=255
}

/// Translation Constants
pub mod translate {
    pub const ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";
    pub const DEFAULT_SOURCE: &str = "auto";
    pub const DEFAULT_TARGET: &str = "vi";
    pub const MAX_CHUNK_CHARS: usize = 5000; // Google rejects longer payloads
    pub const TIMEOUT_SECS: u64 = 30;
}

/// File Picker Constants
pub mod picker {
    pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tif", "tiff", "gif", "webp"];
    pub const MAX_VISIBLE_MATCHES: usize = 20;
}

/// UI Layout Constants
pub mod layout {
    pub const IMAGE_PANE_PERCENT: u16 = 45;
    pub const MIN_IMAGE_PANE_WIDTH: u16 = 20;
    pub const TAB_BAR_HEIGHT: u16 = 2;
    pub const STATUS_BAR_HEIGHT: u16 = 1;
    pub const FRAME_TIME_MS: u64 = 50;
}

/// Color Theme (RGB values)
pub mod colors {
    pub const ACCENT_BG: (u8, u8, u8) = (76, 175, 80); // Green
    pub const ACCENT_FG: (u8, u8, u8) = (255, 255, 255); // White
    pub const INACTIVE_TAB_FG: (u8, u8, u8) = (150, 152, 150); // Secondary text
    pub const STATUS_FG: (u8, u8, u8) = (96, 99, 102); // Dim text
    pub const DIVIDER_FG: (u8, u8, u8) = (60, 60, 60); // Dark gray
}

/// Environment variable names
pub mod env {
    pub const TESSERACT: &str = "OCR_TRANSLATE_TESSERACT";
    pub const LANG: &str = "OCR_TRANSLATE_LANG";
    pub const TARGET: &str = "OCR_TRANSLATE_TARGET";
    pub const LOG: &str = "OCR_TRANSLATE_LOG";
    pub const LOG_FILE: &str = "OCR_TRANSLATE_LOG_FILE";
}

/// Which recognizer backs the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    Tesseract,
    Ocrs,
}

/// Everything the pipeline and viewer need at runtime
#[derive(Debug, Clone, Serialize)]
pub struct Settings {
    pub engine: EngineKind,
    /// Explicit tesseract binary; `None` means auto-detect
    pub tesseract_path: Option<PathBuf>,
    pub ocr_language: String,
    pub source_language: String,
    pub target_language: String,
    pub translate: bool,
    pub auto_invert: bool,
    pub timeout_secs: u64,
    pub picker_root: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            engine: EngineKind::Tesseract,
            tesseract_path: None,
            ocr_language: ocr::DEFAULT_LANGUAGE.to_string(),
            source_language: translate::DEFAULT_SOURCE.to_string(),
            target_language: translate::DEFAULT_TARGET.to_string(),
            translate: true,
            auto_invert: true,
            timeout_secs: translate::TIMEOUT_SECS,
            picker_root: None,
        }
    }
}

impl Settings {
    pub fn prepare_options(&self) -> PrepareOptions {
        PrepareOptions {
            auto_invert: self.auto_invert,
            ..PrepareOptions::default()
        }
    }

    /// Directory the file picker searches: configured root, then
    /// Pictures, then home, then the working directory.
    pub fn picker_root(&self) -> PathBuf {
        self.picker_root
            .clone()
            .or_else(dirs::picture_dir)
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Helper function to format RGB color for terminal escape code
pub fn rgb_bg(r: u8, g: u8, b: u8) -> String {
    format!("\x1b[48;2;{};{};{}m", r, g, b)
}

/// Helper function to format RGB foreground color for terminal escape code
pub fn rgb_fg(r: u8, g: u8, b: u8) -> String {
    format!("\x1b[38;2;{};{};{}m", r, g, b)
}
