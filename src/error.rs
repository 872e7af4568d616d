//! Failures the pipeline reports to the user.
//!
//! Each variant maps to its own message so the viewer can show what went
//! wrong without ending the session.

use std::path::PathBuf;

use serde::{Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("cannot open image {}: {message}", .path.display())]
    ImageOpen { path: PathBuf, message: String },

    #[error("OCR failed: {0:#}")]
    Recognition(anyhow::Error),

    #[error("no text detected in the image")]
    EmptyRecognition,

    #[error("translation failed: {0:#}")]
    Translation(anyhow::Error),
}

impl PipelineError {
    /// Short machine-readable name of the failure class
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ImageOpen { .. } => "image_open",
            Self::Recognition(_) => "recognition",
            Self::EmptyRecognition => "empty_recognition",
            Self::Translation(_) => "translation",
        }
    }

    /// Message shown in the viewer, with a hint where one helps.
    pub fn user_message(&self) -> String {
        match self {
            Self::ImageOpen { .. } => format!("Error opening image: {}", self),
            Self::Recognition(_) => format!(
                "Error during OCR: {}\n\nPlease check:\n1. Tesseract OCR is installed\n2. The tesseract path is correct (--tesseract or ${})",
                self,
                crate::config::env::TESSERACT
            ),
            Self::EmptyRecognition => "No text detected in the image.".to_string(),
            Self::Translation(_) => format!(
                "Error during translation: {}\n\nThe internet connection may be down or the translation service unavailable.",
                self
            ),
        }
    }
}

impl Serialize for PipelineError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("PipelineError", 2)?;
        state.serialize_field("kind", self.kind())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_messages_are_distinct() {
        let errors = [
            PipelineError::ImageOpen { path: PathBuf::from("a.png"), message: "bad".into() },
            PipelineError::Recognition(anyhow!("exit 1")),
            PipelineError::EmptyRecognition,
            PipelineError::Translation(anyhow!("timeout")),
        ];
        let messages: Vec<String> = errors.iter().map(|e| e.user_message()).collect();
        for (i, a) in messages.iter().enumerate() {
            for b in &messages[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(messages[0].contains("a.png"));
        assert!(messages[1].contains("Tesseract OCR is installed"));
        assert!(messages[3].contains("timeout"));
    }

    #[test]
    fn test_serializes_kind_and_message() {
        let json = serde_json::to_value(PipelineError::EmptyRecognition).unwrap();
        assert_eq!(json["kind"], "empty_recognition");
        assert_eq!(json["message"], "no text detected in the image");
    }
}
