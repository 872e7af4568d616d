// OCR collaborators for ocr-translate
use anyhow::Result;
use image::DynamicImage;
use std::sync::Arc;

pub mod tesseract;
#[cfg(feature = "ocrs")]
pub mod engine;
#[cfg(feature = "ocrs")]
pub mod models;

pub use tesseract::TesseractEngine;
#[cfg(feature = "ocrs")]
pub use engine::OcrsEngine;

use crate::config::{EngineKind, Settings};

/// Anything that turns a prepared image into raw text.
pub trait Recognizer {
    fn recognize(&self, image: &DynamicImage, language: &str) -> Result<String>;
}

/// The recognizer chosen at startup
pub enum Engine {
    Tesseract(TesseractEngine),
    #[cfg(feature = "ocrs")]
    Ocrs(OcrsEngine),
}

impl Engine {
    pub async fn from_settings(settings: &Settings) -> Result<Self> {
        match settings.engine {
            EngineKind::Tesseract => Ok(Engine::Tesseract(TesseractEngine::from_settings(settings))),
            #[cfg(feature = "ocrs")]
            EngineKind::Ocrs => Ok(Engine::Ocrs(OcrsEngine::load().await?)),
            #[cfg(not(feature = "ocrs"))]
            EngineKind::Ocrs => anyhow::bail!("ocrs engine not available - compile with --features ocrs"),
        }
    }
}

impl Recognizer for Engine {
    fn recognize(&self, image: &DynamicImage, language: &str) -> Result<String> {
        match self {
            Engine::Tesseract(engine) => engine.recognize(image, language),
            #[cfg(feature = "ocrs")]
            Engine::Ocrs(engine) => engine.recognize(image, language),
        }
    }
}

impl<R: Recognizer + ?Sized> Recognizer for &R {
    fn recognize(&self, image: &DynamicImage, language: &str) -> Result<String> {
        (**self).recognize(image, language)
    }
}

impl<R: Recognizer + ?Sized> Recognizer for Arc<R> {
    fn recognize(&self, image: &DynamicImage, language: &str) -> Result<String> {
        (**self).recognize(image, language)
    }
}
