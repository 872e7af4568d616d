//! Image → OCR → reconstruct → translate → reconstruct.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::anyhow;
use image::DynamicImage;
use serde::Serialize;
use tokio::task::JoinHandle;

use crate::config::Settings;
use crate::error::PipelineError;
use crate::ocr::Recognizer;
use crate::preprocess::prepare;
use crate::reconstruct::reconstruct;
use crate::translate::Translator;

/// Result of one end-to-end run.
#[derive(Debug, Serialize)]
pub struct PipelineOutput {
    pub source: PathBuf,
    /// Reconstructed OCR text, never empty
    pub original: String,
    /// `None` when translation is switched off
    #[serde(serialize_with = "serialize_translation")]
    pub translation: Option<Result<String, PipelineError>>,
}

fn serialize_translation<S: serde::Serializer>(
    translation: &Option<Result<String, PipelineError>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    #[derive(Serialize)]
    #[serde(rename_all = "lowercase")]
    enum Outcome<'a> {
        Text(&'a str),
        Error(&'a PipelineError),
    }

    match translation {
        None => serializer.serialize_none(),
        Some(Ok(text)) => serializer.serialize_some(&Outcome::Text(text)),
        Some(Err(err)) => serializer.serialize_some(&Outcome::Error(err)),
    }
}

pub struct Pipeline<R, T> {
    recognizer: R,
    translator: T,
    settings: Settings,
}

impl<R: Recognizer, T: Translator> Pipeline<R, T> {
    pub fn new(recognizer: R, translator: T, settings: Settings) -> Self {
        Self { recognizer, translator, settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn open_image(&self, path: &Path) -> Result<DynamicImage, PipelineError> {
        image::open(path).map_err(|err| {
            crate::log_error!("Failed to open {}: {}", path.display(), err);
            PipelineError::ImageOpen {
                path: path.to_path_buf(),
                message: err.to_string(),
            }
        })
    }

    /// Prepare the image, run OCR and reformat the result.
    pub fn extract_text(&self, image: &DynamicImage) -> Result<String, PipelineError> {
        extract_with(&self.recognizer, image, &self.settings)
    }

    /// Translate into the configured target language and reformat.
    pub async fn translate_text(&self, text: &str) -> Result<String, PipelineError> {
        let raw = self
            .translator
            .translate(text, &self.settings.target_language)
            .await
            .map_err(|err| {
                crate::log_error!("Translation failed: {:#}", err);
                PipelineError::Translation(err)
            })?;
        Ok(reconstruct(&raw))
    }

    /// Full run. OCR failures abort; a translation failure is kept in the
    /// output next to the OCR text.
    pub async fn run(&self, path: &Path) -> Result<PipelineOutput, PipelineError> {
        crate::log_debug!("Processing {}", path.display());
        let image = self.open_image(path)?;
        let original = self.extract_text(&image)?;

        let translation = if self.settings.translate {
            Some(self.translate_text(&original).await)
        } else {
            None
        };

        Ok(PipelineOutput {
            source: path.to_path_buf(),
            original,
            translation,
        })
    }
}

impl<R, T> Pipeline<R, T>
where
    R: Recognizer + Clone + Send + 'static,
    T: Translator,
{
    /// Run [`Pipeline::extract_text`] on the blocking thread pool so the
    /// caller's task stays free while the OCR engine works.
    pub fn spawn_extract(&self, image: DynamicImage) -> JoinHandle<Result<String, PipelineError>> {
        let recognizer = self.recognizer.clone();
        let settings = self.settings.clone();
        tokio::task::spawn_blocking(move || extract_with(&recognizer, &image, &settings))
    }

    pub async fn extract_text_in_background(&self, image: DynamicImage) -> Result<String, PipelineError> {
        self.spawn_extract(image)
            .await
            .map_err(|err| PipelineError::Recognition(anyhow!("OCR task failed: {}", err)))?
    }
}

fn extract_with<R: Recognizer + ?Sized>(
    recognizer: &R,
    image: &DynamicImage,
    settings: &Settings,
) -> Result<String, PipelineError> {
    let start = Instant::now();
    let prepared = DynamicImage::ImageLuma8(prepare(image, &settings.prepare_options()));

    let raw = recognizer
        .recognize(&prepared, &settings.ocr_language)
        .map_err(|err| {
            crate::log_error!("OCR failed: {:#}", err);
            PipelineError::Recognition(err)
        })?;

    let text = reconstruct(&raw);
    crate::log_debug!(
        "OCR complete: {} raw chars -> {} chars, {}ms",
        raw.len(), text.len(), start.elapsed().as_millis()
    );

    if text.trim().is_empty() {
        return Err(PipelineError::EmptyRecognition);
    }
    Ok(text)
}
