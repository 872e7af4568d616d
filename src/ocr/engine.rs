// Pure-Rust OCR engine backed by ocrs
use anyhow::{Context, Result};
use image::DynamicImage;
use ocrs::{DimOrder, ImageSource, OcrEngine, OcrEngineParams};
use rten::Model;
use rten_tensor::{AsView, NdTensor};

use super::{models, Recognizer};

/// Lazily downloads the detection and recognition models on first load.
pub struct OcrsEngine {
    engine: OcrEngine,
}

impl OcrsEngine {
    pub async fn load() -> Result<Self> {
        let paths = models::ensure_models().await?;

        crate::log_debug!("Loading OCR models from {}", paths.detection.display());
        let detection_model = Model::load_file(&paths.detection)
            .context("Failed to load detection model")?;
        let recognition_model = Model::load_file(&paths.recognition)
            .context("Failed to load recognition model")?;

        let engine = OcrEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            ..Default::default()
        })?;

        Ok(Self { engine })
    }
}

impl Recognizer for OcrsEngine {
    /// The bundled models are Latin-script only, so `language` is ignored.
    fn recognize(&self, image: &DynamicImage, _language: &str) -> Result<String> {
        let gray = image.to_luma8();
        let (width, height) = gray.dimensions();

        // Pixel values in [0.0, 1.0], shape [1, height, width] (CHW)
        let pixels: Vec<f32> = gray.pixels().map(|p| p.0[0] as f32 / 255.0).collect();
        let tensor = NdTensor::from_data([1, height as usize, width as usize], pixels);

        let source = ImageSource::from_tensor(tensor.view(), DimOrder::Chw)?;
        let input = self.engine.prepare_input(source)?;
        let text = self.engine.get_text(&input)?;

        crate::log_debug!("ocrs recognized {} chars", text.len());
        Ok(text)
    }
}
