// OCR model management for the ocrs engine
use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

const DETECTION_MODEL_URL: &str =
    "https://huggingface.co/robertknight/ocrs/resolve/main/text-detection.rten";
const RECOGNITION_MODEL_URL: &str =
    "https://huggingface.co/robertknight/ocrs/resolve/main/text-recognition.rten";

pub struct ModelPaths {
    pub detection: PathBuf,
    pub recognition: PathBuf,
}

fn cache_dir() -> Result<PathBuf> {
    Ok(dirs::cache_dir()
        .ok_or_else(|| anyhow!("No cache directory"))?
        .join("ocr-translate")
        .join("ocrs"))
}

/// Download any missing model into the cache and return both paths.
pub async fn ensure_models() -> Result<ModelPaths> {
    let cache_dir = cache_dir()?;
    std::fs::create_dir_all(&cache_dir)
        .with_context(|| format!("Failed to create {}", cache_dir.display()))?;

    let paths = ModelPaths {
        detection: cache_dir.join("text-detection.rten"),
        recognition: cache_dir.join("text-recognition.rten"),
    };

    if !paths.detection.exists() {
        crate::log_debug!("Downloading OCR detection model");
        download_file(DETECTION_MODEL_URL, &paths.detection).await
            .context("Failed to download detection model")?;
    }

    if !paths.recognition.exists() {
        crate::log_debug!("Downloading OCR recognition model");
        download_file(RECOGNITION_MODEL_URL, &paths.recognition).await
            .context("Failed to download recognition model")?;
    }

    Ok(paths)
}

async fn download_file(url: &str, path: &Path) -> Result<()> {
    let response = reqwest::get(url).await
        .context("Failed to fetch model")?
        .error_for_status()
        .context("Model server refused the download")?;

    let bytes = response.bytes().await
        .context("Failed to read response bytes")?;

    std::fs::write(path, bytes)
        .context("Failed to write model file")?;

    crate::log_debug!("Downloaded {} to {}", url, path.display());
    Ok(())
}
