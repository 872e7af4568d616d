//! Extract text from images with OCR, reflow it into readable lines and
//! translate it.
//!
//! The reusable piece is [`reconstruct`], which turns recognizer or
//! translator output with arbitrary wrapping back into sentence-aligned
//! lines. The rest wires tesseract, Google Translate and a terminal viewer
//! around it.

pub mod logger;
pub mod config;
pub mod error;
pub mod ocr;
pub mod pipeline;
pub mod preprocess;
pub mod reconstruct;
pub mod sanitize;
pub mod translate;
pub mod viewer;

pub use error::PipelineError;
pub use pipeline::{Pipeline, PipelineOutput};
pub use reconstruct::{reconstruct, reconstruct_lines};
