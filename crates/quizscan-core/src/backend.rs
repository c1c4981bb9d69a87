use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open document: {0}")]
    OpenError(String),
    #[error("failed to extract text: {0}")]
    ExtractionError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum RasterizationError {
    #[error("failed to prepare output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("{program} exited with {status}: {stderr}")]
    ToolFailed {
        program: String,
        status: String,
        stderr: String,
    },
    #[error("renderer produced no page images")]
    NoPages,
}

#[derive(Error, Debug)]
pub enum RecognitionError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("{program} exited with {status}: {stderr}")]
    EngineFailed {
        program: String,
        status: String,
        stderr: String,
    },
}

/// Direct text extraction from a document's internal structure.
///
/// Implementors only return the raw text; deciding whether that text is
/// good enough (and what to do when it isn't) belongs to the acquisition
/// strategy in `quizscan-ingest`.
pub trait TextExtractor: Send + Sync {
    /// Extract the full text content of the document at `path`.
    fn extract_text(&self, path: &Path) -> Result<String, BackendError>;
}

/// Renders every page of a document to an image file.
pub trait Rasterizer: Send + Sync {
    /// Render `document` into `output_dir`, one image per page, returning the
    /// image paths in page order.
    fn rasterize(
        &self,
        document: &Path,
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>, RasterizationError>;
}

/// Optical character recognition over a single page image.
pub trait Recognizer: Send + Sync {
    fn recognize(&self, image: &Path) -> Result<String, RecognitionError>;
}
