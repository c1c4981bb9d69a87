//! Best-effort text acquisition: embedded text first, OCR second.
//!
//! Nothing in here fails. Every problem is recorded as an
//! [`AcquisitionFailure`] next to whatever text could still be recovered, so
//! the worst case is an empty string and a list of reasons.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use thiserror::Error;

use quizscan_core::{Rasterizer, Recognizer, TextExtractor};

/// Embedded text must be longer than this (trimmed, in characters) to be
/// trusted. Image-only PDFs often still carry a page number or two.
pub const DEFAULT_MIN_DIRECT_CHARS: usize = 50;

const DOCUMENT_FILE: &str = "document.pdf";
const PAGES_DIR: &str = "pages";

#[derive(Debug, Clone)]
pub struct AcquisitionConfig {
    pub min_direct_chars: usize,
    /// Parent for the per-document working directory. `None` uses the OS
    /// temp dir.
    pub work_dir: Option<PathBuf>,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            min_direct_chars: DEFAULT_MIN_DIRECT_CHARS,
            work_dir: None,
        }
    }
}

/// Where the acquired text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSource {
    Direct,
    Recognition,
    /// Both paths came up empty.
    Nothing,
}

impl TextSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Recognition => "ocr",
            Self::Nothing => "none",
        }
    }
}

/// A failure that was recovered from during acquisition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AcquisitionFailure {
    #[error("could not prepare working directory: {0}")]
    Workspace(String),
    #[error("direct extraction failed: {0}")]
    Extraction(String),
    #[error("direct extraction returned {chars} characters (need more than {threshold})")]
    InsufficientText { chars: usize, threshold: usize },
    #[error("rasterization failed: {0}")]
    Rasterization(String),
    #[error("recognition failed on page {page}: {reason}")]
    Recognition { page: usize, reason: String },
}

/// Recognized text for one rasterized page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    /// 1-based page number.
    pub page: usize,
    /// Empty when recognition failed or the page really is blank;
    /// `failure` tells the two apart.
    pub text: String,
    pub failure: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acquisition {
    pub text: String,
    pub source: TextSource,
    /// Per-page results; empty unless the OCR fallback ran.
    pub pages: Vec<PageText>,
    pub failures: Vec<AcquisitionFailure>,
}

impl Acquisition {
    fn nothing(failures: Vec<AcquisitionFailure>) -> Self {
        Self {
            text: String::new(),
            source: TextSource::Nothing,
            pages: Vec::new(),
            failures,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Per-document scratch space. Dropping it removes the directory.
struct Workspace {
    dir: TempDir,
    document: PathBuf,
}

/// Runs the two-stage acquisition strategy over pluggable backends.
pub struct TextAcquirer {
    extractor: Box<dyn TextExtractor>,
    rasterizer: Box<dyn Rasterizer>,
    recognizer: Box<dyn Recognizer>,
    config: AcquisitionConfig,
}

impl TextAcquirer {
    pub fn new(
        extractor: impl TextExtractor + 'static,
        rasterizer: impl Rasterizer + 'static,
        recognizer: impl Recognizer + 'static,
    ) -> Self {
        Self {
            extractor: Box::new(extractor),
            rasterizer: Box::new(rasterizer),
            recognizer: Box::new(recognizer),
            config: AcquisitionConfig::default(),
        }
    }

    pub fn with_config(mut self, config: AcquisitionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &AcquisitionConfig {
        &self.config
    }

    /// Recover as much text as possible from `document`.
    ///
    /// 1. Embedded text, accepted if it's longer than the threshold
    /// 2. Otherwise rasterize every page and OCR them in page order,
    ///    joining pages with a newline
    ///
    /// Each stage runs at most once.
    pub fn acquire_text(&self, document: &[u8]) -> Acquisition {
        let mut failures = Vec::new();

        let workspace = match self.prepare_workspace(document) {
            Ok(w) => w,
            Err(e) => {
                tracing::warn!(error = %e, "could not stage document");
                failures.push(AcquisitionFailure::Workspace(e.to_string()));
                return Acquisition::nothing(failures);
            }
        };

        let threshold = self.config.min_direct_chars;
        match self.extractor.extract_text(&workspace.document) {
            Ok(text) => {
                let chars = text.trim().chars().count();
                if chars > threshold {
                    tracing::debug!(chars, "using embedded text");
                    return Acquisition {
                        text,
                        source: TextSource::Direct,
                        pages: Vec::new(),
                        failures,
                    };
                }
                tracing::debug!(chars, threshold, "embedded text too short, falling back to OCR");
                failures.push(AcquisitionFailure::InsufficientText { chars, threshold });
            }
            Err(e) => {
                tracing::debug!(error = %e, "embedded text extraction failed, falling back to OCR");
                failures.push(AcquisitionFailure::Extraction(e.to_string()));
            }
        }

        let pages_dir = workspace.dir.path().join(PAGES_DIR);
        let images = match self.rasterizer.rasterize(&workspace.document, &pages_dir) {
            Ok(images) => images,
            Err(e) => {
                tracing::warn!(error = %e, "rasterization failed");
                failures.push(AcquisitionFailure::Rasterization(e.to_string()));
                return Acquisition::nothing(failures);
            }
        };
        tracing::debug!(pages = images.len(), "rasterized document");

        let pages: Vec<PageText> = images
            .iter()
            .enumerate()
            .map(|(i, image)| self.recognize_page(i + 1, image))
            .collect();

        failures.extend(pages.iter().filter_map(|p| {
            p.failure
                .clone()
                .map(|reason| AcquisitionFailure::Recognition {
                    page: p.page,
                    reason,
                })
        }));

        let text = pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let source = if text.trim().is_empty() {
            TextSource::Nothing
        } else {
            TextSource::Recognition
        };

        Acquisition {
            text,
            source,
            pages,
            failures,
        }
    }

    fn recognize_page(&self, page: usize, image: &Path) -> PageText {
        match self.recognizer.recognize(image) {
            Ok(text) => PageText {
                page,
                text,
                failure: None,
            },
            Err(e) => {
                tracing::warn!(page, error = %e, "recognition failed");
                PageText {
                    page,
                    text: String::new(),
                    failure: Some(e.to_string()),
                }
            }
        }
    }

    fn prepare_workspace(&self, document: &[u8]) -> std::io::Result<Workspace> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("pages-");
        let dir = match &self.config.work_dir {
            Some(base) => {
                std::fs::create_dir_all(base)?;
                builder.tempdir_in(base)?
            }
            None => builder.tempdir()?,
        };
        let document_path = dir.path().join(DOCUMENT_FILE);
        std::fs::write(&document_path, document)?;
        Ok(Workspace {
            dir,
            document: document_path,
        })
    }
}
