//! Document in, normalized questions out.
//!
//! [`TextAcquirer`] recovers text (embedded first, OCR second), then the
//! parser and normalizer from `quizscan-parsing` turn it into questions.
//! The whole pipeline is synchronous; async callers should run it on a
//! blocking thread.

use std::path::PathBuf;

use quizscan_core::config_file::ExtractionConfig;
use quizscan_core::{Question, TextExtractor};
use quizscan_parsing::{ChoiceTier, QuestionParser, normalize};

pub mod acquire;
pub mod ocr;
pub mod raster;

pub use acquire::{
    Acquisition, AcquisitionConfig, AcquisitionFailure, DEFAULT_MIN_DIRECT_CHARS, PageText,
    TextAcquirer, TextSource,
};
pub use ocr::TesseractRecognizer;
pub use raster::PdftoppmRasterizer;

/// Result of running one document through the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub acquisition: Acquisition,
    pub questions: Vec<Question>,
    /// Choice tier per question, parallel to `questions`.
    pub tiers: Vec<ChoiceTier>,
}

impl PipelineOutput {
    pub fn parsed_count(&self) -> usize {
        self.questions.len()
    }
}

pub struct QuestionPipeline {
    acquirer: TextAcquirer,
    parser: QuestionParser,
}

impl QuestionPipeline {
    pub fn new(acquirer: TextAcquirer, parser: QuestionParser) -> Self {
        Self { acquirer, parser }
    }

    /// Build the production pipeline: MuPDF (when compiled in), `pdftoppm`
    /// and `tesseract`, configured from the `[extraction]` table.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        let rasterizer = PdftoppmRasterizer::new(
            config.pdftoppm_path.as_deref().unwrap_or("pdftoppm"),
        )
        .with_resolution(config.resolution);

        let mut recognizer =
            TesseractRecognizer::new(config.tesseract_path.as_deref().unwrap_or("tesseract"));
        if let Some(lang) = &config.ocr_language {
            recognizer = recognizer.with_language(lang.clone());
        }

        let acquirer = TextAcquirer::new(default_extractor(), rasterizer, recognizer).with_config(
            AcquisitionConfig {
                min_direct_chars: config.min_direct_chars.unwrap_or(DEFAULT_MIN_DIRECT_CHARS),
                work_dir: config.work_dir.as_ref().map(PathBuf::from),
            },
        );
        Self::new(acquirer, QuestionParser::new())
    }

    pub fn acquirer(&self) -> &TextAcquirer {
        &self.acquirer
    }

    /// Acquire, parse and normalize. Never fails; the worst case is an empty
    /// question list with the reasons in `acquisition.failures`.
    pub fn process(&self, document: &[u8]) -> PipelineOutput {
        let acquisition = self.acquirer.acquire_text(document);
        let (questions, tiers) = if acquisition.is_empty() {
            (Vec::new(), Vec::new())
        } else {
            self.parse_text(&acquisition.text)
        };

        tracing::info!(
            source = acquisition.source.as_str(),
            parsed = questions.len(),
            failures = acquisition.failures.len(),
            "processed document"
        );

        PipelineOutput {
            acquisition,
            questions,
            tiers,
        }
    }

    /// Parse and normalize text that was acquired elsewhere.
    pub fn parse_text(&self, text: &str) -> (Vec<Question>, Vec<ChoiceTier>) {
        let (drafts, tiers): (Vec<_>, Vec<_>) = self
            .parser
            .parse_blocks(text)
            .into_iter()
            .map(|b| (b.question, b.tier))
            .unzip();
        (normalize(drafts), tiers)
    }
}

#[cfg(feature = "pdf")]
fn default_extractor() -> impl TextExtractor {
    quizscan_pdf_mupdf::MupdfBackend::new()
}

#[cfg(not(feature = "pdf"))]
fn default_extractor() -> impl TextExtractor {
    NoTextLayer
}

/// Stand-in extractor when MuPDF is not compiled in; every document goes
/// straight to OCR.
#[cfg(not(feature = "pdf"))]
struct NoTextLayer;

#[cfg(not(feature = "pdf"))]
impl TextExtractor for NoTextLayer {
    fn extract_text(
        &self,
        _path: &std::path::Path,
    ) -> Result<String, quizscan_core::BackendError> {
        Err(quizscan_core::BackendError::ExtractionError(
            "PDF support not compiled in (enable the `pdf` feature of quizscan-ingest)".into(),
        ))
    }
}
