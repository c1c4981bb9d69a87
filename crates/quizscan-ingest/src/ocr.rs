use std::path::{Path, PathBuf};
use std::process::Command;

use quizscan_core::{RecognitionError, Recognizer};

pub const DEFAULT_LANGUAGE: &str = "eng";

/// OCR through the `tesseract` command line, text read from stdout.
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    program: PathBuf,
    language: String,
}

impl Default for TesseractRecognizer {
    fn default() -> Self {
        Self {
            program: PathBuf::from("tesseract"),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl TesseractRecognizer {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            ..Default::default()
        }
    }

    /// Tesseract language code(s), e.g. `eng` or `eng+tur`.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn language(&self) -> &str {
        &self.language
    }
}

impl Recognizer for TesseractRecognizer {
    fn recognize(&self, image: &Path) -> Result<String, RecognitionError> {
        let program = || self.program.display().to_string();
        let output = Command::new(&self.program)
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .output()
            .map_err(|source| RecognitionError::Spawn {
                program: program(),
                source,
            })?;

        if !output.status.success() {
            return Err(RecognitionError::EngineFailed {
                program: program(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        tracing::debug!(image = %image.display(), chars = text.len(), "recognized page");
        Ok(text)
    }
}
