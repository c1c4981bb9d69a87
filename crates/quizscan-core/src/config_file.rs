use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub server: Option<ServerConfig>,
    pub storage: Option<StorageConfig>,
    pub extraction: Option<ExtractionConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: Option<u16>,
    pub body_limit_mb: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    pub questions_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub min_direct_chars: Option<usize>,
    pub ocr_language: Option<String>,
    pub pdftoppm_path: Option<String>,
    pub tesseract_path: Option<String>,
    pub resolution: Option<u32>,
    pub work_dir: Option<String>,
}

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BODY_LIMIT_MB: usize = 50;
pub const DEFAULT_QUESTIONS_PATH: &str = "questions.json";

impl ConfigFile {
    pub fn port(&self) -> u16 {
        self.server
            .as_ref()
            .and_then(|s| s.port)
            .unwrap_or(DEFAULT_PORT)
    }

    pub fn body_limit_mb(&self) -> usize {
        self.server
            .as_ref()
            .and_then(|s| s.body_limit_mb)
            .unwrap_or(DEFAULT_BODY_LIMIT_MB)
    }

    pub fn questions_path(&self) -> PathBuf {
        self.storage
            .as_ref()
            .and_then(|s| s.questions_path.clone())
            .unwrap_or_else(|| DEFAULT_QUESTIONS_PATH.to_string())
            .into()
    }

    pub fn extraction(&self) -> ExtractionConfig {
        self.extraction.clone().unwrap_or_default()
    }
}

/// Platform config directory path: `<config_dir>/quizscan/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("quizscan").join("config.toml"))
}

/// Load config by cascading CWD `.quizscan.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".quizscan.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let base_server = base.server.unwrap_or_default();
    let over_server = overlay.server.unwrap_or_default();
    let base_storage = base.storage.unwrap_or_default();
    let over_storage = overlay.storage.unwrap_or_default();
    let base_extraction = base.extraction.unwrap_or_default();
    let over_extraction = overlay.extraction.unwrap_or_default();

    ConfigFile {
        server: Some(ServerConfig {
            port: over_server.port.or(base_server.port),
            body_limit_mb: over_server.body_limit_mb.or(base_server.body_limit_mb),
        }),
        storage: Some(StorageConfig {
            questions_path: over_storage.questions_path.or(base_storage.questions_path),
        }),
        extraction: Some(ExtractionConfig {
            min_direct_chars: over_extraction
                .min_direct_chars
                .or(base_extraction.min_direct_chars),
            ocr_language: over_extraction.ocr_language.or(base_extraction.ocr_language),
            pdftoppm_path: over_extraction
                .pdftoppm_path
                .or(base_extraction.pdftoppm_path),
            tesseract_path: over_extraction
                .tesseract_path
                .or(base_extraction.tesseract_path),
            resolution: over_extraction.resolution.or(base_extraction.resolution),
            work_dir: over_extraction.work_dir.or(base_extraction.work_dir),
        }),
    }
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Recognized: `PORT`, `QUIZSCAN_QUESTIONS_PATH`, `QUIZSCAN_OCR_LANG`,
/// `PDFTOPPM_PATH`, `TESSERACT_PATH`.
pub fn apply_env(config: ConfigFile) -> ConfigFile {
    apply_overrides(config, |key| std::env::var(key).ok())
}

fn apply_overrides(config: ConfigFile, lookup: impl Fn(&str) -> Option<String>) -> ConfigFile {
    let overlay = ConfigFile {
        server: Some(ServerConfig {
            port: lookup("PORT").and_then(|v| v.parse().ok()),
            body_limit_mb: None,
        }),
        storage: Some(StorageConfig {
            questions_path: lookup("QUIZSCAN_QUESTIONS_PATH"),
        }),
        extraction: Some(ExtractionConfig {
            ocr_language: lookup("QUIZSCAN_OCR_LANG"),
            pdftoppm_path: lookup("PDFTOPPM_PATH"),
            tesseract_path: lookup("TESSERACT_PATH"),
            ..Default::default()
        }),
    };
    merge(config, overlay)
}
