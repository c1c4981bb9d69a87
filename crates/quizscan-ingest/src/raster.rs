use std::path::{Path, PathBuf};
use std::process::Command;

use quizscan_core::{RasterizationError, Rasterizer};

const PAGE_PREFIX: &str = "page";

/// Renders pages with poppler's `pdftoppm`, one PNG per page.
///
/// `pdftoppm` names its output `page-1.png`, `page-2.png`, ... and zero-pads
/// the number once the document has ten pages or more, so page order is
/// recovered from the trailing number rather than from the file name.
#[derive(Debug, Clone)]
pub struct PdftoppmRasterizer {
    program: PathBuf,
    resolution: Option<u32>,
}

impl Default for PdftoppmRasterizer {
    fn default() -> Self {
        Self {
            program: PathBuf::from("pdftoppm"),
            resolution: None,
        }
    }
}

impl PdftoppmRasterizer {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            resolution: None,
        }
    }

    /// Render at `dpi` instead of the tool's default (150).
    pub fn with_resolution(mut self, dpi: Option<u32>) -> Self {
        self.resolution = dpi;
        self
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }
}

impl Rasterizer for PdftoppmRasterizer {
    fn rasterize(
        &self,
        document: &Path,
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>, RasterizationError> {
        std::fs::create_dir_all(output_dir).map_err(|source| RasterizationError::OutputDir {
            path: output_dir.to_path_buf(),
            source,
        })?;

        let mut cmd = Command::new(&self.program);
        cmd.arg("-png");
        if let Some(dpi) = self.resolution {
            cmd.arg("-r").arg(dpi.to_string());
        }
        cmd.arg(document).arg(output_dir.join(PAGE_PREFIX));

        tracing::debug!(program = %self.program.display(), document = %document.display(), "rasterizing");
        let output = cmd.output().map_err(|source| RasterizationError::Spawn {
            program: self.program_name(),
            source,
        })?;

        if !output.status.success() {
            return Err(RasterizationError::ToolFailed {
                program: self.program_name(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let pages = list_page_images(output_dir).map_err(|source| RasterizationError::OutputDir {
            path: output_dir.to_path_buf(),
            source,
        })?;
        if pages.is_empty() {
            return Err(RasterizationError::NoPages);
        }
        Ok(pages)
    }
}

/// PNG files in `dir`, ordered by the page number at the end of the stem.
fn list_page_images(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut images: Vec<(u32, PathBuf)> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
        })
        .map(|p| (page_number(&p), p))
        .collect();
    images.sort();
    Ok(images.into_iter().map(|(_, p)| p).collect())
}

fn page_number(path: &Path) -> u32 {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    let digits: String = stem
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    digits.parse().unwrap_or(0)
}
