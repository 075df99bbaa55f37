#[cfg(feature = "png-export")]
mod raster;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::core::ChartArtifact;
use crate::error::{ExportError, ExportResult};

/// Attempts at a free file name before giving up.
const MAX_NAME_ATTEMPTS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Svg,
    Png,
}

impl ExportFormat {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
        }
    }

    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Svg => "image/svg+xml",
            Self::Png => "image/png",
        }
    }
}

/// A finished export on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub path: PathBuf,
    pub format: ExportFormat,
    pub bytes_written: u64,
}

/// `chart_<unix-millis>.<ext>`.
#[must_use]
pub fn export_file_name(format: ExportFormat, at: DateTime<Utc>) -> String {
    format!("chart_{}.{}", at.timestamp_millis(), format.extension())
}

/// Writes chart artifacts to files, client-local.
///
/// Bytes are staged in a temporary file inside the output directory and only
/// moved to their final name once complete; the staging file is removed on
/// every failure path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportService {
    output_dir: PathBuf,
}

impl ExportService {
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Writes the markup byte for byte.
    pub fn export_svg(&self, artifact: Option<&ChartArtifact>) -> ExportResult<ExportedFile> {
        let artifact = artifact.ok_or(ExportError::NoArtifact)?;
        self.write_staged(ExportFormat::Svg, artifact.svg_markup().as_bytes())
    }

    /// Rasterizes at the chart's intrinsic size and writes a PNG.
    pub fn export_png(&self, artifact: Option<&ChartArtifact>) -> ExportResult<ExportedFile> {
        let artifact = artifact.ok_or(ExportError::NoArtifact)?;
        let png = rasterize(artifact.svg_markup()).map_err(|reason| {
            warn!(%reason, "png rasterization blocked");
            ExportError::RasterizationBlocked { reason }
        })?;
        self.write_staged(ExportFormat::Png, &png)
    }

    fn write_staged(&self, format: ExportFormat, bytes: &[u8]) -> ExportResult<ExportedFile> {
        let io_error = |source: io::Error| ExportError::Io {
            path: self.output_dir.clone(),
            source,
        };
        fs::create_dir_all(&self.output_dir).map_err(io_error)?;

        let mut staged = NamedTempFile::new_in(&self.output_dir).map_err(io_error)?;
        staged.write_all(bytes).map_err(io_error)?;
        staged.as_file().sync_all().map_err(io_error)?;

        let stem = export_file_name(format, Utc::now());
        let mut attempt = 0;
        loop {
            let path = self.output_dir.join(candidate_name(&stem, attempt));
            match staged.persist_noclobber(&path) {
                Ok(_) => {
                    debug!(path = %path.display(), ?format, bytes = bytes.len(), "chart exported");
                    return Ok(ExportedFile {
                        path,
                        format,
                        bytes_written: bytes.len() as u64,
                    });
                }
                Err(err)
                    if err.error.kind() == io::ErrorKind::AlreadyExists
                        && attempt + 1 < MAX_NAME_ATTEMPTS =>
                {
                    staged = err.file;
                    attempt += 1;
                }
                Err(err) => {
                    // Dropping `err.file` removes the staging file.
                    return Err(ExportError::Io {
                        path,
                        source: err.error,
                    });
                }
            }
        }
    }
}

/// `chart_1.svg`, then `chart_1_1.svg`, `chart_1_2.svg`, ...
fn candidate_name(file_name: &str, attempt: u32) -> String {
    if attempt == 0 {
        return file_name.to_owned();
    }
    match file_name.rsplit_once('.') {
        Some((stem, ext)) => format!("{stem}_{attempt}.{ext}"),
        None => format!("{file_name}_{attempt}"),
    }
}

#[cfg(feature = "png-export")]
fn rasterize(markup: &str) -> Result<Vec<u8>, String> {
    raster::rasterize_png(markup)
}

#[cfg(not(feature = "png-export"))]
fn rasterize(_markup: &str) -> Result<Vec<u8>, String> {
    Err("PNG rasterization is not available in this build".to_owned())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{ExportFormat, candidate_name, export_file_name};

    #[test]
    fn file_names_carry_millis_and_extension() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).single().expect("time");
        assert_eq!(export_file_name(ExportFormat::Svg, at), "chart_1700000000123.svg");
        assert_eq!(export_file_name(ExportFormat::Png, at), "chart_1700000000123.png");
    }

    #[test]
    fn collisions_get_a_numeric_suffix() {
        assert_eq!(candidate_name("chart_5.svg", 0), "chart_5.svg");
        assert_eq!(candidate_name("chart_5.svg", 2), "chart_5_2.svg");
    }
}
