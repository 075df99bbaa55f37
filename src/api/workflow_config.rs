use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{WorkflowError, WorkflowResult};
use crate::interaction::ZoomConfig;

/// Public workflow bootstrap configuration.
///
/// Serializable so hosts can keep endpoints and export settings in a file;
/// every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_upload_path")]
    pub upload_path: String,
    #[serde(default = "default_generate_chart_path")]
    pub generate_chart_path: String,
    #[serde(default = "default_data_files_path")]
    pub data_files_path: String,
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
    #[serde(default)]
    pub zoom: ZoomConfig,
    /// Optional upload size limit in bytes; `None` accepts any size.
    #[serde(default)]
    pub max_upload_bytes: Option<u64>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            upload_path: default_upload_path(),
            generate_chart_path: default_generate_chart_path(),
            data_files_path: default_data_files_path(),
            export_dir: default_export_dir(),
            zoom: ZoomConfig::default(),
            max_upload_bytes: None,
        }
    }
}

impl WorkflowConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Parses JSON, filling omitted fields with defaults, and validates the result.
    pub fn from_json_str(input: &str) -> WorkflowResult<Self> {
        let config: Self = serde_json::from_str(input).map_err(|e| {
            WorkflowError::InvalidConfig(format!("failed to parse workflow config json: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> WorkflowResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            WorkflowError::InvalidData(format!("failed to serialize workflow config: {e}"))
        })
    }

    pub fn validate(&self) -> WorkflowResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(WorkflowError::InvalidConfig(
                "base_url must not be empty".to_owned(),
            ));
        }
        for (name, path) in [
            ("upload_path", &self.upload_path),
            ("generate_chart_path", &self.generate_chart_path),
            ("data_files_path", &self.data_files_path),
        ] {
            if !path.starts_with('/') {
                return Err(WorkflowError::InvalidConfig(format!(
                    "{name} must start with `/`, got `{path}`"
                )));
            }
        }
        if !self.zoom.is_valid() {
            return Err(WorkflowError::InvalidConfig(format!(
                "zoom bounds must satisfy 0 < min <= 1 <= max with a positive step, got {:?}",
                self.zoom
            )));
        }
        if self.max_upload_bytes == Some(0) {
            return Err(WorkflowError::InvalidConfig(
                "max_upload_bytes must be positive".to_owned(),
            ));
        }
        Ok(())
    }

    /// Absolute URL of an endpoint path.
    #[must_use]
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_upload_path(mut self, path: impl Into<String>) -> Self {
        self.upload_path = path.into();
        self
    }

    /// Some deployments serve chart generation at `/generate-chart`.
    #[must_use]
    pub fn with_generate_chart_path(mut self, path: impl Into<String>) -> Self {
        self.generate_chart_path = path.into();
        self
    }

    #[must_use]
    pub fn with_data_files_path(mut self, path: impl Into<String>) -> Self {
        self.data_files_path = path.into();
        self
    }

    #[must_use]
    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_zoom(mut self, zoom: ZoomConfig) -> Self {
        self.zoom = zoom;
        self
    }

    #[must_use]
    pub fn with_max_upload_bytes(mut self, limit: Option<u64>) -> Self {
        self.max_upload_bytes = limit;
        self
    }
}

fn default_base_url() -> String {
    "http://localhost:8080".to_owned()
}

fn default_upload_path() -> String {
    "/upload".to_owned()
}

fn default_generate_chart_path() -> String {
    "/api/generate-chart".to_owned()
}

fn default_data_files_path() -> String {
    "/api/data-files".to_owned()
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}
