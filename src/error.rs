use std::path::PathBuf;

use thiserror::Error;

use crate::api::SessionStatus;

pub type WorkflowResult<T> = Result<T, WorkflowError>;
pub type ExportResult<T> = Result<T, ExportError>;

/// Failures of the document-to-chart workflow.
///
/// `Display` carries operator-facing detail for logs; `user_message` carries the
/// text shown to the person driving the workflow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("transport failed: {0}")]
    Transport(#[from] TransportError),

    #[error("protocol violation: {0}")]
    Protocol(#[from] ProtocolViolation),

    #[error("service reported an error: {message}")]
    Service { message: String },

    #[error("cannot {action} while session is {from}")]
    InvalidTransition {
        from: SessionStatus,
        action: &'static str,
    },

    #[error("chart generation unavailable: {0}")]
    GenerationUnavailable(String),

    #[error("unknown data file `{0}`")]
    UnknownDataFile(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl WorkflowError {
    /// Human-readable message for the presentation layer.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(err) => err.user_message(),
            Self::Transport(err) => err.user_message(),
            Self::Protocol(violation) => violation.user_message(),
            Self::Service { message } => message.clone(),
            Self::InvalidTransition { .. } => {
                "Please wait for the current request to finish.".to_owned()
            }
            Self::GenerationUnavailable(reason) => reason.clone(),
            Self::UnknownDataFile(name) => format!("Data file {name} is no longer available."),
            Self::InvalidConfig(detail) => format!("Invalid configuration: {detail}"),
            Self::InvalidData(detail) => format!("Invalid data: {detail}"),
        }
    }
}

/// A candidate document that may not be uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unsupported file type for `{name}` (mime: {mime_type:?})")]
    UnsupportedType {
        name: String,
        mime_type: Option<String>,
    },

    #[error("`{name}` is {size} bytes, limit is {limit} bytes")]
    TooLarge { name: String, size: u64, limit: u64 },

    #[error("no document selected")]
    NoDocument,
}

impl ValidationError {
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::UnsupportedType { name, .. } => format!(
                "Error: {name} is not a supported file type. Please select a PDF, DOCX, or TXT file."
            ),
            Self::TooLarge { name, limit, .. } => {
                format!("Error: {name} is larger than the {limit} byte upload limit.")
            }
            Self::NoDocument => "Please select a file first".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("network failure: {0}")]
    Network(String),

    #[error("unexpected HTTP status {status}")]
    HttpStatus { status: u16 },
}

impl TransportError {
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => {
                "Could not reach the chart service. Check your connection and try again."
                    .to_owned()
            }
            Self::HttpStatus { status } => {
                format!("The chart service responded with HTTP {status}. Please try again.")
            }
        }
    }
}

#[cfg(feature = "http-transport")]
impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::HttpStatus {
                status: status.as_u16(),
            },
            None => Self::Network(err.to_string()),
        }
    }
}

/// The service answered, but not in the agreed shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolViolation {
    #[error("response body is not JSON: {0}")]
    NotJson(String),

    #[error("response is missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` has an unexpected shape: {detail}")]
    UnexpectedShape { field: &'static str, detail: String },

    #[error("chart payload is not a well-formed SVG document: {0}")]
    MalformedSvg(String),
}

impl ProtocolViolation {
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NotJson(_) => "The chart service returned a response that is not JSON.".to_owned(),
            Self::MissingField(field) => {
                format!("The chart service response is missing `{field}`.")
            }
            Self::UnexpectedShape { field, .. } => {
                format!("The chart service returned an unreadable `{field}` value.")
            }
            Self::MalformedSvg(_) => {
                "The chart service returned a chart that is not a valid SVG document.".to_owned()
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no chart artifact to export")]
    NoArtifact,

    #[error("rasterization blocked: {reason}")]
    RasterizationBlocked { reason: String },

    #[error("failed to write export to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NoArtifact => "No chart available to download".to_owned(),
            Self::RasterizationBlocked { .. } => {
                "Error creating PNG. Try downloading as SVG instead.".to_owned()
            }
            Self::Io { path, .. } => format!("Could not save the export to {}.", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ProtocolViolation, TransportError, WorkflowError};

    #[test]
    fn service_errors_surface_message_verbatim() {
        let err = WorkflowError::Service {
            message: "unit not found".to_owned(),
        };
        assert_eq!(err.user_message(), "unit not found");
    }

    #[test]
    fn upload_failure_modes_have_distinct_user_messages() {
        let messages = [
            WorkflowError::from(TransportError::Network("refused".to_owned())).user_message(),
            WorkflowError::from(TransportError::HttpStatus { status: 502 }).user_message(),
            WorkflowError::from(ProtocolViolation::NotJson("eof".to_owned())).user_message(),
            WorkflowError::Service {
                message: "Failed to parse document".to_owned(),
            }
            .user_message(),
            WorkflowError::from(ProtocolViolation::MissingField("units")).user_message(),
        ];
        for (i, a) in messages.iter().enumerate() {
            for b in messages.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
