use tracing::{debug, warn};

use crate::core::Document;
use crate::error::ValidationError;

pub const ACCEPTED_MIME_TYPES: [&str; 3] = [
    "application/pdf",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "text/plain",
];

pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["pdf", "docx", "txt"];

/// Which rule let a document through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptedBy {
    MimeType,
    /// MIME type was absent or generic; the file name decided.
    Extension,
}

/// Pure upload gate on document type and, optionally, size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileValidator {
    max_size_bytes: Option<u64>,
}

impl FileValidator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_size_bytes(mut self, limit: u64) -> Self {
        self.max_size_bytes = Some(limit);
        self
    }

    #[must_use]
    pub fn max_size_bytes(&self) -> Option<u64> {
        self.max_size_bytes
    }

    pub fn validate(&self, document: &Document) -> Result<AcceptedBy, ValidationError> {
        let accepted_by = resolve_accepted_by(document.mime_type(), document.extension().as_deref());
        let Some(accepted_by) = accepted_by else {
            warn!(
                name = document.name(),
                mime_type = ?document.mime_type(),
                "rejected unsupported document type"
            );
            return Err(ValidationError::UnsupportedType {
                name: document.name().to_owned(),
                mime_type: document.mime_type().map(str::to_owned),
            });
        };

        if let Some(limit) = self.max_size_bytes {
            if document.size() > limit {
                warn!(name = document.name(), size = document.size(), limit, "rejected oversized document");
                return Err(ValidationError::TooLarge {
                    name: document.name().to_owned(),
                    size: document.size(),
                    limit,
                });
            }
        }

        debug!(name = document.name(), ?accepted_by, "document accepted");
        Ok(accepted_by)
    }
}

fn resolve_accepted_by(mime_type: Option<&str>, extension: Option<&str>) -> Option<AcceptedBy> {
    let essence = mime_type
        .and_then(|mime| mime.split(';').next())
        .map(|mime| mime.trim().to_ascii_lowercase());
    if essence
        .as_deref()
        .is_some_and(|mime| ACCEPTED_MIME_TYPES.contains(&mime))
    {
        return Some(AcceptedBy::MimeType);
    }
    extension
        .filter(|ext| ACCEPTED_EXTENSIONS.contains(ext))
        .map(|_| AcceptedBy::Extension)
}

#[cfg(test)]
mod tests {
    use super::{AcceptedBy, resolve_accepted_by};

    #[test]
    fn mime_type_wins_when_recognized() {
        assert_eq!(
            resolve_accepted_by(Some("text/plain; charset=utf-8"), Some("csv")),
            Some(AcceptedBy::MimeType)
        );
        assert_eq!(
            resolve_accepted_by(Some("Application/PDF"), None),
            Some(AcceptedBy::MimeType)
        );
    }

    #[test]
    fn extension_is_the_fallback() {
        assert_eq!(
            resolve_accepted_by(Some("application/octet-stream"), Some("docx")),
            Some(AcceptedBy::Extension)
        );
        assert_eq!(resolve_accepted_by(None, Some("txt")), Some(AcceptedBy::Extension));
        assert_eq!(resolve_accepted_by(None, Some("png")), None);
        assert_eq!(resolve_accepted_by(Some("image/png"), None), None);
    }
}
