use std::fs;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};

/// A user-supplied file selected for upload.
///
/// Immutable once constructed; the raw bytes are shared so handing the document
/// to the upload path never copies the payload more than the transport needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    name: String,
    size: u64,
    mime_type: Option<String>,
    last_modified: DateTime<Utc>,
    bytes: Arc<[u8]>,
}

impl Document {
    /// Builds a document from in-memory bytes.
    ///
    /// An empty or whitespace-only MIME type is treated as absent, matching
    /// drag-and-drop sources that omit MIME metadata.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        mime_type: Option<String>,
        last_modified: DateTime<Utc>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        let bytes: Arc<[u8]> = Arc::from(bytes.into());
        Self {
            name: name.into(),
            size: bytes.len() as u64,
            mime_type: mime_type
                .map(|mime| mime.trim().to_owned())
                .filter(|mime| !mime.is_empty()),
            last_modified,
            bytes,
        }
    }

    /// Reads a document from disk. The MIME type is left unset; validation
    /// falls back to the file extension.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = fs::read(path)?;
        let last_modified = fs::metadata(path)
            .and_then(|meta| meta.modified())
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(name, None, last_modified, bytes))
    }

    #[must_use]
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        let mime_type = mime_type.into();
        self.mime_type = Some(mime_type.trim().to_owned()).filter(|mime| !mime.is_empty());
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }

    #[must_use]
    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    #[must_use]
    pub fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Lower-cased extension of the file name, without the dot.
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
    }
}
