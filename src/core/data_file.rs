use chrono::{DateTime, NaiveDateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ProtocolViolation;

use super::ProcessingResult;

/// One processed data file as reported by the listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataFileEntry {
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub modified: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub units: Vec<String>,
}

impl DataFileEntry {
    /// Parses `modified` as RFC 3339 or `YYYY-MM-DD HH:MM:SS` (UTC).
    #[must_use]
    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.modified.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
            .ok()
            .map(|naive| naive.and_utc())
    }

    /// Processing result that lets a session chart this file without re-uploading.
    pub fn to_processing_result(&self) -> Result<ProcessingResult, ProtocolViolation> {
        ProcessingResult::new(self.units.clone(), self.name.clone())
    }
}

/// Listing of processed data files keyed by file name, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DataFileCatalog {
    entries: IndexMap<String, DataFileEntry>,
}

impl DataFileCatalog {
    /// Builds a catalog; entries with unparsable timestamps sort last and a
    /// repeated name keeps its newest entry.
    #[must_use]
    pub fn from_entries(mut entries: Vec<DataFileEntry>) -> Self {
        entries.sort_by(|a, b| b.modified_at().cmp(&a.modified_at()));
        let mut map = IndexMap::with_capacity(entries.len());
        for entry in entries {
            map.entry(entry.name.clone()).or_insert(entry);
        }
        Self { entries: map }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DataFileEntry> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DataFileEntry> {
        self.entries.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
