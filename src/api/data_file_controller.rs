use serde_json::Value;
use tracing::{debug, warn};

use crate::core::{DataFileCatalog, DataFileEntry, ProcessingResult};
use crate::error::{ProtocolViolation, WorkflowError, WorkflowResult};
use crate::transport::{ChartService, ServiceResponse};

use super::response_envelope::decode_envelope;
use super::{ChartWorkflow, Notification};

impl<S: ChartService> ChartWorkflow<S> {
    /// Fetches the listing of processed data files into the catalog.
    ///
    /// A failed refresh keeps the previous catalog.
    pub async fn refresh_data_files(&mut self) -> WorkflowResult<&DataFileCatalog> {
        let outcome = match self.service.list_data_files().await {
            Ok(response) => classify_listing_response(&response),
            Err(err) => Err(err.into()),
        };
        match outcome {
            Ok(entries) => {
                self.catalog = DataFileCatalog::from_entries(entries);
                debug!(count = self.catalog.len(), "data file catalog refreshed");
                if self.catalog.is_empty() {
                    self.session
                        .notify(Notification::info("No data files available"));
                }
                Ok(&self.catalog)
            }
            Err(err) => {
                warn!(error = %err, "data file listing failed");
                self.session.record_error(&err.user_message());
                Err(err)
            }
        }
    }

    /// Points the session at a previously processed data file without
    /// re-uploading; the session moves to `Ready`.
    pub fn load_data_file(&mut self, name: &str) -> WorkflowResult<ProcessingResult> {
        let Some(entry) = self.catalog.get(name) else {
            let err = WorkflowError::UnknownDataFile(name.to_owned());
            self.session.record_error(&err.user_message());
            return Err(err);
        };
        let result = entry.to_processing_result()?;
        self.session.load_processing_result(result.clone())?;
        self.rendered = None;
        debug!(name, units = result.units().len(), "data file loaded");
        Ok(result)
    }
}

/// Reads the data-file listing; `files: null` is an empty listing.
pub fn classify_listing_response(response: &ServiceResponse) -> WorkflowResult<Vec<DataFileEntry>> {
    let object = decode_envelope("data-files", response)?;
    let files = match object.get("files") {
        None => return Err(ProtocolViolation::MissingField("files").into()),
        Some(Value::Null) => return Ok(Vec::new()),
        Some(files) => files.clone(),
    };
    let entries: Vec<DataFileEntry> = serde_json::from_value(files).map_err(|err| {
        ProtocolViolation::UnexpectedShape {
            field: "files",
            detail: err.to_string(),
        }
    })?;
    Ok(entries)
}
