use tracing::debug;

use crate::core::{Document, ProcessingResult};
use crate::error::WorkflowResult;
use crate::transport::ChartService;

use super::{AcceptedBy, ChartWorkflow};

impl<S: ChartService> ChartWorkflow<S> {
    /// Validates and selects a document, resetting the session.
    ///
    /// A rejected document leaves the session untouched and is reported
    /// through the session's error message.
    pub fn select_document(&mut self, document: Document) -> WorkflowResult<AcceptedBy> {
        let accepted_by = match self.uploads.validator().validate(&document) {
            Ok(accepted_by) => accepted_by,
            Err(err) => {
                self.session.record_error(&err.user_message());
                return Err(err.into());
            }
        };
        self.session.select_document(document);
        self.rendered = None;
        Ok(accepted_by)
    }

    /// Uploads the selected document and applies the result.
    ///
    /// Failures are recorded on the session (status fallback, last error,
    /// notification) and also returned.
    pub async fn upload(&mut self) -> WorkflowResult<ProcessingResult> {
        let (ticket, document) = self.session.begin_upload()?;
        let outcome = self.uploads.submit(&self.service, &document).await;
        let resolution = self.session.complete_upload(ticket, outcome.clone());
        debug!(?resolution, status = %self.session.status(), "upload resolved");
        if outcome.is_ok() {
            self.rendered = None;
        }
        outcome
    }

    /// Selects then uploads in one step.
    pub async fn submit_document(&mut self, document: Document) -> WorkflowResult<ProcessingResult> {
        self.select_document(document)?;
        self.upload().await
    }
}
