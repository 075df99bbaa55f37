use tracing::{debug, warn};

use crate::core::{ChartArtifact, ChartParameters, Document, ParameterInput, ProcessingResult};
use crate::error::{ValidationError, WorkflowError, WorkflowResult};

use super::{ChartRequest, ChartRequestBuilder, Notification, SessionStatus};

const NO_UNITS_MESSAGE: &str =
    "No units were found in this document, so no chart can be generated.";

/// Events that move a session between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    SelectDocument,
    BeginUpload,
    UploadSucceeded,
    UploadFailed,
    LoadProcessingResult,
    BeginGeneration,
    GenerationSucceeded,
    GenerationFailed,
}

impl SessionAction {
    fn describe(self) -> &'static str {
        match self {
            Self::SelectDocument => "select a document",
            Self::BeginUpload => "start an upload",
            Self::UploadSucceeded | Self::UploadFailed => "resolve an upload",
            Self::LoadProcessingResult => "load a data file",
            Self::BeginGeneration => "generate a chart",
            Self::GenerationSucceeded | Self::GenerationFailed => "resolve a chart request",
        }
    }
}

/// Transition table of the session state machine.
///
/// `has_result` tells whether a processing result is held; a failed upload
/// only falls back to `Idle` when there is none. `None` marks an action that is
/// not valid from `from`.
#[must_use]
pub fn next_status(
    from: SessionStatus,
    action: SessionAction,
    has_result: bool,
) -> Option<SessionStatus> {
    use SessionAction as A;
    use SessionStatus as S;

    match (from, action) {
        (_, A::SelectDocument) => Some(S::Idle),
        (S::Idle | S::Ready, A::BeginUpload) => Some(S::Uploading),
        (S::Uploading, A::UploadSucceeded) => Some(S::Ready),
        (S::Uploading, A::UploadFailed) => Some(if has_result { S::Ready } else { S::Idle }),
        (S::Idle | S::Ready, A::LoadProcessingResult) => Some(S::Ready),
        (S::Ready, A::BeginGeneration) => Some(S::Generating),
        (S::Generating, A::GenerationSucceeded | A::GenerationFailed) => Some(S::Ready),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Upload,
    Generation,
}

/// Identifies one in-flight request so its resolution can be matched back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestTicket {
    kind: RequestKind,
    id: u64,
}

impl RequestTicket {
    #[must_use]
    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// What a resolution did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    /// The ticket no longer matches the pending request; the session is unchanged.
    Stale,
}

/// Aggregate root of one document-to-chart session.
///
/// Every mutation goes through a guarded transition; request resolutions are
/// matched against the ticket issued when the request started.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSession {
    status: SessionStatus,
    document: Option<Document>,
    processing: Option<ProcessingResult>,
    parameters: ChartParameters,
    artifact: Option<ChartArtifact>,
    last_error: Option<String>,
    notification: Option<Notification>,
    next_ticket: u64,
    pending: Option<RequestTicket>,
}

impl ChartSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the document and resets everything derived from the old one.
    pub fn select_document(&mut self, document: Document) {
        debug!(
            name = document.name(),
            from = %self.status,
            "document selected; session reset"
        );
        self.reset_derived_state();
        self.document = Some(document);
        self.status = SessionStatus::Idle;
    }

    /// Starts an upload of the selected document and hands it to the caller.
    pub fn begin_upload(&mut self) -> WorkflowResult<(RequestTicket, Document)> {
        self.transition_target(SessionAction::BeginUpload)?;
        let Some(document) = self.document.clone() else {
            return Err(ValidationError::NoDocument.into());
        };
        let ticket = self.issue(RequestKind::Upload);
        self.status = SessionStatus::Uploading;
        debug!(ticket = ticket.id, name = document.name(), "upload started");
        Ok((ticket, document))
    }

    /// Applies the outcome of the upload identified by `ticket`.
    ///
    /// A failure leaves the previous processing result, parameters and chart
    /// in place.
    pub fn complete_upload(
        &mut self,
        ticket: RequestTicket,
        outcome: WorkflowResult<ProcessingResult>,
    ) -> Resolution {
        if !self.take_pending(ticket) {
            return Resolution::Stale;
        }
        match outcome {
            Ok(result) => {
                self.status = SessionStatus::Ready;
                self.install_processing_result(result);
                let notification = if self.has_units() {
                    Notification::success("File processed successfully!")
                } else {
                    Notification::info(NO_UNITS_MESSAGE)
                };
                self.last_error = None;
                self.notification = Some(notification);
                debug!(units = self.units().len(), "upload applied");
            }
            Err(err) => {
                self.status = next_status(
                    SessionStatus::Uploading,
                    SessionAction::UploadFailed,
                    self.processing.is_some(),
                )
                .unwrap_or(SessionStatus::Idle);
                warn!(error = %err, status = %self.status, "upload failed");
                self.record_error(&err.user_message());
            }
        }
        Resolution::Applied
    }

    /// Adopts a processing result obtained without an upload, such as a
    /// previously processed data file.
    pub fn load_processing_result(&mut self, result: ProcessingResult) -> WorkflowResult<()> {
        let target = self.transition_target(SessionAction::LoadProcessingResult)?;
        debug!(data_file = result.data_file(), "processing result loaded");
        self.document = None;
        self.status = target;
        self.install_processing_result(result);
        self.last_error = None;
        Ok(())
    }

    /// Stores parameters with dimensions clamped into range.
    pub fn set_parameters(&mut self, parameters: ChartParameters) {
        self.parameters = parameters.clamped();
        debug!(
            unit = %self.parameters.unit,
            chart_type = %self.parameters.chart_type,
            width = self.parameters.width,
            height = self.parameters.height,
            "chart parameters updated"
        );
    }

    pub fn apply_parameter_input(&mut self, input: &ParameterInput) {
        self.set_parameters(ChartParameters::from_input(input));
    }

    /// Starts a chart request from the current result and parameters.
    ///
    /// Only valid from `Ready`; refused with `GenerationUnavailable` when the
    /// processing result lists no units.
    pub fn begin_generation(&mut self) -> WorkflowResult<(RequestTicket, ChartRequest)> {
        self.transition_target(SessionAction::BeginGeneration)?;
        let Some(result) = self.processing.as_ref().filter(|result| result.has_units()) else {
            return Err(WorkflowError::GenerationUnavailable(NO_UNITS_MESSAGE.to_owned()));
        };
        let request = ChartRequestBuilder::build(result, &self.parameters);
        let ticket = self.issue(RequestKind::Generation);
        self.status = SessionStatus::Generating;
        debug!(ticket = ticket.id, "chart generation started");
        Ok((ticket, request))
    }

    /// Applies the outcome of the chart request identified by `ticket`.
    ///
    /// Success replaces the artifact; failure keeps the previous one.
    pub fn complete_generation(
        &mut self,
        ticket: RequestTicket,
        outcome: WorkflowResult<ChartArtifact>,
    ) -> Resolution {
        if !self.take_pending(ticket) {
            return Resolution::Stale;
        }
        self.status = SessionStatus::Ready;
        match outcome {
            Ok(artifact) => {
                debug!(cached = artifact.cached(), "chart artifact replaced");
                self.artifact = Some(artifact);
                self.last_error = None;
                self.notification = Some(Notification::success("Chart generated successfully"));
            }
            Err(err) => {
                warn!(
                    error = %err,
                    kept_previous = self.artifact.is_some(),
                    "chart generation failed"
                );
                self.record_error(&err.user_message());
            }
        }
        Resolution::Applied
    }

    /// Records a failure outside any transition, e.g. a refused export.
    pub fn record_error(&mut self, message: &str) {
        self.last_error = Some(message.to_owned());
        self.notification = Some(Notification::error(message));
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notification = Some(notification);
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    #[must_use]
    pub fn processing_result(&self) -> Option<&ProcessingResult> {
        self.processing.as_ref()
    }

    /// Units for the unit selector, in service order.
    #[must_use]
    pub fn units(&self) -> &[String] {
        self.processing
            .as_ref()
            .map(ProcessingResult::units)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn has_units(&self) -> bool {
        !self.units().is_empty()
    }

    #[must_use]
    pub fn can_generate(&self) -> bool {
        self.status == SessionStatus::Ready && self.has_units()
    }

    #[must_use]
    pub fn parameters(&self) -> &ChartParameters {
        &self.parameters
    }

    #[must_use]
    pub fn artifact(&self) -> Option<&ChartArtifact> {
        self.artifact.as_ref()
    }

    #[must_use]
    pub fn svg_markup(&self) -> Option<&str> {
        self.artifact.as_ref().map(ChartArtifact::svg_markup)
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    #[must_use]
    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    #[must_use]
    pub fn pending_request(&self) -> Option<RequestTicket> {
        self.pending
    }

    fn transition_target(&self, action: SessionAction) -> WorkflowResult<SessionStatus> {
        next_status(self.status, action, self.processing.is_some()).ok_or_else(|| {
            warn!(from = %self.status, ?action, "rejected session transition");
            WorkflowError::InvalidTransition {
                from: self.status,
                action: action.describe(),
            }
        })
    }

    fn issue(&mut self, kind: RequestKind) -> RequestTicket {
        self.next_ticket += 1;
        let ticket = RequestTicket {
            kind,
            id: self.next_ticket,
        };
        self.pending = Some(ticket);
        ticket
    }

    fn take_pending(&mut self, ticket: RequestTicket) -> bool {
        if self.pending == Some(ticket) {
            self.pending = None;
            return true;
        }
        warn!(
            ticket = ticket.id,
            kind = ?ticket.kind,
            pending = ?self.pending.map(|pending| pending.id),
            "ignoring stale request resolution"
        );
        false
    }

    fn reset_derived_state(&mut self) {
        self.processing = None;
        self.artifact = None;
        self.parameters = ChartParameters::default();
        self.last_error = None;
        self.notification = None;
        self.pending = None;
    }

    /// New data source: the chart of the old one no longer applies, and a
    /// selected unit the new result does not list falls back to all units.
    fn install_processing_result(&mut self, result: ProcessingResult) {
        if !result.accepts_unit(&self.parameters.unit) {
            self.parameters.unit.clear();
        }
        self.artifact = None;
        self.processing = Some(result);
    }
}

#[cfg(test)]
mod tests {
    use super::{SessionAction as A, next_status};
    use crate::api::SessionStatus as S;

    #[test]
    fn generation_is_only_valid_from_ready() {
        assert_eq!(next_status(S::Ready, A::BeginGeneration, true), Some(S::Generating));
        for from in [S::Idle, S::Uploading, S::Generating] {
            assert_eq!(next_status(from, A::BeginGeneration, true), None);
        }
    }

    #[test]
    fn failed_upload_falls_back_by_retained_result() {
        assert_eq!(next_status(S::Uploading, A::UploadFailed, false), Some(S::Idle));
        assert_eq!(next_status(S::Uploading, A::UploadFailed, true), Some(S::Ready));
    }

    #[test]
    fn selecting_a_document_always_resets_to_idle() {
        for from in [S::Idle, S::Uploading, S::Ready, S::Generating] {
            assert_eq!(next_status(from, A::SelectDocument, true), Some(S::Idle));
        }
    }

    #[test]
    fn busy_states_reject_new_requests() {
        assert_eq!(next_status(S::Uploading, A::BeginUpload, false), None);
        assert_eq!(next_status(S::Generating, A::BeginUpload, true), None);
        assert_eq!(next_status(S::Generating, A::LoadProcessingResult, true), None);
    }
}
