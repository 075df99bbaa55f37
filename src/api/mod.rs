mod chart_generation_controller;
mod chart_request_builder;
mod chart_session;
mod data_file_controller;
mod export_controller;
mod file_validator;
mod interaction_controller;
mod notification;
mod response_envelope;
mod session_snapshot;
mod upload_controller;
mod upload_coordinator;
mod workflow;
mod workflow_config;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use chart_request_builder::{ChartRequest, ChartRequestBuilder, classify_chart_response};
pub use chart_session::{
    ChartSession, RequestKind, RequestTicket, Resolution, SessionAction, next_status,
};
pub use data_file_controller::classify_listing_response;
pub use file_validator::{ACCEPTED_EXTENSIONS, ACCEPTED_MIME_TYPES, AcceptedBy, FileValidator};
pub use notification::{Notification, NotificationLevel};
pub use session_snapshot::{
    SESSION_SNAPSHOT_JSON_SCHEMA_V1, SessionSnapshot, SessionSnapshotJsonContractV1,
};
pub use upload_coordinator::{UploadCoordinator, classify_upload_response};
pub use workflow::ChartWorkflow;
pub use workflow_config::WorkflowConfig;

/// Lifecycle tag of a [`ChartSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Idle,
    Uploading,
    Ready,
    Generating,
}

impl SessionStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Uploading => "uploading",
            Self::Ready => "ready",
            Self::Generating => "generating",
        }
    }

    /// Whether a request is in flight.
    #[must_use]
    pub fn is_busy(self) -> bool {
        matches!(self, Self::Uploading | Self::Generating)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
