use serde::{Deserialize, Serialize};

use crate::core::ChartParameters;
use crate::error::{WorkflowError, WorkflowResult};
use crate::interaction::TooltipState;
use crate::transport::ChartService;

use super::{ChartWorkflow, Notification, SessionStatus};

pub const SESSION_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;

/// Serializable read-only view of the workflow for the presentation layer
/// and for regression tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub document_name: Option<String>,
    pub data_file: Option<String>,
    pub units: Vec<String>,
    pub parameters: ChartParameters,
    pub can_generate: bool,
    pub has_chart: bool,
    pub chart_cached: bool,
    pub zoom_factor: f64,
    pub zoom_transform: Option<String>,
    pub tooltip: Option<TooltipState>,
    pub last_error: Option<String>,
    pub notification: Option<Notification>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshotJsonContractV1 {
    pub schema_version: u32,
    pub snapshot: SessionSnapshot,
}

impl SessionSnapshot {
    pub fn to_json_pretty(&self) -> WorkflowResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            WorkflowError::InvalidData(format!("failed to serialize session snapshot: {e}"))
        })
    }

    pub fn to_json_contract_v1_pretty(&self) -> WorkflowResult<String> {
        let payload = SessionSnapshotJsonContractV1 {
            schema_version: SESSION_SNAPSHOT_JSON_SCHEMA_V1,
            snapshot: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            WorkflowError::InvalidData(format!("failed to serialize snapshot contract v1: {e}"))
        })
    }

    /// Accepts a bare snapshot or a versioned contract payload.
    pub fn from_json_compat_str(input: &str) -> WorkflowResult<Self> {
        if let Ok(snapshot) = serde_json::from_str::<SessionSnapshot>(input) {
            return Ok(snapshot);
        }
        let payload: SessionSnapshotJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            WorkflowError::InvalidData(format!("failed to parse snapshot json payload: {e}"))
        })?;
        if payload.schema_version != SESSION_SNAPSHOT_JSON_SCHEMA_V1 {
            return Err(WorkflowError::InvalidData(format!(
                "unsupported snapshot schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.snapshot)
    }
}

impl<S: ChartService> ChartWorkflow<S> {
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let session = &self.session;
        let zoom = self.rendered.as_ref().map(|chart| chart.zoom());
        SessionSnapshot {
            status: session.status(),
            document_name: session.document().map(|doc| doc.name().to_owned()),
            data_file: session
                .processing_result()
                .map(|result| result.data_file().to_owned()),
            units: session.units().to_vec(),
            parameters: session.parameters().clone(),
            can_generate: session.can_generate(),
            has_chart: session.artifact().is_some(),
            chart_cached: session.artifact().is_some_and(|artifact| artifact.cached()),
            zoom_factor: zoom.map_or(1.0, |zoom| zoom.factor()),
            zoom_transform: zoom.and_then(|zoom| zoom.transform()),
            tooltip: self.tooltip().cloned(),
            last_error: session.last_error().map(str::to_owned),
            notification: session.notification().cloned(),
        }
    }

    pub fn snapshot_json_contract_v1_pretty(&self) -> WorkflowResult<String> {
        self.snapshot().to_json_contract_v1_pretty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> SessionSnapshot {
        SessionSnapshot {
            status: SessionStatus::Ready,
            document_name: Some("notes.txt".to_owned()),
            data_file: Some("abc.json".to_owned()),
            units: vec!["length".to_owned()],
            parameters: ChartParameters::default(),
            can_generate: true,
            has_chart: false,
            chart_cached: false,
            zoom_factor: 1.0,
            zoom_transform: None,
            tooltip: None,
            last_error: None,
            notification: None,
        }
    }

    #[test]
    fn compat_parser_accepts_bare_and_versioned_payloads() {
        let original = snapshot();
        let bare = original.to_json_pretty().expect("bare");
        let versioned = original.to_json_contract_v1_pretty().expect("versioned");

        assert_eq!(SessionSnapshot::from_json_compat_str(&bare).expect("bare"), original);
        assert_eq!(
            SessionSnapshot::from_json_compat_str(&versioned).expect("versioned"),
            original
        );
    }

    #[test]
    fn unknown_schema_version_is_rejected() {
        let payload = snapshot()
            .to_json_contract_v1_pretty()
            .expect("versioned")
            .replace("\"schema_version\": 1", "\"schema_version\": 7");
        let err = SessionSnapshot::from_json_compat_str(&payload).expect_err("v7");
        assert!(matches!(err, WorkflowError::InvalidData(message) if message.contains("7")));
    }
}
