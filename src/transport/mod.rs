mod replay;

#[cfg(feature = "http-transport")]
mod http;

pub use replay::{RecordedRequest, ReplayChartService};

#[cfg(feature = "http-transport")]
pub use http::HttpChartService;

use crate::api::ChartRequest;
use crate::core::Document;
use crate::error::TransportError;

/// Status line and body of one service response, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceResponse {
    pub status: u16,
    pub body: String,
}

impl ServiceResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// `200 OK` carrying the serialized JSON value.
    #[must_use]
    pub fn ok_json(value: &serde_json::Value) -> Self {
        Self::new(200, value.to_string())
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Contract implemented by anything that can reach the processing and
/// chart-generation service.
///
/// Implementations only move bytes; classifying a response into a result or a
/// workflow error happens in the components that issued the request.
#[allow(async_fn_in_trait)]
pub trait ChartService {
    /// Sends the raw document as multipart field `document`.
    async fn upload_document(&self, document: &Document)
    -> Result<ServiceResponse, TransportError>;

    /// Posts a chart-generation request as JSON.
    async fn generate_chart(
        &self,
        request: &ChartRequest,
    ) -> Result<ServiceResponse, TransportError>;

    /// Fetches the listing of previously processed data files.
    async fn list_data_files(&self) -> Result<ServiceResponse, TransportError>;
}
