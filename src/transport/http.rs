use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use tracing::{debug, warn};

use crate::api::{ChartRequest, WorkflowConfig};
use crate::core::Document;
use crate::error::TransportError;

use super::{ChartService, ServiceResponse};

const JSON: &str = "application/json";

/// reqwest-backed [`ChartService`].
///
/// Any HTTP status is handed back as a response; only failures to get one
/// (connect, timeout, body read) are transport errors here.
#[derive(Debug, Clone)]
pub struct HttpChartService {
    client: Client,
    upload_url: String,
    generate_chart_url: String,
    data_files_url: String,
}

impl HttpChartService {
    #[must_use]
    pub fn new(config: &WorkflowConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Uses a preconfigured client, e.g. one with timeouts or a proxy.
    #[must_use]
    pub fn with_client(client: Client, config: &WorkflowConfig) -> Self {
        Self {
            client,
            upload_url: config.endpoint_url(&config.upload_path),
            generate_chart_url: config.endpoint_url(&config.generate_chart_path),
            data_files_url: config.endpoint_url(&config.data_files_path),
        }
    }

    async fn send(
        &self,
        endpoint: &'static str,
        request: RequestBuilder,
    ) -> Result<ServiceResponse, TransportError> {
        let response = request.header(ACCEPT, JSON).send().await.map_err(|err| {
            warn!(endpoint, error = %err, "request failed");
            TransportError::from(err)
        })?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|err| {
            warn!(endpoint, status, error = %err, "failed to read response body");
            TransportError::Network(err.to_string())
        })?;
        debug!(endpoint, status, body_len = body.len(), "response received");
        Ok(ServiceResponse::new(status, body))
    }
}

impl ChartService for HttpChartService {
    async fn upload_document(
        &self,
        document: &Document,
    ) -> Result<ServiceResponse, TransportError> {
        let form = Form::new().part("document", document_part(document));
        self.send("upload", self.client.post(&self.upload_url).multipart(form))
            .await
    }

    async fn generate_chart(
        &self,
        request: &ChartRequest,
    ) -> Result<ServiceResponse, TransportError> {
        self.send(
            "generate-chart",
            self.client.post(&self.generate_chart_url).json(request),
        )
        .await
    }

    async fn list_data_files(&self) -> Result<ServiceResponse, TransportError> {
        self.send("data-files", self.client.get(&self.data_files_url))
            .await
    }
}

/// Multipart part carrying the raw document. A MIME type reqwest cannot parse
/// is left off so the service falls back to the file extension.
fn document_part(document: &Document) -> Part {
    let part = || Part::bytes(document.bytes().to_vec()).file_name(document.name().to_owned());
    let Some(mime_type) = document.mime_type() else {
        return part();
    };
    part().mime_str(mime_type).unwrap_or_else(|err| {
        warn!(name = document.name(), mime_type, error = %err, "sending document without MIME type");
        part()
    })
}
