use std::cell::RefCell;
use std::collections::VecDeque;

use tracing::trace;

use crate::api::ChartRequest;
use crate::core::Document;
use crate::error::TransportError;

use super::{ChartService, ServiceResponse};

type Reply = Result<ServiceResponse, TransportError>;

/// A request observed by [`ReplayChartService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedRequest {
    Upload {
        name: String,
        mime_type: Option<String>,
        bytes: Vec<u8>,
    },
    GenerateChart(ChartRequest),
    ListDataFiles,
}

/// In-memory service that answers from scripted replies and records every request.
///
/// Used by tests and headless hosts. Each endpoint has its own FIFO queue; an
/// exhausted queue answers with a network failure.
#[derive(Debug, Default)]
pub struct ReplayChartService {
    uploads: RefCell<VecDeque<Reply>>,
    charts: RefCell<VecDeque<Reply>>,
    listings: RefCell<VecDeque<Reply>>,
    requests: RefCell<Vec<RecordedRequest>>,
}

impl ReplayChartService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_upload_reply(&self, reply: Reply) {
        self.uploads.borrow_mut().push_back(reply);
    }

    pub fn push_chart_reply(&self, reply: Reply) {
        self.charts.borrow_mut().push_back(reply);
    }

    pub fn push_listing_reply(&self, reply: Reply) {
        self.listings.borrow_mut().push_back(reply);
    }

    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.borrow().clone()
    }

    /// Chart requests seen so far, oldest first.
    #[must_use]
    pub fn chart_requests(&self) -> Vec<ChartRequest> {
        self.requests
            .borrow()
            .iter()
            .filter_map(|request| match request {
                RecordedRequest::GenerateChart(chart) => Some(chart.clone()),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn upload_count(&self) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|request| matches!(request, RecordedRequest::Upload { .. }))
            .count()
    }

    fn next(queue: &RefCell<VecDeque<Reply>>, endpoint: &str) -> Reply {
        queue.borrow_mut().pop_front().unwrap_or_else(|| {
            Err(TransportError::Network(format!(
                "no scripted reply left for {endpoint}"
            )))
        })
    }
}

impl ChartService for ReplayChartService {
    async fn upload_document(&self, document: &Document) -> Reply {
        trace!(name = document.name(), size = document.size(), "replay upload");
        self.requests.borrow_mut().push(RecordedRequest::Upload {
            name: document.name().to_owned(),
            mime_type: document.mime_type().map(str::to_owned),
            bytes: document.bytes().to_vec(),
        });
        Self::next(&self.uploads, "upload")
    }

    async fn generate_chart(&self, request: &ChartRequest) -> Reply {
        trace!(data_file = %request.data_file, unit = %request.unit, "replay generate-chart");
        self.requests
            .borrow_mut()
            .push(RecordedRequest::GenerateChart(request.clone()));
        Self::next(&self.charts, "generate-chart")
    }

    async fn list_data_files(&self) -> Reply {
        trace!("replay data-files listing");
        self.requests.borrow_mut().push(RecordedRequest::ListDataFiles);
        Self::next(&self.listings, "data-files")
    }
}
