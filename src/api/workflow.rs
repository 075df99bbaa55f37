use tracing::debug;

use crate::core::DataFileCatalog;
use crate::error::WorkflowResult;
use crate::export::ExportService;
use crate::interaction::{RenderedChart, SvgInteractionLayer};
use crate::transport::ChartService;

use super::{ChartSession, FileValidator, UploadCoordinator, WorkflowConfig};

/// Main orchestration facade consumed by host applications.
///
/// `ChartWorkflow` owns the single session and routes every user action
/// through it: validation and upload, parameter edits, chart generation,
/// the interactive view of the current chart, and export. The service is a
/// trait seam so the same workflow runs against HTTP or scripted replies.
pub struct ChartWorkflow<S: ChartService> {
    pub(super) service: S,
    pub(super) config: WorkflowConfig,
    pub(super) session: ChartSession,
    pub(super) uploads: UploadCoordinator,
    pub(super) interaction: SvgInteractionLayer,
    pub(super) exporter: ExportService,
    pub(super) rendered: Option<RenderedChart>,
    pub(super) catalog: DataFileCatalog,
}

impl<S: ChartService> ChartWorkflow<S> {
    pub fn new(service: S, config: WorkflowConfig) -> WorkflowResult<Self> {
        config.validate()?;
        let validator = match config.max_upload_bytes {
            Some(limit) => FileValidator::new().with_max_size_bytes(limit),
            None => FileValidator::new(),
        };
        debug!(
            base_url = %config.base_url,
            export_dir = %config.export_dir.display(),
            "workflow created"
        );
        Ok(Self {
            uploads: UploadCoordinator::new(validator),
            interaction: SvgInteractionLayer::new(config.zoom),
            exporter: ExportService::new(config.export_dir.clone()),
            service,
            config,
            session: ChartSession::new(),
            rendered: None,
            catalog: DataFileCatalog::default(),
        })
    }

    #[must_use]
    pub fn session(&self) -> &ChartSession {
        &self.session
    }

    #[must_use]
    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    #[must_use]
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Interactive view of the current chart, if one has been generated.
    #[must_use]
    pub fn rendered_chart(&self) -> Option<&RenderedChart> {
        self.rendered.as_ref()
    }

    #[must_use]
    pub fn data_files(&self) -> &DataFileCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn into_service(self) -> S {
        self.service
    }
}
