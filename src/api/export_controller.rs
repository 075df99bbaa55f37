use tracing::warn;

use crate::error::ExportResult;
use crate::export::{ExportFormat, ExportedFile};
use crate::transport::ChartService;

use super::{ChartWorkflow, Notification};

impl<S: ChartService> ChartWorkflow<S> {
    /// Writes the current chart as SVG into the export directory.
    pub fn export_svg(&mut self) -> ExportResult<ExportedFile> {
        self.export(ExportFormat::Svg)
    }

    /// Rasterizes the current chart to PNG into the export directory.
    pub fn export_png(&mut self) -> ExportResult<ExportedFile> {
        self.export(ExportFormat::Png)
    }

    fn export(&mut self, format: ExportFormat) -> ExportResult<ExportedFile> {
        let artifact = self.session.artifact();
        let outcome = match format {
            ExportFormat::Svg => self.exporter.export_svg(artifact),
            ExportFormat::Png => self.exporter.export_png(artifact),
        };
        match &outcome {
            Ok(file) => self.session.notify(Notification::success(format!(
                "Chart saved to {}",
                file.path.display()
            ))),
            Err(err) => {
                warn!(error = %err, ?format, "chart export failed");
                self.session.record_error(&err.user_message());
            }
        }
        outcome
    }
}
