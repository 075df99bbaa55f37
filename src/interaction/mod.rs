mod rendered_chart;
mod zoom;

pub use rendered_chart::{DataShape, PointerEventKind, RenderedChart, ShapeKind, ShapeListener};
pub use zoom::{ZoomConfig, ZoomState};

use serde::{Deserialize, Serialize};

use crate::core::ChartArtifact;
use crate::error::ProtocolViolation;

/// Fill applied to the shape under the pointer.
pub const HIGHLIGHT_FILL: &str = "#ff7700";
/// Tooltip offset from the pointer, in page pixels.
pub const TOOLTIP_OFFSET_PX: f64 = 10.0;
pub const FALLBACK_CATEGORY: &str = "Data point";
pub const FALLBACK_VALUE: &str = "N/A";

/// Declarative tooltip overlay the presentation layer draws above the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipState {
    pub visible: bool,
    pub text: String,
    pub left_px: f64,
    pub top_px: f64,
}

impl Default for TooltipState {
    fn default() -> Self {
        Self {
            visible: false,
            text: String::new(),
            left_px: 0.0,
            top_px: 0.0,
        }
    }
}

/// Builds interactive views of chart artifacts.
///
/// The artifact markup is never rewritten; hover, highlight and zoom state
/// live next to it as plain data.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SvgInteractionLayer {
    zoom: ZoomConfig,
}

impl SvgInteractionLayer {
    #[must_use]
    pub fn new(zoom: ZoomConfig) -> Self {
        Self { zoom }
    }

    #[must_use]
    pub fn zoom_config(&self) -> ZoomConfig {
        self.zoom
    }

    /// Parses the artifact into a not-yet-enhanced rendered chart.
    pub fn render(&self, artifact: &ChartArtifact) -> Result<RenderedChart, ProtocolViolation> {
        RenderedChart::parse(artifact.svg_markup(), self.zoom)
    }

    /// Attaches pointer behavior to every data shape; returns the number of
    /// listeners attached by this call (zero when already enhanced).
    pub fn enhance(&self, chart: &mut RenderedChart) -> usize {
        chart.enhance()
    }
}
