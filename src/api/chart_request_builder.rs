use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::core::{ChartArtifact, ChartParameters, ChartType, ParameterInput, ProcessingResult};
use crate::error::{ProtocolViolation, WorkflowResult};
use crate::transport::ServiceResponse;

use super::response_envelope::{decode_envelope, required_string};

/// JSON body of a chart-generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartRequest {
    pub data_file: String,
    pub unit: String,
    pub chart_type: ChartType,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub width: u32,
    pub height: u32,
}

/// Assembles chart requests from session state. Never fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChartRequestBuilder;

impl ChartRequestBuilder {
    /// Builds a request with width and height clamped into range.
    ///
    /// A unit the processing result does not list is still sent; the service
    /// decides whether it exists.
    #[must_use]
    pub fn build(result: &ProcessingResult, params: &ChartParameters) -> ChartRequest {
        if !result.accepts_unit(&params.unit) {
            warn!(unit = %params.unit, data_file = result.data_file(), "unit not in processing result");
        }
        let params = params.clone().clamped();
        let request = ChartRequest {
            data_file: result.data_file().to_owned(),
            unit: params.unit,
            chart_type: params.chart_type,
            title: params.title,
            x_label: params.x_label,
            y_label: params.y_label,
            width: params.width,
            height: params.height,
        };
        debug!(
            data_file = %request.data_file,
            unit = %request.unit,
            chart_type = %request.chart_type,
            width = request.width,
            height = request.height,
            "built chart request"
        );
        request
    }

    /// Builds a request straight from raw control values.
    #[must_use]
    pub fn build_from_input(result: &ProcessingResult, input: &ParameterInput) -> ChartRequest {
        Self::build(result, &ChartParameters::from_input(input))
    }
}

/// Turns a chart-generation reply into an artifact stamped with `generated_at`.
pub fn classify_chart_response(
    response: &ServiceResponse,
    generated_at: DateTime<Utc>,
) -> WorkflowResult<ChartArtifact> {
    let object = decode_envelope("generate-chart", response)?;
    let svg = required_string(&object, "svg")?;
    let cached = match object.get("cached") {
        None | Some(Value::Null) => false,
        Some(Value::Bool(cached)) => *cached,
        Some(other) => {
            return Err(ProtocolViolation::UnexpectedShape {
                field: "cached",
                detail: format!("expected a boolean, got {other}"),
            }
            .into());
        }
    };
    let artifact = ChartArtifact::from_markup(svg, generated_at)
        .inspect_err(|violation| warn!(%violation, "chart reply rejected"))?
        .with_cached(cached);
    Ok(artifact)
}
