use chrono::Utc;
use tracing::{debug, warn};

use crate::core::{ChartArtifact, ChartParameters, ParameterInput};
use crate::error::{WorkflowError, WorkflowResult};
use crate::transport::ChartService;

use super::{ChartWorkflow, classify_chart_response};

impl<S: ChartService> ChartWorkflow<S> {
    /// Replaces chart parameters; dimensions are clamped into range.
    pub fn set_parameters(&mut self, parameters: ChartParameters) {
        self.session.set_parameters(parameters);
    }

    /// Resolves raw control values into parameters.
    pub fn apply_parameter_input(&mut self, input: &ParameterInput) {
        self.session.apply_parameter_input(input);
    }

    /// Requests a chart for the current result and parameters.
    ///
    /// On success the artifact replaces the previous one and is rendered and
    /// enhanced for interaction. On failure the previous chart stays.
    pub async fn generate_chart(&mut self) -> WorkflowResult<ChartArtifact> {
        let (ticket, request) = match self.session.begin_generation() {
            Ok(started) => started,
            Err(err) => {
                if matches!(err, WorkflowError::GenerationUnavailable(_)) {
                    self.session.record_error(&err.user_message());
                }
                return Err(err);
            }
        };

        let outcome = match self.service.generate_chart(&request).await {
            Ok(response) => classify_chart_response(&response, Utc::now()),
            Err(err) => {
                warn!(error = %err, "chart request transport failure");
                Err(err.into())
            }
        };
        let rendered = outcome.as_ref().ok().map(|artifact| {
            self.interaction
                .render(artifact)
                .map_err(WorkflowError::from)
        });
        let outcome = match rendered {
            Some(Ok(mut chart)) => {
                self.interaction.enhance(&mut chart);
                self.rendered = Some(chart);
                outcome
            }
            Some(Err(err)) => Err(err),
            None => outcome,
        };

        let resolution = self.session.complete_generation(ticket, outcome.clone());
        debug!(?resolution, status = %self.session.status(), "chart request resolved");
        outcome
    }
}
