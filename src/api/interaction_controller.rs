use crate::interaction::TooltipState;
use crate::transport::ChartService;

use super::ChartWorkflow;

impl<S: ChartService> ChartWorkflow<S> {
    /// Forwards a pointer-over on a data shape; `false` when nothing reacted.
    pub fn pointer_over(&mut self, shape: usize, page_x: f64, page_y: f64) -> bool {
        self.rendered
            .as_mut()
            .is_some_and(|chart| chart.pointer_over(shape, page_x, page_y))
    }

    pub fn pointer_move(&mut self, page_x: f64, page_y: f64) -> bool {
        self.rendered
            .as_mut()
            .is_some_and(|chart| chart.pointer_move(page_x, page_y))
    }

    pub fn pointer_out(&mut self, shape: usize) -> bool {
        self.rendered
            .as_mut()
            .is_some_and(|chart| chart.pointer_out(shape))
    }

    /// Data shape under a point in SVG user units.
    #[must_use]
    pub fn hit_test(&self, x: f64, y: f64) -> Option<usize> {
        self.rendered.as_ref()?.hit_test(x, y)
    }

    #[must_use]
    pub fn tooltip(&self) -> Option<&TooltipState> {
        self.rendered.as_ref()?.tooltip()
    }

    /// Returns the new factor, or `None` without a chart.
    pub fn zoom_in(&mut self) -> Option<f64> {
        self.rendered.as_mut().map(|chart| chart.zoom_in())
    }

    pub fn zoom_out(&mut self) -> Option<f64> {
        self.rendered.as_mut().map(|chart| chart.zoom_out())
    }

    pub fn reset_zoom(&mut self) {
        if let Some(chart) = self.rendered.as_mut() {
            chart.reset_zoom();
        }
    }

    /// Re-runs enhancement on the current chart; attaches nothing when it is
    /// already enhanced.
    pub fn enhance_chart(&mut self) -> usize {
        match self.rendered.as_mut() {
            Some(chart) => self.interaction.enhance(chart),
            None => 0,
        }
    }
}
