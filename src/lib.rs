//! doc-chart-rs: client-side document-to-chart workflow.
//!
//! A document is validated and uploaded to a processing service, which
//! extracts named unit series. The user then configures and requests SVG
//! charts of those units, explores them with tooltips and zoom, and exports
//! them as SVG or PNG. Everything runs against one explicit session owned by
//! [`ChartWorkflow`].

pub mod api;
pub mod core;
pub mod error;
pub mod export;
pub mod interaction;
pub mod telemetry;
pub mod transport;

pub use api::{ChartSession, ChartWorkflow, SessionStatus, WorkflowConfig};
pub use error::{ExportError, ExportResult, WorkflowError, WorkflowResult};
