pub mod data_file;
pub mod document;
pub mod parameters;
mod svg;
pub mod types;

pub use data_file::{DataFileCatalog, DataFileEntry};
pub use document::Document;
pub use parameters::{ChartParameters, ChartType, ParameterInput};
pub use types::{ChartArtifact, ProcessingResult};

pub(crate) use svg::parse_svg_document;
