use chrono::{DateTime, Utc};

use crate::error::ProtocolViolation;

use super::svg::parse_svg_document;

/// Outcome of processing one uploaded document: the extracted unit series and
/// the opaque handle the service uses to find the processed data again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingResult {
    units: Vec<String>,
    data_file: String,
}

impl ProcessingResult {
    /// Builds a result, rejecting an empty data-file handle.
    ///
    /// Unit order is preserved; blank unit identifiers are dropped.
    pub fn new(units: Vec<String>, data_file: impl Into<String>) -> Result<Self, ProtocolViolation> {
        let data_file = data_file.into();
        if data_file.trim().is_empty() {
            return Err(ProtocolViolation::MissingField("data_file"));
        }
        let units = units
            .into_iter()
            .filter(|unit| !unit.trim().is_empty())
            .collect();
        Ok(Self { units, data_file })
    }

    #[must_use]
    pub fn units(&self) -> &[String] {
        &self.units
    }

    #[must_use]
    pub fn data_file(&self) -> &str {
        &self.data_file
    }

    #[must_use]
    pub fn has_units(&self) -> bool {
        !self.units.is_empty()
    }

    /// `true` for the empty "all units" selection or a listed unit.
    #[must_use]
    pub fn accepts_unit(&self, unit: &str) -> bool {
        unit.is_empty() || self.units.iter().any(|known| known == unit)
    }
}

/// A rendered chart returned by the generation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartArtifact {
    svg_markup: String,
    generated_at: DateTime<Utc>,
    cached: bool,
}

impl ChartArtifact {
    /// Accepts markup only when it parses as XML with an `<svg>` root element.
    pub fn from_markup(
        svg_markup: impl Into<String>,
        generated_at: DateTime<Utc>,
    ) -> Result<Self, ProtocolViolation> {
        let svg_markup = svg_markup.into();
        parse_svg_document(&svg_markup)?;
        Ok(Self {
            svg_markup,
            generated_at,
            cached: false,
        })
    }

    #[must_use]
    pub fn with_cached(mut self, cached: bool) -> Self {
        self.cached = cached;
        self
    }

    #[must_use]
    pub fn svg_markup(&self) -> &str {
        &self.svg_markup
    }

    #[must_use]
    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// Whether the service served this chart from its render cache.
    #[must_use]
    pub fn cached(&self) -> bool {
        self.cached
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{ChartArtifact, ProcessingResult};
    use crate::error::ProtocolViolation;

    #[test]
    fn empty_data_file_is_rejected() {
        let err = ProcessingResult::new(vec!["mass".to_owned()], "  ").expect_err("empty handle");
        assert_eq!(err, ProtocolViolation::MissingField("data_file"));
    }

    #[test]
    fn unit_order_is_preserved_and_blanks_dropped() {
        let result = ProcessingResult::new(
            vec!["length".to_owned(), String::new(), "mass".to_owned()],
            "abc.json",
        )
        .expect("valid result");
        assert_eq!(result.units(), ["length".to_owned(), "mass".to_owned()]);
        assert!(result.accepts_unit(""));
        assert!(result.accepts_unit("mass"));
        assert!(!result.accepts_unit("volume"));
    }

    #[test]
    fn artifact_requires_svg_root() {
        let ok = ChartArtifact::from_markup(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"/>"#,
            Utc::now(),
        );
        assert!(ok.is_ok());

        let err = ChartArtifact::from_markup("<html></html>", Utc::now()).expect_err("not svg");
        assert!(matches!(err, ProtocolViolation::MalformedSvg(_)));

        let err = ChartArtifact::from_markup("<svg", Utc::now()).expect_err("not xml");
        assert!(matches!(err, ProtocolViolation::MalformedSvg(_)));
    }
}
