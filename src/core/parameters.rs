use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "Data Visualization";
pub const DEFAULT_X_LABEL: &str = "Categories";
pub const DEFAULT_Y_LABEL: &str = "Values";
pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 400;
pub const WIDTH_RANGE: RangeInclusive<u32> = 300..=1200;
pub const HEIGHT_RANGE: RangeInclusive<u32> = 200..=800;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    #[default]
    Line,
    Bar,
    Pie,
}

impl ChartType {
    pub const ALL: [ChartType; 3] = [ChartType::Line, ChartType::Bar, ChartType::Pie];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Bar => "bar",
            Self::Pie => "pie",
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown chart type `{0}`")]
pub struct UnknownChartType(pub String);

impl FromStr for ChartType {
    type Err = UnknownChartType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "line" => Ok(Self::Line),
            "bar" => Ok(Self::Bar),
            "pie" => Ok(Self::Pie),
            other => Err(UnknownChartType(other.to_owned())),
        }
    }
}

/// Chart configuration edited by the user between generations.
///
/// An empty `unit` means "all units".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartParameters {
    pub unit: String,
    pub chart_type: ChartType,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub width: u32,
    pub height: u32,
}

impl Default for ChartParameters {
    fn default() -> Self {
        Self {
            unit: String::new(),
            chart_type: ChartType::Line,
            title: DEFAULT_TITLE.to_owned(),
            x_label: DEFAULT_X_LABEL.to_owned(),
            y_label: DEFAULT_Y_LABEL.to_owned(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl ChartParameters {
    /// Resolves raw form input into parameters.
    ///
    /// Unparsable dimensions fall back to the defaults and unknown chart types
    /// fall back to `line`; dimensions are clamped into their ranges.
    #[must_use]
    pub fn from_input(input: &ParameterInput) -> Self {
        let chart_type = input.chart_type.parse().unwrap_or_default();
        Self {
            unit: input.unit.trim().to_owned(),
            chart_type,
            title: input.title.clone(),
            x_label: input.x_label.clone(),
            y_label: input.y_label.clone(),
            width: clamp_dimension(parse_dimension(&input.width), DEFAULT_WIDTH, WIDTH_RANGE),
            height: clamp_dimension(parse_dimension(&input.height), DEFAULT_HEIGHT, HEIGHT_RANGE),
        }
    }

    /// Returns a copy with width and height clamped into their ranges.
    #[must_use]
    pub fn clamped(mut self) -> Self {
        self.width = clamp_dimension(Some(i64::from(self.width)), DEFAULT_WIDTH, WIDTH_RANGE);
        self.height = clamp_dimension(Some(i64::from(self.height)), DEFAULT_HEIGHT, HEIGHT_RANGE);
        self
    }

    #[must_use]
    pub fn is_all_units(&self) -> bool {
        self.unit.is_empty()
    }
}

/// Raw control values as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterInput {
    pub unit: String,
    pub chart_type: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub width: String,
    pub height: String,
}

impl Default for ParameterInput {
    fn default() -> Self {
        let defaults = ChartParameters::default();
        Self::from(&defaults)
    }
}

impl From<&ChartParameters> for ParameterInput {
    fn from(params: &ChartParameters) -> Self {
        Self {
            unit: params.unit.clone(),
            chart_type: params.chart_type.as_str().to_owned(),
            title: params.title.clone(),
            x_label: params.x_label.clone(),
            y_label: params.y_label.clone(),
            width: params.width.to_string(),
            height: params.height.to_string(),
        }
    }
}

/// Parses a dimension the way a numeric form field is read: leading integer
/// digits win, fractional input is truncated, anything else is `None`.
/// Digit runs too long for `i64` saturate.
fn parse_dimension(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return Some(value);
    }
    if let Ok(value) = trimmed.parse::<f64>() {
        if value.is_finite() {
            return Some(value.trunc() as i64);
        }
        return None;
    }

    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let prefix: String = digits.chars().take_while(char::is_ascii_digit).collect();
    // `as` saturates at the i64 bounds.
    prefix.parse::<f64>().ok().map(|value| (sign * value) as i64)
}

fn clamp_dimension(value: Option<i64>, fallback: u32, range: RangeInclusive<u32>) -> u32 {
    let Some(value) = value else {
        return fallback;
    };
    let min = i64::from(*range.start());
    let max = i64::from(*range.end());
    // The clamped value always fits in the u32 range bounds.
    u32::try_from(value.clamp(min, max)).unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::{ChartParameters, ChartType, ParameterInput, parse_dimension};

    #[test]
    fn parse_dimension_reads_leading_digits() {
        assert_eq!(parse_dimension("640"), Some(640));
        assert_eq!(parse_dimension(" 640px"), Some(640));
        assert_eq!(parse_dimension("640.9"), Some(640));
        assert_eq!(parse_dimension("-20"), Some(-20));
        assert_eq!(parse_dimension("wide"), None);
        assert_eq!(parse_dimension(""), None);
    }

    #[test]
    fn oversized_digit_runs_clamp_instead_of_falling_back() {
        assert_eq!(parse_dimension("99999999999999999999px"), Some(i64::MAX));
        assert_eq!(parse_dimension("-99999999999999999999px"), Some(i64::MIN));
        let input = ParameterInput {
            width: "99999999999999999999px".to_owned(),
            height: "-99999999999999999999px".to_owned(),
            ..ParameterInput::default()
        };
        let params = ChartParameters::from_input(&input);
        assert_eq!(params.width, 1200);
        assert_eq!(params.height, 200);
    }

    #[test]
    fn unknown_chart_type_error_names_the_input() {
        let err = "radar".parse::<ChartType>().expect_err("radar");
        assert_eq!(err.to_string(), "unknown chart type `radar`");
    }

    #[test]
    fn unparsable_dimensions_fall_back_to_defaults() {
        let input = ParameterInput {
            width: "abc".to_owned(),
            height: String::new(),
            ..ParameterInput::default()
        };
        let params = ChartParameters::from_input(&input);
        assert_eq!(params.width, 800);
        assert_eq!(params.height, 400);
    }

    #[test]
    fn out_of_range_dimensions_are_clamped() {
        let input = ParameterInput {
            width: "50".to_owned(),
            height: "5000".to_owned(),
            ..ParameterInput::default()
        };
        let params = ChartParameters::from_input(&input);
        assert_eq!(params.width, 300);
        assert_eq!(params.height, 800);
    }

    #[test]
    fn unknown_chart_type_falls_back_to_line() {
        let input = ParameterInput {
            chart_type: "radar".to_owned(),
            ..ParameterInput::default()
        };
        assert_eq!(ChartParameters::from_input(&input).chart_type, ChartType::Line);
        assert_eq!(" Bar ".parse::<ChartType>(), Ok(ChartType::Bar));
    }
}
