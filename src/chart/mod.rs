//! Chart geometry
//!
//! Turns comma-separated label/value input into bar or pie primitives on a
//! fixed canvas, maps pointer events to tooltips, and renders SVG markup.
//! Everything here is pure; the stat chart panel owns the state.

pub mod bar;
pub mod pie;
pub mod svg;

use serde::{Deserialize, Serialize};

pub use bar::{BarGeometry, BarLayout, Margins};
pub use pie::{PieLayout, Wedge};

pub const PALETTE: [&str; 6] = ["#22d3ee", "#60a5fa", "#a78bfa", "#f472b6", "#fb923c", "#a3e635"];

pub const COUNT_MISMATCH: &str = "Number of labels and values must match.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDatum {
    pub label: String,
    pub value: f64,
    pub color: &'static str,
}

/// Result of parsing the two comma-separated inputs.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedChart {
    /// Both inputs are blank; nothing to draw and nothing to report.
    Empty,
    Invalid(String),
    Data(Vec<ChartDatum>),
}

impl ParsedChart {
    pub fn data(&self) -> &[ChartDatum] {
        match self {
            Self::Data(data) => data,
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Invalid(message) => Some(message),
            _ => None,
        }
    }
}

/// Parse labels and values. Blank labels are dropped and so are values
/// that are not numbers; the surviving counts must match.
pub fn parse_chart_input(labels: &str, values: &str) -> ParsedChart {
    let labels: Vec<&str> = labels
        .split(',')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    let values: Vec<f64> = values
        .split(',')
        .filter_map(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .collect();

    if labels.is_empty() && values.is_empty() {
        return ParsedChart::Empty;
    }
    if labels.len() != values.len() {
        return ParsedChart::Invalid(COUNT_MISMATCH.to_string());
    }

    ParsedChart::Data(
        labels
            .into_iter()
            .zip(values)
            .enumerate()
            .map(|(i, (label, value))| ChartDatum {
                label: label.to_string(),
                value,
                color: PALETTE[i % PALETTE.len()],
            })
            .collect(),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Bar,
    Pie,
}

impl std::str::FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bar" => Ok(Self::Bar),
            "pie" => Ok(Self::Pie),
            other => Err(format!("Unknown chart type: {}", other)),
        }
    }
}

/// Tooltip anchor in canvas coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub x: f64,
    pub y: f64,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Pointer over primitive `index`, at canvas position `(x, y)`.
    Move { index: usize, x: f64, y: f64 },
    Leave,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChartLayout {
    Bar(BarLayout),
    Pie(PieLayout),
}

impl ChartLayout {
    pub fn build(kind: ChartKind, data: &[ChartDatum]) -> Self {
        match kind {
            ChartKind::Bar => Self::Bar(BarLayout::new(data)),
            ChartKind::Pie => Self::Pie(PieLayout::new(data)),
        }
    }

    pub fn tooltip(&self, event: PointerEvent) -> Option<Tooltip> {
        match event {
            PointerEvent::Leave => None,
            PointerEvent::Move { index, x, y } => match self {
                Self::Bar(layout) => layout.tooltip(index),
                Self::Pie(layout) => layout.tooltip(index, x, y),
            },
        }
    }

    pub fn to_svg(&self) -> String {
        match self {
            Self::Bar(layout) => svg::render_bar(layout),
            Self::Pie(layout) => svg::render_pie(layout),
        }
    }
}

/// Forward a pointer event to `sink`; a leave always clears.
pub fn dispatch_hover<F>(layout: &ChartLayout, event: PointerEvent, sink: &mut F)
where
    F: FnMut(Option<Tooltip>),
{
    sink(layout.tooltip(event));
}

pub(crate) fn format_value(value: f64) -> String {
    format!("{}", value + 0.0)
}

/// Coordinate text for SVG paths: three decimals, no trailing zeros.
pub(crate) fn coord(value: f64) -> String {
    format_value((value * 1000.0).round() / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_and_assigns_palette() {
        let parsed = parse_chart_input(" Dhaka, Chittagong ,, Sylhet", "65, 42, 28");
        let data = parsed.data();
        assert_eq!(data.len(), 3);
        assert_eq!(data[1].label, "Chittagong");
        assert_eq!(data[2].value, 28.0);
        assert_eq!(data[0].color, "#22d3ee");
        assert_eq!(data[2].color, "#a78bfa");
    }

    #[test]
    fn palette_cycles() {
        let labels = (0..8).map(|i| format!("L{}", i)).collect::<Vec<_>>().join(",");
        let values = (0..8).map(|i| i.to_string()).collect::<Vec<_>>().join(",");
        let parsed = parse_chart_input(&labels, &values);
        assert_eq!(parsed.data()[6].color, PALETTE[0]);
        assert_eq!(parsed.data()[7].color, PALETTE[1]);
    }

    #[test]
    fn non_numeric_values_are_dropped_before_count_check() {
        let parsed = parse_chart_input("a, b", "1, x, 2");
        assert_eq!(parsed.data().len(), 2);

        let parsed = parse_chart_input("a, b, c", "1, x, 2");
        assert_eq!(parsed.error(), Some(COUNT_MISMATCH));
        assert!(parsed.data().is_empty());
    }

    #[test]
    fn blank_inputs_are_empty_not_invalid() {
        assert_eq!(parse_chart_input("  ", ""), ParsedChart::Empty);
        assert_eq!(parse_chart_input(",,", "nope"), ParsedChart::Empty);
    }

    #[test]
    fn values_format_like_plain_numbers() {
        assert_eq!(format_value(65.0), "65");
        assert_eq!(format_value(1.5), "1.5");
        assert_eq!(format_value(-0.0), "0");
        assert_eq!(coord(149.99999), "150");
    }

    #[test]
    fn leave_clears_sink() {
        let data = parse_chart_input("a,b", "1,2");
        let layout = ChartLayout::build(ChartKind::Bar, data.data());
        let mut seen = Vec::new();
        let mut sink = |t: Option<Tooltip>| seen.push(t);

        dispatch_hover(&layout, PointerEvent::Move { index: 1, x: 0.0, y: 0.0 }, &mut sink);
        dispatch_hover(&layout, PointerEvent::Leave, &mut sink);

        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].as_ref().map(|t| t.content.as_str()), Some("b: 2"));
        assert!(seen[1].is_none());
    }

    #[test]
    fn chart_kind_parses() {
        assert_eq!("Pie".parse::<ChartKind>(), Ok(ChartKind::Pie));
        assert!("donut".parse::<ChartKind>().is_err());
    }
}
