use super::{format_value, ChartDatum, Tooltip};
use serde::Serialize;

pub const BAR_CANVAS_WIDTH: f64 = 500.0;
pub const BAR_CANVAS_HEIGHT: f64 = 300.0;

/// Fraction of each slice occupied by its bar.
const BAR_FILL: f64 = 0.8;
const TOOLTIP_LIFT: f64 = 10.0;
const LABEL_OFFSET: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 20.0,
            bottom: 40.0,
            left: 40.0,
        }
    }
}

/// One bar in plot coordinates (origin at the plot's top-left corner).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarGeometry {
    pub label: String,
    pub value: f64,
    pub color: &'static str,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub label_x: f64,
    pub label_y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarLayout {
    pub width: f64,
    pub height: f64,
    pub margins: Margins,
    pub plot_width: f64,
    pub plot_height: f64,
    /// Largest value, floored at zero. Drawn as the top axis label.
    pub max_value: f64,
    pub scale: f64,
    pub bars: Vec<BarGeometry>,
}

impl BarLayout {
    pub fn new(data: &[ChartDatum]) -> Self {
        Self::with_canvas(data, BAR_CANVAS_WIDTH, BAR_CANVAS_HEIGHT, Margins::default())
    }

    pub fn with_canvas(data: &[ChartDatum], width: f64, height: f64, margins: Margins) -> Self {
        let plot_width = (width - margins.left - margins.right).max(0.0);
        let plot_height = (height - margins.top - margins.bottom).max(0.0);

        let max_value = data.iter().map(|d| d.value).fold(0.0_f64, f64::max);
        // The tallest bar spans the full plot height; all-zero data keeps a unit scale.
        let scale = plot_height / if max_value > 0.0 { max_value } else { 1.0 };
        let slice = plot_width / data.len().max(1) as f64;

        let bars = data
            .iter()
            .enumerate()
            .map(|(i, d)| {
                let bar_height = (d.value * scale).max(0.0);
                let slice_x = i as f64 * slice;
                BarGeometry {
                    label: d.label.clone(),
                    value: d.value,
                    color: d.color,
                    x: slice_x + slice * (1.0 - BAR_FILL) / 2.0,
                    y: plot_height - bar_height,
                    width: slice * BAR_FILL,
                    height: bar_height,
                    label_x: slice_x + slice / 2.0,
                    label_y: plot_height + LABEL_OFFSET,
                }
            })
            .collect();

        Self {
            width,
            height,
            margins,
            plot_width,
            plot_height,
            max_value,
            scale,
            bars,
        }
    }

    /// Tooltip centred above bar `index`, in canvas coordinates.
    pub fn tooltip(&self, index: usize) -> Option<Tooltip> {
        let bar = self.bars.get(index)?;
        Some(Tooltip {
            x: self.margins.left + bar.x + bar.width / 2.0,
            y: self.margins.top + bar.y - TOOLTIP_LIFT,
            content: format!("{}: {}", bar.label, format_value(bar.value)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::parse_chart_input;

    fn layout(labels: &str, values: &str) -> BarLayout {
        BarLayout::new(parse_chart_input(labels, values).data())
    }

    #[test]
    fn plot_area_subtracts_margins() {
        let layout = layout("a", "1");
        assert_eq!(layout.plot_width, 440.0);
        assert_eq!(layout.plot_height, 240.0);
    }

    #[test]
    fn bars_share_width_and_anchor_to_baseline() {
        let layout = layout("Dhaka, Chittagong, Sylhet, Rajshahi", "65, 42, 28, 15");
        assert_eq!(layout.max_value, 65.0);

        let first = &layout.bars[0];
        assert!((first.height - 240.0).abs() < 1e-9);
        assert!(first.y.abs() < 1e-9);
        assert!((first.width - 88.0).abs() < 1e-9);
        assert!((first.x - 11.0).abs() < 1e-9);
        assert!((first.label_x - 55.0).abs() < 1e-9);
        assert_eq!(first.label_y, 260.0);

        for bar in &layout.bars {
            assert!((bar.y + bar.height - layout.plot_height).abs() < 1e-9);
        }
    }

    #[test]
    fn all_zero_values_draw_flat_bars() {
        let layout = layout("a, b", "0, 0");
        assert_eq!(layout.scale, 240.0);
        assert!(layout.bars.iter().all(|b| b.height == 0.0));
    }

    #[test]
    fn small_maximum_still_reaches_top() {
        let layout = layout("a, b", "0.5, 0.25");
        assert!((layout.bars[0].height - layout.plot_height).abs() < 1e-9);
        assert!((layout.bars[1].height - layout.plot_height / 2.0).abs() < 1e-9);
    }

    #[test]
    fn negative_values_clamp_to_zero_height() {
        let layout = layout("a, b", "-5, 10");
        assert_eq!(layout.bars[0].height, 0.0);
        assert_eq!(layout.bars[0].y, layout.plot_height);
    }

    #[test]
    fn tooltip_sits_above_bar_centre() {
        let layout = layout("a, b", "10, 5");
        let tip = layout.tooltip(1).unwrap();
        assert_eq!(tip.content, "b: 5");
        assert!((tip.x - (40.0 + 330.0)).abs() < 1e-9);
        assert!((tip.y - (20.0 + 120.0 - 10.0)).abs() < 1e-9);
        assert!(layout.tooltip(2).is_none());
    }
}
