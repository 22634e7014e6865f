use super::{coord, format_value, ChartDatum, Tooltip};
use serde::Serialize;
use std::f64::consts::{PI, TAU};

pub const PIE_CANVAS_SIZE: f64 = 300.0;

const TOOLTIP_LIFT: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Wedge {
    pub label: String,
    pub value: f64,
    pub color: &'static str,
    /// Radians clockwise from 12 o'clock.
    pub start_angle: f64,
    pub end_angle: f64,
    pub percentage: f64,
    pub large_arc: bool,
    pub path: String,
}

impl Wedge {
    pub fn span(&self) -> f64 {
        self.end_angle - self.start_angle
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieLayout {
    pub width: f64,
    pub height: f64,
    pub radius: f64,
    pub total: f64,
    pub wedges: Vec<Wedge>,
}

impl PieLayout {
    pub fn new(data: &[ChartDatum]) -> Self {
        Self::with_canvas(data, PIE_CANVAS_SIZE, PIE_CANVAS_SIZE)
    }

    /// Wedges for the positive values only. A non-positive total draws nothing.
    pub fn with_canvas(data: &[ChartDatum], width: f64, height: f64) -> Self {
        let radius = width.min(height) / 2.0;
        let total: f64 = data.iter().map(|d| d.value).filter(|v| *v > 0.0).sum();

        let mut wedges = Vec::new();
        if total > 0.0 {
            let mut start = 0.0;
            for d in data.iter().filter(|d| d.value > 0.0) {
                let span = d.value / total * TAU;
                let end = start + span;
                wedges.push(Wedge {
                    label: d.label.clone(),
                    value: d.value,
                    color: d.color,
                    start_angle: start,
                    end_angle: end,
                    percentage: d.value / total * 100.0,
                    large_arc: span > PI,
                    path: wedge_path(radius, start, end),
                });
                start = end;
            }
        }

        Self {
            width,
            height,
            radius,
            total,
            wedges,
        }
    }

    /// Tooltip for wedge `index`, lifted above the pointer.
    pub fn tooltip(&self, index: usize, pointer_x: f64, pointer_y: f64) -> Option<Tooltip> {
        let wedge = self.wedges.get(index)?;
        Some(Tooltip {
            x: pointer_x,
            y: pointer_y - TOOLTIP_LIFT,
            content: format!(
                "{}: {} ({:.1}%)",
                wedge.label,
                format_value(wedge.value),
                wedge.percentage
            ),
        })
    }
}

fn point_on_circle(radius: f64, angle: f64) -> (f64, f64) {
    let a = angle - PI / 2.0;
    (radius + radius * a.cos(), radius + radius * a.sin())
}

/// Center, line to the arc start, clockwise arc to the arc end, close.
fn wedge_path(radius: f64, start: f64, end: f64) -> String {
    let r = coord(radius);
    let (sx, sy) = point_on_circle(radius, start);
    let (ex, ey) = point_on_circle(radius, end);
    let span = end - start;

    // An arc whose endpoints coincide draws nothing, so a full circle is
    // split at its midpoint.
    if (span - TAU).abs() < 1e-9 {
        let (mx, my) = point_on_circle(radius, start + PI);
        return format!(
            "M {r},{r} L {},{} A {r},{r} 0 0 1 {},{} A {r},{r} 0 0 1 {},{} Z",
            coord(sx),
            coord(sy),
            coord(mx),
            coord(my),
            coord(ex),
            coord(ey),
            r = r
        );
    }

    format!(
        "M {r},{r} L {},{} A {r},{r} 0 {} 1 {},{} Z",
        coord(sx),
        coord(sy),
        u8::from(span > PI),
        coord(ex),
        coord(ey),
        r = r
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::parse_chart_input;

    fn layout(labels: &str, values: &str) -> PieLayout {
        PieLayout::new(parse_chart_input(labels, values).data())
    }

    #[test]
    fn spans_cover_full_circle() {
        let layout = layout("a, b, c", "1, 2, 3");
        let sum: f64 = layout.wedges.iter().map(Wedge::span).sum();
        assert!((sum - TAU).abs() < 1e-9);
        assert_eq!(layout.radius, 150.0);
        assert_eq!(layout.wedges[0].start_angle, 0.0);
    }

    #[test]
    fn first_wedge_starts_at_twelve_oclock() {
        let layout = layout("a, b", "1, 1");
        assert_eq!(layout.wedges[0].path, "M 150,150 L 150,0 A 150,150 0 0 1 150,300 Z");
        assert_eq!(layout.wedges[1].path, "M 150,150 L 150,300 A 150,150 0 0 1 150,0 Z");
    }

    #[test]
    fn large_arc_flag_past_half() {
        let layout = layout("big, small", "3, 1");
        assert!(layout.wedges[0].large_arc);
        assert!(layout.wedges[0].path.contains(" 0 1 1 "));
        assert!(!layout.wedges[1].large_arc);
    }

    #[test]
    fn zero_total_draws_nothing() {
        let layout = layout("a, b", "0, 0");
        assert_eq!(layout.total, 0.0);
        assert!(layout.wedges.is_empty());
    }

    #[test]
    fn non_positive_values_are_skipped() {
        let layout = layout("a, b, c", "-4, 0, 5");
        assert_eq!(layout.wedges.len(), 1);
        assert_eq!(layout.wedges[0].label, "c");
        assert_eq!(layout.wedges[0].percentage, 100.0);
    }

    #[test]
    fn single_wedge_is_a_visible_full_circle() {
        let layout = layout("only", "7");
        let path = &layout.wedges[0].path;
        assert_eq!(path.matches(" A ").count(), 2);
        assert!(path.contains("150,300"));
    }

    #[test]
    fn tooltip_reports_percentage_at_pointer() {
        let layout = layout("Dhaka, Sylhet", "65, 35");
        let tip = layout.tooltip(0, 120.0, 80.0).unwrap();
        assert_eq!(tip.content, "Dhaka: 65 (65.0%)");
        assert_eq!((tip.x, tip.y), (120.0, 70.0));
        assert!(layout.tooltip(5, 0.0, 0.0).is_none());
    }
}
