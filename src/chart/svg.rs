use super::{coord, format_value, BarLayout, PieLayout};
use std::fmt::Write;

const AXIS_STROKE: &str = "#4b5563";
const AXIS_TEXT: &str = "#9ca3af";

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render_bar(layout: &BarLayout) -> String {
    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}">"#,
        coord(layout.width),
        coord(layout.height)
    );
    let _ = write!(
        svg,
        r#"<g transform="translate({}, {})">"#,
        coord(layout.margins.left),
        coord(layout.margins.top)
    );

    for bar in &layout.bars {
        let _ = write!(
            svg,
            r#"<g><rect x="{}" y="{}" width="{}" height="{}" fill="{}"><title>{}: {}</title></rect>"#,
            coord(bar.x),
            coord(bar.y),
            coord(bar.width),
            coord(bar.height),
            bar.color,
            escape(&bar.label),
            format_value(bar.value)
        );
        let _ = write!(
            svg,
            r#"<text x="{}" y="{}" text-anchor="middle" fill="{}" font-size="12">{}</text></g>"#,
            coord(bar.label_x),
            coord(bar.label_y),
            AXIS_TEXT,
            escape(&bar.label)
        );
    }

    let _ = write!(
        svg,
        r#"<line x1="0" y1="0" x2="0" y2="{h}" stroke="{}"/><text x="-10" y="0" text-anchor="end" fill="{t}" font-size="12">{}</text><text x="-10" y="{h}" text-anchor="end" fill="{t}" font-size="12">0</text>"#,
        AXIS_STROKE,
        format_value(layout.max_value),
        h = coord(layout.plot_height),
        t = AXIS_TEXT
    );

    svg.push_str("</g></svg>");
    svg
}

pub fn render_pie(layout: &PieLayout) -> String {
    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}">"#,
        coord(layout.width),
        coord(layout.height)
    );
    for wedge in &layout.wedges {
        let _ = write!(
            svg,
            r#"<path d="{}" fill="{}"><title>{}: {} ({:.1}%)</title></path>"#,
            wedge.path,
            wedge.color,
            escape(&wedge.label),
            format_value(wedge.value),
            wedge.percentage
        );
    }
    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::parse_chart_input;

    #[test]
    fn bar_svg_has_one_rect_per_datum_and_axis_labels() {
        let parsed = parse_chart_input("Dhaka, Sylhet", "65, 28");
        let svg = render_bar(&BarLayout::new(parsed.data()));

        assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 500 300">"#));
        assert!(svg.contains(r#"<g transform="translate(40, 20)">"#));
        assert_eq!(svg.matches("<rect ").count(), 2);
        assert!(svg.contains(">65</text>"));
        assert!(svg.ends_with("</g></svg>"));
    }

    #[test]
    fn labels_are_escaped() {
        let parsed = parse_chart_input("A&B, <x>", "1, 2");
        let svg = render_pie(&PieLayout::new(parsed.data()));
        assert!(svg.contains("A&amp;B: 1"));
        assert!(svg.contains("&lt;x&gt;"));
        assert_eq!(svg.matches("<path ").count(), 2);
    }

    #[test]
    fn empty_pie_is_bare_canvas() {
        let parsed = parse_chart_input("a", "0");
        let svg = render_pie(&PieLayout::new(parsed.data()));
        assert_eq!(svg, r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 300 300"></svg>"#);
    }
}
