//! SVG Renderer
//!
//! Draws a laid-out call graph as a standalone SVG document.

use crate::domain::drawing::Drawing;
use crate::domain::layout::Point;
use crate::ports::DrawingExporter;
use anyhow::Context;
use std::path::Path;

pub struct SvgRenderer;

impl DrawingExporter for SvgRenderer {
    fn export(&self, drawing: &Drawing, path: &Path) -> anyhow::Result<()> {
        std::fs::write(path, Self::to_svg(drawing))
            .with_context(|| format!("Failed to write SVG to {}", path.display()))
    }
}

impl SvgRenderer {
    /// Convert a drawing to an SVG string.
    pub fn to_svg(drawing: &Drawing) -> String {
        let c = drawing.canvas;
        let r = c.node_radius;
        let title = escape_xml(&drawing.title);
        let mut lines = Vec::new();

        lines.push(format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
            w = c.width,
            h = c.height
        ));
        lines.push(format!("  <title>{}</title>", title));
        lines.push("  <defs>".to_string());
        lines.push(
            "    <marker id=\"arrow\" viewBox=\"0 0 10 10\" refX=\"10\" refY=\"5\" markerWidth=\"8\" markerHeight=\"8\" orient=\"auto-start-reverse\">"
                .to_string(),
        );
        lines.push("      <path d=\"M 0 0 L 10 5 L 0 10 z\" fill=\"#555555\"/>".to_string());
        lines.push("    </marker>".to_string());
        lines.push("  </defs>".to_string());
        lines.push(format!(
            "  <rect width=\"{}\" height=\"{}\" fill=\"white\"/>",
            c.width, c.height
        ));
        lines.push(format!(
            "  <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-family=\"Helvetica, Arial, sans-serif\" font-size=\"{:.1}\">{}</text>",
            c.width / 2.0,
            c.margin,
            c.font_size * 1.6,
            title
        ));

        let placed = drawing.placed_nodes();
        let centres: Vec<Point> = placed.iter().map(|n| drawing.project(n.position)).collect();

        lines.push("  <g stroke=\"#555555\" stroke-width=\"1.2\" fill=\"none\">".to_string());
        for (from, to) in drawing.edge_indices() {
            let (a, b) = (centres[from], centres[to]);
            if from == to {
                lines.push(format!(
                    "    <path d=\"M {:.1} {:.1} C {:.1} {:.1} {:.1} {:.1} {:.1} {:.1}\" marker-end=\"url(#arrow)\"/>",
                    a.x - r * 0.6,
                    a.y - r * 0.8,
                    a.x - r * 1.6,
                    a.y - r * 3.0,
                    a.x + r * 1.6,
                    a.y - r * 3.0,
                    a.x + r * 0.6,
                    a.y - r * 0.8
                ));
                continue;
            }
            let (start, end) = trim_segment(a, b, r);
            lines.push(format!(
                "    <line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" marker-end=\"url(#arrow)\"/>",
                start.x, start.y, end.x, end.y
            ));
        }
        lines.push("  </g>".to_string());

        lines.push(format!(
            "  <g font-family=\"Helvetica, Arial, sans-serif\" font-size=\"{:.1}\" text-anchor=\"middle\">",
            c.font_size
        ));
        for (node, centre) in placed.iter().zip(&centres) {
            lines.push(format!(
                "    <circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"{:.1}\" fill=\"{}\" stroke=\"#333333\"><title>{}</title></circle>",
                centre.x,
                centre.y,
                r,
                escape_xml(node.color),
                escape_xml(&node.node.describe())
            ));
            lines.push(format!(
                "    <text x=\"{:.1}\" y=\"{:.1}\" dominant-baseline=\"central\">{}</text>",
                centre.x,
                centre.y,
                escape_xml(&node.node.name)
            ));
        }
        lines.push("  </g>".to_string());
        lines.push("</svg>".to_string());

        lines.join("\n")
    }
}

/// Clip the segment a -> b so it starts and ends on the node circles.
fn trim_segment(a: Point, b: Point, radius: f64) -> (Point, Point) {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len <= 2.0 * radius {
        return (a, b);
    }
    let (ux, uy) = (dx / len, dy / len);
    (
        Point::new(a.x + ux * radius, a.y + uy * radius),
        Point::new(b.x - ux * radius, b.y - uy * radius),
    )
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
