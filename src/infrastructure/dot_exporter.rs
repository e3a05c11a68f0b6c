//! DOT Exporter
//!
//! Exports a drawing as Graphviz DOT with pinned node positions, so
//! `neato -n` reproduces the spring layout.

use crate::domain::drawing::Drawing;
use crate::ports::DrawingExporter;
use anyhow::Context;
use std::path::Path;

pub struct DotExporter;

impl DrawingExporter for DotExporter {
    fn export(&self, drawing: &Drawing, path: &Path) -> anyhow::Result<()> {
        std::fs::write(path, Self::to_dot(drawing))
            .with_context(|| format!("Failed to write DOT to {}", path.display()))
    }
}

impl DotExporter {
    /// Convert a drawing to a DOT string.
    pub fn to_dot(drawing: &Drawing) -> String {
        let c = drawing.canvas;
        let mut lines = Vec::new();

        lines.push("digraph CallGraph {".to_string());
        lines.push(format!("    label=\"{}\";", Self::escape_label(&drawing.title)));
        lines.push("    labelloc=t;".to_string());
        lines.push("    layout=neato;".to_string());
        lines.push("    overlap=false;".to_string());
        lines.push(format!(
            "    bb=\"0,0,{:.0},{:.0}\";",
            c.width, c.height
        ));
        lines.push(format!(
            "    node [shape=circle, style=filled, fontname=\"Helvetica\", fontsize={:.0}, fixedsize=false];",
            c.font_size
        ));
        lines.push("    edge [color=\"#555555\", arrowsize=0.7];".to_string());
        lines.push("".to_string());

        // Graphviz y grows upward
        for placed in drawing.placed_nodes() {
            let p = drawing.project(placed.position);
            lines.push(format!(
                "    \"{}\" [label=\"{}\", fillcolor=\"{}\", pos=\"{:.1},{:.1}!\"];",
                Self::escape_label(&placed.node.name),
                Self::escape_label(&placed.node.name),
                Self::escape_label(placed.color),
                p.x,
                c.height - p.y
            ));
        }

        lines.push("".to_string());

        for (caller, callee) in drawing.graph.edges() {
            lines.push(format!(
                "    \"{}\" -> \"{}\";",
                Self::escape_label(caller),
                Self::escape_label(callee)
            ));
        }

        lines.push("}".to_string());

        lines.join("\n")
    }

    fn escape_label(label: &str) -> String {
        label
            .replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\n', "\\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::callgraph::FileCallGraph;
    use crate::domain::document::CallGraphDocument;
    use crate::domain::layout::SpringLayout;
    use crate::domain::style::{title_for, Canvas, Palette};

    #[test]
    fn test_to_dot() {
        let doc: CallGraphDocument = serde_json::from_str(
            r#"{"functions": {
                "main": {"file": "ingestion.py", "calls": ["foo", "print"]},
                "foo": {"file": "ingestion.py", "calls": []},
                "other": {"file": "x.py", "calls": ["main"]}
            }}"#,
        )
        .unwrap();
        let graph = FileCallGraph::from_document(&doc, "ingestion.py");
        let layout = SpringLayout::default().compute(&graph.graph);
        let palette = Palette::for_target("ingestion.py");
        let canvas = Canvas::default();
        let drawing = Drawing {
            graph: &graph,
            layout: &layout,
            palette: &palette,
            canvas: &canvas,
            title: title_for("ingestion.py"),
        };

        let dot = DotExporter::to_dot(&drawing);
        assert!(dot.contains("digraph CallGraph"));
        assert!(dot.contains("label=\"Call Graph for Functions in ingestion.py\""));
        assert!(dot.contains("\"main\" -> \"foo\";"));
        assert!(!dot.contains("print"));
        assert!(!dot.contains("\"other\""));
        assert_eq!(dot.matches("fillcolor=\"skyblue\"").count(), 2);
        assert_eq!(dot.matches("!\"").count(), 2);
    }

    #[test]
    fn test_escape_label() {
        assert_eq!(DotExporter::escape_label("a\"b"), "a\\\"b");
        assert_eq!(DotExporter::escape_label("a\\b"), "a\\\\b");
    }

    #[test]
    fn test_palette_colour_is_escaped() {
        let doc: CallGraphDocument = serde_json::from_str(
            r#"{"functions": {"main": {"file": "ingestion.py", "calls": []}}}"#,
        )
        .unwrap();
        let graph = FileCallGraph::from_document(&doc, "ingestion.py");
        let layout = SpringLayout::default().compute(&graph.graph);
        let palette = Palette::for_target("x.py").with_default("red\" shape=\"box");
        let canvas = Canvas::default();
        let drawing = Drawing {
            graph: &graph,
            layout: &layout,
            palette: &palette,
            canvas: &canvas,
            title: title_for("ingestion.py"),
        };

        let dot = DotExporter::to_dot(&drawing);
        assert!(dot.contains(r#"fillcolor="red\" shape=\"box""#), "{}", dot);
        assert!(!dot.contains(r#"shape="box""#));
    }
}
