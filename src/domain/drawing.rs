//! A laid-out call graph ready for export.

use crate::domain::callgraph::{FileCallGraph, FunctionNode};
use crate::domain::layout::{Layout, Point};
use crate::domain::style::{Canvas, Palette};
use petgraph::visit::EdgeRef;

pub struct Drawing<'a> {
    pub graph: &'a FileCallGraph,
    pub layout: &'a Layout,
    pub palette: &'a Palette,
    pub canvas: &'a Canvas,
    pub title: String,
}

/// A node with its resolved position and colour.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedNode<'a> {
    pub node: &'a FunctionNode,
    pub position: Point,
    pub color: &'a str,
}

impl<'a> Drawing<'a> {
    /// Nodes in graph order. Nodes missing from the layout sit at the origin.
    pub fn placed_nodes(&self) -> Vec<PlacedNode<'a>> {
        let (file_graph, layout, palette): (&'a FileCallGraph, &'a Layout, &'a Palette) =
            (self.graph, self.layout, self.palette);
        let graph = &file_graph.graph;
        graph
            .node_indices()
            .map(move |idx| {
                let node = &graph[idx];
                PlacedNode {
                    node,
                    position: layout.position(idx).unwrap_or_default(),
                    color: palette.color_for(&node.file),
                }
            })
            .collect()
    }

    /// Edges as (source, target) node indices in insertion order.
    pub fn edge_indices(&self) -> Vec<(usize, usize)> {
        self.graph
            .graph
            .edge_references()
            .map(|e| (e.source().index(), e.target().index()))
            .collect()
    }

    /// Map a layout point in `[-1, 1]` onto the canvas, y pointing down.
    pub fn project(&self, p: Point) -> Point {
        let c = self.canvas;
        let top = c.margin + c.font_size * 2.5;
        let inner_w = (c.width - 2.0 * c.margin).max(1.0);
        let inner_h = (c.height - top - c.margin).max(1.0);
        Point::new(
            c.margin + (p.x + 1.0) / 2.0 * inner_w,
            top + (1.0 - p.y) / 2.0 * inner_h,
        )
    }
}
