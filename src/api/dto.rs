use serde::{Deserialize, Serialize};
use crate::domain::drawing::Drawing;

#[derive(Debug, Serialize, Deserialize)]
pub struct GraphDto {
    pub title: String,
    pub target_file: String,
    pub nodes: Vec<NodeDto>,
    pub edges: Vec<EdgeDto>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NodeDto {
    pub id: String,
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    pub color: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EdgeDto {
    pub from: String,
    pub to: String,
}

impl From<&Drawing<'_>> for GraphDto {
    fn from(drawing: &Drawing<'_>) -> Self {
        // Layout coordinates, not canvas pixels
        let nodes = drawing
            .placed_nodes()
            .into_iter()
            .map(|p| NodeDto {
                id: p.node.name.clone(),
                file: p.node.file.clone(),
                line: p.node.line,
                color: p.color.to_string(),
                x: p.position.x,
                y: p.position.y,
            })
            .collect();

        let edges = drawing
            .graph
            .edges()
            .into_iter()
            .map(|(from, to)| EdgeDto {
                from: from.to_string(),
                to: to.to_string(),
            })
            .collect();

        GraphDto {
            title: drawing.title.clone(),
            target_file: drawing.graph.filename.clone(),
            nodes,
            edges,
        }
    }
}
