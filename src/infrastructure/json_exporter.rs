use crate::api::dto::GraphDto;
use crate::domain::drawing::Drawing;
use crate::ports::DrawingExporter;
use anyhow::Context;
use std::path::Path;

/// Writes nodes with layout coordinates and edges as pretty JSON.
pub struct JsonExporter;

impl DrawingExporter for JsonExporter {
    fn export(&self, drawing: &Drawing, path: &Path) -> anyhow::Result<()> {
        let dto = GraphDto::from(drawing);
        let json = serde_json::to_string_pretty(&dto).context("Failed to serialize drawing")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write JSON to {}", path.display()))
    }
}
