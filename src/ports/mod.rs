use crate::domain::document::CallGraphDocument;
use crate::domain::drawing::Drawing;
use crate::domain::error::LoadError;
use std::path::Path;

pub trait DocumentSource {
    fn load(&self) -> Result<CallGraphDocument, LoadError>;
}

pub trait DrawingExporter {
    fn export(&self, drawing: &Drawing, path: &Path) -> anyhow::Result<()>;
}

/// Shows a drawing interactively; returns once the user closes it.
pub trait Viewer {
    fn show(&self, drawing: &Drawing) -> anyhow::Result<()>;
}
