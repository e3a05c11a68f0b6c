use crate::domain::document::CallGraphDocument;
use crate::domain::error::LoadError;
use crate::ports::DocumentSource;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

pub const DEFAULT_INPUT: &str = "call_graph.json";

/// Reads a call graph document from a JSON file.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn parse(&self, text: &str) -> Result<CallGraphDocument, LoadError> {
        serde_json::from_str(text).map_err(|e| LoadError::from_json(self.path.clone(), e))
    }
}

impl DocumentSource for JsonFileSource {
    fn load(&self) -> Result<CallGraphDocument, LoadError> {
        tracing::debug!(path = %self.path.display(), "loading call graph");
        let text = fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => LoadError::NotFound {
                path: self.path.clone(),
            },
            _ => LoadError::Read {
                path: self.path.clone(),
                source: e,
            },
        })?;

        let doc = self.parse(&text)?;
        if let Some(expected) = doc.total_functions {
            if expected != doc.functions.len() {
                tracing::warn!(
                    expected,
                    found = doc.functions.len(),
                    "total_functions does not match the function table"
                );
            }
        }
        tracing::info!(functions = doc.functions.len(), "loaded call graph");
        Ok(doc)
    }
}
