//! Load errors.
//!
//! Each variant maps to a fixed one-line diagnostic in the binary.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Error: {} not found.", path.display())]
    NotFound { path: PathBuf },

    #[error("Error: Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Syntax errors and truncated input.
    #[error("Error: Failed to decode JSON from {}.", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Well-formed JSON that is not shaped like a call graph document.
    #[error("Error: {} does not describe a call graph: {source}", path.display())]
    Schema {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    /// Classify a serde_json failure into a parse or schema error.
    pub fn from_json(path: PathBuf, source: serde_json::Error) -> Self {
        use serde_json::error::Category;
        match source.classify() {
            Category::Data => LoadError::Schema { path, source },
            Category::Io | Category::Syntax | Category::Eof => LoadError::Parse { path, source },
        }
    }

    pub fn path(&self) -> &std::path::Path {
        match self {
            LoadError::NotFound { path }
            | LoadError::Read { path, .. }
            | LoadError::Parse { path, .. }
            | LoadError::Schema { path, .. } => path,
        }
    }
}
