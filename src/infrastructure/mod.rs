// Infrastructure implementations for callview.

pub mod concurrency;
pub mod config;
pub mod dot_exporter;
pub mod json_exporter;
pub mod json_loader;
pub mod svg_renderer;
pub mod window;

pub use dot_exporter::DotExporter;
pub use json_exporter::JsonExporter;
pub use json_loader::JsonFileSource;
pub use svg_renderer::SvgRenderer;
pub use window::WindowViewer;

use crate::ports::DrawingExporter;
use serde::Deserialize;
use std::path::Path;

/// Supported drawing formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Svg,
    Dot,
    Json,
}

impl OutputFormat {
    /// Infer the format from a file extension.
    pub fn from_path(path: &Path) -> Option<OutputFormat> {
        match path.extension()?.to_str()?.to_lowercase().as_str() {
            "svg" => Some(OutputFormat::Svg),
            "dot" | "gv" => Some(OutputFormat::Dot),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Dot => "dot",
            OutputFormat::Json => "json",
        }
    }

    pub fn exporter(&self) -> &'static dyn DrawingExporter {
        match self {
            OutputFormat::Svg => &SvgRenderer,
            OutputFormat::Dot => &DotExporter,
            OutputFormat::Json => &JsonExporter,
        }
    }
}
