//! Drawing style: node colours, canvas geometry and the title.

use std::collections::BTreeMap;

pub const DEFAULT_TARGET_FILE: &str = "ingestion.py";
pub const TARGET_COLOR: &str = "skyblue";
pub const DEFAULT_COLOR: &str = "lightgray";

/// File name to fill colour lookup with a fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    files: BTreeMap<String, String>,
    default: String,
}

impl Palette {
    /// One-entry table highlighting `target_file`.
    pub fn for_target(target_file: &str) -> Self {
        let mut files = BTreeMap::new();
        files.insert(target_file.to_string(), TARGET_COLOR.to_string());
        Self {
            files,
            default: DEFAULT_COLOR.to_string(),
        }
    }

    pub fn with_default(mut self, color: impl Into<String>) -> Self {
        self.default = color.into();
        self
    }

    pub fn with_entry(mut self, file: impl Into<String>, color: impl Into<String>) -> Self {
        self.files.insert(file.into(), color.into());
        self
    }

    pub fn color_for(&self, file: &str) -> &str {
        self.files
            .get(file)
            .map(String::as_str)
            .unwrap_or(self.default.as_str())
    }
}

/// Output surface geometry in pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
    pub node_radius: f64,
    pub font_size: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 900.0,
            margin: 60.0,
            node_radius: 18.0,
            font_size: 11.0,
        }
    }
}

pub fn title_for(target_file: &str) -> String {
    format!("Call Graph for Functions in {}", target_file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_gets_highlight() {
        let palette = Palette::for_target("ingestion.py");
        assert_eq!(palette.color_for("ingestion.py"), "skyblue");
        assert_eq!(palette.color_for("other.py"), "lightgray");
    }

    #[test]
    fn test_overrides() {
        let palette = Palette::for_target("a.py")
            .with_default("white")
            .with_entry("b.py", "#ff0000");
        assert_eq!(palette.color_for("b.py"), "#ff0000");
        assert_eq!(palette.color_for("c.py"), "white");
    }

    #[test]
    fn test_title() {
        assert_eq!(
            title_for(DEFAULT_TARGET_FILE),
            "Call Graph for Functions in ingestion.py"
        );
    }
}
