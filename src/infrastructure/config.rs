//! Configuration Module
//!
//! Optional `callview.toml` plus command-line overrides. Precedence is
//! flag, then file, then built-in default. The drawing format comes from
//! `--format`, then the extension of `--output`, then the file's `format`,
//! then the extension of the file's `output`, then SVG.
//!
//! ```toml
//! input = "call_graph.json"
//! target_file = "ingestion.py"
//!
//! [layout]
//! seed = 42
//! iterations = 50
//!
//! [palette]
//! default = "lightgray"
//! [palette.files]
//! "ingestion.py" = "skyblue"
//!
//! [window]
//! open = true
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{bail, Context, Result};
use serde::Deserialize;

use super::json_loader::DEFAULT_INPUT;
use super::OutputFormat;
use crate::domain::layout::SpringLayout;
use crate::domain::style::{Canvas, Palette, DEFAULT_TARGET_FILE};

pub const DEFAULT_CONFIG_FILE: &str = "callview.toml";

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub input: Option<PathBuf>,
    pub target_file: Option<String>,
    pub output: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub layout: LayoutSection,
    pub canvas: CanvasSection,
    pub palette: PaletteSection,
    pub window: WindowSection,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutSection {
    pub seed: Option<u64>,
    pub iterations: Option<usize>,
    pub k: Option<f64>,
    pub scale: Option<f64>,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CanvasSection {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub margin: Option<f64>,
    pub node_radius: Option<f64>,
    pub font_size: Option<f64>,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PaletteSection {
    pub default: Option<String>,
    pub files: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct WindowSection {
    pub open: Option<bool>,
}

impl AppConfig {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid configuration file")
    }

    /// Load `explicit` (which must exist), or `callview.toml` in `cwd` when present.
    pub fn load(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => {
                let candidate = cwd.join(DEFAULT_CONFIG_FILE);
                if !candidate.exists() {
                    return Ok(Self::default());
                }
                candidate
            }
        };

        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::parse(&text).with_context(|| format!("In {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }
}

/// Values given on the command line.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub input: Option<PathBuf>,
    pub target_file: Option<String>,
    pub output: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub seed: Option<u64>,
    pub iterations: Option<usize>,
    pub no_open: bool,
}

/// Fully resolved run settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub input: PathBuf,
    pub target_file: String,
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
    pub layout: SpringLayout,
    pub canvas: Canvas,
    pub palette: Palette,
    pub open_window: bool,
}

impl Settings {
    /// Merge file and flags, rejecting geometry the layout or canvas cannot use.
    pub fn resolve(config: AppConfig, overrides: Overrides) -> Result<Self> {
        let input = overrides
            .input
            .or(config.input)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT));
        let target_file = overrides
            .target_file
            .or(config.target_file)
            .unwrap_or_else(|| DEFAULT_TARGET_FILE.to_string());
        let format = overrides
            .format
            .or_else(|| overrides.output.as_deref().and_then(OutputFormat::from_path))
            .or(config.format)
            .or_else(|| config.output.as_deref().and_then(OutputFormat::from_path))
            .unwrap_or_default();
        let output = overrides.output.or(config.output);

        let defaults = SpringLayout::default();
        let layout = SpringLayout {
            seed: overrides.seed.or(config.layout.seed).unwrap_or(defaults.seed),
            iterations: overrides
                .iterations
                .or(config.layout.iterations)
                .unwrap_or(defaults.iterations),
            k: config.layout.k.or(defaults.k),
            threshold: defaults.threshold,
            scale: config.layout.scale.unwrap_or(defaults.scale),
        };

        let base = Canvas::default();
        let c = config.canvas;
        let canvas = Canvas {
            width: c.width.unwrap_or(base.width),
            height: c.height.unwrap_or(base.height),
            margin: c.margin.unwrap_or(base.margin),
            node_radius: c.node_radius.unwrap_or(base.node_radius),
            font_size: c.font_size.unwrap_or(base.font_size),
        };

        let mut palette = Palette::for_target(&target_file);
        if let Some(default) = config.palette.default {
            palette = palette.with_default(default);
        }
        for (file, color) in config.palette.files {
            palette = palette.with_entry(file, color);
        }

        let open_window = !overrides.no_open && config.window.open.unwrap_or(true);

        let settings = Self {
            input,
            target_file,
            output,
            format,
            layout,
            canvas,
            palette,
            open_window,
        };
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if let Some(k) = self.layout.k {
            if !(k.is_finite() && k > 0.0) {
                bail!("layout.k must be a positive number, got {}", k);
            }
        }
        if !(self.layout.scale.is_finite() && self.layout.scale > 0.0) {
            bail!("layout.scale must be a positive number, got {}", self.layout.scale);
        }

        let c = &self.canvas;
        for (name, value) in [
            ("canvas.width", c.width),
            ("canvas.height", c.height),
            ("canvas.node_radius", c.node_radius),
            ("canvas.font_size", c.font_size),
        ] {
            if !(value.is_finite() && value > 0.0) {
                bail!("{} must be a positive number, got {}", name, value);
            }
        }
        if !(c.margin.is_finite() && c.margin >= 0.0) {
            bail!("canvas.margin must not be negative, got {}", c.margin);
        }
        if 2.0 * c.margin >= c.width || 2.0 * c.margin >= c.height {
            bail!(
                "canvas.margin {} leaves no room on a {}x{} canvas",
                c.margin,
                c.width,
                c.height
            );
        }
        Ok(())
    }
}
