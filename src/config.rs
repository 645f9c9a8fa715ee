//! Run configuration.
//!
//! Both configs deserialize from JSON with defaults for every optional
//! field, and are built from CLI flags otherwise. `validate()` runs before
//! any I/O.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::render::{DEFAULT_DOT_SIZE, DEFAULT_EDGE_ALPHA};
use crate::source::DEFAULT_SUFFIX;
use crate::{Error, Result};

fn default_suffix() -> String {
    DEFAULT_SUFFIX.to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_size() -> u32 {
    10_000
}

fn default_scale() -> f32 {
    0.5
}

fn default_dot_size() -> u32 {
    DEFAULT_DOT_SIZE
}

fn default_edge_alpha() -> f32 {
    DEFAULT_EDGE_ALPHA
}

fn check_suffix(suffix: &str) -> Result<()> {
    if suffix.is_empty() {
        return Err(Error::Configuration("file suffix must not be empty".into()));
    }
    Ok(())
}

/// Load a JSON config file.
pub fn load_json<T: for<'de> Deserialize<'de>>(path: impl AsRef<Path>) -> Result<T> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

// ============================================================================
// PrepareConfig
// ============================================================================

/// Settings for the table/GML pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepareConfig {
    /// Directory walked for record files.
    pub data_dir: PathBuf,

    /// Directory receiving the table and GML files.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_suffix")]
    pub suffix: String,

    /// Minimum number of references a record needs.
    #[serde(default)]
    pub ref_threshold: usize,

    /// Minimum number of citations a record needs.
    #[serde(default)]
    pub cit_threshold: usize,
}

impl PrepareConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            output_dir: default_output_dir(),
            suffix: default_suffix(),
            ref_threshold: 0,
            cit_threshold: 0,
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_suffix(&self.suffix)
    }
}

// ============================================================================
// RenderConfig
// ============================================================================

/// Settings for the density map pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// `id,x,y` rows from the external layout.
    pub layout_file: PathBuf,

    /// Directory walked for record files.
    pub data_dir: PathBuf,

    /// Explicit output path. Defaults to `im-{layout stem}.png` in `output_dir`.
    #[serde(default)]
    pub output: Option<PathBuf>,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_suffix")]
    pub suffix: String,

    /// Width and height of the image in pixels.
    #[serde(default = "default_size")]
    pub size: u32,

    /// Layout units → pixels.
    #[serde(default = "default_scale")]
    pub scale: f32,

    /// Node disc diameter in pixels.
    #[serde(default = "default_dot_size")]
    pub dot_size: u32,

    /// Opacity one edge adds to a pixel.
    #[serde(default = "default_edge_alpha")]
    pub edge_alpha: f32,

    /// Fixed point store capacity. `None` sizes it from the layout file.
    #[serde(default)]
    pub capacity: Option<usize>,
}

impl RenderConfig {
    pub fn new(layout_file: impl Into<PathBuf>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            layout_file: layout_file.into(),
            data_dir: data_dir.into(),
            output: None,
            output_dir: default_output_dir(),
            suffix: default_suffix(),
            size: default_size(),
            scale: default_scale(),
            dot_size: default_dot_size(),
            edge_alpha: default_edge_alpha(),
            capacity: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_suffix(&self.suffix)?;
        if self.size == 0 {
            return Err(Error::Configuration("image size must be positive".into()));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(Error::Configuration(format!("invalid scale {}", self.scale)));
        }
        if self.dot_size == 0 {
            return Err(Error::Configuration("dot size must be positive".into()));
        }
        if !(self.edge_alpha > 0.0 && self.edge_alpha < 1.0) {
            return Err(Error::Configuration(format!(
                "edge alpha {} outside (0, 1)",
                self.edge_alpha
            )));
        }
        Ok(())
    }

    /// Base name shared by the image and its log lines, e.g. `im-layout`.
    pub fn output_stem(&self) -> String {
        let name = self
            .layout_file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = name.split('.').next().unwrap_or_default();
        format!("im-{stem}")
    }

    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.output_dir.join(format!("{}.png", self.output_stem())))
    }
}
