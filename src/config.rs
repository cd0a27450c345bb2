use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::command::DEFAULT_HISTORY_CAPACITY;
use crate::error::{CanvasError, CanvasResult};

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV_VAR: &str = "CANVAS_PAINT_CONFIG";

/// Startup configuration. Every field has a default, so a config file only
/// needs the keys it wants to change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Undo steps kept before the oldest is dropped
    pub history_capacity: usize,
    pub window_width: f32,
    pub window_height: f32,
    pub toolbar_width: f32,
    pub menu_bar_height: f32,
    pub pencil_width: f32,
    pub eraser_radius: f32,
    pub shape_thickness: f32,
    /// Segments used to approximate circles
    pub circle_segments: usize,
    /// Per-frame size change while `[` or `]` is held
    pub size_step: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            window_width: 1200.0,
            window_height: 800.0,
            toolbar_width: 150.0,
            menu_bar_height: 30.0,
            pencil_width: 5.0,
            eraser_radius: 20.0,
            shape_thickness: 5.0,
            circle_segments: 64,
            size_step: 0.25,
        }
    }
}

impl CanvasConfig {
    pub fn from_json(json: &str, path: &Path) -> CanvasResult<Self> {
        serde_json::from_str(json).map_err(|source| CanvasError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> CanvasResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CanvasError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json, path)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Loads from the first command-line argument or [`CONFIG_ENV_VAR`],
    /// falling back to defaults when neither is given.
    pub fn from_env() -> CanvasResult<Self> {
        let path = std::env::args_os()
            .nth(1)
            .or_else(|| std::env::var_os(CONFIG_ENV_VAR));
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
