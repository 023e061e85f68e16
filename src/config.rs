//! Output paths and overlay styling, read from `vector-pick.toml`.
//!
//! Every key is optional; a missing file or missing key falls back to the
//! defaults below.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "vector-pick.toml";

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color4 {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color4 {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn to_egui(&self) -> egui::Color32 {
        let [r, g, b, a] = self.to_rgba8();
        egui::Color32::from_rgba_unmultiplied(r, g, b, a)
    }

    pub fn to_rgba8(&self) -> [u8; 4] {
        [
            channel(self.r),
            channel(self.g),
            channel(self.b),
            channel(self.a),
        ]
    }
}

fn channel(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// What happens to the previous pair's markers and arrow when a new pair starts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayPolicy {
    /// Keep every pair on the canvas until the next image load.
    #[default]
    Accumulate,
    /// The first click of a new pair wipes the canvas overlays.
    ResetPerPair,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub vector_path: PathBuf,
    pub annotated_image_path: PathBuf,
    pub marker_radius: f32,
    pub marker_color: Color4,
    pub arrow_thickness: f32,
    pub arrow_color: Color4,
    /// Arrowhead length as a fraction of the shaft length.
    pub arrow_tip_ratio: f32,
    pub overlay_policy: OverlayPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vector_path: PathBuf::from("vector.json"),
            annotated_image_path: PathBuf::from("annotated_image.png"),
            marker_radius: 5.0,
            marker_color: Color4::rgb(1.0, 0.0, 0.0),
            arrow_thickness: 3.0,
            arrow_color: Color4::rgb(0.0, 1.0, 0.0),
            arrow_tip_ratio: 0.2,
            overlay_policy: OverlayPolicy::Accumulate,
        }
    }
}

/// Loads `vector-pick.toml` from the working directory, or defaults if absent.
///
/// A file that fails to parse is logged and ignored.
pub fn load() -> Config {
    let path = Path::new(CONFIG_FILE);
    match load_from_path(path) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("ignoring {}: {e}", path.display());
            Config::default()
        }
    }
}

/// Reads a config file; a missing file yields the defaults.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(e) => return Err(e.into()),
    };
    match toml::from_str(&content) {
        Ok(config) => Ok(config),
        Err(e) => {
            log::warn!("invalid config {}: {e}", path.display());
            Ok(Config::default())
        }
    }
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(std::io::Error::other)?;
    fs::write(path, content)?;
    Ok(())
}
