//! Writing the vector file and the annotated PNG.

use crate::error::Result;
use crate::geometry::{Point2D, VectorResult};
use crate::render::{self, OverlayStyle};
use image::{DynamicImage, ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// On-disk shape of the vector file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    pub vector: [f64; 2],
    pub angle_deg: f64,
}

impl From<&VectorResult> for VectorRecord {
    fn from(r: &VectorResult) -> Self {
        Self {
            vector: [r.dx, r.dy],
            angle_deg: r.angle_degrees,
        }
    }
}

/// Writes `{"vector": [dx, dy], "angle_deg": a}` to `path`, replacing any
/// existing content.
pub fn persist_vector(result: &VectorResult, path: &Path) -> Result<()> {
    let data = serde_json::to_string(&VectorRecord::from(result))?;
    std::fs::write(path, data)?;
    log::info!("vector saved to {}", path.display());
    Ok(())
}

/// Returns a copy of `source` with `points` burned in.
pub fn annotate(source: &DynamicImage, points: &[Point2D], style: &OverlayStyle) -> RgbaImage {
    let mut img = source.to_rgba8();
    render::draw_selection(&mut img, points, style);
    img
}

/// Draws `points` onto a copy of `source` and writes it to `path` as PNG.
pub fn persist_annotated_image(
    source: &DynamicImage,
    points: &[Point2D],
    style: &OverlayStyle,
    path: &Path,
) -> Result<()> {
    let img = annotate(source, points, style);
    img.save_with_format(path, ImageFormat::Png)?;
    log::info!("annotated image saved to {}", path.display());
    Ok(())
}
