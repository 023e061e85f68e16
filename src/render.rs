//! Burning markers and arrows into a raster copy.

use crate::config::Config;
use crate::geometry::Point2D;
use image::{Rgba, RgbaImage};

/// Overlay colours and sizes, in image pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayStyle {
    pub marker_radius: f32,
    pub marker_color: [u8; 4],
    pub arrow_thickness: f32,
    pub arrow_color: [u8; 4],
    pub arrow_tip_ratio: f32,
}

impl From<&Config> for OverlayStyle {
    fn from(config: &Config) -> Self {
        Self {
            marker_radius: config.marker_radius,
            marker_color: config.marker_color.to_rgba8(),
            arrow_thickness: config.arrow_thickness,
            arrow_color: config.arrow_color.to_rgba8(),
            arrow_tip_ratio: config.arrow_tip_ratio,
        }
    }
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

/// Draws markers at `points` and, for a full pair, an arrow from the first
/// to the second.
pub fn draw_selection(img: &mut RgbaImage, points: &[Point2D], style: &OverlayStyle) {
    for p in points {
        draw_marker(img, *p, style.marker_radius, style.marker_color);
    }
    if let [from, to] = points {
        draw_arrow(
            img,
            *from,
            *to,
            style.arrow_thickness,
            style.arrow_tip_ratio,
            style.arrow_color,
        );
    }
}

pub fn draw_marker(img: &mut RgbaImage, center: Point2D, radius: f32, color: [u8; 4]) {
    let (cx, cy) = (center.x.round() as i64, center.y.round() as i64);
    let r = radius.max(0.0).round() as i64;
    for oy in -r..=r {
        for ox in -r..=r {
            if ox * ox + oy * oy <= r * r {
                put_clipped(img, cx + ox, cy + oy, color);
            }
        }
    }
}

/// Shaft from `from` to `to` with a two-barbed head at `to`. Zero-length
/// arrows draw nothing.
pub fn draw_arrow(
    img: &mut RgbaImage,
    from: Point2D,
    to: Point2D,
    thickness: f32,
    tip_ratio: f32,
    color: [u8; 4],
) {
    let (x0, y0) = (from.x as f32, from.y as f32);
    let (x1, y1) = (to.x as f32, to.y as f32);
    let dx = x1 - x0;
    let dy = y1 - y0;
    let len = (dx * dx + dy * dy).sqrt();
    if len <= 0.0 {
        return;
    }
    draw_line(img, x0, y0, x1, y1, thickness, color);

    let dir = (dx / len, dy / len);
    let perp = (-dir.1, dir.0);
    let head_len = len * tip_ratio;
    // barbs at 45 degrees either side of the shaft
    let barb_a = (
        x1 - (dir.0 + perp.0) * head_len * std::f32::consts::FRAC_1_SQRT_2,
        y1 - (dir.1 + perp.1) * head_len * std::f32::consts::FRAC_1_SQRT_2,
    );
    let barb_b = (
        x1 - (dir.0 - perp.0) * head_len * std::f32::consts::FRAC_1_SQRT_2,
        y1 - (dir.1 - perp.1) * head_len * std::f32::consts::FRAC_1_SQRT_2,
    );
    draw_line(img, x1, y1, barb_a.0, barb_a.1, thickness, color);
    draw_line(img, x1, y1, barb_b.0, barb_b.1, thickness, color);
}

fn draw_line(
    img: &mut RgbaImage,
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    thickness: f32,
    color: [u8; 4],
) {
    let dx = x1 - x0;
    let dy = y1 - y0;
    let len = (dx * dx + dy * dy).sqrt();
    let steps = (len * 2.0) as i64;
    let half_t = (thickness / 2.0).max(0.5) as i64;

    for i in 0..=steps {
        let t = i as f32 / steps.max(1) as f32;
        let cx = (x0 + dx * t).round() as i64;
        let cy = (y0 + dy * t).round() as i64;
        for oy in -half_t..=half_t {
            for ox in -half_t..=half_t {
                put_clipped(img, cx + ox, cy + oy, color);
            }
        }
    }
}

fn put_clipped(img: &mut RgbaImage, x: i64, y: i64, color: [u8; 4]) {
    if x >= 0 && y >= 0 && x < i64::from(img.width()) && y < i64::from(img.height()) {
        img.put_pixel(x as u32, y as u32, Rgba(color));
    }
}
