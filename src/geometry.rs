//! Point pairs and the displacement vector between them.

/// A pixel coordinate in image space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Displacement from a first point to a second, with its direction.
///
/// `angle_degrees` follows image axes (y grows downward) and lies in
/// (-180, 180].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VectorResult {
    pub dx: f64,
    pub dy: f64,
    pub angle_degrees: f64,
}

impl VectorResult {
    pub fn between(p1: Point2D, p2: Point2D) -> Self {
        let dx = p2.x - p1.x;
        let dy = p2.y - p1.y;
        Self {
            dx,
            dy,
            angle_degrees: angle_degrees(dx, dy),
        }
    }
}

/// `atan2(dy, dx)` in degrees, folded into (-180, 180].
///
/// A zero-length vector gives 0.
pub fn angle_degrees(dx: f64, dy: f64) -> f64 {
    if dx == 0.0 && dy == 0.0 {
        return 0.0;
    }
    let deg = dy.atan2(dx).to_degrees();
    if deg <= -180.0 {
        180.0
    } else {
        deg
    }
}
