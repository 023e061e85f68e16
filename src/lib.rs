//! Click two points on an image and get the arrow, displacement vector and
//! angle between them, saved as JSON alongside an annotated PNG.

pub mod annotator;
pub mod app;
pub mod config;
pub mod error;
pub mod geometry;
pub mod persist;
pub mod render;
pub mod selection;

pub use annotator::{PointPairAnnotator, SourceImage};
pub use error::{AnnotatorError, Result};
pub use geometry::{Point2D, VectorResult};
