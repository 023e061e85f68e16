//! Errors surfaced by the annotator.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnnotatorError>;

/// Every recoverable failure the annotator can report.
///
/// None of these are fatal: the UI shows them in the status line and keeps
/// running with its previous state.
#[derive(Error, Debug)]
pub enum AnnotatorError {
    /// The path does not name an existing file
    #[error("Invalid file path: {path:?}")]
    NotFound {
        /// Path the user asked to load
        path: PathBuf,
    },

    /// The file exists but could not be decoded as an image
    #[error("Could not load image {path:?}: {source}")]
    Undecodable {
        /// Path the user asked to load
        path: PathBuf,
        /// Decoder error
        #[source]
        source: image::ImageError,
    },

    /// A save was requested before any image was loaded
    #[error("No image loaded")]
    NoImage,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// PNG encoding or writing failed
    #[error("Could not write image: {0}")]
    Encode(#[from] image::ImageError),
}
