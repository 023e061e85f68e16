//! The point-pair annotator: owns the loaded image, the pending selection
//! and the canvas display list.

use crate::config::{Config, OverlayPolicy};
use crate::error::{AnnotatorError, Result};
use crate::geometry::{Point2D, VectorResult};
use crate::persist;
use crate::render::OverlayStyle;
use crate::selection::{ClickOutcome, DrawInstruction, SelectionState};
use image::DynamicImage;
use std::path::{Path, PathBuf};

/// A decoded raster and where it came from.
#[derive(Debug)]
pub struct SourceImage {
    pub path: PathBuf,
    pub image: DynamicImage,
}

impl SourceImage {
    pub fn size(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }
}

/// A finished point pair and the outcome of writing it to disk.
#[derive(Debug)]
pub struct CompletedPair {
    pub vector: VectorResult,
    pub saved: Result<()>,
}

#[derive(Debug)]
pub struct PointPairAnnotator {
    config: Config,
    style: OverlayStyle,
    image: Option<SourceImage>,
    /// Bumped on every successful load so the UI knows to re-upload.
    generation: u64,
    selection: SelectionState,
    overlays: Vec<DrawInstruction>,
}

impl PointPairAnnotator {
    pub fn new(config: Config) -> Self {
        Self {
            style: OverlayStyle::from(&config),
            config,
            image: None,
            generation: 0,
            selection: SelectionState::new(),
            overlays: Vec::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn image(&self) -> Option<&SourceImage> {
        self.image.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn overlays(&self) -> &[DrawInstruction] {
        &self.overlays
    }

    pub fn clear_overlays(&mut self) {
        self.overlays.clear();
    }

    /// Decodes `path` and makes it the current image.
    ///
    /// On failure nothing changes: the previous image, selection and
    /// overlays are kept.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<&SourceImage> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(AnnotatorError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let image = image::open(path).map_err(|source| AnnotatorError::Undecodable {
            path: path.to_path_buf(),
            source,
        })?;

        log::info!(
            "loaded {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );
        self.selection.clear();
        self.overlays.clear();
        self.generation += 1;
        Ok(&*self.image.insert(SourceImage {
            path: path.to_path_buf(),
            image,
        }))
    }

    /// Feeds one click into the selection cycle and applies the resulting
    /// draw instructions to the display list.
    pub fn record_click(&mut self, point: Point2D) -> ClickOutcome {
        if self.config.overlay_policy == OverlayPolicy::ResetPerPair && self.selection.is_empty() {
            self.overlays.clear();
        }
        let outcome = self.selection.push(point);
        log::debug!("click at ({:.1}, {:.1})", point.x, point.y);
        self.overlays.extend(outcome.draw.iter().copied());
        outcome
    }

    /// Records a click and, when it completes a pair, writes the vector to
    /// the configured vector path.
    ///
    /// The vector is returned even when the write fails.
    pub fn click(&mut self, point: Point2D) -> Option<CompletedPair> {
        let vector = self.record_click(point).vector?;
        let saved = self.persist_vector(&vector, &self.config.vector_path);
        if let Err(e) = &saved {
            log::warn!(
                "vector ({:?}, {:?}) at {:.2} degrees not saved: {e}",
                vector.dx,
                vector.dy,
                vector.angle_degrees
            );
        }
        Some(CompletedPair { vector, saved })
    }

    pub fn persist_vector(&self, result: &VectorResult, path: &Path) -> Result<()> {
        persist::persist_vector(result, path)
    }

    /// Writes the current image with the pending selection burned in.
    pub fn save_annotated(&self, path: &Path) -> Result<()> {
        let source = self.image.as_ref().ok_or(AnnotatorError::NoImage)?;
        persist::persist_annotated_image(&source.image, &self.selection.points(), &self.style, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::{tempdir, TempDir};

    fn write_png(dir: &TempDir, name: &str, w: u32, h: u32) -> PathBuf {
        let path = dir.path().join(name);
        RgbaImage::from_pixel(w, h, Rgba([50, 60, 70, 255]))
            .save(&path)
            .unwrap();
        path
    }

    fn config_in(dir: &TempDir) -> Config {
        Config {
            vector_path: dir.path().join("vector.json"),
            annotated_image_path: dir.path().join("annotated_image.png"),
            ..Config::default()
        }
    }

    #[test]
    fn load_replaces_image_and_resets_selection() {
        let dir = tempdir().unwrap();
        let first = write_png(&dir, "a.png", 10, 10);
        let second = write_png(&dir, "b.png", 20, 5);
        let mut ann = PointPairAnnotator::new(config_in(&dir));

        ann.load(&first).unwrap();
        ann.record_click(Point2D::new(1.0, 1.0));
        assert_eq!(ann.selection().len(), 1);

        let loaded = ann.load(&second).unwrap();
        assert_eq!(loaded.size(), (20, 5));
        assert!(ann.selection().is_empty());
        assert!(ann.overlays().is_empty());
        assert_eq!(ann.generation(), 2);
    }

    #[test]
    fn missing_path_keeps_previous_state() {
        let dir = tempdir().unwrap();
        let good = write_png(&dir, "a.png", 10, 10);
        let mut ann = PointPairAnnotator::new(config_in(&dir));
        ann.load(&good).unwrap();
        ann.record_click(Point2D::new(2.0, 3.0));

        let err = ann.load(dir.path().join("nope.png")).unwrap_err();

        assert!(matches!(err, AnnotatorError::NotFound { .. }));
        assert_eq!(ann.image().unwrap().path, good);
        assert_eq!(ann.selection().points(), vec![Point2D::new(2.0, 3.0)]);
        assert_eq!(ann.overlays().len(), 1);
        assert_eq!(ann.generation(), 1);
    }

    #[test]
    fn directory_path_is_not_found() {
        let dir = tempdir().unwrap();
        let mut ann = PointPairAnnotator::new(config_in(&dir));
        let err = ann.load(dir.path()).unwrap_err();
        assert!(matches!(err, AnnotatorError::NotFound { .. }));
        assert!(ann.image().is_none());
    }

    #[test]
    fn undecodable_file_keeps_previous_state() {
        let dir = tempdir().unwrap();
        let good = write_png(&dir, "a.png", 10, 10);
        let junk = dir.path().join("junk.png");
        std::fs::write(&junk, b"definitely not a png").unwrap();
        let mut ann = PointPairAnnotator::new(config_in(&dir));
        ann.load(&good).unwrap();

        let err = ann.load(&junk).unwrap_err();

        assert!(matches!(err, AnnotatorError::Undecodable { .. }));
        assert_eq!(ann.image().unwrap().path, good);
    }

    #[test]
    fn completed_pair_emits_marker_and_arrow() {
        let dir = tempdir().unwrap();
        let mut ann = PointPairAnnotator::new(config_in(&dir));
        let p1 = Point2D::new(100.0, 100.0);
        let p2 = Point2D::new(100.0, 0.0);

        assert!(ann.record_click(p1).vector.is_none());
        let out = ann.record_click(p2);

        let v = out.vector.unwrap();
        assert_eq!((v.dx, v.dy), (0.0, -100.0));
        assert!((v.angle_degrees + 90.0).abs() < 1e-9);
        assert!(ann.selection().is_empty());
        assert_eq!(
            ann.overlays(),
            &[
                DrawInstruction::Marker { at: p1 },
                DrawInstruction::Marker { at: p2 },
                DrawInstruction::Arrow { from: p1, to: p2 },
            ]
        );
    }

    #[test]
    fn accumulate_policy_keeps_earlier_pairs() {
        let dir = tempdir().unwrap();
        let mut ann = PointPairAnnotator::new(config_in(&dir));
        for i in 0..4 {
            ann.record_click(Point2D::new(i as f64 * 10.0, 0.0));
        }
        assert_eq!(ann.overlays().len(), 6);
    }

    #[test]
    fn reset_policy_clears_on_new_pair() {
        let dir = tempdir().unwrap();
        let mut ann = PointPairAnnotator::new(Config {
            overlay_policy: OverlayPolicy::ResetPerPair,
            ..config_in(&dir)
        });
        ann.record_click(Point2D::new(0.0, 0.0));
        ann.record_click(Point2D::new(5.0, 0.0));
        assert_eq!(ann.overlays().len(), 3);

        let third = Point2D::new(9.0, 9.0);
        ann.record_click(third);
        assert_eq!(ann.overlays(), &[DrawInstruction::Marker { at: third }]);
    }

    #[test]
    fn click_writes_vector_file_on_completion() {
        let dir = tempdir().unwrap();
        let config = config_in(&dir);
        let vector_path = config.vector_path.clone();
        let mut ann = PointPairAnnotator::new(config);

        assert!(ann.click(Point2D::new(0.0, 0.0)).is_none());
        assert!(!vector_path.exists());

        let pair = ann.click(Point2D::new(-50.0, -50.0)).unwrap();
        pair.saved.unwrap();
        assert!((pair.vector.angle_degrees + 135.0).abs() < 1e-9);
        let record: persist::VectorRecord =
            serde_json::from_str(&std::fs::read_to_string(&vector_path).unwrap()).unwrap();
        assert_eq!(record.vector, [-50.0, -50.0]);
    }

    #[test]
    fn failed_vector_write_still_returns_vector() {
        let dir = tempdir().unwrap();
        let mut ann = PointPairAnnotator::new(Config {
            vector_path: dir.path().join("missing").join("vector.json"),
            ..config_in(&dir)
        });

        ann.click(Point2D::new(100.0, 100.0));
        let pair = ann.click(Point2D::new(200.0, 100.0)).unwrap();

        assert!(matches!(pair.saved, Err(AnnotatorError::Io(_))));
        assert_eq!((pair.vector.dx, pair.vector.dy), (100.0, 0.0));
        assert!(ann.selection().is_empty());
    }

    #[test]
    fn persist_vector_overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let ann = PointPairAnnotator::new(config_in(&dir));
        let path = dir.path().join("v.json");
        std::fs::write(&path, "{\"stale\": true, \"padding\": \"xxxxxxxxxxxxxxxxxxxx\"}").unwrap();
        let r = VectorResult::between(Point2D::new(0.0, 0.0), Point2D::new(0.0, 10.0));

        ann.persist_vector(&r, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(!text.contains("stale"));
        let record: persist::VectorRecord = serde_json::from_str(&text).unwrap();
        assert_eq!(record.vector, [0.0, 10.0]);
        assert!((record.angle_deg - 90.0).abs() < 1e-9);
    }

    #[test]
    fn save_without_image_is_an_error() {
        let dir = tempdir().unwrap();
        let ann = PointPairAnnotator::new(config_in(&dir));
        let err = ann
            .save_annotated(&dir.path().join("annotated_image.png"))
            .unwrap_err();
        assert!(matches!(err, AnnotatorError::NoImage));
    }

    #[test]
    fn save_burns_in_pending_point_only() {
        let dir = tempdir().unwrap();
        let source = write_png(&dir, "a.png", 30, 30);
        let out = dir.path().join("annotated_image.png");
        let mut ann = PointPairAnnotator::new(config_in(&dir));
        ann.load(&source).unwrap();
        ann.record_click(Point2D::new(15.0, 15.0));

        ann.save_annotated(&out).unwrap();

        let written = image::open(&out).unwrap().to_rgba8();
        let style = OverlayStyle::default();
        assert_eq!(written.get_pixel(15, 15).0, style.marker_color);
        assert_eq!(written.get_pixel(0, 0).0, [50, 60, 70, 255]);
        assert!(!written.pixels().any(|px| px.0 == style.arrow_color));
        // in-memory source untouched
        assert_eq!(
            ann.image().unwrap().image.to_rgba8().get_pixel(15, 15).0,
            [50, 60, 70, 255]
        );
    }
}
