//! eframe front end. Translates widget events into annotator calls and
//! paints the annotator's display list; holds no geometry of its own.

use crate::annotator::{CompletedPair, PointPairAnnotator};
use crate::config::Config;
use crate::error::AnnotatorError;
use crate::geometry::{Point2D, VectorResult};
use crate::selection::DrawInstruction;
use eframe::egui;
use std::path::PathBuf;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "tiff", "tif", "webp"];

pub struct VectorPickApp {
    annotator: PointPairAnnotator,
    path_input: String,
    status: String,

    texture: Option<egui::TextureHandle>,
    texture_generation: u64,
    image_size: (f32, f32),

    // pan & zoom
    pan: egui::Vec2,
    zoom: f32,
    panning: bool,
}

impl VectorPickApp {
    pub fn new(config: Config, initial_path: Option<PathBuf>) -> Self {
        let mut app = Self {
            annotator: PointPairAnnotator::new(config),
            path_input: String::new(),
            status: String::new(),
            texture: None,
            texture_generation: 0,
            image_size: (512.0, 512.0),
            pan: egui::Vec2::ZERO,
            zoom: 1.0,
            panning: false,
        };
        if let Some(path) = initial_path {
            app.path_input = path.display().to_string();
            app.load_from_input();
        }
        app
    }

    fn report_error(&mut self, err: &AnnotatorError) {
        log::warn!("{err}");
        self.status = format!("Error: {err}");
    }

    fn load_from_input(&mut self) {
        let path = PathBuf::from(self.path_input.trim());
        match self.annotator.load(&path) {
            Ok(loaded) => {
                let (w, h) = loaded.size();
                self.image_size = (w as f32, h as f32);
                self.pan = egui::Vec2::ZERO;
                self.zoom = 1.0;
                self.status = format!("Image loaded: {}", path.display());
            }
            Err(e) => self.report_error(&e),
        }
    }

    fn browse(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_file()
        {
            self.path_input = path.display().to_string();
            self.load_from_input();
        }
    }

    fn save_image(&mut self) {
        let path = self.annotator.config().annotated_image_path.clone();
        match self.annotator.save_annotated(&path) {
            Ok(()) => self.status = format!("Annotated image saved to {}", path.display()),
            Err(e) => self.report_error(&e),
        }
    }

    fn handle_click(&mut self, point: Point2D) {
        if let Some(CompletedPair { vector, saved }) = self.annotator.click(point) {
            self.status = match saved {
                Ok(()) => format!("Vector saved: {}", describe_vector(&vector)),
                Err(e) => {
                    log::warn!("{e}");
                    format!("Error: {e} (vector: {})", describe_vector(&vector))
                }
            };
        }
    }

    fn ensure_texture(&mut self, ctx: &egui::Context) {
        if self.texture.is_some() && self.texture_generation == self.annotator.generation() {
            return;
        }
        if let Some(source) = self.annotator.image() {
            let rgba = source.image.to_rgba8();
            let size = [rgba.width() as usize, rgba.height() as usize];
            let pixels = rgba.as_flat_samples();
            let color_image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice());
            match &mut self.texture {
                Some(tex) => tex.set(color_image, egui::TextureOptions::LINEAR),
                None => {
                    self.texture =
                        Some(ctx.load_texture("image", color_image, egui::TextureOptions::LINEAR));
                }
            }
            self.texture_generation = self.annotator.generation();
        }
    }

    /// Convert image-space coords to screen-space
    fn image_to_screen(&self, canvas_rect: egui::Rect, img_pos: egui::Pos2) -> egui::Pos2 {
        canvas_rect.min + self.pan + img_pos.to_vec2() * self.zoom
    }

    /// Convert screen-space coords to image-space
    fn screen_to_image(&self, canvas_rect: egui::Rect, screen_pos: egui::Pos2) -> egui::Pos2 {
        let rel = screen_pos - canvas_rect.min - self.pan;
        egui::pos2(rel.x / self.zoom, rel.y / self.zoom)
    }

    fn point_to_screen(&self, canvas_rect: egui::Rect, p: Point2D) -> egui::Pos2 {
        self.image_to_screen(canvas_rect, egui::pos2(p.x as f32, p.y as f32))
    }

    fn draw_overlays(&self, painter: &egui::Painter, canvas_rect: egui::Rect) {
        let config = self.annotator.config();
        for overlay in self.annotator.overlays() {
            match *overlay {
                DrawInstruction::Marker { at } => {
                    painter.circle_filled(
                        self.point_to_screen(canvas_rect, at),
                        config.marker_radius * self.zoom,
                        config.marker_color.to_egui(),
                    );
                }
                DrawInstruction::Arrow { from, to } => {
                    let s = self.point_to_screen(canvas_rect, from);
                    let e = self.point_to_screen(canvas_rect, to);
                    if s == e {
                        continue;
                    }
                    let c = config.arrow_color.to_egui();
                    let t = config.arrow_thickness * self.zoom;
                    painter.line_segment([s, e], egui::Stroke::new(t, c));
                    // arrowhead
                    let dir = (e - s).normalized();
                    let head_len = (t * 4.0).max(10.0);
                    let perp = egui::vec2(-dir.y, dir.x);
                    let p1 = e - dir * head_len + perp * head_len * 0.4;
                    let p2 = e - dir * head_len - perp * head_len * 0.4;
                    painter.add(egui::Shape::convex_polygon(
                        vec![e, p1, p2],
                        c,
                        egui::Stroke::NONE,
                    ));
                }
            }
        }
    }
}

fn describe_vector(v: &VectorResult) -> String {
    format!("({:?}, {:?}), Angle: {:.2} degrees", v.dx, v.dy, v.angle_degrees)
}

// ── eframe App impl ────────────────────────────────────────────────────────

impl eframe::App for VectorPickApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ensure_texture(ctx);

        if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::S)) {
            self.save_image();
        }

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.label("Enter the image path below and click 'Load Image' to view it.");
            ui.horizontal(|ui| {
                ui.label("Image Path");
                let input = ui.add(
                    egui::TextEdit::singleline(&mut self.path_input)
                        .hint_text("Enter image file path here")
                        .desired_width(360.0),
                );
                let submitted =
                    input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if ui.button("Browse…").clicked() {
                    self.browse();
                }
                if ui.button("Load Image").clicked() || submitted {
                    self.load_from_input();
                }
                if ui.button("Save Image").clicked() {
                    self.save_image();
                }
                if ui.button("Clear").clicked() {
                    self.annotator.clear_overlays();
                }
            });
            ui.add(egui::Label::new(self.status.as_str()).wrap());
        });

        // Canvas
        egui::CentralPanel::default().show(ctx, |ui| {
            let (response, painter) =
                ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
            let canvas_rect = response.rect;

            painter.rect_filled(canvas_rect, 0.0, egui::Color32::from_gray(40));

            if let Some(ref tex) = self.texture {
                let img_rect = egui::Rect::from_min_max(
                    self.image_to_screen(canvas_rect, egui::Pos2::ZERO),
                    self.image_to_screen(
                        canvas_rect,
                        egui::pos2(self.image_size.0, self.image_size.1),
                    ),
                );
                painter.image(
                    tex.id(),
                    img_rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
            }

            self.draw_overlays(&painter, canvas_rect);

            // Handle pan (middle mouse button)
            let middle_down = ctx.input(|i| i.pointer.middle_down());
            if middle_down {
                let delta = ctx.input(|i| i.pointer.delta());
                self.pan += delta;
                self.panning = true;
            } else {
                self.panning = false;
            }

            // Handle zoom (scroll wheel)
            let scroll_delta = ctx.input(|i| i.smooth_scroll_delta.y);
            if scroll_delta != 0.0 && response.hovered() {
                let zoom_factor = 1.0 + scroll_delta * 0.002;
                let new_zoom = (self.zoom * zoom_factor).clamp(0.1, 10.0);
                if let Some(cursor) = response.hover_pos() {
                    let cursor_rel = cursor - canvas_rect.min - self.pan;
                    self.pan -= cursor_rel * (new_zoom / self.zoom - 1.0);
                }
                self.zoom = new_zoom;
            }

            if !self.panning
                && self.annotator.image().is_some()
                && response.clicked_by(egui::PointerButton::Primary)
            {
                if let Some(pos) = response.interact_pointer_pos() {
                    let img = self.screen_to_image(canvas_rect, pos);
                    self.handle_click(Point2D::new(f64::from(img.x), f64::from(img.y)));
                }
            }
        });
    }
}
