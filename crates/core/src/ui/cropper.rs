//! Main cropper application.
//!
//! This module contains the `CropperApp` struct which implements the
//! `eframe::App` trait: the image canvas on the left, the ratio, preset,
//! rotation and export controls on the right. All crop logic lives in the
//! [`CropSession`]; this file only forwards input and paints its output.

use super::rendering::{
    draw_corner_handles, draw_dim_overlay, draw_selection_border, size_label_position, view_rect,
};
use super::selection::collect_pointer_events;
use super::state::{CropResult, UiState};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::geometry::{CropRect, Size};
use crate::image_processing::ImageProcessor;
use crate::preset::{PresetSize, RatioChoice};
use crate::session::{CropSession, SessionEvent};
use eframe::egui;
use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

const OVERLAY_ALPHA: u8 = 150;
const CONTROLS_WIDTH: f32 = 220.0;

/// The interactive cropper window.
pub struct CropperApp {
    // Image state
    image_texture: Option<egui::TextureHandle>,
    /// Pending texture data, uploaded on the next frame
    color_image: Option<egui::ColorImage>,
    image: DynamicImage,

    // Crop state
    session: CropSession,
    preset: PresetSize,
    result: Arc<Mutex<CropResult>>,

    config: Config,
    output: Option<PathBuf>,
    state: UiState,
}

impl CropperApp {
    /// Creates a cropper for `image`.
    ///
    /// # Arguments
    /// * `image` - The image to crop
    /// * `result` - Shared container the exported paths are written to
    /// * `config` - Application configuration
    /// * `output` - Export path; a timestamped name is used when `None`
    pub fn new(
        image: DynamicImage,
        result: Arc<Mutex<CropResult>>,
        config: Config,
        output: Option<PathBuf>,
    ) -> Self {
        let mut session = CropSession::from_config(&config);
        let bounds = ImageProcessor::bounds(&image);
        session.handle(SessionEvent::ImageChanged {
            width: bounds.width,
            height: bounds.height,
        });

        Self {
            image_texture: None,
            color_image: Some(to_color_image(&image)),
            image,
            session,
            preset: PresetSize::Custom,
            result,
            config,
            output,
            state: UiState::Idle,
        }
    }

    /// Replaces the image with a rotated copy. The crop is reset.
    fn rotate(&mut self, clockwise: bool) {
        self.image = if clockwise {
            ImageProcessor::rotate_right(&self.image)
        } else {
            ImageProcessor::rotate_left(&self.image)
        };
        self.color_image = Some(to_color_image(&self.image));
        self.image_texture = None;

        let bounds = ImageProcessor::bounds(&self.image);
        self.session.handle(SessionEvent::ImageChanged {
            width: bounds.width,
            height: bounds.height,
        });
        self.preset = PresetSize::Custom;
        self.state = UiState::Idle;
    }

    fn export(&mut self) {
        let Some(rect) = self.session.rect().filter(|_| self.session.export_enabled()) else {
            return;
        };

        let path = self
            .output
            .clone()
            .unwrap_or_else(|| ImageProcessor::default_output_path(Path::new(".")));

        match ImageProcessor::export(&self.image, &rect, &path, self.config.jpeg_quality) {
            Ok(written) => {
                if let Ok(mut result) = self.result.lock() {
                    result.exported.push(written.clone());
                }
                self.state = UiState::Exported(written);
            }
            Err(e) => {
                log::error!("export failed: {e}");
                self.state = UiState::Error(e.to_string());
            }
        }
    }

    /// Renders the controls panel and returns the session events it produced.
    fn render_controls(&mut self, ui: &mut egui::Ui) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        let current_ratio = self.session.ratio();

        ui.heading("Crop");
        ui.separator();

        let ratio_text = match RatioChoice::from_ratio(current_ratio) {
            Some(choice) => choice.label().to_string(),
            None => current_ratio.map(|r| r.to_string()).unwrap_or_default(),
        };
        egui::ComboBox::from_label("Aspect ratio")
            .selected_text(ratio_text)
            .show_ui(ui, |ui| {
                for choice in RatioChoice::ALL {
                    let selected = choice.ratio() == current_ratio;
                    if ui.selectable_label(selected, choice.label()).clicked() && !selected {
                        events.push(SessionEvent::RatioChanged {
                            ratio: choice.ratio(),
                        });
                    }
                }
            });

        egui::ComboBox::from_label("Preset size")
            .selected_text(self.preset.label())
            .show_ui(ui, |ui| {
                for preset in PresetSize::ALL {
                    if ui
                        .selectable_value(&mut self.preset, preset, preset.label())
                        .clicked()
                    {
                        events.push(SessionEvent::PresetChanged {
                            preset: preset.label().to_string(),
                        });
                    }
                }
            });

        ui.add_space(8.0);
        ui.label(size_text(self.session.rect()));

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui.button("⟲ Left").clicked() {
                self.rotate(false);
            }
            if ui.button("⟳ Right").clicked() {
                self.rotate(true);
            }
        });

        ui.add_space(8.0);
        let export = ui.add_enabled(self.session.export_enabled(), egui::Button::new("Export"));
        if export.clicked() {
            self.export();
        }

        if let Some(message) = self.state.message() {
            let color = match self.state {
                UiState::Error(_) => egui::Color32::RED,
                _ => egui::Color32::LIGHT_GREEN,
            };
            ui.label(egui::RichText::new(message).color(color));
        }

        ui.with_layout(egui::Layout::bottom_up(egui::Align::LEFT), |ui| {
            ui.label(egui::RichText::new("Enter: export   Esc: close").small());
        });

        events
    }

    /// Draws the image and the crop overlay inside `canvas`.
    fn render_canvas(&self, painter: &egui::Painter, canvas: egui::Rect) {
        let (Some(texture), Some(transform), Some(bounds)) = (
            &self.image_texture,
            self.session.transform(),
            self.session.image_bounds(),
        ) else {
            return;
        };

        let whole = CropRect::new(0.0, 0.0, bounds.width, bounds.height);
        let image_rect = view_rect(&transform, &whole, canvas.min);
        painter.image(
            texture.id(),
            image_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        let Some(rect) = self.session.rect() else {
            return;
        };
        let selection_rect = view_rect(&transform, &rect, canvas.min);

        draw_dim_overlay(painter, image_rect, selection_rect, OVERLAY_ALPHA);
        draw_selection_border(painter, selection_rect, 2.0, egui::Color32::WHITE);
        draw_corner_handles(painter, selection_rect, egui::Color32::WHITE);

        let (pos, align) = size_label_position(selection_rect, canvas, 6.0, 18.0);
        painter.text(
            pos,
            align,
            size_text(Some(rect)),
            egui::FontId::proportional(14.0),
            egui::Color32::WHITE,
        );
    }
}

impl eframe::App for CropperApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Enforce dark mode
        ctx.set_visuals(egui::Visuals::dark());

        // Upload texture on first frame and after every rotation
        if self.image_texture.is_none() {
            if let Some(color_image) = self.color_image.take() {
                self.image_texture =
                    Some(ctx.load_texture("image", color_image, egui::TextureOptions::LINEAR));
            }
        }

        let panel_events = egui::SidePanel::right("controls")
            .resizable(false)
            .exact_width(CONTROLS_WIDTH)
            .show(ctx, |ui| self.render_controls(ui))
            .inner;
        for event in panel_events {
            self.session.handle(event);
        }

        // Canvas with no margins
        let panel_frame = egui::Frame::default()
            .inner_margin(egui::Margin::same(0))
            .outer_margin(egui::Margin::same(0));

        egui::CentralPanel::default()
            .frame(panel_frame)
            .show(ctx, |ui| {
                let canvas = ui.max_rect();

                let viewport = Size::new(canvas.width() as f64, canvas.height() as f64);
                if viewport != self.session.viewport() {
                    self.session.handle(SessionEvent::ViewportResized {
                        width: viewport.width,
                        height: viewport.height,
                    });
                }

                // Popups drawn over the canvas keep it from being hovered
                let response = ui.interact(canvas, ui.id().with("canvas"), egui::Sense::click_and_drag());
                let accepts_press = response.hovered() || response.is_pointer_button_down_on();

                for event in collect_pointer_events(ctx, canvas) {
                    if matches!(event, SessionEvent::PointerDown { .. }) {
                        if !accepts_press {
                            continue;
                        }
                        self.state = UiState::Idle;
                    }
                    self.session.handle(event);
                }

                self.render_canvas(ui.painter(), canvas);
            });

        if ctx.input(|i| i.key_pressed(egui::Key::Enter)) {
            self.export();
        }

        // Handle escape to close
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }
}

/// Width and height readout, to two decimals.
fn size_text(rect: Option<CropRect>) -> String {
    match rect {
        Some(rect) => {
            let (w, h) = rect.rounded_size();
            format!("{w:.2} × {h:.2}")
        }
        None => "No selection".to_string(),
    }
}

/// Pre-converts an image for texture upload.
fn to_color_image(image: &DynamicImage) -> egui::ColorImage {
    let image_buffer = image.to_rgba8();
    let size = [image.width() as usize, image.height() as usize];
    let pixels = image_buffer.as_flat_samples();
    egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice())
}

/// Opens the cropper window and blocks until it is closed.
///
/// # Arguments
/// * `image` - The image to crop
/// * `config` - Application configuration
/// * `output` - Export path, or `None` for a timestamped name in the
///   working directory
///
/// # Returns
/// Every path written while the window was open.
pub fn run(image: DynamicImage, config: Config, output: Option<PathBuf>) -> Result<CropResult> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([480.0, 320.0]),
        ..Default::default()
    };

    let result = Arc::new(Mutex::new(CropResult::default()));
    let app_result = result.clone();

    eframe::run_native(
        "SnapCrop",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(CropperApp::new(image, app_result, config, output)) as Box<dyn eframe::App>)
        }),
    )
    .map_err(|e| AppError::ui(format!("Failed to run UI: {}", e)))?;

    // Extract result from shared state
    let lock = result
        .lock()
        .map_err(|_| AppError::ui("Failed to acquire result lock"))?;
    Ok(lock.clone())
}
