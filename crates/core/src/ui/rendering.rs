//! Drawing helpers for the crop overlay.
//!
//! Everything here takes view-space `egui` rectangles; conversion from the
//! engine's image-space [`CropRect`] happens once in [`view_rect`].

use crate::geometry::CropRect;
use crate::transform::ViewTransform;
use eframe::egui;

/// Side length of the square corner handles, in view pixels.
pub const HANDLE_SIZE: f32 = 8.0;

/// Converts an image-space rectangle to an on-screen `egui` rectangle.
///
/// `origin` is the top-left of the canvas the transform was built for.
pub fn view_rect(transform: &ViewTransform, rect: &CropRect, origin: egui::Pos2) -> egui::Rect {
    let v = transform.rect_to_view(rect).normalized();
    egui::Rect::from_min_max(
        origin + egui::vec2(v.x1 as f32, v.y1 as f32),
        origin + egui::vec2(v.x2 as f32, v.y2 as f32),
    )
}

/// Dims the image everywhere except the selection.
///
/// # Arguments
/// * `painter` - The egui painter to draw with
/// * `image_rect` - Where the image is drawn
/// * `selection_rect` - The area to keep clear
/// * `alpha` - Darkness level (0-255, higher = darker)
pub fn draw_dim_overlay(
    painter: &egui::Painter,
    image_rect: egui::Rect,
    selection_rect: egui::Rect,
    alpha: u8,
) {
    let color = egui::Color32::from_black_alpha(alpha);
    let sel = selection_rect.intersect(image_rect);

    let bands = [
        // Above
        egui::Rect::from_min_max(image_rect.min, egui::pos2(image_rect.max.x, sel.min.y)),
        // Below
        egui::Rect::from_min_max(egui::pos2(image_rect.min.x, sel.max.y), image_rect.max),
        // Left
        egui::Rect::from_min_max(
            egui::pos2(image_rect.min.x, sel.min.y),
            egui::pos2(sel.min.x, sel.max.y),
        ),
        // Right
        egui::Rect::from_min_max(
            egui::pos2(sel.max.x, sel.min.y),
            egui::pos2(image_rect.max.x, sel.max.y),
        ),
    ];

    for band in bands.into_iter().filter(|b| b.is_positive()) {
        painter.rect_filled(band, 0.0, color);
    }
}

/// Draws a border around the selection rectangle.
pub fn draw_selection_border(
    painter: &egui::Painter,
    selection_rect: egui::Rect,
    stroke_width: f32,
    color: egui::Color32,
) {
    painter.rect_stroke(
        selection_rect,
        0.0,
        egui::Stroke::new(stroke_width, color),
        egui::StrokeKind::Middle,
    );
}

/// Draws the four grab handles at the selection corners.
pub fn draw_corner_handles(painter: &egui::Painter, selection_rect: egui::Rect, color: egui::Color32) {
    let size = egui::vec2(HANDLE_SIZE, HANDLE_SIZE);
    for corner in [
        selection_rect.left_top(),
        selection_rect.right_top(),
        selection_rect.left_bottom(),
        selection_rect.right_bottom(),
    ] {
        painter.rect_filled(egui::Rect::from_center_size(corner, size), 1.0, color);
    }
}

/// Where to put the size readout for a selection.
///
/// Prefers just below the selection, moving above it when the label would
/// leave the canvas.
///
/// # Returns
/// A tuple of (anchor position, text alignment)
pub fn size_label_position(
    selection_rect: egui::Rect,
    canvas_rect: egui::Rect,
    spacing: f32,
    label_height: f32,
) -> (egui::Pos2, egui::Align2) {
    let x = selection_rect.center().x;
    let below = selection_rect.max.y + spacing;

    if below + label_height <= canvas_rect.max.y {
        (egui::pos2(x, below), egui::Align2::CENTER_TOP)
    } else {
        let above = (selection_rect.min.y - spacing).max(canvas_rect.min.y + label_height);
        (egui::pos2(x, above), egui::Align2::CENTER_BOTTOM)
    }
}
