//! Pointer input translation.
//!
//! egui reports pointer positions in window coordinates. The session works in
//! viewport coordinates relative to the canvas, so every event is shifted by
//! the canvas origin before it is forwarded.

use crate::session::{PointerButton, SessionEvent};
use eframe::egui;

/// Maps an egui button to the session's button type.
pub(crate) fn map_button(button: egui::PointerButton) -> PointerButton {
    match button {
        egui::PointerButton::Primary => PointerButton::Primary,
        egui::PointerButton::Middle => PointerButton::Middle,
        _ => PointerButton::Secondary,
    }
}

/// Converts one raw egui event into a session event.
///
/// Presses are only forwarded when they land on the canvas, so clicks on the
/// side panel never start a drag. Moves and releases are forwarded wherever
/// they happen; the session clamps them to the image.
pub(crate) fn translate(event: &egui::Event, canvas: egui::Rect) -> Option<SessionEvent> {
    let local = |pos: egui::Pos2| {
        let v = pos - canvas.min;
        (v.x as f64, v.y as f64)
    };

    match event {
        egui::Event::PointerButton {
            pos,
            button,
            pressed: true,
            ..
        } => {
            if !canvas.contains(*pos) {
                return None;
            }
            let (x, y) = local(*pos);
            Some(SessionEvent::PointerDown {
                x,
                y,
                button: map_button(*button),
            })
        }
        egui::Event::PointerButton {
            pos,
            button,
            pressed: false,
            ..
        } => {
            let (x, y) = local(*pos);
            Some(SessionEvent::PointerUp {
                x,
                y,
                button: map_button(*button),
            })
        }
        egui::Event::PointerMoved(pos) => {
            let (x, y) = local(*pos);
            Some(SessionEvent::PointerMove { x, y })
        }
        _ => None,
    }
}

/// Translates every pointer event of the current frame, in order.
pub(crate) fn collect_pointer_events(ctx: &egui::Context, canvas: egui::Rect) -> Vec<SessionEvent> {
    ctx.input(|i| i.events.iter().filter_map(|e| translate(e, canvas)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> egui::Rect {
        egui::Rect::from_min_size(egui::pos2(200.0, 50.0), egui::vec2(600.0, 400.0))
    }

    fn button(x: f32, y: f32, pressed: bool) -> egui::Event {
        egui::Event::PointerButton {
            pos: egui::pos2(x, y),
            button: egui::PointerButton::Primary,
            pressed,
            modifiers: egui::Modifiers::default(),
        }
    }

    #[test]
    fn press_inside_canvas_is_made_relative() {
        assert_eq!(
            translate(&button(250.0, 80.0, true), canvas()),
            Some(SessionEvent::pointer_down(50.0, 30.0))
        );
    }

    #[test]
    fn press_outside_canvas_is_dropped() {
        assert_eq!(translate(&button(100.0, 80.0, true), canvas()), None);
    }

    #[test]
    fn release_and_move_outside_canvas_still_arrive() {
        assert_eq!(
            translate(&button(100.0, 80.0, false), canvas()),
            Some(SessionEvent::pointer_up(-100.0, 30.0))
        );
        assert_eq!(
            translate(&egui::Event::PointerMoved(egui::pos2(900.0, 60.0)), canvas()),
            Some(SessionEvent::PointerMove { x: 700.0, y: 10.0 })
        );
    }

    #[test]
    fn secondary_buttons_are_mapped() {
        assert_eq!(map_button(egui::PointerButton::Secondary), PointerButton::Secondary);
        assert_eq!(map_button(egui::PointerButton::Middle), PointerButton::Middle);
        assert_eq!(map_button(egui::PointerButton::Extra1), PointerButton::Secondary);
    }

    #[test]
    fn unrelated_events_are_ignored() {
        assert_eq!(translate(&egui::Event::PointerGone, canvas()), None);
    }
}
