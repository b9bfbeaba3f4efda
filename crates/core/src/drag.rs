//! Drag mode classification and tracking.
//!
//! A pointer-down picks one [`DragMode`]; it stays fixed until the pointer is
//! released. The mode decides which coordinates follow the pointer and which
//! corner the constraint solver holds still.

use crate::geometry::{CropRect, Point};

/// Default corner grab tolerance, in view pixels.
pub const HIT_TOLERANCE: f64 = 10.0;

/// What the current drag is doing to the rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragMode {
    /// No drag in progress.
    #[default]
    None,
    /// Drawing a new rectangle from the press point.
    Create,
    /// Translating the whole rectangle.
    Move,
    ResizeTopLeft,
    ResizeTopRight,
    ResizeBottomLeft,
    ResizeBottomRight,
}

/// The point the constraint solver keeps fixed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Anchor {
    #[default]
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Center,
}

impl DragMode {
    /// Solver anchor for this mode.
    ///
    /// Resizing anchors on the corner under the pointer, moving anchors on the
    /// center, anything else on the top-left corner.
    pub fn anchor(self) -> Anchor {
        match self {
            DragMode::ResizeTopLeft => Anchor::TopLeft,
            DragMode::ResizeTopRight => Anchor::TopRight,
            DragMode::ResizeBottomLeft => Anchor::BottomLeft,
            DragMode::ResizeBottomRight => Anchor::BottomRight,
            DragMode::Move => Anchor::Center,
            DragMode::Create | DragMode::None => Anchor::TopLeft,
        }
    }

    pub fn is_resize(self) -> bool {
        matches!(
            self,
            DragMode::ResizeTopLeft
                | DragMode::ResizeTopRight
                | DragMode::ResizeBottomLeft
                | DragMode::ResizeBottomRight
        )
    }

    /// Writes `p` into the coordinates owned by the dragged corner.
    ///
    /// Modes other than `Resize*` leave the rectangle untouched.
    pub fn apply_corner(self, rect: &CropRect, p: Point) -> CropRect {
        let mut r = *rect;
        match self {
            DragMode::ResizeTopLeft => {
                r.x1 = p.x;
                r.y1 = p.y;
            }
            DragMode::ResizeTopRight => {
                r.x2 = p.x;
                r.y1 = p.y;
            }
            DragMode::ResizeBottomLeft => {
                r.x1 = p.x;
                r.y2 = p.y;
            }
            DragMode::ResizeBottomRight => {
                r.x2 = p.x;
                r.y2 = p.y;
            }
            DragMode::None | DragMode::Create | DragMode::Move => {}
        }
        r
    }
}

/// Picks the drag mode for a pointer-down at image-space point `p`.
///
/// `margin` is the corner grab distance already converted to image pixels.
/// Corners are tested top-left, top-right, bottom-left, bottom-right, and the
/// first hit wins, so a collapsed rectangle always resolves the same way.
pub fn classify(p: Point, rect: Option<&CropRect>, margin: f64) -> DragMode {
    let Some(r) = rect else {
        return DragMode::Create;
    };

    let near = |cx: f64, cy: f64| (p.x - cx).abs() < margin && (p.y - cy).abs() < margin;

    if near(r.x1, r.y1) {
        DragMode::ResizeTopLeft
    } else if near(r.x2, r.y1) {
        DragMode::ResizeTopRight
    } else if near(r.x1, r.y2) {
        DragMode::ResizeBottomLeft
    } else if near(r.x2, r.y2) {
        DragMode::ResizeBottomRight
    } else if r.contains_strict(p) {
        DragMode::Move
    } else {
        DragMode::Create
    }
}

/// Drag bookkeeping between pointer-down and pointer-up.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragState {
    pub mode: DragMode,
    /// Where the drag started, in image space.
    pub origin: Point,
    /// Pointer position at the previous move event, in image space.
    pub last: Point,
}

impl DragState {
    pub fn start(&mut self, mode: DragMode, at: Point) {
        self.mode = mode;
        self.origin = at;
        self.last = at;
    }

    pub fn stop(&mut self) {
        *self = Self::default();
    }

    pub fn is_dragging(&self) -> bool {
        self.mode != DragMode::None
    }

    /// Records `p` and returns the delta since the previous event.
    pub fn advance(&mut self, p: Point) -> (f64, f64) {
        let delta = (p.x - self.last.x, p.y - self.last.y);
        self.last = p;
        delta
    }
}
