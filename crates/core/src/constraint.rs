//! Aspect-ratio enforcement for crop rectangles.
//!
//! [`enforce`] reshapes a rectangle to a target ratio while holding one
//! [`Anchor`] still, then fits the result inside the image. All five anchors go
//! through the same routine: each anchor is described per axis by an
//! `Extent` saying which way the free side grows from the anchor point.
//!
//! # Example
//!
//! ```
//! use snapcrop_core::constraint::{enforce, AspectRatio};
//! use snapcrop_core::drag::Anchor;
//! use snapcrop_core::geometry::{CropRect, Size};
//!
//! let ratio = AspectRatio::new(1.0, 1.0).unwrap();
//! let rect = CropRect::new(0.0, 0.0, 700.0, 100.0);
//! let square = enforce(&rect, ratio, Anchor::TopLeft, Size::new(800.0, 600.0));
//!
//! assert_eq!(square, CropRect::new(0.0, 0.0, 600.0, 600.0));
//! ```

use crate::drag::Anchor;
use crate::error::ParseError;
use crate::geometry::{CropRect, ImageBounds, MIN_SIZE, Point, Size};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Longer edge of the box used when a constrained rectangle collapses below
/// [`MIN_SIZE`].
pub const FALLBACK_EDGE: f64 = 20.0;

/// Relative tolerance under which a rectangle already counts as matching the
/// target ratio.
const RATIO_EPSILON: f64 = 1e-9;

/// A fixed width:height proportion. Both terms are positive and finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AspectRatio {
    width: f64,
    height: f64,
}

impl AspectRatio {
    /// Returns `None` unless both terms are positive and finite.
    pub fn new(width: f64, height: f64) -> Option<Self> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        (valid(width) && valid(height)).then_some(Self { width, height })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// `width / height`.
    pub fn value(&self) -> f64 {
        self.width / self.height
    }
}

impl FromStr for AspectRatio {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseError::Ratio(s.to_string());
        let (w, h) = s.trim().split_once(':').ok_or_else(err)?;
        let w: f64 = w.trim().parse().map_err(|_| err())?;
        let h: f64 = h.trim().parse().map_err(|_| err())?;
        Self::new(w, h).ok_or_else(err)
    }
}

impl TryFrom<String> for AspectRatio {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AspectRatio> for String {
    fn from(value: AspectRatio) -> Self {
        value.to_string()
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

/// How the free side of one axis relates to the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Extent {
    /// Anchor is the low edge; the rectangle grows toward the high edge.
    Forward,
    /// Anchor is the high edge; the rectangle grows toward zero.
    Backward,
    /// Anchor is the midpoint; both edges move symmetrically.
    Both,
}

impl Extent {
    /// The anchor coordinate of the span `[lo, hi]`.
    fn pivot(self, lo: f64, hi: f64) -> f64 {
        match self {
            Extent::Forward => lo,
            Extent::Backward => hi,
            Extent::Both => (lo + hi) / 2.0,
        }
    }

    /// Largest length the free side can take without crossing `[0, limit]`.
    ///
    /// A centered span may use the full limit: it is shifted into place
    /// afterwards instead of shrunk around its midpoint.
    fn room(self, pivot: f64, limit: f64) -> f64 {
        match self {
            Extent::Forward => limit - pivot,
            Extent::Backward => pivot,
            Extent::Both => limit,
        }
    }

    /// The span of length `len` attached to `pivot`.
    fn span(self, pivot: f64, len: f64) -> (f64, f64) {
        match self {
            Extent::Forward => (pivot, pivot + len),
            Extent::Backward => (pivot - len, pivot),
            Extent::Both => (pivot - len / 2.0, pivot + len / 2.0),
        }
    }
}

impl Anchor {
    /// Per-axis extents `(x, y)` for this anchor.
    pub(crate) fn extents(self) -> (Extent, Extent) {
        match self {
            Anchor::TopLeft => (Extent::Forward, Extent::Forward),
            Anchor::TopRight => (Extent::Backward, Extent::Forward),
            Anchor::BottomLeft => (Extent::Forward, Extent::Backward),
            Anchor::BottomRight => (Extent::Backward, Extent::Backward),
            Anchor::Center => (Extent::Both, Extent::Both),
        }
    }

    /// The anchor point of a normalized rectangle.
    pub fn point_of(self, rect: &CropRect) -> Point {
        let (ex, ey) = self.extents();
        Point::new(ex.pivot(rect.x1, rect.x2), ey.pivot(rect.y1, rect.y2))
    }
}

/// Reshapes `rect` to `ratio`, holding `anchor` still and staying in `bounds`.
///
/// The result is always normalized and inside the bounds. Its proportions
/// match the ratio unless the image is too small to hold the minimum box, in
/// which case the ratio is still kept but the size drops below [`MIN_SIZE`].
/// Applying `enforce` to its own output changes nothing.
pub fn enforce(rect: &CropRect, ratio: AspectRatio, anchor: Anchor, bounds: ImageBounds) -> CropRect {
    let n = rect.normalized();
    let size = proportioned(n.size(), ratio.value());
    settle(anchor.point_of(&n), size, ratio.value(), anchor, bounds)
}

/// Grows the proportionally short dimension of `size` to match `r`.
///
/// Both dimensions are floored at 1 before comparing.
pub(crate) fn proportioned(size: Size, r: f64) -> Size {
    let w = size.width.max(1.0);
    let h = size.height.max(1.0);
    let current = w / h;

    if (current - r).abs() <= RATIO_EPSILON * r {
        Size::new(w, h)
    } else if current > r {
        Size::new(w, w / r)
    } else {
        Size::new(h * r, h)
    }
}

/// Places a ratio-correct `size` at `pivot` and fits it into `bounds`.
///
/// This is the boundary pipeline shared by live dragging and ratio changes:
/// the anchor is pulled into the image, the free sides are shrunk (keeping the
/// ratio) where they would cross an edge, a centered box is shifted back in,
/// and a collapsed result is replaced by the minimum box.
pub(crate) fn settle(pivot: Point, size: Size, r: f64, anchor: Anchor, bounds: ImageBounds) -> CropRect {
    let (ex, ey) = anchor.extents();
    let pivot = Point::new(
        pivot.x.clamp(0.0, bounds.width.max(0.0)),
        pivot.y.clamp(0.0, bounds.height.max(0.0)),
    );

    let room = Size::new(ex.room(pivot.x, bounds.width), ey.room(pivot.y, bounds.height));
    let size = shrink_to(size, room);
    let rect = place(pivot, size, anchor, bounds);

    if rect.width() < MIN_SIZE || rect.height() < MIN_SIZE {
        log::debug!("constrained rectangle collapsed to {rect}, using minimum box");
        return minimum_box(pivot, r, anchor, bounds);
    }
    rect
}

/// Builds the span for each axis, shifts it into bounds, and clamps.
fn place(pivot: Point, size: Size, anchor: Anchor, bounds: ImageBounds) -> CropRect {
    let (ex, ey) = anchor.extents();
    let (x1, x2) = ex.span(pivot.x, size.width);
    let (y1, y2) = ey.span(pivot.y, size.height);
    CropRect::new(x1, y1, x2, y2)
        .shifted_into(bounds)
        .clamped(bounds)
}

/// Scales `size` down, keeping its proportions, so it fits inside `room`.
/// Never grows. The limiting dimension lands exactly on the room edge.
fn shrink_to(size: Size, room: Size) -> Size {
    if size.width <= 0.0 || size.height <= 0.0 {
        return size;
    }
    let kx = room.width / size.width;
    let ky = room.height / size.height;
    if kx >= 1.0 && ky >= 1.0 {
        return size;
    }

    let aspect = size.width / size.height;
    if kx <= ky {
        let w = room.width.max(0.0);
        Size::new(w, w / aspect)
    } else {
        let h = room.height.max(0.0);
        Size::new(h * aspect, h)
    }
}

/// Smallest box of ratio `r` whose short side is at least [`MIN_SIZE`],
/// placed from `pivot` by the anchor rule and kept inside `bounds`.
///
/// If the image cannot hold that box it is scaled down to the largest
/// ratio-correct box that fits.
fn minimum_box(pivot: Point, r: f64, anchor: Anchor, bounds: ImageBounds) -> CropRect {
    let long = FALLBACK_EDGE.max(MIN_SIZE * r.max(1.0 / r));
    let size = if r >= 1.0 {
        Size::new(long, long / r)
    } else {
        Size::new(long * r, long)
    };
    place(pivot, shrink_to(size, bounds), anchor, bounds)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Size = Size::new(800.0, 600.0);

    fn ratio(w: f64, h: f64) -> AspectRatio {
        AspectRatio::new(w, h).unwrap()
    }

    fn assert_ratio(rect: &CropRect, r: AspectRatio) {
        let actual = rect.width() / rect.height();
        assert!(
            (actual - r.value()).abs() < 1e-6,
            "{rect} has ratio {actual}, expected {}",
            r.value()
        );
    }

    fn assert_close(a: &CropRect, b: &CropRect) {
        let d = (a.x1 - b.x1).abs() + (a.y1 - b.y1).abs() + (a.x2 - b.x2).abs() + (a.y2 - b.y2).abs();
        assert!(d < 1e-9, "{a} != {b}");
    }

    #[test]
    fn parses_ratio_strings() {
        assert_eq!("16:9".parse::<AspectRatio>(), Ok(ratio(16.0, 9.0)));
        assert!("16-9".parse::<AspectRatio>().is_err());
        assert!("0:1".parse::<AspectRatio>().is_err());
        assert!(AspectRatio::new(f64::NAN, 1.0).is_none());
    }

    #[test]
    fn wide_drag_grows_height_from_top_left() {
        let r = enforce(&CropRect::new(10.0, 10.0, 210.0, 20.0), ratio(2.0, 1.0), Anchor::TopLeft, BOUNDS);
        assert_eq!(r, CropRect::new(10.0, 10.0, 210.0, 110.0));
    }

    #[test]
    fn tall_drag_grows_width_from_top_left() {
        let r = enforce(&CropRect::new(10.0, 10.0, 20.0, 310.0), ratio(3.0, 2.0), Anchor::TopLeft, BOUNDS);
        assert_eq!(r, CropRect::new(10.0, 10.0, 460.0, 310.0));
    }

    #[test]
    fn square_overflowing_bottom_edge_is_shrunk() {
        let r = enforce(&CropRect::new(0.0, 0.0, 700.0, 100.0), ratio(1.0, 1.0), Anchor::TopLeft, BOUNDS);
        assert_eq!(r, CropRect::new(0.0, 0.0, 600.0, 600.0));
    }

    #[test]
    fn bottom_right_anchor_grows_up_and_left() {
        let r = enforce(&CropRect::new(600.0, 500.0, 700.0, 550.0), ratio(1.0, 1.0), Anchor::BottomRight, BOUNDS);
        assert_eq!(r, CropRect::new(600.0, 450.0, 700.0, 550.0));
    }

    #[test]
    fn top_right_anchor_flush_with_left_edge() {
        // Width 300 at 1:2 wants height 600 from y=100, which overflows.
        let r = enforce(&CropRect::new(0.0, 100.0, 300.0, 110.0), ratio(1.0, 2.0), Anchor::TopRight, BOUNDS);
        assert_ratio(&r, ratio(1.0, 2.0));
        assert_eq!(r.x2, 300.0);
        assert_eq!(r.y1, 100.0);
        assert_eq!(r.y2, 600.0);
        assert!(r.is_within(BOUNDS));
    }

    #[test]
    fn bottom_left_anchor_flush_with_top_and_right_edges() {
        let r = enforce(&CropRect::new(200.0, 300.0, 800.0, 310.0), ratio(1.0, 1.0), Anchor::BottomLeft, BOUNDS);
        assert_eq!(r, CropRect::new(200.0, 0.0, 510.0, 310.0));
    }

    #[test]
    fn center_anchor_shifts_before_shrinking() {
        // 16:9 around (790, 300) with width 200: overflows right, fits after shift.
        let r = enforce(&CropRect::new(690.0, 290.0, 890.0, 310.0), ratio(16.0, 9.0), Anchor::Center, BOUNDS);
        assert_ratio(&r, ratio(16.0, 9.0));
        assert!((r.width() - 200.0).abs() < 1e-9);
        assert_eq!(r.x2, 800.0);
        assert!(r.is_within(BOUNDS));
    }

    #[test]
    fn center_anchor_larger_than_image_is_shrunk_to_fit() {
        let r = enforce(&CropRect::new(0.0, 0.0, 1600.0, 10.0), ratio(1.0, 1.0), Anchor::Center, BOUNDS);
        assert_ratio(&r, ratio(1.0, 1.0));
        assert!((r.height() - 600.0).abs() < 1e-9);
        assert!(r.is_within(BOUNDS));
    }

    #[test]
    fn unordered_input_is_normalized_first() {
        let r = enforce(&CropRect::new(210.0, 20.0, 10.0, 10.0), ratio(2.0, 1.0), Anchor::TopLeft, BOUNDS);
        assert_eq!(r, CropRect::new(10.0, 10.0, 210.0, 110.0));
    }

    #[test]
    fn collapsed_rect_becomes_minimum_box() {
        let r = enforce(&CropRect::new(100.0, 100.0, 100.0, 100.0), ratio(16.0, 9.0), Anchor::TopLeft, BOUNDS);
        assert_ratio(&r, ratio(16.0, 9.0));
        assert_eq!((r.x1, r.y1), (100.0, 100.0));
        assert!(r.width() >= MIN_SIZE && r.height() >= MIN_SIZE);
        assert!(r.is_exportable());
    }

    #[test]
    fn minimum_box_in_corner_stays_inside() {
        let r = enforce(&CropRect::new(795.0, 595.0, 800.0, 600.0), ratio(1.0, 1.0), Anchor::TopLeft, BOUNDS);
        assert_eq!(r, CropRect::new(780.0, 580.0, 800.0, 600.0));
    }

    #[test]
    fn extreme_ratio_keeps_short_side_at_minimum() {
        let r = enforce(&CropRect::new(0.0, 0.0, 1.0, 1.0), ratio(5.0, 1.0), Anchor::TopLeft, BOUNDS);
        assert_ratio(&r, ratio(5.0, 1.0));
        assert!((r.height() - MIN_SIZE).abs() < 1e-9);
    }

    #[test]
    fn tiny_image_keeps_ratio_below_minimum() {
        let tiny = Size::new(8.0, 8.0);
        let r = enforce(&CropRect::new(0.0, 0.0, 4.0, 2.0), ratio(2.0, 1.0), Anchor::TopLeft, tiny);
        assert_ratio(&r, ratio(2.0, 1.0));
        assert!(r.is_within(tiny));
        assert!(!r.is_exportable());
    }

    #[test]
    fn enforce_is_idempotent_for_edge_cases() {
        let cases = [
            (CropRect::new(0.0, 0.0, 700.0, 100.0), Anchor::TopLeft),
            (CropRect::new(795.0, 595.0, 800.0, 600.0), Anchor::BottomRight),
            (CropRect::new(690.0, 290.0, 890.0, 310.0), Anchor::Center),
            (CropRect::new(0.0, 100.0, 300.0, 110.0), Anchor::TopRight),
        ];
        for (rect, anchor) in cases {
            let once = enforce(&rect, ratio(3.0, 2.0), anchor, BOUNDS);
            let twice = enforce(&once, ratio(3.0, 2.0), anchor, BOUNDS);
            assert_close(&once, &twice);
        }
    }
}
