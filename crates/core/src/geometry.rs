//! Rectangle and point primitives in image pixel space.
//!
//! Everything here is plain `f64` math with no knowledge of the UI toolkit.
//! The host converts to and from its own types at the edge (see
//! [`crate::ui`]).

use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Smallest width and height (in image pixels) of a rectangle that can be
/// exported.
pub const MIN_SIZE: f64 = 10.0;

/// A point in either image or view space, depending on context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A width/height pair. Used for both viewport and image dimensions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero, negative or not finite.
    pub fn is_empty(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0)
    }
}

/// Parses `WxH`; `x`, `X` and `×` are all accepted as separators.
impl FromStr for Size {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseError::Size(s.to_string());
        let (w, h) = s
            .trim()
            .split_once(['x', 'X', '×'])
            .ok_or_else(err)?;
        let width: u32 = w.trim().parse().map_err(|_| err())?;
        let height: u32 = h.trim().parse().map_err(|_| err())?;
        if width == 0 || height == 0 {
            return Err(err());
        }
        Ok(Self::new(width as f64, height as f64))
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Dimensions of the displayed image: the clamp domain for all rectangle math.
pub type ImageBounds = Size;

/// A crop rectangle in image pixel space.
///
/// While a drag is in progress the corners may be in any order: the second
/// corner simply follows the pointer. [`CropRect::normalized`] reorders them so
/// that `(x1, y1)` is the top-left and `(x2, y2)` the bottom-right corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl CropRect {
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// A zero-area rectangle at `p`, the seed for a fresh drag.
    pub const fn at_point(p: Point) -> Self {
        Self::new(p.x, p.y, p.x, p.y)
    }

    /// Builds a rectangle of `size` centered on `center`.
    pub fn from_center(center: Point, size: Size) -> Self {
        let hw = size.width / 2.0;
        let hh = size.height / 2.0;
        Self::new(center.x - hw, center.y - hh, center.x + hw, center.y + hh)
    }

    /// Returns the rectangle with corners reordered to (min, min)-(max, max).
    pub fn normalized(&self) -> Self {
        Self::new(
            self.x1.min(self.x2),
            self.y1.min(self.y2),
            self.x1.max(self.x2),
            self.y1.max(self.y2),
        )
    }

    pub fn is_normalized(&self) -> bool {
        self.x1 <= self.x2 && self.y1 <= self.y2
    }

    /// Absolute horizontal extent, regardless of corner order.
    pub fn width(&self) -> f64 {
        (self.x2 - self.x1).abs()
    }

    /// Absolute vertical extent, regardless of corner order.
    pub fn height(&self) -> f64 {
        (self.y2 - self.y1).abs()
    }

    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    pub fn center(&self) -> Point {
        Point::new((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    /// Width and height rounded to two decimal places, for display.
    pub fn rounded_size(&self) -> (f64, f64) {
        let round = |v: f64| (v * 100.0).round() / 100.0;
        (round(self.width()), round(self.height()))
    }

    /// True if `p` lies strictly inside the (normalized) rectangle.
    pub fn contains_strict(&self, p: Point) -> bool {
        let n = self.normalized();
        n.x1 < p.x && p.x < n.x2 && n.y1 < p.y && p.y < n.y2
    }

    /// True if every coordinate lies within `[0, width] × [0, height]`.
    pub fn is_within(&self, bounds: ImageBounds) -> bool {
        let n = self.normalized();
        n.x1 >= 0.0 && n.y1 >= 0.0 && n.x2 <= bounds.width && n.y2 <= bounds.height
    }

    /// Whether the rectangle is large enough to be exported.
    ///
    /// Both dimensions have to strictly exceed [`MIN_SIZE`].
    pub fn is_exportable(&self) -> bool {
        self.width() > MIN_SIZE && self.height() > MIN_SIZE
    }

    /// Clamps every coordinate independently into the bounds.
    pub fn clamped(&self, bounds: ImageBounds) -> Self {
        Self::new(
            self.x1.clamp(0.0, bounds.width),
            self.y1.clamp(0.0, bounds.height),
            self.x2.clamp(0.0, bounds.width),
            self.y2.clamp(0.0, bounds.height),
        )
    }

    /// Moves the rectangle by `(dx, dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x1 + dx, self.y1 + dy, self.x2 + dx, self.y2 + dy)
    }

    /// Translates the rectangle the minimum distance needed to fit inside the
    /// bounds. Axes where the rectangle is larger than the bounds are pinned
    /// to the origin edge.
    pub fn shifted_into(&self, bounds: ImageBounds) -> Self {
        let n = self.normalized();
        let dx = shift_into(n.x1, n.x2, bounds.width);
        let dy = shift_into(n.y1, n.y2, bounds.height);
        n.translated(dx, dy)
    }
}

/// Offset that brings the span `[lo, hi]` inside `[0, limit]`.
pub(crate) fn shift_into(lo: f64, hi: f64, limit: f64) -> f64 {
    if lo < 0.0 {
        -lo
    } else if hi > limit {
        (limit - hi).max(-lo)
    } else {
        0.0
    }
}

/// Parses `x1,y1,x2,y2`.
impl FromStr for CropRect {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values: Vec<f64> = s
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .map_err(|_| ParseError::Rect(s.to_string()))?;
        match values.as_slice() {
            [x1, y1, x2, y2] if values.iter().all(|v| v.is_finite()) => {
                Ok(Self::new(*x1, *y1, *x2, *y2))
            }
            _ => Err(ParseError::Rect(s.to_string())),
        }
    }
}

impl fmt::Display for CropRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (w, h) = self.rounded_size();
        write!(
            f,
            "({:.2}, {:.2}) - ({:.2}, {:.2}) [{:.2} x {:.2}]",
            self.x1, self.y1, self.x2, self.y2, w, h
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_swaps_reversed_corners() {
        let r = CropRect::new(50.0, 80.0, 10.0, 20.0).normalized();
        assert_eq!(r, CropRect::new(10.0, 20.0, 50.0, 80.0));
        assert!(r.is_normalized());
    }

    #[test]
    fn rounded_size_keeps_two_decimals() {
        let r = CropRect::new(0.0, 0.0, 10.126, 3.333);
        assert_eq!(r.rounded_size(), (10.13, 3.33));
    }

    #[test]
    fn exportable_requires_strictly_larger_than_min() {
        assert!(!CropRect::new(0.0, 0.0, 10.0, 50.0).is_exportable());
        assert!(CropRect::new(0.0, 0.0, 10.5, 10.5).is_exportable());
    }

    #[test]
    fn contains_strict_excludes_edges() {
        let r = CropRect::new(10.0, 10.0, 20.0, 20.0);
        assert!(r.contains_strict(Point::new(15.0, 15.0)));
        assert!(!r.contains_strict(Point::new(10.0, 15.0)));
    }

    #[test]
    fn shifted_into_moves_minimum_distance() {
        let bounds = Size::new(100.0, 100.0);
        let r = CropRect::new(90.0, -5.0, 110.0, 15.0).shifted_into(bounds);
        assert_eq!(r, CropRect::new(80.0, 0.0, 100.0, 20.0));
    }

    #[test]
    fn parses_sizes_with_any_separator() {
        assert_eq!("1920x1080".parse::<Size>(), Ok(Size::new(1920.0, 1080.0)));
        assert_eq!("150×150".parse::<Size>(), Ok(Size::new(150.0, 150.0)));
        assert!("150".parse::<Size>().is_err());
        assert!("0x10".parse::<Size>().is_err());
    }

    #[test]
    fn parses_rect() {
        assert_eq!(
            "1, 2,3,4".parse::<CropRect>(),
            Ok(CropRect::new(1.0, 2.0, 3.0, 4.0))
        );
        assert!("1,2,3".parse::<CropRect>().is_err());
    }
}
