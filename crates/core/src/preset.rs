//! Ratio and preset selectors, and the re-fitters that apply them to an
//! existing rectangle.
//!
//! Both re-fitters keep the current center. A preset sets an exact pixel size
//! and only ever shifts the box to keep it on the image; a ratio change goes
//! through the same boundary pipeline as live dragging, anchored at the center.

use crate::constraint::{self, AspectRatio};
use crate::drag::Anchor;
use crate::error::ParseError;
use crate::geometry::{CropRect, ImageBounds, MIN_SIZE, Size};
use std::fmt;

/// Entries of the aspect ratio selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RatioChoice {
    #[default]
    Free,
    Square,
    Standard,
    Widescreen,
    Photo,
    Portrait,
}

impl RatioChoice {
    pub const ALL: [RatioChoice; 6] = [
        RatioChoice::Free,
        RatioChoice::Square,
        RatioChoice::Standard,
        RatioChoice::Widescreen,
        RatioChoice::Photo,
        RatioChoice::Portrait,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RatioChoice::Free => "Free",
            RatioChoice::Square => "1:1 (Square)",
            RatioChoice::Standard => "4:3 (Standard)",
            RatioChoice::Widescreen => "16:9 (Widescreen)",
            RatioChoice::Photo => "3:2 (Photo)",
            RatioChoice::Portrait => "2:3 (Portrait)",
        }
    }

    /// The constraint this entry selects; `None` for free-form.
    pub fn ratio(self) -> Option<AspectRatio> {
        let (w, h) = match self {
            RatioChoice::Free => return None,
            RatioChoice::Square => (1.0, 1.0),
            RatioChoice::Standard => (4.0, 3.0),
            RatioChoice::Widescreen => (16.0, 9.0),
            RatioChoice::Photo => (3.0, 2.0),
            RatioChoice::Portrait => (2.0, 3.0),
        };
        AspectRatio::new(w, h)
    }

    /// The entry matching `ratio` exactly, if there is one.
    pub fn from_ratio(ratio: Option<AspectRatio>) -> Option<Self> {
        Self::ALL.into_iter().find(|choice| choice.ratio() == ratio)
    }
}

impl fmt::Display for RatioChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parses a ratio selection: `free` (any case) or `W:H`.
pub fn parse_ratio(s: &str) -> Result<Option<AspectRatio>, ParseError> {
    if s.trim().eq_ignore_ascii_case("free") {
        Ok(None)
    } else {
        s.parse().map(Some)
    }
}

/// Entries of the preset size selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PresetSize {
    #[default]
    Custom,
    FullHd,
    Hd,
    Thumbnail,
}

impl PresetSize {
    pub const ALL: [PresetSize; 4] = [
        PresetSize::Custom,
        PresetSize::FullHd,
        PresetSize::Hd,
        PresetSize::Thumbnail,
    ];

    /// Selector text; everything but `Custom` parses back as `WxH`.
    pub fn label(self) -> &'static str {
        match self {
            PresetSize::Custom => "Custom",
            PresetSize::FullHd => "1920x1080",
            PresetSize::Hd => "1280x720",
            PresetSize::Thumbnail => "150x150",
        }
    }

    pub fn size(self) -> Option<Size> {
        match self {
            PresetSize::Custom => None,
            other => other.label().parse().ok(),
        }
    }
}

impl fmt::Display for PresetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parses a preset selection: `custom` (any case) or `WxH`.
pub fn parse_preset(s: &str) -> Result<Option<Size>, ParseError> {
    if s.trim().eq_ignore_ascii_case("custom") {
        Ok(None)
    } else {
        s.parse().map(Some)
    }
}

/// Replaces `rect` with a `target`-sized box on the same center.
///
/// The box is translated (not shrunk) to stay on the image. Only a preset
/// larger than the image itself is cut down to the image size.
pub fn apply_preset(rect: &CropRect, target: Size, bounds: ImageBounds) -> CropRect {
    let size = Size::new(target.width.min(bounds.width), target.height.min(bounds.height));
    CropRect::from_center(rect.normalized().center(), size)
        .shifted_into(bounds)
        .clamped(bounds)
}

/// Reshapes `rect` to a newly selected `ratio` around its center.
///
/// The proportionally short side is enlarged to match the ratio, both sides
/// are floored at [`MIN_SIZE`], and the result is fitted into the image by the
/// same shift-then-shrink pipeline the solver uses.
pub fn refit_ratio(rect: &CropRect, ratio: AspectRatio, bounds: ImageBounds) -> CropRect {
    let n = rect.normalized();
    let r = ratio.value();

    let mut size = constraint::proportioned(n.size(), r);
    if size.width < MIN_SIZE {
        size = Size::new(MIN_SIZE, MIN_SIZE / r);
    }
    if size.height < MIN_SIZE {
        size = Size::new(MIN_SIZE * r, MIN_SIZE);
    }

    constraint::settle(n.center(), size, r, Anchor::Center, bounds)
}
