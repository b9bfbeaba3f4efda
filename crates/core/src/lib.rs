//! SnapCrop Core Library
//!
//! This library provides the crop-rectangle engine behind the SnapCrop image
//! cropper: pointer-driven drawing, moving and resizing of a crop rectangle
//! over an image, with optional fixed aspect ratio, preset sizes, bounds
//! clamping and a minimum size.
//!
//! # Overview
//!
//! The engine is toolkit independent. A host forwards typed
//! [`SessionEvent`]s to a [`CropSession`] and reads back the current
//! rectangle (in image pixels) and whether export is allowed. The library
//! handles:
//!
//! - **Coordinate mapping** between the viewport and the image via [`transform`]
//! - **Drag classification** (create, move, resize by corner) via [`drag`]
//! - **Aspect ratio enforcement** with bounds and minimum size via [`constraint`]
//! - **Ratio and preset re-fitting** via [`preset`]
//! - **Export** of the final crop via [`image_processing`]
//! - **Interactive window** built on `eframe` via [`ui`]
//!
//! # Quick Start
//!
//! ```
//! use snapcrop_core::{CropSession, SessionEvent};
//! use snapcrop_core::constraint::AspectRatio;
//!
//! let mut session = CropSession::default();
//! session.handle(SessionEvent::ImageChanged { width: 800.0, height: 600.0 });
//! session.handle(SessionEvent::ViewportResized { width: 800.0, height: 600.0 });
//! session.handle(SessionEvent::RatioChanged { ratio: AspectRatio::new(1.0, 1.0) });
//!
//! session.handle(SessionEvent::pointer_down(0.0, 0.0));
//! session.handle(SessionEvent::PointerMove { x: 700.0, y: 100.0 });
//! let out = session.handle(SessionEvent::pointer_up(700.0, 100.0));
//!
//! assert_eq!(out.rect.unwrap().rounded_size(), (600.0, 600.0));
//! ```
//!
//! # Module Structure
//!
//! - [`config`]: Configuration loading and management
//! - [`constraint`]: Aspect ratio solver
//! - [`drag`]: Drag modes and hit testing
//! - [`error`]: Error types and result aliases
//! - [`geometry`]: Points, sizes and crop rectangles
//! - [`image_processing`]: Cropping, rotation and saving
//! - [`preset`]: Ratio and preset selectors
//! - [`session`]: The event-driven crop session
//! - [`transform`]: Viewport/image coordinate mapping
//! - [`ui`]: User interface components

pub mod config;
pub mod constraint;
pub mod drag;
pub mod error;
pub mod geometry;
pub mod image_processing;
pub mod preset;
pub mod session;
pub mod transform;
pub mod ui;

// Re-export primary types for convenience
pub use config::Config;
pub use error::{AppError, Result};
pub use geometry::{CropRect, Point, Size};
pub use image_processing::ImageProcessor;
pub use session::{CropSession, SessionEvent, SessionOutput};

/// Initializes the library by loading environment variables.
///
/// Call this once at application startup. It loads a `.env` file if present.
pub fn init() {
    let _ = dotenvy::dotenv();
}
