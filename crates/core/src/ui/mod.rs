//! User interface components for snapcrop.
//!
//! This module provides the interactive cropper window. It owns no crop
//! logic: pointer input is translated into [`SessionEvent`]s for a
//! [`CropSession`] and the window paints whatever the session reports.
//!
//! # Architecture
//!
//! The UI is split into focused submodules:
//! - [`state`]: Result and status types
//! - [`rendering`]: Drawing utilities for overlays, borders and handles
//! - [`selection`]: egui input to session event translation
//! - [`cropper`]: Main application logic
//!
//! # Usage
//!
//! ```ignore
//! use snapcrop_core::{ui, Config, ImageProcessor};
//!
//! let config = Config::load()?;
//! let image = ImageProcessor::open("photo.png".as_ref())?;
//!
//! let result = ui::run_cropper(image, config, None)?;
//! for path in result.exported {
//!     println!("Saved {}", path.display());
//! }
//! ```
//!
//! [`SessionEvent`]: crate::session::SessionEvent
//! [`CropSession`]: crate::session::CropSession

mod cropper;
mod rendering;
mod selection;
mod state;

// Public API exports
pub use cropper::CropperApp;
pub use state::{CropResult, UiState};

use crate::config::Config;
use crate::error::Result;
use image::DynamicImage;
use std::path::PathBuf;

/// Opens the cropper window and returns once the user closes it.
///
/// # Arguments
/// * `image` - The image to crop
/// * `config` - Application configuration
/// * `output` - Export path; `None` writes a timestamped JPEG to the working
///   directory
///
/// # Returns
/// - `Ok(result)` - The window closed; `result.exported` lists the files written
/// - `Err(e)` - The window could not be created
pub fn run_cropper(image: DynamicImage, config: Config, output: Option<PathBuf>) -> Result<CropResult> {
    cropper::run(image, config, output)
}
