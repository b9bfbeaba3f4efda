//! Error types for the snapcrop-core library.
//!
//! The geometry engine itself never fails: out-of-range input is corrected by
//! clamping. Errors only come from the edges of the library, namely parsing
//! user-supplied strings, loading configuration, and reading or writing images.

use thiserror::Error;

/// Errors that can occur within the snapcrop-core library.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors (invalid values in the environment).
    #[error("Configuration error: {0}")]
    Config(String),

    /// A ratio, preset, rectangle or size string could not be parsed.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Image decoding, cropping or encoding failed.
    #[error("Image processing failed: {0}")]
    ImageProcessing(String),

    /// The crop area is empty or has zero dimensions once snapped to pixels.
    #[error("Crop area is empty or invalid")]
    EmptySelection,

    /// The output path names a format the exporter does not write.
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// UI-related errors (window creation, event loop).
    #[error("UI error: {0}")]
    Ui(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an image processing error with the given message.
    pub fn image(msg: impl Into<String>) -> Self {
        Self::ImageProcessing(msg.into())
    }

    /// Creates a UI error with the given message.
    pub fn ui(msg: impl Into<String>) -> Self {
        Self::Ui(msg.into())
    }
}

/// Failure to parse one of the textual inputs the host hands to the engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Expected `W:H` with two positive numbers.
    #[error("invalid aspect ratio '{0}', expected W:H")]
    Ratio(String),

    /// Expected `WxH` with two positive integers.
    #[error("invalid size '{0}', expected WxH")]
    Size(String),

    /// Expected four comma-separated numbers.
    #[error("invalid rectangle '{0}', expected x1,y1,x2,y2")]
    Rect(String),
}

/// A convenient alias for Result with [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;
