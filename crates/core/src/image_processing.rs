//! Image loading, rotation and crop export.
//!
//! The engine works in fractional image pixels. Export snaps the final
//! rectangle to whole pixels, crops, and encodes in the format named by the
//! output file's extension.
//!
//! # Formats
//!
//! PNG, JPEG, BMP and GIF are written. A path without an extension gets
//! `.jpg` appended. JPEG has no alpha channel, so transparent pixels are
//! composited onto white before encoding.

use crate::error::{AppError, Result};
use crate::geometry::{CropRect, ImageBounds, Size};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GenericImageView, ImageFormat, RgbImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Extension appended when the output path has none.
pub const DEFAULT_EXTENSION: &str = "jpg";

/// Pixel rectangle `(x, y, width, height)` ready for cropping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Image helpers for the crop workflow.
pub struct ImageProcessor;

impl ImageProcessor {
    /// Decodes an image from disk.
    pub fn open(path: &Path) -> Result<DynamicImage> {
        image::open(path)
            .map_err(|e| AppError::image(format!("Failed to open {}: {}", path.display(), e)))
    }

    /// Dimensions of `image` as engine bounds.
    pub fn bounds(image: &DynamicImage) -> ImageBounds {
        Size::new(image.width() as f64, image.height() as f64)
    }

    /// Rotates 90° counter-clockwise.
    pub fn rotate_left(image: &DynamicImage) -> DynamicImage {
        image.rotate270()
    }

    /// Rotates 90° clockwise.
    pub fn rotate_right(image: &DynamicImage) -> DynamicImage {
        image.rotate90()
    }

    /// Snaps `rect` to whole pixels inside an image of `width × height`.
    ///
    /// Coordinates are truncated toward zero and clamped to the image.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::EmptySelection`] if nothing is left after snapping.
    pub fn pixel_box(rect: &CropRect, width: u32, height: u32) -> Result<PixelBox> {
        let n = rect.normalized();
        let snap = |v: f64, limit: u32| (v.max(0.0) as u32).min(limit);

        let x1 = snap(n.x1, width);
        let y1 = snap(n.y1, height);
        let x2 = snap(n.x2, width);
        let y2 = snap(n.y2, height);

        if x2 <= x1 || y2 <= y1 {
            return Err(AppError::EmptySelection);
        }

        Ok(PixelBox {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
        })
    }

    /// Crops `image` to `rect` (immutable operation, returns a new image).
    pub fn crop(image: &DynamicImage, rect: &CropRect) -> Result<DynamicImage> {
        let b = Self::pixel_box(rect, image.width(), image.height())?;
        Ok(image.crop_imm(b.x, b.y, b.width, b.height))
    }

    /// Picks the output format from the extension, appending
    /// [`DEFAULT_EXTENSION`] when there is none.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::UnsupportedFormat`] for any other extension.
    pub fn resolve_output(path: &Path) -> Result<(PathBuf, ImageFormat)> {
        let path = if path.extension().is_none() {
            path.with_extension(DEFAULT_EXTENSION)
        } else {
            path.to_path_buf()
        };

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let format = match ext.as_str() {
            "png" => ImageFormat::Png,
            "jpg" | "jpeg" => ImageFormat::Jpeg,
            "bmp" => ImageFormat::Bmp,
            "gif" => ImageFormat::Gif,
            _ => return Err(AppError::UnsupportedFormat(ext)),
        };
        Ok((path, format))
    }

    /// Writes `image` to `path`, returning the path that was actually written.
    pub fn save(image: &DynamicImage, path: &Path, jpeg_quality: u8) -> Result<PathBuf> {
        let (path, format) = Self::resolve_output(path)?;
        let encode_err = |e: image::ImageError| {
            AppError::image(format!("Failed to write {}: {}", path.display(), e))
        };

        match format {
            ImageFormat::Jpeg => {
                let rgb = Self::flatten_onto_white(image);
                let mut writer = BufWriter::new(File::create(&path)?);
                JpegEncoder::new_with_quality(&mut writer, jpeg_quality)
                    .encode_image(&rgb)
                    .map_err(encode_err)?;
            }
            ImageFormat::Png => image.save_with_format(&path, format).map_err(encode_err)?,
            _ => DynamicImage::ImageRgba8(image.to_rgba8())
                .save_with_format(&path, format)
                .map_err(encode_err)?,
        }

        log::info!(
            "exported {}x{} crop to {}",
            image.width(),
            image.height(),
            path.display()
        );
        Ok(path)
    }

    /// Crops `image` to `rect` and saves the result.
    pub fn export(image: &DynamicImage, rect: &CropRect, path: &Path, jpeg_quality: u8) -> Result<PathBuf> {
        let cropped = Self::crop(image, rect)?;
        Self::save(&cropped, path, jpeg_quality)
    }

    /// `cropped_image_<timestamp>.jpg` inside `dir`.
    pub fn default_output_path(dir: &Path) -> PathBuf {
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        dir.join(format!("cropped_image_{stamp}.{DEFAULT_EXTENSION}"))
    }

    /// Composites any alpha channel onto a white background.
    fn flatten_onto_white(image: &DynamicImage) -> RgbImage {
        if !image.color().has_alpha() {
            return image.to_rgb8();
        }

        let rgba = image.to_rgba8();
        let (w, h) = image.dimensions();
        let mut out = RgbImage::new(w, h);
        for (x, y, px) in rgba.enumerate_pixels() {
            let [r, g, b, a] = px.0;
            let a = a as u16;
            let blend = |c: u8| ((c as u16 * a + 255 * (255 - a)) / 255) as u8;
            out.put_pixel(x, y, image::Rgb([blend(r), blend(g), blend(b)]));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn checker(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(w, h, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 0])
            }
        }))
    }

    #[test]
    fn pixel_box_truncates_and_clamps() {
        let b = ImageProcessor::pixel_box(&CropRect::new(10.7, -3.0, 120.2, 50.9), 100, 100).unwrap();
        assert_eq!(
            b,
            PixelBox {
                x: 10,
                y: 0,
                width: 90,
                height: 50
            }
        );
    }

    #[test]
    fn empty_pixel_box_is_an_error() {
        let err = ImageProcessor::pixel_box(&CropRect::new(10.2, 10.0, 10.8, 40.0), 100, 100).unwrap_err();
        assert!(matches!(err, AppError::EmptySelection));
    }

    #[test]
    fn output_format_follows_extension() {
        let (p, f) = ImageProcessor::resolve_output(Path::new("out.PNG")).unwrap();
        assert_eq!((p, f), (PathBuf::from("out.PNG"), ImageFormat::Png));

        let (p, f) = ImageProcessor::resolve_output(Path::new("out")).unwrap();
        assert_eq!((p, f), (PathBuf::from("out.jpg"), ImageFormat::Jpeg));

        let err = ImageProcessor::resolve_output(Path::new("out.tiff")).unwrap_err();
        assert!(matches!(err, AppError::UnsupportedFormat(ext) if ext == "tiff"));
    }

    #[test]
    fn transparent_pixels_become_white_for_jpeg() {
        let rgb = ImageProcessor::flatten_onto_white(&checker(2, 1));
        assert_eq!(rgb.get_pixel(0, 0).0, [255, 0, 0]);
        assert_eq!(rgb.get_pixel(1, 0).0, [255, 255, 255]);
    }

    #[test]
    fn rotation_swaps_dimensions() {
        let img = checker(30, 20);
        assert_eq!(ImageProcessor::rotate_left(&img).dimensions(), (20, 30));
        assert_eq!(ImageProcessor::rotate_right(&img).dimensions(), (20, 30));
    }

    #[test]
    fn export_writes_cropped_png() {
        let dir = tempfile::tempdir().unwrap();
        let img = checker(64, 48);
        let path = ImageProcessor::export(
            &img,
            &CropRect::new(4.0, 8.0, 36.0, 28.0),
            &dir.path().join("crop.png"),
            90,
        )
        .unwrap();

        let written = image::open(&path).unwrap();
        assert_eq!(written.dimensions(), (32, 20));
    }

    #[test]
    fn export_without_extension_writes_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let path = ImageProcessor::export(
            &checker(40, 40),
            &CropRect::new(0.0, 0.0, 20.0, 20.0),
            &dir.path().join("crop"),
            80,
        )
        .unwrap();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("jpg"));
        assert_eq!(image::open(&path).unwrap().dimensions(), (20, 20));
    }

    #[test]
    fn default_name_has_prefix_and_extension() {
        let p = ImageProcessor::default_output_path(Path::new("/tmp"));
        let name = p.file_name().and_then(|n| n.to_str()).unwrap();
        assert!(name.starts_with("cropped_image_"));
        assert!(name.ends_with(".jpg"));
    }
}
