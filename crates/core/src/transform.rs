//! Mapping between viewport (pointer) coordinates and image coordinates.
//!
//! The image is drawn centered in the viewport and scaled down to fit, but
//! never scaled up past its native size. A [`ViewTransform`] is cheap to
//! build and is recomputed from the current viewport and image sizes every
//! time it is needed, so it can never go stale after a resize.

use crate::geometry::{CropRect, ImageBounds, Point, Size};

/// Scale and centering offset between image space and view space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    image: ImageBounds,
}

impl ViewTransform {
    /// Computes the transform for an image shown in a viewport.
    ///
    /// `scale = min(vw / iw, vh / ih, 1.0)`; the scaled image is centered.
    /// An empty image or viewport falls back to the identity transform.
    pub fn new(viewport: Size, image: ImageBounds) -> Self {
        if image.is_empty() || viewport.is_empty() {
            return Self {
                scale: 1.0,
                offset_x: 0.0,
                offset_y: 0.0,
                image,
            };
        }

        let scale = (viewport.width / image.width)
            .min(viewport.height / image.height)
            .min(1.0);

        Self {
            scale,
            offset_x: (viewport.width - image.width * scale) / 2.0,
            offset_y: (viewport.height - image.height * scale) / 2.0,
            image,
        }
    }

    /// Converts a viewport-relative point to image space, without clamping.
    pub fn to_image_space(&self, p: Point) -> Point {
        Point::new(
            (p.x - self.offset_x) / self.scale,
            (p.y - self.offset_y) / self.scale,
        )
    }

    /// Converts an image-space point to viewport coordinates.
    pub fn to_view_space(&self, p: Point) -> Point {
        Point::new(
            p.x * self.scale + self.offset_x,
            p.y * self.scale + self.offset_y,
        )
    }

    /// The image-space point under `p`, if it lands on the image.
    ///
    /// Used for pointer-down classification; the accepted domain is
    /// `[0, width) × [0, height)`.
    pub fn image_point(&self, p: Point) -> Option<Point> {
        let ip = self.to_image_space(p);
        let on_image = (0.0..self.image.width).contains(&ip.x)
            && (0.0..self.image.height).contains(&ip.y);
        on_image.then_some(ip)
    }

    /// Converts `p` to image space and clamps it to `[0, width] × [0, height]`.
    pub fn to_image_space_clamped(&self, p: Point) -> Point {
        let ip = self.to_image_space(p);
        Point::new(
            ip.x.clamp(0.0, self.image.width.max(0.0)),
            ip.y.clamp(0.0, self.image.height.max(0.0)),
        )
    }

    /// Converts a distance in view pixels to image pixels.
    pub fn view_distance_to_image(&self, d: f64) -> f64 {
        d / self.scale
    }

    /// Where the whole image lands in the viewport.
    pub fn image_rect_in_view(&self) -> CropRect {
        self.rect_to_view(&CropRect::new(0.0, 0.0, self.image.width, self.image.height))
    }

    /// Maps an image-space rectangle to view space.
    pub fn rect_to_view(&self, rect: &CropRect) -> CropRect {
        let a = self.to_view_space(Point::new(rect.x1, rect.y1));
        let b = self.to_view_space(Point::new(rect.x2, rect.y2));
        CropRect::new(a.x, a.y, b.x, b.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn large_image_is_scaled_down_and_centered() {
        let t = ViewTransform::new(Size::new(800.0, 600.0), Size::new(1600.0, 800.0));
        assert_eq!(t.scale, 0.5);
        assert_eq!(t.offset_x, 0.0);
        assert_eq!(t.offset_y, 100.0);
    }

    #[test]
    fn small_image_is_never_upscaled() {
        let t = ViewTransform::new(Size::new(1000.0, 1000.0), Size::new(200.0, 100.0));
        assert_eq!(t.scale, 1.0);
        assert_eq!(t.offset_x, 400.0);
        assert_eq!(t.offset_y, 450.0);
    }

    #[test]
    fn view_and_image_space_are_inverse() {
        let t = ViewTransform::new(Size::new(640.0, 480.0), Size::new(1920.0, 1080.0));
        let p = Point::new(123.0, 456.0);
        let back = t.to_view_space(t.to_image_space(p));
        assert!((back.x - p.x).abs() < 1e-9);
        assert!((back.y - p.y).abs() < 1e-9);
    }

    #[test]
    fn image_point_rejects_letterbox_area() {
        let t = ViewTransform::new(Size::new(800.0, 600.0), Size::new(1600.0, 800.0));
        assert_eq!(t.image_point(Point::new(10.0, 50.0)), None);
        assert_eq!(t.image_point(Point::new(10.0, 150.0)), Some(Point::new(20.0, 100.0)));
        // Right/bottom edges are exclusive.
        assert_eq!(t.image_point(Point::new(800.0, 300.0)), None);
    }

    #[test]
    fn clamped_conversion_stays_on_image() {
        let t = ViewTransform::new(Size::new(800.0, 600.0), Size::new(400.0, 300.0));
        assert_eq!(t.to_image_space_clamped(Point::new(0.0, 0.0)), Point::new(0.0, 0.0));
        assert_eq!(
            t.to_image_space_clamped(Point::new(2000.0, 2000.0)),
            Point::new(400.0, 300.0)
        );
    }

    #[test]
    fn empty_image_uses_identity() {
        let t = ViewTransform::new(Size::new(800.0, 600.0), Size::new(0.0, 0.0));
        assert_eq!(t.scale, 1.0);
        assert_eq!(t.to_image_space(Point::new(5.0, 6.0)), Point::new(5.0, 6.0));
    }
}
