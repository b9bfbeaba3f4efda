//! The interactive crop session.
//!
//! A [`CropSession`] owns everything one open image needs: the image and
//! viewport sizes, the current rectangle, the drag in progress and the
//! selected ratio. The host feeds it [`SessionEvent`]s one at a time and reads
//! back a [`SessionOutput`] after each; nothing here depends on a UI toolkit.
//!
//! ```
//! use snapcrop_core::session::{CropSession, SessionEvent};
//!
//! let mut session = CropSession::default();
//! session.handle(SessionEvent::ImageChanged { width: 800.0, height: 600.0 });
//! session.handle(SessionEvent::ViewportResized { width: 800.0, height: 600.0 });
//! session.handle(SessionEvent::pointer_down(100.0, 100.0));
//! session.handle(SessionEvent::PointerMove { x: 300.0, y: 250.0 });
//! let out = session.handle(SessionEvent::pointer_up(300.0, 250.0));
//!
//! assert!(out.export_enabled);
//! assert_eq!(out.rect.unwrap().rounded_size(), (200.0, 150.0));
//! ```

use crate::config::Config;
use crate::constraint::{AspectRatio, enforce};
use crate::drag::{Anchor, DragMode, DragState, HIT_TOLERANCE, classify};
use crate::error::Result;
use crate::geometry::{CropRect, ImageBounds, Point, Size};
use crate::preset::{apply_preset, parse_preset, parse_ratio, refit_ratio};
use crate::transform::ViewTransform;
use serde::{Deserialize, Serialize};

/// Which pointer button an event refers to. Only `Primary` drives drags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
    Middle,
}

/// Input consumed by the session. Pointer coordinates are viewport-relative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    PointerDown {
        x: f64,
        y: f64,
        #[serde(default)]
        button: PointerButton,
    },
    PointerMove {
        x: f64,
        y: f64,
    },
    PointerUp {
        x: f64,
        y: f64,
        #[serde(default)]
        button: PointerButton,
    },
    /// `None` switches back to free-form.
    RatioChanged {
        ratio: Option<AspectRatio>,
    },
    /// A preset selector string such as `"1280x720"` or `"custom"`.
    PresetChanged {
        preset: String,
    },
    /// A new (or re-rotated) image replaced the previous one.
    ImageChanged {
        width: f64,
        height: f64,
    },
    ViewportResized {
        width: f64,
        height: f64,
    },
}

impl SessionEvent {
    /// Primary-button press.
    pub fn pointer_down(x: f64, y: f64) -> Self {
        Self::PointerDown {
            x,
            y,
            button: PointerButton::Primary,
        }
    }

    /// Primary-button release.
    pub fn pointer_up(x: f64, y: f64) -> Self {
        Self::PointerUp {
            x,
            y,
            button: PointerButton::Primary,
        }
    }
}

/// Parses a JSON array of events, as written by `snapcrop replay` scripts.
pub fn parse_script(json: &str) -> Result<Vec<SessionEvent>> {
    Ok(serde_json::from_str(json)?)
}

/// What the host reads back after every event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionOutput {
    /// Current rectangle in image space.
    pub rect: Option<CropRect>,
    /// True once a finished rectangle is large enough to export.
    pub export_enabled: bool,
}

/// State for one open image.
#[derive(Debug, Clone)]
pub struct CropSession {
    image: Option<ImageBounds>,
    viewport: Size,
    rect: Option<CropRect>,
    drag: DragState,
    ratio: Option<AspectRatio>,
    export_enabled: bool,
    hit_tolerance: f64,
}

impl Default for CropSession {
    fn default() -> Self {
        Self::new(HIT_TOLERANCE, None)
    }
}

impl CropSession {
    /// Creates an empty session with the given corner grab tolerance (in view
    /// pixels) and initial ratio.
    pub fn new(hit_tolerance: f64, ratio: Option<AspectRatio>) -> Self {
        Self {
            image: None,
            viewport: Size::default(),
            rect: None,
            drag: DragState::default(),
            ratio,
            export_enabled: false,
            hit_tolerance,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.hit_tolerance, config.default_ratio)
    }

    pub fn rect(&self) -> Option<CropRect> {
        self.rect
    }

    pub fn ratio(&self) -> Option<AspectRatio> {
        self.ratio
    }

    pub fn drag_mode(&self) -> DragMode {
        self.drag.mode
    }

    pub fn image_bounds(&self) -> Option<ImageBounds> {
        self.image
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn export_enabled(&self) -> bool {
        self.export_enabled
    }

    pub fn output(&self) -> SessionOutput {
        SessionOutput {
            rect: self.rect,
            export_enabled: self.export_enabled,
        }
    }

    /// The current view transform, rebuilt from the current sizes.
    pub fn transform(&self) -> Option<ViewTransform> {
        self.image.map(|image| ViewTransform::new(self.viewport, image))
    }

    /// Processes one event to completion.
    pub fn handle(&mut self, event: SessionEvent) -> SessionOutput {
        match event {
            SessionEvent::PointerDown { x, y, button } => self.pointer_down(Point::new(x, y), button),
            SessionEvent::PointerMove { x, y } => self.pointer_move(Point::new(x, y)),
            SessionEvent::PointerUp { button, .. } => self.pointer_up(button),
            SessionEvent::RatioChanged { ratio } => self.set_ratio(ratio),
            SessionEvent::PresetChanged { preset } => self.apply_preset_str(&preset),
            SessionEvent::ImageChanged { width, height } => self.load_image(Size::new(width, height)),
            SessionEvent::ViewportResized { width, height } => {
                self.viewport = Size::new(width, height);
            }
        }
        self.output()
    }

    /// Parses and selects a ratio string (`free` or `W:H`).
    ///
    /// Unlike a [`SessionEvent::RatioChanged`] built by the host, a malformed
    /// string is reported instead of ignored.
    pub fn select_ratio(&mut self, ratio: &str) -> Result<SessionOutput> {
        let ratio = parse_ratio(ratio)?;
        Ok(self.handle(SessionEvent::RatioChanged { ratio }))
    }

    /// Parses and applies a preset string (`custom` or `WxH`), reporting
    /// malformed input.
    pub fn select_preset(&mut self, preset: &str) -> Result<SessionOutput> {
        parse_preset(preset)?;
        Ok(self.handle(SessionEvent::PresetChanged {
            preset: preset.to_string(),
        }))
    }

    /// Replaces the rectangle programmatically, e.g. from a command line.
    ///
    /// The rectangle is normalized and clamped to the image. Ignored while no
    /// image is loaded or a drag is in progress.
    pub fn set_rect(&mut self, rect: CropRect) {
        let Some(bounds) = self.image else {
            log::warn!("ignoring rectangle {rect}: no image loaded");
            return;
        };
        if self.drag.is_dragging() {
            return;
        }
        self.rect = Some(rect.normalized().clamped(bounds));
        self.refresh_export();
    }

    fn load_image(&mut self, size: Size) {
        self.image = (!size.is_empty()).then_some(size);
        self.rect = None;
        self.drag.stop();
        self.export_enabled = false;
        log::debug!("image changed to {size}, crop reset");
    }

    fn pointer_down(&mut self, p: Point, button: PointerButton) {
        if button != PointerButton::Primary {
            return;
        }
        let Some(transform) = self.transform() else {
            return;
        };
        let Some(ip) = transform.image_point(p) else {
            return;
        };

        let margin = transform.view_distance_to_image(self.hit_tolerance);
        let mode = classify(ip, self.rect.as_ref(), margin);
        if mode == DragMode::Create {
            self.rect = Some(CropRect::at_point(ip));
        }
        self.drag.start(mode, ip);
        self.export_enabled = false;
        log::debug!("drag started: {mode:?} at ({:.1}, {:.1})", ip.x, ip.y);
    }

    fn pointer_move(&mut self, p: Point) {
        if !self.drag.is_dragging() {
            return;
        }
        let (Some(bounds), Some(transform), Some(rect)) = (self.image, self.transform(), self.rect)
        else {
            return;
        };
        let ip = transform.to_image_space_clamped(p);

        let updated = match self.drag.mode {
            DragMode::Create => {
                let origin = self.drag.origin;
                let raw = CropRect::new(origin.x, origin.y, ip.x, ip.y);
                self.constrain(raw.normalized(), DragMode::Create.anchor(), bounds)
            }
            DragMode::Move => {
                let (dx, dy) = self.drag.advance(ip);
                let n = rect.normalized();
                let x1 = (n.x1 + dx).clamp(0.0, (bounds.width - n.width()).max(0.0));
                let y1 = (n.y1 + dy).clamp(0.0, (bounds.height - n.height()).max(0.0));
                n.translated(x1 - n.x1, y1 - n.y1)
            }
            mode if mode.is_resize() => {
                let raw = mode.apply_corner(&rect, ip);
                self.constrain(raw, mode.anchor(), bounds)
            }
            _ => rect,
        };
        self.rect = Some(updated);
    }

    fn pointer_up(&mut self, button: PointerButton) {
        if button != PointerButton::Primary || !self.drag.is_dragging() {
            return;
        }
        log::debug!("drag finished: {:?}", self.drag.mode);
        self.drag.stop();
        self.rect = self.rect.map(|r| r.normalized());
        self.refresh_export();
    }

    fn set_ratio(&mut self, ratio: Option<AspectRatio>) {
        self.ratio = ratio;
        if let (Some(ratio), Some(rect), Some(bounds)) = (ratio, self.rect, self.image) {
            self.rect = Some(refit_ratio(&rect, ratio, bounds));
        }
        self.refresh_export();
    }

    fn apply_preset_str(&mut self, preset: &str) {
        let target = match parse_preset(preset) {
            Ok(Some(target)) => target,
            Ok(None) => return,
            Err(e) => {
                log::warn!("ignoring preset: {e}");
                return;
            }
        };
        if let (Some(rect), Some(bounds)) = (self.rect, self.image) {
            self.rect = Some(apply_preset(&rect, target, bounds));
            self.refresh_export();
        }
    }

    fn constrain(&self, raw: CropRect, anchor: Anchor, bounds: ImageBounds) -> CropRect {
        match self.ratio {
            Some(ratio) => enforce(&raw, ratio, anchor, bounds),
            None => raw,
        }
    }

    fn refresh_export(&mut self) {
        self.export_enabled =
            !self.drag.is_dragging() && self.rect.is_some_and(|r| r.is_exportable());
    }
}
