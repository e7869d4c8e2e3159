//! Viewport: pan/zoom camera over document space.
//!
//! The pan offset `(x, y)` is the document-space coordinate shown at the
//! top-left corner of the container. A document point `p` appears on screen
//! at `(p - offset) * zoom`, so the visible document rectangle is
//! `(x, y, container_width / zoom, container_height / zoom)`.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect, Size};

/// Smallest allowed zoom factor.
pub const MIN_ZOOM: f64 = 0.1;

/// Largest allowed zoom factor.
pub const MAX_ZOOM: f64 = 5.0;

/// Persisted camera state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    /// Pan offset X in document space.
    pub x: f64,
    /// Pan offset Y in document space.
    pub y: f64,
    /// Zoom factor (1.0 = 100%).
    pub zoom: f64,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

/// Camera over document space, sized to the host container.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    state: ViewportState,
    container: Size,
}

impl Viewport {
    /// Create a viewport for a container of the given pixel size.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            state: ViewportState::default(),
            container: sanitize_container(Size::new(width, height)),
        }
    }

    /// Current camera state.
    #[must_use]
    pub const fn state(&self) -> ViewportState {
        self.state
    }

    /// Pan offset X.
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.state.x
    }

    /// Pan offset Y.
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.state.y
    }

    /// Current zoom factor, always within `[MIN_ZOOM, MAX_ZOOM]`.
    #[must_use]
    pub const fn zoom(&self) -> f64 {
        self.state.zoom
    }

    /// Container size in screen pixels.
    #[must_use]
    pub const fn container(&self) -> Size {
        self.container
    }

    /// Resize the container (host window resize).
    pub fn set_container_size(&mut self, width: f64, height: f64) {
        self.container = sanitize_container(Size::new(width, height));
    }

    /// Translate the pan offset by a document-space delta. Non-finite
    /// deltas are ignored.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        if dx.is_finite() && dy.is_finite() {
            self.state.x += dx;
            self.state.y += dy;
        }
    }

    /// Set the zoom, clamped into `[MIN_ZOOM, MAX_ZOOM]`. NaN is ignored.
    ///
    /// Returns the zoom actually applied.
    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        if !zoom.is_nan() {
            self.state.zoom = clamp_zoom(zoom);
        }
        self.state.zoom
    }

    /// Multiply the zoom by `factor`, keeping the document point under
    /// `screen_point` fixed on screen.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 || !screen_point.is_finite() {
            return;
        }
        let anchor = self.screen_to_document(screen_point);
        self.set_zoom(self.state.zoom * factor);
        self.state.x = anchor.x - screen_point.x / self.state.zoom;
        self.state.y = anchor.y - screen_point.y / self.state.zoom;
    }

    /// Pan so that `point` sits at the centre of the container.
    pub fn center_on(&mut self, point: Point) {
        if !point.is_finite() {
            return;
        }
        let visible = self.visible_size();
        self.state.x = point.x - visible.width / 2.0;
        self.state.y = point.y - visible.height / 2.0;
    }

    /// Zoom and pan so that `bounds` plus a `margin` (screen pixels) on every
    /// side fits the container.
    ///
    /// Never zooms in past 100%. Extents of zero do not constrain the zoom.
    pub fn fit_to_rect(&mut self, bounds: Rect, margin: f64) {
        let margin = if margin.is_finite() { margin.max(0.0) } else { 0.0 };
        let available_w = (self.container.width - margin * 2.0).max(1.0);
        let available_h = (self.container.height - margin * 2.0).max(1.0);

        let scale_for = |available: f64, extent: f64| {
            if extent > 0.0 {
                available / extent
            } else {
                f64::INFINITY
            }
        };
        let zoom = scale_for(available_w, bounds.width)
            .min(scale_for(available_h, bounds.height))
            .min(1.0);

        self.set_zoom(zoom);
        self.center_on(bounds.center());
    }

    /// Visible area in document space.
    #[must_use]
    pub fn visible_rect(&self) -> Rect {
        let size = self.visible_size();
        Rect::new(self.state.x, self.state.y, size.width, size.height)
    }

    /// Convert a container (screen) point to document space.
    #[must_use]
    pub fn screen_to_document(&self, point: Point) -> Point {
        Point::new(
            point.x / self.state.zoom + self.state.x,
            point.y / self.state.zoom + self.state.y,
        )
    }

    /// Convert a document point to container (screen) space.
    #[must_use]
    pub fn document_to_screen(&self, point: Point) -> Point {
        Point::new(
            (point.x - self.state.x) * self.state.zoom,
            (point.y - self.state.y) * self.state.zoom,
        )
    }

    /// Convert a document rectangle to container (screen) space.
    #[must_use]
    pub fn rect_to_screen(&self, rect: &Rect) -> Rect {
        let origin = self.document_to_screen(rect.origin());
        Rect::new(
            origin.x,
            origin.y,
            rect.width * self.state.zoom,
            rect.height * self.state.zoom,
        )
    }

    /// Restore a persisted state, clamping the zoom.
    pub(crate) fn restore(&mut self, state: ViewportState) {
        self.state = ViewportState {
            x: state.x,
            y: state.y,
            zoom: clamp_zoom(state.zoom),
        };
    }

    fn visible_size(&self) -> Size {
        Size::new(
            self.container.width / self.state.zoom,
            self.container.height / self.state.zoom,
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// Clamp a zoom factor into `[MIN_ZOOM, MAX_ZOOM]`.
#[must_use]
pub fn clamp_zoom(zoom: f64) -> f64 {
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

fn sanitize_container(size: Size) -> Size {
    let fix = |v: f64| if v.is_finite() && v > 0.0 { v } else { 1.0 };
    Size::new(fix(size.width), fix(size.height))
}
