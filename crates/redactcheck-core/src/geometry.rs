//! Geometric primitives: viewport projection and device-space rectangles.
//!
//! All geometric reasoning in the audit happens in *device space*: PDF user
//! space scaled by a fixed factor and flipped to a top-left origin. The scale
//! is part of the audit contract, not a rendering preference — bounding boxes
//! in emitted audits are comparable across implementations only because every
//! implementation projects identically.

use serde::{Deserialize, Serialize};

/// Fixed projection scale from PDF user space to device space.
pub const VIEWPORT_SCALE: f64 = 1.5;

/// Device-space view of a page: user-space dimensions scaled by
/// [`VIEWPORT_SCALE`], with a top-left coordinate origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: f64,
    height: f64,
}

impl Viewport {
    /// Build a viewport from the page's user-space dimensions
    /// (MediaBox width and height).
    pub fn new(page_width: f64, page_height: f64) -> Self {
        Self {
            width: page_width * VIEWPORT_SCALE,
            height: page_height * VIEWPORT_SCALE,
        }
    }

    /// Device-space page width.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Device-space page height.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Device-space page area.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Project a user-space point (bottom-left origin) to device space
    /// (top-left origin).
    pub fn project_point(&self, x: f64, y: f64) -> (f64, f64) {
        (x * VIEWPORT_SCALE, self.height - y * VIEWPORT_SCALE)
    }

    /// Project a user-space rectangle given by min/max corners to a
    /// device-space [`DeviceRect`] with top-left origin.
    pub fn project_rect(&self, x0: f64, y0: f64, x1: f64, y1: f64) -> DeviceRect {
        let (dx0, dy0) = self.project_point(x0, y0);
        let (dx1, dy1) = self.project_point(x1, y1);
        let left = dx0.min(dx1);
        let top = dy0.min(dy1);
        DeviceRect {
            x: left,
            y: top,
            w: (dx1 - dx0).abs(),
            h: (dy1 - dy0).abs(),
        }
    }
}

/// An axis-aligned rectangle in device space, top-left origin.
///
/// Used both for reconstructed fill rectangles and for approximate text
/// bounding boxes; the latter are deliberately loose and participate only in
/// overlap testing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceRect {
    /// Left edge.
    pub x: f64,
    /// Top edge (distance from the top of the page).
    pub y: f64,
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,
}

impl DeviceRect {
    /// Create a rectangle from position and size.
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle area.
    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    /// Aspect ratio of the longer side to the shorter, or 0 for degenerate
    /// rectangles.
    pub fn elongation(&self) -> f64 {
        if self.w <= 0.0 || self.h <= 0.0 {
            return 0.0;
        }
        (self.w / self.h).max(self.h / self.w)
    }

    /// Integer-rounded `(x, y, w, h)` tuple used for deduplication.
    pub fn dedup_key(&self) -> (i64, i64, i64, i64) {
        (
            self.x.round() as i64,
            self.y.round() as i64,
            self.w.round() as i64,
            self.h.round() as i64,
        )
    }

    /// AABB intersection test requiring strictly positive overlap width and
    /// height. Rectangles that merely touch do not intersect.
    pub fn intersects(&self, other: &DeviceRect) -> bool {
        let ix = (self.x + self.w).min(other.x + other.w) - self.x.max(other.x);
        let iy = (self.y + self.h).min(other.y + other.h) - self.y.max(other.y);
        ix > 0.0 && iy > 0.0
    }
}
