use serde::Serialize;

use crate::error::ZoneError;
use crate::extraction::BBox;

/// A point on a page, in whichever space the caller is working in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Zoom factor between document space and display space.
///
/// Always finite and strictly positive, so both directions of the
/// coordinate transform are defined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale(f64);

const ZOOM_IN_STEP: f64 = 1.1;
const ZOOM_OUT_STEP: f64 = 0.9;
/// Zoom steps stop at these factors; `Scale::new` may still go beyond them.
pub const MIN_ZOOM: f64 = 0.05;
pub const MAX_ZOOM: f64 = 20.0;

impl Scale {
    pub fn new(factor: f64) -> Result<Self, ZoneError> {
        if factor.is_finite() && factor > 0.0 {
            Ok(Scale(factor))
        } else {
            Err(ZoneError::InvalidScale(factor))
        }
    }

    pub fn factor(self) -> f64 {
        self.0
    }

    /// One step larger, or unchanged once the step would pass [`MAX_ZOOM`].
    pub fn zoomed_in(self) -> Self {
        let next = self.0 * ZOOM_IN_STEP;
        if next <= MAX_ZOOM {
            Scale(next)
        } else {
            self
        }
    }

    /// One step smaller, or unchanged once the step would pass [`MIN_ZOOM`].
    pub fn zoomed_out(self) -> Self {
        let next = self.0 * ZOOM_OUT_STEP;
        if next >= MIN_ZOOM {
            Scale(next)
        } else {
            self
        }
    }
}

impl Default for Scale {
    fn default() -> Self {
        Scale(1.0)
    }
}

/// A page-relative rectangle.
///
/// Regions stored in a template are always in document space (PDF points,
/// origin at the top-left of the page). Width and height are never negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Region {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Region {
    /// Build a region, flipping negative extents so the origin becomes the
    /// top-left corner.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        let (x, width) = if width < 0.0 { (x + width, -width) } else { (x, width) };
        let (y, height) = if height < 0.0 { (y + height, -height) } else { (y, height) };
        Region {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle spanned by two corners, e.g. the start and end of a drag.
    pub fn from_points(a: Point, b: Point) -> Self {
        Region {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn to_display_space(&self, scale: Scale) -> Region {
        let s = scale.factor();
        Region {
            x: self.x * s,
            y: self.y * s,
            width: self.width * s,
            height: self.height * s,
        }
    }

    pub fn to_document_space(&self, scale: Scale) -> Region {
        let s = scale.factor();
        Region {
            x: self.x / s,
            y: self.y / s,
            width: self.width / s,
            height: self.height / s,
        }
    }

    /// True when the box overlaps this region with a non-zero area.
    pub fn intersects(&self, bbox: &BBox) -> bool {
        bbox.x_min < self.right()
            && bbox.x_max > self.x
            && bbox.y_min < self.bottom()
            && bbox.y_max > self.y
    }
}
