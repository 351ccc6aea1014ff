//! Coordinate spaces: image pixels, display pixels, and browser client pixels.
//!
//! Corners are stored in image space. The editor draws into a canvas whose
//! backing buffer is the image scaled by [`Viewport::scale`], and the browser
//! may stretch that buffer again through CSS. Every conversion between the
//! three spaces lives here.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use serde::{Deserialize, Serialize};

use crate::quad::Corner;

/// A point in display (canvas buffer) or client space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// True pixel dimensions of the loaded reference image.
///
/// Deserializes directly from the backend's `{ "width": .., "height": .. }` reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether either dimension is zero.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// The uniform image-to-display mapping chosen for one loaded image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Image-to-display factor, never above 1.
    pub scale: f64,
    /// Image the viewport was fitted to.
    pub image: ImageSize,
}

impl Viewport {
    /// Fit `image` so the displayed width never exceeds `max_display_width`.
    #[must_use]
    pub fn fit(image: ImageSize, max_display_width: f64) -> Self {
        let scale = (max_display_width / f64::from(image.width)).min(1.0);
        Self { scale, image }
    }

    /// Displayed width in (fractional) display pixels.
    #[must_use]
    pub fn display_width(&self) -> f64 {
        f64::from(self.image.width) * self.scale
    }

    /// Displayed height in (fractional) display pixels.
    #[must_use]
    pub fn display_height(&self) -> f64 {
        f64::from(self.image.height) * self.scale
    }

    /// Canvas backing-buffer size; browsers truncate fractional sizes.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn canvas_size(&self) -> (u32, u32) {
        (self.display_width() as u32, self.display_height() as u32)
    }

    /// Map a stored corner to its display-space position.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn image_to_display(&self, corner: Corner) -> Point {
        Point::new(corner.x as f64 * self.scale, corner.y as f64 * self.scale)
    }

    /// Map a display-space point back to image pixels, rounded and clamped into bounds.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn display_to_image(&self, pt: Point) -> Corner {
        let x = (pt.x / self.scale).round() as i64;
        let y = (pt.y / self.scale).round() as i64;
        Corner::new(x, y).clamped(self.image)
    }
}

/// The on-page bounding box of the canvas element, in client pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Convert a client-space pointer position to canvas buffer pixels.
///
/// `buffer_w` / `buffer_h` are the canvas's internal pixel dimensions. When CSS
/// stretches the element, the ratio of buffer size to rendered size corrects
/// for it. A collapsed rect maps with ratio 1 on that axis.
#[must_use]
pub fn client_to_canvas(client: Point, rect: ElementRect, buffer_w: f64, buffer_h: f64) -> Point {
    let ratio_x = if rect.width > 0.0 { buffer_w / rect.width } else { 1.0 };
    let ratio_y = if rect.height > 0.0 { buffer_h / rect.height } else { 1.0 };
    Point::new((client.x - rect.left) * ratio_x, (client.y - rect.top) * ratio_y)
}
