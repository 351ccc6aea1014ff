#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::geom::{Point, Viewport};
use crate::quad::Quad;

/// Index of the first corner whose handle lies within `threshold` of `display_pt`.
///
/// Corners are checked in index order and the first match wins, even when a
/// later corner is closer. The comparison is strict: a point exactly
/// `threshold` away does not hit.
#[must_use]
pub fn corner_at(display_pt: Point, quad: &Quad, viewport: &Viewport, threshold: f64) -> Option<usize> {
    quad.corners
        .iter()
        .position(|c| viewport.image_to_display(*c).distance(display_pt) < threshold)
}
