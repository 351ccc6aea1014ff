//! Crop model: corners, the four-corner quadrilateral, and manual-edit fields.
//!
//! A [`Quad`] is four [`Corner`]s in original-image pixels, ordered by
//! convention top-left, top-right, bottom-right, bottom-left. The order is not
//! enforced; a user may drag corners into a self-intersecting shape and the
//! editor keeps it as-is.
//!
//! [`CropField`] names the eight persisted settings values (`crop_x1` through
//! `crop_y4`) and carries the fallback each one takes when a manual edit
//! cannot be read as a number.

#[cfg(test)]
#[path = "quad_test.rs"]
mod quad_test;

use serde::{Deserialize, Serialize};

use crate::geom::ImageSize;

/// Number of corners in a crop quadrilateral.
pub const CORNER_COUNT: usize = 4;

/// A corner position in original-image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Corner {
    pub x: i64,
    pub y: i64,
}

impl Corner {
    #[must_use]
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Clamp into `[0, width] x [0, height]`.
    #[must_use]
    pub fn clamped(self, image: ImageSize) -> Self {
        Self {
            x: self.x.clamp(0, i64::from(image.width)),
            y: self.y.clamp(0, i64::from(image.height)),
        }
    }
}

/// The four-corner crop region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Quad {
    pub corners: [Corner; CORNER_COUNT],
}

impl Quad {
    #[must_use]
    pub fn new(corners: [Corner; CORNER_COUNT]) -> Self {
        Self { corners }
    }

    /// The full-image bounding rectangle: (0,0), (W,0), (W,H), (0,H).
    #[must_use]
    pub fn full(image: ImageSize) -> Self {
        let w = i64::from(image.width);
        let h = i64::from(image.height);
        Self::new([Corner::new(0, 0), Corner::new(w, 0), Corner::new(w, h), Corner::new(0, h)])
    }

    /// Whether every coordinate is still at its zero default.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        self.corners.iter().all(|c| c.x == 0 && c.y == 0)
    }

    /// Every corner clamped into the image bounds.
    #[must_use]
    pub fn clamped(&self, image: ImageSize) -> Self {
        Self::new(self.corners.map(|c| c.clamped(image)))
    }

    /// Overwrite the corner at `index`. Returns `false` if the index is out of range.
    pub fn set_corner(&mut self, index: usize, corner: Corner) -> bool {
        match self.corners.get_mut(index) {
            Some(slot) => {
                *slot = corner;
                true
            }
            None => false,
        }
    }

    /// Flatten into `[x1, y1, x2, y2, x3, y3, x4, y4]`.
    #[must_use]
    pub fn to_fields(&self) -> [i64; 8] {
        let [a, b, c, d] = self.corners;
        [a.x, a.y, b.x, b.y, c.x, c.y, d.x, d.y]
    }

    /// Build from `[x1, y1, x2, y2, x3, y3, x4, y4]`.
    #[must_use]
    pub fn from_fields(f: [i64; 8]) -> Self {
        Self::new([
            Corner::new(f[0], f[1]),
            Corner::new(f[2], f[3]),
            Corner::new(f[4], f[5]),
            Corner::new(f[6], f[7]),
        ])
    }
}

/// One of the eight persisted crop coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropField {
    X1,
    Y1,
    X2,
    Y2,
    X3,
    Y3,
    X4,
    Y4,
}

impl CropField {
    /// All fields in storage order.
    pub const ALL: [CropField; 8] = [
        Self::X1,
        Self::Y1,
        Self::X2,
        Self::Y2,
        Self::X3,
        Self::Y3,
        Self::X4,
        Self::Y4,
    ];

    /// Settings key for this field.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::X1 => "crop_x1",
            Self::Y1 => "crop_y1",
            Self::X2 => "crop_x2",
            Self::Y2 => "crop_y2",
            Self::X3 => "crop_x3",
            Self::Y3 => "crop_y3",
            Self::X4 => "crop_x4",
            Self::Y4 => "crop_y4",
        }
    }

    /// Value used when a manual entry is blank, non-numeric, or zero.
    ///
    /// Left/top-oriented fields fall back to 0; right/bottom-oriented fields
    /// fall back to the image's far edge.
    #[must_use]
    pub fn fallback(self, image: ImageSize) -> i64 {
        match self {
            Self::X1 | Self::Y1 | Self::Y2 | Self::X4 => 0,
            Self::X2 | Self::X3 => i64::from(image.width),
            Self::Y3 | Self::Y4 => i64::from(image.height),
        }
    }

    /// Resolve a raw manual entry into a clamped coordinate.
    #[must_use]
    pub fn resolve(self, raw: &str, image: ImageSize) -> i64 {
        let value = match parse_leading_int(raw) {
            Some(v) if v != 0 => v,
            _ => self.fallback(image),
        };
        let upper = match self {
            Self::X1 | Self::X2 | Self::X3 | Self::X4 => i64::from(image.width),
            Self::Y1 | Self::Y2 | Self::Y3 | Self::Y4 => i64::from(image.height),
        };
        value.clamp(0, upper)
    }
}

/// Read the leading integer from a form value.
///
/// Leading whitespace and a single sign are accepted; parsing stops at the
/// first non-digit, so `"12.7"` reads as 12 and `"40px"` as 40. Returns `None`
/// when no digit follows. Digits beyond the `i64` range saturate, so a huge
/// entry still clamps to the image edge.
#[must_use]
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    Some(match rest[..digits].parse::<i64>() {
        Ok(magnitude) if negative => -magnitude,
        Ok(magnitude) => magnitude,
        Err(_) if negative => i64::MIN,
        Err(_) => i64::MAX,
    })
}
