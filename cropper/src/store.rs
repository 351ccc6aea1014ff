//! The corner storage seam.
//!
//! The editor never owns the persisted crop values. The host passes a
//! [`CornerStore`] into every operation that reads or writes corners, so the
//! same engine works against the plugin's settings model in the browser and
//! against [`MemoryStore`] in tests.

use crate::quad::Quad;

/// Read/write access to the persisted crop corners.
pub trait CornerStore {
    /// Current corners, in original-image pixels.
    fn corners(&self) -> Quad;

    /// Replace all four corners.
    fn set_corners(&mut self, quad: Quad);
}

/// A plain in-memory store that counts writes.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub quad: Quad,
    pub writes: usize,
}

impl MemoryStore {
    #[must_use]
    pub fn new(quad: Quad) -> Self {
        Self { quad, writes: 0 }
    }
}

impl CornerStore for MemoryStore {
    fn corners(&self) -> Quad {
        self.quad
    }

    fn set_corners(&mut self, quad: Quad) {
        self.quad = quad;
        self.writes += 1;
    }
}
