//! Shared numeric and style constants for the cropper crate.

// ── Layout ──────────────────────────────────────────────────────

/// Widest the editor canvas may be drawn, in display pixels.
pub const MAX_DISPLAY_WIDTH_PX: f64 = 800.0;

/// Side length of a corner handle square, in display pixels.
pub const HANDLE_SIZE_PX: f64 = 12.0;

/// Hit slop multiplier applied to the handle size.
pub const HIT_THRESHOLD_FACTOR: f64 = 2.0;

/// Offset of a corner's numeric label from the corner, right and up.
pub const LABEL_OFFSET_PX: f64 = 10.0;

// ── Style ───────────────────────────────────────────────────────

/// Dimming applied outside the crop quadrilateral.
pub const OVERLAY_FILL: &str = "rgba(0, 0, 0, 0.5)";

/// Quadrilateral outline and handle color.
pub const ACCENT: &str = "#00ff00";

/// Quadrilateral outline width in display pixels.
pub const OUTLINE_WIDTH_PX: f64 = 2.0;

/// Corner label color.
pub const LABEL_FILL: &str = "#fff";

/// Corner label font.
pub const LABEL_FONT: &str = "12px Arial";
