//! Wire types for the plugin's backend command endpoint.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

pub use cropper::geom::ImageSize as ImageDimensions;

/// A named backend operation and its parameters.
///
/// Serializes to the host's simple-command shape: `{"command": "<name>", ...params}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ApiCommand {
    /// Capture a webcam frame and save it under `name`.
    TakeSnapshot { name: String },
    /// Capture a frame and compare it against `reference`.
    CheckBed { reference: String },
    /// List saved reference snapshots.
    ListSnapshots,
    /// Delete a saved reference snapshot.
    DeleteSnapshot { filename: String },
    /// Read the pixel dimensions of a saved image.
    GetImageDimensions { filename: String },
    /// List stored debug comparison images.
    ListDebugImages,
    /// Delete a stored debug comparison image.
    DeleteDebugImage { filename: String },
}

impl ApiCommand {
    /// The command name as sent on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            Self::TakeSnapshot { .. } => "take_snapshot",
            Self::CheckBed { .. } => "check_bed",
            Self::ListSnapshots => "list_snapshots",
            Self::DeleteSnapshot { .. } => "delete_snapshot",
            Self::GetImageDimensions { .. } => "get_image_dimensions",
            Self::ListDebugImages => "list_debug_images",
            Self::DeleteDebugImage { .. } => "delete_debug_image",
        }
    }
}

/// Outcome of one bed comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Match strength in `[0, 1]`.
    pub similarity: f64,
    /// Whether `similarity` cleared the threshold.
    pub bed_clear: bool,
    /// Filename of the reference image compared against.
    pub reference_image: String,
    /// Filename of the freshly captured frame.
    pub test_image: String,
}

impl CheckResult {
    /// Similarity as a percentage with two decimals, e.g. `"97.31"`.
    pub fn similarity_pct(&self) -> String {
        format!("{:.2}", self.similarity * 100.0)
    }
}

/// A stored debug comparison image, listed newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugImage {
    pub filename: String,
    /// Capture time as `YYYYMMDD_HHMMSS`.
    pub timestamp: String,
    /// Similarity measured when the image was captured.
    pub threshold: f64,
}
