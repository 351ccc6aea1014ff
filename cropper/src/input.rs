//! Input model: the drag state machine and cursor affordances.
//!
//! `DragState` tracks which corner, if any, the pointer captured on press. It
//! lives only between a press and the matching release or leave. `Cursor` is
//! the hover affordance shown while no drag is active.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

/// The active pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    /// No corner captured; moves only update the cursor.
    #[default]
    Idle,
    /// A corner handle is captured and follows the pointer.
    Dragging {
        /// Index (0..4) of the captured corner.
        corner: usize,
    },
}

impl DragState {
    /// Whether a corner is currently captured.
    #[must_use]
    pub fn is_dragging(self) -> bool {
        matches!(self, Self::Dragging { .. })
    }

    /// Index of the captured corner, if any.
    #[must_use]
    pub fn corner(self) -> Option<usize> {
        match self {
            Self::Idle => None,
            Self::Dragging { corner } => Some(corner),
        }
    }
}

/// Cursor shown over the editor canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    /// Anywhere not over a handle.
    #[default]
    Crosshair,
    /// Hovering a handle that can be dragged.
    Move,
}

impl Cursor {
    /// CSS `cursor` property value.
    #[must_use]
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Crosshair => "crosshair",
            Self::Move => "move",
        }
    }
}
