//! Notification model for the host's popup toolkit.
//!
//! Two kinds of notice exist. Transient notices report the outcome of one
//! request and hide themselves. The single sticky popup reports bed-check
//! results and errors; it is created once, updated in place afterwards, and
//! reopened if the user closed it.

#[cfg(test)]
#[path = "notify_test.rs"]
mod notify_test;

use serde::Serialize;

/// Severity styling of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

/// Options handed to the host toolkit. `text` may contain HTML.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub title: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: NoticeKind,
    /// `false` keeps the notice on screen until dismissed.
    pub hide: bool,
}

impl Notification {
    /// A notice that hides itself.
    pub fn transient(title: impl Into<String>, text: impl Into<String>, kind: NoticeKind) -> Self {
        Self { title: title.into(), text: text.into(), kind, hide: true }
    }

    /// A notice that stays until dismissed.
    pub fn sticky(title: impl Into<String>, text: impl Into<String>, kind: NoticeKind) -> Self {
        Self { title: title.into(), text: text.into(), kind, hide: false }
    }
}

/// What the host must do to show the popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PopupOp {
    /// No popup exists yet; create one.
    Create,
    /// The popup is on screen; update its content.
    Update,
    /// The popup exists but was closed; update its content and open it again.
    Reopen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum PopupState {
    #[default]
    Absent,
    Open,
    Closed,
}

/// Tracks the lifecycle of the single sticky popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Popup {
    state: PopupState,
}

impl Popup {
    /// Whether the popup exists, open or closed.
    pub fn is_present(self) -> bool {
        self.state != PopupState::Absent
    }

    /// Record a show request and return how the host should carry it out.
    pub fn show(&mut self) -> PopupOp {
        let op = match self.state {
            PopupState::Absent => PopupOp::Create,
            PopupState::Open => PopupOp::Update,
            PopupState::Closed => PopupOp::Reopen,
        };
        self.state = PopupState::Open;
        op
    }

    /// The user dismissed the popup without removing it.
    pub fn closed(&mut self) {
        if self.state == PopupState::Open {
            self.state = PopupState::Closed;
        }
    }

    /// Drop the popup. Returns `true` if there was one to remove.
    pub fn remove(&mut self) -> bool {
        let present = self.is_present();
        self.state = PopupState::Absent;
        present
    }
}
