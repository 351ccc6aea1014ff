//! The Bed Ready view-model.
//!
//! `BedReadyState` holds everything the settings page shows: the injected
//! plugin settings, the snapshot and debug-image lists, the in-progress flag,
//! and the sticky popup. Handlers are synchronous. Requests are started by the
//! facade; their results come back through the `on_*` methods, which update
//! state and return [`Effect`]s describing what the host should do next.

#[cfg(test)]
#[path = "bedready_test.rs"]
mod bedready_test;

use crate::net::api::{ApiError, image_url, reference_snapshot_name};
use crate::net::message::PluginMessage;
use crate::net::types::{ApiCommand, CheckResult, DebugImage};
use crate::state::notify::{NoticeKind, Notification, Popup, PopupOp};
use crate::state::settings::{PluginSettings, snapshot_valid};

/// Title for every failure notice.
pub const ERROR_TITLE: &str = "Bed Ready Error";

/// Something the host must carry out after a handler ran.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Show a self-hiding notice.
    Notify(Notification),
    /// Create, update, or reopen the sticky popup.
    ShowPopup { notification: Notification, op: PopupOp },
    /// Remove the sticky popup.
    RemovePopup,
    /// Settings changed; push them back to the host store.
    SettingsChanged,
    /// Fetch a list again.
    Reload(Reload),
}

/// Lists that can be refetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reload {
    Snapshots,
    DebugImages,
}

/// Everything the settings page shows.
#[derive(Debug, Clone, Default)]
pub struct BedReadyState {
    pub settings: PluginSettings,
    /// The host's webcam snapshot URL.
    pub snapshot_url: String,
    pub reference_images: Vec<String>,
    pub debug_images: Vec<DebugImage>,
    pub selected_debug_image: Option<DebugImage>,
    /// A capture or test request is in flight.
    pub taking_snapshot: bool,
    pub popup: Popup,
}

impl BedReadyState {
    pub fn new(settings: PluginSettings, snapshot_url: impl Into<String>) -> Self {
        Self { settings, snapshot_url: snapshot_url.into(), ..Self::default() }
    }

    /// Replace the settings with the host's current values.
    ///
    /// The host store stays the source of truth; this is called whenever the
    /// user edits a setting outside the editor. Turning debug mode on fetches
    /// the debug image list.
    pub fn update_settings(&mut self, settings: PluginSettings) -> Vec<Effect> {
        let debug_enabled = settings.debug_mode && !self.settings.debug_mode;
        self.settings = settings;
        if debug_enabled {
            vec![Effect::Reload(Reload::DebugImages)]
        } else {
            Vec::new()
        }
    }

    /// Whether the webcam snapshot URL is usable for captures.
    pub fn snapshot_valid(&self) -> bool {
        snapshot_valid(&self.snapshot_url)
    }

    // --- Push messages ---

    /// React to a pushed plugin message.
    pub fn on_plugin_message(&mut self, msg: PluginMessage, now_ms: i64) -> Vec<Effect> {
        match msg {
            PluginMessage::Check(result) if !result.bed_clear => {
                let text = format!(
                    "{}<p>Print job has been paused, check the bed and then resume.</p>{}",
                    match_line(&result),
                    image_pair(&result, now_ms),
                );
                let mut effects = vec![self.show_popup(Notification::sticky(
                    "Bed Not Ready",
                    wrap_row(&text),
                    NoticeKind::Error,
                ))];
                effects.extend(self.debug_reload());
                effects
            }
            PluginMessage::Check(_) | PluginMessage::BedClear => {
                if !self.popup.remove() {
                    return Vec::new();
                }
                let mut effects = vec![Effect::RemovePopup];
                effects.extend(self.debug_reload());
                effects
            }
            PluginMessage::Error(message) => vec![self.show_popup(Notification::sticky(
                ERROR_TITLE,
                format!("There was an error: {message}"),
                NoticeKind::Error,
            ))],
            PluginMessage::ReferenceSet { reference_image } => {
                log::info!("bedready: reference image set to {reference_image}");
                self.settings.reference_image = reference_image;
                vec![Effect::SettingsChanged, Effect::Reload(Reload::Snapshots)]
            }
            PluginMessage::Unknown => Vec::new(),
        }
    }

    /// The user dismissed the sticky popup.
    pub fn popup_closed(&mut self) {
        self.popup.closed();
    }

    // --- Reference snapshots ---

    /// Start capturing a new reference snapshot.
    pub fn begin_take_snapshot(&mut self, iso_now: &str) -> ApiCommand {
        self.taking_snapshot = true;
        ApiCommand::TakeSnapshot { name: reference_snapshot_name(iso_now) }
    }

    pub fn on_snapshot_taken(&mut self, result: Result<Vec<String>, ApiError>) -> Vec<Effect> {
        self.taking_snapshot = false;
        match result {
            Ok(list) => {
                self.reference_images = list;
                Vec::new()
            }
            Err(e) => vec![failure(format!("There was an error saving the snapshot: {e}"))],
        }
    }

    pub fn on_snapshots_listed(&mut self, result: Result<Vec<String>, ApiError>) -> Vec<Effect> {
        match result {
            Ok(list) => {
                self.reference_images = list;
                Vec::new()
            }
            Err(e) => vec![failure(format!("Failed to load snapshots: {e}"))],
        }
    }

    /// A delete may answer with the remaining list or nothing; nothing triggers a reload.
    pub fn on_snapshot_deleted(
        &mut self,
        filename: &str,
        result: Result<Option<Vec<String>>, ApiError>,
    ) -> Vec<Effect> {
        match result {
            Ok(remaining) => {
                let mut effects = vec![Effect::Notify(Notification::transient(
                    "Snapshot Deleted",
                    filename,
                    NoticeKind::Info,
                ))];
                match remaining {
                    Some(list) => self.reference_images = list,
                    None => effects.push(Effect::Reload(Reload::Snapshots)),
                }
                effects
            }
            Err(e) => vec![failure(format!("There was an error deleting the snapshot: {e}"))],
        }
    }

    /// Make `filename` the reference image.
    pub fn set_default_snapshot(&mut self, filename: &str) -> Vec<Effect> {
        self.settings.reference_image = filename.to_owned();
        vec![Effect::SettingsChanged]
    }

    // --- Debug images ---

    /// List failures are logged only; the list is a debugging aid.
    pub fn on_debug_images_listed(&mut self, result: Result<Vec<DebugImage>, ApiError>) -> Vec<Effect> {
        match result {
            Ok(list) => self.debug_images = list,
            Err(e) => log::error!("bedready: failed to load debug images: {e}"),
        }
        Vec::new()
    }

    /// Select a listed debug image by filename. Returns `false` if it is not listed.
    pub fn select_debug_image(&mut self, filename: &str) -> bool {
        self.selected_debug_image = self
            .debug_images
            .iter()
            .find(|d| d.filename == filename)
            .cloned();
        self.selected_debug_image.is_some()
    }

    pub fn on_debug_image_deleted(
        &mut self,
        filename: &str,
        result: Result<Vec<DebugImage>, ApiError>,
    ) -> Vec<Effect> {
        match result {
            Ok(list) => {
                self.debug_images = list;
                if self.selected_debug_image.as_ref().is_some_and(|d| d.filename == filename) {
                    self.selected_debug_image = None;
                }
                vec![Effect::Notify(Notification::transient(
                    "Debug Image Deleted",
                    filename,
                    NoticeKind::Success,
                ))]
            }
            Err(e) => vec![failure(format!("There was an error deleting the debug image: {e}"))],
        }
    }

    // --- Manual test ---

    /// Start a comparison against the current reference image.
    pub fn begin_test(&mut self) -> ApiCommand {
        self.taking_snapshot = true;
        ApiCommand::CheckBed { reference: self.settings.reference_image.clone() }
    }

    /// Show the comparison in the popup, styled against the configured threshold.
    pub fn on_test_result(&mut self, result: Result<CheckResult, ApiError>, now_ms: i64) -> Vec<Effect> {
        self.taking_snapshot = false;
        match result {
            Ok(result) => {
                let kind = if result.similarity < self.settings.match_percentage {
                    NoticeKind::Error
                } else {
                    NoticeKind::Success
                };
                let text = format!("{}{}", match_line(&result), image_pair(&result, now_ms));
                vec![self.show_popup(Notification::sticky("Bed Ready Test", wrap_row(&text), kind))]
            }
            Err(e) => vec![failure(format!("There was an error testing the bed: {e}"))],
        }
    }

    // --- Internals ---

    fn show_popup(&mut self, notification: Notification) -> Effect {
        let op = self.popup.show();
        Effect::ShowPopup { notification, op }
    }

    fn debug_reload(&self) -> Option<Effect> {
        self.settings.debug_mode.then_some(Effect::Reload(Reload::DebugImages))
    }
}

fn failure(text: String) -> Effect {
    Effect::Notify(Notification::transient(ERROR_TITLE, text, NoticeKind::Error))
}

fn match_line(result: &CheckResult) -> String {
    format!(
        "<p>Match percentage calculated as <span class=\"label label-info\">{}%</span>.</p>",
        result.similarity_pct()
    )
}

fn image_pair(result: &CheckResult, now_ms: i64) -> String {
    format!(
        "Reference:<p><img src=\"{}\"></img></p>Test:<p><img src=\"{}\"></img></p>",
        image_url(&result.reference_image, now_ms),
        image_url(&result.test_image, now_ms),
    )
}

fn wrap_row(inner: &str) -> String {
    format!("<div class=\"row-fluid\">{inner}</div>")
}
