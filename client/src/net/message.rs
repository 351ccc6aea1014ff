//! Parsing for spontaneous plugin messages pushed by the host.
//!
//! The host delivers every plugin's messages on one channel as
//! `(plugin, data)`. Only messages addressed to [`PLUGIN_ID`] are parsed.

#[cfg(test)]
#[path = "message_test.rs"]
mod message_test;

use serde_json::Value;

use super::api::{PLUGIN_ID, error_message};
use super::types::CheckResult;

/// A push message from the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum PluginMessage {
    /// A bed comparison finished.
    Check(CheckResult),
    /// The print resumed or was cancelled; any "not ready" popup is stale.
    BedClear,
    /// A new reference image was captured by a printer command.
    ReferenceSet { reference_image: String },
    /// The backend failed while handling a printer command.
    Error(String),
    /// A payload this client does not understand.
    Unknown,
}

/// Parse a pushed message. Returns `None` when it is addressed to another plugin.
pub fn parse_plugin_message(plugin: &str, data: &Value) -> Option<PluginMessage> {
    if plugin != PLUGIN_ID {
        return None;
    }

    if data.get("similarity").is_some() {
        return Some(match serde_json::from_value::<CheckResult>(data.clone()) {
            Ok(result) => PluginMessage::Check(result),
            Err(e) => {
                log::warn!("bedready: malformed check result: {e}");
                PluginMessage::Unknown
            }
        });
    }

    if data.get("reference_set").and_then(Value::as_bool) == Some(true) {
        let reference_image = data
            .get("reference_image")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        return Some(PluginMessage::ReferenceSet { reference_image });
    }

    if let Some(message) = error_message(data) {
        return Some(PluginMessage::Error(message));
    }

    if data.get("bed_clear").and_then(Value::as_bool) == Some(true) {
        return Some(PluginMessage::BedClear);
    }

    Some(PluginMessage::Unknown)
}
