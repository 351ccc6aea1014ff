//! Backend command client.
//!
//! Client-side (`web`): real HTTP calls via `gloo-net`.
//! Everything else here is pure and shared with tests: command bodies,
//! reply decoding, and the filename/URL helpers.
//!
//! ERROR HANDLING
//! ==============
//! The backend reports many failures as HTTP 200 with `{"error": "..."}`.
//! [`decode_reply`] folds those, non-2xx statuses, and malformed bodies into
//! one [`ApiError`] whose display string is what the user sees. Nothing is
//! retried.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use serde::de::DeserializeOwned;
use serde_json::Value;

#[cfg(feature = "web")]
use super::types::{ApiCommand, DebugImage, ImageDimensions};

/// The plugin identifier used by the host for routing.
pub const PLUGIN_ID: &str = "bedready";

/// Simple-command endpoint for this plugin.
pub const COMMAND_ENDPOINT: &str = "/api/plugin/bedready";

/// Route serving saved images, relative to the host's base URL.
pub const IMAGE_ROUTE: &str = "plugin/bedready/images";

/// Error returned by every backend call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("{0}")]
    Transport(String),
    /// The response had a non-2xx status and no error message.
    #[error("request failed: {0}")]
    Status(u16),
    /// The backend answered with an `error` message.
    #[error("{0}")]
    Backend(String),
    /// The body did not match the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
}

/// Decode a reply body for a command.
///
/// An empty body decodes as JSON `null`, so `Option<T>` targets accept it.
///
/// # Errors
///
/// - [`ApiError::Backend`] when the body is an object carrying an `error` message (any status).
/// - [`ApiError::Status`] for other non-2xx responses.
/// - [`ApiError::Decode`] when a 2xx body does not deserialize into `T`.
pub fn decode_reply<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ApiError> {
    let value = if body.trim().is_empty() {
        Value::Null
    } else {
        match serde_json::from_str::<Value>(body) {
            Ok(v) => v,
            Err(e) if (200..300).contains(&status) => return Err(ApiError::Decode(e.to_string())),
            Err(_) => return Err(ApiError::Status(status)),
        }
    };

    if let Some(message) = error_message(&value) {
        return Err(ApiError::Backend(message));
    }
    if !(200..300).contains(&status) {
        return Err(ApiError::Status(status));
    }
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Extract an error message from `{"error": "..."}` or `{"error": {"error": "..."}}`.
pub(crate) fn error_message(value: &Value) -> Option<String> {
    let err = value.get("error")?;
    match err {
        Value::String(s) => Some(s.clone()),
        Value::Object(_) => err.get("error").and_then(Value::as_str).map(str::to_owned),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Filename for a new reference snapshot taken at `iso_timestamp`.
pub fn reference_snapshot_name(iso_timestamp: &str) -> String {
    format!("reference_{iso_timestamp}.jpg")
}

/// Cache-busting URL for a saved image.
pub fn image_url(name: &str, now_ms: i64) -> String {
    format!("{IMAGE_ROUTE}/{name}?t={now_ms}")
}

/// Post a command and decode its reply.
///
/// # Errors
///
/// See [`decode_reply`]; transport failures map to [`ApiError::Transport`].
#[cfg(feature = "web")]
pub async fn send<T: DeserializeOwned>(command: &ApiCommand, api_key: Option<&str>) -> Result<T, ApiError> {
    let mut builder = gloo_net::http::Request::post(COMMAND_ENDPOINT);
    if let Some(key) = api_key {
        builder = builder.header("X-Api-Key", key);
    }
    let resp = builder
        .json(command)
        .map_err(|e| ApiError::Transport(e.to_string()))?
        .send()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    let status = resp.status();
    let body = resp.text().await.map_err(|e| ApiError::Transport(e.to_string()))?;
    let out = decode_reply(status, &body);
    if let Err(e) = &out {
        log::warn!("bedready: {} failed: {e}", command.name());
    }
    out
}

/// Typed wrappers, one per backend operation.
#[cfg(feature = "web")]
#[derive(Debug, Clone, Default)]
pub struct Api {
    pub api_key: Option<String>,
}

#[cfg(feature = "web")]
impl Api {
    /// Send a prepared command, e.g. one built by the view-model.
    ///
    /// # Errors
    ///
    /// Returns the backend or transport failure.
    pub async fn send<T: DeserializeOwned>(&self, command: &ApiCommand) -> Result<T, ApiError> {
        send(command, self.api_key.as_deref()).await
    }

    /// # Errors
    ///
    /// Returns the backend or transport failure.
    pub async fn list_snapshots(&self) -> Result<Vec<String>, ApiError> {
        send(&ApiCommand::ListSnapshots, self.api_key.as_deref()).await
    }

    /// The backend may answer with the remaining list or with an empty body.
    ///
    /// # Errors
    ///
    /// Returns the backend or transport failure.
    pub async fn delete_snapshot(&self, filename: String) -> Result<Option<Vec<String>>, ApiError> {
        send(&ApiCommand::DeleteSnapshot { filename }, self.api_key.as_deref()).await
    }

    /// # Errors
    ///
    /// Returns the backend or transport failure.
    pub async fn image_dimensions(&self, filename: String) -> Result<ImageDimensions, ApiError> {
        send(&ApiCommand::GetImageDimensions { filename }, self.api_key.as_deref()).await
    }

    /// # Errors
    ///
    /// Returns the backend or transport failure.
    pub async fn list_debug_images(&self) -> Result<Vec<DebugImage>, ApiError> {
        send(&ApiCommand::ListDebugImages, self.api_key.as_deref()).await
    }

    /// # Errors
    ///
    /// Returns the backend or transport failure.
    pub async fn delete_debug_image(&self, filename: String) -> Result<Vec<DebugImage>, ApiError> {
        send(&ApiCommand::DeleteDebugImage { filename }, self.api_key.as_deref()).await
    }
}
