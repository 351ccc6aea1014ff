#[cfg(test)]
#[path = "settings_test.rs"]
mod settings_test;

use cropper::quad::{CropField, Quad, parse_leading_int};
use cropper::store::CornerStore;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Default similarity threshold below which the bed is considered not clear.
pub const DEFAULT_MATCH_PERCENTAGE: f64 = 0.98;

/// The plugin's persisted settings, as held by the host settings store.
///
/// Field names match the host's keys. Missing keys take their defaults, and
/// crop coordinates accept numbers or numeric strings because the host binds
/// them straight to text inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginSettings {
    /// Filename of the reference snapshot compared against.
    pub reference_image: String,
    /// Similarity threshold in `[0, 1]`.
    pub match_percentage: f64,
    /// Cancel rather than pause when the bed is not clear.
    pub cancel_print: bool,
    #[serde(deserialize_with = "lenient_int")]
    pub crop_x1: i64,
    #[serde(deserialize_with = "lenient_int")]
    pub crop_y1: i64,
    #[serde(deserialize_with = "lenient_int")]
    pub crop_x2: i64,
    #[serde(deserialize_with = "lenient_int")]
    pub crop_y2: i64,
    #[serde(deserialize_with = "lenient_int")]
    pub crop_x3: i64,
    #[serde(deserialize_with = "lenient_int")]
    pub crop_y3: i64,
    #[serde(deserialize_with = "lenient_int")]
    pub crop_x4: i64,
    #[serde(deserialize_with = "lenient_int")]
    pub crop_y4: i64,
    /// Keep a copy of each comparison image for inspection.
    pub debug_mode: bool,
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            reference_image: String::new(),
            match_percentage: DEFAULT_MATCH_PERCENTAGE,
            cancel_print: false,
            crop_x1: 0,
            crop_y1: 0,
            crop_x2: 0,
            crop_y2: 0,
            crop_x3: 0,
            crop_y3: 0,
            crop_x4: 0,
            crop_y4: 0,
            debug_mode: false,
        }
    }
}

impl PluginSettings {
    /// Parse the host's settings JSON.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the text is not a JSON object of the expected shape.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

impl CornerStore for PluginSettings {
    fn corners(&self) -> Quad {
        Quad::from_fields([
            self.crop_x1,
            self.crop_y1,
            self.crop_x2,
            self.crop_y2,
            self.crop_x3,
            self.crop_y3,
            self.crop_x4,
            self.crop_y4,
        ])
    }

    fn set_corners(&mut self, quad: Quad) {
        let [x1, y1, x2, y2, x3, y3, x4, y4] = quad.to_fields();
        self.crop_x1 = x1;
        self.crop_y1 = y1;
        self.crop_x2 = x2;
        self.crop_y2 = y2;
        self.crop_x3 = x3;
        self.crop_y3 = y3;
        self.crop_x4 = x4;
        self.crop_y4 = y4;
    }
}

/// Read the eight crop inputs from a form object keyed by setting name.
///
/// Values may be text or numbers; anything missing reads as empty, which the
/// editor then resolves to that field's fallback.
pub fn crop_inputs(form: &Value) -> [String; 8] {
    CropField::ALL.map(|field| match form.get(field.key()) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

/// Whether a webcam snapshot URL can be fetched by the backend.
pub fn snapshot_valid(url: &str) -> bool {
    !url.is_empty() && url.starts_with("http")
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IntOrText {
    Int(i64),
    Float(f64),
    Text(String),
}

#[allow(clippy::cast_possible_truncation)]
fn lenient_int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match IntOrText::deserialize(deserializer)? {
        IntOrText::Int(v) => v,
        IntOrText::Float(v) => v.trunc() as i64,
        IntOrText::Text(s) => parse_leading_int(&s).unwrap_or(0),
    })
}
