use super::*;
use crate::net::types::{CheckResult, ImageDimensions};

// =============================================================
// decode_reply
// =============================================================

#[test]
fn decode_success_list() {
    let list: Vec<String> = decode_reply(200, r#"["a.jpg","b.jpg"]"#).unwrap();
    assert_eq!(list, ["a.jpg", "b.jpg"]);
}

#[test]
fn decode_error_payload_with_ok_status_is_backend_error() {
    let err = decode_reply::<Vec<String>>(200, r#"{"error":"unable to download snapshot."}"#).unwrap_err();
    assert_eq!(err, ApiError::Backend("unable to download snapshot.".to_owned()));
    assert_eq!(err.to_string(), "unable to download snapshot.");
}

#[test]
fn decode_error_payload_with_bad_status_keeps_message() {
    let err = decode_reply::<Vec<String>>(500, r#"{"error":"Path is not a file"}"#).unwrap_err();
    assert_eq!(err.to_string(), "Path is not a file");
}

#[test]
fn decode_bad_status_without_message() {
    let err = decode_reply::<Vec<String>>(403, "<html>Forbidden</html>").unwrap_err();
    assert_eq!(err, ApiError::Status(403));
    assert_eq!(err.to_string(), "request failed: 403");
}

#[test]
fn decode_wrong_shape_is_decode_error() {
    let err = decode_reply::<ImageDimensions>(200, r#"{"width":"wide"}"#).unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
    assert!(err.to_string().starts_with("unexpected response: "));
}

#[test]
fn decode_invalid_json_with_ok_status_is_decode_error() {
    assert!(matches!(decode_reply::<Vec<String>>(200, "not json"), Err(ApiError::Decode(_))));
}

#[test]
fn decode_empty_body_into_option() {
    let none: Option<Vec<String>> = decode_reply(204, "").unwrap();
    assert_eq!(none, None);
    let some: Option<Vec<String>> = decode_reply(200, r#"["x.jpg"]"#).unwrap();
    assert_eq!(some, Some(vec!["x.jpg".to_owned()]));
}

#[test]
fn decode_empty_body_into_list_fails() {
    assert!(matches!(decode_reply::<Vec<String>>(200, ""), Err(ApiError::Decode(_))));
}

#[test]
fn decode_check_result() {
    let r: CheckResult = decode_reply(
        200,
        r#"{"bed_clear":true,"test_image":"comparison.jpg","reference_image":"reference.jpg","similarity":0.99}"#,
    )
    .unwrap();
    assert!(r.bed_clear);
}

// =============================================================
// error_message
// =============================================================

#[test]
fn error_message_reads_string_and_nested_forms() {
    assert_eq!(error_message(&serde_json::json!({"error": "boom"})), Some("boom".to_owned()));
    assert_eq!(error_message(&serde_json::json!({"error": {"error": "deep"}})), Some("deep".to_owned()));
    assert_eq!(error_message(&serde_json::json!({"error": null})), None);
    assert_eq!(error_message(&serde_json::json!({"similarity": 1})), None);
    assert_eq!(error_message(&serde_json::json!(["error"])), None);
}

// =============================================================
// Naming helpers
// =============================================================

#[test]
fn reference_snapshot_name_embeds_timestamp() {
    assert_eq!(
        reference_snapshot_name("2024-05-01T10:20:30.000Z"),
        "reference_2024-05-01T10:20:30.000Z.jpg"
    );
}

#[test]
fn image_url_busts_cache() {
    assert_eq!(image_url("comparison.jpg", 1_700_000_000_000), "plugin/bedready/images/comparison.jpg?t=1700000000000");
}
