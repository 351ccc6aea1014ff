use super::*;
use serde_json::json;

// =============================================================
// ApiCommand
// =============================================================

#[test]
fn commands_serialize_with_command_tag() {
    assert_eq!(serde_json::to_value(ApiCommand::ListSnapshots).unwrap(), json!({"command": "list_snapshots"}));
    assert_eq!(
        serde_json::to_value(ApiCommand::TakeSnapshot { name: "reference_x.jpg".to_owned() }).unwrap(),
        json!({"command": "take_snapshot", "name": "reference_x.jpg"})
    );
    assert_eq!(
        serde_json::to_value(ApiCommand::CheckBed { reference: "ref.jpg".to_owned() }).unwrap(),
        json!({"command": "check_bed", "reference": "ref.jpg"})
    );
    assert_eq!(
        serde_json::to_value(ApiCommand::DeleteDebugImage { filename: "d.jpg".to_owned() }).unwrap(),
        json!({"command": "delete_debug_image", "filename": "d.jpg"})
    );
}

#[test]
fn command_name_matches_serialized_tag() {
    let commands = [
        ApiCommand::TakeSnapshot { name: String::new() },
        ApiCommand::CheckBed { reference: String::new() },
        ApiCommand::ListSnapshots,
        ApiCommand::DeleteSnapshot { filename: String::new() },
        ApiCommand::GetImageDimensions { filename: String::new() },
        ApiCommand::ListDebugImages,
        ApiCommand::DeleteDebugImage { filename: String::new() },
    ];
    for cmd in commands {
        let v = serde_json::to_value(&cmd).unwrap();
        assert_eq!(v["command"], cmd.name());
    }
}

// =============================================================
// Replies
// =============================================================

#[test]
fn check_result_parses_backend_reply() {
    let r: CheckResult = serde_json::from_value(json!({
        "bed_clear": false,
        "test_image": "comparison.jpg",
        "reference_image": "reference.jpg",
        "similarity": 0.9731
    }))
    .unwrap();
    assert!(!r.bed_clear);
    assert_eq!(r.similarity_pct(), "97.31");
}

#[test]
fn similarity_pct_pads_two_decimals() {
    let r = CheckResult {
        similarity: 1.0,
        bed_clear: true,
        reference_image: String::new(),
        test_image: String::new(),
    };
    assert_eq!(r.similarity_pct(), "100.00");
}

#[test]
fn debug_image_parses_backend_reply() {
    let d: DebugImage = serde_json::from_value(json!({
        "filename": "debug_comparison_20240101_120000_0_9842.jpg",
        "timestamp": "20240101_120000",
        "threshold": 0.9842
    }))
    .unwrap();
    assert_eq!(d.timestamp, "20240101_120000");
}

#[test]
fn image_dimensions_parse() {
    let d: ImageDimensions = serde_json::from_value(json!({"width": 1280, "height": 720})).unwrap();
    assert_eq!((d.width, d.height), (1280, 720));
}
