use super::*;

const NOW: i64 = 1_700_000_000_000;

fn state() -> BedReadyState {
    let settings = PluginSettings { reference_image: "reference.jpg".to_owned(), ..PluginSettings::default() };
    BedReadyState::new(settings, "http://127.0.0.1:8080/?action=snapshot")
}

fn check(similarity: f64, bed_clear: bool) -> CheckResult {
    CheckResult {
        similarity,
        bed_clear,
        reference_image: "reference.jpg".to_owned(),
        test_image: "comparison.jpg".to_owned(),
    }
}

fn popup(effect: &Effect) -> (&Notification, PopupOp) {
    match effect {
        Effect::ShowPopup { notification, op } => (notification, *op),
        other => panic!("expected a popup, got {other:?}"),
    }
}

fn debug_image(filename: &str) -> DebugImage {
    DebugImage { filename: filename.to_owned(), timestamp: "20240101_120000".to_owned(), threshold: 0.9 }
}

// =============================================================
// Push messages
// =============================================================

#[test]
fn bed_not_clear_shows_sticky_error_popup() {
    let mut s = state();
    let effects = s.on_plugin_message(PluginMessage::Check(check(0.8123, false)), NOW);

    assert_eq!(effects.len(), 1);
    let (n, op) = popup(&effects[0]);
    assert_eq!(op, PopupOp::Create);
    assert_eq!(n.title, "Bed Not Ready");
    assert_eq!(n.kind, NoticeKind::Error);
    assert!(!n.hide);
    assert!(n.text.starts_with("<div class=\"row-fluid\">"));
    assert!(n.text.contains("81.23%"));
    assert!(n.text.contains("Print job has been paused"));
    assert!(n.text.contains("plugin/bedready/images/reference.jpg?t=1700000000000"));
    assert!(n.text.contains("plugin/bedready/images/comparison.jpg?t=1700000000000"));
}

#[test]
fn repeated_not_clear_updates_popup_in_place() {
    let mut s = state();
    s.on_plugin_message(PluginMessage::Check(check(0.5, false)), NOW);
    let effects = s.on_plugin_message(PluginMessage::Check(check(0.6, false)), NOW);
    assert_eq!(popup(&effects[0]).1, PopupOp::Update);
}

#[test]
fn not_clear_after_close_reopens_popup() {
    let mut s = state();
    s.on_plugin_message(PluginMessage::Check(check(0.5, false)), NOW);
    s.popup_closed();
    let effects = s.on_plugin_message(PluginMessage::Check(check(0.5, false)), NOW);
    assert_eq!(popup(&effects[0]).1, PopupOp::Reopen);
}

#[test]
fn not_clear_in_debug_mode_reloads_debug_images() {
    let mut s = state();
    s.settings.debug_mode = true;
    let effects = s.on_plugin_message(PluginMessage::Check(check(0.5, false)), NOW);
    assert_eq!(effects.len(), 2);
    assert_eq!(effects[1], Effect::Reload(Reload::DebugImages));
}

#[test]
fn bed_clear_removes_existing_popup() {
    let mut s = state();
    s.settings.debug_mode = true;
    s.on_plugin_message(PluginMessage::Check(check(0.5, false)), NOW);

    let effects = s.on_plugin_message(PluginMessage::BedClear, NOW);
    assert_eq!(effects, vec![Effect::RemovePopup, Effect::Reload(Reload::DebugImages)]);
    assert!(!s.popup.is_present());
}

#[test]
fn clear_check_removes_existing_popup() {
    let mut s = state();
    s.on_plugin_message(PluginMessage::Check(check(0.5, false)), NOW);
    let effects = s.on_plugin_message(PluginMessage::Check(check(0.99, true)), NOW);
    assert_eq!(effects, vec![Effect::RemovePopup]);
}

#[test]
fn clear_without_popup_does_nothing() {
    let mut s = state();
    s.settings.debug_mode = true;
    assert!(s.on_plugin_message(PluginMessage::BedClear, NOW).is_empty());
    assert!(s.on_plugin_message(PluginMessage::Check(check(0.99, true)), NOW).is_empty());
}

#[test]
fn backend_error_shows_sticky_error_popup() {
    let mut s = state();
    let effects = s.on_plugin_message(PluginMessage::Error("unable to download snapshot.".to_owned()), NOW);
    let (n, op) = popup(&effects[0]);
    assert_eq!(op, PopupOp::Create);
    assert_eq!(n.title, ERROR_TITLE);
    assert_eq!(n.text, "There was an error: unable to download snapshot.");
    assert!(!n.hide);
}

#[test]
fn reference_set_updates_settings_and_reloads() {
    let mut s = state();
    let effects = s.on_plugin_message(
        PluginMessage::ReferenceSet { reference_image: "reference_new.jpg".to_owned() },
        NOW,
    );
    assert_eq!(s.settings.reference_image, "reference_new.jpg");
    assert_eq!(effects, vec![Effect::SettingsChanged, Effect::Reload(Reload::Snapshots)]);
}

#[test]
fn unknown_message_does_nothing() {
    let mut s = state();
    assert!(s.on_plugin_message(PluginMessage::Unknown, NOW).is_empty());
    assert!(!s.popup.is_present());
}

// =============================================================
// Reference snapshots
// =============================================================

#[test]
fn snapshot_valid_follows_url() {
    assert!(state().snapshot_valid());
    assert!(!BedReadyState::new(PluginSettings::default(), "").snapshot_valid());
}

#[test]
fn take_snapshot_sets_flag_and_names_file() {
    let mut s = state();
    let cmd = s.begin_take_snapshot("2024-05-01T10:20:30.000Z");
    assert!(s.taking_snapshot);
    assert_eq!(cmd, ApiCommand::TakeSnapshot { name: "reference_2024-05-01T10:20:30.000Z.jpg".to_owned() });
}

#[test]
fn snapshot_taken_replaces_list() {
    let mut s = state();
    s.begin_take_snapshot("t");
    let effects = s.on_snapshot_taken(Ok(vec!["reference_t.jpg".to_owned()]));
    assert!(effects.is_empty());
    assert!(!s.taking_snapshot);
    assert_eq!(s.reference_images, ["reference_t.jpg"]);
}

#[test]
fn snapshot_failure_notifies_and_clears_flag() {
    let mut s = state();
    s.reference_images = vec!["keep.jpg".to_owned()];
    s.begin_take_snapshot("t");
    let effects = s.on_snapshot_taken(Err(ApiError::Backend("unable to download snapshot.".to_owned())));
    assert!(!s.taking_snapshot);
    assert_eq!(s.reference_images, ["keep.jpg"]);
    assert_eq!(
        effects,
        vec![Effect::Notify(Notification::transient(
            ERROR_TITLE,
            "There was an error saving the snapshot: unable to download snapshot.",
            NoticeKind::Error,
        ))]
    );
}

#[test]
fn list_failure_notifies() {
    let mut s = state();
    let effects = s.on_snapshots_listed(Err(ApiError::Status(500)));
    let [Effect::Notify(n)] = effects.as_slice() else {
        panic!("expected one notice, got {effects:?}");
    };
    assert_eq!(n.text, "Failed to load snapshots: request failed: 500");
}

#[test]
fn delete_with_remaining_list_replaces_it() {
    let mut s = state();
    s.reference_images = vec!["a.jpg".to_owned(), "b.jpg".to_owned()];
    let effects = s.on_snapshot_deleted("a.jpg", Ok(Some(vec!["b.jpg".to_owned()])));
    assert_eq!(s.reference_images, ["b.jpg"]);
    assert_eq!(
        effects,
        vec![Effect::Notify(Notification::transient("Snapshot Deleted", "a.jpg", NoticeKind::Info))]
    );
}

#[test]
fn delete_with_empty_reply_reloads() {
    let mut s = state();
    let effects = s.on_snapshot_deleted("a.jpg", Ok(None));
    assert_eq!(effects.len(), 2);
    assert_eq!(effects[1], Effect::Reload(Reload::Snapshots));
}

#[test]
fn delete_failure_keeps_list() {
    let mut s = state();
    s.reference_images = vec!["a.jpg".to_owned()];
    let effects = s.on_snapshot_deleted("a.jpg", Err(ApiError::Backend("Path is not a file".to_owned())));
    assert_eq!(s.reference_images, ["a.jpg"]);
    let [Effect::Notify(n)] = effects.as_slice() else {
        panic!("expected one notice, got {effects:?}");
    };
    assert_eq!(n.text, "There was an error deleting the snapshot: Path is not a file");
}

#[test]
fn set_default_snapshot_updates_reference() {
    let mut s = state();
    let effects = s.set_default_snapshot("reference_b.jpg");
    assert_eq!(s.settings.reference_image, "reference_b.jpg");
    assert_eq!(effects, vec![Effect::SettingsChanged]);
}

// =============================================================
// Debug images
// =============================================================

#[test]
fn debug_list_failure_is_silent() {
    let mut s = state();
    s.debug_images = vec![debug_image("d1.jpg")];
    assert!(s.on_debug_images_listed(Err(ApiError::Status(500))).is_empty());
    assert_eq!(s.debug_images.len(), 1);
}

#[test]
fn select_debug_image_by_filename() {
    let mut s = state();
    s.on_debug_images_listed(Ok(vec![debug_image("d1.jpg"), debug_image("d2.jpg")]));
    assert!(s.select_debug_image("d2.jpg"));
    assert_eq!(s.selected_debug_image.as_ref().map(|d| d.filename.as_str()), Some("d2.jpg"));
    assert!(!s.select_debug_image("missing.jpg"));
    assert!(s.selected_debug_image.is_none());
}

#[test]
fn deleting_selected_debug_image_clears_selection() {
    let mut s = state();
    s.on_debug_images_listed(Ok(vec![debug_image("d1.jpg"), debug_image("d2.jpg")]));
    s.select_debug_image("d1.jpg");

    let effects = s.on_debug_image_deleted("d1.jpg", Ok(vec![debug_image("d2.jpg")]));
    assert!(s.selected_debug_image.is_none());
    assert_eq!(s.debug_images, vec![debug_image("d2.jpg")]);
    assert_eq!(
        effects,
        vec![Effect::Notify(Notification::transient("Debug Image Deleted", "d1.jpg", NoticeKind::Success))]
    );
}

#[test]
fn deleting_other_debug_image_keeps_selection() {
    let mut s = state();
    s.on_debug_images_listed(Ok(vec![debug_image("d1.jpg"), debug_image("d2.jpg")]));
    s.select_debug_image("d2.jpg");
    s.on_debug_image_deleted("d1.jpg", Ok(vec![debug_image("d2.jpg")]));
    assert!(s.selected_debug_image.is_some());
}

#[test]
fn debug_delete_failure_notifies() {
    let mut s = state();
    let effects = s.on_debug_image_deleted("d1.jpg", Err(ApiError::Transport("offline".to_owned())));
    let [Effect::Notify(n)] = effects.as_slice() else {
        panic!("expected one notice, got {effects:?}");
    };
    assert_eq!(n.text, "There was an error deleting the debug image: offline");
}

// =============================================================
// Manual test
// =============================================================

#[test]
fn begin_test_compares_against_reference() {
    let mut s = state();
    assert_eq!(s.begin_test(), ApiCommand::CheckBed { reference: "reference.jpg".to_owned() });
    assert!(s.taking_snapshot);
}

#[test]
fn test_below_threshold_is_error_styled() {
    let mut s = state();
    s.begin_test();
    let effects = s.on_test_result(Ok(check(0.97, true)), NOW);
    assert!(!s.taking_snapshot);
    let (n, op) = popup(&effects[0]);
    assert_eq!(op, PopupOp::Create);
    assert_eq!(n.title, "Bed Ready Test");
    assert_eq!(n.kind, NoticeKind::Error);
    assert!(n.text.contains("97.00%"));
    assert!(!n.text.contains("paused"));
}

#[test]
fn test_at_threshold_is_success_styled() {
    let mut s = state();
    s.settings.match_percentage = 0.5;
    let effects = s.on_test_result(Ok(check(0.5, true)), NOW);
    assert_eq!(popup(&effects[0]).0.kind, NoticeKind::Success);
}

#[test]
fn test_failure_notifies_and_clears_flag() {
    let mut s = state();
    s.begin_test();
    let effects = s.on_test_result(Err(ApiError::Backend("unable to download snapshot.".to_owned())), NOW);
    assert!(!s.taking_snapshot);
    assert!(!s.popup.is_present());
    let [Effect::Notify(n)] = effects.as_slice() else {
        panic!("expected one notice, got {effects:?}");
    };
    assert_eq!(n.text, "There was an error testing the bed: unable to download snapshot.");
}

// =============================================================
// Host settings updates
// =============================================================

#[test]
fn updated_threshold_decides_test_popup_kind() {
    let mut s = state();
    assert_eq!(popup(&s.on_test_result(Ok(check(0.9, false)), NOW)[0]).0.kind, NoticeKind::Error);

    let lowered = PluginSettings { match_percentage: 0.5, ..s.settings.clone() };
    assert!(s.update_settings(lowered).is_empty());
    assert_eq!(popup(&s.on_test_result(Ok(check(0.9, true)), NOW)[0]).0.kind, NoticeKind::Success);
}

#[test]
fn updated_reference_is_used_for_next_test() {
    let mut s = state();
    s.update_settings(PluginSettings { reference_image: "reference_b.jpg".to_owned(), ..PluginSettings::default() });
    assert_eq!(s.begin_test(), ApiCommand::CheckBed { reference: "reference_b.jpg".to_owned() });
}

#[test]
fn enabling_debug_mode_reloads_debug_images() {
    let mut s = state();
    let on = PluginSettings { debug_mode: true, ..s.settings.clone() };
    assert_eq!(s.update_settings(on.clone()), vec![Effect::Reload(Reload::DebugImages)]);
    assert!(s.update_settings(on).is_empty());

    let effects = s.on_plugin_message(PluginMessage::Check(check(0.5, false)), NOW);
    assert_eq!(effects.last(), Some(&Effect::Reload(Reload::DebugImages)));
}

#[test]
fn disabling_debug_mode_stops_debug_reloads() {
    let mut s = state();
    s.settings.debug_mode = true;
    let off = PluginSettings { debug_mode: false, ..s.settings.clone() };
    assert!(s.update_settings(off).is_empty());

    let effects = s.on_plugin_message(PluginMessage::Check(check(0.5, false)), NOW);
    assert_eq!(effects.len(), 1);
}
