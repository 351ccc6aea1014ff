//! `wasm-bindgen` facade bound by the host settings page.
//!
//! The host constructs one [`BedReady`] per page with the current settings,
//! the webcam snapshot URL, and a callbacks object:
//!
//! | Callback | Arguments |
//! |----------|-----------|
//! | `notify` | notification options |
//! | `showPopup` | `"create" \| "update" \| "reopen"`, notification options |
//! | `removePopup` | none |
//! | `settingsChanged` | the full settings object |
//!
//! All state lives in one `Rc<RefCell<_>>` on the browser thread. Requests run
//! as local futures; a borrow is never held across an `await`.

use std::cell::RefCell;
use std::rc::Rc;

use cropper::engine::{Action, Editor, EditorConfig};
use cropper::geom::Point;
use cropper::store::CornerStore;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, HtmlImageElement, MouseEvent};

use crate::net::api::Api;
use crate::state::bedready::{BedReadyState, Effect, Reload};
use crate::state::notify::{NoticeKind, Notification};
use crate::state::settings::{PluginSettings, crop_inputs};

/// Install the panic hook and console logger once per page.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&JsValue::from_str(&format!("bedready: logger already set: {e}")));
    }
}

struct Host {
    notify: js_sys::Function,
    show_popup: js_sys::Function,
    remove_popup: js_sys::Function,
    settings_changed: js_sys::Function,
}

impl Host {
    fn from_object(obj: &JsValue) -> Result<Self, JsValue> {
        Ok(Self {
            notify: callback(obj, "notify")?,
            show_popup: callback(obj, "showPopup")?,
            remove_popup: callback(obj, "removePopup")?,
            settings_changed: callback(obj, "settingsChanged")?,
        })
    }
}

fn callback(obj: &JsValue, name: &str) -> Result<js_sys::Function, JsValue> {
    js_sys::Reflect::get(obj, &JsValue::from_str(name))?
        .dyn_into::<js_sys::Function>()
        .map_err(|_| JsValue::from_str(&format!("host callback `{name}` is not a function")))
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    let text = serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))?;
    js_sys::JSON::parse(&text)
}

fn from_js(value: &JsValue) -> Result<serde_json::Value, String> {
    let text = js_sys::JSON::stringify(value).map_err(|e| format!("{e:?}"))?;
    serde_json::from_str(&String::from(text)).map_err(|e| e.to_string())
}

#[allow(clippy::cast_possible_truncation)]
fn now_ms() -> i64 {
    js_sys::Date::now() as i64
}

struct Inner {
    state: BedReadyState,
    editor: Option<Editor>,
}

/// The plugin view-model exported to the host page.
#[wasm_bindgen]
pub struct BedReady {
    inner: Rc<RefCell<Inner>>,
    host: Rc<Host>,
    api: Api,
}

#[wasm_bindgen]
impl BedReady {
    /// Build the view-model and start loading the snapshot list.
    ///
    /// # Errors
    ///
    /// Fails if `settings_json` is not valid settings JSON or `host` lacks a callback.
    #[wasm_bindgen(constructor)]
    pub fn new(
        settings_json: &str,
        snapshot_url: String,
        api_key: Option<String>,
        host: JsValue,
    ) -> Result<BedReady, JsValue> {
        let settings = PluginSettings::from_json(settings_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let this = Self {
            inner: Rc::new(RefCell::new(Inner { state: BedReadyState::new(settings, snapshot_url), editor: None })),
            host: Rc::new(Host::from_object(&host)?),
            api: Api { api_key },
        };
        this.load_snapshots();
        Ok(this)
    }

    // --- Queries ---

    #[wasm_bindgen(getter)]
    pub fn snapshot_valid(&self) -> bool {
        self.inner.borrow().state.snapshot_valid()
    }

    #[wasm_bindgen(getter)]
    pub fn taking_snapshot(&self) -> bool {
        self.inner.borrow().state.taking_snapshot
    }

    /// # Errors
    ///
    /// Fails only if serialization fails.
    #[wasm_bindgen(getter)]
    pub fn reference_images(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.borrow().state.reference_images)
    }

    /// # Errors
    ///
    /// Fails only if serialization fails.
    #[wasm_bindgen(getter)]
    pub fn debug_images(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.borrow().state.debug_images)
    }

    /// # Errors
    ///
    /// Fails only if serialization fails.
    #[wasm_bindgen(getter)]
    pub fn selected_debug_image(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.borrow().state.selected_debug_image)
    }

    /// # Errors
    ///
    /// Fails only if serialization fails.
    #[wasm_bindgen(getter)]
    pub fn settings(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.borrow().state.settings)
    }

    // --- Push channel ---

    /// Host push-channel entry point.
    pub fn on_plugin_message(&self, plugin: &str, data: &JsValue) {
        let value = match from_js(data) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("bedready: unreadable plugin message: {e}");
                return;
            }
        };
        let Some(msg) = crate::net::message::parse_plugin_message(plugin, &value) else {
            return;
        };
        let effects = self.inner.borrow_mut().state.on_plugin_message(msg, now_ms());
        self.run(effects);
    }

    /// Host settings changed outside the editor; adopt them and redraw.
    ///
    /// # Errors
    ///
    /// Fails if `settings_json` is not valid settings JSON.
    pub fn update_settings(&self, settings_json: &str) -> Result<(), JsValue> {
        let settings = PluginSettings::from_json(settings_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let effects = {
            let mut guard = self.inner.borrow_mut();
            let Inner { state, editor } = &mut *guard;
            let effects = state.update_settings(settings);
            if let Some(editor) = editor.as_ref().filter(|e| e.core.is_loaded()) {
                editor.render(&state.settings.corners());
            }
            effects
        };
        self.run(effects);
        Ok(())
    }

    pub fn popup_closed(&self) {
        self.inner.borrow_mut().state.popup_closed();
    }

    pub fn on_settings_shown(&self) {
        self.load_debug_images();
    }

    // --- Snapshots ---

    pub fn load_snapshots(&self) {
        let this = self.handle();
        wasm_bindgen_futures::spawn_local(async move {
            let result = this.api.list_snapshots().await;
            let effects = this.inner.borrow_mut().state.on_snapshots_listed(result);
            this.run(effects);
        });
    }

    pub fn take_snapshot(&self) {
        let iso = String::from(js_sys::Date::new_0().to_iso_string());
        let command = self.inner.borrow_mut().state.begin_take_snapshot(&iso);
        let this = self.handle();
        wasm_bindgen_futures::spawn_local(async move {
            let result = this.api.send(&command).await;
            let effects = this.inner.borrow_mut().state.on_snapshot_taken(result);
            this.run(effects);
        });
    }

    pub fn delete_snapshot(&self, filename: String) {
        let this = self.handle();
        wasm_bindgen_futures::spawn_local(async move {
            let result = this.api.delete_snapshot(filename.clone()).await;
            let effects = this.inner.borrow_mut().state.on_snapshot_deleted(&filename, result);
            this.run(effects);
        });
    }

    pub fn set_default_snapshot(&self, filename: &str) {
        let effects = self.inner.borrow_mut().state.set_default_snapshot(filename);
        self.run(effects);
    }

    // --- Debug images ---

    pub fn load_debug_images(&self) {
        let this = self.handle();
        wasm_bindgen_futures::spawn_local(async move {
            let result = this.api.list_debug_images().await;
            let effects = this.inner.borrow_mut().state.on_debug_images_listed(result);
            this.run(effects);
        });
    }

    /// Select a debug image for the host's modal. Returns `false` if it is not listed.
    pub fn show_debug_image(&self, filename: &str) -> bool {
        self.inner.borrow_mut().state.select_debug_image(filename)
    }

    /// Delete a debug image after the user confirms.
    pub fn delete_debug_image(&self, filename: String) {
        let confirmed = web_sys::window()
            .map(|w| w.confirm_with_message("Delete this debug image?"))
            .is_some_and(|r| matches!(r, Ok(true)));
        if !confirmed {
            return;
        }
        let this = self.handle();
        wasm_bindgen_futures::spawn_local(async move {
            let result = this.api.delete_debug_image(filename.clone()).await;
            let effects = this.inner.borrow_mut().state.on_debug_image_deleted(&filename, result);
            this.run(effects);
        });
    }

    // --- Manual test ---

    pub fn test_snapshot(&self) {
        let command = self.inner.borrow_mut().state.begin_test();
        let this = self.handle();
        wasm_bindgen_futures::spawn_local(async move {
            let result = this.api.send(&command).await;
            let effects = this.inner.borrow_mut().state.on_test_result(result, now_ms());
            this.run(effects);
        });
    }

    // --- Crop editor ---

    /// Bind the editor once the reference image has loaded, then fetch its true size.
    pub fn image_loaded(&self, image: HtmlImageElement, canvas: HtmlCanvasElement) {
        let Some(editor) = Editor::attach(canvas, image, EditorConfig::default()) else {
            return;
        };
        let reference = {
            let mut inner = self.inner.borrow_mut();
            inner.editor = Some(editor);
            inner.state.settings.reference_image.clone()
        };

        let this = self.handle();
        wasm_bindgen_futures::spawn_local(async move {
            let size = match this.api.image_dimensions(reference).await {
                Ok(size) => size,
                Err(e) => {
                    this.run(vec![Effect::Notify(Notification::transient(
                        crate::state::bedready::ERROR_TITLE,
                        format!("Unable to read the reference image size: {e}"),
                        NoticeKind::Error,
                    ))]);
                    return;
                }
            };
            let changed = {
                let mut guard = this.inner.borrow_mut();
                let Inner { state, editor } = &mut *guard;
                let Some(editor) = editor.as_mut() else {
                    return;
                };
                let before = state.settings.corners();
                match editor.core.init(size, &mut state.settings) {
                    Ok(actions) => editor.apply(&actions, &state.settings),
                    Err(e) => log::warn!("bedready: {e}"),
                }
                before != state.settings.corners()
            };
            if changed {
                this.run(vec![Effect::SettingsChanged]);
            }
        });
    }

    /// Pointer pressed. Returns `true` when the browser default should proceed.
    pub fn start_crop(&self, event: &MouseEvent) -> bool {
        self.crop_event(event, |editor, pt, settings| editor.core.on_pointer_down(pt, &*settings))
    }

    pub fn move_crop(&self, event: &MouseEvent) -> bool {
        self.crop_event(event, |editor, pt, settings| editor.core.on_pointer_move(pt, settings))
    }

    pub fn end_crop(&self, event: &MouseEvent) -> bool {
        self.crop_event(event, |editor, _, _| editor.core.on_pointer_up())
    }

    pub fn cancel_crop(&self, event: &MouseEvent) -> bool {
        self.crop_event(event, |editor, _, _| editor.core.on_pointer_leave())
    }

    /// Apply the coordinate inputs, given as an object keyed `crop_x1..crop_y4`.
    pub fn update_crop_from_inputs(&self, form: &JsValue) {
        let values = match from_js(form) {
            Ok(v) => crop_inputs(&v),
            Err(e) => {
                log::warn!("bedready: unreadable crop inputs: {e}");
                return;
            }
        };
        let raw = values.each_ref().map(String::as_str);
        self.crop_edit(|editor, settings| editor.core.apply_manual(raw, settings));
    }

    pub fn reset_crop(&self) {
        self.crop_edit(|editor, settings| editor.core.reset(settings));
    }
}

impl BedReady {
    fn handle(&self) -> Self {
        Self { inner: Rc::clone(&self.inner), host: Rc::clone(&self.host), api: self.api.clone() }
    }

    fn crop_event<F>(&self, event: &MouseEvent, handler: F) -> bool
    where
        F: FnOnce(&mut Editor, Point, &mut PluginSettings) -> cropper::engine::Outcome,
    {
        let changed = {
            let mut guard = self.inner.borrow_mut();
            let Inner { state, editor } = &mut *guard;
            let Some(editor) = editor.as_mut() else {
                return true;
            };
            let pt = editor.canvas_point(f64::from(event.client_x()), f64::from(event.client_y()));
            let before = state.settings.corners();
            let outcome = handler(editor, pt, &mut state.settings);
            editor.apply(&outcome.actions, &state.settings);
            if !outcome.consumed {
                return true;
            }
            event.prevent_default();
            before != state.settings.corners()
        };
        if changed {
            self.run(vec![Effect::SettingsChanged]);
        }
        false
    }

    fn crop_edit<F>(&self, handler: F)
    where
        F: FnOnce(&mut Editor, &mut PluginSettings) -> Vec<Action>,
    {
        {
            let mut guard = self.inner.borrow_mut();
            let Inner { state, editor } = &mut *guard;
            let Some(editor) = editor.as_mut().filter(|e| e.core.is_loaded()) else {
                return;
            };
            let actions = handler(editor, &mut state.settings);
            editor.apply(&actions, &state.settings);
        }
        self.run(vec![Effect::SettingsChanged]);
    }

    fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            if let Err(e) = self.run_one(effect) {
                log::warn!("bedready: host callback failed: {e:?}");
            }
        }
    }

    fn run_one(&self, effect: Effect) -> Result<(), JsValue> {
        match effect {
            Effect::Notify(n) => {
                self.host.notify.call1(&JsValue::NULL, &to_js(&n)?)?;
            }
            Effect::ShowPopup { notification, op } => {
                self.host.show_popup.call2(&JsValue::NULL, &to_js(&op)?, &to_js(&notification)?)?;
            }
            Effect::RemovePopup => {
                self.host.remove_popup.call0(&JsValue::NULL)?;
            }
            Effect::SettingsChanged => {
                let settings = to_js(&self.inner.borrow().state.settings)?;
                self.host.settings_changed.call1(&JsValue::NULL, &settings)?;
            }
            Effect::Reload(Reload::Snapshots) => self.load_snapshots(),
            Effect::Reload(Reload::DebugImages) => self.load_debug_images(),
        }
        Ok(())
    }
}
