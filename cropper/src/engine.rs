use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::consts::{HANDLE_SIZE_PX, HIT_THRESHOLD_FACTOR, MAX_DISPLAY_WIDTH_PX};
use crate::geom::{ElementRect, ImageSize, Point, Viewport, client_to_canvas};
use crate::hit;
use crate::input::{Cursor, DragState};
use crate::quad::{CropField, Quad};
use crate::render::{self, DrawCommand};
use crate::store::CornerStore;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Tunables for the editor's display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorConfig {
    /// Widest the canvas may be drawn, in display pixels.
    pub max_display_width: f64,
    /// Side length of a corner handle, in display pixels.
    pub handle_size: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self { max_display_width: MAX_DISPLAY_WIDTH_PX, handle_size: HANDLE_SIZE_PX }
    }
}

impl EditorConfig {
    /// Hit radius around a handle center, in display pixels.
    #[must_use]
    pub fn hit_threshold(&self) -> f64 {
        self.handle_size * HIT_THRESHOLD_FACTOR
    }
}

/// Error returned by [`EditorCore::init`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InitError {
    /// The reported image has no area.
    #[error("image has no area: {width}x{height}")]
    EmptyImage { width: u32, height: u32 },
}

/// Actions returned from handlers for the host to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SetCursor(Cursor),
    RenderNeeded,
}

/// Result of a pointer handler.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Outcome {
    pub actions: Vec<Action>,
    /// The editor handled the event; the host should suppress the browser default.
    pub consumed: bool,
}

impl Outcome {
    fn pass_through() -> Self {
        Self::default()
    }

    fn consumed(actions: Vec<Action>) -> Self {
        Self { actions, consumed: true }
    }
}

/// Core editor state: all logic that doesn't depend on the canvas element.
///
/// Separated from `Editor` so it can be tested without WASM/browser dependencies.
/// Corner values are read from and written to the `CornerStore` passed into each call.
#[derive(Debug, Clone, Default)]
pub struct EditorCore {
    pub config: EditorConfig,
    pub viewport: Option<Viewport>,
    pub drag: DragState,
    pub cursor: Cursor,
}

impl EditorCore {
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        Self { config, ..Self::default() }
    }

    // --- Lifecycle ---

    /// Fit the editor to a freshly loaded image.
    ///
    /// Seeds the store with the full-image rectangle when every corner is still unset,
    /// and pulls stored corners that fall outside the image back onto its edges.
    ///
    /// # Errors
    ///
    /// Returns [`InitError::EmptyImage`] if either dimension is zero; the editor stays unloaded.
    pub fn init(&mut self, image: ImageSize, store: &mut dyn CornerStore) -> Result<Vec<Action>, InitError> {
        if image.is_empty() {
            return Err(InitError::EmptyImage { width: image.width, height: image.height });
        }
        let viewport = Viewport::fit(image, self.config.max_display_width);
        log::debug!(
            "crop editor: image {}x{} at scale {:.3}",
            image.width, image.height, viewport.scale
        );
        self.viewport = Some(viewport);
        self.drag = DragState::Idle;

        let stored = store.corners();
        if stored.is_unset() {
            store.set_corners(Quad::full(image));
        } else {
            let clamped = stored.clamped(image);
            if clamped != stored {
                log::debug!("crop editor: clamped stored corners into {}x{}", image.width, image.height);
                store.set_corners(clamped);
            }
        }
        Ok(vec![Action::RenderNeeded])
    }

    /// Whether an image has been loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.viewport.is_some()
    }

    // --- Queries ---

    /// Index of the handle under a display-space point, if any.
    #[must_use]
    pub fn hit_test(&self, display_pt: Point, quad: &Quad) -> Option<usize> {
        let viewport = self.viewport?;
        hit::corner_at(display_pt, quad, &viewport, self.config.hit_threshold())
    }

    /// Draw commands for the current state, or nothing before an image is loaded.
    #[must_use]
    pub fn scene(&self, quad: &Quad) -> Vec<DrawCommand> {
        match self.viewport {
            Some(viewport) => render::build_scene(&viewport, quad, &self.config),
            None => Vec::new(),
        }
    }

    // --- Pointer input ---

    /// Pointer pressed at a canvas-buffer point.
    pub fn on_pointer_down(&mut self, canvas_pt: Point, store: &dyn CornerStore) -> Outcome {
        match self.hit_test(canvas_pt, &store.corners()) {
            Some(corner) => {
                log::debug!("crop editor: captured corner {corner}");
                self.drag = DragState::Dragging { corner };
                Outcome::consumed(Vec::new())
            }
            None => Outcome::pass_through(),
        }
    }

    /// Pointer moved to a canvas-buffer point.
    pub fn on_pointer_move(&mut self, canvas_pt: Point, store: &mut dyn CornerStore) -> Outcome {
        let Some(viewport) = self.viewport else {
            return Outcome::pass_through();
        };

        let Some(corner) = self.drag.corner() else {
            let cursor = if self.hit_test(canvas_pt, &store.corners()).is_some() {
                Cursor::Move
            } else {
                Cursor::Crosshair
            };
            self.cursor = cursor;
            return Outcome { actions: vec![Action::SetCursor(cursor)], consumed: false };
        };

        let mut quad = store.corners();
        if quad.set_corner(corner, viewport.display_to_image(canvas_pt)) {
            store.set_corners(quad);
        }
        Outcome::consumed(vec![Action::RenderNeeded])
    }

    /// Pointer released.
    pub fn on_pointer_up(&mut self) -> Outcome {
        self.release()
    }

    /// Pointer left the canvas.
    pub fn on_pointer_leave(&mut self) -> Outcome {
        self.release()
    }

    fn release(&mut self) -> Outcome {
        if self.drag.is_dragging() {
            self.drag = DragState::Idle;
            Outcome::consumed(Vec::new())
        } else {
            Outcome::pass_through()
        }
    }

    // --- Direct edits ---

    /// Apply eight raw form values, in `crop_x1..crop_y4` order.
    ///
    /// Each value is read independently, falls back per [`CropField::fallback`],
    /// and is clamped into the image. Does not touch the drag state.
    pub fn apply_manual(&mut self, raw: [&str; 8], store: &mut dyn CornerStore) -> Vec<Action> {
        let Some(viewport) = self.viewport else {
            return Vec::new();
        };
        let mut fields = [0_i64; 8];
        for ((slot, field), value) in fields.iter_mut().zip(CropField::ALL).zip(raw) {
            *slot = field.resolve(value, viewport.image);
        }
        store.set_corners(Quad::from_fields(fields));
        vec![Action::RenderNeeded]
    }

    /// Restore the full-image rectangle.
    pub fn reset(&mut self, store: &mut dyn CornerStore) -> Vec<Action> {
        let Some(viewport) = self.viewport else {
            return Vec::new();
        };
        log::debug!("crop editor: reset to full image");
        store.set_corners(Quad::full(viewport.image));
        vec![Action::RenderNeeded]
    }
}

/// The full crop editor. Wraps `EditorCore` and owns the browser canvas, image, and context.
pub struct Editor {
    canvas: HtmlCanvasElement,
    image: HtmlImageElement,
    ctx: CanvasRenderingContext2d,
    pub core: EditorCore,
}

impl Editor {
    /// Bind to a canvas and its reference image.
    ///
    /// Returns `None` when the canvas has no 2D context, which happens during
    /// page transitions; the host then simply has no editor.
    #[must_use]
    pub fn attach(canvas: HtmlCanvasElement, image: HtmlImageElement, config: EditorConfig) -> Option<Self> {
        let ctx = match canvas.get_context("2d") {
            Ok(Some(obj)) => match obj.dyn_into::<CanvasRenderingContext2d>() {
                Ok(ctx) => ctx,
                Err(_) => return None,
            },
            Ok(None) => return None,
            Err(e) => {
                log::debug!("crop editor: no 2d context: {e:?}");
                return None;
            }
        };
        Some(Self { canvas, image, ctx, core: EditorCore::new(config) })
    }

    /// Map a client-space pointer position into canvas-buffer pixels.
    #[must_use]
    pub fn canvas_point(&self, client_x: f64, client_y: f64) -> Point {
        let r = self.canvas.get_bounding_client_rect();
        let rect = ElementRect { left: r.left(), top: r.top(), width: r.width(), height: r.height() };
        client_to_canvas(
            Point::new(client_x, client_y),
            rect,
            f64::from(self.canvas.width()),
            f64::from(self.canvas.height()),
        )
    }

    /// Carry out handler actions against the DOM.
    pub fn apply(&self, actions: &[Action], store: &dyn CornerStore) {
        for action in actions {
            match action {
                Action::SetCursor(cursor) => {
                    if let Err(e) = self.canvas.style().set_property("cursor", cursor.as_css()) {
                        log::debug!("crop editor: set cursor failed: {e:?}");
                    }
                }
                Action::RenderNeeded => self.render(&store.corners()),
            }
        }
    }

    /// Draw the current state to the canvas.
    pub fn render(&self, quad: &Quad) {
        let cmds = self.core.scene(quad);
        if let Err(e) = render::paint(&self.canvas, &self.ctx, &self.image, &cmds) {
            log::warn!("crop editor: paint failed: {e:?}");
        }
    }
}
