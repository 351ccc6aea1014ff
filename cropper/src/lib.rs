//! Quadrilateral crop editor for the Bed Ready reference image.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! crop editor's lifecycle: fitting the reference image into a bounded display
//! size, translating pointer input into corner drags, accepting manual numeric
//! edits, and rendering the dimmed overlay with its four handles. Corner
//! coordinates always live in original-image pixels; everything the user sees
//! and touches lives in scaled display pixels.
//!
//! The host layer wires DOM events to the [`engine::Editor`] and owns the
//! persisted corner values through the [`store::CornerStore`] seam.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level editor and testable [`engine::EditorCore`] |
//! | [`quad`] | Corner and quadrilateral types, manual-edit field parsing |
//! | [`store`] | Injected corner storage seam and an in-memory store |
//! | [`geom`] | Image/display sizing and coordinate conversions |
//! | [`input`] | Drag state machine and cursor affordances |
//! | [`hit`] | Hit-testing against corner handles |
//! | [`render`] | Scene building into draw commands and canvas painting |
//! | [`consts`] | Shared numeric and style constants |

pub mod consts;
pub mod engine;
pub mod geom;
pub mod hit;
pub mod input;
pub mod quad;
pub mod render;
pub mod store;
