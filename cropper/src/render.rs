//! Rendering: turns an editor snapshot into draw commands, then paints them.
//!
//! [`build_scene`] is pure. It reads the viewport, the corners, and the editor
//! config and returns the ordered [`DrawCommand`]s for one frame, so the whole
//! picture can be asserted in tests without a browser.
//!
//! [`paint`] is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It replays commands onto a real context and propagates `Canvas2D` failures
//! via `Result<(), JsValue>`. The caller ([`crate::engine::Editor::render`])
//! handles the result.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, CanvasWindingRule, HtmlCanvasElement, HtmlImageElement};

use crate::consts::{ACCENT, LABEL_FILL, LABEL_FONT, LABEL_OFFSET_PX, OUTLINE_WIDTH_PX, OVERLAY_FILL};
use crate::engine::EditorConfig;
use crate::geom::{Point, Viewport};
use crate::quad::{CORNER_COUNT, Quad};

/// A single drawing step.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Resize the canvas backing buffer. Also resets the context state.
    ResizeCanvas { width: u32, height: u32 },
    /// Draw the reference image stretched into the given rect.
    DrawImage { x: f64, y: f64, width: f64, height: f64 },
    /// Fill the canvas rect and the quadrilateral as one even-odd path,
    /// covering everything outside the quadrilateral.
    DimOutside { width: f64, height: f64, quad: [Point; CORNER_COUNT], fill: &'static str },
    /// Stroke the closed quadrilateral outline.
    StrokeQuad { quad: [Point; CORNER_COUNT], stroke: &'static str, line_width: f64 },
    /// Fill an axis-aligned rect.
    FillRect { x: f64, y: f64, width: f64, height: f64, fill: &'static str },
    /// Fill a text label with its baseline-left at `(x, y)`.
    FillText { text: String, x: f64, y: f64, fill: &'static str, font: &'static str },
}

/// Build the commands for one frame.
#[must_use]
pub fn build_scene(viewport: &Viewport, quad: &Quad, config: &EditorConfig) -> Vec<DrawCommand> {
    let (width, height) = viewport.canvas_size();
    let w = f64::from(width);
    let h = f64::from(height);
    let points = quad.corners.map(|c| viewport.image_to_display(c));

    let mut cmds = Vec::with_capacity(4 + 2 * CORNER_COUNT);
    cmds.push(DrawCommand::ResizeCanvas { width, height });
    cmds.push(DrawCommand::DrawImage { x: 0.0, y: 0.0, width: w, height: h });
    cmds.push(DrawCommand::DimOutside { width: w, height: h, quad: points, fill: OVERLAY_FILL });
    cmds.push(DrawCommand::StrokeQuad { quad: points, stroke: ACCENT, line_width: OUTLINE_WIDTH_PX });

    let half = config.handle_size / 2.0;
    for (idx, p) in points.iter().enumerate() {
        cmds.push(DrawCommand::FillRect {
            x: p.x - half,
            y: p.y - half,
            width: config.handle_size,
            height: config.handle_size,
            fill: ACCENT,
        });
        cmds.push(DrawCommand::FillText {
            text: (idx + 1).to_string(),
            x: p.x + LABEL_OFFSET_PX,
            y: p.y - LABEL_OFFSET_PX,
            fill: LABEL_FILL,
            font: LABEL_FONT,
        });
    }
    cmds
}

/// Replay `cmds` onto the canvas.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. the image is broken).
pub fn paint(
    canvas: &HtmlCanvasElement,
    ctx: &CanvasRenderingContext2d,
    image: &HtmlImageElement,
    cmds: &[DrawCommand],
) -> Result<(), JsValue> {
    for cmd in cmds {
        match cmd {
            DrawCommand::ResizeCanvas { width, height } => {
                canvas.set_width(*width);
                canvas.set_height(*height);
            }
            DrawCommand::DrawImage { x, y, width, height } => {
                ctx.draw_image_with_html_image_element_and_dw_and_dh(image, *x, *y, *width, *height)?;
            }
            DrawCommand::DimOutside { width, height, quad, fill } => {
                ctx.save();
                ctx.set_fill_style_str(fill);
                ctx.begin_path();
                ctx.rect(0.0, 0.0, *width, *height);
                trace_quad(ctx, quad);
                ctx.fill_with_canvas_winding_rule(CanvasWindingRule::Evenodd);
                ctx.restore();
            }
            DrawCommand::StrokeQuad { quad, stroke, line_width } => {
                ctx.set_stroke_style_str(stroke);
                ctx.set_line_width(*line_width);
                ctx.begin_path();
                trace_quad(ctx, quad);
                ctx.stroke();
            }
            DrawCommand::FillRect { x, y, width, height, fill } => {
                ctx.set_fill_style_str(fill);
                ctx.fill_rect(*x, *y, *width, *height);
            }
            DrawCommand::FillText { text, x, y, fill, font } => {
                ctx.set_fill_style_str(fill);
                ctx.set_font(font);
                ctx.fill_text(text, *x, *y)?;
            }
        }
    }
    Ok(())
}

fn trace_quad(ctx: &CanvasRenderingContext2d, quad: &[Point; CORNER_COUNT]) {
    let [first, rest @ ..] = quad;
    ctx.move_to(first.x, first.y);
    for p in rest {
        ctx.line_to(p.x, p.y);
    }
    ctx.close_path();
}
