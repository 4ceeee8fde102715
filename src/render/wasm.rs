use anyhow::{anyhow, Result};
use glam::{Mat4, Vec2, Vec3};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::transform::{UNIT_BOX_CORNERS, UNIT_BOX_EDGES};

use super::common::{project_to_screen, SceneView};

/// Wireframe renderer backed by a 2D canvas for WebAssembly builds.
pub struct Renderer {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    size: (u32, u32),
}

impl Renderer {
    /// Creates a renderer that draws into the provided HTML canvas element.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let context = canvas
            .get_context("2d")
            .map_err(|err| anyhow!("failed to query canvas context: {err:?}"))?
            .ok_or_else(|| anyhow!("canvas does not support 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| anyhow!("failed to cast canvas context"))?;

        let size = (canvas.width().max(1), canvas.height().max(1));
        Ok(Self {
            canvas,
            context,
            size,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Updates the canvas dimensions to match the browser layout.
    pub fn resize(&mut self, new_size: (u32, u32)) {
        if new_size.0 == 0 || new_size.1 == 0 || new_size == self.size {
            return;
        }
        self.size = new_size;
        self.canvas.set_width(new_size.0);
        self.canvas.set_height(new_size.1);
    }

    /// Strokes the twelve edges of the cube and of the target.
    pub fn render(&mut self, scene: &SceneView) {
        self.clear_background();
        self.context.set_line_width(2.0);
        self.stroke_box(scene.camera.view_proj, scene.cube_model, scene.cube_color);
        self.context.set_line_width(1.0);
        self.stroke_box(
            scene.camera.view_proj,
            scene.target_model,
            scene.target_color,
        );
    }

    fn stroke_box(&self, view_proj: Mat4, model: Mat4, color: Vec3) {
        let corners: Vec<Option<Vec2>> = UNIT_BOX_CORNERS
            .iter()
            .map(|&corner| {
                project_to_screen(view_proj, model.transform_point3(corner), self.size)
            })
            .collect();

        self.context.set_stroke_style(&css_color(color).into());
        self.context.begin_path();
        for &(a, b) in UNIT_BOX_EDGES.iter() {
            if let (Some(from), Some(to)) = (corners[a], corners[b]) {
                self.context.move_to(from.x as f64, from.y as f64);
                self.context.line_to(to.x as f64, to.y as f64);
            }
        }
        self.context.stroke();
    }

    fn clear_background(&self) {
        self.context.set_fill_style(&"#06060a".into());
        self.context
            .fill_rect(0.0, 0.0, self.size.0 as f64, self.size.1 as f64);
    }
}

fn css_color(color: Vec3) -> String {
    let channel = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "rgb({}, {}, {})",
        channel(color.x),
        channel(color.y),
        channel(color.z)
    )
}
