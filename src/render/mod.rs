pub mod common;
#[cfg(not(target_arch = "wasm32"))]
pub mod native;
#[cfg(not(target_arch = "wasm32"))]
mod shared;
#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use common::{aspect_ratio, project_to_screen, CameraParams, LightParams, SceneView};
#[cfg(not(target_arch = "wasm32"))]
pub use native::Renderer;
#[cfg(target_arch = "wasm32")]
pub use wasm::Renderer;
