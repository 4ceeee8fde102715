use glam::{Mat4, Vec2, Vec3};

use crate::game::GameState;

/// Camera parameters consumed by the renderer's uniform buffer.
#[derive(Clone, Debug)]
pub struct CameraParams {
    pub view_proj: Mat4,
    pub position: Vec3,
}

impl CameraParams {
    pub const FOV_DEGREES: f32 = 75.0;
    pub const NEAR: f32 = 0.1;
    pub const FAR: f32 = 1000.0;

    /// Fixed camera five units in front of the origin, looking at it.
    pub fn looking_at_origin(aspect: f32) -> Self {
        let position = Vec3::new(0.0, 0.0, 5.0);
        let view = Mat4::look_at_rh(position, Vec3::ZERO, Vec3::Y);
        let projection = Mat4::perspective_rh(
            Self::FOV_DEGREES.to_radians(),
            aspect.max(0.01),
            Self::NEAR,
            Self::FAR,
        );
        Self {
            view_proj: projection * view,
            position,
        }
    }
}

/// Lighting state consumed by the renderer's uniform buffer.
#[derive(Clone, Debug)]
pub struct LightParams {
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f32,
}

impl Default for LightParams {
    fn default() -> Self {
        Self {
            position: Vec3::new(100.0, 200.0, 100.0),
            color: Vec3::ONE,
            intensity: 1.0,
        }
    }
}

/// Everything a renderer needs to draw one frame.
#[derive(Clone, Debug)]
pub struct SceneView {
    pub camera: CameraParams,
    pub light: LightParams,
    pub cube_model: Mat4,
    pub cube_color: Vec3,
    pub target_model: Mat4,
    pub target_color: Vec3,
}

impl SceneView {
    pub fn from_state(state: &GameState, aspect: f32) -> Self {
        Self {
            camera: CameraParams::looking_at_origin(aspect),
            light: LightParams::default(),
            cube_model: state.cube.model_matrix(),
            cube_color: Vec3::new(0.0, 1.0, 0.0),
            target_model: state.target.transform().model_matrix(),
            target_color: Vec3::ONE,
        }
    }
}

/// Projects a world-space point to pixel coordinates (origin top-left).
///
/// Returns `None` for points behind the camera.
pub fn project_to_screen(view_proj: Mat4, point: Vec3, viewport: (u32, u32)) -> Option<Vec2> {
    let clip = view_proj * point.extend(1.0);
    if clip.w <= f32::EPSILON {
        return None;
    }
    let ndc = clip.truncate() / clip.w;
    let (width, height) = (viewport.0 as f32, viewport.1 as f32);
    Some(Vec2::new(
        (ndc.x * 0.5 + 0.5) * width,
        (0.5 - ndc.y * 0.5) * height,
    ))
}

pub fn aspect_ratio(width: u32, height: u32) -> f32 {
    if height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_projects_to_viewport_centre() {
        let camera = CameraParams::looking_at_origin(16.0 / 9.0);
        let centre = project_to_screen(camera.view_proj, Vec3::ZERO, (1600, 900)).unwrap();
        assert!(centre.abs_diff_eq(Vec2::new(800.0, 450.0), 1e-3));
    }

    #[test]
    fn up_is_towards_the_top_of_the_screen() {
        let camera = CameraParams::looking_at_origin(1.0);
        let above = project_to_screen(camera.view_proj, Vec3::Y, (100, 100)).unwrap();
        assert!(above.y < 50.0);
    }

    #[test]
    fn points_behind_camera_are_skipped() {
        let camera = CameraParams::looking_at_origin(1.0);
        assert!(project_to_screen(camera.view_proj, Vec3::new(0.0, 0.0, 10.0), (100, 100)).is_none());
    }

    #[test]
    fn zero_height_has_unit_aspect() {
        assert_eq!(aspect_ratio(640, 0), 1.0);
        assert_eq!(aspect_ratio(640, 320), 2.0);
    }
}
