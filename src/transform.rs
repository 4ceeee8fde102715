//! Box transforms: the player cube's position, rotation and scale, and the
//! axis-aligned target it has to cover.

use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Corners of the unit box centred on the origin.
///
/// Bit 0 of the index selects +x, bit 1 +y, bit 2 +z.
pub const UNIT_BOX_CORNERS: [Vec3; 8] = [
    Vec3::new(-0.5, -0.5, -0.5),
    Vec3::new(0.5, -0.5, -0.5),
    Vec3::new(-0.5, 0.5, -0.5),
    Vec3::new(0.5, 0.5, -0.5),
    Vec3::new(-0.5, -0.5, 0.5),
    Vec3::new(0.5, -0.5, 0.5),
    Vec3::new(-0.5, 0.5, 0.5),
    Vec3::new(0.5, 0.5, 0.5),
];

/// The twelve edges of the unit box as pairs of [`UNIT_BOX_CORNERS`] indices.
pub const UNIT_BOX_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (2, 3),
    (4, 5),
    (6, 7),
    (0, 2),
    (1, 3),
    (4, 6),
    (5, 7),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

/// Position, rotation and scale of a unit box in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxTransform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for BoxTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl BoxTransform {
    /// Restores origin position, zero rotation and unit scale.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// World-space corners, in [`UNIT_BOX_CORNERS`] order.
    pub fn world_corners(&self) -> [Vec3; 8] {
        let model = self.model_matrix();
        UNIT_BOX_CORNERS.map(|corner| model.transform_point3(corner))
    }

    /// Rotates about the box's own Y axis.
    pub fn rotate_local_y(&mut self, angle: f32) {
        self.rotation = (self.rotation * Quat::from_rotation_y(angle)).normalize();
    }

    /// Rotates about the box's own X axis.
    pub fn rotate_local_x(&mut self, angle: f32) {
        self.rotation = (self.rotation * Quat::from_rotation_x(angle)).normalize();
    }

    /// Rotation as XYZ Euler angles in radians.
    pub fn euler_angles(&self) -> Vec3 {
        let (x, y, z) = self.rotation.to_euler(EulerRot::XYZ);
        Vec3::new(x, y, z)
    }
}

/// Axis-aligned target box the player has to match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetBox {
    pub size: Vec3,
    pub position: Vec3,
}

impl TargetBox {
    pub fn transform(&self) -> BoxTransform {
        BoxTransform {
            position: self.position,
            rotation: Quat::IDENTITY,
            scale: self.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    fn assert_close(a: Vec3, b: Vec3) {
        assert!(a.abs_diff_eq(b, 1e-5), "{a} != {b}");
    }

    #[test]
    fn default_box_corners_are_unit_corners() {
        assert_eq!(BoxTransform::default().world_corners(), UNIT_BOX_CORNERS);
    }

    #[test]
    fn corners_follow_scale_then_translation() {
        let transform = BoxTransform {
            position: Vec3::new(1.0, 2.0, 3.0),
            scale: Vec3::new(2.0, 1.0, 4.0),
            ..BoxTransform::default()
        };
        let corners = transform.world_corners();
        assert_close(corners[0], Vec3::new(0.0, 1.5, 1.0));
        assert_close(corners[7], Vec3::new(2.0, 2.5, 5.0));
    }

    #[test]
    fn reset_is_idempotent() {
        let mut transform = BoxTransform {
            position: Vec3::splat(3.0),
            rotation: Quat::from_rotation_z(1.0),
            scale: Vec3::splat(0.2),
        };
        transform.reset();
        let once = transform;
        transform.reset();
        assert_eq!(transform, once);
        assert_eq!(once, BoxTransform::default());
    }

    #[test]
    fn local_rotations_compose_in_object_space() {
        let mut transform = BoxTransform::default();
        transform.rotate_local_y(FRAC_PI_2);
        transform.rotate_local_x(FRAC_PI_2);
        // After yawing 90 degrees, the local X axis points along world -Z.
        let expected = Quat::from_rotation_y(FRAC_PI_2) * Quat::from_rotation_x(FRAC_PI_2);
        assert!(transform.rotation.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn edges_connect_corners_differing_in_one_axis() {
        for (a, b) in UNIT_BOX_EDGES {
            assert_eq!((a ^ b).count_ones(), 1, "edge ({a}, {b})");
        }
    }

    #[test]
    fn target_transform_scales_by_size() {
        let target = TargetBox {
            size: Vec3::new(1.5, 0.5, 0.5),
            position: Vec3::new(-1.0, 0.0, 1.0),
        };
        let corners = target.transform().world_corners();
        assert_close(corners[0], Vec3::new(-1.75, -0.25, 0.75));
    }
}
