//! Camera lens parameters.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Perspective lens of the rendering camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraLens {
    /// Vertical field of view in degrees.
    pub field_of_view: f32,

    /// Aspect ratio (width / height).
    pub aspect: f32,

    /// Near clipping plane.
    pub near_clip: f32,

    /// Far clipping plane.
    pub far_clip: f32,
}

impl Default for CameraLens {
    fn default() -> Self {
        Self {
            field_of_view: 60.0,
            aspect: 16.0 / 9.0,
            near_clip: 0.3,
            far_clip: 1000.0,
        }
    }
}

impl CameraLens {
    /// Create a lens with the given field of view and aspect.
    pub fn new(field_of_view: f32, aspect: f32) -> Self {
        Self {
            field_of_view,
            aspect,
            ..Default::default()
        }
    }

    /// Half size of the near-plane rectangle, with zero depth.
    pub fn half_extents(&self) -> Vec3 {
        let half_height = self.near_clip * (0.5 * self.field_of_view.to_radians()).tan();
        Vec3::new(half_height * self.aspect, half_height, 0.0)
    }

    /// Get the projection matrix for rendering.
    ///
    /// Left-handed, looking down +Z, to match [`CameraPose::forward`].
    ///
    /// [`CameraPose::forward`]: crate::CameraPose::forward
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_lh(
            self.field_of_view.to_radians(),
            self.aspect,
            self.near_clip,
            self.far_clip,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_extents_cover_near_plane() {
        let lens = CameraLens {
            field_of_view: 90.0,
            aspect: 2.0,
            near_clip: 1.0,
            far_clip: 100.0,
        };
        let extents = lens.half_extents();

        assert!((extents.y - 1.0).abs() < 1e-5);
        assert!((extents.x - 2.0).abs() < 1e-5);
        assert_eq!(extents.z, 0.0);
    }

    #[test]
    fn test_projection_matrix() {
        let lens = CameraLens::default();
        let projection = lens.projection_matrix();

        // Projection should be invertible
        assert!(projection.determinant().abs() > 0.0001);
    }
}
