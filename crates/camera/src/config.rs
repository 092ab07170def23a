//! Orbit camera configuration.

use serde::{Deserialize, Serialize};
use skycastle_physics::LayerMask;

/// Configuration for the orbit camera.
///
/// Distances are in meters, angles in degrees, times in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitCameraConfig {
    /// Distance from the focus point (1..=20).
    pub distance: f32,

    /// Slack the focus point may lag behind the target (>= 0, 0 = locked).
    pub focus_radius: f32,

    /// Fraction of the remaining lag removed per second (0..=1).
    pub focus_centering: f32,

    /// Orbit speed for manual and automatic rotation (degrees/s, 0..=360).
    pub rotation_speed: f32,

    /// Lowest pitch (-89..=89).
    pub min_vertical_angle: f32,

    /// Highest pitch (-89..=89, never below `min_vertical_angle`).
    pub max_vertical_angle: f32,

    /// Idle time after manual input before automatic alignment resumes (>= 0).
    pub align_delay: f32,

    /// Angular window in which automatic alignment slows down (0..=90).
    pub align_smooth_range: f32,

    /// Layers that pull the camera in toward the target.
    pub obstruction_mask: LayerMask,
}

impl Default for OrbitCameraConfig {
    fn default() -> Self {
        Self {
            distance: 5.0,
            focus_radius: 1.0,
            focus_centering: 0.5,
            rotation_speed: 90.0,
            min_vertical_angle: -30.0,
            max_vertical_angle: 60.0,
            align_delay: 5.0,
            align_smooth_range: 45.0,
            obstruction_mask: LayerMask::ALL,
        }
    }
}

impl OrbitCameraConfig {
    /// Copy of this config with every tunable clamped into its valid range.
    ///
    /// An inverted pitch range is repaired by raising the maximum.
    pub fn normalized(&self) -> Self {
        let min_vertical_angle = clamp_or(self.min_vertical_angle, -89.0, 89.0);
        let max_vertical_angle =
            clamp_or(self.max_vertical_angle, -89.0, 89.0).max(min_vertical_angle);

        Self {
            distance: clamp_or(self.distance, 1.0, 20.0),
            focus_radius: clamp_or(self.focus_radius, 0.0, f32::MAX),
            focus_centering: clamp_or(self.focus_centering, 0.0, 1.0),
            rotation_speed: clamp_or(self.rotation_speed, 0.0, 360.0),
            min_vertical_angle,
            max_vertical_angle,
            align_delay: clamp_or(self.align_delay, 0.0, f32::MAX),
            align_smooth_range: clamp_or(self.align_smooth_range, 0.0, 90.0),
            obstruction_mask: self.obstruction_mask,
        }
    }
}

fn clamp_or(value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}
