//! Locomotion configuration.
//!
//! All parameters are designer tunables. Out-of-range values are clamped by
//! [`LocomotionConfig::normalized`] rather than rejected.

use serde::{Deserialize, Serialize};

use crate::collision::{Layer, LayerMask};

/// Configuration for character locomotion.
///
/// All values use metric units (meters, seconds) and degrees unless noted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocomotionConfig {
    // ========================================================================
    // Steering
    // ========================================================================
    /// Top horizontal speed requested at full input (m/s, 0..=100).
    pub max_speed: f32,

    /// Acceleration limit while grounded (m/s², 0..=100).
    pub max_acceleration: f32,

    /// Acceleration limit while airborne (m/s², 0..=100).
    pub max_air_acceleration: f32,

    // ========================================================================
    // Jumping
    // ========================================================================
    /// Apex height of a jump from rest (meters, 0..=10).
    pub jump_height: f32,

    /// Extra jump allowance beyond the grounded jump (0..=5).
    pub extra_jumps: u32,

    // ========================================================================
    // Surfaces
    // ========================================================================
    /// Steepest slope still counted as ground (degrees, 0..=90).
    pub max_ground_angle: f32,

    /// Steepest slope counted as ground on stair layers (degrees, 0..=90).
    pub max_stairs_angle: f32,

    /// Layers whose contacts use the stairs angle.
    pub stairs_mask: LayerMask,

    // ========================================================================
    // Ground snapping
    // ========================================================================
    /// Speed above which the controller will not snap to ground (m/s, 0..=100).
    pub max_snap_speed: f32,

    /// Length of the downward ground probe (meters, >= 0).
    pub probe_distance: f32,

    /// Layers the ground probe can hit.
    pub probe_mask: LayerMask,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            // Steering
            max_speed: 10.0,
            max_acceleration: 10.0,
            max_air_acceleration: 3.0,

            // Jumping
            jump_height: 2.0,
            extra_jumps: 0,

            // Surfaces
            max_ground_angle: 25.0,
            max_stairs_angle: 50.0,
            stairs_mask: LayerMask::ALL,

            // Snapping
            max_snap_speed: 100.0,
            probe_distance: 1.0,
            probe_mask: LayerMask::ALL,
        }
    }
}

impl LocomotionConfig {
    /// Snappy platformer tuning with one bonus air jump and tagged stairs.
    pub fn platformer() -> Self {
        Self {
            max_speed: 8.0,
            max_acceleration: 40.0,
            max_air_acceleration: 12.0,
            jump_height: 2.5,
            extra_jumps: 2,
            stairs_mask: Layer::STAIRS.mask(),
            max_snap_speed: 12.0,
            probe_distance: 1.5,
            ..Default::default()
        }
    }

    /// Tuning for wall-jump courses: more air control, steeper walls count.
    pub fn wall_runner() -> Self {
        Self {
            max_speed: 12.0,
            max_acceleration: 30.0,
            max_air_acceleration: 20.0,
            jump_height: 3.0,
            extra_jumps: 1,
            max_ground_angle: 35.0,
            stairs_mask: Layer::STAIRS.mask(),
            ..Default::default()
        }
    }

    /// Copy of this config with every tunable clamped into its valid range.
    pub fn normalized(&self) -> Self {
        Self {
            max_speed: clamp_or(self.max_speed, 0.0, 100.0),
            max_acceleration: clamp_or(self.max_acceleration, 0.0, 100.0),
            max_air_acceleration: clamp_or(self.max_air_acceleration, 0.0, 100.0),
            jump_height: clamp_or(self.jump_height, 0.0, 10.0),
            extra_jumps: self.extra_jumps.min(5),
            max_ground_angle: clamp_or(self.max_ground_angle, 0.0, 90.0),
            max_stairs_angle: clamp_or(self.max_stairs_angle, 0.0, 90.0),
            stairs_mask: self.stairs_mask,
            max_snap_speed: clamp_or(self.max_snap_speed, 0.0, 100.0),
            probe_distance: clamp_or(self.probe_distance, 0.0, f32::MAX),
            probe_mask: self.probe_mask,
        }
    }
}

/// Clamp, mapping NaN to the lower bound.
fn clamp_or(value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}

/// Minimum contact-normal Y for ground, derived from the configured angles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundThresholds {
    /// `cos(max_ground_angle)`.
    pub min_ground_dot_product: f32,

    /// `cos(max_stairs_angle)`.
    pub min_stairs_dot_product: f32,

    stairs_mask: LayerMask,
}

impl GroundThresholds {
    /// Derive thresholds from a config.
    pub fn from_config(config: &LocomotionConfig) -> Self {
        Self {
            min_ground_dot_product: config.max_ground_angle.to_radians().cos(),
            min_stairs_dot_product: config.max_stairs_angle.to_radians().cos(),
            stairs_mask: config.stairs_mask,
        }
    }

    /// Threshold for contacts on the given layer.
    #[inline]
    pub fn min_dot(&self, layer: Layer) -> f32 {
        if self.stairs_mask.contains(layer) {
            self.min_stairs_dot_product
        } else {
            self.min_ground_dot_product
        }
    }
}

impl Default for GroundThresholds {
    fn default() -> Self {
        Self::from_config(&LocomotionConfig::default())
    }
}
