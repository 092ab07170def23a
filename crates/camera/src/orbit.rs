//! Orbit camera controller.
//!
//! Keeps a smoothed focus point near the target, orbits around it from player
//! input, realigns behind the direction of travel after a period without
//! input, and pulls in whenever geometry blocks the view of the target.

use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use skycastle_physics::math::{delta_angle, heading_degrees, move_towards_angle, wrap_degrees};
use skycastle_physics::PhysicsQuery;

use crate::config::OrbitCameraConfig;
use crate::lens::CameraLens;

/// Manual input below this magnitude on both axes is ignored.
const MANUAL_INPUT_EPSILON: f32 = 0.001;

/// Planar focus movement (squared) below which alignment does not run.
const MIN_ALIGN_MOVEMENT_SQR: f32 = 0.0001;

/// Distance below which the focus point counts as already centered.
const CENTERING_EPSILON: f32 = 0.01;

/// Orbit angles (pitch, yaw) a new camera starts with.
pub const INITIAL_ORBIT_ANGLES: Vec2 = Vec2::new(45.0, 0.0);

/// Render-frame timing. The camera ignores time scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameTime {
    /// Real seconds since the previous frame.
    pub unscaled_delta_time: f32,

    /// Real seconds since startup.
    pub unscaled_time: f32,
}

impl FrameTime {
    pub fn new(unscaled_delta_time: f32, unscaled_time: f32) -> Self {
        Self {
            unscaled_delta_time,
            unscaled_time,
        }
    }
}

/// Camera position and orientation for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl CameraPose {
    /// Viewing direction (+Z rotated by the pose).
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Get the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_lh(self.position, self.forward(), self.up())
    }
}

/// Rotation for orbit angles given as (pitch, yaw) in degrees.
pub fn orbit_rotation(angles: Vec2) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        angles.y.to_radians(),
        angles.x.to_radians(),
        0.0,
    )
}

/// Third-person orbit camera.
///
/// # Example
///
/// ```ignore
/// let mut camera = OrbitCameraController::new(OrbitCameraConfig::default(), player_position);
///
/// // Each render frame, after physics:
/// let pose = camera.on_frame(player_position, look_axis, &frame, &lens, &world);
/// ```
#[derive(Debug, Clone)]
pub struct OrbitCameraController {
    config: OrbitCameraConfig,

    focus_point: Vec3,
    previous_focus_point: Vec3,

    /// (pitch, yaw) in degrees.
    orbit_angles: Vec2,
    last_manual_rotation_time: f32,

    pose: CameraPose,

    // Transition tracking for logs
    obstructed: bool,
    aligning: bool,
}

impl OrbitCameraController {
    /// Create a camera looking at `target` from the initial orbit angles.
    pub fn new(config: OrbitCameraConfig, target: Vec3) -> Self {
        let config = config.normalized();
        let mut camera = Self {
            config,
            focus_point: target,
            previous_focus_point: target,
            orbit_angles: INITIAL_ORBIT_ANGLES,
            last_manual_rotation_time: 0.0,
            pose: CameraPose::default(),
            obstructed: false,
            aligning: false,
        };
        camera.constrain_angles();

        let rotation = orbit_rotation(camera.orbit_angles);
        camera.pose = CameraPose {
            position: target - rotation * Vec3::Z * camera.config.distance,
            rotation,
        };
        camera
    }

    /// Active (normalized) configuration.
    pub fn config(&self) -> &OrbitCameraConfig {
        &self.config
    }

    /// Replace the configuration and re-apply the pitch limits.
    pub fn set_config(&mut self, config: OrbitCameraConfig) {
        self.config = config.normalized();
        self.constrain_angles();
    }

    /// Update the camera for one render frame and return its new pose.
    ///
    /// `camera_input` is the look axis as (vertical, horizontal): x drives
    /// pitch, y drives yaw.
    pub fn on_frame<Q>(
        &mut self,
        target: Vec3,
        camera_input: Vec2,
        frame: &FrameTime,
        lens: &CameraLens,
        query: &Q,
    ) -> CameraPose
    where
        Q: PhysicsQuery + ?Sized,
    {
        self.update_focus_point(target, frame.unscaled_delta_time);

        let look_rotation = if self.manual_rotation(camera_input, frame)
            || self.automatic_rotation(frame)
        {
            self.constrain_angles();
            orbit_rotation(self.orbit_angles)
        } else {
            self.pose.rotation
        };

        let look_direction = look_rotation * Vec3::Z;
        let mut look_position = self.focus_point - look_direction * self.config.distance;

        // Sweep the near-plane rectangle from the target to where the camera
        // wants to be, so nothing can hide the target
        let rect_offset = look_direction * lens.near_clip;
        let rect_position = look_position + rect_offset;
        let cast_line = rect_position - target;
        let cast_distance = cast_line.length();

        let mut obstructed = false;
        if cast_distance > f32::EPSILON {
            let cast_direction = cast_line / cast_distance;
            if let Some(hit) = query.box_cast(
                target,
                lens.half_extents(),
                cast_direction,
                look_rotation,
                cast_distance,
                self.config.obstruction_mask,
            ) {
                look_position = target + cast_direction * hit.distance - rect_offset;
                obstructed = true;
            }
        }

        if obstructed != self.obstructed {
            if obstructed {
                log::debug!("camera pulled in to {:?}", look_position);
            } else {
                log::debug!("camera view clear");
            }
            self.obstructed = obstructed;
        }

        self.pose = CameraPose {
            position: look_position,
            rotation: look_rotation,
        };
        self.pose
    }

    // ========================================================================
    // Frame phases
    // ========================================================================

    /// Move the focus point toward the target, lagging by at most `focus_radius`.
    pub fn update_focus_point(&mut self, target: Vec3, unscaled_delta_time: f32) {
        self.previous_focus_point = self.focus_point;

        let radius = self.config.focus_radius;
        if radius > 0.0 {
            let distance = target.distance(self.focus_point);
            let mut t = 1.0;
            if distance > CENTERING_EPSILON && self.config.focus_centering > 0.0 {
                t = (1.0 - self.config.focus_centering).powf(unscaled_delta_time);
            }
            if distance > radius {
                t = f32::min(t, radius / distance);
            }
            self.focus_point = target.lerp(self.focus_point, t);
        } else {
            self.focus_point = target;
        }
    }

    /// Apply player look input. Returns whether the angles changed.
    pub fn manual_rotation(&mut self, input: Vec2, frame: &FrameTime) -> bool {
        if input.x.abs() > MANUAL_INPUT_EPSILON || input.y.abs() > MANUAL_INPUT_EPSILON {
            self.orbit_angles += self.config.rotation_speed * frame.unscaled_delta_time * input;
            self.last_manual_rotation_time = frame.unscaled_time;
            self.aligning = false;
            return true;
        }
        false
    }

    /// Turn the yaw toward the focus point's direction of travel.
    ///
    /// Returns whether the angles changed.
    pub fn automatic_rotation(&mut self, frame: &FrameTime) -> bool {
        if frame.unscaled_time - self.last_manual_rotation_time < self.config.align_delay {
            return false;
        }

        let movement = Vec2::new(
            self.focus_point.x - self.previous_focus_point.x,
            self.focus_point.z - self.previous_focus_point.z,
        );
        let movement_delta_sqr = movement.length_squared();
        if movement_delta_sqr < MIN_ALIGN_MOVEMENT_SQR {
            return false;
        }

        let direction = movement / movement_delta_sqr.sqrt();
        let heading = heading_degrees(direction.x, direction.y);
        let delta_abs = delta_angle(self.orbit_angles.y, heading).abs();

        let smooth_range = self.config.align_smooth_range;
        let mut rotation_change =
            self.config.rotation_speed * frame.unscaled_delta_time.min(movement_delta_sqr);
        if delta_abs < smooth_range {
            rotation_change *= delta_abs / smooth_range;
        } else if 180.0 - delta_abs < smooth_range {
            rotation_change *= (180.0 - delta_abs) / smooth_range;
        }

        if !self.aligning {
            log::debug!("camera aligning toward heading {:.1}", heading);
            self.aligning = true;
        }

        self.orbit_angles.y = move_towards_angle(self.orbit_angles.y, heading, rotation_change);
        true
    }

    /// Clamp pitch to the configured range and wrap yaw into `[0, 360)`.
    pub fn constrain_angles(&mut self) {
        self.orbit_angles.x = self
            .orbit_angles
            .x
            .clamp(self.config.min_vertical_angle, self.config.max_vertical_angle);
        self.orbit_angles.y = wrap_degrees(self.orbit_angles.y);
    }

    // ========================================================================
    // State accessors
    // ========================================================================

    pub fn focus_point(&self) -> Vec3 {
        self.focus_point
    }

    pub fn previous_focus_point(&self) -> Vec3 {
        self.previous_focus_point
    }

    /// (pitch, yaw) in degrees.
    pub fn orbit_angles(&self) -> Vec2 {
        self.orbit_angles
    }

    pub fn last_manual_rotation_time(&self) -> f32 {
        self.last_manual_rotation_time
    }

    /// Pose produced by the most recent frame.
    pub fn pose(&self) -> CameraPose {
        self.pose
    }

    /// Whether the last frame had to pull the camera in.
    pub fn is_obstructed(&self) -> bool {
        self.obstructed
    }
}

// ============================================================================
// Tests
// ============================================================================
