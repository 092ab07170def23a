//! Locomotion controller.
//!
//! This is the main entry point for character movement. It aggregates solver
//! contacts, resolves ground / steep / air state once per fixed step, steers
//! the body's velocity along the contact plane and executes jumps.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::body::RigidBody;
use crate::collision::{CollisionEvent, PhysicsQuery};
use crate::math::move_towards;

use super::config::{GroundThresholds, LocomotionConfig};
use super::contacts::ContactState;
use super::jump::{apply_jump, launch_speed, JumpState};

/// Per-step simulation context, passed explicitly instead of read from globals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepContext {
    /// Fixed step duration (seconds).
    pub delta_time: f32,

    /// World gravity (m/s²).
    pub gravity: Vec3,
}

impl Default for StepContext {
    fn default() -> Self {
        Self {
            delta_time: 0.02,
            gravity: Vec3::new(0.0, -9.81, 0.0),
        }
    }
}

/// Binary presentation signal for the character's surface color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tint {
    /// Standing on ground: rendered black.
    Grounded,
    /// In the air: rendered white.
    Airborne,
}

impl Tint {
    /// Linear RGB color for this tint.
    pub fn rgb(self) -> [f32; 3] {
        match self {
            Self::Grounded => [0.0, 0.0, 0.0],
            Self::Airborne => [1.0, 1.0, 1.0],
        }
    }
}

/// Rigid-body character controller.
///
/// # Example
///
/// ```ignore
/// let mut controller = LocomotionController::new(LocomotionConfig::default());
///
/// // Each render frame:
/// controller.on_frame(move_axis, jump_pressed);
///
/// // Each fixed step:
/// controller.on_fixed_step(&mut body, &world, &ctx);
/// for event in solver.step() {
///     controller.on_collision(&event);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct LocomotionController {
    config: LocomotionConfig,
    thresholds: GroundThresholds,

    contacts: ContactState,
    jump: JumpState,

    velocity: Vec3,
    desired_velocity: Vec3,

    steps_since_last_grounded: u32,

    // Previous step's state, for transition logging
    was_grounded: bool,
    was_on_wall: bool,
}

impl LocomotionController {
    /// Create a controller. The config is normalized first.
    pub fn new(config: LocomotionConfig) -> Self {
        let config = config.normalized();
        let thresholds = GroundThresholds::from_config(&config);
        Self {
            config,
            thresholds,
            contacts: ContactState::default(),
            jump: JumpState::new(),
            velocity: Vec3::ZERO,
            desired_velocity: Vec3::ZERO,
            steps_since_last_grounded: 0,
            was_grounded: false,
            was_on_wall: false,
        }
    }

    /// Create a controller with default configuration.
    pub fn with_default_config() -> Self {
        Self::new(LocomotionConfig::default())
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    /// Active (normalized) configuration.
    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    /// Replace the configuration, clamping it and rederiving thresholds.
    pub fn set_config(&mut self, config: LocomotionConfig) {
        self.config = config.normalized();
        self.thresholds = GroundThresholds::from_config(&self.config);
    }

    /// `cos(max_ground_angle)`.
    pub fn min_ground_dot_product(&self) -> f32 {
        self.thresholds.min_ground_dot_product
    }

    /// `cos(max_stairs_angle)`.
    pub fn min_stairs_dot_product(&self) -> f32 {
        self.thresholds.min_stairs_dot_product
    }

    // ========================================================================
    // Driver entry points
    // ========================================================================

    /// Sample input for this render frame.
    ///
    /// `movement` is the analog stick (x = right, y = forward) and is clamped
    /// to unit length. A jump press is latched until the next fixed step.
    pub fn on_frame(&mut self, movement: Vec2, jump_pressed: bool) {
        let input = movement.clamp_length_max(1.0);
        self.desired_velocity = Vec3::new(input.x, 0.0, input.y) * self.config.max_speed;
        self.jump.request(jump_pressed);
    }

    /// Fold a solver collision event ("enter" or "stay") into this step's contacts.
    pub fn on_collision(&mut self, event: &CollisionEvent) {
        self.contacts.evaluate(event, &self.thresholds);
    }

    /// Run one fixed step and write the resulting velocity to the body.
    pub fn on_fixed_step<B, Q>(&mut self, body: &mut B, query: &Q, ctx: &StepContext)
    where
        B: RigidBody + ?Sized,
        Q: PhysicsQuery + ?Sized,
    {
        self.update_state(body, query);
        self.adjust_velocity(ctx.delta_time);

        if self.jump.take_request() {
            self.jump(ctx.gravity);
        }
        body.set_velocity(self.velocity);

        self.clear_state();
    }

    // ========================================================================
    // Step phases
    // ========================================================================

    /// Resolve ground / steep / air state for this step.
    ///
    /// Returns whether the body counts as grounded.
    pub fn update_state<B, Q>(&mut self, body: &B, query: &Q) -> bool
    where
        B: RigidBody + ?Sized,
        Q: PhysicsQuery + ?Sized,
    {
        self.steps_since_last_grounded = self.steps_since_last_grounded.saturating_add(1);
        self.jump.tick();

        // Collision response may have changed the velocity since our last write
        self.velocity = body.velocity();

        let grounded = self.contacts.on_ground()
            || self.snap_to_ground(body, query)
            || self
                .contacts
                .merge_steep_into_ground(self.thresholds.min_ground_dot_product);

        if grounded {
            self.steps_since_last_grounded = 0;
            self.jump.on_grounded();
            if self.contacts.ground_contact_count > 1 {
                self.contacts.contact_normal = self.contacts.contact_normal.normalize_or(Vec3::Y);
            }
        } else {
            self.contacts.contact_normal = Vec3::Y;
        }

        if grounded != self.was_grounded {
            if grounded {
                log::debug!("landed, contact normal {:?}", self.contacts.contact_normal);
            } else {
                log::debug!("left ground, velocity {:?}", self.velocity);
            }
            self.was_grounded = grounded;
        }

        let on_wall = !grounded && self.contacts.on_steep();
        if on_wall && !self.was_on_wall {
            log::debug!("wall contact, normal {:?}", self.contacts.steep_normal);
        }
        self.was_on_wall = on_wall;

        grounded
    }

    /// Steer the velocity toward the desired velocity along the contact plane.
    pub fn adjust_velocity(&mut self, delta_time: f32) {
        let x_axis = self.project_on_contact_plane(Vec3::X).normalize_or_zero();
        let z_axis = self.project_on_contact_plane(Vec3::Z).normalize_or_zero();

        let current_x = self.velocity.dot(x_axis);
        let current_z = self.velocity.dot(z_axis);

        let acceleration = if self.on_ground() {
            self.config.max_acceleration
        } else {
            self.config.max_air_acceleration
        };
        let max_speed_change = acceleration * delta_time;

        let new_x = move_towards(current_x, self.desired_velocity.x, max_speed_change);
        let new_z = move_towards(current_z, self.desired_velocity.z, max_speed_change);

        self.velocity += x_axis * (new_x - current_x) + z_axis * (new_z - current_z);
    }

    /// Attempt a jump. Returns whether one was executed.
    pub fn jump(&mut self, gravity: Vec3) -> bool {
        let kind = if self.contacts.on_ground() {
            "ground"
        } else if self.contacts.on_steep() {
            "wall"
        } else {
            "air"
        };
        let Some(direction) = self.jump.consume(&self.contacts, self.config.extra_jumps) else {
            log::trace!("jump refused, phase {}", self.jump.phase());
            return false;
        };

        let direction = (direction + Vec3::Y).normalize_or(Vec3::Y);
        let jump_speed = launch_speed(gravity.y, self.config.jump_height);
        self.velocity = apply_jump(self.velocity, direction, jump_speed);

        log::debug!("{} jump along {:?}, phase {}", kind, direction, self.jump.phase());
        true
    }

    /// Forget this step's contacts so the next step aggregates from scratch.
    pub fn clear_state(&mut self) {
        self.contacts.clear();
    }

    // ========================================================================
    // State accessors
    // ========================================================================

    /// At least one ground contact this step.
    #[inline]
    pub fn on_ground(&self) -> bool {
        self.contacts.on_ground()
    }

    /// At least one steep contact this step.
    #[inline]
    pub fn on_steep(&self) -> bool {
        self.contacts.on_steep()
    }

    /// Presentation tint derived from the grounded state.
    pub fn tint(&self) -> Tint {
        if self.on_ground() {
            Tint::Grounded
        } else {
            Tint::Airborne
        }
    }

    /// Raw contact aggregate for this step.
    pub fn contacts(&self) -> &ContactState {
        &self.contacts
    }

    pub fn contact_normal(&self) -> Vec3 {
        self.contacts.contact_normal
    }

    pub fn steep_normal(&self) -> Vec3 {
        self.contacts.steep_normal
    }

    pub fn ground_contact_count(&self) -> u32 {
        self.contacts.ground_contact_count
    }

    pub fn steep_contact_count(&self) -> u32 {
        self.contacts.steep_contact_count
    }

    pub fn jump_phase(&self) -> u32 {
        self.jump.phase()
    }

    pub fn steps_since_last_grounded(&self) -> u32 {
        self.steps_since_last_grounded
    }

    pub fn steps_since_last_jump(&self) -> u32 {
        self.jump.steps_since_last_jump()
    }

    /// Velocity as of the last step phase.
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Target horizontal velocity from the last sampled input.
    pub fn desired_velocity(&self) -> Vec3 {
        self.desired_velocity
    }

    /// Whether a latched jump is waiting for the next fixed step.
    pub fn is_jump_requested(&self) -> bool {
        self.jump.is_requested()
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn snap_to_ground<B, Q>(&mut self, body: &B, query: &Q) -> bool
    where
        B: RigidBody + ?Sized,
        Q: PhysicsQuery + ?Sized,
    {
        // Only right after losing contact, and never right after a jump
        if self.steps_since_last_grounded > 1 || self.jump.steps_since_last_jump() <= 2 {
            return false;
        }

        let speed = self.velocity.length();
        if speed > self.config.max_snap_speed {
            return false;
        }

        let Some(hit) = query.raycast(
            body.position(),
            Vec3::NEG_Y,
            self.config.probe_distance,
            self.config.probe_mask,
        ) else {
            return false;
        };

        if hit.normal.y < self.thresholds.min_dot(hit.layer) {
            return false;
        }

        self.contacts.ground_contact_count = 1;
        self.contacts.contact_normal = hit.normal;

        let dot = self.velocity.dot(hit.normal);
        if dot > 0.0 {
            self.velocity = (self.velocity - hit.normal * dot).normalize_or_zero() * speed;
        }

        log::debug!("snapped to ground {:.3} below", hit.distance);
        true
    }

    fn project_on_contact_plane(&self, vector: Vec3) -> Vec3 {
        let normal = self.contacts.contact_normal;
        vector - normal * vector.dot(normal)
    }
}

// ============================================================================
// Tests
// ============================================================================
