//! Jump bookkeeping.
//!
//! Tracks the jump request latch, how many jumps have been spent since the
//! body last stood on ground, and how long ago the last jump happened. The
//! "recent jump" counter also gates ground snapping so a deliberate jump is
//! not immediately glued back to the floor.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::contacts::ContactState;

/// Jump state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JumpState {
    /// Jumps consumed since the last confirmed grounding.
    phase: u32,

    /// Fixed steps since the last executed jump.
    steps_since_last_jump: u32,

    /// Jump pressed in some frame since the last fixed step.
    requested: bool,
}

impl JumpState {
    /// Create a fresh jump state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Jumps consumed since the last grounding.
    #[inline]
    pub fn phase(&self) -> u32 {
        self.phase
    }

    /// Fixed steps since the last executed jump.
    #[inline]
    pub fn steps_since_last_jump(&self) -> u32 {
        self.steps_since_last_jump
    }

    /// Whether a jump is waiting for the next fixed step.
    #[inline]
    pub fn is_requested(&self) -> bool {
        self.requested
    }

    /// Latch a jump press. Stays set until a fixed step consumes it.
    #[inline]
    pub fn request(&mut self, pressed: bool) {
        self.requested |= pressed;
    }

    /// Consume the latched request.
    #[inline]
    pub fn take_request(&mut self) -> bool {
        std::mem::take(&mut self.requested)
    }

    /// Advance the step counter. Called once per fixed step.
    #[inline]
    pub fn tick(&mut self) {
        self.steps_since_last_jump = self.steps_since_last_jump.saturating_add(1);
    }

    /// The body is grounded this step; refund jumps unless it just left.
    #[inline]
    pub fn on_grounded(&mut self) {
        if self.steps_since_last_jump > 1 {
            self.phase = 0;
        }
    }

    /// Pick a jump direction and spend a jump, or refuse.
    ///
    /// Priority: ground normal, then wall normal (which refunds air jumps),
    /// then a bonus air jump along `contacts.contact_normal` (up while
    /// airborne). The returned direction is unblended.
    pub fn consume(&mut self, contacts: &ContactState, extra_jumps: u32) -> Option<Vec3> {
        let on_ground = contacts.on_ground();

        let direction = if on_ground {
            contacts.contact_normal
        } else if contacts.on_steep() {
            self.phase = 0;
            contacts.steep_normal
        } else if extra_jumps > 0 && self.phase <= extra_jumps {
            // Falling off a ledge counts as having used the grounded jump
            if self.phase == 0 {
                self.phase = 1;
            }
            contacts.contact_normal
        } else {
            return None;
        };

        if !(on_ground || self.phase < extra_jumps) {
            return None;
        }

        self.steps_since_last_jump = 0;
        self.phase += 1;
        Some(direction)
    }
}

/// Launch speed reaching `height` against vertical gravity `gravity_y`.
#[inline]
pub fn launch_speed(gravity_y: f32, height: f32) -> f32 {
    (-2.0 * gravity_y * height).max(0.0).sqrt()
}

/// Velocity after a jump along `direction` (already normalized).
///
/// Speed already aligned with the jump is subtracted from the impulse, never
/// below zero, so repeated jumps do not stack.
pub fn apply_jump(velocity: Vec3, direction: Vec3, jump_speed: f32) -> Vec3 {
    let aligned_speed = velocity.dot(direction);
    let impulse = if aligned_speed > 0.0 {
        (jump_speed - aligned_speed).max(0.0)
    } else {
        jump_speed
    };
    velocity + direction * impulse
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grounded() -> ContactState {
        ContactState {
            ground_contact_count: 1,
            contact_normal: Vec3::Y,
            ..Default::default()
        }
    }

    fn airborne() -> ContactState {
        ContactState {
            contact_normal: Vec3::Y,
            ..Default::default()
        }
    }

    fn on_wall() -> ContactState {
        ContactState {
            steep_contact_count: 1,
            steep_normal: Vec3::X,
            contact_normal: Vec3::Y,
            ..Default::default()
        }
    }

    #[test]
    fn test_request_latches_until_taken() {
        let mut state = JumpState::new();
        state.request(true);
        state.request(false);
        assert!(state.is_requested());
        assert!(state.take_request());
        assert!(!state.take_request());
    }

    #[test]
    fn test_grounded_jump_uses_contact_normal() {
        let mut state = JumpState::new();
        let direction = state.consume(&grounded(), 0);
        assert_eq!(direction, Some(Vec3::Y));
        assert_eq!(state.phase(), 1);
        assert_eq!(state.steps_since_last_jump(), 0);
    }

    #[test]
    fn test_no_air_jump_without_allowance() {
        let mut state = JumpState::new();
        assert_eq!(state.consume(&airborne(), 0), None);
        assert_eq!(state.phase(), 0);
    }

    #[test]
    fn test_air_jumps_bounded_by_allowance() {
        let mut state = JumpState::new();
        assert!(state.consume(&grounded(), 2).is_some());
        assert_eq!(state.phase(), 1);

        // One bonus jump fits under the allowance
        assert!(state.consume(&airborne(), 2).is_some());
        assert_eq!(state.phase(), 2);

        // Allowance exhausted
        assert!(state.consume(&airborne(), 2).is_none());
        assert_eq!(state.phase(), 2);
    }

    #[test]
    fn test_falling_off_ledge_spends_grounded_jump() {
        let mut state = JumpState::new();
        // Phase 0 in the air is promoted to 1 before the gate
        assert!(state.consume(&airborne(), 2).is_some());
        assert_eq!(state.phase(), 2);
    }

    #[test]
    fn test_wall_jump_refunds_phase() {
        let mut state = JumpState::new();
        state.consume(&grounded(), 3);
        state.consume(&airborne(), 3);
        assert_eq!(state.phase(), 2);

        let direction = state.consume(&on_wall(), 3);
        assert_eq!(direction, Some(Vec3::X));
        assert_eq!(state.phase(), 1);
    }

    #[test]
    fn test_on_grounded_only_refunds_after_leaving() {
        let mut state = JumpState::new();
        state.consume(&grounded(), 0);
        state.tick();
        state.on_grounded();
        assert_eq!(state.phase(), 1, "still inside the launch window");

        state.tick();
        state.on_grounded();
        assert_eq!(state.phase(), 0);
    }

    #[test]
    fn test_launch_speed_matches_projectile_apex() {
        let speed = launch_speed(-9.81, 2.0);
        assert!((speed - (2.0f32 * 9.81 * 2.0).sqrt()).abs() < 1e-5);
        // Upward gravity cannot produce a real launch speed
        assert_eq!(launch_speed(9.81, 2.0), 0.0);
    }

    #[test]
    fn test_apply_jump_never_stacks() {
        let jump_speed = 5.0;
        let direction = Vec3::Y;

        for aligned in [0.0f32, 1.0, 4.9, 5.0, 7.5] {
            let velocity = Vec3::new(2.0, aligned, 0.0);
            let after = apply_jump(velocity, direction, jump_speed);
            let expected = aligned.max(jump_speed);
            assert!(
                (after.dot(direction) - expected).abs() < 1e-5,
                "aligned {} gave {}",
                aligned,
                after.dot(direction)
            );
            assert_eq!(after.x, 2.0);
        }
    }
}
