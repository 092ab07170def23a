//! Rigid-body contract consumed by the controllers.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// The slice of a rigid body a character controller is allowed to touch.
///
/// The solver owns integration and collision response; the controller reads
/// position and velocity at the start of its step and writes velocity back
/// at the end.
pub trait RigidBody {
    /// Current world-space position of the body's center.
    fn position(&self) -> Vec3;

    /// Current linear velocity (meters/second).
    fn velocity(&self) -> Vec3;

    /// Overwrite the linear velocity.
    fn set_velocity(&mut self, velocity: Vec3);
}

/// Plain position/velocity pair.
///
/// Useful as a stand-in body for tests and as the state container of a
/// simulated body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BodyState {
    /// Position in world space (center of the collision shape).
    pub position: Vec3,

    /// Velocity in world space (meters/second).
    pub velocity: Vec3,
}

impl BodyState {
    /// Create a body at rest at the given position.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
        }
    }

    /// Builder-style velocity override.
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }
}

impl RigidBody for BodyState {
    #[inline]
    fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    #[inline]
    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_state_roundtrip() {
        let mut body = BodyState::at(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(body.velocity(), Vec3::ZERO);

        body.set_velocity(Vec3::X);
        assert_eq!(body.velocity(), Vec3::X);
        assert_eq!(body.position(), Vec3::new(1.0, 2.0, 3.0));
    }
}
