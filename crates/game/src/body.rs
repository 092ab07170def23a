//! Simulated rigid body.
//!
//! A minimal stand-in for a physics engine's rigid body: integrates gravity,
//! pushes itself out of level geometry, cancels velocity into surfaces, and
//! reports one [`CollisionEvent`] per touched brush, the way an engine's
//! collision callbacks would.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use skycastle_physics::{
    BodyShape, BodyState, BrushId, CollisionEvent, CollisionWorld, ContactPoint, LayerMask,
    RigidBody,
};

/// Separation below which a resting contact is still reported.
const CONTACT_PREDICTION: f32 = 0.01;

/// Penetration resolution passes per step.
const MAX_RESOLVE_ITERATIONS: usize = 4;

/// A sphere body moving through a [`CollisionWorld`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimBody {
    pub state: BodyState,
    pub shape: BodyShape,

    /// Layers the body collides with.
    pub collision_mask: LayerMask,
}

impl SimBody {
    /// Create a body at rest.
    pub fn new(position: Vec3, shape: BodyShape) -> Self {
        Self {
            state: BodyState::at(position),
            shape,
            collision_mask: LayerMask::ALL,
        }
    }

    /// Integrate one step and resolve collisions.
    ///
    /// Returns the contacts of this step grouped per brush.
    pub fn step(
        &mut self,
        world: &CollisionWorld,
        gravity: Vec3,
        delta_time: f32,
    ) -> Vec<CollisionEvent> {
        self.state.velocity += gravity * delta_time;
        self.state.position += self.state.velocity * delta_time;

        let mut touched: Vec<(BrushId, CollisionEvent)> = Vec::new();

        for _ in 0..MAX_RESOLVE_ITERATIONS {
            let contacts = world.contacts(
                self.state.position,
                self.shape,
                self.collision_mask,
                CONTACT_PREDICTION,
            );

            let mut penetrating = false;
            for contact in &contacts {
                if contact.depth > 0.0 {
                    self.state.position += contact.normal * contact.depth;
                    penetrating = true;
                }

                let normal_speed = self.state.velocity.dot(contact.normal);
                if normal_speed < 0.0 {
                    self.state.velocity -= contact.normal * normal_speed;
                }

                // One contact point per brush per step
                if !touched.iter().any(|(id, _)| *id == contact.brush) {
                    let mut event = CollisionEvent::new(contact.layer);
                    event.contacts.push(ContactPoint {
                        point: contact.point,
                        normal: contact.normal,
                    });
                    touched.push((contact.brush, event));
                }
            }

            if !penetrating {
                break;
            }
        }

        touched.into_iter().map(|(_, event)| event).collect()
    }
}

impl RigidBody for SimBody {
    fn position(&self) -> Vec3 {
        self.state.position
    }

    fn velocity(&self) -> Vec3 {
        self.state.velocity
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.state.velocity = velocity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skycastle_physics::Layer;

    const GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);

    fn create_test_world() -> CollisionWorld {
        let mut world = CollisionWorld::new();

        // Floor with its top at y=0
        world.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(20.0, 0.5, 20.0),
            Layer::DEFAULT,
        );

        // Wall at x=5
        world.add_box(
            Vec3::new(5.5, 2.0, 0.0),
            Vec3::new(0.5, 2.0, 20.0),
            Layer::STAIRS,
        );

        world
    }

    #[test]
    fn test_falls_without_ground() {
        let world = CollisionWorld::new();
        let mut body = SimBody::new(Vec3::new(0.0, 10.0, 0.0), BodyShape::default());

        let events = body.step(&world, GRAVITY, 0.02);

        assert!(events.is_empty());
        assert!(body.velocity().y < 0.0);
        assert!(body.position().y < 10.0);
    }

    #[test]
    fn test_rests_on_floor() {
        let world = create_test_world();
        let mut body = SimBody::new(Vec3::new(0.0, 1.0, 0.0), BodyShape::default());

        let mut last_events = Vec::new();
        for _ in 0..200 {
            last_events = body.step(&world, GRAVITY, 0.02);
        }

        assert!((body.position().y - 0.5).abs() < 0.02, "y {}", body.position().y);
        assert!(body.velocity().y.abs() < 1e-3);

        // Resting contact is reported every step
        assert_eq!(last_events.len(), 1);
        assert!((last_events[0].contacts[0].normal - Vec3::Y).length() < 1e-3);
    }

    #[test]
    fn test_wall_cancels_velocity_into_it() {
        let world = create_test_world();
        let mut body = SimBody::new(Vec3::new(4.4, 0.5, 0.0), BodyShape::default());
        body.set_velocity(Vec3::new(5.0, 0.0, 1.0));

        let events = body.step(&world, Vec3::ZERO, 0.02);

        assert!(body.position().x <= 4.5 + 1e-3);
        assert!(body.velocity().x.abs() < 1e-3);
        assert!((body.velocity().z - 1.0).abs() < 1e-3);

        // Wall contact carries the wall's layer
        assert!(events.iter().any(|e| e.layer == Layer::STAIRS));
    }

    #[test]
    fn test_one_event_per_brush() {
        let world = create_test_world();
        // Sunk into the floor and pressed against the wall
        let mut body = SimBody::new(Vec3::new(4.55, 0.45, 0.0), BodyShape::default());

        let events = body.step(&world, Vec3::ZERO, 0.0);

        assert_eq!(events.len(), 2);
        for event in &events {
            assert_eq!(event.contact_count(), 1);
        }
    }
}
