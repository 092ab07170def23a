//! Skycastle Physics
//!
//! Collision queries and the contact-driven locomotion controller for a
//! rigid-body character. The rigid-body solver itself is external: this crate
//! only consumes it through the [`RigidBody`] and [`PhysicsQuery`] contracts
//! and through the [`CollisionEvent`]s it reports.
//!
//! # Architecture
//!
//! - **Collision**: layers, query traits, hit types, contact events and a
//!   parry3d-backed [`CollisionWorld`] implementing the queries
//! - **Movement**: the [`LocomotionController`] state machine that classifies
//!   contacts, snaps to ground, steers along slopes and jumps
//!
//! # Step order
//!
//! ```text
//! on_frame(input)                       (render rate, latches jump)
//! on_fixed_step(body, query, ctx)       (physics rate)
//!     update_state -> adjust_velocity -> jump? -> write velocity -> clear_state
//! solver step                           (external)
//!     on_collision(event) for each touched collider
//! ```

pub mod body;
pub mod collision;
pub mod math;
pub mod movement;

pub use body::{BodyState, RigidBody};
pub use collision::{
    BodyShape, BrushContact, BrushId, CollisionEvent, CollisionWorld, ContactPoint, Layer,
    LayerMask, PhysicsQuery, RayHit, ShapeHit, WorldError,
};
pub use movement::{LocomotionConfig, LocomotionController, StepContext, Tint};
