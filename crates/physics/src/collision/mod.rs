//! Collision queries and contact reporting.
//!
//! # Key Types
//!
//! - [`PhysicsQuery`]: the raycast / box-cast contract controllers depend on
//! - [`CollisionEvent`]: contacts reported by the solver for one touched collider
//! - [`CollisionWorld`]: a parry3d-backed implementation of the queries
//! - [`Layer`] / [`LayerMask`]: per-collider layer and query filters
//!
//! "No hit" is always `None`, never an error. Callers decide what a miss means
//! for them (no ground snap, no camera pull-in).

mod event;
mod layers;
mod query;
mod world;

pub use event::{CollisionEvent, ContactPoint};
pub use layers::{Layer, LayerMask};
pub use query::{PhysicsQuery, RayHit, ShapeHit};
pub use world::{BodyShape, BrushContact, BrushId, CollisionWorld, WorldError};
