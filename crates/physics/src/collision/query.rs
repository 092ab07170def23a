//! Physics query contract and hit results.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::layers::{Layer, LayerMask};

/// Result of a ray query that hit something.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RayHit {
    /// World-space impact point.
    pub point: Vec3,

    /// Surface normal at the impact point, pointing away from the surface.
    pub normal: Vec3,

    /// Distance from the ray origin to the impact point.
    pub distance: f32,

    /// Layer of the collider that was hit.
    pub layer: Layer,
}

/// Result of a swept-shape query that hit something.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeHit {
    /// Distance the shape traveled before first contact.
    pub distance: f32,

    /// Surface normal of the obstruction at the contact.
    pub normal: Vec3,

    /// Layer of the collider that was hit.
    pub layer: Layer,
}

/// Scene queries the controllers need from the physics engine.
///
/// All queries are synchronous and complete within the caller's step.
/// Directions are normalized by the implementation; a zero direction never
/// hits anything.
pub trait PhysicsQuery {
    /// Cast a ray and return the closest hit within `max_distance`.
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit>;

    /// Sweep an oriented box and return the closest hit within `max_distance`.
    ///
    /// Colliders the box already overlaps at `origin` are ignored.
    fn box_cast(
        &self,
        origin: Vec3,
        half_extents: Vec3,
        direction: Vec3,
        orientation: Quat,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<ShapeHit>;
}

impl<T: PhysicsQuery + ?Sized> PhysicsQuery for &T {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit> {
        (**self).raycast(origin, direction, max_distance, mask)
    }

    fn box_cast(
        &self,
        origin: Vec3,
        half_extents: Vec3,
        direction: Vec3,
        orientation: Quat,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<ShapeHit> {
        (**self).box_cast(origin, half_extents, direction, orientation, max_distance, mask)
    }
}
