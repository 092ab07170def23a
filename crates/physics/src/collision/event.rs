//! Collision events reported by the solver.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::layers::Layer;

/// A single contact between the body and a collider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactPoint {
    /// World-space contact position.
    pub point: Vec3,

    /// Contact normal, pointing from the collider toward the body.
    pub normal: Vec3,
}

/// All contacts with one collider during one solver step.
///
/// Delivered both when the contact begins and on every step it persists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollisionEvent {
    /// Layer of the contacted collider.
    pub layer: Layer,

    /// Contact points with that collider.
    pub contacts: Vec<ContactPoint>,
}

impl CollisionEvent {
    /// Create an event on a layer with no contacts yet.
    pub fn new(layer: Layer) -> Self {
        Self {
            layer,
            contacts: Vec::new(),
        }
    }

    /// Event carrying one contact per normal, positioned at the origin.
    pub fn from_normals(layer: Layer, normals: impl IntoIterator<Item = Vec3>) -> Self {
        Self {
            layer,
            contacts: normals
                .into_iter()
                .map(|normal| ContactPoint {
                    point: Vec3::ZERO,
                    normal,
                })
                .collect(),
        }
    }

    /// Number of contact points.
    #[inline]
    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }

    /// Iterate the contact normals.
    pub fn normals(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.contacts.iter().map(|c| c.normal)
    }
}
