//! Per-step contact aggregation.
//!
//! Contacts arrive in any order and any number of times per step. They are
//! only ever summed and counted, so the aggregate is independent of the
//! order the solver reports them in.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::collision::CollisionEvent;

use super::config::GroundThresholds;

/// Normals pointing this far below horizontal are overhangs, not walls.
const STEEP_MIN_NORMAL_Y: f32 = -0.01;

/// How a single contact normal was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactClass {
    /// Walkable surface.
    Ground,
    /// Wall or slope too steep to stand on.
    Steep,
    /// Ceiling or overhang.
    Ignored,
}

impl ContactClass {
    /// Classify a contact normal against a minimum ground dot product.
    #[inline]
    pub fn of(normal: Vec3, min_dot: f32) -> Self {
        if normal.y >= min_dot {
            Self::Ground
        } else if normal.y > STEEP_MIN_NORMAL_Y {
            Self::Steep
        } else {
            Self::Ignored
        }
    }
}

/// Contacts accumulated since the last [`ContactState::clear`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactState {
    /// Number of ground contacts.
    pub ground_contact_count: u32,

    /// Number of steep contacts.
    pub steep_contact_count: u32,

    /// Sum of ground normals (normalized once state is resolved).
    pub contact_normal: Vec3,

    /// Sum of steep normals.
    pub steep_normal: Vec3,
}

impl ContactState {
    /// Whether any ground contact was recorded.
    #[inline]
    pub fn on_ground(&self) -> bool {
        self.ground_contact_count > 0
    }

    /// Whether any steep contact was recorded.
    #[inline]
    pub fn on_steep(&self) -> bool {
        self.steep_contact_count > 0
    }

    /// Fold one contact normal into the aggregate.
    pub fn record(&mut self, normal: Vec3, min_dot: f32) -> ContactClass {
        let class = ContactClass::of(normal, min_dot);
        match class {
            ContactClass::Ground => {
                self.ground_contact_count += 1;
                self.contact_normal += normal;
            }
            ContactClass::Steep => {
                self.steep_contact_count += 1;
                self.steep_normal += normal;
            }
            ContactClass::Ignored => {}
        }
        class
    }

    /// Fold every contact of a collision event into the aggregate.
    pub fn evaluate(&mut self, event: &CollisionEvent, thresholds: &GroundThresholds) {
        let min_dot = thresholds.min_dot(event.layer);
        for normal in event.normals() {
            let class = self.record(normal, min_dot);
            log::trace!("contact {:?} on layer {} -> {:?}", normal, event.layer.index(), class);
        }
    }

    /// Turn several steep contacts into one virtual ground contact.
    ///
    /// A body wedged in a narrow crevice touches only steep walls, but their
    /// combined normal may still point up enough to stand on. Normalizes
    /// `steep_normal` as a side effect when there is more than one contact.
    pub fn merge_steep_into_ground(&mut self, min_ground_dot: f32) -> bool {
        if self.steep_contact_count > 1 {
            self.steep_normal = self.steep_normal.normalize_or_zero();
            if self.steep_normal.y >= min_ground_dot {
                self.ground_contact_count = 1;
                self.contact_normal = self.steep_normal;
                return true;
            }
        }
        false
    }

    /// Reset counts and normal sums for the next step.
    #[inline]
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::Layer;

    fn slope_normal(degrees: f32) -> Vec3 {
        let radians = degrees.to_radians();
        Vec3::new(0.0, radians.cos(), radians.sin())
    }

    #[test]
    fn test_classify_flat_and_wall() {
        let min_dot = 25f32.to_radians().cos();
        assert_eq!(ContactClass::of(Vec3::Y, min_dot), ContactClass::Ground);
        assert_eq!(ContactClass::of(Vec3::X, min_dot), ContactClass::Steep);
        assert_eq!(ContactClass::of(Vec3::NEG_Y, min_dot), ContactClass::Ignored);
        // Slight overhang still counts as a wall
        assert_eq!(
            ContactClass::of(Vec3::new(1.0, -0.005, 0.0), min_dot),
            ContactClass::Steep
        );
    }

    #[test]
    fn test_forty_degree_contact_is_steep_off_stairs() {
        let config = super::super::LocomotionConfig {
            max_ground_angle: 25.0,
            max_stairs_angle: 50.0,
            stairs_mask: Layer::STAIRS.mask(),
            ..Default::default()
        };
        let thresholds = GroundThresholds::from_config(&config);

        let mut state = ContactState::default();
        state.evaluate(
            &CollisionEvent::from_normals(Layer::DEFAULT, [slope_normal(40.0)]),
            &thresholds,
        );
        assert_eq!(state.steep_contact_count, 1);
        assert_eq!(state.ground_contact_count, 0);

        // The same surface tagged as stairs is walkable
        let mut state = ContactState::default();
        state.evaluate(
            &CollisionEvent::from_normals(Layer::STAIRS, [slope_normal(40.0)]),
            &thresholds,
        );
        assert_eq!(state.ground_contact_count, 1);
        assert_eq!(state.steep_contact_count, 0);
    }

    #[test]
    fn test_aggregation_is_order_independent() {
        let thresholds = GroundThresholds::default();
        let normals = [Vec3::Y, slope_normal(10.0), Vec3::X, slope_normal(60.0)];

        let mut forward = ContactState::default();
        let mut reverse = ContactState::default();
        for n in normals {
            forward.evaluate(&CollisionEvent::from_normals(Layer::DEFAULT, [n]), &thresholds);
        }
        for n in normals.iter().rev() {
            reverse.evaluate(&CollisionEvent::from_normals(Layer::DEFAULT, [*n]), &thresholds);
        }

        assert_eq!(forward.ground_contact_count, reverse.ground_contact_count);
        assert_eq!(forward.steep_contact_count, reverse.steep_contact_count);
        assert!((forward.contact_normal - reverse.contact_normal).length() < 1e-6);
        assert!((forward.steep_normal - reverse.steep_normal).length() < 1e-6);
    }

    #[test]
    fn test_crevice_merges_into_ground() {
        let min_ground_dot = 25f32.to_radians().cos();
        let mut state = ContactState::default();

        // Two 60 degree walls facing each other
        state.record(Vec3::new(0.866, 0.5, 0.0), min_ground_dot);
        state.record(Vec3::new(-0.866, 0.5, 0.0), min_ground_dot);
        assert_eq!(state.steep_contact_count, 2);

        assert!(state.merge_steep_into_ground(min_ground_dot));
        assert_eq!(state.ground_contact_count, 1);
        assert!((state.contact_normal - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_single_steep_contact_never_merges() {
        let mut state = ContactState::default();
        state.record(Vec3::new(0.3, 0.95, 0.0), 0.99);
        assert!(!state.merge_steep_into_ground(0.9));
        assert_eq!(state.ground_contact_count, 0);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut state = ContactState::default();
        state.record(Vec3::Y, 0.9);
        state.record(Vec3::X, 0.9);
        state.clear();

        assert!(!state.on_ground());
        assert!(!state.on_steep());
        assert_eq!(state.contact_normal, Vec3::ZERO);
        assert_eq!(state.steep_normal, Vec3::ZERO);
    }
}
