//! Collision world containing static level geometry.
//!
//! Stores collidable brushes on layers and answers the [`PhysicsQuery`]
//! contract through parry3d. It also reports penetration contacts for a body
//! shape, which a simple solver can turn into [`CollisionEvent`]s.
//!
//! [`CollisionEvent`]: super::CollisionEvent

use glam::{Quat, Vec3};
use parry3d::math::{Isometry, Point, Real, Vector};
use parry3d::na::{Quaternion, Translation3, UnitQuaternion};
use parry3d::query::{self, Ray, ShapeCastOptions, ShapeCastStatus};
use parry3d::shape::SharedShape;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::layers::{Layer, LayerMask};
use super::query::{PhysicsQuery, RayHit, ShapeHit};

/// Smallest half-extent used for swept boxes. Parry needs a non-flat cuboid.
const MIN_CAST_HALF_EXTENT: f32 = 1.0e-4;

/// Identifier of a brush inside a [`CollisionWorld`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BrushId(pub u32);

/// Errors raised while building a collision world.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("convex hull of {points} points is degenerate")]
    DegenerateHull { points: usize },

    #[error("box half extents must be positive, got {0:?}")]
    InvalidExtents(Vec3),
}

/// Shape of a dynamic body, centered on its position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BodyShape {
    /// A ball.
    Sphere {
        /// Ball radius.
        radius: f32,
    },
}

impl BodyShape {
    fn to_parry(self) -> SharedShape {
        match self {
            Self::Sphere { radius } => SharedShape::ball(radius),
        }
    }
}

impl Default for BodyShape {
    fn default() -> Self {
        Self::Sphere { radius: 0.5 }
    }
}

/// One contact between a body shape and a brush.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushContact {
    /// Brush that was touched.
    pub brush: BrushId,

    /// Layer of that brush.
    pub layer: Layer,

    /// Contact point on the brush surface.
    pub point: Vec3,

    /// Brush surface normal, pointing toward the body.
    pub normal: Vec3,

    /// Penetration depth (positive when overlapping, negative when within
    /// the prediction margin but still separated).
    pub depth: f32,
}

/// A piece of collision geometry in the world.
#[derive(Clone)]
struct CollisionBrush {
    id: BrushId,
    shape: SharedShape,
    transform: Isometry<Real>,
    layer: Layer,
}

/// The collision world containing all static geometry.
#[derive(Default)]
pub struct CollisionWorld {
    brushes: Vec<CollisionBrush>,
    next_id: u32,
}

impl std::fmt::Debug for CollisionWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollisionWorld")
            .field("brushes", &self.brushes.len())
            .finish()
    }
}

impl CollisionWorld {
    /// Create an empty collision world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an axis-aligned box.
    ///
    /// # Arguments
    ///
    /// * `center` - Center position of the box in world space
    /// * `half_extents` - Half-size in each axis (x, y, z)
    /// * `layer` - Layer the box sits on
    pub fn add_box(&mut self, center: Vec3, half_extents: Vec3, layer: Layer) -> BrushId {
        self.add_oriented_box(center, half_extents, Quat::IDENTITY, layer)
    }

    /// Add a rotated box. Used for ramps and slanted walls.
    pub fn add_oriented_box(
        &mut self,
        center: Vec3,
        half_extents: Vec3,
        rotation: Quat,
        layer: Layer,
    ) -> BrushId {
        let shape = SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z);
        self.push(shape, isometry(center, rotation), layer)
    }

    /// Add a checked box, rejecting non-positive extents.
    pub fn try_add_box(
        &mut self,
        center: Vec3,
        half_extents: Vec3,
        rotation: Quat,
        layer: Layer,
    ) -> Result<BrushId, WorldError> {
        if half_extents.min_element() <= 0.0 || !half_extents.is_finite() {
            return Err(WorldError::InvalidExtents(half_extents));
        }
        Ok(self.add_oriented_box(center, half_extents, rotation, layer))
    }

    /// Add a convex hull built from world-space points.
    pub fn add_convex_hull(&mut self, points: &[Vec3], layer: Layer) -> Result<BrushId, WorldError> {
        if points.len() < 4 {
            return Err(WorldError::DegenerateHull {
                points: points.len(),
            });
        }

        let parry_points: Vec<Point<Real>> = points.iter().copied().map(to_point).collect();
        let shape = SharedShape::convex_hull(&parry_points).ok_or(WorldError::DegenerateHull {
            points: points.len(),
        })?;

        Ok(self.push(shape, Isometry::identity(), layer))
    }

    /// Remove all collision geometry.
    pub fn clear(&mut self) {
        self.brushes.clear();
    }

    /// Number of collision brushes.
    pub fn brush_count(&self) -> usize {
        self.brushes.len()
    }

    /// Report every brush the shape touches or comes within `prediction` of.
    ///
    /// # Arguments
    ///
    /// * `position` - Center of the body shape
    /// * `shape` - The body shape
    /// * `mask` - Layers to test against
    /// * `prediction` - Separation below which a contact is still reported
    pub fn contacts(
        &self,
        position: Vec3,
        shape: BodyShape,
        mask: LayerMask,
        prediction: f32,
    ) -> Vec<BrushContact> {
        let body_shape = shape.to_parry();
        let body_transform = isometry(position, Quat::IDENTITY);

        let mut contacts = Vec::new();
        for brush in self.brushes_in(mask) {
            if let Ok(Some(contact)) = query::contact(
                &body_transform,
                body_shape.as_ref(),
                &brush.transform,
                brush.shape.as_ref(),
                prediction,
            ) {
                contacts.push(BrushContact {
                    brush: brush.id,
                    layer: brush.layer,
                    point: from_point(&contact.point2),
                    normal: from_vector(&contact.normal2),
                    depth: -contact.dist,
                });
            }
        }
        contacts
    }

    // ========================================================================
    // Private helpers
    // ========================================================================

    fn push(&mut self, shape: SharedShape, transform: Isometry<Real>, layer: Layer) -> BrushId {
        let id = BrushId(self.next_id);
        self.next_id += 1;
        self.brushes.push(CollisionBrush {
            id,
            shape,
            transform,
            layer,
        });
        id
    }

    fn brushes_in(&self, mask: LayerMask) -> impl Iterator<Item = &CollisionBrush> {
        self.brushes.iter().filter(move |b| mask.contains(b.layer))
    }
}

impl PhysicsQuery for CollisionWorld {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit> {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO || max_distance <= 0.0 {
            return None;
        }

        let ray = Ray::new(to_point(origin), to_vector(dir));

        let mut closest: Option<RayHit> = None;
        for brush in self.brushes_in(mask) {
            let Some(hit) =
                brush
                    .shape
                    .cast_ray_and_get_normal(&brush.transform, &ray, max_distance, true)
            else {
                continue;
            };

            // Brushes containing the origin are not reported
            let distance = hit.time_of_impact;
            let normal = from_vector(&hit.normal).normalize_or_zero();
            if distance <= 0.0 || normal == Vec3::ZERO {
                continue;
            }

            if closest.map_or(true, |c| distance < c.distance) {
                closest = Some(RayHit {
                    point: origin + dir * distance,
                    normal,
                    distance,
                    layer: brush.layer,
                });
            }
        }

        closest
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
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO || max_distance <= 0.0 {
            return None;
        }

        let extents = half_extents.abs().max(Vec3::splat(MIN_CAST_HALF_EXTENT));
        let cast_shape = SharedShape::cuboid(extents.x, extents.y, extents.z);
        let cast_transform = isometry(origin, orientation);
        let velocity = to_vector(dir);
        let options = ShapeCastOptions::with_max_time_of_impact(max_distance);

        let mut closest: Option<ShapeHit> = None;
        for brush in self.brushes_in(mask) {
            let Ok(Some(hit)) = query::cast_shapes(
                &cast_transform,
                &velocity,
                cast_shape.as_ref(),
                &brush.transform,
                &Vector::zeros(),
                brush.shape.as_ref(),
                options,
            ) else {
                continue;
            };

            // Already overlapping at the start of the sweep
            if matches!(hit.status, ShapeCastStatus::PenetratingOrWithinTargetDist) {
                continue;
            }

            let distance = hit.time_of_impact;
            if distance > max_distance {
                continue;
            }
            if closest.map_or(true, |c| distance < c.distance) {
                closest = Some(ShapeHit {
                    distance,
                    normal: from_vector(&hit.normal2),
                    layer: brush.layer,
                });
            }
        }

        closest
    }
}

// ============================================================================
// glam <-> parry conversions
// ============================================================================

#[inline]
fn to_point(v: Vec3) -> Point<Real> {
    Point::new(v.x, v.y, v.z)
}

#[inline]
fn to_vector(v: Vec3) -> Vector<Real> {
    Vector::new(v.x, v.y, v.z)
}

#[inline]
fn from_point(p: &Point<Real>) -> Vec3 {
    Vec3::new(p.x, p.y, p.z)
}

#[inline]
fn from_vector(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

fn isometry(position: Vec3, rotation: Quat) -> Isometry<Real> {
    let rotation = UnitQuaternion::new_normalize(Quaternion::new(
        rotation.w, rotation.x, rotation.y, rotation.z,
    ));
    Isometry::from_parts(
        Translation3::new(position.x, position.y, position.z),
        rotation,
    )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_world() -> CollisionWorld {
        let mut world = CollisionWorld::new();

        // Floor with its top at y=0
        world.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(50.0, 0.5, 50.0),
            Layer::DEFAULT,
        );

        // Wall at x=10
        world.add_box(
            Vec3::new(10.0, 2.5, 0.0),
            Vec3::new(0.5, 2.5, 10.0),
            Layer::DEFAULT,
        );

        world
    }

    #[test]
    fn test_raycast_hit() {
        let world = create_test_world();

        let hit = world
            .raycast(Vec3::new(0.0, 1.0, 0.0), Vec3::X, 100.0, LayerMask::ALL)
            .expect("should hit the wall");

        assert!((hit.point.x - 9.5).abs() < 0.01, "hit at {:?}", hit.point);
        assert!((hit.normal - Vec3::NEG_X).length() < 1e-3);
        assert!((hit.distance - 9.5).abs() < 0.01);
    }

    #[test]
    fn test_raycast_down_reports_floor_normal() {
        let world = create_test_world();

        let hit = world
            .raycast(Vec3::new(0.0, 0.5, 0.0), Vec3::NEG_Y, 1.0, LayerMask::ALL)
            .expect("should hit the floor");

        assert!((hit.distance - 0.5).abs() < 1e-3);
        assert!((hit.normal - Vec3::Y).length() < 1e-3);
        assert_eq!(hit.layer, Layer::DEFAULT);
    }

    #[test]
    fn test_raycast_miss() {
        let world = create_test_world();

        let hit = world.raycast(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_X, 100.0, LayerMask::ALL);
        assert!(hit.is_none());

        // Too short to reach the floor
        let hit = world.raycast(Vec3::new(0.0, 2.0, 0.0), Vec3::NEG_Y, 1.0, LayerMask::ALL);
        assert!(hit.is_none());
    }

    #[test]
    fn test_raycast_from_inside_brush_is_ignored() {
        let mut world = CollisionWorld::new();
        world.add_box(Vec3::ZERO, Vec3::splat(1.0), Layer::DEFAULT);

        let hit = world.raycast(Vec3::new(0.0, 0.5, 0.0), Vec3::NEG_Y, 1.0, LayerMask::ALL);
        assert!(hit.is_none(), "hit {:?}", hit);
    }

    #[test]
    fn test_raycast_from_inside_brush_finds_next_surface() {
        let mut world = create_test_world();
        // Pillar standing on the floor
        world.add_box(Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.5, 2.0, 0.5), Layer::DETAIL);

        let hit = world
            .raycast(Vec3::new(0.0, 0.5, 0.0), Vec3::NEG_Y, 1.0, LayerMask::ALL)
            .expect("should hit the floor below the pillar");

        assert_eq!(hit.layer, Layer::DEFAULT);
        assert!((hit.distance - 0.5).abs() < 1e-3);
        assert!((hit.normal - Vec3::Y).length() < 1e-3);
    }

    #[test]
    fn test_layer_mask_filtering() {
        let mut world = CollisionWorld::new();

        world.add_box(Vec3::new(5.0, 1.0, 0.0), Vec3::new(0.5, 1.0, 5.0), Layer::DEFAULT);
        world.add_box(Vec3::new(3.0, 1.0, 0.0), Vec3::new(0.5, 1.0, 5.0), Layer::DETAIL);

        let mask = LayerMask::ALL.without(Layer::DETAIL);
        let hit = world
            .raycast(Vec3::new(0.0, 1.0, 0.0), Vec3::X, 100.0, mask)
            .expect("should hit the solid wall");

        // Should hit wall at x=4.5, not the detail brush at x=2.5
        assert!((hit.point.x - 4.5).abs() < 0.01);
    }

    #[test]
    fn test_box_cast_hits_wall() {
        let world = create_test_world();

        let hit = world
            .box_cast(
                Vec3::new(0.0, 2.0, 0.0),
                Vec3::new(0.2, 0.2, 0.0),
                Vec3::X,
                Quat::IDENTITY,
                20.0,
                LayerMask::ALL,
            )
            .expect("box should hit the wall");

        // Leading face is 0.2 ahead of the center, wall face at x=9.5
        assert!((hit.distance - 9.3).abs() < 0.05, "distance {}", hit.distance);
    }

    #[test]
    fn test_box_cast_respects_max_distance() {
        let world = create_test_world();

        let hit = world.box_cast(
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::new(0.2, 0.2, 0.0),
            Vec3::X,
            Quat::IDENTITY,
            5.0,
            LayerMask::ALL,
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_contacts_report_floor() {
        let world = create_test_world();

        // Sphere sinking slightly into the floor
        let contacts = world.contacts(
            Vec3::new(0.0, 0.45, 0.0),
            BodyShape::Sphere { radius: 0.5 },
            LayerMask::ALL,
            0.01,
        );

        assert_eq!(contacts.len(), 1);
        let contact = contacts[0];
        assert!((contact.normal - Vec3::Y).length() < 1e-3, "normal {:?}", contact.normal);
        assert!((contact.depth - 0.05).abs() < 1e-3, "depth {}", contact.depth);
    }

    #[test]
    fn test_oriented_box_slope_normal() {
        let mut world = CollisionWorld::new();
        let tilt = Quat::from_rotation_x(30f32.to_radians());
        world.add_oriented_box(Vec3::ZERO, Vec3::new(5.0, 0.5, 5.0), tilt, Layer::DEFAULT);

        let hit = world
            .raycast(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y, 10.0, LayerMask::ALL)
            .expect("should hit the slope");

        assert!((hit.normal.y - 30f32.to_radians().cos()).abs() < 1e-3);
    }

    #[test]
    fn test_degenerate_hull_is_an_error() {
        let mut world = CollisionWorld::new();
        let result = world.add_convex_hull(&[Vec3::ZERO, Vec3::X], Layer::DEFAULT);
        assert!(matches!(result, Err(WorldError::DegenerateHull { points: 2 })));
        assert_eq!(world.brush_count(), 0);
    }

    #[test]
    fn test_invalid_box_extents_rejected() {
        let mut world = CollisionWorld::new();
        let result = world.try_add_box(
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 1.0),
            Quat::IDENTITY,
            Layer::DEFAULT,
        );
        assert!(matches!(result, Err(WorldError::InvalidExtents(_))));
    }
}
