//! Level construction.

use glam::{Quat, Vec3};
use skycastle_physics::{CollisionWorld, Layer, WorldError};

/// A level: collision geometry plus where the player starts.
#[derive(Debug)]
pub struct Level {
    /// Level identifier.
    pub id: String,

    /// Collision world for physics and camera queries.
    pub collision: CollisionWorld,

    /// Player start position (body center).
    pub spawn_point: Vec3,
}

impl Level {
    /// Create an empty level.
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            collision: CollisionWorld::new(),
            spawn_point: Vec3::ZERO,
        }
    }

    /// A single large floor with its top at y=0.
    pub fn flat() -> Self {
        let mut level = Self::new("flat");
        level.collision.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(100.0, 0.5, 100.0),
            Layer::DEFAULT,
        );
        level.spawn_point = Vec3::new(0.0, 1.0, 0.0);
        level
    }

    /// Test course exercising every surface type the controllers care about.
    ///
    /// ```text
    ///            +z
    ///             |   floor B
    ///   ----------+----------  pit (z 20..21.5, 1m deep)
    ///             |   floor A
    ///  steep 60   | spawn    gentle 15
    ///  (x=-12)    |          (x=12)
    ///             | overhang (z -5..-2)
    ///             | stairs ramp 40 (z=-14)
    /// ```
    pub fn test_course() -> Result<Self, WorldError> {
        let mut level = Self::new("test_course");
        let world = &mut level.collision;

        // Floor A
        world.try_add_box(
            Vec3::new(0.0, -0.5, -5.0),
            Vec3::new(30.0, 0.5, 25.0),
            Quat::IDENTITY,
            Layer::DEFAULT,
        )?;

        // Pit bottom, one meter below the floor
        world.try_add_box(
            Vec3::new(0.0, -1.5, 20.75),
            Vec3::new(30.0, 0.5, 0.75),
            Quat::IDENTITY,
            Layer::DEFAULT,
        )?;

        // Floor B
        world.try_add_box(
            Vec3::new(0.0, -0.5, 31.5),
            Vec3::new(30.0, 0.5, 10.0),
            Quat::IDENTITY,
            Layer::DEFAULT,
        )?;

        // Gentle ramp rising toward +x
        world.try_add_box(
            Vec3::new(12.0, 0.0, 0.0),
            Vec3::new(4.0, 0.5, 3.0),
            Quat::from_rotation_z(15f32.to_radians()),
            Layer::DEFAULT,
        )?;

        // Steep slope rising toward -x: a wall for the default tuning
        world.try_add_box(
            Vec3::new(-12.0, 0.0, 0.0),
            Vec3::new(4.0, 0.5, 3.0),
            Quat::from_rotation_z(-60f32.to_radians()),
            Layer::DEFAULT,
        )?;

        // Stairs ramp rising toward -z, walkable only under the stairs angle
        world.try_add_box(
            Vec3::new(0.0, 0.0, -14.0),
            Vec3::new(3.0, 0.5, 4.0),
            Quat::from_rotation_x(-40f32.to_radians()),
            Layer::STAIRS,
        )?;

        // Overhang behind the spawn, in the default camera's line of sight
        world.try_add_box(
            Vec3::new(0.0, 2.5, -3.5),
            Vec3::new(3.0, 0.25, 1.5),
            Quat::IDENTITY,
            Layer::DEFAULT,
        )?;

        // Boulder
        world.add_convex_hull(
            &[
                Vec3::new(7.0, 0.0, 7.0),
                Vec3::new(9.0, 0.0, 7.0),
                Vec3::new(8.0, 0.0, 9.0),
                Vec3::new(8.0, 1.2, 7.8),
            ],
            Layer::DETAIL,
        )?;

        level.spawn_point = Vec3::new(0.0, 1.0, 0.0);

        log::debug!(
            "built level {} with {} brushes",
            level.id,
            level.collision.brush_count()
        );
        Ok(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skycastle_physics::{LayerMask, PhysicsQuery};

    #[test]
    fn test_level_creation() {
        let level = Level::new("test");
        assert_eq!(level.id, "test");
        assert_eq!(level.collision.brush_count(), 0);
    }

    #[test]
    fn test_test_course() {
        let level = Level::test_course().expect("course should build");
        assert_eq!(level.collision.brush_count(), 8);

        // Spawn is above the floor
        let hit = level
            .collision
            .raycast(level.spawn_point, Vec3::NEG_Y, 5.0, LayerMask::ALL)
            .expect("floor below spawn");
        assert!((hit.distance - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_stairs_ramp_is_tagged() {
        let level = Level::test_course().expect("course should build");

        let hit = level
            .collision
            .raycast(Vec3::new(0.0, 5.0, -14.0), Vec3::NEG_Y, 10.0, LayerMask::ALL)
            .expect("should hit the stairs ramp");

        assert_eq!(hit.layer, Layer::STAIRS);
        assert!((hit.normal.y - 40f32.to_radians().cos()).abs() < 1e-3);
    }

    #[test]
    fn test_pit_is_lower_than_floor() {
        let level = Level::test_course().expect("course should build");

        let hit = level
            .collision
            .raycast(Vec3::new(0.0, 5.0, 20.75), Vec3::NEG_Y, 10.0, LayerMask::ALL)
            .expect("should hit the pit bottom");

        assert!((hit.point.y + 1.0).abs() < 1e-3, "pit bottom at {}", hit.point.y);
    }
}
