//! Scalar and angle helpers shared by the locomotion and camera controllers.
//!
//! Angles in this module are in degrees.

/// Move `current` toward `target` by at most `max_delta`, never overshooting.
#[inline]
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = target - current;
    if delta.abs() <= max_delta {
        target
    } else {
        current + delta.signum() * max_delta
    }
}

/// Wrap `value` into `[0, length)`.
#[inline]
pub fn repeat(value: f32, length: f32) -> f32 {
    (value - (value / length).floor() * length).clamp(0.0, length)
}

/// Shortest signed difference from `current` to `target`, in `(-180, 180]`.
#[inline]
pub fn delta_angle(current: f32, target: f32) -> f32 {
    let delta = repeat(target - current, 360.0);
    if delta > 180.0 {
        delta - 360.0
    } else {
        delta
    }
}

/// Like [`move_towards`] but takes the short way around the circle.
pub fn move_towards_angle(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = delta_angle(current, target);
    if -max_delta < delta && delta < max_delta {
        return target;
    }
    move_towards(current, current + delta, max_delta)
}

/// Wrap an angle into `[0, 360)`.
///
/// `rem_euclid` can round tiny negative inputs up to exactly 360, so that
/// case folds back to zero.
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Heading of a normalized planar direction `(x, z)` in `[0, 360)`.
///
/// Zero points along +Z and angles grow clockwise when seen from above, so
/// +X is 90 degrees.
#[inline]
pub fn heading_degrees(x: f32, z: f32) -> f32 {
    let angle = z.clamp(-1.0, 1.0).acos().to_degrees();
    if x < 0.0 {
        360.0 - angle
    } else {
        angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_towards_clamps_step() {
        assert_eq!(move_towards(0.0, 10.0, 2.0), 2.0);
        assert_eq!(move_towards(0.0, -10.0, 2.0), -2.0);
        assert_eq!(move_towards(9.5, 10.0, 2.0), 10.0);
    }

    #[test]
    fn test_delta_angle_takes_short_way() {
        assert!((delta_angle(350.0, 10.0) - 20.0).abs() < 1e-4);
        assert!((delta_angle(10.0, 350.0) + 20.0).abs() < 1e-4);
        assert!((delta_angle(0.0, 180.0) - 180.0).abs() < 1e-4);
    }

    #[test]
    fn test_move_towards_angle_wraps() {
        let result = move_towards_angle(350.0, 10.0, 5.0);
        assert!((result - 355.0).abs() < 1e-4, "got {}", result);

        // Within range snaps straight to the target
        assert_eq!(move_towards_angle(0.0, 3.0, 5.0), 3.0);
    }

    #[test]
    fn test_wrap_degrees_range() {
        for angle in [-720.5, -360.0, -1e-8, 0.0, 359.999, 360.0, 725.0] {
            let wrapped = wrap_degrees(angle);
            assert!((0.0..360.0).contains(&wrapped), "{} -> {}", angle, wrapped);
        }
    }

    #[test]
    fn test_heading_degrees_quadrants() {
        assert!(heading_degrees(0.0, 1.0).abs() < 1e-4);
        assert!((heading_degrees(1.0, 0.0) - 90.0).abs() < 1e-4);
        assert!((heading_degrees(0.0, -1.0) - 180.0).abs() < 1e-4);
        assert!((heading_degrees(-1.0, 0.0) - 270.0).abs() < 1e-4);
    }
}
