//! Frame clock.
//!
//! Converts variable render-frame deltas into a whole number of fixed physics
//! steps, keeping both scaled (physics) and unscaled (camera) time.

use serde::{Deserialize, Serialize};
use skycastle_camera::FrameTime;

/// Timing for one render frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameTick {
    /// Real seconds since the previous frame.
    pub unscaled_delta_time: f32,

    /// Scaled seconds since the previous frame.
    pub delta_time: f32,

    /// Real seconds since the clock started.
    pub unscaled_time: f32,

    /// Fixed steps to run this frame.
    pub fixed_steps: u32,
}

impl FrameTick {
    /// Camera timing for this frame.
    pub fn frame_time(&self) -> FrameTime {
        FrameTime::new(self.unscaled_delta_time, self.unscaled_time)
    }
}

/// Fixed-step accumulator with time scale and capped catch-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameClock {
    fixed_delta_time: f32,
    time_scale: f32,
    max_steps_per_frame: u32,

    accumulator: f32,
    unscaled_time: f32,
}

impl FrameClock {
    /// Create a clock stepping at `fixed_delta_time` seconds.
    pub fn new(fixed_delta_time: f32, max_steps_per_frame: u32) -> Self {
        Self {
            fixed_delta_time: fixed_delta_time.max(f32::EPSILON),
            time_scale: 1.0,
            max_steps_per_frame: max_steps_per_frame.max(1),
            accumulator: 0.0,
            unscaled_time: 0.0,
        }
    }

    pub fn fixed_delta_time(&self) -> f32 {
        self.fixed_delta_time
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Set the physics time scale. Negative values clamp to zero.
    pub fn set_time_scale(&mut self, time_scale: f32) {
        self.time_scale = if time_scale.is_nan() { 0.0 } else { time_scale.max(0.0) };
    }

    /// Real seconds since the clock started.
    pub fn unscaled_time(&self) -> f32 {
        self.unscaled_time
    }

    /// Advance by one render frame of `real_delta_time` seconds.
    pub fn advance(&mut self, real_delta_time: f32) -> FrameTick {
        let unscaled_delta_time = if real_delta_time.is_nan() {
            0.0
        } else {
            real_delta_time.max(0.0)
        };
        let delta_time = unscaled_delta_time * self.time_scale;

        self.unscaled_time += unscaled_delta_time;
        self.accumulator += delta_time;

        let mut fixed_steps = 0;
        while self.accumulator >= self.fixed_delta_time && fixed_steps < self.max_steps_per_frame {
            self.accumulator -= self.fixed_delta_time;
            fixed_steps += 1;
        }

        if self.accumulator >= self.fixed_delta_time {
            log::debug!(
                "frame too long, dropping {:.3}s of simulation time",
                self.accumulator - self.accumulator % self.fixed_delta_time
            );
            self.accumulator %= self.fixed_delta_time;
        }

        FrameTick {
            unscaled_delta_time,
            delta_time,
            unscaled_time: self.unscaled_time,
            fixed_steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_partial_frames() {
        let mut clock = FrameClock::new(0.02, 8);

        let mut steps = 0;
        for _ in 0..100 {
            steps += clock.advance(0.01).fixed_steps;
        }

        // One second of frames at 50 Hz, give or take float drift
        assert!((49..=50).contains(&steps), "steps {}", steps);
        assert!((clock.unscaled_time() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_catch_up_is_capped() {
        let mut clock = FrameClock::new(0.02, 4);

        let tick = clock.advance(1.0);
        assert_eq!(tick.fixed_steps, 4);

        // Excess time was dropped, not carried into the next frame
        let tick = clock.advance(0.0);
        assert_eq!(tick.fixed_steps, 0);
    }

    #[test]
    fn test_time_scale_only_affects_physics() {
        let mut clock = FrameClock::new(0.02, 8);
        clock.set_time_scale(0.0);

        let tick = clock.advance(0.1);
        assert_eq!(tick.fixed_steps, 0);
        assert_eq!(tick.delta_time, 0.0);
        assert!((tick.unscaled_delta_time - 0.1).abs() < 1e-6);
        assert!((tick.frame_time().unscaled_time - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_negative_delta_is_ignored() {
        let mut clock = FrameClock::new(0.02, 8);
        let tick = clock.advance(-1.0);

        assert_eq!(tick.fixed_steps, 0);
        assert_eq!(clock.unscaled_time(), 0.0);

        clock.set_time_scale(-2.0);
        assert_eq!(clock.time_scale(), 0.0);
    }
}
