//! Game simulation - the main loop.
//!
//! Wires a simulated body, the locomotion controller and the orbit camera
//! together at their own rates: locomotion and the body run on the fixed
//! step, the camera once per render frame on unscaled time.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use skycastle_camera::{CameraLens, CameraPose, OrbitCameraConfig, OrbitCameraController};
use skycastle_physics::{
    BodyShape, LocomotionConfig, LocomotionController, RigidBody, StepContext, Tint,
};

use crate::body::SimBody;
use crate::clock::FrameClock;
use crate::input::PlayerInput;
use crate::level::Level;

/// Game simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Fixed step rate (steps per second).
    pub tick_rate: u32,

    /// Most fixed steps run in one render frame.
    pub max_steps_per_frame: u32,

    /// World gravity (m/s²).
    pub gravity: Vec3,

    /// Shape of the player body.
    pub body_shape: BodyShape,

    /// Locomotion tuning.
    pub locomotion: LocomotionConfig,

    /// Camera tuning.
    pub camera: OrbitCameraConfig,

    /// Camera lens.
    pub lens: CameraLens,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate: 50,
            max_steps_per_frame: 8,
            gravity: Vec3::new(0.0, -9.81, 0.0),
            body_shape: BodyShape::default(),
            locomotion: LocomotionConfig::default(),
            camera: OrbitCameraConfig::default(),
            lens: CameraLens::default(),
        }
    }
}

impl SimulationConfig {
    /// Get the time step per tick in seconds.
    pub fn delta_time(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }

    /// Context handed to the locomotion controller each fixed step.
    pub fn step_context(&self) -> StepContext {
        StepContext {
            delta_time: self.delta_time(),
            gravity: self.gravity,
        }
    }
}

/// What one render frame produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutput {
    /// Camera pose to render from.
    pub pose: CameraPose,

    /// Player body tint.
    pub tint: Tint,

    /// Player body position.
    pub position: Vec3,

    /// Fixed steps run this frame.
    pub fixed_steps: u32,
}

/// The main game simulation.
#[derive(Debug)]
pub struct Simulation {
    /// Render frames run so far.
    pub frame: u64,

    /// Fixed steps run so far.
    pub step: u64,

    config: SimulationConfig,
    level: Level,
    clock: FrameClock,

    body: SimBody,
    locomotion: LocomotionController,
    camera: OrbitCameraController,

    last_tint: Tint,
}

impl Simulation {
    /// Create a new simulation with the player at the level's spawn point.
    pub fn new(config: SimulationConfig, level: Level) -> Self {
        let body = SimBody::new(level.spawn_point, config.body_shape);
        let locomotion = LocomotionController::new(config.locomotion.clone());
        let camera = OrbitCameraController::new(config.camera.clone(), level.spawn_point);
        let clock = FrameClock::new(config.delta_time(), config.max_steps_per_frame);

        Self {
            frame: 0,
            step: 0,
            config,
            level,
            clock,
            body,
            locomotion,
            camera,
            last_tint: Tint::Airborne,
        }
    }

    /// Create a simulation with default configuration on a flat floor.
    pub fn test() -> Self {
        Self::new(SimulationConfig::default(), Level::flat())
    }

    /// Advance by one render frame of `real_delta_time` seconds.
    pub fn frame(&mut self, real_delta_time: f32, input: &PlayerInput) -> FrameOutput {
        let tick = self.clock.advance(real_delta_time);

        self.locomotion.on_frame(input.movement, input.jump_pressed);
        for _ in 0..tick.fixed_steps {
            self.fixed_step();
        }

        let pose = self.camera.on_frame(
            self.body.position(),
            input.camera,
            &tick.frame_time(),
            &self.config.lens,
            &self.level.collision,
        );

        let tint = self.locomotion.tint();
        if tint != self.last_tint {
            log::debug!("tint {:?} -> {:?} at step {}", self.last_tint, tint, self.step);
            self.last_tint = tint;
        }

        self.frame += 1;

        FrameOutput {
            pose,
            tint,
            position: self.body.position(),
            fixed_steps: tick.fixed_steps,
        }
    }

    /// Run one fixed step: controller, then the body, then contact callbacks.
    pub fn fixed_step(&mut self) {
        let ctx = self.config.step_context();

        self.locomotion
            .on_fixed_step(&mut self.body, &self.level.collision, &ctx);

        let events = self
            .body
            .step(&self.level.collision, ctx.gravity, ctx.delta_time);
        for event in &events {
            self.locomotion.on_collision(event);
        }

        self.step += 1;
    }

    /// Set the physics time scale. The camera keeps running on real time.
    pub fn set_time_scale(&mut self, time_scale: f32) {
        self.clock.set_time_scale(time_scale);
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn body(&self) -> &SimBody {
        &self.body
    }

    pub fn locomotion(&self) -> &LocomotionController {
        &self.locomotion
    }

    pub fn camera(&self) -> &OrbitCameraController {
        &self.camera
    }
}

// ============================================================================
// Tests
// ============================================================================
