//! Skycastle Camera
//!
//! Third-person orbit camera for a moving target. Runs once per render frame
//! on unscaled time, independently of the fixed physics step, and uses the
//! same [`PhysicsQuery`] contract as the locomotion controller to keep level
//! geometry out of the line of sight.
//!
//! [`PhysicsQuery`]: skycastle_physics::PhysicsQuery

pub mod config;
pub mod lens;
pub mod orbit;

pub use config::OrbitCameraConfig;
pub use lens::CameraLens;
pub use orbit::{orbit_rotation, CameraPose, FrameTime, OrbitCameraController};
