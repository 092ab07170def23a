//! Skycastle Game Logic
//!
//! Drives the locomotion controller and orbit camera headless:
//!
//! - Player input and scripted input sources
//! - A frame clock splitting render frames into fixed steps
//! - A simulated sphere body standing in for the physics engine
//! - Level construction
//!
//! # Architecture
//!
//! ```text
//! render frame ──► FrameClock ──► n × fixed step ──► camera
//!                                  │
//!                                  ├─ LocomotionController::on_fixed_step
//!                                  ├─ SimBody::step (integrate, resolve)
//!                                  └─ LocomotionController::on_collision
//! ```

pub mod body;
pub mod clock;
pub mod input;
pub mod level;
pub mod simulation;

// Re-export main types
pub use body::SimBody;
pub use clock::{FrameClock, FrameTick};
pub use input::{InputSource, PlayerInput, ScriptStep, ScriptedInput};
pub use level::Level;
pub use simulation::{FrameOutput, Simulation, SimulationConfig};
