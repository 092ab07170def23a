//! Contact-driven character locomotion.
//!
//! This module implements a rigid-body character controller with:
//!
//! - Ground / steep / air classification from raw contact normals
//! - Ground snapping across single-step gaps
//! - Slope-projected acceleration toward a desired velocity
//! - Grounded, wall and bonus air jumps
//!
//! # Design
//!
//! The [`LocomotionController`] never integrates position itself. Each fixed
//! step it reads the body's velocity, steers it, optionally jumps, and writes
//! it back; the external solver moves the body and reports contacts through
//! [`LocomotionController::on_collision`] before the next step.

mod config;
mod contacts;
mod controller;
mod jump;

pub use config::{GroundThresholds, LocomotionConfig};
pub use contacts::{ContactClass, ContactState};
pub use controller::{LocomotionController, StepContext, Tint};
pub use jump::JumpState;
