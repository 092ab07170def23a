//! Player input handling.
//!
//! Per-frame input the controllers consume, and scripted input for
//! headless runs.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Player input for a single render frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerInput {
    /// Movement axis: x = right, y = forward. Clamped to unit length by the
    /// locomotion controller.
    pub movement: Vec2,

    /// Camera axis: x = vertical (pitch), y = horizontal (yaw).
    pub camera: Vec2,

    /// Jump pressed this frame (edge, not held).
    pub jump_pressed: bool,
}

impl PlayerInput {
    /// Input with only a movement axis.
    pub fn moving(movement: Vec2) -> Self {
        Self {
            movement,
            ..Default::default()
        }
    }

    /// Input with only a jump press.
    pub fn jump() -> Self {
        Self {
            jump_pressed: true,
            ..Default::default()
        }
    }
}

/// Anything that can produce one [`PlayerInput`] per render frame.
pub trait InputSource {
    fn next_input(&mut self) -> PlayerInput;
}

/// One segment of a scripted input sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Number of frames the input is held.
    pub frames: u32,

    /// The held input. A jump press only fires on the first frame.
    pub input: PlayerInput,
}

/// Replays a fixed sequence of inputs, then idles.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScriptedInput {
    steps: Vec<ScriptStep>,
    index: usize,
    frame_in_step: u32,
}

impl ScriptedInput {
    pub fn new(steps: Vec<ScriptStep>) -> Self {
        Self {
            steps,
            index: 0,
            frame_in_step: 0,
        }
    }

    /// Append a segment holding `input` for `frames` frames.
    pub fn hold(mut self, frames: u32, input: PlayerInput) -> Self {
        self.steps.push(ScriptStep { frames, input });
        self
    }

    /// Total scripted frames.
    pub fn total_frames(&self) -> u32 {
        self.steps.iter().map(|s| s.frames).sum()
    }

    /// Whether every segment has been replayed.
    pub fn is_finished(&self) -> bool {
        self.index >= self.steps.len()
    }
}

impl InputSource for ScriptedInput {
    fn next_input(&mut self) -> PlayerInput {
        while let Some(step) = self.steps.get(self.index) {
            if self.frame_in_step >= step.frames {
                self.index += 1;
                self.frame_in_step = 0;
                continue;
            }

            let mut input = step.input;
            if self.frame_in_step > 0 {
                input.jump_pressed = false;
            }
            self.frame_in_step += 1;
            return input;
        }
        PlayerInput::default()
    }
}
