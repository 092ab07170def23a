//! Skycastle - Main Entry Point
//!
//! Runs the test course headless with scripted input and logs what the
//! locomotion controller and camera do. Set `RUST_LOG=debug` to see every
//! state transition.

use glam::Vec2;
use skycastle_game::{InputSource, Level, PlayerInput, ScriptedInput, Simulation, SimulationConfig};
use skycastle_physics::{LocomotionConfig, Tint};

/// Render rate of the headless run.
const FRAME_RATE: f32 = 60.0;

fn course_script() -> ScriptedInput {
    let second = FRAME_RATE as u32;

    ScriptedInput::default()
        // Drop onto the floor
        .hold(second, PlayerInput::default())
        // Walk under the overhang and up the stairs ramp
        .hold(3 * second, PlayerInput::moving(Vec2::NEG_Y))
        .hold(second, PlayerInput::default())
        // Back to the middle, then onto the gentle ramp
        .hold(3 * second, PlayerInput::moving(Vec2::Y))
        .hold(2 * second, PlayerInput::moving(Vec2::X))
        // Jump, with a bonus jump at the apex
        .hold(second / 2, PlayerInput::jump())
        .hold(second / 2, PlayerInput::jump())
        // Run at the steep slope and try to climb it
        .hold(4 * second, PlayerInput::moving(Vec2::NEG_X))
        .hold(1, PlayerInput::jump())
        // Orbit the camera by hand, then let it realign while running
        .hold(
            second,
            PlayerInput {
                camera: Vec2::new(0.2, 1.0),
                ..Default::default()
            },
        )
        .hold(8 * second, PlayerInput::moving(Vec2::new(0.5, 1.0)))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = SimulationConfig {
        locomotion: LocomotionConfig::platformer(),
        ..Default::default()
    };
    let level = Level::test_course()?;
    log::info!("running {} with {:?}", level.id, config.locomotion);

    let mut simulation = Simulation::new(config, level);
    let mut script = course_script();
    let delta_time = 1.0 / FRAME_RATE;

    let mut tint = Tint::Airborne;
    while !script.is_finished() {
        let input = script.next_input();
        let output = simulation.frame(delta_time, &input);

        if output.tint != tint {
            tint = output.tint;
            log::info!(
                "frame {}: {:?} at {:.2?}",
                simulation.frame,
                tint,
                output.position
            );
        }
    }

    let camera = simulation.camera();
    log::info!(
        "finished after {} frames / {} steps at {:.2?}, camera angles {:.1?}",
        simulation.frame,
        simulation.step,
        simulation.body().state.position,
        camera.orbit_angles()
    );

    Ok(())
}
