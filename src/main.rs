//! Headless demo runner: steps one player character through a small
//! world and logs the state path and stormlight as it goes.

use std::path::PathBuf;

use clap::Parser;
use nalgebra::{Point3, Vector2, Vector3};
use tracing_subscriber::EnvFilter;

use windrunner::config::PlayerConfig;
use windrunner::physics::PhysicsWorld;
use windrunner::player::{
    CameraRig, Infusable, InputSnapshot, NoopAnimationSink, NoopResourceDisplay, Simulation,
};

#[derive(Parser)]
#[command(name = "windrunner")]
#[command(about = "Headless lashing-locomotion demo", long_about = None)]
struct Args {
    /// Tuning file; built-in defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of simulation ticks to run
    #[arg(long, default_value_t = 600)]
    ticks: u32,

    /// Simulation rate in ticks per second
    #[arg(long, default_value_t = 60)]
    hz: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => PlayerConfig::from_file(path)?,
        None => PlayerConfig::default(),
    };

    let mut physics = PhysicsWorld::new(Point3::new(0.0, 1.5, 0.0));
    physics.add_ground_part(Point3::new(0.0, -0.5, 0.0), Vector3::new(50.0, 0.5, 50.0));
    physics.add_ground_part(Point3::new(0.0, 30.0, -40.0), Vector3::new(50.0, 0.5, 50.0));
    physics.add_interactable_marker(1, Point3::new(2.0, 1.0, -2.0), 0.4);

    let camera = CameraRig::looking(Point3::new(0.0, 3.0, 6.0), Vector3::new(0.0, 0.0, -1.0))
        .ok_or("degenerate camera direction")?;

    let mut sim = Simulation::new(
        config,
        Box::new(physics),
        Box::new(NoopAnimationSink),
        Box::new(NoopResourceDisplay),
        camera,
    )?;
    sim.interactables_mut()
        .insert(1, Box::new(Infusable::new(10.0, 5.0)));

    let dt = 1.0 / args.hz.max(1) as f32;
    for tick in 0..args.ticks {
        let mut input = script_input(tick);
        sim.tick(&mut input, dt);

        if tick % args.hz.max(1) == 0 {
            let position = sim.physics().position();
            tracing::info!(
                tick,
                state = sim.current_state().name(),
                stormlight = sim.ctx().stormlight.current(),
                x = position.x,
                y = position.y,
                z = position.z,
                "tick"
            );
        }
    }

    Ok(())
}

/// A fixed little choreography: breathe in, run forward, lash upward,
/// steer, and ride the lash until something is hit.
fn script_input(tick: u32) -> InputSnapshot {
    let mut input = InputSnapshot::default();
    match tick {
        0 => input.stormlight_toggle_pressed = true,
        1..=119 => input.movement = Vector2::new(0.0, 1.0),
        120 => input.lash_pressed = true,
        150 => input.lash_pressed = true,
        151.. => input.movement = Vector2::new(0.0, 0.4),
        _ => {}
    }
    input
}
