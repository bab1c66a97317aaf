//! End-to-end grounded locomotion over the real rapier backend: tier
//! selection, displacement per tier, and the breathing drain.

use nalgebra::{Point3, Vector2, Vector3};

use windrunner::config::PlayerConfig;
use windrunner::physics::PhysicsWorld;
use windrunner::player::{
    CameraRig, InputSnapshot, NoopAnimationSink, NoopResourceDisplay, Simulation,
    StateId,
};

const DT: f32 = 1.0 / 60.0;

fn build_sim() -> Simulation {
    let mut physics = PhysicsWorld::new(Point3::new(0.0, 0.95, 0.0));
    physics.add_ground_part(Point3::new(0.0, -0.5, 0.0), Vector3::new(50.0, 0.5, 50.0));
    let camera = CameraRig::looking(Point3::new(0.0, 2.0, 6.0), Vector3::new(0.0, 0.0, -1.0))
        .expect("camera forward is horizontal");
    Simulation::new(
        PlayerConfig::default(),
        Box::new(physics),
        Box::new(NoopAnimationSink),
        Box::new(NoopResourceDisplay),
        camera,
    )
    .expect("default tuning is valid")
}

fn run(sim: &mut Simulation, ticks: u32, make_input: impl Fn(u32) -> InputSnapshot) {
    for tick in 0..ticks {
        let mut input = make_input(tick);
        sim.tick(&mut input, DT);
    }
}

#[test]
fn test_idle_character_stays_put() {
    let mut sim = build_sim();
    run(&mut sim, 120, |_| InputSnapshot::default());

    assert_eq!(sim.current_state(), StateId::Idle);
    let position = sim.physics().position();
    assert!(position.x.abs() < 0.1);
    assert!(position.z.abs() < 0.1);
}

#[test]
fn test_full_input_runs_forward() {
    let mut sim = build_sim();
    run(&mut sim, 120, |_| {
        let mut input = InputSnapshot::default();
        input.movement = Vector2::new(0.0, 1.0);
        input
    });

    assert_eq!(sim.current_state(), StateId::Run);
    // camera looks along -z, so full forward input moves that way
    let position = sim.physics().position();
    assert!(position.z < -4.0, "ran to z = {}", position.z);
}

#[test]
fn test_small_input_selects_walk_tier() {
    let mut sim = build_sim();
    run(&mut sim, 60, |_| {
        let mut input = InputSnapshot::default();
        input.movement = Vector2::new(0.0, 0.3);
        input
    });

    assert_eq!(sim.current_state(), StateId::Walk);
    assert_eq!(sim.ctx().movement_speed, 1.5);
}

#[test]
fn test_sprint_outruns_run() {
    let mut run_sim = build_sim();
    run(&mut run_sim, 120, |_| {
        let mut input = InputSnapshot::default();
        input.movement = Vector2::new(0.0, 1.0);
        input
    });

    let mut sprint_sim = build_sim();
    run(&mut sprint_sim, 120, |_| {
        let mut input = InputSnapshot::default();
        input.movement = Vector2::new(0.0, 1.0);
        input.sprint_held = true;
        input
    });

    assert_eq!(sprint_sim.current_state(), StateId::Sprint);
    let run_dist = run_sim.physics().position().z.abs();
    let sprint_dist = sprint_sim.physics().position().z.abs();
    assert!(
        sprint_dist > run_dist,
        "sprint {sprint_dist} should beat run {run_dist}"
    );
}

#[test]
fn test_breathing_stormlight_drains_over_time() {
    let mut sim = build_sim();
    run(&mut sim, 61, |tick| {
        let mut input = InputSnapshot::default();
        input.stormlight_toggle_pressed = tick == 0;
        input
    });

    let current = sim.ctx().stormlight.current();
    // one second of the base drain, give or take a tick
    assert!(current < 99.5, "stormlight = {current}");
    assert!(current > 97.0, "stormlight = {current}");
}

#[test]
fn test_release_of_stored_input_returns_to_idle() {
    let mut sim = build_sim();
    run(&mut sim, 60, |_| {
        let mut input = InputSnapshot::default();
        input.movement = Vector2::new(0.0, 1.0);
        input
    });
    assert_eq!(sim.current_state(), StateId::Run);

    run(&mut sim, 10, |_| InputSnapshot::default());
    assert_eq!(sim.current_state(), StateId::Idle);
    assert!(sim.physics().velocity().norm() < 1.0);
}
