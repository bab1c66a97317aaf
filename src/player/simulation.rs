//! Owns one character's full control stack and drives it tick by tick.

use std::fmt;

use super::context::CharacterContext;
use super::input::InputSnapshot;
use super::interact::InteractableSet;
use super::ports::{AnimationSink, CameraRig, Physics, ResourceDisplay};
use super::states::{StateId, StateIo, StateMachine};
use super::tasks::TaskList;
use crate::config::PlayerConfig;

/// Rejected tuning values caught before the machine is built.
#[derive(Debug)]
pub enum SetupError {
    NonPositiveSpeed(&'static str, f32),
    NonPositiveProbe(&'static str, f32),
    NonPositiveCapacity(f32),
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::NonPositiveSpeed(name, value) => {
                write!(f, "speed `{name}` must be positive, got {value}")
            }
            SetupError::NonPositiveProbe(name, value) => {
                write!(f, "ground probe `{name}` must be positive, got {value}")
            }
            SetupError::NonPositiveCapacity(value) => {
                write!(f, "stormlight capacity must be positive, got {value}")
            }
        }
    }
}

impl std::error::Error for SetupError {}

fn validate(config: &PlayerConfig) -> Result<(), SetupError> {
    for (name, value) in [
        ("walking", config.speeds.walking),
        ("running", config.speeds.running),
        ("sprinting", config.speeds.sprinting),
    ] {
        if value <= 0.0 {
            return Err(SetupError::NonPositiveSpeed(name, value));
        }
    }
    for (name, value) in [
        ("max_distance", config.raycast.max_distance),
        ("radius", config.raycast.radius),
    ] {
        if value <= 0.0 {
            return Err(SetupError::NonPositiveProbe(name, value));
        }
    }
    if config.stormlight.capacity <= 0.0 {
        return Err(SetupError::NonPositiveCapacity(config.stormlight.capacity));
    }
    Ok(())
}

/// One character: context, state machine, live timed tasks, registered
/// interactables and the engine-side collaborators.
pub struct Simulation {
    ctx: CharacterContext,
    machine: StateMachine,
    tasks: TaskList,
    interactables: InteractableSet,
    physics: Box<dyn Physics>,
    animation: Box<dyn AnimationSink>,
    display: Box<dyn ResourceDisplay>,
    camera: CameraRig,
}

impl Simulation {
    pub fn new(
        config: PlayerConfig,
        mut physics: Box<dyn Physics>,
        mut animation: Box<dyn AnimationSink>,
        mut display: Box<dyn ResourceDisplay>,
        camera: CameraRig,
    ) -> Result<Self, SetupError> {
        validate(&config)?;
        let mut ctx = CharacterContext::new(config);
        let mut tasks = TaskList::new();
        let mut interactables = InteractableSet::new();
        let mut input = InputSnapshot::default();

        let machine = {
            let mut io = StateIo {
                physics: physics.as_mut(),
                animation: animation.as_mut(),
                display: display.as_mut(),
                tasks: &mut tasks,
                interactables: &mut interactables,
                camera: &camera,
            };
            StateMachine::new(&mut ctx, &mut input, &mut io)
        };

        display.set_stormlight(ctx.stormlight.current());

        Ok(Self {
            ctx,
            machine,
            tasks,
            interactables,
            physics,
            animation,
            display,
            camera,
        })
    }

    pub fn ctx(&self) -> &CharacterContext {
        &self.ctx
    }

    pub fn ctx_mut(&mut self) -> &mut CharacterContext {
        &mut self.ctx
    }

    pub fn current_state(&self) -> StateId {
        self.machine.leaf()
    }

    pub fn state_path(&self) -> &[StateId] {
        self.machine.path()
    }

    pub fn physics(&self) -> &dyn Physics {
        self.physics.as_ref()
    }

    pub fn physics_mut(&mut self) -> &mut dyn Physics {
        self.physics.as_mut()
    }

    pub fn interactables_mut(&mut self) -> &mut InteractableSet {
        &mut self.interactables
    }

    pub fn set_camera(&mut self, camera: CameraRig) {
        self.camera = camera;
    }

    /// One simulation tick: state updates (with transitions), physics
    /// forces, task resumption, then the world step.
    pub fn tick(&mut self, input: &mut InputSnapshot, dt: f32) {
        self.ctx.dt = dt;

        {
            let mut io = StateIo {
                physics: self.physics.as_mut(),
                animation: self.animation.as_mut(),
                display: self.display.as_mut(),
                tasks: &mut self.tasks,
                interactables: &mut self.interactables,
                camera: &self.camera,
            };
            self.machine.update_states(&mut self.ctx, input, &mut io);
            self.machine.fixed_update_states(&mut self.ctx, input, &mut io);
        }

        self.tasks
            .resume_all(dt, &mut self.ctx, self.physics.as_mut());
        self.physics.step(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::ports::{NoopAnimationSink, NoopResourceDisplay};
    use crate::player::states::test_support::TestPhysics;
    use nalgebra::{Point3, Vector3};

    fn camera() -> CameraRig {
        CameraRig::looking(Point3::new(0.0, 2.0, 5.0), Vector3::new(0.0, 0.0, -1.0))
            .unwrap()
    }

    fn simulation() -> Simulation {
        Simulation::new(
            PlayerConfig::default(),
            Box::new(TestPhysics::grounded()),
            Box::new(NoopAnimationSink),
            Box::new(NoopResourceDisplay),
            camera(),
        )
        .unwrap()
    }

    #[test]
    fn test_new_simulation_starts_idle() {
        let sim = simulation();
        assert_eq!(sim.current_state(), StateId::Idle);
        assert_eq!(sim.ctx().stormlight.current(), 100.0);
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let mut config = PlayerConfig::default();
        config.stormlight.capacity = 0.0;
        let result = Simulation::new(
            config,
            Box::new(TestPhysics::grounded()),
            Box::new(NoopAnimationSink),
            Box::new(NoopResourceDisplay),
            camera(),
        );
        assert!(matches!(result, Err(SetupError::NonPositiveCapacity(_))));
    }

    #[test]
    fn test_tick_runs_breathing_drain() {
        let mut sim = simulation();
        let mut input = InputSnapshot::default();
        input.stormlight_toggle_pressed = true;
        sim.tick(&mut input, 1.0 / 60.0);
        let after_one = sim.ctx().stormlight.current();
        assert!(after_one < 100.0);
        sim.tick(&mut input, 1.0 / 60.0);
        assert!(sim.ctx().stormlight.current() < after_one);
    }

    #[test]
    fn test_lash_press_flows_into_lash_states() {
        let mut sim = simulation();
        let mut input = InputSnapshot::default();
        input.lash_pressed = true;
        sim.tick(&mut input, 1.0 / 60.0);
        assert_eq!(sim.current_state(), StateId::Halflash);

        input.lash_pressed = true;
        sim.tick(&mut input, 1.0 / 60.0);
        assert_eq!(sim.current_state(), StateId::Lash);
    }
}
