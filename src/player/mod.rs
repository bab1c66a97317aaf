//! Player-character control core: hierarchical state machine, gravity
//! reorientation, stormlight economy, interaction resolution and timed
//! transition tasks.

pub mod constants;
pub mod context;
pub mod gravity;
pub mod input;
pub mod interact;
pub mod movement;
pub mod ports;
pub mod sensor;
pub mod simulation;
pub mod states;
pub mod stormlight;
pub mod tasks;

pub use context::CharacterContext;
pub use gravity::GravityState;
pub use input::InputSnapshot;
pub use interact::{Infusable, Interactable, InteractableSet};
pub use ports::{
    AnimationSink, CameraRig, ForceMode, NoopAnimationSink, NoopResourceDisplay, Physics,
    QueryLayer, ResourceDisplay, SweepHit,
};
pub use simulation::{SetupError, Simulation};
pub use states::{StateId, StateMachine};
pub use stormlight::Stormlight;
