//! windrunner: player-character control core for gravity-lashing locomotion.
//!
//! The crate owns the hierarchical state machine driving player movement,
//! the gravity-reorientation math, the stormlight resource economy and the
//! timed transition tasks. Rendering, animation playback, input polling and
//! UI are consumed through the ports in [`player::ports`]; a rapier3d-backed
//! implementation of the physics port lives in [`physics`] for headless
//! simulation and tests.

pub mod config;
pub mod physics;
pub mod player;
