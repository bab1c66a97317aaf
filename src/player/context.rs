//! Shared mutable blackboard for the state machine.

use nalgebra::Vector3;

use super::gravity::GravityState;
use super::stormlight::Stormlight;
use crate::config::PlayerConfig;

/// One instance per character, living as long as the character does.
/// Mutated by whichever state or timed task is active; safe under the
/// single-threaded per-tick execution model.
#[derive(Debug, Clone)]
pub struct CharacterContext {
    pub gravity: GravityState,
    pub is_grounded: bool,
    /// Seconds spent airborne, capped at the configured ceiling
    pub in_air_timer: f32,
    /// Current lash pull multiplier, clamped to `[0, MAX_INTENSITY]`
    pub lashing_intensity: f32,
    /// Remaining small-lash cooldown, written by the cooldown tasks
    pub lash_cooldown: f32,
    pub stormlight: Stormlight,
    /// Whether the character is actively breathing stormlight
    pub breathing_stormlight: bool,
    /// World-space move direction last produced by a locomotion tier
    pub move_direction: Vector3<f32>,
    /// Speed selected for the current locomotion tier
    pub movement_speed: f32,
    /// Frame delta seconds, written at the top of each tick
    pub dt: f32,
    pub tuning: PlayerConfig,
}

impl CharacterContext {
    pub fn new(tuning: PlayerConfig) -> Self {
        Self {
            gravity: GravityState::default(),
            is_grounded: false,
            in_air_timer: 0.0,
            lashing_intensity: super::constants::lashing::DEFAULT_INTENSITY,
            lash_cooldown: 0.0,
            stormlight: Stormlight::new(tuning.stormlight.capacity),
            breathing_stormlight: false,
            move_direction: Vector3::zeros(),
            movement_speed: 0.0,
            dt: super::constants::sim::TIMESTEP,
            tuning,
        }
    }

    pub fn clamp_lashing_intensity(&mut self) {
        self.lashing_intensity = self
            .lashing_intensity
            .clamp(0.0, super::constants::lashing::MAX_INTENSITY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::constants::lashing;

    #[test]
    fn test_new_context_starts_full_and_airborne() {
        let ctx = CharacterContext::new(PlayerConfig::default());
        assert!(!ctx.is_grounded);
        assert_eq!(ctx.stormlight.current(), 100.0);
        assert_eq!(ctx.lashing_intensity, lashing::DEFAULT_INTENSITY);
    }

    #[test]
    fn test_clamp_lashing_intensity_bounds() {
        let mut ctx = CharacterContext::new(PlayerConfig::default());
        ctx.lashing_intensity = -4.0;
        ctx.clamp_lashing_intensity();
        assert_eq!(ctx.lashing_intensity, 0.0);
        ctx.lashing_intensity = 10_000.0;
        ctx.clamp_lashing_intensity();
        assert_eq!(ctx.lashing_intensity, lashing::MAX_INTENSITY);
    }
}
