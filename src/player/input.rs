//! Pre-debounced input snapshot consumed by the state machine.
//!
//! Edge-triggered flags are not auto-clearing: whichever state acts on an
//! edge acknowledges it through the matching `reset_*` call, so an edge
//! survives until some state consumes it.

use nalgebra::Vector2;

#[derive(Debug, Clone, Default)]
pub struct InputSnapshot {
    /// 2D movement vector, camera-relative (x lateral, y forward)
    pub movement: Vector2<f32>,
    pub sprint_held: bool,
    /// Edge: full lash / half-lash trigger
    pub lash_pressed: bool,
    /// Edge: full un-lash trigger
    pub unlash_pressed: bool,
    /// Number of small-lash steps accumulated since the last acknowledgment
    pub small_lash_count: u8,
    /// Number of small-unlash steps accumulated since the last acknowledgment
    pub small_unlash_count: u8,
    /// Edge: camera-relative gravity redirection
    pub change_direction_pressed: bool,
    /// Edge: full gravity inversion
    pub gravity_flip_pressed: bool,
    /// Edge: toggle breathing stormlight
    pub stormlight_toggle_pressed: bool,
}

impl InputSnapshot {
    /// Scalar movement magnitude used for speed-tier selection, clamped to
    /// `[0, 1]`.
    pub fn move_amount(&self) -> f32 {
        (self.movement.x.abs() + self.movement.y.abs()).clamp(0.0, 1.0)
    }

    pub fn reset_lash(&mut self) {
        self.lash_pressed = false;
    }

    pub fn reset_unlash(&mut self) {
        self.unlash_pressed = false;
    }

    pub fn reset_small_lash(&mut self) {
        self.small_lash_count = 0;
    }

    pub fn reset_small_unlash(&mut self) {
        self.small_unlash_count = 0;
    }

    pub fn reset_change_direction(&mut self) {
        self.change_direction_pressed = false;
    }

    pub fn reset_gravity_flip(&mut self) {
        self.gravity_flip_pressed = false;
    }

    pub fn reset_stormlight_toggle(&mut self) {
        self.stormlight_toggle_pressed = false;
    }
}
