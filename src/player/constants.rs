//! Gameplay constants shared across the player core.
//! Centralizing these prevents bugs from duplicated hardcoded values.

/// Lashing ability constants
pub mod lashing {
    /// Baseline lashing intensity restored whenever the lashing tree is entered
    pub const DEFAULT_INTENSITY: f32 = 5.0;

    /// Multiplicative factor applied to intensity on a full lash edge
    pub const INTENSITY_INCREMENT: f32 = 5.0;

    /// Additive step applied per small-lash/small-unlash count
    pub const INTENSITY_SMALL_INCREMENT: f32 = 1.0;

    /// Upper clamp for lashing intensity
    pub const MAX_INTENSITY: f32 = 200.0;

    /// Cooldown started by each small-lash adjustment
    pub const SMALL_LASH_COOLDOWN_SECS: f32 = 0.1;

    /// Duration of the half-lash pose alignment (up axis rotated to forward)
    pub const HALFLASH_ALIGN_SECS: f32 = 0.5;

    /// Duration of the landing alignment after a lash touches ground
    pub const LANDING_ALIGN_SECS: f32 = 0.25;

    /// Distance above the contact point the landing alignment settles through
    pub const LANDING_SETTLE_OFFSET: f32 = 0.5;
}

/// Animation clip names and layer indices consumed by the animation sink
pub mod anim {
    pub const CLIP_BUFF: &str = "Buff";
    pub const CLIP_HALF_LASHING: &str = "Half Lashing";
    pub const CLIP_FALL: &str = "Fall";
    pub const CLIP_LAND: &str = "Land";
    pub const CLIP_GRAVITY_SWITCH: &str = "GravitySwitch";

    pub const FLAG_HALF_LASHING: &str = "IsHalfLashing";
    pub const FLAG_LASHING: &str = "IsLashing";

    /// Blended layer carrying the stormlight buff overlay
    pub const BUFF_LAYER: usize = 4;
}

/// Simulation-wide numeric constants
pub mod sim {
    /// Fixed timestep for the reference 60 Hz tick
    pub const TIMESTEP: f32 = 1.0 / 60.0;

    /// Small epsilon for float comparisons and degenerate-magnitude guards
    pub const EPSILON: f32 = 1.0e-4;
}
