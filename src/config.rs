//! Player tuning configuration parsed from player.toml files

use serde::Deserialize;
use std::path::Path;

/// Locomotion speed tiers and turn rate
#[derive(Debug, Clone, Deserialize)]
pub struct SpeedsConfig {
    #[serde(default = "default_walking_speed")]
    pub walking: f32,
    #[serde(default = "default_running_speed")]
    pub running: f32,
    #[serde(default = "default_sprinting_speed")]
    pub sprinting: f32,
    /// Slerp rate used when facing the move direction
    #[serde(default = "default_rotation_speed")]
    pub rotation: f32,
}

/// Falling forces and the air-timer ceiling
#[derive(Debug, Clone, Deserialize)]
pub struct FallingConfig {
    /// Forward push applied while airborne
    #[serde(default = "default_leaping_velocity")]
    pub leaping_velocity: f32,
    /// Base magnitude of the accelerating fall force (scaled by the air timer)
    #[serde(default = "default_falling_velocity")]
    pub falling_velocity: f32,
    /// Ceiling for the in-air timer accumulation
    #[serde(default = "default_max_air_timer")]
    pub max_air_timer: f32,
}

/// Gravity intensity scalars (direction lives on the character context)
#[derive(Debug, Clone, Deserialize)]
pub struct GravityConfig {
    #[serde(default = "default_gravity_intensity")]
    pub intensity: f32,
    #[serde(default = "default_gravity_multiplier")]
    pub multiplier: f32,
    /// Small stick force keeping the character pressed onto its surface
    #[serde(default = "default_grounded_stick")]
    pub grounded_stick: f32,
}

/// Ground sensor sweep geometry
#[derive(Debug, Clone, Deserialize)]
pub struct RaycastConfig {
    /// Offset of the sweep origin against the gravity direction
    #[serde(default = "default_raycast_height_offset")]
    pub height_offset: f32,
    #[serde(default = "default_raycast_max_distance")]
    pub max_distance: f32,
    #[serde(default = "default_raycast_radius")]
    pub radius: f32,
}

/// Lash ability tuning
#[derive(Debug, Clone, Deserialize)]
pub struct LashingConfig {
    /// Impulse magnitude of the half-lash launch, applied against gravity
    #[serde(default = "default_half_lash_height")]
    pub half_lash_height: f32,
    /// Degrees per second of in-air gravity steering
    #[serde(default = "default_steer_rate")]
    pub steer_rate: f32,
    /// Degrees per second of roll applied from lateral input
    #[serde(default = "default_roll_speed")]
    pub roll_speed: f32,
    /// Lerp factor smoothing the roll toward its target
    #[serde(default = "default_roll_lerp")]
    pub roll_lerp: f32,
}

/// Stormlight capacity and per-second drain contributions
#[derive(Debug, Clone, Deserialize)]
pub struct StormlightConfig {
    #[serde(default = "default_stormlight_capacity")]
    pub capacity: f32,
    #[serde(default = "default_base_drain")]
    pub base_drain: f32,
    /// Drain at the baseline lashing intensity; scales with intensity
    #[serde(default = "default_lashing_drain")]
    pub lashing_drain: f32,
    /// Drain contributed while sprinting with stormlight held
    #[serde(default = "default_movement_drain")]
    pub movement_drain: f32,
}

/// Interaction proximity query tuning
#[derive(Debug, Clone, Deserialize)]
pub struct InteractionConfig {
    #[serde(default = "default_interaction_radius")]
    pub radius: f32,
}

/// Player tuning from player.toml
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PlayerConfig {
    #[serde(default)]
    pub speeds: SpeedsConfig,
    #[serde(default)]
    pub falling: FallingConfig,
    #[serde(default)]
    pub gravity: GravityConfig,
    #[serde(default)]
    pub raycast: RaycastConfig,
    #[serde(default)]
    pub lashing: LashingConfig,
    #[serde(default)]
    pub stormlight: StormlightConfig,
    #[serde(default)]
    pub interaction: InteractionConfig,
}

fn default_walking_speed() -> f32 {
    1.5
}

fn default_running_speed() -> f32 {
    6.0
}

fn default_sprinting_speed() -> f32 {
    8.0
}

fn default_rotation_speed() -> f32 {
    15.0
}

fn default_leaping_velocity() -> f32 {
    2.0
}

fn default_falling_velocity() -> f32 {
    33.0
}

fn default_max_air_timer() -> f32 {
    25.0
}

fn default_gravity_intensity() -> f32 {
    9.8
}

fn default_gravity_multiplier() -> f32 {
    2.0
}

fn default_grounded_stick() -> f32 {
    0.5
}

fn default_raycast_height_offset() -> f32 {
    0.5
}

// probe origin sits height_offset above the capsule center, so the
// reach has to cover the offset plus the full capsule half height
fn default_raycast_max_distance() -> f32 {
    2.0
}

fn default_raycast_radius() -> f32 {
    0.2
}

fn default_half_lash_height() -> f32 {
    1.0
}

fn default_steer_rate() -> f32 {
    30.0
}

fn default_roll_speed() -> f32 {
    10.0
}

fn default_roll_lerp() -> f32 {
    0.5
}

fn default_stormlight_capacity() -> f32 {
    100.0
}

fn default_base_drain() -> f32 {
    1.0
}

fn default_lashing_drain() -> f32 {
    2.0
}

fn default_movement_drain() -> f32 {
    0.5
}

fn default_interaction_radius() -> f32 {
    3.0
}

impl Default for SpeedsConfig {
    fn default() -> Self {
        Self {
            walking: default_walking_speed(),
            running: default_running_speed(),
            sprinting: default_sprinting_speed(),
            rotation: default_rotation_speed(),
        }
    }
}

impl Default for FallingConfig {
    fn default() -> Self {
        Self {
            leaping_velocity: default_leaping_velocity(),
            falling_velocity: default_falling_velocity(),
            max_air_timer: default_max_air_timer(),
        }
    }
}

impl Default for GravityConfig {
    fn default() -> Self {
        Self {
            intensity: default_gravity_intensity(),
            multiplier: default_gravity_multiplier(),
            grounded_stick: default_grounded_stick(),
        }
    }
}

impl Default for RaycastConfig {
    fn default() -> Self {
        Self {
            height_offset: default_raycast_height_offset(),
            max_distance: default_raycast_max_distance(),
            radius: default_raycast_radius(),
        }
    }
}

impl Default for LashingConfig {
    fn default() -> Self {
        Self {
            half_lash_height: default_half_lash_height(),
            steer_rate: default_steer_rate(),
            roll_speed: default_roll_speed(),
            roll_lerp: default_roll_lerp(),
        }
    }
}

impl Default for StormlightConfig {
    fn default() -> Self {
        Self {
            capacity: default_stormlight_capacity(),
            base_drain: default_base_drain(),
            lashing_drain: default_lashing_drain(),
            movement_drain: default_movement_drain(),
        }
    }
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            radius: default_interaction_radius(),
        }
    }
}

impl PlayerConfig {
    /// Load player tuning from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
    }
}

/// Errors that can occur when loading player tuning
#[derive(Debug)]
pub enum ConfigError {
    Io(std::path::PathBuf, std::io::Error),
    Parse(std::path::PathBuf, toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => {
                write!(f, "Failed to read {}: {}", path.display(), e)
            }
            ConfigError::Parse(path, e) => {
                write!(f, "Failed to parse {}: {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config: PlayerConfig = toml::from_str("").unwrap();
        assert_eq!(config.speeds.walking, 1.5);
        assert_eq!(config.speeds.sprinting, 8.0);
        assert_eq!(config.stormlight.capacity, 100.0);
        assert_eq!(config.raycast.radius, 0.2);
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
            [speeds]
            sprinting = 10.0

            [stormlight]
            capacity = 150.0
            base_drain = 0.5
        "#;
        let config: PlayerConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.speeds.sprinting, 10.0);
        assert_eq!(config.speeds.walking, 1.5);
        assert_eq!(config.stormlight.capacity, 150.0);
        assert_eq!(config.stormlight.base_drain, 0.5);
        assert_eq!(config.gravity.intensity, 9.8);
    }

    #[test]
    fn test_parse_gravity_section() {
        let toml = r#"
            [gravity]
            intensity = 15.0
            multiplier = 1.0
        "#;
        let config: PlayerConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.gravity.intensity, 15.0);
        assert_eq!(config.gravity.multiplier, 1.0);
        assert_eq!(config.gravity.grounded_stick, 0.5);
    }
}
