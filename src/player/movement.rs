//! Movement integration: camera-relative move vectors, gravity-plane
//! orthogonalization and the three-tier speed lookup.

use nalgebra::{Unit, UnitQuaternion, Vector2, Vector3};

use super::constants::sim::EPSILON;
use super::gravity::GravityState;
use super::ports::CameraRig;
use crate::config::SpeedsConfig;

/// Remove the gravity-axis component of `v`:
/// `v - (v·g / |g|²) · g`. Degenerate gravity magnitudes leave `v`
/// untouched rather than dividing toward infinity.
pub fn orthogonalize_against(v: Vector3<f32>, gravity: Vector3<f32>) -> Vector3<f32> {
    let mag_sq = gravity.norm_squared();
    if mag_sq <= EPSILON {
        return v;
    }
    v - gravity * (v.dot(&gravity) / mag_sq)
}

/// World-space move direction from the camera basis and a 2D input vector,
/// flattened against the current gravity plane. Zero input (or input
/// pointing purely along gravity) yields the zero vector.
pub fn build_move_vector(
    camera: &CameraRig,
    movement: Vector2<f32>,
    gravity: &GravityState,
) -> Vector3<f32> {
    let raw = camera.forward.into_inner() * movement.y + camera.right.into_inner() * movement.x;
    let flat = orthogonalize_against(raw, gravity.vector());
    if flat.norm_squared() <= EPSILON {
        Vector3::zeros()
    } else {
        flat.normalize()
    }
}

/// Three-tier speed lookup: sprint held wins outright, then the input
/// magnitude splits run from walk at 0.5.
pub fn select_speed_tier(sprint_held: bool, move_amount: f32, speeds: &SpeedsConfig) -> f32 {
    if sprint_held {
        speeds.sprinting
    } else if move_amount >= 0.5 {
        speeds.running
    } else {
        speeds.walking
    }
}

/// Local up axis of the character body.
pub fn character_up(rotation: &UnitQuaternion<f32>) -> Unit<Vector3<f32>> {
    Unit::new_normalize(rotation * Vector3::y())
}

/// Local forward axis (-Z) in the shared physics/render convention.
pub fn character_forward(rotation: &UnitQuaternion<f32>) -> Unit<Vector3<f32>> {
    Unit::new_normalize(rotation * -Vector3::z())
}

/// Local right axis of the character body.
pub fn character_right(rotation: &UnitQuaternion<f32>) -> Unit<Vector3<f32>> {
    Unit::new_normalize(rotation * Vector3::x())
}
