//! Contracts the player core consumes from its collaborators.
//!
//! The engine side (rendering, animation playback, physics broad-phase, UI)
//! stays behind these traits; the core never reaches past them. A rapier3d
//! implementation of [`Physics`] lives in [`crate::physics`].

use nalgebra::{Point3, Unit, UnitQuaternion, Vector3};

/// How a force vector is applied to the player body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForceMode {
    /// Continuous force, mass-dependent
    Force,
    /// Continuous acceleration, mass-independent
    Acceleration,
    /// Instantaneous momentum change
    Impulse,
    /// Direct velocity assignment
    VelocitySet,
}

/// Broad-phase layer a query runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryLayer {
    Ground,
    Interaction,
}

/// Result of a directional sweep test.
#[derive(Debug, Clone, Copy)]
pub struct SweepHit {
    /// Travel distance of the swept shape before contact
    pub distance: f32,
    /// Outward surface normal of the obstacle at the contact
    pub normal: Unit<Vector3<f32>>,
    /// Contact point on the obstacle surface
    pub point: Point3<f32>,
}

/// Physics primitives the core requires: body access on the player rigid
/// body plus sweep/overlap queries against layer masks.
pub trait Physics {
    fn position(&self) -> Point3<f32>;
    fn rotation(&self) -> UnitQuaternion<f32>;
    fn velocity(&self) -> Vector3<f32>;
    fn set_position(&mut self, position: Point3<f32>);
    fn set_rotation(&mut self, rotation: UnitQuaternion<f32>);
    fn set_velocity(&mut self, velocity: Vector3<f32>);
    fn apply_force(&mut self, force: Vector3<f32>, mode: ForceMode);

    /// Sweep a sphere from `origin` along `direction` against one layer.
    fn sweep_cast(
        &self,
        origin: Point3<f32>,
        radius: f32,
        direction: Unit<Vector3<f32>>,
        max_distance: f32,
        layer: QueryLayer,
    ) -> Option<SweepHit>;

    /// Ids of all candidates on `layer` within `radius` of `origin`.
    fn overlap_sphere(&self, origin: Point3<f32>, radius: f32, layer: QueryLayer) -> Vec<u64>;

    /// Advance the physics world by one fixed step.
    fn step(&mut self, dt: f32);
}

/// Fire-and-forget animation playback plus boolean flag/layer control.
pub trait AnimationSink {
    fn play(&mut self, clip: &str, interruptible: bool);
    fn set_flag(&mut self, flag: &str, value: bool);
    fn set_layer_weight(&mut self, layer: usize, weight: f32);
}

/// Displayed resource value sink (stormlight bar).
pub trait ResourceDisplay {
    fn set_stormlight(&mut self, value: f32);
}

/// Animation sink that discards everything; for headless runs and tests.
#[derive(Debug, Default)]
pub struct NoopAnimationSink;

impl AnimationSink for NoopAnimationSink {
    fn play(&mut self, _clip: &str, _interruptible: bool) {}
    fn set_flag(&mut self, _flag: &str, _value: bool) {}
    fn set_layer_weight(&mut self, _layer: usize, _weight: f32) {}
}

/// Resource display that discards everything; for headless runs and tests.
#[derive(Debug, Default)]
pub struct NoopResourceDisplay;

impl ResourceDisplay for NoopResourceDisplay {
    fn set_stormlight(&mut self, _value: f32) {}
}

/// Camera basis snapshot provided by the engine each tick.
#[derive(Debug, Clone, Copy)]
pub struct CameraRig {
    pub position: Point3<f32>,
    pub forward: Unit<Vector3<f32>>,
    pub right: Unit<Vector3<f32>>,
}

impl CameraRig {
    /// Build a rig from a position and view direction, deriving the right
    /// axis against the world up. Returns `None` when `forward` is
    /// degenerate or vertical.
    pub fn looking(position: Point3<f32>, forward: Vector3<f32>) -> Option<Self> {
        let forward = Unit::try_new(forward, super::constants::sim::EPSILON)?;
        let right = Unit::try_new(
            forward.cross(&Vector3::y()),
            super::constants::sim::EPSILON,
        )?;
        Some(Self {
            position,
            forward,
            right,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_rig_looking_derives_right_axis() {
        let rig = CameraRig::looking(Point3::origin(), Vector3::new(0.0, 0.0, -1.0)).unwrap();
        assert!((rig.right.x - 1.0).abs() < 1.0e-6);
        assert!(rig.right.y.abs() < 1.0e-6);
        assert!(rig.right.z.abs() < 1.0e-6);
    }

    #[test]
    fn test_camera_rig_rejects_vertical_forward() {
        assert!(CameraRig::looking(Point3::origin(), Vector3::new(0.0, 1.0, 0.0)).is_none());
        assert!(CameraRig::looking(Point3::origin(), Vector3::zeros()).is_none());
    }
}
