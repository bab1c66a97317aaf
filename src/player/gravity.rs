//! Gravity direction model.
//!
//! Gravity is a first-class mutable unit vector owned by the character
//! context. Every mutation renormalizes; intensity scalars are multiplied in
//! at force-application time, never baked into the direction.

use nalgebra::{Point3, Unit, UnitQuaternion, Vector3};

use super::constants::sim::EPSILON;

#[derive(Debug, Clone, Copy)]
pub struct GravityState {
    dir: Unit<Vector3<f32>>,
}

impl Default for GravityState {
    fn default() -> Self {
        Self {
            dir: -Vector3::y_axis(),
        }
    }
}

impl GravityState {
    /// Build from an arbitrary vector; `None` when it is degenerate.
    pub fn new(direction: Vector3<f32>) -> Option<Self> {
        Unit::try_new(direction, EPSILON).map(|dir| Self { dir })
    }

    pub fn direction(&self) -> Unit<Vector3<f32>> {
        self.dir
    }

    pub fn vector(&self) -> Vector3<f32> {
        self.dir.into_inner()
    }

    /// Negate the pull direction.
    pub fn flip(&mut self) {
        self.dir = -self.dir;
    }

    /// Point gravity into the surface just touched.
    pub fn snap_to_surface(&mut self, contact_normal: Unit<Vector3<f32>>) {
        self.dir = -contact_normal;
    }

    /// Replace the direction outright (already unit-length).
    pub fn align_to(&mut self, direction: Unit<Vector3<f32>>) {
        self.dir = direction;
    }

    /// Point gravity from `from` toward `to` (camera-relative snap).
    /// Degenerate separations leave the direction unchanged.
    pub fn snap_between(&mut self, from: Point3<f32>, to: Point3<f32>) {
        if let Some(dir) = Unit::try_new(to - from, EPSILON) {
            self.dir = dir;
        }
    }

    /// Incremental in-air steering: compose a small rotation from Euler
    /// deltas in degrees and reapply it to the direction. Renormalized to
    /// guard against drift across long steering sequences.
    pub fn rotate_by(&mut self, euler_degrees: Vector3<f32>) {
        let rotation = UnitQuaternion::from_euler_angles(
            euler_degrees.x.to_radians(),
            euler_degrees.y.to_radians(),
            euler_degrees.z.to_radians(),
        );
        self.dir = Unit::new_normalize(rotation * self.dir.into_inner());
    }
}

/// Shortest rotation carrying `from` onto `to`, with an explicit fallback
/// for the antiparallel case where no unique shortest arc exists.
pub fn rotation_to(from: Unit<Vector3<f32>>, to: Unit<Vector3<f32>>) -> UnitQuaternion<f32> {
    UnitQuaternion::rotation_between(&from, &to).unwrap_or_else(|| {
        UnitQuaternion::from_axis_angle(&orthogonal_axis(from), std::f32::consts::PI)
    })
}

fn orthogonal_axis(v: Unit<Vector3<f32>>) -> Unit<Vector3<f32>> {
    let candidate = if v.x.abs() < 0.9 {
        v.cross(&Vector3::x())
    } else {
        v.cross(&Vector3::y())
    };
    Unit::new_normalize(candidate)
}
