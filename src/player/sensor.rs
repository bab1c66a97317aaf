//! Ground detection along the current gravity direction.

use crate::player::context::CharacterContext;
use crate::player::gravity::GravityState;
use crate::player::ports::{Physics, QueryLayer, SweepHit};
use crate::config::RaycastConfig;

/// Sphere-sweeps from slightly above the character's feet along the
/// gravity direction. Returns the nearest ground hit, if any.
pub fn probe_ground(
    physics: &dyn Physics,
    gravity: &GravityState,
    raycast: &RaycastConfig,
) -> Option<SweepHit> {
    let origin = physics.position() - gravity.vector() * raycast.height_offset;
    physics.sweep_cast(
        origin,
        raycast.radius,
        gravity.direction(),
        raycast.max_distance,
        QueryLayer::Ground,
    )
}

/// Edge a single probe produced relative to the previous tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroundTransition {
    pub landed: bool,
    pub left_ground: bool,
}

/// Folds a probe result into the context: updates the grounded flag and
/// the air timer, and reports which edge (if any) occurred.
pub fn classify(
    ctx: &mut CharacterContext,
    hit: Option<&SweepHit>,
    dt: f32,
    max_air_timer: f32,
) -> GroundTransition {
    let was_grounded = ctx.is_grounded;
    ctx.is_grounded = hit.is_some();
    if ctx.is_grounded {
        ctx.in_air_timer = 0.0;
    } else {
        ctx.in_air_timer = (ctx.in_air_timer + dt).min(max_air_timer);
    }
    GroundTransition {
        landed: ctx.is_grounded && !was_grounded,
        left_ground: !ctx.is_grounded && was_grounded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlayerConfig;

    #[test]
    fn test_classify_landing_edge_resets_air_timer() {
        let mut ctx = CharacterContext::new(PlayerConfig::default());
        ctx.in_air_timer = 3.0;
        let hit = SweepHit {
            distance: 0.4,
            normal: nalgebra::Vector3::y_axis(),
            point: nalgebra::Point3::origin(),
        };
        let edge = classify(&mut ctx, Some(&hit), 1.0 / 60.0, 25.0);
        assert!(edge.landed);
        assert!(!edge.left_ground);
        assert!(ctx.is_grounded);
        assert_eq!(ctx.in_air_timer, 0.0);
    }

    #[test]
    fn test_classify_airborne_accumulates_and_caps() {
        let mut ctx = CharacterContext::new(PlayerConfig::default());
        ctx.is_grounded = true;
        let edge = classify(&mut ctx, None, 0.5, 1.2);
        assert!(edge.left_ground);
        assert_eq!(ctx.in_air_timer, 0.5);
        for _ in 0..10 {
            classify(&mut ctx, None, 0.5, 1.2);
        }
        assert_eq!(ctx.in_air_timer, 1.2);
    }

    #[test]
    fn test_classify_no_edge_when_state_unchanged() {
        let mut ctx = CharacterContext::new(PlayerConfig::default());
        let edge = classify(&mut ctx, None, 1.0 / 60.0, 25.0);
        assert!(!edge.landed);
        assert!(!edge.left_ground);
    }
}
