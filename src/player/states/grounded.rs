//! Grounded locomotion: the grounded substate and its idle/walk/run/
//! sprint tiers.

use super::{PlayerState, StateId, StateIo};
use crate::player::constants::{anim, sim};
use crate::player::context::CharacterContext;
use crate::player::input::InputSnapshot;
use crate::player::movement::{build_move_vector, character_forward, select_speed_tier};
use crate::player::ports::{ForceMode, Physics};
use crate::player::sensor;
use nalgebra::UnitQuaternion;

/// Rebuilds the context's move vector and speed tier from this tick's
/// input and camera basis.
fn plan_locomotion(ctx: &mut CharacterContext, input: &InputSnapshot, io: &StateIo) {
    ctx.move_direction = build_move_vector(io.camera, input.movement, &ctx.gravity);
    ctx.movement_speed =
        select_speed_tier(input.sprint_held, input.move_amount(), &ctx.tuning.speeds);
}

/// Grounded tiers move kinematically: the planned vector is written
/// straight into the body's velocity, and the body turns toward it.
fn apply_locomotion(ctx: &CharacterContext, physics: &mut dyn Physics, dt: f32) {
    physics.apply_force(ctx.move_direction * ctx.movement_speed, ForceMode::VelocitySet);
    face_move_direction(ctx, physics, dt);
}

fn face_move_direction(ctx: &CharacterContext, physics: &mut dyn Physics, dt: f32) {
    if ctx.move_direction.norm_squared() <= sim::EPSILON {
        return;
    }
    let up = -ctx.gravity.vector();
    // forward is the local -z axis, so face away from the move vector
    let target = UnitQuaternion::face_towards(&-ctx.move_direction, &up);
    let current = physics.rotation();
    let t = (ctx.tuning.speeds.rotation * dt).min(1.0);
    let rotation = current
        .try_slerp(&target, t, sim::EPSILON)
        .unwrap_or(target);
    physics.set_rotation(rotation);
}

/// Parent of the locomotion tiers. Owns ground sensing, the fall/land
/// animation edges, and the airborne forces.
#[derive(Default)]
pub struct GroundedState;

impl PlayerState for GroundedState {
    fn id(&self) -> StateId {
        StateId::Grounded
    }

    fn default_child(&self) -> Option<StateId> {
        Some(StateId::Idle)
    }

    fn update(
        &mut self,
        ctx: &mut CharacterContext,
        _input: &mut InputSnapshot,
        io: &mut StateIo,
    ) {
        let hit = sensor::probe_ground(io.physics, &ctx.gravity, &ctx.tuning.raycast);
        let edge = sensor::classify(ctx, hit.as_ref(), ctx.dt, ctx.tuning.falling.max_air_timer);
        if edge.landed {
            io.animation.play(anim::CLIP_LAND, false);
        } else if edge.left_ground {
            io.animation.play(anim::CLIP_FALL, true);
        }
    }

    fn fixed_update(
        &mut self,
        ctx: &mut CharacterContext,
        _input: &InputSnapshot,
        io: &mut StateIo,
    ) {
        if ctx.is_grounded {
            // small downhill bias keeps the body pressed onto slopes
            io.physics.apply_force(
                ctx.gravity.vector() * ctx.tuning.gravity.grounded_stick,
                ForceMode::Acceleration,
            );
        } else {
            let forward = character_forward(&io.physics.rotation());
            io.physics.apply_force(
                forward.into_inner() * ctx.tuning.falling.leaping_velocity,
                ForceMode::Force,
            );
            io.physics.apply_force(
                ctx.gravity.vector() * (ctx.tuning.falling.falling_velocity * ctx.in_air_timer),
                ForceMode::Force,
            );
        }
    }

    fn check_switch(&self, ctx: &CharacterContext, input: &InputSnapshot) -> Option<StateId> {
        if (input.lash_pressed || input.small_lash_count > 0) && !ctx.stormlight.is_empty() {
            return Some(StateId::Lashing);
        }
        None
    }
}

#[derive(Default)]
pub struct IdleState;

impl PlayerState for IdleState {
    fn id(&self) -> StateId {
        StateId::Idle
    }

    fn update(
        &mut self,
        ctx: &mut CharacterContext,
        input: &mut InputSnapshot,
        io: &mut StateIo,
    ) {
        plan_locomotion(ctx, input, io);
    }

    fn fixed_update(
        &mut self,
        ctx: &mut CharacterContext,
        _input: &InputSnapshot,
        io: &mut StateIo,
    ) {
        apply_locomotion(ctx, io.physics, ctx.dt);
    }

    fn check_switch(&self, _ctx: &CharacterContext, input: &InputSnapshot) -> Option<StateId> {
        let amount = input.move_amount();
        if amount <= sim::EPSILON {
            return None;
        }
        if input.sprint_held {
            Some(StateId::Sprint)
        } else if amount >= 0.5 {
            Some(StateId::Run)
        } else {
            Some(StateId::Walk)
        }
    }
}

#[derive(Default)]
pub struct WalkState;

impl PlayerState for WalkState {
    fn id(&self) -> StateId {
        StateId::Walk
    }

    fn update(
        &mut self,
        ctx: &mut CharacterContext,
        input: &mut InputSnapshot,
        io: &mut StateIo,
    ) {
        plan_locomotion(ctx, input, io);
    }

    fn fixed_update(
        &mut self,
        ctx: &mut CharacterContext,
        _input: &InputSnapshot,
        io: &mut StateIo,
    ) {
        apply_locomotion(ctx, io.physics, ctx.dt);
    }

    fn check_switch(&self, _ctx: &CharacterContext, input: &InputSnapshot) -> Option<StateId> {
        let amount = input.move_amount();
        if amount <= sim::EPSILON {
            Some(StateId::Idle)
        } else if input.sprint_held {
            Some(StateId::Sprint)
        } else if amount >= 0.5 {
            Some(StateId::Run)
        } else {
            None
        }
    }
}

#[derive(Default)]
pub struct RunState;

impl PlayerState for RunState {
    fn id(&self) -> StateId {
        StateId::Run
    }

    fn update(
        &mut self,
        ctx: &mut CharacterContext,
        input: &mut InputSnapshot,
        io: &mut StateIo,
    ) {
        plan_locomotion(ctx, input, io);
    }

    fn fixed_update(
        &mut self,
        ctx: &mut CharacterContext,
        _input: &InputSnapshot,
        io: &mut StateIo,
    ) {
        apply_locomotion(ctx, io.physics, ctx.dt);
    }

    fn check_switch(&self, _ctx: &CharacterContext, input: &InputSnapshot) -> Option<StateId> {
        let amount = input.move_amount();
        if amount <= sim::EPSILON {
            Some(StateId::Idle)
        } else if input.sprint_held {
            Some(StateId::Sprint)
        } else if amount < 0.5 {
            Some(StateId::Walk)
        } else {
            None
        }
    }
}

/// Sprint adds a movement drain while the character is breathing
/// stormlight.
#[derive(Default)]
pub struct SprintState;

impl PlayerState for SprintState {
    fn id(&self) -> StateId {
        StateId::Sprint
    }

    fn on_enter(
        &mut self,
        ctx: &mut CharacterContext,
        _input: &mut InputSnapshot,
        _io: &mut StateIo,
    ) {
        if ctx.breathing_stormlight {
            ctx.stormlight.drains.movement = ctx.tuning.stormlight.movement_drain;
            ctx.stormlight.recompute_rate();
        }
    }

    fn on_exit(&mut self, ctx: &mut CharacterContext, _io: &mut StateIo) {
        ctx.stormlight.drains.movement = 0.0;
        ctx.stormlight.recompute_rate();
    }

    fn update(
        &mut self,
        ctx: &mut CharacterContext,
        input: &mut InputSnapshot,
        io: &mut StateIo,
    ) {
        plan_locomotion(ctx, input, io);
    }

    fn fixed_update(
        &mut self,
        ctx: &mut CharacterContext,
        _input: &InputSnapshot,
        io: &mut StateIo,
    ) {
        apply_locomotion(ctx, io.physics, ctx.dt);
    }

    fn check_switch(&self, _ctx: &CharacterContext, input: &InputSnapshot) -> Option<StateId> {
        let amount = input.move_amount();
        if amount <= sim::EPSILON {
            Some(StateId::Idle)
        } else if !input.sprint_held {
            if amount >= 0.5 {
                Some(StateId::Run)
            } else {
                Some(StateId::Walk)
            }
        } else {
            None
        }
    }
}
