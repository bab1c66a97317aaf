//! The lashing root and its half-lash / full-lash substates: gravity
//! reorientation, in-air steering and the intensity economy.

use super::{PlayerState, StateId, StateIo};
use crate::player::constants::{anim, lashing, sim};
use crate::player::context::CharacterContext;
use crate::player::gravity::rotation_to;
use crate::player::input::InputSnapshot;
use crate::player::movement::{character_forward, character_up};
use crate::player::ports::ForceMode;
use crate::player::sensor;
use crate::player::tasks::TimedTask;
use nalgebra::UnitQuaternion;

/// Root of the ability tree. Owns the lashing drain and forces the
/// whole tree shut when stormlight runs dry.
#[derive(Default)]
pub struct LashingState;

impl PlayerState for LashingState {
    fn id(&self) -> StateId {
        StateId::Lashing
    }

    fn default_child(&self) -> Option<StateId> {
        Some(StateId::Halflash)
    }

    fn entry_transition(
        &self,
        _ctx: &CharacterContext,
        input: &InputSnapshot,
    ) -> Option<StateId> {
        if input.lash_pressed {
            Some(StateId::Halflash)
        } else if input.small_lash_count > 0 {
            Some(StateId::Lash)
        } else {
            None
        }
    }

    fn on_enter(
        &mut self,
        ctx: &mut CharacterContext,
        _input: &mut InputSnapshot,
        _io: &mut StateIo,
    ) {
        ctx.lashing_intensity = lashing::DEFAULT_INTENSITY;
    }

    fn on_exit(&mut self, ctx: &mut CharacterContext, _io: &mut StateIo) {
        ctx.stormlight.drains.lashing = 0.0;
        ctx.stormlight.recompute_rate();
    }

    fn update(
        &mut self,
        ctx: &mut CharacterContext,
        _input: &mut InputSnapshot,
        io: &mut StateIo,
    ) {
        // drain scales with how hard the pull currently is
        let scale = (ctx.lashing_intensity / lashing::DEFAULT_INTENSITY).max(0.0);
        ctx.stormlight.drains.lashing = ctx.tuning.stormlight.lashing_drain * scale;
        ctx.stormlight.recompute_rate();
        ctx.stormlight.drain(ctx.dt);
        io.display.set_stormlight(ctx.stormlight.current());
    }

    fn check_switch(&self, ctx: &CharacterContext, _input: &InputSnapshot) -> Option<StateId> {
        if ctx.stormlight.is_empty() {
            return Some(StateId::Grounded);
        }
        None
    }
}

/// The floating pose between ground and full flight: one upward
/// impulse against gravity, then a slow rotation into the pose.
#[derive(Default)]
pub struct HalflashState;

impl PlayerState for HalflashState {
    fn id(&self) -> StateId {
        StateId::Halflash
    }

    fn on_enter(
        &mut self,
        ctx: &mut CharacterContext,
        input: &mut InputSnapshot,
        io: &mut StateIo,
    ) {
        input.reset_lash();
        io.animation.set_flag(anim::FLAG_HALF_LASHING, true);
        io.animation.play(anim::CLIP_HALF_LASHING, false);
        io.physics.apply_force(
            -ctx.gravity.vector() * ctx.tuning.lashing.half_lash_height,
            ForceMode::Impulse,
        );
        if ctx.is_grounded {
            let rotation = io.physics.rotation();
            let target =
                rotation_to(character_up(&rotation), character_forward(&rotation)) * rotation;
            io.tasks.spawn(TimedTask::halflash_align(
                StateId::Halflash,
                lashing::HALFLASH_ALIGN_SECS,
                rotation,
                target,
            ));
        }
        ctx.is_grounded = false;
        ctx.in_air_timer = 0.0;
    }

    fn on_exit(&mut self, _ctx: &mut CharacterContext, io: &mut StateIo) {
        io.animation.set_flag(anim::FLAG_HALF_LASHING, false);
    }

    fn check_switch(&self, _ctx: &CharacterContext, input: &InputSnapshot) -> Option<StateId> {
        if input.lash_pressed {
            return Some(StateId::Lash);
        }
        None
    }
}

/// Full lash: the character falls along a steerable gravity vector
/// whose pull strength is the intensity scalar.
#[derive(Default)]
pub struct LashState;

impl LashState {
    /// Pitch/yaw the gravity vector from the 2D steer input.
    fn handle_steering(&self, ctx: &mut CharacterContext, input: &InputSnapshot) {
        if input.move_amount() <= sim::EPSILON {
            return;
        }
        let step = ctx.tuning.lashing.steer_rate * ctx.dt;
        ctx.gravity.rotate_by(nalgebra::Vector3::new(
            input.movement.y * step,
            input.movement.x * step,
            0.0,
        ));
    }

    /// Keep the body head-first along gravity, rolling with the
    /// horizontal steer input.
    fn handle_orientation(&self, ctx: &CharacterContext, input: &InputSnapshot, io: &mut StateIo) {
        let rotation = io.physics.rotation();
        let mut target = rotation_to(character_up(&rotation), ctx.gravity.direction()) * rotation;
        if input.movement.x.abs() > sim::EPSILON {
            let angle = input.movement.x * ctx.tuning.lashing.roll_speed.to_radians() * ctx.dt;
            target = UnitQuaternion::from_axis_angle(&ctx.gravity.direction(), angle) * target;
        }
        let new_rotation = rotation
            .try_slerp(&target, ctx.tuning.lashing.roll_lerp, sim::EPSILON)
            .unwrap_or(target);
        io.physics.set_rotation(new_rotation);
    }

    /// Sweep along gravity for the surface being flown into. A hit
    /// snaps gravity into the surface and schedules the landing
    /// alignment, owned by the grounded state it hands over to.
    fn handle_ground_detection(&self, ctx: &mut CharacterContext, io: &mut StateIo) {
        ctx.in_air_timer = (ctx.in_air_timer + ctx.dt).min(ctx.tuning.falling.max_air_timer);
        let hit = match sensor::probe_ground(io.physics, &ctx.gravity, &ctx.tuning.raycast) {
            Some(hit) => hit,
            None => {
                ctx.is_grounded = false;
                return;
            }
        };

        ctx.is_grounded = true;
        ctx.in_air_timer = 0.0;
        ctx.gravity.snap_to_surface(hit.normal);

        let rotation = io.physics.rotation();
        let up = -ctx.gravity.vector();
        let target =
            rotation_to(character_up(&rotation), nalgebra::Unit::new_normalize(up)) * rotation;
        io.tasks.spawn(TimedTask::landing_align(
            StateId::Grounded,
            lashing::LANDING_ALIGN_SECS,
            rotation,
            target,
            io.physics.position(),
            hit.point,
            hit.normal.into_inner() * lashing::LANDING_SETTLE_OFFSET,
        ));
    }

    /// Intensity economy: full presses multiply, small presses nudge
    /// behind a short cooldown, direction change re-aims gravity at the
    /// camera axis.
    fn handle_intensity(
        &self,
        ctx: &mut CharacterContext,
        input: &mut InputSnapshot,
        io: &mut StateIo,
    ) {
        if input.lash_pressed {
            input.reset_lash();
            ctx.lashing_intensity *= lashing::INTENSITY_INCREMENT;
        }
        if input.unlash_pressed {
            input.reset_unlash();
            // divide while above the default, subtract through zero so
            // repeated un-lashes can actually exhaust the intensity
            if ctx.lashing_intensity > lashing::DEFAULT_INTENSITY {
                ctx.lashing_intensity /= lashing::INTENSITY_INCREMENT;
            } else {
                ctx.lashing_intensity -= lashing::INTENSITY_INCREMENT;
            }
        }
        if ctx.lash_cooldown <= 0.0 && input.small_lash_count > 0 {
            ctx.lashing_intensity +=
                lashing::INTENSITY_SMALL_INCREMENT * input.small_lash_count as f32;
            input.reset_small_lash();
            ctx.lash_cooldown = lashing::SMALL_LASH_COOLDOWN_SECS;
            io.tasks.spawn(TimedTask::small_lash_cooldown(
                StateId::Lash,
                lashing::SMALL_LASH_COOLDOWN_SECS,
            ));
        }
        // re-read the cooldown: a small lash this tick swallows the
        // opposing small un-lash
        if ctx.lash_cooldown <= 0.0 && input.small_unlash_count > 0 {
            ctx.lashing_intensity -=
                lashing::INTENSITY_SMALL_INCREMENT * input.small_unlash_count as f32;
            input.reset_small_unlash();
            ctx.lash_cooldown = lashing::SMALL_LASH_COOLDOWN_SECS;
            io.tasks.spawn(TimedTask::small_lash_cooldown(
                StateId::Lash,
                lashing::SMALL_LASH_COOLDOWN_SECS,
            ));
        }
        if input.change_direction_pressed {
            input.reset_change_direction();
            ctx.gravity
                .snap_between(io.camera.position, io.physics.position());
        }
        ctx.clamp_lashing_intensity();
    }
}

impl PlayerState for LashState {
    fn id(&self) -> StateId {
        StateId::Lash
    }

    fn on_enter(
        &mut self,
        ctx: &mut CharacterContext,
        input: &mut InputSnapshot,
        io: &mut StateIo,
    ) {
        input.reset_lash();
        input.reset_small_lash();
        // head-first: gravity pulls the way the body's up axis points
        ctx.gravity.align_to(character_up(&io.physics.rotation()));
        io.animation.set_flag(anim::FLAG_HALF_LASHING, false);
        io.animation.set_flag(anim::FLAG_LASHING, true);
        ctx.lash_cooldown = 0.0;
    }

    fn on_exit(&mut self, _ctx: &mut CharacterContext, io: &mut StateIo) {
        io.animation.set_flag(anim::FLAG_LASHING, false);
    }

    fn update(
        &mut self,
        ctx: &mut CharacterContext,
        input: &mut InputSnapshot,
        io: &mut StateIo,
    ) {
        self.handle_steering(ctx, input);
        self.handle_orientation(ctx, input, io);
        self.handle_ground_detection(ctx, io);
        self.handle_intensity(ctx, input, io);
    }

    fn fixed_update(
        &mut self,
        ctx: &mut CharacterContext,
        _input: &InputSnapshot,
        io: &mut StateIo,
    ) {
        let pull = ctx.tuning.gravity.intensity
            * ctx.tuning.gravity.multiplier
            * ctx.lashing_intensity
            * 0.1;
        io.physics
            .apply_force(ctx.gravity.vector() * pull, ForceMode::Acceleration);
        io.physics.apply_force(
            ctx.gravity.vector() * (ctx.tuning.falling.falling_velocity * ctx.in_air_timer),
            ForceMode::Force,
        );
    }

    fn check_switch(&self, ctx: &CharacterContext, _input: &InputSnapshot) -> Option<StateId> {
        if ctx.is_grounded {
            Some(StateId::Grounded)
        } else if ctx.lashing_intensity <= 0.0 {
            Some(StateId::Halflash)
        } else {
            None
        }
    }
}
