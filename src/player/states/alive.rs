//! Root state for normal play: interaction resolution, stormlight
//! breathing and the base drain.

use super::{PlayerState, StateId, StateIo};
use crate::player::constants::anim;
use crate::player::context::CharacterContext;
use crate::player::input::InputSnapshot;
use crate::player::ports::QueryLayer;

#[derive(Default)]
pub struct AliveState;

impl AliveState {
    /// Sphere-overlap against the interaction layer, feeding every
    /// in-range candidate's yield into the ledger. Objects stay
    /// interacted with every tick they remain in range.
    fn handle_interaction(&self, ctx: &mut CharacterContext, io: &mut StateIo) {
        let candidates = io.physics.overlap_sphere(
            io.physics.position(),
            ctx.tuning.interaction.radius,
            QueryLayer::Interaction,
        );
        let yielded = io.interactables.resolve(&candidates);
        if yielded != 0.0 {
            ctx.stormlight.deposit(yielded);
            io.display.set_stormlight(ctx.stormlight.current());
        }
    }

    /// Releasing infused objects refunds nothing but settles any
    /// overcap the infusion cycle produced.
    fn handle_release(
        &self,
        ctx: &mut CharacterContext,
        input: &mut InputSnapshot,
        io: &mut StateIo,
    ) {
        if !input.unlash_pressed || !io.interactables.any_active() {
            return;
        }
        input.reset_unlash();
        io.interactables.release_all();
        ctx.stormlight.settle_overcap();
        io.display.set_stormlight(ctx.stormlight.current());
    }

    /// Gravity switch: invert the pull and start falling the other way.
    fn handle_gravity_flip(
        &self,
        ctx: &mut CharacterContext,
        input: &mut InputSnapshot,
        io: &mut StateIo,
    ) {
        if !input.gravity_flip_pressed {
            return;
        }
        input.reset_gravity_flip();
        io.animation.play(anim::CLIP_GRAVITY_SWITCH, false);
        ctx.gravity.flip();
        ctx.in_air_timer = 0.0;
    }

    fn handle_stormlight_toggle(
        &self,
        ctx: &mut CharacterContext,
        input: &mut InputSnapshot,
        io: &mut StateIo,
    ) {
        if !input.stormlight_toggle_pressed {
            return;
        }
        input.reset_stormlight_toggle();
        ctx.breathing_stormlight = !ctx.breathing_stormlight;
        if ctx.breathing_stormlight {
            io.animation.play(anim::CLIP_BUFF, false);
            io.animation.set_layer_weight(anim::BUFF_LAYER, 1.0);
        } else {
            io.animation.set_layer_weight(anim::BUFF_LAYER, 0.0);
        }
    }

    fn handle_stormlight(&self, ctx: &mut CharacterContext, io: &mut StateIo) {
        ctx.stormlight.drains.base = if ctx.breathing_stormlight {
            ctx.tuning.stormlight.base_drain
        } else {
            0.0
        };
        ctx.stormlight.recompute_rate();
        if ctx.breathing_stormlight {
            ctx.stormlight.drain(ctx.dt);
            io.display.set_stormlight(ctx.stormlight.current());
        }
    }
}

impl PlayerState for AliveState {
    fn id(&self) -> StateId {
        StateId::Alive
    }

    fn default_child(&self) -> Option<StateId> {
        Some(StateId::Grounded)
    }

    fn update(
        &mut self,
        ctx: &mut CharacterContext,
        input: &mut InputSnapshot,
        io: &mut StateIo,
    ) {
        self.handle_interaction(ctx, io);
        self.handle_release(ctx, input, io);
        self.handle_gravity_flip(ctx, input, io);
        self.handle_stormlight_toggle(ctx, input, io);
        self.handle_stormlight(ctx, io);
    }
}
