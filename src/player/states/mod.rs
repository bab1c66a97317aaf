//! Hierarchical state machine for the player character.
//!
//! States form a fixed tree: two roots (`Alive`, `Lashing`) with their
//! substates beneath them. Only leaf states are current; a transition
//! exits up to the lowest common ancestor of the old and new paths and
//! enters down to the new leaf. Transition predicates are pure and
//! first-match-wins; all mutation happens in the enter/update/exit
//! hooks.

mod alive;
mod attack;
mod grounded;
mod lashing;

pub use alive::AliveState;
pub use attack::{LightAttackState, NormalBlockState};
pub use grounded::{GroundedState, IdleState, RunState, SprintState, WalkState};
pub use lashing::{HalflashState, LashState, LashingState};

use super::context::CharacterContext;
use super::input::InputSnapshot;
use super::interact::InteractableSet;
use super::ports::{AnimationSink, CameraRig, Physics, ResourceDisplay};
use super::tasks::TaskList;

/// Every state in the tree. The discriminant doubles as the state's
/// slot in the machine's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateId {
    Alive,
    Grounded,
    Idle,
    Walk,
    Run,
    Sprint,
    Lashing,
    Halflash,
    Lash,
    LightAttack,
    NormalBlock,
}

impl StateId {
    pub fn parent(self) -> Option<StateId> {
        match self {
            StateId::Alive | StateId::Lashing => None,
            StateId::Grounded | StateId::LightAttack | StateId::NormalBlock => {
                Some(StateId::Alive)
            }
            StateId::Idle | StateId::Walk | StateId::Run | StateId::Sprint => {
                Some(StateId::Grounded)
            }
            StateId::Halflash | StateId::Lash => Some(StateId::Lashing),
        }
    }

    pub fn is_root(self) -> bool {
        self.parent().is_none()
    }

    /// Chain from the root down to this state, inclusive.
    pub fn ancestry(self) -> Vec<StateId> {
        let mut chain = vec![self];
        let mut cur = self;
        while let Some(parent) = cur.parent() {
            chain.push(parent);
            cur = parent;
        }
        chain.reverse();
        chain
    }

    pub fn name(self) -> &'static str {
        match self {
            StateId::Alive => "alive",
            StateId::Grounded => "grounded",
            StateId::Idle => "idle",
            StateId::Walk => "walk",
            StateId::Run => "run",
            StateId::Sprint => "sprint",
            StateId::Lashing => "lashing",
            StateId::Halflash => "halflash",
            StateId::Lash => "lash",
            StateId::LightAttack => "light_attack",
            StateId::NormalBlock => "normal_block",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// External collaborators handed to state hooks each tick. Borrowed
/// from the simulation for the duration of one machine call.
pub struct StateIo<'a> {
    pub physics: &'a mut dyn Physics,
    pub animation: &'a mut dyn AnimationSink,
    pub display: &'a mut dyn ResourceDisplay,
    pub tasks: &'a mut TaskList,
    pub interactables: &'a mut InteractableSet,
    pub camera: &'a CameraRig,
}

/// Behavior hooks for one state in the tree.
///
/// `check_switch` and `entry_transition` must not mutate anything;
/// input edges they react on are consumed later inside the target
/// state's `on_enter` or `update`.
pub trait PlayerState {
    fn id(&self) -> StateId;

    fn on_enter(
        &mut self,
        _ctx: &mut CharacterContext,
        _input: &mut InputSnapshot,
        _io: &mut StateIo,
    ) {
    }

    fn on_exit(&mut self, _ctx: &mut CharacterContext, _io: &mut StateIo) {}

    fn update(
        &mut self,
        _ctx: &mut CharacterContext,
        _input: &mut InputSnapshot,
        _io: &mut StateIo,
    ) {
    }

    fn fixed_update(
        &mut self,
        _ctx: &mut CharacterContext,
        _input: &InputSnapshot,
        _io: &mut StateIo,
    ) {
    }

    /// Pure transition predicate, evaluated every update tick.
    fn check_switch(&self, _ctx: &CharacterContext, _input: &InputSnapshot) -> Option<StateId> {
        None
    }

    /// Child entered when this state is entered with no more specific
    /// target. `None` for leaves.
    fn default_child(&self) -> Option<StateId> {
        None
    }

    /// Input-dependent child selection on entry, overriding
    /// `default_child` when it matches.
    fn entry_transition(
        &self,
        _ctx: &CharacterContext,
        _input: &InputSnapshot,
    ) -> Option<StateId> {
        None
    }
}

fn build_arena() -> Vec<Box<dyn PlayerState>> {
    // Slot order must match StateId discriminant order.
    vec![
        Box::new(AliveState::default()),
        Box::new(GroundedState::default()),
        Box::new(IdleState::default()),
        Box::new(WalkState::default()),
        Box::new(RunState::default()),
        Box::new(SprintState::default()),
        Box::new(LashingState::default()),
        Box::new(HalflashState::default()),
        Box::new(LashState::default()),
        Box::new(LightAttackState::default()),
        Box::new(NormalBlockState::default()),
    ]
}

/// The machine itself: a fixed arena of singleton state objects and the
/// current root-to-leaf path. Transitions swap ids, never states.
pub struct StateMachine {
    states: Vec<Box<dyn PlayerState>>,
    path: Vec<StateId>,
}

impl StateMachine {
    /// Builds the arena and enters the initial path (alive, grounded,
    /// then whichever locomotion leaf the entry rules select).
    pub fn new(
        ctx: &mut CharacterContext,
        input: &mut InputSnapshot,
        io: &mut StateIo,
    ) -> Self {
        let mut machine = Self {
            states: build_arena(),
            path: Vec::new(),
        };
        let initial = machine.expand_path(StateId::Alive, ctx, input);
        for &id in &initial {
            machine.states[id.index()].on_enter(ctx, input, io);
        }
        machine.path = initial;
        machine
    }

    pub fn leaf(&self) -> StateId {
        // The path always holds at least the root chain entered in new()
        *self.path.last().unwrap_or(&StateId::Alive)
    }

    pub fn path(&self) -> &[StateId] {
        &self.path
    }

    /// Extends `target`'s ancestry downward through entry transitions
    /// and default children until a leaf is reached.
    fn expand_path(
        &self,
        target: StateId,
        ctx: &CharacterContext,
        input: &InputSnapshot,
    ) -> Vec<StateId> {
        let mut path = target.ancestry();
        let mut cur = target;
        loop {
            let state = &self.states[cur.index()];
            let next = state
                .entry_transition(ctx, input)
                .or_else(|| state.default_child());
            match next {
                Some(child) if child.parent() == Some(cur) => {
                    path.push(child);
                    cur = child;
                }
                _ => break,
            }
        }
        path
    }

    /// Switches to `target`, exiting up to the lowest common ancestor
    /// and entering down to the new leaf. Exiting a state cancels the
    /// timed tasks it owns.
    pub fn switch_states(
        &mut self,
        target: StateId,
        ctx: &mut CharacterContext,
        input: &mut InputSnapshot,
        io: &mut StateIo,
    ) {
        if target == self.leaf() {
            return;
        }
        let new_path = self.expand_path(target, ctx, input);
        if new_path == self.path {
            return;
        }

        let mut common = 0;
        while common < self.path.len()
            && common < new_path.len()
            && self.path[common] == new_path[common]
        {
            common += 1;
        }

        tracing::debug!(
            from = self.leaf().name(),
            to = new_path.last().map(|id| id.name()).unwrap_or("?"),
            "state transition"
        );

        let exited: Vec<StateId> = self.path[common..].to_vec();
        for &id in exited.iter().rev() {
            io.tasks.cancel_owned_by(id);
            self.states[id.index()].on_exit(ctx, io);
        }
        for &id in &new_path[common..] {
            self.states[id.index()].on_enter(ctx, input, io);
        }
        self.path = new_path;
    }

    /// Runs one update pass from root to leaf. Each state updates, then
    /// its transition predicate runs; the first requested transition
    /// wins and ends the pass.
    pub fn update_states(
        &mut self,
        ctx: &mut CharacterContext,
        input: &mut InputSnapshot,
        io: &mut StateIo,
    ) {
        let path = self.path.clone();
        for &id in &path {
            self.states[id.index()].update(ctx, input, io);
            if let Some(target) = self.states[id.index()].check_switch(ctx, input) {
                self.switch_states(target, ctx, input, io);
                return;
            }
        }
    }

    /// Runs one physics pass from root to leaf. No transitions here;
    /// forces only.
    pub fn fixed_update_states(
        &mut self,
        ctx: &mut CharacterContext,
        input: &InputSnapshot,
        io: &mut StateIo,
    ) {
        let path = self.path.clone();
        for &id in &path {
            self.states[id.index()].fixed_update(ctx, input, io);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::Harness;
    use super::*;
    use crate::config::PlayerConfig;
    use nalgebra::Vector2;

    fn build_machine(
        ctx: &mut CharacterContext,
        input: &mut InputSnapshot,
        harness: &mut Harness,
    ) -> StateMachine {
        let mut io = harness.io();
        StateMachine::new(ctx, input, &mut io)
    }

    #[test]
    fn test_initial_path_is_alive_grounded_idle() {
        let mut ctx = CharacterContext::new(PlayerConfig::default());
        let mut input = InputSnapshot::default();
        let mut harness = Harness::new();
        let machine = build_machine(&mut ctx, &mut input, &mut harness);
        assert_eq!(
            machine.path(),
            &[StateId::Alive, StateId::Grounded, StateId::Idle]
        );
    }

    #[test]
    fn test_ancestry_runs_root_to_leaf() {
        assert_eq!(
            StateId::Sprint.ancestry(),
            vec![StateId::Alive, StateId::Grounded, StateId::Sprint]
        );
        assert_eq!(StateId::Lash.ancestry(), vec![StateId::Lashing, StateId::Lash]);
    }

    #[test]
    fn test_movement_input_walks_then_runs() {
        let mut ctx = CharacterContext::new(PlayerConfig::default());
        let mut input = InputSnapshot::default();
        let mut harness = Harness::new();
        let mut machine = build_machine(&mut ctx, &mut input, &mut harness);

        input.movement = Vector2::new(0.0, 0.3);
        let mut io = harness.io();
        machine.update_states(&mut ctx, &mut input, &mut io);
        drop(io);
        assert_eq!(machine.leaf(), StateId::Walk);

        input.movement = Vector2::new(0.0, 0.9);
        let mut io = harness.io();
        machine.update_states(&mut ctx, &mut input, &mut io);
        drop(io);
        assert_eq!(machine.leaf(), StateId::Run);

        input.movement = Vector2::zeros();
        let mut io = harness.io();
        machine.update_states(&mut ctx, &mut input, &mut io);
        drop(io);
        assert_eq!(machine.leaf(), StateId::Idle);
    }

    #[test]
    fn test_lash_press_enters_lashing_root() {
        let mut ctx = CharacterContext::new(PlayerConfig::default());
        let mut input = InputSnapshot::default();
        let mut harness = Harness::new();
        let mut machine = build_machine(&mut ctx, &mut input, &mut harness);

        input.lash_pressed = true;
        let mut io = harness.io();
        machine.update_states(&mut ctx, &mut input, &mut io);
        drop(io);

        assert_eq!(machine.path(), &[StateId::Lashing, StateId::Halflash]);
        // the entry consumed the edge
        assert!(!input.lash_pressed);
    }

    #[test]
    fn test_small_lash_enters_full_lash_directly() {
        let mut ctx = CharacterContext::new(PlayerConfig::default());
        let mut input = InputSnapshot::default();
        let mut harness = Harness::new();
        let mut machine = build_machine(&mut ctx, &mut input, &mut harness);

        input.small_lash_count = 1;
        let mut io = harness.io();
        machine.update_states(&mut ctx, &mut input, &mut io);
        drop(io);

        assert_eq!(machine.path(), &[StateId::Lashing, StateId::Lash]);
    }

    #[test]
    fn test_empty_stormlight_blocks_lashing() {
        let mut ctx = CharacterContext::new(PlayerConfig::default());
        ctx.stormlight.set_current(0.0);
        let mut input = InputSnapshot::default();
        let mut harness = Harness::new();
        let mut machine = build_machine(&mut ctx, &mut input, &mut harness);

        input.lash_pressed = true;
        let mut io = harness.io();
        machine.update_states(&mut ctx, &mut input, &mut io);
        drop(io);

        assert_eq!(machine.leaf(), StateId::Idle);
    }

    #[test]
    fn test_transition_sequence_closes_every_flag_it_opened() {
        let mut ctx = CharacterContext::new(PlayerConfig::default());
        let mut input = InputSnapshot::default();
        let mut harness = Harness::new();
        let mut machine = build_machine(&mut ctx, &mut input, &mut harness);

        // idle -> halflash -> lash, then starve the tree back to idle
        input.lash_pressed = true;
        let mut io = harness.io();
        machine.update_states(&mut ctx, &mut input, &mut io);
        drop(io);
        input.lash_pressed = true;
        let mut io = harness.io();
        machine.update_states(&mut ctx, &mut input, &mut io);
        drop(io);
        ctx.stormlight.set_current(0.0);
        let mut io = harness.io();
        machine.update_states(&mut ctx, &mut input, &mut io);
        drop(io);

        assert_eq!(
            machine.path(),
            &[StateId::Alive, StateId::Grounded, StateId::Idle]
        );
        // every flag an enter hook raised was lowered again by the
        // matching exit along the way out
        let mut last: std::collections::HashMap<&str, bool> = Default::default();
        let mut raised: std::collections::HashMap<&str, i32> = Default::default();
        for (flag, value) in &harness.animation.flags {
            last.insert(flag.as_str(), *value);
            *raised.entry(flag.as_str()).or_default() += if *value { 1 } else { -1 };
        }
        assert!(!last.is_empty());
        for (flag, value) in last {
            assert!(!value, "flag {flag} left raised");
        }
        for (flag, balance) in raised {
            assert!(balance <= 0, "flag {flag} raised more than lowered");
        }
    }

    #[test]
    fn test_switch_to_current_leaf_is_noop() {
        let mut ctx = CharacterContext::new(PlayerConfig::default());
        let mut input = InputSnapshot::default();
        let mut harness = Harness::new();
        let mut machine = build_machine(&mut ctx, &mut input, &mut harness);

        let before = machine.path().to_vec();
        let mut io = harness.io();
        machine.switch_states(StateId::Idle, &mut ctx, &mut input, &mut io);
        drop(io);
        assert_eq!(machine.path(), &before[..]);
    }
}
