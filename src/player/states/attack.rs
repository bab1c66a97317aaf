//! Combat stubs. These participate in the tree but carry no behavior
//! yet; combat resolution lives outside the locomotion core.

use super::{PlayerState, StateId};

#[derive(Default)]
pub struct LightAttackState;

impl PlayerState for LightAttackState {
    fn id(&self) -> StateId {
        StateId::LightAttack
    }
}

#[derive(Default)]
pub struct NormalBlockState;

impl PlayerState for NormalBlockState {
    fn id(&self) -> StateId {
        StateId::NormalBlock
    }
}
