//! Cancellable timed tasks resumed once per simulation tick.
//!
//! These replace blocking delays entirely: a task carries its elapsed
//! time and interpolation endpoints, is resumed by the scheduler every
//! tick, and detaches when its duration elapses. Exiting the owning
//! state cancels its tasks before their next resumption.

use nalgebra::{Point3, UnitQuaternion, Vector3};

use super::context::CharacterContext;
use super::ports::Physics;
use super::states::StateId;

#[derive(Debug, Clone)]
enum TaskKind {
    /// Settle rotation and position onto a surface just landed on.
    LandingAlign {
        start_rotation: UnitQuaternion<f32>,
        target_rotation: UnitQuaternion<f32>,
        start_position: Point3<f32>,
        hit_point: Point3<f32>,
        settle_offset: Vector3<f32>,
    },
    /// Rotate into the half-lash pose after the upward impulse.
    HalflashAlign {
        start_rotation: UnitQuaternion<f32>,
        target_rotation: UnitQuaternion<f32>,
    },
    /// Counts down `ctx.lash_cooldown` between small-lash inputs.
    SmallLashCooldown,
}

#[derive(Debug, Clone)]
pub struct TimedTask {
    owner: StateId,
    elapsed: f32,
    duration: f32,
    cancelled: bool,
    kind: TaskKind,
}

impl TimedTask {
    pub fn landing_align(
        owner: StateId,
        duration: f32,
        start_rotation: UnitQuaternion<f32>,
        target_rotation: UnitQuaternion<f32>,
        start_position: Point3<f32>,
        hit_point: Point3<f32>,
        settle_offset: Vector3<f32>,
    ) -> Self {
        Self {
            owner,
            elapsed: 0.0,
            duration,
            cancelled: false,
            kind: TaskKind::LandingAlign {
                start_rotation,
                target_rotation,
                start_position,
                hit_point,
                settle_offset,
            },
        }
    }

    pub fn halflash_align(
        owner: StateId,
        duration: f32,
        start_rotation: UnitQuaternion<f32>,
        target_rotation: UnitQuaternion<f32>,
    ) -> Self {
        Self {
            owner,
            elapsed: 0.0,
            duration,
            cancelled: false,
            kind: TaskKind::HalflashAlign {
                start_rotation,
                target_rotation,
            },
        }
    }

    pub fn small_lash_cooldown(owner: StateId, duration: f32) -> Self {
        Self {
            owner,
            elapsed: 0.0,
            duration,
            cancelled: false,
            kind: TaskKind::SmallLashCooldown,
        }
    }

    pub fn owner(&self) -> StateId {
        self.owner
    }

    /// Advances the task one tick. Returns true while still running.
    fn resume(&mut self, dt: f32, ctx: &mut CharacterContext, physics: &mut dyn Physics) -> bool {
        self.elapsed += dt;
        let finished = self.elapsed >= self.duration;
        let t = if finished {
            1.0
        } else {
            self.elapsed / self.duration
        };

        match &self.kind {
            TaskKind::LandingAlign {
                start_rotation,
                target_rotation,
                start_position,
                hit_point,
                settle_offset,
            } => {
                let settled = hit_point + settle_offset;
                if finished {
                    physics.set_rotation(*target_rotation);
                    physics.set_position(settled);
                } else {
                    let rot = start_rotation
                        .try_slerp(target_rotation, t, crate::player::constants::sim::EPSILON)
                        .unwrap_or(*target_rotation);
                    physics.set_rotation(rot);
                    physics.set_position(start_position + (settled - start_position) * t);
                }
            }
            TaskKind::HalflashAlign {
                start_rotation,
                target_rotation,
            } => {
                let rot = if finished {
                    *target_rotation
                } else {
                    start_rotation
                        .try_slerp(target_rotation, t, crate::player::constants::sim::EPSILON)
                        .unwrap_or(*target_rotation)
                };
                physics.set_rotation(rot);
            }
            TaskKind::SmallLashCooldown => {
                ctx.lash_cooldown = (self.duration - self.elapsed).max(0.0);
            }
        }

        !finished
    }
}

/// All live tasks for one character, resumed in spawn order.
#[derive(Default)]
pub struct TaskList {
    tasks: Vec<TimedTask>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, task: TimedTask) {
        self.tasks.push(task);
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Flags every task owned by `owner` for cancellation. Cancelled
    /// tasks are dropped at their next resumption without running their
    /// final step.
    pub fn cancel_owned_by(&mut self, owner: StateId) {
        for task in &mut self.tasks {
            if task.owner == owner {
                task.cancelled = true;
            }
        }
    }

    /// Resumes every live task exactly once, in spawn order, dropping
    /// cancelled and completed tasks. Spawn order makes the cooldown
    /// race deterministic: the task resumed last owns the final write.
    pub fn resume_all(&mut self, dt: f32, ctx: &mut CharacterContext, physics: &mut dyn Physics) {
        let mut live = Vec::with_capacity(self.tasks.len());
        for mut task in self.tasks.drain(..) {
            if task.cancelled {
                continue;
            }
            if task.resume(dt, ctx, physics) {
                live.push(task);
            }
        }
        self.tasks = live;
    }
}
