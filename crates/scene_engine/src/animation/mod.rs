//! Frame driving and procedural animation

mod animation_loop;
mod mutator;
mod scheduler;

pub use animation_loop::{AnimationLoop, LoopError, LoopHandle, LoopState, LoopStats, TickContext};
pub use mutator::{
    mutators, predicate, MutationReport, Mutator, MutatorError, MutatorId, MutatorRegistry, Predicate,
};
pub use scheduler::{FixedRateScheduler, FrameScheduler, ImmediateScheduler};
