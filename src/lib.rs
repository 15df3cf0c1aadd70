//! Declarative scheduling of animation steps.
//!
//! Describe a plan as a tree of [`Step`]s (waits, animations, spring
//! animations, side effects, groups and nested sequences), then hand it to a
//! [`Stage`]. The stage walks the tree on a single thread, giving each step
//! the delay accumulated before it, and drives an [`Animator`] that performs
//! the actual property changes.
//!
//! ```ignore
//! let mut event_loop = EventLoop::<()>::try_new()?;
//! let stage = Stage::timed(LoopScheduler::new(event_loop.handle()));
//!
//! let running = stage.plan(steps![
//!     Step::wait(0.35),
//!     Step::animate(0.5, move || title.set_opacity(1.0)),
//!     group![
//!         Step::animate(0.5, move || card.set_offset(0.0)).delayed(0.25),
//!         Step::animate_spring(0.2, 0.6, 0.0, move || badge.set_scale(1.0)),
//!     ],
//!     Step::extra(|| log::info!("intro finished")),
//! ]);
//!
//! running.on_complete(|finished| log::info!("finished: {}", finished));
//! event_loop.run(None, &mut (), |_| {})?;
//! ```

pub mod animation;
pub mod animator;
pub mod runtime;
pub mod scheduler;
pub mod stage;
pub mod step;

mod running;

pub use animation::{AnimationOptions, SpringParams, TimingFunction};
pub use animator::TimerAnimator;
pub use running::{RunState, RunningSequence};
pub use runtime::{AnimationHandle, AnimationRequest, Animator, Completion};
pub use scheduler::{LoopScheduler, ManualScheduler, ScheduleError, Scheduler, Task};
pub use stage::{Stage, StageConfig};
pub use step::{
    for_each, repeat, seconds, total_duration, Animation, Extra, Group, GroupMember, IntoSteps,
    Sequence, Step,
};

pub mod prelude {
    pub use crate::animation::{AnimationOptions, SpringParams, TimingFunction};
    pub use crate::running::{RunState, RunningSequence};
    pub use crate::stage::{Stage, StageConfig};
    pub use crate::step::{for_each, repeat, Group, IntoSteps, Sequence, Step};
    pub use crate::{group, sequence, steps};
}
