//! Execution of animation plans.
//!
//! [`execute`] dispatches one step of any kind. Sequences and groups get
//! their own drivers ([`sequence`], [`group`]); leaves go straight to the
//! [`Animator`] or the [`Scheduler`](crate::scheduler::Scheduler).
//!
//! Completion is reported through a `FnOnce(bool)` callback, `false` meaning
//! the step was interrupted. Once a plan is cancelled no callback reaches the
//! caller and no further step is dispatched.

mod cancel;
mod group;
mod sequence;

#[cfg(test)]
pub(crate) mod testing;

use std::rc::Rc;
use std::time::Duration;

use crate::animation::{AnimationOptions, SpringParams, TimingFunction};
use crate::scheduler::{schedule_or_fail, Scheduler};
use crate::stage::StageConfig;
use crate::step::{Animation, Changes, Extra, Step};

pub(crate) use cancel::CancelToken;
pub(crate) use sequence::run as run_sequence;

/// Callback reporting whether a step ran to completion
pub type Completion = Box<dyn FnOnce(bool)>;

/// Everything the animator needs to run one interpolated change
#[derive(Clone, Debug)]
pub struct AnimationRequest {
    pub duration: Duration,
    /// Delay before the change starts, already including accumulated waits
    pub delay: Duration,
    pub timing: Option<TimingFunction>,
    pub spring: Option<SpringParams>,
    pub options: AnimationOptions,
}

/// Handle to an animation in flight
pub trait AnimationHandle {
    /// Stop as soon as possible, leaving properties at their current values.
    ///
    /// The animator may or may not invoke the completion afterwards; the
    /// drivers ignore it either way.
    fn stop(&self);
}

/// The backend that actually performs interpolated changes
pub trait Animator {
    /// Begin animating `changes` as described by `request`.
    ///
    /// `completion` must be invoked at most once, with `false` if the change
    /// was interrupted by anything other than [`AnimationHandle::stop`].
    fn perform(
        &self,
        request: AnimationRequest,
        changes: Changes,
        completion: Completion,
    ) -> Box<dyn AnimationHandle>;
}

/// Shared state for every driver of one running plan
#[derive(Clone)]
pub(crate) struct Context {
    pub animator: Rc<dyn Animator>,
    pub scheduler: Rc<dyn Scheduler>,
    pub config: StageConfig,
    pub token: CancelToken,
}

impl Context {
    pub fn new(
        animator: Rc<dyn Animator>,
        scheduler: Rc<dyn Scheduler>,
        config: StageConfig,
    ) -> Self {
        Self {
            animator,
            scheduler,
            config,
            token: CancelToken::new(),
        }
    }

    /// Run `task(true)` once `wait` has elapsed, or right away for a zero
    /// wait. Nothing runs if the plan is cancelled in the meantime.
    pub fn run_after(&self, wait: Duration, task: impl FnOnce(bool) + 'static) {
        if wait.is_zero() {
            task(true);
            return;
        }
        let token = self.token.clone();
        schedule_or_fail(self.scheduler.as_ref(), wait, move |elapsed| {
            if !token.is_cancelled() {
                task(elapsed);
            }
        });
    }
}

pub(crate) fn complete(completion: Option<Completion>, finished: bool) {
    if let Some(completion) = completion {
        completion(finished);
    }
}

/// Dispatch `step` after `delay`, reporting to `completion` when it is done
pub(crate) fn execute(step: Step, delay: Duration, ctx: &Context, completion: Option<Completion>) {
    if ctx.token.is_cancelled() {
        log::trace!("plan stopped, dropping step");
        return;
    }
    match step {
        Step::Wait(duration) => {
            ctx.run_after(delay + duration, move |elapsed| complete(completion, elapsed));
        }
        Step::Animate(animation) => perform_animation(animation, delay, ctx, completion),
        Step::Extra(extra) => perform_extra(extra, delay, ctx, completion),
        Step::Group(members) => group::run(members, delay, ctx, completion),
        Step::Sequence(members) => sequence::run(members.into_members(), delay, ctx, completion),
    }
}

fn perform_animation(
    animation: Animation,
    delay: Duration,
    ctx: &Context,
    completion: Option<Completion>,
) {
    let Animation {
        duration,
        delay: own_delay,
        timing,
        spring,
        options,
        changes,
    } = animation;
    let request = AnimationRequest {
        duration,
        delay: delay + own_delay,
        timing,
        spring,
        options,
    };
    log::trace!(
        "animating over {:?} after {:?}",
        request.duration,
        request.delay
    );

    let token = ctx.token.clone();
    let id = token.reserve();
    let done = Rc::new(std::cell::Cell::new(false));
    let on_done = {
        let done = done.clone();
        move |finished: bool| {
            done.set(true);
            token.release(id);
            if token.is_cancelled() {
                return;
            }
            complete(completion, finished);
        }
    };
    let handle = ctx.animator.perform(request, changes, Box::new(on_done));
    if !done.get() {
        ctx.token.track(id, handle);
    }
}

fn perform_extra(extra: Extra, delay: Duration, ctx: &Context, completion: Option<Completion>) {
    let Extra {
        delay: own_delay,
        perform,
    } = extra;
    ctx.run_after(delay + own_delay, move |elapsed| {
        if elapsed {
            perform();
        }
        complete(completion, elapsed);
    });
}

/// Apply every mutation and side effect in `step` at once, without the
/// animator. Only used for trees whose total duration is zero.
///
/// Stops at the first member reached after the plan is cancelled, which a
/// side effect may do itself.
pub(crate) fn apply_immediately(step: Step, token: &CancelToken) {
    if token.is_cancelled() {
        return;
    }
    match step {
        Step::Wait(_) => {}
        Step::Animate(animation) => (animation.changes)(),
        Step::Extra(extra) => (extra.perform)(),
        Step::Group(group) => {
            for member in group.into_members() {
                apply_immediately(member.step, token);
            }
        }
        Step::Sequence(sequence) => {
            for member in sequence.into_members() {
                apply_immediately(member, token);
            }
        }
    }
}
