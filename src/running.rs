//! Handle to a plan in flight.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use crate::runtime::{self, CancelToken, Context};
use crate::step::{total_duration, Step};

/// Lifecycle of a [`RunningSequence`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    /// Built but not started
    Ready,
    Running,
    /// Every step ran; `finished` is false if one was interrupted
    Completed { finished: bool },
    /// Stopped by the caller
    Stopped,
}

impl RunState {
    /// Returns true for `Completed` and `Stopped`
    pub fn is_terminal(&self) -> bool {
        self.outcome().is_some()
    }

    /// The value completion handlers receive, once settled
    pub fn outcome(&self) -> Option<bool> {
        match self {
            RunState::Completed { finished } => Some(*finished),
            RunState::Stopped => Some(false),
            RunState::Ready | RunState::Running => None,
        }
    }
}

type Handler = Box<dyn FnOnce(bool)>;

struct RunningInner {
    state: RunState,
    duration: Duration,
    steps: Vec<Step>,
    handlers: Vec<Handler>,
    // Released on start so in-flight callbacks don't keep the stage alive
    // through the handle.
    ctx: Option<Context>,
    token: CancelToken,
}

/// Handle to an animation plan, started or not
///
/// Cloning the handle is cheap; every clone observes the same plan. Dropping
/// all handles does not stop a running plan.
#[derive(Clone)]
pub struct RunningSequence {
    inner: Rc<RefCell<RunningInner>>,
}

impl RunningSequence {
    pub(crate) fn new(steps: Vec<Step>, ctx: Context) -> Self {
        let token = ctx.token.clone();
        Self {
            inner: Rc::new(RefCell::new(RunningInner {
                state: RunState::Ready,
                duration: total_duration(&steps),
                steps,
                handlers: Vec::new(),
                ctx: Some(ctx),
                token,
            })),
        }
    }

    pub fn state(&self) -> RunState {
        self.inner.borrow().state
    }

    /// Declared duration of the whole plan
    pub fn duration(&self) -> Duration {
        self.inner.borrow().duration
    }

    /// Returns true once completed or stopped
    pub fn is_settled(&self) -> bool {
        self.state().is_terminal()
    }

    /// Start executing. Does nothing unless the plan is `Ready`.
    pub fn start(&self) -> Self {
        let (steps, ctx) = {
            let mut inner = self.inner.borrow_mut();
            if inner.state != RunState::Ready {
                log::debug!("ignoring start of a plan in state {:?}", inner.state);
                return self.clone();
            }
            let Some(ctx) = inner.ctx.take() else {
                return self.clone();
            };
            inner.state = RunState::Running;
            (std::mem::take(&mut inner.steps), ctx)
        };
        log::debug!(
            "starting plan of {} step(s), {:?} long",
            steps.len(),
            self.duration()
        );

        let this = self.clone();
        runtime::run_sequence(
            steps,
            Duration::ZERO,
            &ctx,
            Some(Box::new(move |finished: bool| this.settle(finished))),
        );
        self.clone()
    }

    /// Call `handler` once the plan settles, with `false` if it was stopped
    /// or interrupted.
    ///
    /// If the plan has already settled the handler runs right away.
    pub fn on_complete<F>(&self, handler: F) -> Self
    where
        F: FnOnce(bool) + 'static,
    {
        let outcome = {
            let mut inner = self.inner.borrow_mut();
            match inner.state.outcome() {
                Some(outcome) => outcome,
                None => {
                    inner.handlers.push(Box::new(handler));
                    return self.clone();
                }
            }
        };
        handler(outcome);
        self.clone()
    }

    /// Stop the plan.
    ///
    /// Animations in flight are stopped where they are, steps not yet started
    /// never run, and every handler is called with `false`. Does nothing once
    /// the plan has settled.
    pub fn stop(&self) {
        let (handlers, token) = {
            let mut inner = self.inner.borrow_mut();
            if inner.state.is_terminal() {
                log::debug!("ignoring stop of a plan in state {:?}", inner.state);
                return;
            }
            inner.state = RunState::Stopped;
            inner.steps.clear();
            inner.ctx = None;
            (std::mem::take(&mut inner.handlers), inner.token.clone())
        };
        log::debug!("plan stopped");
        token.cancel();
        for handler in handlers {
            handler(false);
        }
    }

    fn settle(&self, finished: bool) {
        let handlers = {
            let mut inner = self.inner.borrow_mut();
            if inner.state != RunState::Running {
                return;
            }
            inner.state = RunState::Completed { finished };
            std::mem::take(&mut inner.handlers)
        };
        log::debug!("plan completed, finished: {}", finished);
        for handler in handlers {
            handler(finished);
        }
    }
}

impl fmt::Debug for RunningSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("RunningSequence")
            .field("state", &inner.state)
            .field("duration", &inner.duration)
            .field("handlers", &inner.handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use std::time::Duration;

    use super::*;
    use crate::runtime::testing::{harness, Behavior, RecordingAnimator};
    use crate::scheduler::ManualScheduler;
    use crate::steps;

    fn prepared(
        behavior: Behavior,
        steps: Vec<Step>,
    ) -> (RunningSequence, ManualScheduler, Rc<RecordingAnimator>) {
        let (ctx, animator, scheduler) = harness(behavior);
        (RunningSequence::new(steps, ctx), scheduler, animator)
    }

    fn recorder() -> (Rc<RefCell<Vec<bool>>>, impl Fn() -> Box<dyn FnOnce(bool)>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = calls.clone();
        let make = move || {
            let sink = sink.clone();
            let handler: Box<dyn FnOnce(bool)> =
                Box::new(move |finished: bool| sink.borrow_mut().push(finished));
            handler
        };
        (calls, make)
    }

    #[test]
    fn test_lifecycle_to_completed() {
        let (running, scheduler, _) = prepared(
            Behavior::Timed,
            steps![Step::wait(0.25), Step::animate(0.5, || {})],
        );
        assert_eq!(running.state(), RunState::Ready);
        assert_eq!(running.duration(), Duration::from_millis(750));

        let (calls, handler) = recorder();
        running.start().on_complete(handler());
        assert_eq!(running.state(), RunState::Running);

        scheduler.run_until_idle();
        assert_eq!(running.state(), RunState::Completed { finished: true });
        assert_eq!(*calls.borrow(), vec![true]);
    }

    #[test]
    fn test_double_start_is_ignored() {
        let count = Rc::new(Cell::new(0));
        let counter = count.clone();
        let (running, scheduler, _) = prepared(
            Behavior::Timed,
            steps![Step::extra(move || counter.set(counter.get() + 1)).delayed(0.1)],
        );
        running.start();
        running.start();
        scheduler.run_until_idle();
        running.start();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_stop_discards_pending_steps() {
        let ran = Rc::new(Cell::new(false));
        let flag = ran.clone();
        let (running, scheduler, animator) = prepared(
            Behavior::Timed,
            steps![
                Step::animate(0.5, || {}),
                Step::extra(move || flag.set(true)),
            ],
        );
        let (calls, handler) = recorder();
        running.start().on_complete(handler()).on_complete(handler());

        scheduler.advance(Duration::from_millis(200));
        running.stop();
        assert_eq!(running.state(), RunState::Stopped);
        assert_eq!(*calls.borrow(), vec![false, false]);
        assert_eq!(animator.stops(), 1);

        scheduler.run_until_idle();
        assert!(!ran.get());
        running.stop();
        assert_eq!(*calls.borrow(), vec![false, false]);
    }

    #[test]
    fn test_stop_before_start() {
        let ran = Rc::new(Cell::new(false));
        let flag = ran.clone();
        let (running, scheduler, _) =
            prepared(Behavior::Timed, steps![Step::extra(move || flag.set(true))]);
        running.stop();
        assert_eq!(running.start().state(), RunState::Stopped);
        scheduler.run_until_idle();
        assert!(!ran.get());
    }

    #[test]
    fn test_stop_after_completion_is_noop() {
        let (running, scheduler, _) = prepared(Behavior::Timed, steps![Step::wait(0.1)]);
        let (calls, handler) = recorder();
        running.start().on_complete(handler());
        scheduler.run_until_idle();
        running.stop();
        assert_eq!(running.state(), RunState::Completed { finished: true });
        assert_eq!(*calls.borrow(), vec![true]);
    }

    #[test]
    fn test_late_subscription_runs_immediately() {
        let (running, scheduler, _) = prepared(Behavior::Timed, steps![Step::wait(0.1)]);
        running.start();
        scheduler.run_until_idle();

        let (calls, handler) = recorder();
        running.on_complete(handler());
        assert_eq!(*calls.borrow(), vec![true]);

        let (stopped, _, _) = prepared(Behavior::Timed, steps![Step::wait(0.1)]);
        stopped.stop();
        let (calls, handler) = recorder();
        stopped.on_complete(handler());
        assert_eq!(*calls.borrow(), vec![false]);
    }

    #[test]
    fn test_interruption_completes_unfinished() {
        let (running, scheduler, _) = prepared(
            Behavior::Interrupt,
            steps![Step::animate(0.25, || {}), Step::animate(0.25, || {})],
        );
        let (calls, handler) = recorder();
        running.start().on_complete(handler());
        scheduler.run_until_idle();
        assert_eq!(running.state(), RunState::Completed { finished: false });
        assert_eq!(*calls.borrow(), vec![false]);
    }

    #[test]
    fn test_synchronous_plan_settles_during_start() {
        let (running, _scheduler, _) = prepared(Behavior::Timed, steps![Step::extra(|| {})]);
        running.start();
        assert_eq!(running.state(), RunState::Completed { finished: true });
    }

    #[test]
    fn test_handler_can_stop_reentrantly() {
        let (running, scheduler, _) = prepared(Behavior::Timed, steps![Step::wait(0.1)]);
        let inner = running.clone();
        running.start().on_complete(move |_| inner.stop());
        scheduler.run_until_idle();
        assert_eq!(running.state(), RunState::Completed { finished: true });
    }
}
