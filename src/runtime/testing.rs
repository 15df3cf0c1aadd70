use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use super::{AnimationHandle, AnimationRequest, Animator, Completion, Context};
use crate::animator::TimerAnimator;
use crate::scheduler::{schedule_or_fail, ManualScheduler, Scheduler};
use crate::stage::StageConfig;
use crate::step::Changes;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Behavior {
    /// Apply after the delay, complete after the duration
    Timed,
    /// Apply and complete at once, as a backend does when nothing changed
    NoOp,
    /// Like `Timed`, but report the animation as interrupted
    Interrupt,
}

#[derive(Clone, Debug)]
pub(crate) struct Recorded {
    pub started: Duration,
    pub delay: Duration,
    #[allow(dead_code)]
    pub duration: Duration,
}

pub(crate) struct RecordingAnimator {
    scheduler: ManualScheduler,
    timer: TimerAnimator,
    behavior: Behavior,
    requests: RefCell<Vec<Recorded>>,
    stops: Rc<Cell<usize>>,
}

impl RecordingAnimator {
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.borrow().clone()
    }

    pub fn stops(&self) -> usize {
        self.stops.get()
    }
}

struct CountingHandle {
    inner: Box<dyn AnimationHandle>,
    stops: Rc<Cell<usize>>,
}

impl AnimationHandle for CountingHandle {
    fn stop(&self) {
        self.stops.set(self.stops.get() + 1);
        self.inner.stop();
    }
}

struct NoHandle;

impl AnimationHandle for NoHandle {
    fn stop(&self) {}
}

impl Animator for RecordingAnimator {
    fn perform(
        &self,
        request: AnimationRequest,
        changes: Changes,
        completion: Completion,
    ) -> Box<dyn AnimationHandle> {
        self.requests.borrow_mut().push(Recorded {
            started: self.scheduler.elapsed(),
            delay: request.delay,
            duration: request.duration,
        });
        let inner = match self.behavior {
            Behavior::Timed => self.timer.perform(request, changes, completion),
            Behavior::Interrupt => self.timer.perform(
                request,
                changes,
                Box::new(move |_: bool| completion(false)),
            ),
            Behavior::NoOp => {
                changes();
                schedule_or_fail(&self.scheduler, Duration::ZERO, completion);
                Box::new(NoHandle)
            }
        };
        Box::new(CountingHandle {
            inner,
            stops: self.stops.clone(),
        })
    }
}

/// A driver context running on virtual time
pub(crate) fn harness(behavior: Behavior) -> (Context, Rc<RecordingAnimator>, ManualScheduler) {
    let scheduler = ManualScheduler::new();
    let shared: Rc<dyn Scheduler> = Rc::new(scheduler.clone());
    let animator = Rc::new(RecordingAnimator {
        scheduler: scheduler.clone(),
        timer: TimerAnimator::new(shared.clone()),
        behavior,
        requests: RefCell::new(Vec::new()),
        stops: Rc::new(Cell::new(0)),
    });
    let ctx = Context::new(animator.clone(), shared, StageConfig::default());
    (ctx, animator, scheduler)
}
