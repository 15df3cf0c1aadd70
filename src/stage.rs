use std::rc::Rc;
use std::time::Duration;

use crate::animator::TimerAnimator;
use crate::running::RunningSequence;
use crate::runtime::{Animator, Context};
use crate::scheduler::Scheduler;
use crate::step::{IntoSteps, Step};

/// Timing tolerances used by the sequence driver
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StageConfig {
    /// Slack left when padding out a step that finished early
    pub frame_interval: Duration,
    /// A step within this much of its declared duration is considered on time
    pub drift_tolerance: Duration,
}

impl Default for StageConfig {
    fn default() -> Self {
        let frame = Duration::from_secs(1) / 60;
        Self {
            frame_interval: frame,
            drift_tolerance: frame,
        }
    }
}

impl StageConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame_interval(mut self, frame_interval: Duration) -> Self {
        self.frame_interval = frame_interval;
        self
    }

    pub fn drift_tolerance(mut self, drift_tolerance: Duration) -> Self {
        self.drift_tolerance = drift_tolerance;
        self
    }
}

/// Entry point for running animation plans
///
/// A stage pairs an [`Animator`] with the [`Scheduler`] of the thread plans
/// run on. Every plan started from it is independent of the others.
///
/// # Example
///
/// ```ignore
/// let event_loop = EventLoop::<()>::try_new()?;
/// let stage = Stage::timed(LoopScheduler::new(event_loop.handle()));
///
/// stage
///     .plan(steps![
///         Step::wait(0.35),
///         Step::animate(0.5, move || card.set_offset(0.0)),
///     ])
///     .on_complete(|finished| log::info!("intro done: {}", finished));
/// ```
#[derive(Clone)]
pub struct Stage {
    animator: Rc<dyn Animator>,
    scheduler: Rc<dyn Scheduler>,
    config: StageConfig,
}

impl Stage {
    pub fn new<A, S>(animator: A, scheduler: S) -> Self
    where
        A: Animator + 'static,
        S: Scheduler + 'static,
    {
        Self::from_shared(Rc::new(animator), Rc::new(scheduler))
    }

    /// Build a stage from an animator and scheduler that are shared elsewhere
    pub fn from_shared(animator: Rc<dyn Animator>, scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            animator,
            scheduler,
            config: StageConfig::default(),
        }
    }

    /// Stage driving a [`TimerAnimator`] on `scheduler`
    pub fn timed<S: Scheduler + 'static>(scheduler: S) -> Self {
        let scheduler: Rc<dyn Scheduler> = Rc::new(scheduler);
        Self::from_shared(Rc::new(TimerAnimator::new(scheduler.clone())), scheduler)
    }

    pub fn with_config(mut self, config: StageConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    /// Build a plan without starting it
    pub fn prepare(&self, steps: impl IntoSteps) -> RunningSequence {
        let ctx = Context::new(
            self.animator.clone(),
            self.scheduler.clone(),
            self.config,
        );
        RunningSequence::new(steps.into_steps(), ctx)
    }

    /// Build a plan from `steps` and start it immediately
    pub fn plan(&self, steps: impl IntoSteps) -> RunningSequence {
        self.prepare(steps).start()
    }

    /// Run `steps` simultaneously as a single group and start immediately
    pub fn group(&self, steps: impl IntoSteps) -> RunningSequence {
        self.plan(Step::group(steps))
    }
}
