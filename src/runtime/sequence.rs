use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::{Duration, Instant};

use super::{complete, execute, Completion, Context};
use crate::step::Step;

/// Walks an ordered list of steps, one at a time
struct SequenceDriver {
    steps: VecDeque<Step>,
    ctx: Context,
    completion: Option<Completion>,
}

enum Next {
    /// Next step, with the delay accumulated from the waits before it
    Step(Step, Duration, Context),
    Done(Duration, Context),
    Cancelled,
}

impl SequenceDriver {
    /// Fold leading waits into `pending` and pop the next step to dispatch
    fn next(&mut self, mut pending: Duration) -> Next {
        if self.ctx.token.is_cancelled() {
            self.steps.clear();
            self.completion = None;
            return Next::Cancelled;
        }
        while let Some(Step::Wait(wait)) = self.steps.front() {
            pending += *wait;
            self.steps.pop_front();
        }
        match self.steps.pop_front() {
            Some(step) => Next::Step(step, pending, self.ctx.clone()),
            None => Next::Done(pending, self.ctx.clone()),
        }
    }
}

/// Run `steps` in order, the first one after `delay`
pub(crate) fn run(steps: Vec<Step>, delay: Duration, ctx: &Context, completion: Option<Completion>) {
    let driver = Rc::new(RefCell::new(SequenceDriver {
        steps: steps.into(),
        ctx: ctx.clone(),
        completion,
    }));
    advance(&driver, delay);
}

fn finish(driver: &Rc<RefCell<SequenceDriver>>, finished: bool) {
    let completion = driver.borrow_mut().completion.take();
    log::trace!("sequence finished: {}", finished);
    complete(completion, finished);
}

fn advance(driver: &Rc<RefCell<SequenceDriver>>, mut pending: Duration) {
    loop {
        let next = driver.borrow_mut().next(pending);
        let (step, delay, ctx) = match next {
            Next::Step(step, delay, ctx) => (step, delay, ctx),
            Next::Done(pending, ctx) => {
                let driver = driver.clone();
                ctx.run_after(pending, move |elapsed| finish(&driver, elapsed));
                return;
            }
            Next::Cancelled => return,
        };

        let expected = delay + step.duration();
        let started = ctx.scheduler.now();

        // Completions that arrive while the step is still being dispatched are
        // handled by this loop instead of recursing.
        let dispatching = Rc::new(Cell::new(true));
        let inline = Rc::new(Cell::new(None));
        let on_done = {
            let dispatching = dispatching.clone();
            let inline = inline.clone();
            let driver = driver.clone();
            let ctx = ctx.clone();
            move |finished: bool| {
                if dispatching.get() {
                    inline.set(Some(finished));
                } else if step_finished(&driver, &ctx, finished, started, expected) {
                    advance(&driver, Duration::ZERO);
                }
            }
        };
        execute(step, delay, &ctx, Some(Box::new(on_done)));
        dispatching.set(false);
        pending = Duration::ZERO;

        match inline.take() {
            Some(finished) if step_finished(driver, &ctx, finished, started, expected) => {}
            _ => return,
        }
    }
}

/// Handle a step's completion. Returns true if the next step should be
/// dispatched right away.
///
/// A step that completes earlier than its declared duration (an animation
/// whose changes were a no-op) is padded out so the sequence keeps to its
/// declared timing, minus one frame of slack.
fn step_finished(
    driver: &Rc<RefCell<SequenceDriver>>,
    ctx: &Context,
    finished: bool,
    started: Instant,
    expected: Duration,
) -> bool {
    if ctx.token.is_cancelled() {
        return false;
    }
    if !finished {
        finish(driver, false);
        return false;
    }

    let elapsed = ctx.scheduler.now().saturating_duration_since(started);
    let remaining = expected.saturating_sub(elapsed);
    if remaining <= ctx.config.drift_tolerance {
        return true;
    }
    let wait = remaining.saturating_sub(ctx.config.frame_interval);
    if wait.is_zero() {
        return true;
    }

    log::debug!(
        "step finished after {:?} of {:?}, waiting {:?} to keep timing",
        elapsed,
        expected,
        wait
    );
    let driver = driver.clone();
    ctx.run_after(wait, move |elapsed| {
        if elapsed {
            advance(&driver, Duration::ZERO);
        } else {
            finish(&driver, false);
        }
    });
    false
}
