//! A reference [`Animator`] that keeps time without interpolating.
//!
//! `TimerAnimator` applies the changes once the delay elapses and reports
//! completion after the duration. It suits headless use, tests, and backends
//! whose properties snap to their final values; the curve, spring and option
//! fields of each request are accepted and ignored.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use crate::runtime::{AnimationHandle, AnimationRequest, Animator, Completion};
use crate::scheduler::{schedule_or_fail, Scheduler};
use crate::step::Changes;

/// Animator that applies changes after the requested delay and completes
/// after the requested duration
pub struct TimerAnimator {
    scheduler: Rc<dyn Scheduler>,
}

impl TimerAnimator {
    pub fn new(scheduler: Rc<dyn Scheduler>) -> Self {
        Self { scheduler }
    }
}

struct TimerHandle {
    stopped: Rc<Cell<bool>>,
}

impl AnimationHandle for TimerHandle {
    fn stop(&self) {
        self.stopped.set(true);
    }
}

impl Animator for TimerAnimator {
    fn perform(
        &self,
        request: AnimationRequest,
        changes: Changes,
        completion: Completion,
    ) -> Box<dyn AnimationHandle> {
        let stopped = Rc::new(Cell::new(false));
        let handle = Box::new(TimerHandle {
            stopped: stopped.clone(),
        });

        if request.delay.is_zero() {
            changes();
            finish_after(self.scheduler.clone(), request.duration, stopped, completion);
            return handle;
        }

        let scheduler = self.scheduler.clone();
        schedule_or_fail(self.scheduler.as_ref(), request.delay, move |elapsed| {
            if stopped.get() {
                return;
            }
            if !elapsed {
                completion(false);
                return;
            }
            changes();
            finish_after(scheduler, request.duration, stopped, completion);
        });
        handle
    }
}

fn finish_after(
    scheduler: Rc<dyn Scheduler>,
    duration: Duration,
    stopped: Rc<Cell<bool>>,
    completion: Completion,
) {
    schedule_or_fail(scheduler.as_ref(), duration, move |elapsed| {
        if !stopped.get() {
            completion(elapsed);
        }
    });
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::animation::AnimationOptions;
    use crate::scheduler::ManualScheduler;

    fn request(delay_ms: u64, duration_ms: u64) -> AnimationRequest {
        AnimationRequest {
            duration: Duration::from_millis(duration_ms),
            delay: Duration::from_millis(delay_ms),
            timing: None,
            spring: None,
            options: AnimationOptions::empty(),
        }
    }

    #[test]
    fn test_applies_after_delay_and_completes_after_duration() {
        let scheduler = ManualScheduler::new();
        let animator = TimerAnimator::new(Rc::new(scheduler.clone()));
        let log = Rc::new(RefCell::new(Vec::new()));
        let changed = log.clone();
        let finished = log.clone();
        let clock = scheduler.clone();
        let clock2 = scheduler.clone();

        animator.perform(
            request(100, 200),
            Box::new(move || changed.borrow_mut().push(("changes", clock.elapsed()))),
            Box::new(move |_: bool| finished.borrow_mut().push(("done", clock2.elapsed()))),
        );
        scheduler.run_until_idle();

        assert_eq!(
            *log.borrow(),
            vec![
                ("changes", Duration::from_millis(100)),
                ("done", Duration::from_millis(300)),
            ]
        );
    }

    #[test]
    fn test_zero_request_completes_asynchronously() {
        let scheduler = ManualScheduler::new();
        let animator = TimerAnimator::new(Rc::new(scheduler.clone()));
        let done = Rc::new(Cell::new(false));
        let seen = done.clone();
        animator.perform(
            request(0, 0),
            Box::new(|| {}),
            Box::new(move |finished: bool| seen.set(finished)),
        );
        assert!(!done.get());
        scheduler.advance(Duration::ZERO);
        assert!(done.get());
    }

    #[test]
    fn test_stop_before_delay_skips_changes() {
        let scheduler = ManualScheduler::new();
        let animator = TimerAnimator::new(Rc::new(scheduler.clone()));
        let changed = Rc::new(Cell::new(false));
        let done = Rc::new(Cell::new(false));
        let (c, d) = (changed.clone(), done.clone());
        let handle = animator.perform(
            request(100, 100),
            Box::new(move || c.set(true)),
            Box::new(move |_: bool| d.set(true)),
        );
        scheduler.advance(Duration::from_millis(50));
        handle.stop();
        scheduler.run_until_idle();
        assert!(!changed.get());
        assert!(!done.get());
    }
}
