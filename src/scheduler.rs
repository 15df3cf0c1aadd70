//! The single execution context plans run on.
//!
//! Drivers never block. Every wait (trailing delays, delayed side effects,
//! drift correction) is a task handed to a [`Scheduler`], which runs it later
//! on the same thread that scheduled it.
//!
//! Two implementations are provided:
//!
//! - [`LoopScheduler`] registers calloop timer sources on an event loop,
//!   so tasks run while the loop dispatches.
//! - [`ManualScheduler`] keeps virtual time that only moves when
//!   [`ManualScheduler::advance`] is called. Useful headless and in tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use calloop::timer::{TimeoutAction, Timer};
use calloop::LoopHandle;

/// Deferred work scheduled on the execution context
pub type Task = Box<dyn FnOnce()>;

/// Error registering a task with the execution context
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("failed to register timer: {0}")]
    Register(#[source] calloop::Error),
    #[error("scheduler is shut down")]
    Closed,
}

/// A clock plus deferred execution on a single thread
pub trait Scheduler {
    /// Current time as seen by this scheduler
    fn now(&self) -> Instant;

    /// Run `task` once `after` has elapsed.
    ///
    /// Tasks always run asynchronously, never inside this call, even for a
    /// zero duration.
    fn schedule(&self, after: Duration, task: Task) -> Result<(), ScheduleError>;
}

/// Run `task(true)` after `after` elapses.
///
/// If the timer cannot be registered the error is logged and `task(false)`
/// runs immediately instead.
pub(crate) fn schedule_or_fail(
    scheduler: &dyn Scheduler,
    after: Duration,
    task: impl FnOnce(bool) + 'static,
) {
    let slot: Rc<Cell<Option<Box<dyn FnOnce(bool)>>>> = Rc::new(Cell::new(Some(Box::new(task))));
    let pending = slot.clone();
    let result = scheduler.schedule(
        after,
        Box::new(move || {
            if let Some(task) = pending.take() {
                task(true);
            }
        }),
    );
    if let Err(err) = result {
        log::error!("{}", err);
        if let Some(task) = slot.take() {
            task(false);
        }
    }
}

/// Scheduler backed by calloop timer sources
pub struct LoopScheduler<Data: 'static> {
    handle: LoopHandle<'static, Data>,
}

impl<Data: 'static> LoopScheduler<Data> {
    pub fn new(handle: LoopHandle<'static, Data>) -> Self {
        Self { handle }
    }
}

impl<Data: 'static> Clone for LoopScheduler<Data> {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
        }
    }
}

impl<Data: 'static> Scheduler for LoopScheduler<Data> {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn schedule(&self, after: Duration, task: Task) -> Result<(), ScheduleError> {
        let mut task = Some(task);
        self.handle
            .insert_source(Timer::from_duration(after), move |_deadline, _, _data| {
                if let Some(task) = task.take() {
                    task();
                }
                TimeoutAction::Drop
            })
            .map(|_token| ())
            .map_err(|err| ScheduleError::Register(err.error))
    }
}

struct PendingTask {
    due: Duration,
    seq: u64,
    task: Task,
}

struct ManualInner {
    origin: Instant,
    elapsed: Duration,
    queue: Vec<PendingTask>,
    next_seq: u64,
    closed: bool,
}

/// Scheduler driven by explicit calls to [`advance`](Self::advance)
///
/// Tasks due at the same instant run in the order they were scheduled.
#[derive(Clone)]
pub struct ManualScheduler {
    inner: Rc<RefCell<ManualInner>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(ManualInner {
                origin: Instant::now(),
                elapsed: Duration::ZERO,
                queue: Vec::new(),
                next_seq: 0,
                closed: false,
            })),
        }
    }

    /// Virtual time elapsed since creation
    pub fn elapsed(&self) -> Duration {
        self.inner.borrow().elapsed
    }

    /// Number of tasks waiting to run
    pub fn pending(&self) -> usize {
        self.inner.borrow().queue.len()
    }

    /// Refuse any further tasks and drop the queued ones
    pub fn close(&self) {
        let dropped = {
            let mut inner = self.inner.borrow_mut();
            inner.closed = true;
            std::mem::take(&mut inner.queue)
        };
        drop(dropped);
    }

    /// Move virtual time forward by `by`, running every task that falls due
    pub fn advance(&self, by: Duration) {
        let target = self.elapsed() + by;
        while let Some(task) = self.pop_due(target) {
            task();
        }
        let mut inner = self.inner.borrow_mut();
        if inner.elapsed < target {
            inner.elapsed = target;
        }
    }

    /// [`advance`](Self::advance) by a number of seconds
    pub fn advance_secs(&self, secs: f64) {
        self.advance(crate::step::seconds(secs));
    }

    /// Run tasks until the queue is empty, returning the final virtual time
    pub fn run_until_idle(&self) -> Duration {
        loop {
            let next_due = self.inner.borrow().queue.iter().map(|p| p.due).min();
            match next_due {
                Some(due) => self.advance(due.saturating_sub(self.elapsed())),
                None => return self.elapsed(),
            }
        }
    }

    fn pop_due(&self, target: Duration) -> Option<Task> {
        let mut inner = self.inner.borrow_mut();
        let index = inner
            .queue
            .iter()
            .enumerate()
            .filter(|(_, pending)| pending.due <= target)
            .min_by_key(|(_, pending)| (pending.due, pending.seq))
            .map(|(index, _)| index)?;
        let pending = inner.queue.swap_remove(index);
        if inner.elapsed < pending.due {
            inner.elapsed = pending.due;
        }
        Some(pending.task)
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for ManualScheduler {
    fn now(&self) -> Instant {
        let inner = self.inner.borrow();
        inner.origin + inner.elapsed
    }

    fn schedule(&self, after: Duration, task: Task) -> Result<(), ScheduleError> {
        let mut inner = self.inner.borrow_mut();
        if inner.closed {
            return Err(ScheduleError::Closed);
        }
        let due = inner.elapsed + after;
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.queue.push(PendingTask { due, seq, task });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(log: &Rc<RefCell<Vec<&'static str>>>, name: &'static str) -> Task {
        let log = log.clone();
        Box::new(move || log.borrow_mut().push(name))
    }

    #[test]
    fn test_tasks_run_in_due_order() {
        let scheduler = ManualScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        scheduler
            .schedule(Duration::from_millis(30), record(&log, "late"))
            .unwrap();
        scheduler
            .schedule(Duration::from_millis(10), record(&log, "early"))
            .unwrap();
        scheduler
            .schedule(Duration::from_millis(10), record(&log, "early-second"))
            .unwrap();

        scheduler.advance(Duration::from_millis(20));
        assert_eq!(*log.borrow(), vec!["early", "early-second"]);
        assert_eq!(scheduler.elapsed(), Duration::from_millis(20));

        scheduler.advance(Duration::from_millis(20));
        assert_eq!(*log.borrow(), vec!["early", "early-second", "late"]);
    }

    #[test]
    fn test_zero_delay_is_not_inline() {
        let scheduler = ManualScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        scheduler.schedule(Duration::ZERO, record(&log, "task")).unwrap();
        assert!(log.borrow().is_empty());
        scheduler.advance(Duration::ZERO);
        assert_eq!(*log.borrow(), vec!["task"]);
    }

    #[test]
    fn test_tasks_scheduled_while_advancing_run_if_due() {
        let scheduler = ManualScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let inner = scheduler.clone();
        let nested = record(&log, "nested");
        scheduler
            .schedule(
                Duration::from_millis(5),
                Box::new(move || {
                    inner.schedule(Duration::from_millis(5), nested).unwrap();
                }),
            )
            .unwrap();
        scheduler.advance(Duration::from_millis(10));
        assert_eq!(*log.borrow(), vec!["nested"]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_run_until_idle_reports_time() {
        let scheduler = ManualScheduler::new();
        scheduler
            .schedule(Duration::from_millis(250), Box::new(|| {}))
            .unwrap();
        assert_eq!(scheduler.run_until_idle(), Duration::from_millis(250));
    }

    #[test]
    fn test_closed_scheduler_fails_over() {
        let scheduler = ManualScheduler::new();
        scheduler.close();
        let result = Rc::new(Cell::new(None));
        let seen = result.clone();
        schedule_or_fail(&scheduler, Duration::from_millis(10), move |elapsed| {
            seen.set(Some(elapsed))
        });
        assert_eq!(result.get(), Some(false));
    }
}
