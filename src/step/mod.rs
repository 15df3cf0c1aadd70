//! The animation plan data model.
//!
//! A plan is a tree of [`Step`]s. Leaves are waits, animations and side
//! effects; composites are [`Group`]s (simultaneous) and [`Sequence`]s
//! (ordered). Every step knows its own duration without running anything,
//! which is what lets the runtime pick a group's longest member up front.
//!
//! # Example
//!
//! ```ignore
//! let plan = steps![
//!     Step::wait(0.35),
//!     Step::animate(0.5, move || card.set_offset(0.0)),
//!     Step::wait(0.2),
//!     Step::animate(0.32, move || card.set_opacity(1.0)),
//! ];
//! assert_eq!(total_duration(&plan), Duration::from_secs_f64(1.37));
//! ```

mod builder;
mod group;
mod sequence;

use std::fmt;
use std::time::Duration;

use crate::animation::{AnimationOptions, SpringParams, TimingFunction};

pub use builder::{for_each, repeat, IntoSteps};
pub use group::{Group, GroupMember};
pub use sequence::Sequence;

/// Mutation applied by an animation step
pub type Changes = Box<dyn FnOnce()>;

/// Side effect run by an [`Extra`] step
pub type Perform = Box<dyn FnOnce()>;

/// Convert caller-supplied seconds into a duration.
///
/// Negative, NaN and infinite values are clamped to zero instead of failing.
pub fn seconds(secs: f64) -> Duration {
    match Duration::try_from_secs_f64(secs) {
        Ok(duration) => duration,
        Err(_) => {
            log::debug!("clamping invalid duration {} to zero", secs);
            Duration::ZERO
        }
    }
}

/// Sum of the durations of an ordered list of steps
pub fn total_duration(steps: &[Step]) -> Duration {
    steps.iter().map(Step::duration).sum()
}

/// A single interpolated change
pub struct Animation {
    /// How long the change takes once it starts
    pub duration: Duration,
    /// Delay before the change starts
    pub delay: Duration,
    /// Easing curve, or the animator's default when unset
    pub timing: Option<TimingFunction>,
    /// Spring parameters, making this a damped animation
    pub spring: Option<SpringParams>,
    /// Pass-through backend flags
    pub options: AnimationOptions,
    pub(crate) changes: Changes,
}

impl fmt::Debug for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animation")
            .field("duration", &self.duration)
            .field("delay", &self.delay)
            .field("timing", &self.timing)
            .field("spring", &self.spring)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// A zero-duration side effect
pub struct Extra {
    /// Delay before the side effect runs
    pub delay: Duration,
    pub(crate) perform: Perform,
}

impl fmt::Debug for Extra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extra")
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

/// One node of an animation plan
#[derive(Debug)]
pub enum Step {
    /// Pure delay, no visual effect
    Wait(Duration),
    /// Interpolated change, optionally spring-damped
    Animate(Animation),
    /// Side effect with zero duration
    Extra(Extra),
    /// Members run simultaneously
    Group(Group),
    /// Members run one after another
    Sequence(Sequence),
}

impl Step {
    /// Pause for `secs` seconds
    pub fn wait(secs: f64) -> Self {
        Step::Wait(seconds(secs))
    }

    /// Animate `changes` over `secs` seconds with the animator's default curve
    pub fn animate<F>(secs: f64, changes: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Step::Animate(Animation {
            duration: seconds(secs),
            delay: Duration::ZERO,
            timing: None,
            spring: None,
            options: AnimationOptions::empty(),
            changes: Box::new(changes),
        })
    }

    /// Animate `changes` over `secs` seconds along `timing`
    pub fn animate_with<F>(secs: f64, timing: TimingFunction, changes: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Step::animate(secs, changes).timing(timing)
    }

    /// Spring-damped animation of `changes` over `secs` seconds
    pub fn animate_spring<F>(
        secs: f64,
        damping_ratio: f32,
        initial_velocity: f32,
        changes: F,
    ) -> Self
    where
        F: FnOnce() + 'static,
    {
        Step::animate(secs, changes).spring(SpringParams::new(damping_ratio, initial_velocity))
    }

    /// Zero-duration side effect
    pub fn extra<F>(perform: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Step::Extra(Extra {
            delay: Duration::ZERO,
            perform: Box::new(perform),
        })
    }

    /// Run `members` simultaneously
    pub fn group(members: impl IntoSteps) -> Self {
        Step::Group(Group::from_steps(members))
    }

    /// Run `members` one after another
    pub fn sequence(members: impl IntoSteps) -> Self {
        Step::Sequence(Sequence::from_steps(members))
    }

    /// Total time this step occupies, including any delay attached to it.
    ///
    /// Pure: calling it any number of times before execution returns the
    /// same value.
    pub fn duration(&self) -> Duration {
        match self {
            Step::Wait(duration) => *duration,
            Step::Animate(animation) => animation.delay + animation.duration,
            Step::Extra(extra) => extra.delay,
            Step::Group(group) => group.duration(),
            Step::Sequence(sequence) => sequence.duration(),
        }
    }

    /// Returns true for steps that only contribute delay
    pub fn is_wait(&self) -> bool {
        matches!(self, Step::Wait(_))
    }

    /// Delay this step by `secs` seconds.
    ///
    /// The returned step's duration is always `delay + previous duration`.
    pub fn delayed(self, secs: f64) -> Self {
        let delay = seconds(secs);
        if delay.is_zero() {
            return self;
        }
        match self {
            Step::Wait(duration) => Step::Wait(duration + delay),
            Step::Animate(mut animation) => {
                animation.delay += delay;
                Step::Animate(animation)
            }
            Step::Extra(mut extra) => {
                extra.delay += delay;
                Step::Extra(extra)
            }
            Step::Group(group) => Step::Sequence(Sequence::new(vec![
                Step::Wait(delay),
                Step::Group(group),
            ])),
            Step::Sequence(mut sequence) => {
                sequence.members.insert(0, Step::Wait(delay));
                Step::Sequence(sequence)
            }
        }
    }

    /// Use `timing` for this animation, or for every animation nested inside
    pub fn timing(self, timing: TimingFunction) -> Self {
        self.map_animations(&mut |mut animation| {
            animation.timing = Some(timing.clone());
            animation
        })
    }

    /// Make this animation (or every nested one) spring-damped
    pub fn spring(self, params: SpringParams) -> Self {
        self.map_animations(&mut |mut animation| {
            animation.spring = Some(params);
            animation
        })
    }

    /// Add backend option flags to this animation (or every nested one)
    pub fn options(self, options: AnimationOptions) -> Self {
        self.map_animations(&mut |mut animation| {
            animation.options |= options;
            animation
        })
    }

    fn map_animations(self, f: &mut dyn FnMut(Animation) -> Animation) -> Self {
        match self {
            Step::Animate(animation) => Step::Animate(f(animation)),
            Step::Group(mut group) => {
                group.members = group
                    .members
                    .into_iter()
                    .map(|member| GroupMember {
                        step: member.step.map_animations(f),
                        delay: member.delay,
                    })
                    .collect();
                Step::Group(group)
            }
            Step::Sequence(mut sequence) => {
                sequence.members = sequence
                    .members
                    .into_iter()
                    .map(|step| step.map_animations(f))
                    .collect();
                Step::Sequence(sequence)
            }
            other => other,
        }
    }
}
