use std::time::Duration;

use super::{seconds, IntoSteps, Step};

/// A step inside a [`Group`] together with its own leading delay
#[derive(Debug)]
pub struct GroupMember {
    pub step: Step,
    pub delay: Duration,
}

impl GroupMember {
    /// Own delay plus the inner step's duration
    pub fn total_duration(&self) -> Duration {
        self.delay + self.step.duration()
    }
}

/// Steps that run simultaneously
///
/// A group finishes when its longest member finishes, so its duration is the
/// maximum member total (own delay included), or zero when empty.
#[derive(Debug, Default)]
pub struct Group {
    pub(crate) members: Vec<GroupMember>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group every step `members` expands into, each with no own delay
    pub fn from_steps(members: impl IntoSteps) -> Self {
        Self {
            members: members
                .into_steps()
                .into_iter()
                .map(|step| GroupMember {
                    step,
                    delay: Duration::ZERO,
                })
                .collect(),
        }
    }

    /// Add a member starting with the group
    pub fn with(self, step: Step) -> Self {
        self.with_delayed(step, 0.0)
    }

    /// Add a member starting `secs` seconds after the group
    pub fn with_delayed(mut self, step: Step, secs: f64) -> Self {
        self.members.push(GroupMember {
            step,
            delay: seconds(secs),
        });
        self
    }

    pub fn members(&self) -> &[GroupMember] {
        &self.members
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn duration(&self) -> Duration {
        self.members
            .iter()
            .map(GroupMember::total_duration)
            .max()
            .unwrap_or(Duration::ZERO)
    }

    /// Index of the member whose completion stands for the whole group.
    ///
    /// This is the longest member; ties go to the last one declared.
    pub(crate) fn primary_index(&self) -> Option<usize> {
        let mut primary: Option<(usize, Duration)> = None;
        for (index, member) in self.members.iter().enumerate() {
            let total = member.total_duration();
            match primary {
                Some((_, longest)) if total < longest => {}
                _ => primary = Some((index, total)),
            }
        }
        primary.map(|(index, _)| index)
    }

    pub(crate) fn into_members(self) -> Vec<GroupMember> {
        self.members
    }
}

impl From<Group> for Step {
    fn from(group: Group) -> Self {
        Step::Group(group)
    }
}
