use std::time::Duration;

use super::{IntoSteps, Step};

/// Steps that run one after another
///
/// Its duration is the sum of its members, waits included.
#[derive(Debug, Default)]
pub struct Sequence {
    pub(crate) members: Vec<Step>,
}

impl Sequence {
    pub fn new(members: Vec<Step>) -> Self {
        Self { members }
    }

    pub fn from_steps(members: impl IntoSteps) -> Self {
        Self::new(members.into_steps())
    }

    /// Append a step at the end
    pub fn then(mut self, step: impl IntoSteps) -> Self {
        step.append_to(&mut self.members);
        self
    }

    pub fn members(&self) -> &[Step] {
        &self.members
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn duration(&self) -> Duration {
        super::total_duration(&self.members)
    }

    pub(crate) fn into_members(self) -> Vec<Step> {
        self.members
    }
}

impl From<Sequence> for Step {
    fn from(sequence: Sequence) -> Self {
        Step::Sequence(sequence)
    }
}
