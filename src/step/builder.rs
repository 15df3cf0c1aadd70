use super::Step;

/// Trait for values that expand into an ordered list of steps
///
/// Nested collections flatten: a `Vec<Vec<Step>>` appends every inner step
/// in order, an `Option<Step>` appends zero or one. An explicit
/// [`Step::Sequence`] is a single step and is never flattened.
pub trait IntoSteps {
    /// Append the steps this value expands into
    fn append_to(self, steps: &mut Vec<Step>);

    /// Collect the steps this value expands into
    fn into_steps(self) -> Vec<Step>
    where
        Self: Sized,
    {
        let mut steps = Vec::new();
        self.append_to(&mut steps);
        steps
    }
}

impl IntoSteps for Step {
    fn append_to(self, steps: &mut Vec<Step>) {
        steps.push(self);
    }
}

impl IntoSteps for () {
    fn append_to(self, _steps: &mut Vec<Step>) {}
}

impl<T: IntoSteps> IntoSteps for Option<T> {
    fn append_to(self, steps: &mut Vec<Step>) {
        if let Some(inner) = self {
            inner.append_to(steps);
        }
    }
}

impl<T: IntoSteps> IntoSteps for Vec<T> {
    fn append_to(self, steps: &mut Vec<Step>) {
        for item in self {
            item.append_to(steps);
        }
    }
}

impl<T: IntoSteps, const N: usize> IntoSteps for [T; N] {
    fn append_to(self, steps: &mut Vec<Step>) {
        for item in self {
            item.append_to(steps);
        }
    }
}

/// Expand every item of `items` into steps, flattening the results
///
/// ```ignore
/// let fade_in = for_each(cards, |card| {
///     Step::animate(0.2, move || card.set_opacity(1.0)).delayed(0.05)
/// });
/// ```
pub fn for_each<I, F, S>(items: I, mut f: F) -> Vec<Step>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> S,
    S: IntoSteps,
{
    let mut steps = Vec::new();
    for item in items {
        f(item).append_to(&mut steps);
    }
    steps
}

/// Expand `count` iterations into steps, passing the iteration index
pub fn repeat<F, S>(count: usize, f: F) -> Vec<Step>
where
    F: FnMut(usize) -> S,
    S: IntoSteps,
{
    for_each(0..count, f)
}

/// Build a flat `Vec<Step>` from anything implementing [`IntoSteps`]
#[macro_export]
macro_rules! steps {
    ($($step:expr),* $(,)?) => {
        {
            #[allow(unused_mut)]
            let mut steps: ::std::vec::Vec<$crate::Step> = ::std::vec::Vec::new();
            $(
                $crate::IntoSteps::append_to($step, &mut steps);
            )*
            steps
        }
    };
}

/// Build a [`Step::Sequence`] from anything implementing [`IntoSteps`]
#[macro_export]
macro_rules! sequence {
    ($($step:expr),* $(,)?) => {
        $crate::Step::sequence($crate::steps![$($step),*])
    };
}

/// Build a [`Step::Group`] from anything implementing [`IntoSteps`]
#[macro_export]
macro_rules! group {
    ($($step:expr),* $(,)?) => {
        $crate::Step::group($crate::steps![$($step),*])
    };
}
