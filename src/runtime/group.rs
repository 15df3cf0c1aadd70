use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use super::{apply_immediately, complete, execute, Completion, Context};
use crate::step::Group;

/// Start every member of `group` at once, each after `delay` plus its own
/// delay.
///
/// The group reports completion when its primary member (the longest one)
/// does. Other members only report upward if they are interrupted, so the
/// group needs no join of its own.
pub(crate) fn run(group: Group, delay: Duration, ctx: &Context, completion: Option<Completion>) {
    let Some(primary) = group.primary_index() else {
        ctx.run_after(delay, move |elapsed| complete(completion, elapsed));
        return;
    };

    if group.duration().is_zero() {
        log::trace!("zero-length group, applying members directly");
        let token = ctx.token.clone();
        ctx.run_after(delay, move |elapsed| {
            if elapsed {
                for member in group.into_members() {
                    apply_immediately(member.step, &token);
                }
            }
            if !token.is_cancelled() {
                complete(completion, elapsed);
            }
        });
        return;
    }

    let slot = Rc::new(RefCell::new(completion));
    let mut members = group.into_members();
    let primary = members.remove(primary);
    log::trace!(
        "group of {} member(s), primary runs {:?}",
        members.len() + 1,
        primary.total_duration()
    );

    for member in members {
        let slot = slot.clone();
        let on_done = move |finished: bool| {
            if !finished {
                let completion = slot.borrow_mut().take();
                complete(completion, false);
            }
        };
        execute(member.step, delay + member.delay, ctx, Some(Box::new(on_done)));
    }

    let on_done = move |finished: bool| {
        let completion = slot.borrow_mut().take();
        complete(completion, finished);
    };
    execute(primary.step, delay + primary.delay, ctx, Some(Box::new(on_done)));
}
