use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::AnimationHandle;

#[derive(Default)]
struct TokenInner {
    cancelled: bool,
    next_id: u64,
    active: HashMap<u64, Box<dyn AnimationHandle>>,
}

/// Cancellation state shared by every driver of one running plan.
///
/// Drivers check it before dispatching a step. Animations in flight are
/// tracked here so cancelling can forward the stop to the animator.
#[derive(Clone, Default)]
pub(crate) struct CancelToken {
    inner: Rc<RefCell<TokenInner>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.borrow().cancelled
    }

    /// Reserve an id for an animation about to be handed to the animator
    pub fn reserve(&self) -> u64 {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        id
    }

    /// Track an in-flight animation. Stops it at once if already cancelled.
    pub fn track(&self, id: u64, handle: Box<dyn AnimationHandle>) {
        let mut inner = self.inner.borrow_mut();
        if inner.cancelled {
            drop(inner);
            handle.stop();
            return;
        }
        inner.active.insert(id, handle);
    }

    pub fn release(&self, id: u64) {
        let released = self.inner.borrow_mut().active.remove(&id);
        drop(released);
    }

    #[cfg(test)]
    pub fn active(&self) -> usize {
        self.inner.borrow().active.len()
    }

    /// Mark cancelled and stop every tracked animation
    pub fn cancel(&self) {
        let active = {
            let mut inner = self.inner.borrow_mut();
            if inner.cancelled {
                return;
            }
            inner.cancelled = true;
            std::mem::take(&mut inner.active)
        };
        log::debug!("cancelling plan, stopping {} animation(s)", active.len());
        for handle in active.into_values() {
            handle.stop();
        }
    }
}
