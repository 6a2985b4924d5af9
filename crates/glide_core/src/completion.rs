//! One-shot completion signals
//!
//! A [`Completion`] settles at most once. Continuations registered with
//! [`Completion::on_settle`] run when it does (or immediately if it already
//! has). [`Completion::join`] is the barrier over many completions.
//!
//! Cancelled animations never settle their completion, so a join over a
//! cancelled animation stays pending.

use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

type Continuation = Box<dyn FnOnce()>;

#[derive(Default)]
struct CompletionInner {
    settled: bool,
    continuations: SmallVec<[Continuation; 2]>,
}

/// A shared one-shot completion signal (cheap to clone)
#[derive(Clone, Default)]
pub struct Completion {
    inner: Rc<RefCell<CompletionInner>>,
}

impl Completion {
    /// A completion that has not settled yet
    pub fn pending() -> Self {
        Self::default()
    }

    /// A completion that is already settled
    pub fn settled() -> Self {
        let completion = Self::pending();
        completion.settle();
        completion
    }

    /// Settle the completion, running continuations
    ///
    /// Returns `true` if this call settled it, `false` if it already was.
    pub fn settle(&self) -> bool {
        let continuations = {
            let mut inner = self.inner.borrow_mut();
            if inner.settled {
                return false;
            }
            inner.settled = true;
            std::mem::take(&mut inner.continuations)
        };
        tracing::trace!(continuations = continuations.len(), "completion settled");
        for continuation in continuations {
            continuation();
        }
        true
    }

    pub fn is_settled(&self) -> bool {
        self.inner.borrow().settled
    }

    /// Run `f` once this completion settles
    pub fn on_settle(&self, f: impl FnOnce() + 'static) {
        {
            let mut inner = self.inner.borrow_mut();
            if !inner.settled {
                inner.continuations.push(Box::new(f));
                return;
            }
        }
        f();
    }

    /// Whether two handles refer to the same signal
    pub fn ptr_eq(&self, other: &Completion) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// A completion that settles once every part has settled
    ///
    /// Arrival order doesn't matter. An empty join is settled immediately.
    pub fn join<I>(parts: I) -> Completion
    where
        I: IntoIterator<Item = Completion>,
    {
        let parts: Vec<Completion> = parts.into_iter().collect();
        let joined = Completion::pending();
        if parts.is_empty() {
            joined.settle();
            return joined;
        }

        let remaining = Rc::new(Cell::new(parts.len()));
        for part in parts {
            let remaining = Rc::clone(&remaining);
            let joined = joined.clone();
            part.on_settle(move || {
                remaining.set(remaining.get() - 1);
                if remaining.get() == 0 {
                    joined.settle();
                }
            });
        }
        joined
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Completion")
            .field("settled", &inner.settled)
            .field("waiting", &inner.continuations.len())
            .finish()
    }
}
