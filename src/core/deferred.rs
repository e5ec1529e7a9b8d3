//! Result bridge between a portal entry and the caller awaiting it.
//!
//! Invariants:
//! - At most one outcome is delivered; later `resolve`/`reject` calls are ignored.
//! - Settle hooks run synchronously inside the settling call, after the outcome is
//!   queued, so registry cleanup is visible before any awaiting task resumes.

use std::cell::RefCell;
use std::future::Future;
use std::mem;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::core::error::PortalError;

type Outcome<T> = Result<T, PortalError>;
type SettleHook = Box<dyn FnOnce()>;

struct BridgeState<T> {
    sender: Option<oneshot::Sender<Outcome<T>>>,
    hooks: Vec<SettleHook>,
    settled: bool,
}

/// Settling side of the bridge. Cheap to clone; all clones share one outcome slot.
pub struct Deferred<T> {
    state: Rc<RefCell<BridgeState<T>>>,
}

impl<T> Clone for Deferred<T> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

/// Creates a connected settler/awaitable pair.
pub fn deferred<T>() -> (Deferred<T>, PortalResult<T>) {
    let (sender, receiver) = oneshot::channel();
    let settler = Deferred {
        state: Rc::new(RefCell::new(BridgeState {
            sender: Some(sender),
            hooks: Vec::new(),
            settled: false,
        })),
    };
    (settler, PortalResult { receiver })
}

impl<T> Deferred<T> {
    /// Returns `true` when this call delivered the outcome.
    pub fn resolve(&self, value: T) -> bool {
        self.settle(Ok(value))
    }

    pub fn reject(&self, error: PortalError) -> bool {
        self.settle(Err(error))
    }

    pub fn settle(&self, outcome: Outcome<T>) -> bool {
        let (sender, hooks) = {
            let mut state = self.state.borrow_mut();
            if state.settled {
                return false;
            }
            state.settled = true;
            (state.sender.take(), mem::take(&mut state.hooks))
        };

        if let Some(sender) = sender {
            // The awaiting side may already be gone; settlement still counts.
            let _ = sender.send(outcome);
        }
        for hook in hooks {
            hook();
        }
        true
    }

    pub fn is_settled(&self) -> bool {
        self.state.borrow().settled
    }

    /// Registers a completion callback. Runs immediately when already settled.
    pub fn on_settled(&self, hook: impl FnOnce() + 'static) {
        {
            let mut state = self.state.borrow_mut();
            if !state.settled {
                state.hooks.push(Box::new(hook));
                return;
            }
        }
        hook();
    }
}

/// Awaitable side of the bridge.
#[must_use = "a portal result does nothing unless awaited or dropped deliberately"]
pub struct PortalResult<T> {
    receiver: oneshot::Receiver<Outcome<T>>,
}

impl<T> Future for PortalResult<T> {
    type Output = Outcome<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            Poll::Ready(Err(_)) => Poll::Ready(Err(PortalError::ignore(
                "Portal dropped without a result",
            ))),
            Poll::Pending => Poll::Pending,
        }
    }
}
