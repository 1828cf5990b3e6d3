//! Ordered list of change handlers.
//!
//! [`SubscriberList`] is the subscription point of an observable container.  It
//! stores boxed closures together with the [`SubscriptionId`] handed back to
//! the caller, and invokes them in registration order.
//!
//! # Delivery contract
//!
//! - Handlers run synchronously, on the thread that performed the mutation.
//! - Handlers run in FIFO registration order.
//! - The container calls [`SubscriberList::notify`] only after the new value has
//!   been committed, so every handler observes the new state.
//!
//! # Why closures and IDs? (for beginners)
//!
//! Rust closures have no identity that can be compared, so "remove this exact
//! handler" cannot be expressed by passing the closure again.  Instead,
//! `subscribe` returns a small opaque token and `unsubscribe` takes that token
//! back.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use super::notification::ChangeNotification;

/// Signature of a change handler observing state of type `S`.
///
/// `Send + Sync` lets the owning container move between threads (for example
/// into a Tokio task).
pub type ChangeHandler<S> = Box<dyn Fn(&S, &ChangeNotification) + Send + Sync>;

/// Source of subscription ids, shared by every list in the process so a token
/// issued by one container never matches a handler in another.
static NEXT_ID: AtomicU64 = AtomicU64::new(0);

/// Opaque token identifying one registered handler.
///
/// Ids are unique across all subscriber lists in the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

/// Registration-ordered list of change handlers for state of type `S`.
pub struct SubscriberList<S> {
    handlers: Vec<(SubscriptionId, ChangeHandler<S>)>,
}

impl<S> SubscriberList<S> {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Appends `handler` to the list and returns its token.
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: Fn(&S, &ChangeNotification) + Send + Sync + 'static,
    {
        let id = SubscriptionId(NEXT_ID.fetch_add(1, Ordering::Relaxed));
        self.handlers.push((id, Box::new(handler)));
        id
    }

    /// Removes the handler registered under `id`.
    ///
    /// Returns `false` if no such handler is registered (already removed, or
    /// issued by another list).  The relative order of the remaining handlers
    /// is preserved.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(existing, _)| *existing != id);
        self.handlers.len() != before
    }

    /// Delivers `notification` to every handler, in registration order.
    pub fn notify(&self, state: &S, notification: &ChangeNotification) {
        for (_, handler) in &self.handlers {
            handler(state, notification);
        }
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<S> Default for SubscriberList<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> fmt::Debug for SubscriberList<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriberList")
            .field(
                "subscriptions",
                &self.handlers.iter().map(|(id, _)| *id).collect::<Vec<_>>(),
            )
            .finish()
    }
}
