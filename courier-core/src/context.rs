//! # Context Carrier
//!
//! [`Context`] is the request-scoped handle a caller passes to
//! `publish`/`send`. It carries cancellation, an optional deadline and typed
//! values, and is handed to every handler that declares it as its first
//! parameter.
//!
//! Contexts form a tree: every `with_*` call returns a child that shares its
//! parent's state. Cancelling a parent cancels its children, a child never
//! outlives its parent's deadline, and value lookups walk up to the root.
//!
//! # Example
//!
//! ```rust
//! use courier_core::{Context, ContextError};
//!
//! struct RequestId(u64);
//!
//! let (ctx, cancel) = Context::background()
//!     .with_value(RequestId(7))
//!     .with_cancel();
//!
//! assert_eq!(ctx.value::<RequestId>().map(|id| id.0), Some(7));
//! cancel.cancel();
//! assert_eq!(ctx.err(), Some(ContextError::Cancelled));
//! ```

use crate::error::ContextError;
use std::{
    any::Any,
    fmt,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

/// A cancellation, deadline and value propagation handle.
///
/// Cloning a context is cheap and yields the *same* context; see
/// [`Context::same`].
#[derive(Clone, Default)]
pub struct Context {
    inner: Arc<Node>,
}

#[derive(Default)]
struct Node {
    parent: Option<Context>,
    cancelled: Option<Arc<AtomicBool>>,
    deadline: Option<Instant>,
    value: Option<Box<dyn Any + Send + Sync>>,
}

// Unlinks the parent chain iteratively so long derivation chains do not
// recurse once per ancestor on drop.
impl Drop for Node {
    fn drop(&mut self) {
        let mut parent = self.parent.take();
        while let Some(ctx) = parent {
            parent = match Arc::try_unwrap(ctx.inner) {
                Ok(mut node) => node.parent.take(),
                Err(_) => None,
            };
        }
    }
}

impl Context {
    /// Returns an empty root context: never cancelled, no deadline, no values.
    pub fn background() -> Self {
        Self::default()
    }

    fn child(&self, mut node: Node) -> Self {
        node.parent = Some(self.clone());
        Self {
            inner: Arc::new(node),
        }
    }

    /// Derives a cancellable child and the handle that cancels it.
    pub fn with_cancel(&self) -> (Self, CancelHandle) {
        let flag = Arc::new(AtomicBool::new(false));
        let ctx = self.child(Node {
            parent: None,
            cancelled: Some(Arc::clone(&flag)),
            deadline: None,
            value: None,
        });
        (ctx, CancelHandle(flag))
    }

    /// Derives a child that is done once `deadline` has passed.
    ///
    /// The effective deadline is the earliest one along the chain, so a
    /// child cannot extend its parent's deadline.
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        self.child(Node {
            parent: None,
            cancelled: None,
            deadline: Some(deadline),
            value: None,
        })
    }

    /// Derives a child that is done `timeout` from now.
    ///
    /// A timeout too large to represent as an [`Instant`] adds no deadline.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self.child(Node::default()),
        }
    }

    /// Derives a child carrying `value`.
    ///
    /// Values are keyed by type; a child's value shadows a parent's value of
    /// the same type.
    pub fn with_value<T: Any + Send + Sync>(&self, value: T) -> Self {
        self.child(Node {
            parent: None,
            cancelled: None,
            deadline: None,
            value: Some(Box::new(value)),
        })
    }

    /// Looks up the nearest value of type `T`.
    pub fn value<T: Any>(&self) -> Option<&T> {
        self.ancestry()
            .find_map(|node| node.value.as_deref().and_then(|v| v.downcast_ref::<T>()))
    }

    /// Returns the effective deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.ancestry().filter_map(|node| node.deadline).min()
    }

    /// Returns why this context is done, or `None` while it is still live.
    pub fn err(&self) -> Option<ContextError> {
        let cancelled = self
            .ancestry()
            .filter_map(|node| node.cancelled.as_ref())
            .any(|flag| flag.load(Ordering::Acquire));
        if cancelled {
            return Some(ContextError::Cancelled);
        }

        match self.deadline() {
            Some(deadline) if Instant::now() >= deadline => Some(ContextError::DeadlineExceeded),
            _ => None,
        }
    }

    /// Returns `true` once the context is cancelled or past its deadline.
    pub fn is_done(&self) -> bool {
        self.err().is_some()
    }

    /// Returns `Err` if the context is done. Handy as `ctx.check()?` in handlers.
    pub fn check(&self) -> Result<(), ContextError> {
        match self.err() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Returns `true` if both handles refer to the same context.
    pub fn same(&self, other: &Context) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn ancestry(&self) -> impl Iterator<Item = &Node> {
        std::iter::successors(Some(&*self.inner), |&node| {
            node.parent.as_ref().map(|parent| &*parent.inner)
        })
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("deadline", &self.deadline())
            .field("err", &self.err())
            .finish_non_exhaustive()
    }
}

/// Cancels the context returned alongside it by [`Context::with_cancel`].
#[derive(Debug, Clone)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    /// Cancels the context and every context derived from it.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
