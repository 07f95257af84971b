//! Testing utilities for Courier.
//!
//! This module provides ready-made handlers that record what they saw, to
//! make testing publication order, context propagation and error paths
//! easier.
//!
//! # Features
//!
//! - [`CallLog`]: An ordered log shared by several handlers
//! - [`Recorder`]: A handler that records every message and context it receives
//! - [`CountingHandler`]: A handler that counts invocations
//! - [`TestError`]: A plain error for handlers that are meant to fail

use courier_core::{BoxError, Context, Message};
use parking_lot::Mutex;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use thiserror::Error;

/// An error returned by failing test handlers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TestError(pub &'static str);

// ============================================================================
// Call Log
// ============================================================================

/// An ordered record of which handlers ran.
///
/// # Example
///
/// ```rust
/// use courier::{Context, Mediator, testing::CallLog};
///
/// #[derive(Clone)]
/// struct Tick;
///
/// let log = CallLog::new();
/// let mediator = Mediator::new();
/// mediator.subscribe(log.recording::<Tick>("first"))?;
/// mediator.subscribe(log.recording::<Tick>("second"))?;
///
/// mediator.publish(&Context::background(), Tick)?;
/// assert_eq!(log.entries(), vec!["first", "second"]);
/// # Ok::<(), courier::MediatorError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    entries: Arc<Mutex<Vec<&'static str>>>,
}

impl CallLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn record(&self, name: &'static str) {
        self.entries.lock().push(name);
    }

    /// Get a copy of the entries in call order.
    pub fn entries(&self) -> Vec<&'static str> {
        self.entries.lock().clone()
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Check if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// A handler that records `name` and succeeds.
    pub fn recording<M: Message + Clone>(
        &self,
        name: &'static str,
    ) -> impl Fn(M) + Send + Sync + use<M> {
        let log = self.clone();
        move |_message: M| log.record(name)
    }

    /// A handler that records `name` and fails with [`TestError`].
    pub fn failing<M: Message + Clone>(
        &self,
        name: &'static str,
        error: &'static str,
    ) -> impl Fn(M) -> Result<(), BoxError> + Send + Sync + use<M> {
        let log = self.clone();
        move |_message: M| -> Result<(), BoxError> {
            log.record(name);
            Err(TestError(error).into())
        }
    }
}

// ============================================================================
// Recorder
// ============================================================================

/// A handler factory that records every message it receives.
///
/// Handlers from [`handler`](Self::handler) record the message only;
/// handlers from [`context_handler`](Self::context_handler) also record the
/// context they were called with.
pub struct Recorder<M> {
    messages: Arc<Mutex<Vec<M>>>,
    contexts: Arc<Mutex<Vec<Context>>>,
}

impl<M: Message + Clone> Recorder<M> {
    /// Create a new recorder.
    pub fn new() -> Self {
        Self {
            messages: Arc::new(Mutex::new(Vec::new())),
            contexts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A `(M)` handler feeding this recorder.
    pub fn handler(&self) -> impl Fn(M) + Send + Sync + use<M> {
        let messages = Arc::clone(&self.messages);
        move |message: M| messages.lock().push(message)
    }

    /// A `(Context, M)` handler feeding this recorder.
    pub fn context_handler(&self) -> impl Fn(Context, M) + Send + Sync + use<M> {
        let messages = Arc::clone(&self.messages);
        let contexts = Arc::clone(&self.contexts);
        move |ctx: Context, message: M| {
            contexts.lock().push(ctx);
            messages.lock().push(message);
        }
    }

    /// Get a clone of the recorded messages.
    pub fn messages(&self) -> Vec<M> {
        self.messages.lock().clone()
    }

    /// Get the contexts recorded by context handlers.
    pub fn contexts(&self) -> Vec<Context> {
        self.contexts.lock().clone()
    }

    /// Get the number of recorded messages.
    pub fn count(&self) -> usize {
        self.messages.lock().len()
    }

    /// Clear everything recorded so far.
    pub fn clear(&self) {
        self.messages.lock().clear();
        self.contexts.lock().clear();
    }
}

impl<M: Message + Clone> Default for Recorder<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Clone for Recorder<M> {
    fn clone(&self) -> Self {
        Self {
            messages: Arc::clone(&self.messages),
            contexts: Arc::clone(&self.contexts),
        }
    }
}

// ============================================================================
// Counting Handler
// ============================================================================

/// A handler factory that counts invocations.
///
/// # Example
///
/// ```rust
/// use courier::{Context, Mediator, testing::CountingHandler};
///
/// #[derive(Clone)]
/// struct Ping;
///
/// let counter = CountingHandler::new();
/// let mediator = Mediator::new();
/// mediator.register(counter.handler::<Ping>())?;
///
/// mediator.send(&Context::background(), Ping)?;
/// assert_eq!(counter.count(), 1);
/// # Ok::<(), courier::MediatorError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct CountingHandler {
    count: Arc<AtomicUsize>,
}

impl CountingHandler {
    /// Create a new counting handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// A `(M)` handler that increments the count.
    pub fn handler<M: Message + Clone>(&self) -> impl Fn(M) + Send + Sync + use<M> {
        let count = Arc::clone(&self.count);
        move |_message: M| {
            count.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}
