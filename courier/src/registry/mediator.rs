//! The dispatch registry.
//!
//! [`Mediator`] owns the subscription and registration tables and runs
//! handlers synchronously on the caller's thread.

use super::{builder::MediatorBuilder, tables::Tables};
use courier_core::{
    BoxedHandler, Context, IntoHandler, Message, MediatorError, Outcome, Reply, TypeKey,
};
use parking_lot::RwLock;
use std::sync::Arc;

/// An in-process mediator for events and commands.
///
/// Events go to every subscriber of their type, in subscription order.
/// Commands go to the single handler registered for their type.
///
/// Handlers are indexed by the type of their message parameter. A handler
/// may take the [`Context`] as its first parameter; it then receives the
/// context passed to [`publish`](Self::publish) or [`send`](Self::send).
///
/// Cloning a mediator is cheap; clones share the same tables.
///
/// # Example
///
/// ```rust
/// use courier::{Context, Mediator};
///
/// #[derive(Clone)]
/// struct Greet(&'static str);
///
/// let mediator = Mediator::new();
/// mediator.register(|cmd: Greet| format!("hello, {}", cmd.0))?;
///
/// let reply = mediator.send(&Context::background(), Greet("world"))?;
/// assert_eq!(reply.take::<String>().as_deref(), Some("hello, world"));
/// # Ok::<(), courier::MediatorError>(())
/// ```
#[derive(Clone, Default)]
pub struct Mediator {
    tables: Arc<RwLock<Tables>>,
    label: Option<&'static str>,
}

impl Mediator {
    /// Creates a mediator with empty tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a [`MediatorBuilder`].
    pub fn builder() -> MediatorBuilder {
        MediatorBuilder::new()
    }

    pub(crate) fn from_parts(tables: Tables, label: Option<&'static str>) -> Self {
        Self {
            tables: Arc::new(RwLock::new(tables)),
            label,
        }
    }

    /// The label set through [`MediatorBuilder::label`], if any.
    pub fn label(&self) -> Option<&'static str> {
        self.label
    }

    /// Subscribes an event handler.
    ///
    /// The event type is the handler's message parameter. Handlers for the
    /// same event run in the order they were subscribed; subscribing the same
    /// function twice runs it twice.
    ///
    /// # Errors
    ///
    /// [`MediatorError::UnsupportedSignature`] if the handler is not `(M)` or
    /// `(Context, M)` returning at most two values.
    pub fn subscribe<Args, H>(&self, handler: H) -> Result<(), MediatorError>
    where
        H: IntoHandler<Args>,
    {
        let handler = self.classify(handler)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            event = %handler.key(),
            takes_context = handler.shape().takes_context(),
            "Subscribed event handler"
        );

        self.tables.write().subscribe(handler);
        Ok(())
    }

    /// Publishes an event to its subscribers.
    ///
    /// Subscribers run one after another in subscription order. The first
    /// subscriber that returns an error stops the publication: the remaining
    /// subscribers do not run and the error is returned unchanged. An event
    /// without subscribers is a no-op.
    pub fn publish<E: Message>(&self, ctx: &Context, event: E) -> Result<(), MediatorError> {
        let key = TypeKey::of::<E>();
        let subscribers = self.tables.read().subscribers(&key);

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "publish",
            mediator = self.label.unwrap_or_default(),
            event = %key
        )
        .entered();
        #[cfg(feature = "tracing")]
        tracing::trace!(subscribers = subscribers.len(), "Publishing event");

        for subscriber in &subscribers {
            if let Some(err) = subscriber.invoke(ctx, &event)?.error {
                return Err(MediatorError::Handler(err));
            }
        }
        Ok(())
    }

    /// Registers the command handler.
    ///
    /// # Errors
    ///
    /// - [`MediatorError::DuplicateHandler`] if a handler is already
    ///   registered for the command type; the existing one stays in place.
    /// - [`MediatorError::UnsupportedSignature`] as for
    ///   [`subscribe`](Self::subscribe).
    pub fn register<Args, H>(&self, handler: H) -> Result<(), MediatorError>
    where
        H: IntoHandler<Args>,
    {
        let handler = self.classify(handler)?;
        let command = handler.key();
        let result = self.tables.write().register(handler);

        #[cfg(feature = "tracing")]
        match &result {
            Ok(()) => tracing::debug!(%command, "Registered command handler"),
            Err(err) => tracing::debug!(%command, %err, "Rejected command handler"),
        }
        #[cfg(not(feature = "tracing"))]
        let _ = command;

        result
    }

    /// Sends a command to its handler and returns the handler's result.
    ///
    /// A populated handler error wins over any result the handler returned
    /// alongside it; use [`send_outcome`](Self::send_outcome) to keep both.
    ///
    /// # Errors
    ///
    /// - [`MediatorError::NoHandlerRegistered`] if nothing handles the command.
    /// - [`MediatorError::Handler`] with the handler's own error.
    pub fn send<C: Message>(&self, ctx: &Context, command: C) -> Result<Reply, MediatorError> {
        self.send_outcome(ctx, command)?
            .into_result()
            .map_err(MediatorError::Handler)
    }

    /// Sends a command and returns the handler's full (result, error) pair.
    ///
    /// Only registry failures are returned as `Err`; the handler's own error
    /// is left in [`Outcome::error`].
    pub fn send_outcome<C: Message>(
        &self,
        ctx: &Context,
        command: C,
    ) -> Result<Outcome, MediatorError> {
        let key = TypeKey::of::<C>();
        let handler = self
            .tables
            .read()
            .registration(&key)
            .ok_or(MediatorError::NoHandlerRegistered { command: key })?;

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "send",
            mediator = self.label.unwrap_or_default(),
            command = %key
        )
        .entered();
        #[cfg(feature = "tracing")]
        tracing::trace!(returns = ?handler.shape().returns, "Sending command");

        handler.invoke(ctx, &command)
    }

    /// Returns how many handlers are subscribed to `E`.
    pub fn subscriber_count<E: Message>(&self) -> usize {
        self.tables.read().subscriber_count(&TypeKey::of::<E>())
    }

    /// Returns `true` if a handler is registered for `C`.
    pub fn has_handler<C: Message>(&self) -> bool {
        self.tables.read().has_registration(&TypeKey::of::<C>())
    }

    /// Returns `true` if nothing has been subscribed or registered.
    pub fn is_empty(&self) -> bool {
        self.tables.read().is_empty()
    }

    fn classify<Args, H>(&self, handler: H) -> Result<BoxedHandler, MediatorError>
    where
        H: IntoHandler<Args>,
    {
        handler.into_handler().map_err(|err| {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                mediator = self.label.unwrap_or_default(),
                %err,
                "Rejected handler signature"
            );
            MediatorError::UnsupportedSignature(err)
        })
    }
}

impl std::fmt::Debug for Mediator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mediator")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_core::{BoxError, SignatureError};

    #[derive(Clone)]
    struct FooEvent;

    #[derive(Clone)]
    struct BarEvent;

    #[derive(Clone)]
    struct FooCmd;

    #[test]
    fn test_new_mediator_is_empty() {
        let mediator = Mediator::new();
        assert!(mediator.is_empty());
        assert_eq!(mediator.subscriber_count::<FooEvent>(), 0);
        assert!(!mediator.has_handler::<FooCmd>());
        assert_eq!(mediator.label(), None);
    }

    #[test]
    fn test_clones_share_tables() {
        let mediator = Mediator::new();
        let clone = mediator.clone();
        clone.subscribe(|_e: FooEvent| ()).unwrap();
        assert_eq!(mediator.subscriber_count::<FooEvent>(), 1);
    }

    #[test]
    fn test_publish_without_subscribers() {
        let mediator = Mediator::new();
        mediator.subscribe(|_e: FooEvent| ()).unwrap();
        assert!(mediator.publish(&Context::background(), BarEvent).is_ok());
    }

    #[test]
    fn test_send_without_handler() {
        let mediator = Mediator::new();
        let err = mediator
            .send(&Context::background(), FooCmd)
            .unwrap_err();
        assert!(
            matches!(err, MediatorError::NoHandlerRegistered { command } if command.is::<FooCmd>())
        );
    }

    #[test]
    fn test_rejected_subscription_leaves_table_unchanged() {
        let mediator = Mediator::new();
        let err = mediator
            .subscribe(|_e: FooEvent| (1u8, 2u8, 3u8))
            .unwrap_err();
        assert!(matches!(
            err,
            MediatorError::UnsupportedSignature(SignatureError::TooManyOutputs(3))
        ));
        assert!(mediator.is_empty());
    }

    #[test]
    fn test_send_outcome_keeps_result_and_error() {
        let mediator = Mediator::new();
        mediator
            .register(|_c: FooCmd| (7u32, Some(BoxError::from("partial"))))
            .unwrap();

        let outcome = mediator
            .send_outcome(&Context::background(), FooCmd)
            .unwrap();
        assert_eq!(outcome.result.downcast_ref::<u32>(), Some(&7));
        assert_eq!(outcome.error.unwrap().to_string(), "partial");

        let err = mediator.send(&Context::background(), FooCmd).unwrap_err();
        assert!(err.is_handler_error());
    }
}
