//! Builder for wiring a mediator at startup.

use super::{mediator::Mediator, tables::Tables};
use courier_core::{IntoHandler, MediatorError};

/// Builder for constructing a [`Mediator`].
///
/// Collects subscriptions and registrations before the mediator is shared.
/// The first failing call is remembered and returned by
/// [`build`](Self::build).
///
/// # Example
/// ```rust
/// use courier::Mediator;
///
/// #[derive(Clone)]
/// struct OrderPlaced { id: u64 }
///
/// #[derive(Clone)]
/// struct CancelOrder { id: u64 }
///
/// let mediator = Mediator::builder()
///     .label("orders")
///     .subscribe(|event: OrderPlaced| println!("placed {}", event.id))
///     .register(|cmd: CancelOrder| cmd.id != 0)
///     .build()?;
///
/// assert_eq!(mediator.label(), Some("orders"));
/// assert_eq!(mediator.subscriber_count::<OrderPlaced>(), 1);
/// # Ok::<(), courier::MediatorError>(())
/// ```
#[derive(Default)]
pub struct MediatorBuilder {
    tables: Tables,
    label: Option<&'static str>,
    error: Option<MediatorError>,
}

impl MediatorBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the label recorded on dispatch spans.
    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    /// Subscribe an event handler.
    pub fn subscribe<Args, H: IntoHandler<Args>>(mut self, handler: H) -> Self {
        match handler.into_handler() {
            Ok(handler) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    mediator = self.label.unwrap_or_default(),
                    event = %handler.key(),
                    takes_context = handler.shape().takes_context(),
                    "Subscribed event handler"
                );

                self.tables.subscribe(handler);
            }
            Err(err) => self.fail(err.into()),
        }
        self
    }

    /// Register a command handler.
    pub fn register<Args, H: IntoHandler<Args>>(mut self, handler: H) -> Self {
        let handler = match handler.into_handler() {
            Ok(handler) => handler,
            Err(err) => {
                self.fail(err.into());
                return self;
            }
        };

        let command = handler.key();
        match self.tables.register(handler) {
            Ok(()) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    mediator = self.label.unwrap_or_default(),
                    %command,
                    "Registered command handler"
                );
            }
            Err(err) => self.fail(err),
        }
        #[cfg(not(feature = "tracing"))]
        let _ = command;

        self
    }

    fn fail(&mut self, err: MediatorError) {
        #[cfg(feature = "tracing")]
        tracing::debug!(mediator = self.label.unwrap_or_default(), %err, "Builder call failed");

        self.error.get_or_insert(err);
    }

    /// Build the mediator, or return the first error encountered.
    pub fn build(self) -> Result<Mediator, MediatorError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(Mediator::from_parts(self.tables, self.label)),
        }
    }
}
