//! # Handler Adaptation
//!
//! Turns plain functions and closures into the one canonical shape the
//! mediator stores: [`BoxedHandler`], a `(&Context, &dyn Any) -> Outcome`
//! call plus the [`Shape`] it was classified as.
//!
//! # Design Philosophy
//!
//! - **Classified once**: parameter types and output count are read from the
//!   function's type through [`IntoHandler::signature`] and classified when the
//!   handler is registered, never at dispatch time
//! - **Closed set**: only `(M)` and `(Context, M)` with 0, 1 or 2 outputs are
//!   accepted; everything else is rejected with a [`SignatureError`]
//! - **Declared types only**: the context slot is recognized by the declared
//!   parameter type, so a message that wraps a context is still a message
//!
//! # Usage Patterns
//!
//! 1. **Event handler**: `|event: UserCreated| { ... }`
//! 2. **With context**: `|ctx: Context, event: UserCreated| -> Result<(), E> { ... }`
//! 3. **Command handler**: `|cmd: GetUser| -> Result<Value<User>, E> { ... }`

use crate::{
    context::Context,
    error::{MediatorError, SignatureError},
    message::{Message, TypeKey},
    outcome::{IntoOutcome, Outcome},
    signature::{Shape, Signature},
};
use std::{any::Any, fmt, sync::Arc};

/// The canonical, type-erased handler call.
pub type HandlerFn =
    dyn Fn(&Context, &dyn Any) -> Result<Outcome, MediatorError> + Send + Sync + 'static;

/// A classified handler erased to the canonical call shape.
///
/// Cloning is cheap; clones share the same underlying function.
#[derive(Clone)]
pub struct BoxedHandler {
    shape: Shape,
    call: Arc<HandlerFn>,
}

impl BoxedHandler {
    /// The classified shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// The message type this handler is keyed by.
    pub fn key(&self) -> TypeKey {
        self.shape.key
    }

    /// Invokes the handler.
    ///
    /// The context is forwarded only if the handler declared it.
    ///
    /// # Errors
    ///
    /// [`MediatorError::MessageMismatch`] if `M` is not the type named by
    /// [`key`](Self::key).
    pub fn invoke<M: Message>(
        &self,
        ctx: &Context,
        message: &M,
    ) -> Result<Outcome, MediatorError> {
        if !self.shape.key.is::<M>() {
            return Err(MediatorError::MessageMismatch {
                expected: self.shape.key,
                found: Some(std::any::type_name::<M>()),
            });
        }
        (self.call)(ctx, message)
    }
}

impl fmt::Debug for BoxedHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoxedHandler")
            .field("shape", &self.shape)
            .finish_non_exhaustive()
    }
}

/// Conversion of a function into a [`BoxedHandler`].
///
/// `Args` is a marker for the parameter list so that functions of different
/// arity get distinct implementations. Implementations exist for functions
/// of zero to three parameters; only the one- and two-parameter forms
/// classify successfully.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be used as a message handler",
    label = "unsupported handler",
    note = "Handlers take `(M)` or `(Context, M)` by value, where `M: Clone + Send + Sync + 'static`, and return an `IntoOutcome` type."
)]
pub trait IntoHandler<Args>: Send + Sync + Sized + 'static {
    /// The declared parameter types and output count.
    fn signature() -> Signature;

    /// Erases the function without validating its signature.
    #[doc(hidden)]
    fn erase(self) -> Arc<HandlerFn>;

    /// Classifies and erases the function.
    fn into_handler(self) -> Result<BoxedHandler, SignatureError> {
        let shape = Self::signature().classify()?;
        Ok(BoxedHandler {
            shape,
            call: self.erase(),
        })
    }
}

fn message_argument<M: Message + Clone>(message: &dyn Any) -> Result<M, MediatorError> {
    message
        .downcast_ref::<M>()
        .cloned()
        .ok_or_else(|| MediatorError::MessageMismatch {
            expected: TypeKey::of::<M>(),
            found: None,
        })
}

fn context_argument<A: Message + Clone>(ctx: &Context) -> Result<A, MediatorError> {
    (ctx as &dyn Any)
        .downcast_ref::<A>()
        .cloned()
        .ok_or_else(|| MediatorError::MessageMismatch {
            expected: TypeKey::of::<A>(),
            found: Some(std::any::type_name::<Context>()),
        })
}

impl<F, R> IntoHandler<()> for F
where
    F: Fn() -> R + Send + Sync + 'static,
    R: IntoOutcome,
{
    fn signature() -> Signature {
        Signature::new(Vec::new(), R::OUTPUTS)
    }

    fn erase(self) -> Arc<HandlerFn> {
        Arc::new(move |_ctx: &Context, _message: &dyn Any| -> Result<Outcome, MediatorError> {
            Err(SignatureError::NoInputs.into())
        })
    }
}

impl<F, M, R> IntoHandler<(M,)> for F
where
    F: Fn(M) -> R + Send + Sync + 'static,
    M: Message + Clone,
    R: IntoOutcome,
{
    fn signature() -> Signature {
        Signature::new(vec![TypeKey::of::<M>()], R::OUTPUTS)
    }

    fn erase(self) -> Arc<HandlerFn> {
        Arc::new(move |_ctx: &Context, message: &dyn Any| -> Result<Outcome, MediatorError> {
            let message = message_argument::<M>(message)?;
            Ok(self(message).into_outcome())
        })
    }
}

impl<F, A, M, R> IntoHandler<(A, M)> for F
where
    F: Fn(A, M) -> R + Send + Sync + 'static,
    A: Message + Clone,
    M: Message + Clone,
    R: IntoOutcome,
{
    fn signature() -> Signature {
        Signature::new(vec![TypeKey::of::<A>(), TypeKey::of::<M>()], R::OUTPUTS)
    }

    // Classification only admits this impl when `A` is `Context`.
    fn erase(self) -> Arc<HandlerFn> {
        Arc::new(move |ctx: &Context, message: &dyn Any| -> Result<Outcome, MediatorError> {
            let ctx = context_argument::<A>(ctx)?;
            let message = message_argument::<M>(message)?;
            Ok(self(ctx, message).into_outcome())
        })
    }
}

impl<F, A, B, C, R> IntoHandler<(A, B, C)> for F
where
    F: Fn(A, B, C) -> R + Send + Sync + 'static,
    A: 'static,
    B: 'static,
    C: 'static,
    R: IntoOutcome,
{
    fn signature() -> Signature {
        Signature::new(
            vec![TypeKey::of::<A>(), TypeKey::of::<B>(), TypeKey::of::<C>()],
            R::OUTPUTS,
        )
    }

    fn erase(self) -> Arc<HandlerFn> {
        Arc::new(move |_ctx: &Context, _message: &dyn Any| -> Result<Outcome, MediatorError> {
            Err(SignatureError::TooManyInputs(3).into())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::BoxError,
        signature::{Arity, Returns},
    };

    #[derive(Clone, Debug, PartialEq)]
    struct Ping(u32);

    fn boxed<Args, H: IntoHandler<Args>>(handler: H) -> Result<BoxedHandler, SignatureError> {
        handler.into_handler()
    }

    #[test]
    fn test_message_only_handler() {
        let handler = boxed(|ping: Ping| ping.0 * 2).unwrap();
        assert_eq!(handler.key(), TypeKey::of::<Ping>());
        assert_eq!(handler.shape().arity, Arity::Message);
        assert_eq!(handler.shape().returns, Returns::Single);

        let outcome = handler.invoke(&Context::background(), &Ping(21)).unwrap();
        assert_eq!(outcome.result.take::<u32>(), Some(42));
    }

    #[test]
    fn test_context_handler_receives_context() {
        struct Marker(&'static str);

        let handler = boxed(|ctx: Context, _ping: Ping| {
            ctx.value::<Marker>().map(|m| m.0.to_string()).unwrap_or_default()
        })
        .unwrap();
        assert_eq!(handler.shape().arity, Arity::ContextAndMessage);

        let ctx = Context::background().with_value(Marker("seen"));
        let outcome = handler.invoke(&ctx, &Ping(1)).unwrap();
        assert_eq!(outcome.result.take::<String>().as_deref(), Some("seen"));
    }

    #[test]
    fn test_pair_output() {
        let handler = boxed(|ping: Ping| -> Result<u32, BoxError> {
            if ping.0 == 0 {
                Err("zero".into())
            } else {
                Ok(ping.0)
            }
        })
        .unwrap();
        assert_eq!(handler.shape().returns, Returns::Pair);

        let ctx = Context::background();
        assert!(handler.invoke(&ctx, &Ping(1)).unwrap().error.is_none());
        assert!(handler.invoke(&ctx, &Ping(0)).unwrap().error.is_some());
    }

    #[test]
    fn test_rejected_signatures() {
        assert_eq!(boxed(|| ()).unwrap_err(), SignatureError::NoInputs);
        assert_eq!(
            boxed(|_a: Ping, _b: u8, _c: u8| ()).unwrap_err(),
            SignatureError::TooManyInputs(3)
        );
        assert!(matches!(
            boxed(|_a: u8, _b: Ping| ()).unwrap_err(),
            SignatureError::ContextNotFirst { .. }
        ));
        assert_eq!(
            boxed(|_p: Ping| (1u8, 2u8, 3u8)).unwrap_err(),
            SignatureError::TooManyOutputs(3)
        );
    }

    #[test]
    fn test_wrong_message_type_is_reported() {
        let handler = boxed(|_ping: Ping| ()).unwrap();
        let err = handler
            .invoke(&Context::background(), &"not a ping")
            .unwrap_err();
        assert!(matches!(
            err,
            MediatorError::MessageMismatch { expected, found: Some("&str") }
                if expected.is::<Ping>()
        ));
        assert!(err.to_string().ends_with("got &str"));
    }

    #[test]
    fn test_erased_call_without_type_reports_unknown() {
        let call = IntoHandler::<(Ping,)>::erase(|_ping: Ping| ());
        let err = call(&Context::background(), &0u8).unwrap_err();
        assert!(matches!(
            err,
            MediatorError::MessageMismatch { found: None, .. }
        ));
        assert!(err.to_string().ends_with("got a value of unknown type"));
    }

    #[test]
    fn test_fn_items_are_handlers() {
        fn on_ping(ping: Ping) -> String {
            format!("pong {}", ping.0)
        }

        let handler = boxed(on_ping).unwrap();
        let outcome = handler.invoke(&Context::background(), &Ping(3)).unwrap();
        assert_eq!(outcome.result.take::<String>().as_deref(), Some("pong 3"));
    }
}
