//! # courier - In-Process Event Publication and Command Dispatch
//!
//! `courier` decouples the code that raises an event or issues a command
//! from the code that handles it. Handlers are plain functions indexed by
//! the type of their message parameter.
//!
//! - **Events** are published to every subscriber, in subscription order.
//! - **Commands** are sent to the single handler registered for their type.
//!
//! ## Quick Start
//!
//! ```rust
//! use courier::prelude::*;
//!
//! #[derive(Clone)]
//! struct UserCreated { name: String }
//!
//! #[derive(Clone)]
//! struct CountUsers;
//!
//! let mediator = Mediator::new();
//! mediator.subscribe(|event: UserCreated| println!("welcome, {}", event.name))?;
//! mediator.register(|ctx: Context, _cmd: CountUsers| -> Result<usize, BoxError> {
//!     ctx.check()?;
//!     Ok(42)
//! })?;
//!
//! let ctx = Context::background();
//! mediator.publish(&ctx, UserCreated { name: "ada".into() })?;
//!
//! let reply = mediator.send(&ctx, CountUsers)?;
//! assert_eq!(reply.take::<usize>(), Some(42));
//! # Ok::<(), MediatorError>(())
//! ```
//!
//! ## Handler Shapes
//!
//! A handler takes `(M)` or `(Context, M)` and returns one of:
//!
//! | Return type              | Result      | Error            |
//! |--------------------------|-------------|------------------|
//! | `()`                     | none        | none             |
//! | `T`                      | the value   | none             |
//! | `BoxError`               | none        | the value        |
//! | `Result<T, E>`           | `Ok` value  | `Err` value      |
//! | `(T, Option<E>)`         | the value   | the option       |
//!
//! Anything else is rejected with [`MediatorError::UnsupportedSignature`]
//! when the handler is subscribed or registered.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub mod registry;
pub mod testing;

pub use courier_core::{
    // Signatures
    Arity,
    // Handler adaptation
    BoxedHandler,
    // Errors
    BoxError,
    // Context
    CancelHandle,
    Context,
    ContextError,
    HandlerFn,
    IntoHandler,
    // Outcomes
    IntoOutcome,
    MediatorError,
    // Messages
    Message,
    Outcome,
    Reply,
    Returns,
    Shape,
    Signature,
    SignatureError,
    TypeKey,
    Value,
};

pub use registry::{Mediator, MediatorBuilder};

/// Prelude module - common imports for Courier.
///
/// # Usage
///
/// ```rust
/// use courier::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        BoxError, Context, IntoOutcome, Mediator, MediatorBuilder, MediatorError, Message, Reply,
        Value,
    };
}
