//! Error types for Courier.
//!
//! - [`MediatorError`] - Errors returned by registration and dispatch
//! - [`SignatureError`] - Why a handler signature could not be classified
//! - [`ContextError`] - Why a [`Context`](crate::Context) is done

use crate::message::TypeKey;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by a mediator.
#[derive(Error, Debug)]
pub enum MediatorError {
    /// A command handler was already registered for this command type.
    #[error("handler already registered for command {command}")]
    DuplicateHandler {
        /// The command type.
        command: TypeKey,
    },

    /// No handler is registered for this command type.
    #[error("no handlers for command {command}")]
    NoHandlerRegistered {
        /// The command type.
        command: TypeKey,
    },

    /// The handler's own error, surfaced unchanged.
    #[error(transparent)]
    Handler(BoxError),

    /// The handler's signature is outside the supported set.
    #[error("unsupported handler signature: {0}")]
    UnsupportedSignature(#[from] SignatureError),

    /// An erased handler was invoked with a message of the wrong type.
    #[error("handler expected {expected}, got {}", .found.unwrap_or("a value of unknown type"))]
    MessageMismatch {
        /// The type the handler was registered for.
        expected: TypeKey,
        /// The type it was invoked with, when known.
        found: Option<&'static str>,
    },
}

impl MediatorError {
    /// Returns `true` if this is a handler's own error.
    pub fn is_handler_error(&self) -> bool {
        matches!(self, MediatorError::Handler(_))
    }

    /// Returns the handler's original error, if this is one.
    pub fn into_handler_error(self) -> Option<BoxError> {
        match self {
            MediatorError::Handler(err) => Some(err),
            _ => None,
        }
    }

    /// Returns a reference to the handler's error downcast to `E`.
    pub fn handler_error<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            MediatorError::Handler(err) => err.downcast_ref::<E>(),
            _ => None,
        }
    }
}

/// Reasons a handler signature is rejected at registration time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    /// The handler takes no parameters, so there is no message type to key on.
    #[error("handler takes no parameters")]
    NoInputs,

    /// The handler takes more than two parameters.
    #[error("handler takes {0} parameters, at most 2 are supported")]
    TooManyInputs(usize),

    /// The handler takes two parameters but the first is not the context.
    #[error("first of two parameters must be the context, found ({first}, {second})")]
    ContextNotFirst {
        /// The declared first parameter.
        first: TypeKey,
        /// The declared second parameter.
        second: TypeKey,
    },

    /// The handler produces more than two outputs.
    #[error("handler returns {0} values, at most 2 are supported")]
    TooManyOutputs(usize),
}

/// Why a context is done.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    /// The context was cancelled through its [`CancelHandle`](crate::CancelHandle).
    #[error("context cancelled")]
    Cancelled,

    /// The context's deadline has passed.
    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

// Convenience conversions
impl From<BoxError> for MediatorError {
    fn from(err: BoxError) -> Self {
        MediatorError::Handler(err)
    }
}
