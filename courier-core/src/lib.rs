//! # courier-core
//!
//! Core types for the Courier mediator.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! crates that declare messages and handlers without depending on the
//! registry itself.
//!
//! # Building Blocks
//!
//! ## Messages ([`Message`], [`TypeKey`])
//!
//! Any `'static + Send + Sync` value is a message. Handlers are indexed by
//! the [`TypeKey`] of the message type they accept.
//!
//! ## Context ([`Context`])
//!
//! The request-scoped carrier of cancellation, deadline and values. A
//! handler opts in by declaring `Context` as its first parameter.
//!
//! ## Signatures ([`Signature`], [`Shape`])
//!
//! What a handler declares, and the closed set of shapes a mediator accepts:
//! `(M)` or `(Context, M)`, returning zero, one or two values.
//!
//! ## Outcomes ([`IntoOutcome`], [`Outcome`], [`Reply`])
//!
//! How a handler's return value becomes a (result, error) pair.
//!
//! ## Handlers ([`IntoHandler`], [`BoxedHandler`])
//!
//! Adaptation of plain functions into one canonical, type-erased call.
//!
//! # Error Types
//!
//! - [`MediatorError`] - Registration and dispatch errors
//! - [`SignatureError`] - Rejected handler signatures
//! - [`ContextError`] - Cancellation and deadline errors

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod context;
mod error;
mod handler;
mod message;
mod outcome;
mod signature;

// Re-exports
pub use context::{CancelHandle, Context};
pub use error::{BoxError, ContextError, MediatorError, SignatureError};
pub use handler::{BoxedHandler, HandlerFn, IntoHandler};
pub use message::{Message, TypeKey};
pub use outcome::{IntoOutcome, Outcome, Reply, Value};
pub use signature::{Arity, Returns, Shape, Signature, is_context};
