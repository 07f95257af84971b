//! The dispatch registry and its builder.
//!
//! This module provides the [`Mediator`], which indexes event subscriptions
//! and command registrations by message type, and a builder for wiring one
//! up before it is shared.

pub mod builder;
pub mod mediator;
mod tables;

pub use builder::MediatorBuilder;
pub use mediator::Mediator;
