#![allow(dead_code)]

use courier::Context;
use thiserror::Error;

// ============================================================================
// Test Message Types
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct FooEvent;

#[derive(Clone, Debug, PartialEq)]
pub struct BarEvent;

#[derive(Clone, Debug, PartialEq)]
pub struct FooCmd;

#[derive(Clone, Debug, PartialEq)]
pub struct Lookup {
    pub id: u32,
}

/// A message that carries a context as data.
#[derive(Clone, Debug)]
pub struct Envelope {
    pub inner: Context,
}

// ============================================================================
// Test Errors
// ============================================================================

#[derive(Debug, Error)]
#[error("lookup failed for {id}")]
pub struct LookupError {
    pub id: u32,
}

// ============================================================================
// Logging
// ============================================================================

/// Install a test-writer subscriber once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("courier=trace")),
        )
        .with_test_writer()
        .try_init();
}
