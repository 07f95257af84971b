//! Handler output normalization.
//!
//! Every handler return type implements [`IntoOutcome`], which declares how
//! many outputs the type stands for and turns a returned value into the
//! canonical [`Outcome`] pair.
//!
//! # Default Implementations
//!
//! - `()` → no outputs
//! - [`BoxError`] → one output, always an error
//! - `String`, `&'static str`, `bool`, `char`, numbers, `Vec<T>`, [`Reply`],
//!   [`Value<T>`] → one output, always a result
//! - `Result<T, E>` → two outputs; `Err` carries no result
//! - `(T, Option<E>)` → two outputs; the result is kept even with an error
//! - 3- and 4-tuples → more outputs than supported, rejected at registration

use crate::error::BoxError;
use std::{
    any::{Any, TypeId},
    fmt,
};

/// A type-erased command result.
///
/// `Reply` is empty when the handler produced no result value.
pub struct Reply {
    value: Option<Box<dyn Any + Send>>,
    type_name: &'static str,
}

impl Reply {
    /// An empty reply.
    pub fn none() -> Self {
        Self {
            value: None,
            type_name: "()",
        }
    }

    /// Wraps a result value. A unit value yields an empty reply.
    pub fn new<T: Any + Send>(value: T) -> Self {
        if TypeId::of::<T>() == TypeId::of::<()>() {
            return Self::none();
        }
        Self {
            value: Some(Box::new(value)),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Returns `true` if there is no result value.
    pub fn is_none(&self) -> bool {
        self.value.is_none()
    }

    /// Returns `true` if there is a result value.
    pub fn is_some(&self) -> bool {
        self.value.is_some()
    }

    /// Returns `true` if the result value is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.value.as_deref().is_some_and(|v| v.is::<T>())
    }

    /// The type name of the result value, `"()"` when empty.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Borrows the result value as a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.as_deref().and_then(|v| v.downcast_ref::<T>())
    }

    /// Takes the result value as a `T`, handing the reply back on mismatch.
    pub fn downcast<T: Any>(self) -> Result<T, Self> {
        match self.value {
            Some(value) => match value.downcast::<T>() {
                Ok(value) => Ok(*value),
                Err(value) => Err(Self {
                    value: Some(value),
                    type_name: self.type_name,
                }),
            },
            None => Err(self),
        }
    }

    /// Takes the result value as a `T`, dropping it on mismatch.
    pub fn take<T: Any>(self) -> Option<T> {
        self.downcast().ok()
    }
}

impl Default for Reply {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Debug for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Some(_) => f.debug_tuple("Reply").field(&self.type_name).finish(),
            None => f.write_str("Reply(None)"),
        }
    }
}

/// The normalized (result, error) pair of one handler invocation.
#[derive(Debug, Default)]
pub struct Outcome {
    /// The result value, if any.
    pub result: Reply,
    /// The handler's error, if any.
    pub error: Option<BoxError>,
}

impl Outcome {
    /// An outcome with neither result nor error.
    pub fn empty() -> Self {
        Self::default()
    }

    /// An outcome carrying only a result.
    pub fn value<T: Any + Send>(value: T) -> Self {
        Self {
            result: Reply::new(value),
            error: None,
        }
    }

    /// An outcome carrying only an error.
    pub fn error(error: impl Into<BoxError>) -> Self {
        Self {
            result: Reply::none(),
            error: Some(error.into()),
        }
    }

    /// Returns `true` if the handler produced an error.
    pub fn is_err(&self) -> bool {
        self.error.is_some()
    }

    /// Collapses into a `Result`; a populated error wins over the result.
    pub fn into_result(self) -> Result<Reply, BoxError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.result),
        }
    }
}

/// Trait for converting a handler's return value into an [`Outcome`].
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a supported handler return type",
    label = "missing `IntoOutcome` implementation",
    note = "Return `()`, a value, `Result<T, E>`, `(T, Option<E>)`, or wrap custom types in `Value<T>`."
)]
pub trait IntoOutcome: Send + 'static {
    /// How many outputs this return type stands for.
    const OUTPUTS: usize;

    /// Converts the returned value.
    fn into_outcome(self) -> Outcome;
}

impl IntoOutcome for () {
    const OUTPUTS: usize = 0;

    fn into_outcome(self) -> Outcome {
        Outcome::empty()
    }
}

impl IntoOutcome for BoxError {
    const OUTPUTS: usize = 1;

    fn into_outcome(self) -> Outcome {
        Outcome::error(self)
    }
}

impl IntoOutcome for Reply {
    const OUTPUTS: usize = 1;

    fn into_outcome(self) -> Outcome {
        Outcome {
            result: self,
            error: None,
        }
    }
}

/// Wraps an arbitrary value returned as a handler's single output.
///
/// ```rust
/// use courier_core::{IntoOutcome, Value};
///
/// struct User { id: u64 }
///
/// let outcome = Value(User { id: 1 }).into_outcome();
/// assert_eq!(outcome.result.take::<User>().map(|u| u.id), Some(1));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Value<T>(pub T);

impl<T: Any + Send> IntoOutcome for Value<T> {
    const OUTPUTS: usize = 1;

    fn into_outcome(self) -> Outcome {
        Outcome::value(self.0)
    }
}

macro_rules! impl_single_value {
    ($($T:ty),+ $(,)?) => {
        $(
            impl IntoOutcome for $T {
                const OUTPUTS: usize = 1;

                fn into_outcome(self) -> Outcome {
                    Outcome::value(self)
                }
            }
        )+
    };
}

impl_single_value!(
    String, &'static str, bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128,
    usize, f32, f64,
);

impl<T: Any + Send> IntoOutcome for Vec<T> {
    const OUTPUTS: usize = 1;

    fn into_outcome(self) -> Outcome {
        Outcome::value(self)
    }
}

impl<T, E> IntoOutcome for Result<T, E>
where
    T: Any + Send,
    E: Into<BoxError> + Send + 'static,
{
    const OUTPUTS: usize = 2;

    fn into_outcome(self) -> Outcome {
        match self {
            Ok(value) => Outcome::value(value),
            Err(err) => Outcome::error(err),
        }
    }
}

impl<T, E> IntoOutcome for (T, Option<E>)
where
    T: Any + Send,
    E: Into<BoxError> + Send + 'static,
{
    const OUTPUTS: usize = 2;

    fn into_outcome(self) -> Outcome {
        let (value, error) = self;
        Outcome {
            result: Reply::new(value),
            error: error.map(Into::into),
        }
    }
}

// Wider tuples only exist so their output count can be reported; registration
// rejects them before they can be invoked.
macro_rules! impl_unsupported_tuple {
    ($count:expr; $($T:ident),+) => {
        impl<$($T: Any + Send,)+> IntoOutcome for ($($T,)+) {
            const OUTPUTS: usize = $count;

            fn into_outcome(self) -> Outcome {
                Outcome::value(self)
            }
        }
    };
}

impl_unsupported_tuple!(3; A, B, C);
impl_unsupported_tuple!(4; A, B, C, D);
