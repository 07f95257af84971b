//! Handler signature classification.
//!
//! A [`Signature`] records what a handler declares: the type of each
//! parameter and how many values it returns. [`Signature::classify`] maps it
//! onto one of the six supported [`Shape`]s or rejects it.
//!
//! | inputs                  | outputs | shape                              |
//! |-------------------------|---------|------------------------------------|
//! | `(M)`                   | 0, 1, 2 | [`Arity::Message`]                 |
//! | `(Context, M)`          | 0, 1, 2 | [`Arity::ContextAndMessage`]       |
//! | anything else           | any     | [`SignatureError`]                 |
//!
//! The context is recognized by comparing the *declared* parameter type with
//! [`Context`]. A message type that merely contains a context is a message.

use crate::{context::Context, error::SignatureError, message::TypeKey};

/// Which parameters a handler takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// `(message)`
    Message,
    /// `(context, message)`
    ContextAndMessage,
}

/// How many values a handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Returns {
    /// No output.
    Nothing,
    /// One output: a value or an error.
    Single,
    /// Two outputs: a value and an optional error.
    Pair,
}

impl Returns {
    /// Maps an output count onto a supported return shape.
    pub fn from_count(outputs: usize) -> Result<Self, SignatureError> {
        match outputs {
            0 => Ok(Returns::Nothing),
            1 => Ok(Returns::Single),
            2 => Ok(Returns::Pair),
            n => Err(SignatureError::TooManyOutputs(n)),
        }
    }
}

/// A classified handler signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    /// The message type the handler is keyed by.
    pub key: TypeKey,
    /// Whether the handler takes the context.
    pub arity: Arity,
    /// How many values it returns.
    pub returns: Returns,
}

impl Shape {
    /// Returns `true` if the handler expects the context as first argument.
    pub fn takes_context(&self) -> bool {
        self.arity == Arity::ContextAndMessage
    }
}

/// The declared parameter types and output count of a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    inputs: Vec<TypeKey>,
    outputs: usize,
}

impl Signature {
    /// Creates a signature from declared parameter types and an output count.
    pub fn new(inputs: Vec<TypeKey>, outputs: usize) -> Self {
        Self { inputs, outputs }
    }

    /// The declared parameter types, in order.
    pub fn inputs(&self) -> &[TypeKey] {
        &self.inputs
    }

    /// The number of values the handler returns.
    pub fn outputs(&self) -> usize {
        self.outputs
    }

    /// Classifies the signature into a supported [`Shape`].
    pub fn classify(&self) -> Result<Shape, SignatureError> {
        let (key, arity) = match *self.inputs.as_slice() {
            [] => return Err(SignatureError::NoInputs),
            [message] => (message, Arity::Message),
            [first, message] if is_context(&first) => (message, Arity::ContextAndMessage),
            [first, second] => return Err(SignatureError::ContextNotFirst { first, second }),
            ref more => return Err(SignatureError::TooManyInputs(more.len())),
        };

        Ok(Shape {
            key,
            arity,
            returns: Returns::from_count(self.outputs)?,
        })
    }
}

/// Returns `true` if `key` is the context carrier type.
pub fn is_context(key: &TypeKey) -> bool {
    key.is::<Context>()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FooEvent;
    struct Other;

    struct CarriesContext {
        #[allow(dead_code)]
        ctx: Context,
    }

    fn sig(inputs: Vec<TypeKey>, outputs: usize) -> Signature {
        Signature::new(inputs, outputs)
    }

    #[test]
    fn test_message_only() {
        let shape = sig(vec![TypeKey::of::<FooEvent>()], 0).classify().unwrap();
        assert_eq!(shape.key, TypeKey::of::<FooEvent>());
        assert_eq!(shape.arity, Arity::Message);
        assert_eq!(shape.returns, Returns::Nothing);
        assert!(!shape.takes_context());
    }

    #[test]
    fn test_context_and_message() {
        let shape = sig(vec![TypeKey::of::<Context>(), TypeKey::of::<FooEvent>()], 2)
            .classify()
            .unwrap();
        assert_eq!(shape.key, TypeKey::of::<FooEvent>());
        assert!(shape.takes_context());
        assert_eq!(shape.returns, Returns::Pair);
    }

    #[test]
    fn test_lone_context_is_the_message() {
        let shape = sig(vec![TypeKey::of::<Context>()], 1).classify().unwrap();
        assert_eq!(shape.key, TypeKey::of::<Context>());
        assert_eq!(shape.arity, Arity::Message);
        assert_eq!(shape.returns, Returns::Single);
    }

    #[test]
    fn test_wrapper_around_context_is_not_the_context() {
        let shape = sig(vec![TypeKey::of::<CarriesContext>()], 0)
            .classify()
            .unwrap();
        assert_eq!(shape.key, TypeKey::of::<CarriesContext>());

        let err = sig(
            vec![TypeKey::of::<CarriesContext>(), TypeKey::of::<FooEvent>()],
            0,
        )
        .classify()
        .unwrap_err();
        assert!(matches!(err, SignatureError::ContextNotFirst { .. }));
    }

    #[test]
    fn test_rejections() {
        assert_eq!(sig(vec![], 0).classify(), Err(SignatureError::NoInputs));
        assert_eq!(
            sig(
                vec![
                    TypeKey::of::<Context>(),
                    TypeKey::of::<FooEvent>(),
                    TypeKey::of::<Other>()
                ],
                0
            )
            .classify(),
            Err(SignatureError::TooManyInputs(3))
        );
        assert_eq!(
            sig(vec![TypeKey::of::<FooEvent>()], 3).classify(),
            Err(SignatureError::TooManyOutputs(3))
        );
        assert_eq!(
            sig(vec![TypeKey::of::<FooEvent>(), TypeKey::of::<Context>()], 0).classify(),
            Err(SignatureError::ContextNotFirst {
                first: TypeKey::of::<FooEvent>(),
                second: TypeKey::of::<Context>(),
            })
        );
    }
}
