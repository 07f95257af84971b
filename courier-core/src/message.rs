//! Message trait and runtime type keys.

use std::{
    any::{Any, TypeId},
    fmt,
    hash::{Hash, Hasher},
};

/// A marker trait for events and commands routed through a mediator.
///
/// Messages must be `'static + Send + Sync` so they can be stored, erased to
/// `dyn Any` and shared between threads. Every such type is a message; there
/// is nothing to implement.
///
/// # Example
///
/// ```rust
/// use courier_core::Message;
///
/// #[derive(Clone)]
/// struct UserCreated { id: u64 }
///
/// fn assert_message<M: Message>() {}
/// assert_message::<UserCreated>();
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a valid Message",
    label = "must be `Send + Sync + 'static`",
    note = "Messages routed by courier must be thread-safe and own their data."
)]
pub trait Message: Any + Send + Sync {}

impl<T: Any + Send + Sync> Message for T {}

/// The runtime identity of a message type.
///
/// Equality and hashing use the [`TypeId`] only; the type name is carried
/// for diagnostics.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Returns the key for `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The underlying [`TypeId`].
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The type name as reported by [`std::any::type_name`].
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` if this key identifies `T`.
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeKey").field(&self.name).finish()
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
