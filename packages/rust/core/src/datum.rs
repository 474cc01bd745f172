//! Dynamically typed pipeline values.
//!
//! A [`Datum`] is what flows between pipeline stages. It remembers the exact
//! concrete type it was built from so verbs can dispatch on it.

use std::any::{Any, TypeId};
use std::fmt;

use pipeverb_shared::{PipeVerbError, Result};

/// An owned value of any `'static` type, tagged with its exact runtime type.
pub struct Datum {
    value: Box<dyn Any + Send + Sync>,
    type_id: TypeId,
    type_name: String,
}

impl Datum {
    /// Wrap a concrete value.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            value: Box::new(value),
            type_id: TypeId::of::<T>(),
            type_name: short_type_name(std::any::type_name::<T>()),
        }
    }

    /// Exact runtime type of the wrapped value.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Short, module-path-free name of the wrapped type (e.g. `Vec<i64>`).
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Whether the wrapped value is exactly a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Borrow the wrapped value as a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Unwrap into a `T`, failing with a type mismatch otherwise.
    pub fn downcast<T: Any>(self) -> Result<T> {
        let found = self.type_name;
        self.value
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| PipeVerbError::TypeMismatch {
                expected: short_type_name(std::any::type_name::<T>()),
                found,
            })
    }
}

impl fmt::Debug for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Datum")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// Strip module paths from every path in a `std::any::type_name` string.
///
/// `alloc::vec::Vec<alloc::string::String>` becomes `Vec<String>`.
pub fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment = String::new();
    let mut chars = full.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_alphanumeric() || c == '_' {
            segment.push(c);
        } else if c == ':' && chars.peek() == Some(&':') {
            chars.next();
            segment.clear();
        } else {
            out.push_str(&segment);
            segment.clear();
            out.push(c);
        }
    }
    out.push_str(&segment);
    out
}
