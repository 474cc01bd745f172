//! Single dispatch on the exact runtime type of a verb's input.
//!
//! A [`Verb`] owns a dispatch table from concrete type to specialization and
//! one designated default implementation. Lookup is exact: there is no
//! supertype, auto-deref or conversion fallback other than the default.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use pipeverb_shared::{PipeVerbError, Result};
use tracing::debug;

use crate::args::Args;
use crate::datum::{Datum, short_type_name};

/// Type-erased implementation of a verb for one input type.
pub type Specialization = Arc<dyn Fn(Datum, &Args) -> Result<Datum> + Send + Sync>;

struct Entry {
    type_name: String,
    call: Specialization,
}

/// Maps concrete input types to specializations.
#[derive(Default)]
struct DispatchTable {
    entries: HashMap<TypeId, Entry>,
}

impl DispatchTable {
    /// Insert a specialization; returns `true` if it replaced an existing one.
    fn insert(&mut self, type_id: TypeId, type_name: String, call: Specialization) -> bool {
        self.entries
            .insert(type_id, Entry { type_name, call })
            .is_some()
    }

    fn lookup(&self, type_id: TypeId) -> Option<Specialization> {
        self.entries.get(&type_id).map(|e| Arc::clone(&e.call))
    }

    fn type_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.entries.values().map(|e| e.type_name.clone()).collect();
        names.sort();
        names
    }
}

/// A named generic function with per-type specializations.
pub struct Verb {
    name: String,
    table: RwLock<DispatchTable>,
    default: Option<Specialization>,
}

impl Verb {
    /// A verb whose default implementation reports "not implemented".
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: RwLock::new(DispatchTable::default()),
            default: None,
        }
    }

    /// A verb whose default implementation is `f`, applied to any type
    /// without a specialization.
    pub fn with_default<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Datum, &Args) -> Result<Datum> + Send + Sync + 'static,
    {
        Self {
            default: Some(Arc::new(f)),
            ..Self::new(name)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Associate `f` with inputs of exact type `T`.
    ///
    /// Registering a type twice replaces the earlier specialization.
    pub fn register<T, R, F>(&self, f: F)
    where
        T: Any + Send + Sync,
        R: Any + Send + Sync,
        F: Fn(T, &Args) -> Result<R> + Send + Sync + 'static,
    {
        let call: Specialization = Arc::new(move |input: Datum, args: &Args| {
            let value = input.downcast::<T>()?;
            f(value, args).map(Datum::new)
        });
        let type_name = short_type_name(std::any::type_name::<T>());

        let replaced = self
            .table
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(TypeId::of::<T>(), type_name.clone(), call);

        debug!(verb = %self.name, %type_name, replaced, "registered specialization");
    }

    /// Whether a specialization exists for exact type `T`.
    pub fn is_specialized_for<T: Any>(&self) -> bool {
        self.read_table().lookup(TypeId::of::<T>()).is_some()
    }

    /// Short names of every specialized type, sorted.
    pub fn registered_types(&self) -> Vec<String> {
        self.read_table().type_names()
    }

    /// Run the implementation matching the runtime type of `input`.
    pub fn dispatch(&self, input: Datum, args: &Args) -> Result<Datum> {
        // Release the read lock before calling so a specialization may
        // dispatch through this verb again.
        let specialized = self.read_table().lookup(input.type_id());

        match (specialized, &self.default) {
            (Some(call), _) => call(input, args),
            (None, Some(default)) => default(input, args),
            (None, None) => Err(PipeVerbError::unimplemented(
                &self.name,
                input.type_name(),
            )),
        }
    }

    fn read_table(&self) -> RwLockReadGuard<'_, DispatchTable> {
        self.table.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Verb")
            .field("name", &self.name)
            .field("types", &self.registered_types())
            .field("has_default", &self.default.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn describe() -> Verb {
        let verb = Verb::new("describe");
        verb.register(|v: i64, _: &Args| Ok(format!("int {v}")));
        verb.register(|v: String, _: &Args| Ok(format!("text {v}")));
        verb
    }

    #[test]
    fn dispatches_on_exact_type() {
        let verb = describe();
        let out = verb.dispatch(Datum::new(3i64), &Args::new()).expect("i64");
        assert_eq!(out.downcast::<String>().expect("string"), "int 3");

        let out = verb
            .dispatch(Datum::new("hi".to_string()), &Args::new())
            .expect("String");
        assert_eq!(out.downcast::<String>().expect("string"), "text hi");
    }

    #[test]
    fn no_fallback_between_related_types() {
        let verb = describe();
        let err = verb.dispatch(Datum::new(3i32), &Args::new()).unwrap_err();
        assert_eq!(err.to_string(), "describe is not implemented for data of type i32");

        let err = verb.dispatch(Datum::new("hi"), &Args::new()).unwrap_err();
        assert!(matches!(
            err,
            PipeVerbError::Unimplemented { ref type_name, .. } if type_name == "&str"
        ));
    }

    #[test]
    fn custom_default_handles_everything_else() {
        let verb = Verb::with_default("type_of", |input: Datum, _: &Args| {
            Ok(Datum::new(input.type_name().to_string()))
        });
        verb.register(|_: i64, _: &Args| Ok("integer".to_string()));

        let out = verb.dispatch(Datum::new(1i64), &Args::new()).expect("i64");
        assert_eq!(out.downcast::<String>().expect("string"), "integer");

        let out = verb.dispatch(Datum::new(1.5f64), &Args::new()).expect("f64");
        assert_eq!(out.downcast::<String>().expect("string"), "f64");
    }

    #[test]
    fn reregistering_replaces() {
        let verb = Verb::new("double");
        verb.register(|v: i64, _: &Args| Ok(v + v));
        verb.register(|v: i64, _: &Args| Ok(v * 2 + 1));

        let out = verb.dispatch(Datum::new(4i64), &Args::new()).expect("i64");
        assert_eq!(out.downcast::<i64>().expect("i64"), 9);
        assert_eq!(verb.registered_types(), vec!["i64".to_string()]);
    }

    #[test]
    fn registered_types_are_sorted() {
        let verb = describe();
        assert_eq!(verb.registered_types(), vec!["String", "i64"]);
        assert!(verb.is_specialized_for::<i64>());
        assert!(!verb.is_specialized_for::<u64>());
    }

    #[test]
    fn specialization_errors_propagate_unchanged() {
        let verb = Verb::new("head");
        verb.register(|v: Vec<i64>, args: &Args| {
            let n: usize = args.require("n", 0)?;
            Ok(v.into_iter().take(n).collect::<Vec<_>>())
        });

        let err = verb.dispatch(Datum::new(vec![1i64]), &Args::new()).unwrap_err();
        assert!(matches!(err, PipeVerbError::Argument { .. }));
    }
}
