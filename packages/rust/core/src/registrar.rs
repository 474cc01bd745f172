//! Turning functions into pipeline verbs.
//!
//! - [`pipeverb`]: a plain verb with one implementation for every input type.
//! - [`singledispatch_pipeverb`]: a verb specialized per input type, which
//!   reports "not implemented" for types nobody registered.
//!
//! Both return a [`PipeVerb`] handle. Calling the handle does not run
//! anything; it captures the arguments in a [`VerbCall`].

use std::any::Any;
use std::sync::Arc;

use pipeverb_shared::Result;

use crate::args::Args;
use crate::datum::Datum;
use crate::dispatch::Verb;
use crate::verb::VerbCall;

/// Cloneable handle to a registered verb.
#[derive(Debug, Clone)]
pub struct PipeVerb {
    verb: Arc<Verb>,
}

impl PipeVerb {
    fn from_verb(verb: Verb) -> Self {
        Self {
            verb: Arc::new(verb),
        }
    }

    pub fn name(&self) -> &str {
        self.verb.name()
    }

    /// Capture `args` for later application.
    pub fn call(&self, args: Args) -> VerbCall {
        VerbCall::new(Arc::clone(&self.verb), args)
    }

    /// Shorthand for `call(Args::new())`.
    pub fn step(&self) -> VerbCall {
        self.call(Args::new())
    }

    /// Add a specialization for exact type `T` through the handle.
    pub fn register<T, R, F>(&self, f: F) -> &Self
    where
        T: Any + Send + Sync,
        R: Any + Send + Sync,
        F: Fn(T, &Args) -> Result<R> + Send + Sync + 'static,
    {
        self.verb.register(f);
        self
    }

    /// Run the verb immediately instead of deferring it.
    pub fn invoke(&self, input: Datum, args: &Args) -> Result<Datum> {
        self.verb.dispatch(input, args)
    }

    pub fn registered_types(&self) -> Vec<String> {
        self.verb.registered_types()
    }

    pub fn is_specialized_for<T: Any>(&self) -> bool {
        self.verb.is_specialized_for::<T>()
    }
}

/// Wrap `f` as a verb applied to inputs of any type.
pub fn pipeverb<F>(name: impl Into<String>, f: F) -> PipeVerb
where
    F: Fn(Datum, &Args) -> Result<Datum> + Send + Sync + 'static,
{
    PipeVerb::from_verb(Verb::with_default(name, f))
}

/// A verb with no implementations yet; add them with [`PipeVerb::register`].
pub fn singledispatch_pipeverb(name: impl Into<String>) -> PipeVerb {
    PipeVerb::from_verb(Verb::new(name))
}
