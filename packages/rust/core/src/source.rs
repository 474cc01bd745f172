//! Pipe sources and left-to-right pipelines.
//!
//! A type must be enabled in [`PipeSources`] before its values can be piped
//! into a verb. Enabling is a one-way, one-time transition per type; enabling
//! again is a no-op.
//!
//! ```ignore
//! let out = (sources.source(vec![1i64, 2]) | append_col.step()).finish_as::<Vec<i64>>()?;
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::ops::BitOr;
use std::sync::{PoisonError, RwLock};

use pipeverb_shared::{PipeVerbError, Result};
use tracing::{debug, trace};

use crate::datum::{Datum, short_type_name};
use crate::verb::VerbCall;

// ---------------------------------------------------------------------------
// PipeSources
// ---------------------------------------------------------------------------

/// The set of types whose values may appear on the left of a pipe.
#[derive(Debug, Default)]
pub struct PipeSources {
    enabled: RwLock<HashMap<TypeId, String>>,
}

impl PipeSources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `T` as pipe-enabled. Returns `false` if it already was.
    pub fn enable<T: Any>(&self) -> bool {
        let mut enabled = self.enabled.write().unwrap_or_else(PoisonError::into_inner);
        if enabled.contains_key(&TypeId::of::<T>()) {
            return false;
        }

        let type_name = short_type_name(std::any::type_name::<T>());
        debug!(%type_name, "enabled pipe source");
        enabled.insert(TypeId::of::<T>(), type_name);
        true
    }

    pub fn is_enabled(&self, type_id: TypeId) -> bool {
        self.enabled
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&type_id)
    }

    /// Short names of every enabled type, sorted.
    pub fn enabled_types(&self) -> Vec<String> {
        let mut names: Vec<_> = self
            .enabled
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Start a pipeline from `value`.
    pub fn source<T: Any + Send + Sync>(&self, value: T) -> Piped<'_> {
        self.source_datum(Datum::new(value))
    }

    /// Start a pipeline from an already-wrapped value.
    pub fn source_datum(&self, datum: Datum) -> Piped<'_> {
        Piped {
            sources: self,
            state: Ok(datum),
            stage: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Piped
// ---------------------------------------------------------------------------

/// A pipeline in progress.
///
/// Stages run eagerly as they are attached. The first failure is kept and
/// every later stage is skipped.
#[derive(Debug)]
#[must_use = "a pipeline does nothing useful until `finish` is called"]
pub struct Piped<'s> {
    sources: &'s PipeSources,
    state: Result<Datum>,
    stage: usize,
}

impl Piped<'_> {
    /// Apply `call` to the current value.
    pub fn then(mut self, call: VerbCall) -> Self {
        self.stage += 1;
        self.state = match self.state {
            Ok(value) if self.sources.is_enabled(value.type_id()) => {
                trace!(stage = self.stage, verb = call.verb_name(), "pipe");
                call.apply(value)
            }
            Ok(value) => Err(PipeVerbError::NotPipeable {
                type_name: value.type_name().to_string(),
            }),
            Err(e) => {
                trace!(stage = self.stage, verb = call.verb_name(), "skipped after failure");
                Err(e)
            }
        };
        self
    }

    /// Number of stages attached so far (including skipped ones).
    pub fn stages(&self) -> usize {
        self.stage
    }

    /// The final value, or the first failure.
    pub fn finish(self) -> Result<Datum> {
        self.state
    }

    /// The final value unwrapped as a `T`.
    pub fn finish_as<T: Any>(self) -> Result<T> {
        self.state?.downcast::<T>()
    }
}

impl BitOr<VerbCall> for Piped<'_> {
    type Output = Self;

    fn bitor(self, call: VerbCall) -> Self::Output {
        self.then(call)
    }
}

/// Apply `calls` to `value` left to right.
pub fn pipe<I>(sources: &PipeSources, value: Datum, calls: I) -> Result<Datum>
where
    I: IntoIterator<Item = VerbCall>,
{
    calls
        .into_iter()
        .fold(sources.source_datum(value), Piped::then)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::Args;
    use crate::registrar::{PipeVerb, singledispatch_pipeverb};

    fn increment() -> PipeVerb {
        let verb = singledispatch_pipeverb("increment");
        verb.register(|v: i64, args: &Args| Ok(v + args.get_or::<i64>("by", 0, 1)?));
        verb
    }

    fn enabled_i64() -> PipeSources {
        let sources = PipeSources::new();
        sources.enable::<i64>();
        sources
    }

    #[test]
    fn enabling_is_idempotent() {
        let sources = PipeSources::new();
        assert!(sources.enable::<i64>());
        assert!(!sources.enable::<i64>());
        assert_eq!(sources.enabled_types(), vec!["i64"]);

        let inc = increment();
        let once = enabled_i64();
        let a = (once.source(1i64) | inc.step()).finish_as::<i64>().expect("once");
        let b = (sources.source(1i64) | inc.step()).finish_as::<i64>().expect("twice");
        assert_eq!(a, b);
    }

    #[test]
    fn chains_left_to_right() {
        let sources = enabled_i64();
        let inc = increment();
        let double = singledispatch_pipeverb("double");
        double.register(|v: i64, _: &Args| Ok(v * 2));

        let out = (sources.source(1i64)
            | inc.call(Args::new().arg(2))
            | double.step()
            | inc.step())
        .finish_as::<i64>()
        .expect("pipeline");
        assert_eq!(out, 7);
    }

    #[test]
    fn disabled_source_is_rejected() {
        let sources = PipeSources::new();
        let err = (sources.source(1i64) | increment().step())
            .finish()
            .unwrap_err();
        assert_eq!(err.to_string(), "values of type i64 are not pipe-enabled");
    }

    #[test]
    fn fails_fast_on_first_unimplemented_stage() {
        let sources = enabled_i64();
        sources.enable::<String>();
        let to_text = singledispatch_pipeverb("to_text");
        to_text.register(|v: i64, _: &Args| Ok(v.to_string()));

        let piped = sources.source(1i64) | to_text.step() | increment().step() | to_text.step();
        assert_eq!(piped.stages(), 3);
        let err = piped.finish().unwrap_err();
        assert_eq!(
            err.to_string(),
            "increment is not implemented for data of type String"
        );
    }

    #[test]
    fn pipe_function_matches_operator() {
        let sources = enabled_i64();
        let inc = increment();
        let out = pipe(
            &sources,
            Datum::new(10i64),
            [inc.step(), inc.call(Args::new().kwarg("by", 5))],
        )
        .expect("pipe")
        .downcast::<i64>()
        .expect("i64");
        assert_eq!(out, 16);
    }
}
