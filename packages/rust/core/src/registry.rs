//! Named verbs plus the pipe-enabled types they operate on.
//!
//! The registry is populated once at startup and read-only afterwards.

use std::any::Any;

use pipeverb_shared::{PipeVerbError, Result, StepSpec};
use tracing::{debug, instrument};

use crate::args::Args;
use crate::datum::Datum;
use crate::registrar::PipeVerb;
use crate::source::{PipeSources, Piped};
use crate::verbs;

/// Holds registered verbs in insertion order.
#[derive(Debug, Default)]
pub struct VerbRegistry {
    verbs: Vec<PipeVerb>,
    sources: PipeSources,
}

impl VerbRegistry {
    /// An empty registry: no verbs, no pipe-enabled types.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every built-in verb and type.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for verb in verbs::builtins() {
            registry.insert(verb);
        }
        verbs::enable_builtin_sources(&registry.sources);
        registry
    }

    /// Add a verb, replacing any earlier verb of the same name.
    pub fn insert(&mut self, verb: PipeVerb) {
        debug!(verb = verb.name(), "registered verb");
        match self.verbs.iter_mut().find(|v| v.name() == verb.name()) {
            Some(slot) => *slot = verb,
            None => self.verbs.push(verb),
        }
    }

    pub fn get(&self, name: &str) -> Result<&PipeVerb> {
        self.verbs
            .iter()
            .find(|v| v.name() == name)
            .ok_or_else(|| PipeVerbError::UnknownVerb(name.to_string()))
    }

    pub fn verbs(&self) -> &[PipeVerb] {
        &self.verbs
    }

    pub fn sources(&self) -> &PipeSources {
        &self.sources
    }

    /// Mark `T` as pipe-enabled; `false` if it already was.
    pub fn enable_source<T: Any>(&self) -> bool {
        self.sources.enable::<T>()
    }

    /// Start a pipeline from `value`.
    pub fn source<T: Any + Send + Sync>(&self, value: T) -> Piped<'_> {
        self.sources.source(value)
    }

    /// Pipe `input` through `steps`, resolving each verb by name.
    ///
    /// Every verb name is resolved before the first stage runs, so an unknown
    /// verb fails without doing any work.
    #[instrument(skip_all, fields(steps = steps.len(), input_type = input.type_name()))]
    pub fn run(&self, input: Datum, steps: &[StepSpec]) -> Result<Datum> {
        let verbs = steps
            .iter()
            .map(|step| self.get(&step.verb))
            .collect::<Result<Vec<_>>>()?;

        let calls = verbs
            .into_iter()
            .zip(steps)
            .map(|(verb, step)| verb.call(Args::from(step)));

        let out = crate::source::pipe(&self.sources, input, calls)?;
        debug!(output_type = out.type_name(), "pipeline finished");
        Ok(out)
    }
}
