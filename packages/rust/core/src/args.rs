//! Arguments captured by a verb call.

use std::collections::BTreeMap;

use pipeverb_shared::{PipeVerbError, Result, StepSpec};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Positional and named arguments fixed at verb-call time.
///
/// Lookups take both a name and a position: a named argument wins over the
/// positional one, mirroring how a keyword can stand in for a positional
/// parameter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    positional: Vec<Value>,
    named: BTreeMap<String, Value>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Set a named argument.
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.named.insert(name.into(), value.into());
        self
    }

    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    pub fn named(&self) -> &BTreeMap<String, Value> {
        &self.named
    }

    /// Check the arguments against a verb's parameter list, in positional
    /// order.
    ///
    /// Fails on extra positional arguments, on keywords that name no
    /// parameter, and on a parameter supplied both by position and by name.
    pub fn bind(&self, params: &[&str]) -> Result<()> {
        if self.positional.len() > params.len() {
            return Err(PipeVerbError::argument(format!(
                "takes at most {} positional argument(s), {} given",
                params.len(),
                self.positional.len()
            )));
        }
        for name in self.named.keys() {
            match params.iter().position(|p| *p == name.as_str()) {
                None => {
                    return Err(PipeVerbError::argument(format!(
                        "unexpected keyword argument '{name}'"
                    )));
                }
                Some(i) if i < self.positional.len() => {
                    return Err(PipeVerbError::argument(format!(
                        "got multiple values for argument '{name}'"
                    )));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Raw lookup by name, then by position.
    pub fn get(&self, name: &str, position: usize) -> Option<&Value> {
        self.named.get(name).or_else(|| self.positional.get(position))
    }

    /// Typed lookup; `Ok(None)` if the argument was not supplied.
    pub fn get_as<T: DeserializeOwned>(&self, name: &str, position: usize) -> Result<Option<T>> {
        let Some(value) = self.get(name, position) else {
            return Ok(None);
        };
        serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|e| PipeVerbError::argument(format!("'{name}' = {value}: {e}")))
    }

    /// Typed lookup with a default for a missing argument.
    pub fn get_or<T: DeserializeOwned>(&self, name: &str, position: usize, default: T) -> Result<T> {
        Ok(self.get_as(name, position)?.unwrap_or(default))
    }

    /// Typed lookup of a required argument.
    pub fn require<T: DeserializeOwned>(&self, name: &str, position: usize) -> Result<T> {
        self.get_as(name, position)?
            .ok_or_else(|| PipeVerbError::argument(format!("missing required argument '{name}'")))
    }
}

impl From<&StepSpec> for Args {
    fn from(step: &StepSpec) -> Self {
        Self {
            positional: step.args.clone(),
            named: step.kwargs.clone(),
        }
    }
}
