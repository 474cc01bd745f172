//! Deferred verb invocation.

use std::sync::Arc;

use pipeverb_shared::Result;
use tracing::trace;

use crate::args::Args;
use crate::datum::Datum;
use crate::dispatch::Verb;

/// A verb together with the arguments it was called with, waiting for its
/// input.
///
/// Built fresh by every [`PipeVerb::call`](crate::PipeVerb::call) and consumed
/// by [`apply`](Self::apply), so a call cannot be reused across pipelines.
#[derive(Debug)]
pub struct VerbCall {
    verb: Arc<Verb>,
    args: Args,
}

impl VerbCall {
    pub(crate) fn new(verb: Arc<Verb>, args: Args) -> Self {
        Self { verb, args }
    }

    pub fn verb_name(&self) -> &str {
        self.verb.name()
    }

    pub fn args(&self) -> &Args {
        &self.args
    }

    /// Invoke the verb as `verb(input, *args, **kwargs)`.
    pub fn apply(self, input: Datum) -> Result<Datum> {
        trace!(
            verb = self.verb.name(),
            input_type = input.type_name(),
            "applying verb"
        );
        self.verb.dispatch(input, &self.args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_passes_input_first_then_args() {
        let verb = Arc::new(Verb::new("scale"));
        verb.register(|v: i64, args: &Args| {
            let by: i64 = args.get_or("by", 0, 1)?;
            let offset: i64 = args.get_or("offset", 1, 0)?;
            Ok(v * by + offset)
        });

        let call = VerbCall::new(Arc::clone(&verb), Args::new().arg(3).kwarg("offset", 1));
        assert_eq!(call.verb_name(), "scale");
        assert_eq!(call.args().positional().len(), 1);

        let out = call.apply(Datum::new(5i64)).expect("apply");
        assert_eq!(out.downcast::<i64>().expect("i64"), 16);
    }
}
