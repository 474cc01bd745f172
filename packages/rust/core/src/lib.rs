//! Deferred, type-dispatched verbs and left-to-right pipelines.
//!
//! - [`singledispatch_pipeverb`] / [`pipeverb`] turn functions into verbs;
//!   calling a verb yields a [`VerbCall`] instead of running it.
//! - [`PipeSources`] / [`Piped`] apply verb calls to a value in order,
//!   stopping at the first failure.
//! - [`VerbRegistry`] holds verbs by name, including the built-ins in
//!   [`verbs`].

pub mod args;
pub mod convert;
pub mod datum;
pub mod dispatch;
pub mod registrar;
pub mod registry;
pub mod source;
pub mod table;
pub mod verb;
pub mod verbs;

pub use args::Args;
pub use convert::datum_from_json;
pub use datum::{Datum, short_type_name};
pub use dispatch::{Specialization, Verb};
pub use registrar::{PipeVerb, pipeverb, singledispatch_pipeverb};
pub use registry::VerbRegistry;
pub use source::{PipeSources, Piped, pipe};
pub use table::{GroupedTable, Table};
pub use verb::VerbCall;
