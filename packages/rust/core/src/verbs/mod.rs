//! Built-in verbs and the data types they accept.
//!
//! Each verb lives in its own module and is built by a constructor returning a
//! fresh [`PipeVerb`]. [`builtins`] lists them in display order.

mod append_col;
mod groupby;
mod summarize;
mod to_json;

use serde_json::Value;

use crate::registrar::PipeVerb;
use crate::source::PipeSources;
use crate::table::{GroupedTable, Table};

pub use append_col::append_col;
pub use groupby::groupby;
pub use summarize::summarize_mean;
pub use to_json::to_json;

/// All built-in verbs.
pub fn builtins() -> Vec<PipeVerb> {
    vec![append_col(), groupby(), summarize_mean(), to_json()]
}

/// Enable every type the built-in verbs accept or produce.
pub fn enable_builtin_sources(sources: &PipeSources) {
    sources.enable::<i64>();
    sources.enable::<f64>();
    sources.enable::<String>();
    sources.enable::<Vec<i64>>();
    sources.enable::<Vec<f64>>();
    sources.enable::<Vec<String>>();
    sources.enable::<Value>();
    sources.enable::<Table>();
    sources.enable::<GroupedTable>();
}
