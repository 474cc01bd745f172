//! `to_json`: render any built-in value as JSON.

use pipeverb_shared::{PipeVerbError, Result};
use serde_json::Value;

use crate::args::Args;
use crate::registrar::{PipeVerb, singledispatch_pipeverb};
use crate::table::{GroupedTable, Table};

pub fn to_json() -> PipeVerb {
    let verb = singledispatch_pipeverb("to_json");

    verb.register(|v: i64, args: &Args| render(args, Value::from(v)))
        .register(|v: f64, args: &Args| render(args, Value::from(v)))
        .register(|v: String, args: &Args| render(args, Value::from(v)))
        .register(|v: Vec<i64>, args: &Args| render(args, Value::from(v)))
        .register(|v: Vec<f64>, args: &Args| render(args, Value::from(v)))
        .register(|v: Vec<String>, args: &Args| render(args, Value::from(v)))
        .register(|v: Value, args: &Args| render(args, v))
        .register(|t: Table, args: &Args| {
            let value =
                serde_json::to_value(&t).map_err(|e| PipeVerbError::parse(e.to_string()))?;
            render(args, value)
        })
        .register(|g: GroupedTable, args: &Args| render(args, g.to_json()));

    verb
}

/// `to_json` takes no arguments.
fn render(args: &Args, value: Value) -> Result<Value> {
    args.bind(&[])?;
    Ok(value)
}
