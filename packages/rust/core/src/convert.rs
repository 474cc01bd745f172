//! Conversion from JSON input into typed pipeline values.

use pipeverb_shared::{PipeVerbError, Result};
use serde_json::Value;

use crate::datum::Datum;
use crate::table::Table;

/// Pick the most specific built-in type for a JSON value.
///
/// | JSON | datum |
/// |---|---|
/// | integer | `i64` |
/// | other number | `f64` |
/// | string | `String` |
/// | array of integers | `Vec<i64>` |
/// | array of numbers | `Vec<f64>` |
/// | array of strings | `Vec<String>` |
/// | `{"columns": [...], "rows": [...]}` | `Table` |
///
/// An empty array becomes `Vec<i64>`.
pub fn datum_from_json(value: Value) -> Result<Datum> {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(Datum::new(i)),
            None => n
                .as_f64()
                .map(Datum::new)
                .ok_or_else(|| PipeVerbError::parse(format!("unsupported number {n}"))),
        },
        Value::String(s) => Ok(Datum::new(s)),
        Value::Array(items) => array_datum(items),
        Value::Object(ref map) if map.contains_key("columns") => {
            let table: Table = serde_json::from_value(value)
                .map_err(|e| PipeVerbError::parse(format!("invalid table: {e}")))?;
            Ok(Datum::new(table))
        }
        other => Err(PipeVerbError::parse(format!(
            "cannot use {} as pipeline input",
            kind(&other)
        ))),
    }
}

fn array_datum(items: Vec<Value>) -> Result<Datum> {
    if items.iter().all(|v| v.is_i64()) {
        return Ok(Datum::new(items.iter().filter_map(Value::as_i64).collect::<Vec<_>>()));
    }
    if items.iter().all(Value::is_number) {
        return Ok(Datum::new(items.iter().filter_map(Value::as_f64).collect::<Vec<_>>()));
    }
    if items.iter().all(Value::is_string) {
        let strings = items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect::<Vec<_>>();
        return Ok(Datum::new(strings));
    }
    Err(PipeVerbError::parse(
        "arrays must hold only integers, only numbers, or only strings",
    ))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object without 'columns'",
    }
}
