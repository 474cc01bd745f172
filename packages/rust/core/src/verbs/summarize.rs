//! `summarize_mean`: column means of a table, per group if grouped.

use pipeverb_shared::{PipeVerbError, Result};
use serde_json::Value;

use crate::args::Args;
use crate::registrar::{PipeVerb, singledispatch_pipeverb};
use crate::table::{GroupedTable, Table, mean};

/// Build the `summarize_mean` verb.
///
/// Only columns whose non-null cells are all numbers are averaged; nulls are
/// skipped. A group without any numeric cell in a column yields `null`.
pub fn summarize_mean() -> PipeVerb {
    let verb = singledispatch_pipeverb("summarize_mean");

    verb.register(|table: Table, args: &Args| {
        args.bind(&[])?;
        mean_of_table(&table)
    })
    .register(|grouped: GroupedTable, args: &Args| {
        args.bind(&[])?;
        mean_of_groups(&grouped)
    })
    .register(|v: Vec<i64>, args: &Args| {
        args.bind(&[])?;
        mean_of_sequence(v.iter().map(|&x| x as f64), v.len())
    })
    .register(|v: Vec<f64>, args: &Args| {
        args.bind(&[])?;
        mean_of_sequence(v.iter().copied(), v.len())
    });

    verb
}

fn mean_of_table(table: &Table) -> Result<Table> {
    let numeric = table.numeric_columns();
    let columns = numeric.iter().map(|&c| table.columns()[c].clone()).collect();
    let row = numeric
        .iter()
        .map(|&c| to_cell(mean(table.rows().iter().map(|r| &r[c]))))
        .collect();
    Table::new(columns, vec![row])
}

fn mean_of_groups(grouped: &GroupedTable) -> Result<Table> {
    let table = grouped.table();
    let key_idx = table
        .column_index(grouped.key())
        .ok_or_else(|| PipeVerbError::validation("grouped table lost its key column"))?;
    let numeric: Vec<usize> = table
        .numeric_columns()
        .into_iter()
        .filter(|&c| c != key_idx)
        .collect();

    let mut columns = vec![grouped.key().to_string()];
    columns.extend(numeric.iter().map(|&c| table.columns()[c].clone()));

    let rows = grouped
        .groups()
        .iter()
        .map(|(key, idx)| {
            let mut row = vec![key.clone()];
            row.extend(
                numeric
                    .iter()
                    .map(|&c| to_cell(mean(idx.iter().map(|&i| &table.rows()[i][c])))),
            );
            row
        })
        .collect();

    Table::new(columns, rows)
}

fn mean_of_sequence(values: impl Iterator<Item = f64>, len: usize) -> Result<f64> {
    if len == 0 {
        return Err(PipeVerbError::validation("mean of an empty sequence"));
    }
    Ok(values.sum::<f64>() / len as f64)
}

fn to_cell(mean: Option<f64>) -> Value {
    mean.map_or(Value::Null, Value::from)
}
