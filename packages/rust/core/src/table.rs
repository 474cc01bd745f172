//! A minimal column-named table and its grouped view.

use std::cmp::Ordering;
use std::collections::HashMap;

use pipeverb_shared::{PipeVerbError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// Rows of JSON cells under named columns. Every row has exactly one cell per
/// column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTable")]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

#[derive(Deserialize)]
struct RawTable {
    columns: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<Value>>,
}

impl TryFrom<RawTable> for Table {
    type Error = PipeVerbError;

    fn try_from(raw: RawTable) -> Result<Self> {
        Table::new(raw.columns, raw.rows)
    }
}

impl Table {
    /// Build a table, rejecting duplicate column names and ragged rows.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        for (i, name) in columns.iter().enumerate() {
            if columns[..i].contains(name) {
                return Err(PipeVerbError::validation(format!("duplicate column '{name}'")));
            }
        }
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != columns.len()) {
            return Err(PipeVerbError::validation(format!(
                "row {i} has {} cells, expected {}",
                row.len(),
                columns.len()
            )));
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| PipeVerbError::validation(format!("no column named '{name}'")))
    }

    /// Return a copy with `values` appended as column `name`.
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<Value>) -> Result<Self> {
        let name = name.into();
        if self.column_index(&name).is_some() {
            return Err(PipeVerbError::validation(format!("column '{name}' already exists")));
        }
        if values.len() != self.rows.len() {
            return Err(PipeVerbError::validation(format!(
                "column '{name}' has {} values, table has {} rows",
                values.len(),
                self.rows.len()
            )));
        }
        self.columns.push(name);
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
        Ok(self)
    }

    /// Split rows by the value of column `key`.
    pub fn group_by(self, key: &str) -> Result<GroupedTable> {
        let key_idx = self.require_column(key)?;

        let mut groups: Vec<(Value, Vec<usize>)> = Vec::new();
        let mut seen: HashMap<String, usize> = HashMap::new();
        for (i, row) in self.rows.iter().enumerate() {
            let cell = &row[key_idx];
            match seen.get(&group_key(cell)) {
                Some(&g) => groups[g].1.push(i),
                None => {
                    seen.insert(group_key(cell), groups.len());
                    groups.push((cell.clone(), vec![i]));
                }
            }
        }
        groups.sort_by(|a, b| compare_values(&a.0, &b.0));

        Ok(GroupedTable {
            key: key.to_string(),
            table: self,
            groups,
        })
    }

    /// Columns whose non-null cells are all numbers, in table order.
    pub(crate) fn numeric_columns(&self) -> Vec<usize> {
        (0..self.columns.len())
            .filter(|&c| self.rows.iter().all(|r| r[c].is_number() || r[c].is_null()))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// GroupedTable
// ---------------------------------------------------------------------------

/// A table partitioned by one key column. Groups are sorted by key.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedTable {
    key: String,
    table: Table,
    groups: Vec<(Value, Vec<usize>)>,
}

impl GroupedTable {
    /// Name of the key column.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The ungrouped table.
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Group keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.groups.iter().map(|(k, _)| k)
    }

    /// `(key, row indices)` per group.
    pub fn groups(&self) -> &[(Value, Vec<usize>)] {
        &self.groups
    }

    /// `{"by": key, "columns": [...], "groups": [{"key": k, "rows": [[...]]}]}`
    pub fn to_json(&self) -> Value {
        let groups: Vec<Value> = self
            .groups
            .iter()
            .map(|(k, idx)| {
                let rows: Vec<&Vec<Value>> = idx.iter().map(|&i| &self.table.rows[i]).collect();
                json!({ "key": k, "rows": rows })
            })
            .collect();
        json!({
            "by": self.key,
            "columns": self.table.columns,
            "groups": groups,
        })
    }
}

/// Grouping identity of a cell: numbers by numeric value, so `1`, `1.0` and
/// `-0.0`/`0` fall into the same group.
fn group_key(cell: &Value) -> String {
    match cell.as_f64() {
        Some(n) if cell.is_number() => {
            let n = if n == 0.0 { 0.0 } else { n };
            format!("#{:016x}", n.to_bits())
        }
        _ => cell.to_string(),
    }
}

/// Total order over JSON values: null, bool, number, string, array, object;
/// numbers compare numerically and strings lexically.
pub(crate) fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(f64::NAN), y.as_f64().unwrap_or(f64::NAN));
            x.total_cmp(&y)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ if rank(a) == rank(b) => a.to_string().cmp(&b.to_string()),
        _ => rank(a).cmp(&rank(b)),
    }
}

/// Mean of the numeric cells; `None` if there are none.
pub(crate) fn mean<'a>(cells: impl Iterator<Item = &'a Value>) -> Option<f64> {
    let (sum, count) = cells
        .filter_map(Value::as_f64)
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (count > 0).then(|| sum / count as f64)
}
