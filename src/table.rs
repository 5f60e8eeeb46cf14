//! Tabular input and output.
//!
//! The feature pipeline only needs four things from a table: a column
//! existence check, the text of every row in a named column, a deep copy,
//! and column assignment. Those live on the [`Tabular`] trait so the core
//! stages never depend on a concrete storage type.
//!
//! [`Table`] is the in-memory implementation shipped with the crate. It is
//! column-oriented, keeps columns in insertion order, and stores cells as
//! [`serde_json::Value`] so rows stay opaque apart from the text column.
//!
//! # JSON shapes
//!
//! ```text
//! records   [{"id": 1, "text": "Paris"}, {"id": 2, "text": "Berlin"}]
//! columnar  {"id": [1, 2], "text": ["Paris", "Berlin"]}
//! jsonl     {"id": 1, "text": "Paris"}\n{"id": 2, "text": "Berlin"}
//! ```
//!
//! Anything else is rejected with [`Error::NotATable`].

use std::borrow::Cow;
use std::io::BufRead;

use serde_json::{Map, Value};

use crate::{Error, Result};

/// A single table cell.
pub type Cell = Value;

/// Minimal table capability consumed by the counter and the expander.
///
/// `Clone` must produce a fully independent copy: mutating the clone may
/// never be observable through the original.
pub trait Tabular: Clone {
    /// Whether a column with this exact name exists.
    fn has_column(&self, name: &str) -> bool;

    /// Column names in table order.
    fn column_names(&self) -> Vec<String>;

    /// Number of rows.
    fn num_rows(&self) -> usize;

    /// Text of every row in `column`, in row order.
    ///
    /// Returns `None` when the column does not exist.
    fn column_text(&self, column: &str) -> Option<Vec<Cow<'_, str>>>;

    /// Insert a column, replacing an existing one with the same name.
    fn set_column(&mut self, name: &str, values: Vec<Cell>) -> Result<()>;
}

/// Render a cell as document text.
///
/// Strings are used as-is, `null` is an empty document, and any other value
/// uses its JSON rendering.
#[must_use]
pub fn cell_text(cell: &Cell) -> Cow<'_, str> {
    match cell {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Null => Cow::Borrowed(""),
        other => Cow::Owned(other.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Column {
    name: String,
    values: Vec<Cell>,
}

/// Column-oriented in-memory table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    rows: usize,
}

impl Table {
    /// Create an empty table (no columns, no rows).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-column table of texts.
    #[must_use]
    pub fn from_texts<I, S>(column: &str, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<Cell> = texts.into_iter().map(|t| Value::String(t.into())).collect();
        Self {
            rows: values.len(),
            columns: vec![Column {
                name: column.to_string(),
                values,
            }],
        }
    }

    /// Add a column, consuming and returning the table.
    ///
    /// The first column fixes the row count; later columns must match it.
    pub fn with_column(mut self, name: &str, values: Vec<Cell>) -> Result<Self> {
        self.set_column(name, values)?;
        Ok(self)
    }

    /// Build a table from a JSON value (records or columnar shape).
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::Array(rows) => Self::from_records(rows),
            Value::Object(columns) => Self::from_columnar(columns),
            other => Err(Error::not_a_table(format!(
                "expected an array of records or an object of columns, found {}",
                json_kind(other)
            ))),
        }
    }

    /// Parse a JSON document (records or columnar shape).
    pub fn from_json_str(input: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(input)?;
        Self::from_json(&value)
    }

    /// Read JSON Lines: one record object per non-blank line.
    pub fn from_jsonl<R: BufRead>(reader: R) -> Result<Self> {
        let mut rows = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            rows.push(serde_json::from_str::<Value>(&line)?);
        }
        Self::from_records(&rows)
    }

    /// Build a table from record objects.
    ///
    /// Columns appear in first-seen order. A key missing from a record is
    /// filled with `null`.
    pub fn from_records(rows: &[Value]) -> Result<Self> {
        let mut table = Table::new();
        for (idx, row) in rows.iter().enumerate() {
            let Value::Object(record) = row else {
                return Err(Error::not_a_table(format!(
                    "row {idx} is a {}, expected an object",
                    json_kind(row)
                )));
            };
            for name in record.keys() {
                if !table.has_column(name) {
                    table.columns.push(Column {
                        name: name.clone(),
                        values: vec![Value::Null; idx],
                    });
                }
            }
            for column in &mut table.columns {
                column
                    .values
                    .push(record.get(&column.name).cloned().unwrap_or(Value::Null));
            }
            table.rows += 1;
        }
        Ok(table)
    }

    fn from_columnar(columns: &Map<String, Value>) -> Result<Self> {
        let mut table = Table::new();
        for (name, values) in columns {
            let Value::Array(values) = values else {
                return Err(Error::not_a_table(format!(
                    "column `{name}` is a {}, expected an array",
                    json_kind(values)
                )));
            };
            if !table.columns.is_empty() && values.len() != table.rows {
                return Err(Error::not_a_table(format!(
                    "column `{name}` has {} values, expected {}",
                    values.len(),
                    table.rows
                )));
            }
            table.rows = values.len();
            table.columns.push(Column {
                name: name.clone(),
                values: values.clone(),
            });
        }
        Ok(table)
    }

    /// Cells of a column.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[Cell]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Number of columns.
    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// One row as a JSON object, in column order.
    #[must_use]
    pub fn row(&self, idx: usize) -> Option<Map<String, Value>> {
        if idx >= self.rows {
            return None;
        }
        Some(
            self.columns
                .iter()
                .map(|c| (c.name.clone(), c.values[idx].clone()))
                .collect(),
        )
    }

    /// Records-shaped JSON (array of row objects).
    #[must_use]
    pub fn to_records(&self) -> Value {
        Value::Array(
            (0..self.rows)
                .filter_map(|idx| self.row(idx).map(Value::Object))
                .collect(),
        )
    }

    /// JSON Lines rendering, one row per line.
    pub fn to_jsonl(&self) -> Result<String> {
        let mut out = String::new();
        for idx in 0..self.rows {
            if let Some(row) = self.row(idx) {
                out.push_str(&serde_json::to_string(&row)?);
                out.push('\n');
            }
        }
        Ok(out)
    }
}

impl Tabular for Table {
    fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    fn num_rows(&self) -> usize {
        self.rows
    }

    fn column_text(&self, column: &str) -> Option<Vec<Cow<'_, str>>> {
        self.column(column)
            .map(|values| values.iter().map(cell_text).collect())
    }

    fn set_column(&mut self, name: &str, values: Vec<Cell>) -> Result<()> {
        let shaped = !self.columns.is_empty() || self.rows > 0;
        if shaped && values.len() != self.rows {
            return Err(Error::invalid_input(format!(
                "column `{name}` has {} values, table has {} rows",
                values.len(),
                self.rows
            )));
        }
        self.rows = values.len();
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.values = values,
            None => self.columns.push(Column {
                name: name.to_string(),
                values,
            }),
        }
        Ok(())
    }
}
