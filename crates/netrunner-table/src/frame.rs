//! Row-major in-memory frame.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Result, TableError, Value};

/// Relational join mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinHow {
    #[default]
    Left,
    Right,
    Inner,
    Outer,
}

impl FromStr for JoinHow {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "inner" => Ok(Self::Inner),
            "outer" | "full" => Ok(Self::Outer),
            other => Err(TableError::InvalidJoinMode(other.to_string())),
        }
    }
}

impl fmt::Display for JoinHow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Inner => "inner",
            Self::Outer => "outer",
        };
        f.write_str(s)
    }
}

/// A table of named columns. Row order is stable across every operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    columns: Vec<String>,
    positions: HashMap<String, usize>,
    rows: Vec<Vec<Value>>,
}

/// Borrowed view of one row.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    frame: &'a Frame,
    values: &'a [Value],
}

impl<'a> Row<'a> {
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        let pos = *self.frame.positions.get(column)?;
        self.values.get(pos)
    }

    pub fn values(&self) -> &'a [Value] {
        self.values
    }
}

impl Frame {
    pub fn new<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut frame = Frame::default();
        for column in columns {
            let column = column.into();
            if frame.positions.contains_key(&column) {
                return Err(TableError::DuplicateColumn(column));
            }
            frame.positions.insert(column.clone(), frame.columns.len());
            frame.columns.push(column);
        }
        Ok(frame)
    }

    /// Build a frame from a JSON array of flat objects.
    ///
    /// Columns appear in the order keys are first met while scanning the
    /// records (map order within a record); keys absent from a record become
    /// `Null` in that row.
    pub fn from_records(records: &serde_json::Value) -> Result<Self> {
        let serde_json::Value::Array(items) = records else {
            return Err(TableError::InvalidRecords(
                "expected a JSON array of objects".to_string(),
            ));
        };

        let mut columns: Vec<String> = Vec::new();
        let mut seen: HashMap<String, usize> = HashMap::new();
        for (idx, item) in items.iter().enumerate() {
            let serde_json::Value::Object(obj) = item else {
                return Err(TableError::InvalidRecords(format!(
                    "record {idx} is not an object"
                )));
            };
            for key in obj.keys() {
                if !seen.contains_key(key) {
                    seen.insert(key.clone(), columns.len());
                    columns.push(key.clone());
                }
            }
        }

        let mut frame = Frame::new(columns)?;
        for (idx, item) in items.iter().enumerate() {
            let mut row = vec![Value::Null; frame.width()];
            if let serde_json::Value::Object(obj) = item {
                for (key, raw) in obj {
                    let value = Value::from_json(raw).ok_or_else(|| {
                        TableError::InvalidRecords(format!(
                            "record {idx} field `{key}` is not a scalar"
                        ))
                    })?;
                    row[seen[key]] = value;
                }
            }
            frame.rows.push(row);
        }
        tracing::debug!(
            rows = frame.len(),
            columns = frame.width(),
            "loaded frame from records"
        );
        Ok(frame)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        Self::from_records(&value)
    }

    pub fn push_row<I, V>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let row: Vec<Value> = values.into_iter().map(Into::into).collect();
        if row.len() != self.width() {
            return Err(TableError::RaggedRow {
                expected: self.width(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.positions.contains_key(column)
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn position(&self, column: &str) -> Result<usize> {
        self.positions
            .get(column)
            .copied()
            .ok_or_else(|| TableError::UnknownColumn(column.to_string()))
    }

    /// Cells of one column, in row order.
    pub fn column(&self, column: &str) -> Result<impl Iterator<Item = &Value> + '_> {
        let pos = self.position(column)?;
        Ok(self.rows.iter().map(move |row| &row[pos]))
    }

    /// Cells of two columns zipped row-wise.
    pub fn column_pairs(
        &self,
        left: &str,
        right: &str,
    ) -> Result<impl Iterator<Item = (&Value, &Value)> + '_> {
        let l = self.position(left)?;
        let r = self.position(right)?;
        Ok(self.rows.iter().map(move |row| (&row[l], &row[r])))
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        self.rows.iter().map(move |values| Row {
            frame: self,
            values,
        })
    }

    /// Split text cells of `column` on `separator` and repeat the row once per
    /// part. Non-text cells are left as they are.
    pub fn explode(&mut self, column: &str, separator: &str) -> Result<()> {
        let pos = self.position(column)?;
        let mut out = Vec::with_capacity(self.rows.len());
        for row in self.rows.drain(..) {
            let parts: Option<Vec<String>> = match &row[pos] {
                Value::Text(s) if !separator.is_empty() => {
                    Some(s.split(separator).map(str::to_string).collect())
                }
                _ => None,
            };
            match parts {
                Some(parts) => {
                    for part in parts {
                        let mut next = row.clone();
                        next[pos] = Value::Text(part);
                        out.push(next);
                    }
                }
                None => out.push(row),
            }
        }
        self.rows = out;
        Ok(())
    }

    /// Relational join on `left_on == right_on`.
    ///
    /// Output columns are this frame's columns followed by `right`'s. If both
    /// keys share a name the right key column is dropped; any other shared
    /// name is suffixed `_x` (left) and `_y` (right). Row order follows the
    /// driving side: left rows for `left`/`inner`, right rows for `right`,
    /// and for `outer` the left-join rows followed by unmatched right rows.
    pub fn join(&self, right: &Frame, left_on: &str, right_on: &str, how: JoinHow) -> Result<Frame> {
        let lk = self.position(left_on)?;
        let rk = right.position(right_on)?;
        let shared_key = left_on == right_on;

        let right_kept: Vec<usize> = (0..right.width())
            .filter(|&i| !(shared_key && i == rk))
            .collect();

        let mut columns: Vec<String> = Vec::with_capacity(self.width() + right_kept.len());
        for name in &self.columns {
            let clashes = right_kept.iter().any(|&i| &right.columns[i] == name);
            columns.push(if clashes {
                format!("{name}_x")
            } else {
                name.clone()
            });
        }
        for &i in &right_kept {
            let name = &right.columns[i];
            columns.push(if self.has_column(name) {
                format!("{name}_y")
            } else {
                name.clone()
            });
        }
        let mut out = Frame::new(columns)?;

        let assemble = |left_row: Option<&Vec<Value>>, right_row: Option<&Vec<Value>>| {
            let mut row: Vec<Value> = match left_row {
                Some(l) => l.clone(),
                None => vec![Value::Null; self.width()],
            };
            if shared_key && left_row.is_none() {
                if let Some(r) = right_row {
                    row[lk] = r[rk].clone();
                }
            }
            for &i in &right_kept {
                row.push(right_row.map(|r| r[i].clone()).unwrap_or(Value::Null));
            }
            row
        };

        match how {
            JoinHow::Left | JoinHow::Inner | JoinHow::Outer => {
                let mut matched_right = vec![false; right.len()];
                for l in &self.rows {
                    let mut any = false;
                    for (ri, r) in right.rows.iter().enumerate() {
                        if l[lk].key_eq(&r[rk]) {
                            any = true;
                            matched_right[ri] = true;
                            out.rows.push(assemble(Some(l), Some(r)));
                        }
                    }
                    if !any && how != JoinHow::Inner {
                        out.rows.push(assemble(Some(l), None));
                    }
                }
                if how == JoinHow::Outer {
                    for (ri, r) in right.rows.iter().enumerate() {
                        if !matched_right[ri] {
                            out.rows.push(assemble(None, Some(r)));
                        }
                    }
                }
            }
            JoinHow::Right => {
                for r in &right.rows {
                    let mut any = false;
                    for l in &self.rows {
                        if l[lk].key_eq(&r[rk]) {
                            any = true;
                            out.rows.push(assemble(Some(l), Some(r)));
                        }
                    }
                    if !any {
                        out.rows.push(assemble(None, Some(r)));
                    }
                }
            }
        }

        tracing::debug!(
            how = %how,
            left_rows = self.len(),
            right_rows = right.len(),
            rows = out.len(),
            "joined frames"
        );
        Ok(out)
    }
}
