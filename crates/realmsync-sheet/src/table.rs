//! In-memory tables and the relational operations used to shape sheet data.

use std::collections::{BTreeMap, HashMap};

use crate::cell::CellValue;
use crate::error::{SheetError, SheetResult};

/// One record: column name to cell value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    cells: BTreeMap<String, CellValue>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(column)
    }

    fn get_mut(&mut self, column: &str) -> Option<&mut CellValue> {
        self.cells.get_mut(column)
    }

    /// Get a cell, failing with `KeyMissing` if the column is absent.
    pub fn require(&self, column: &str) -> SheetResult<&CellValue> {
        self.cells
            .get(column)
            .ok_or_else(|| SheetError::key_missing(column))
    }

    pub fn insert(
        &mut self,
        column: impl Into<String>,
        value: impl Into<CellValue>,
    ) -> Option<CellValue> {
        self.cells.insert(column.into(), value.into())
    }

    pub fn contains(&self, column: &str) -> bool {
        self.cells.contains_key(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            cells: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A set of rows sharing a column schema.
///
/// Every row holds a value for every column in the schema; absent values are
/// stored as [`CellValue::Empty`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Create an empty table with the given columns.
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row, filling schema columns it lacks with `Empty`.
    ///
    /// Cells for columns outside the schema are dropped.
    pub fn push_row(&mut self, row: Row) {
        let mut normalized = Row::new();
        for column in &self.columns {
            let value = row.get(column).cloned().unwrap_or_default();
            normalized.insert(column.clone(), value);
        }
        self.rows.push(normalized);
    }

    /// Builder form of [`Table::push_row`].
    pub fn with_row(mut self, row: Row) -> Self {
        self.push_row(row);
        self
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Forward-fill empty cells from the previous row in the same column.
    ///
    /// Merged cells in a spreadsheet only carry a value in their first row;
    /// this copies that value down. Leading empty cells stay empty.
    pub fn fill_down(&mut self) {
        let Self { columns, rows } = self;
        for column in columns.iter() {
            let mut last: Option<CellValue> = None;
            for row in rows.iter_mut() {
                let current = row.get(column).filter(|v| !v.is_empty()).cloned();
                match current {
                    Some(value) => last = Some(value),
                    None => {
                        if let Some(previous) = &last {
                            row.insert(column.clone(), previous.clone());
                        }
                    }
                }
            }
        }
    }

    /// Reduce every row to the requested fields, preserving row order.
    ///
    /// Fails with `KeyMissing` naming every requested field the schema lacks.
    pub fn project(&self, fields: &[&str]) -> SheetResult<Table> {
        let missing = self.missing(fields);
        if !missing.is_empty() {
            return Err(SheetError::KeyMissing(missing));
        }

        let mut projected = Table::new(fields.iter().copied());
        for row in &self.rows {
            projected.rows.push(
                fields
                    .iter()
                    .map(|f| (*f, row.get(f).cloned().unwrap_or_default()))
                    .collect(),
            );
        }
        Ok(projected)
    }

    /// Rename a column.
    pub fn rename(&self, from: &str, to: &str) -> SheetResult<Table> {
        if !self.has_column(from) {
            return Err(SheetError::key_missing(from));
        }

        let columns = self
            .columns
            .iter()
            .map(|c| if c == from { to.to_string() } else { c.clone() });
        let mut renamed = Table::new(columns);
        for row in &self.rows {
            renamed.rows.push(
                row.cells
                    .iter()
                    .map(|(k, v)| (if k == from { to } else { k.as_str() }, v.clone()))
                    .collect(),
            );
        }
        Ok(renamed)
    }

    /// Drop rows identical to an earlier row.
    pub fn dedup(&self) -> Table {
        let mut unique = Table::new(self.columns.iter().cloned());
        for row in &self.rows {
            if !unique.rows.contains(row) {
                unique.rows.push(row.clone());
            }
        }
        unique
    }

    /// Inner join on equal values of `key`.
    ///
    /// Rows without a match on either side are dropped and multiple matches
    /// produce every combination. Rows with an empty key never match. When
    /// both sides carry a non-key column of the same name, the left value is
    /// kept.
    pub fn join(&self, other: &Table, key: &str) -> SheetResult<Table> {
        self.join_with(other, key, false)
    }

    /// Like [`Table::join`], but left rows without a match are kept with the
    /// right side's columns set to `Empty`.
    pub fn left_join(&self, other: &Table, key: &str) -> SheetResult<Table> {
        self.join_with(other, key, true)
    }

    fn join_with(&self, other: &Table, key: &str, keep_unmatched: bool) -> SheetResult<Table> {
        if !self.has_column(key) || !other.has_column(key) {
            return Err(SheetError::key_missing(key));
        }

        let extra: Vec<&String> = other
            .columns
            .iter()
            .filter(|c| !self.has_column(c))
            .collect();

        let mut index: HashMap<String, Vec<&Row>> = HashMap::new();
        for row in &other.rows {
            if let Some(k) = key_of(row, key) {
                index.entry(k).or_default().push(row);
            }
        }

        let mut joined = Table::new(
            self.columns
                .iter()
                .cloned()
                .chain(extra.iter().map(|c| (*c).clone())),
        );

        for left in &self.rows {
            match key_of(left, key).and_then(|k| index.get(&k)) {
                Some(matches) => {
                    for right in matches {
                        let mut row = left.clone();
                        for column in &extra {
                            let value = right.get(column).cloned().unwrap_or_default();
                            row.insert((*column).clone(), value);
                        }
                        joined.rows.push(row);
                    }
                }
                None if keep_unmatched => {
                    let mut row = left.clone();
                    for column in &extra {
                        row.insert((*column).clone(), CellValue::Empty);
                    }
                    joined.rows.push(row);
                }
                None => {}
            }
        }

        Ok(joined)
    }

    /// Fold rows sharing the same `key` value into one row.
    ///
    /// Every other column keeps the first row's value and `list_column`
    /// becomes a [`CellValue::List`] of each row's value, in row order.
    /// Groups appear in order of first appearance; rows with an empty key are
    /// dropped.
    pub fn group_by(&self, key: &str, list_column: &str) -> SheetResult<Table> {
        let missing = self.missing(&[key, list_column]);
        if !missing.is_empty() {
            return Err(SheetError::KeyMissing(missing));
        }

        let mut grouped = Table::new(self.columns.iter().cloned());
        let mut positions: HashMap<String, usize> = HashMap::new();

        for row in &self.rows {
            let Some(k) = key_of(row, key) else {
                continue;
            };
            let value = row.get(list_column).cloned().unwrap_or_default();

            match positions.get(&k) {
                Some(&pos) => {
                    if let Some(CellValue::List(items)) = grouped.rows[pos].get_mut(list_column) {
                        items.push(value);
                    }
                }
                None => {
                    let mut first = row.clone();
                    first.insert(list_column, CellValue::List(vec![value]));
                    positions.insert(k, grouped.rows.len());
                    grouped.rows.push(first);
                }
            }
        }

        Ok(grouped)
    }

    fn missing(&self, fields: &[&str]) -> Vec<String> {
        fields
            .iter()
            .filter(|f| !self.has_column(f))
            .map(|f| (*f).to_string())
            .collect()
    }
}

fn key_of(row: &Row, key: &str) -> Option<String> {
    row.get(key).and_then(CellValue::as_text)
}
