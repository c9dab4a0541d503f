//! In-memory row-sets: loading one sheet, merging a table folder, and
//! dropping duplicate rows.
//!
//! A [`RowSet`] keeps every row padded to the width of its column list, so
//! column indices are always valid for every row.

use std::{
    collections::{HashMap, HashSet},
    path::Path,
};

use anyhow::{Context, Result};
use calamine::{Data, Range, Reader, open_workbook_auto};
use log::{debug, info, warn};

use crate::{error::ConvertError, scanner, value::CellValue};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSet {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl RowSet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Null);
                row
            })
            .collect();
        Self { columns, rows }
    }

    pub fn from_range(range: &Range<Data>) -> Self {
        let mut rows = range.rows();
        let Some(header) = rows.next() else {
            return Self::default();
        };
        let columns = unique_labels(header);
        let rows = rows
            .filter(|row| row.iter().any(|cell| !matches!(cell, Data::Empty)))
            .map(|row| row.iter().map(CellValue::from_sheet_cell).collect())
            .collect();
        Self::new(columns, rows)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == label)
    }

    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &CellValue> + '_ {
        self.rows.iter().filter_map(move |row| row.get(index))
    }

    /// Columns are the union of all inputs in first-seen order; a row from an
    /// input lacking a column gets `Null` there.
    pub fn concat(parts: Vec<RowSet>) -> RowSet {
        let mut columns: Vec<String> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        for part in &parts {
            for label in &part.columns {
                if !positions.contains_key(label) {
                    positions.insert(label.clone(), columns.len());
                    columns.push(label.clone());
                }
            }
        }

        let width = columns.len();
        let total = parts.iter().map(RowSet::row_count).sum();
        let mut rows = Vec::with_capacity(total);
        for part in parts {
            let targets = part
                .columns
                .iter()
                .map(|label| positions[label])
                .collect::<Vec<_>>();
            for row in part.rows {
                let mut merged = vec![CellValue::Null; width];
                for (value, target) in row.into_iter().zip(&targets) {
                    merged[*target] = value;
                }
                rows.push(merged);
            }
        }
        RowSet { columns, rows }
    }
}

pub fn read_sheet(path: &Path, sheet: &str) -> Result<RowSet> {
    let mut workbook = open_workbook_auto(path).map_err(|err| ConvertError::Workbook {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    if !workbook.sheet_names().iter().any(|name| name == sheet) {
        return Err(ConvertError::SheetNotFound {
            path: path.to_path_buf(),
            sheet: sheet.to_string(),
        }
        .into());
    }
    let range = workbook
        .worksheet_range(sheet)
        .map_err(|err| ConvertError::Workbook {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
    Ok(RowSet::from_range(&range))
}

pub fn merge_folder(folder: &Path, sheet: &str, extensions: &[String]) -> Result<RowSet> {
    let files = scanner::spreadsheet_files(folder, extensions)?;
    if files.is_empty() {
        return Err(ConvertError::NoSpreadsheets {
            folder: folder.to_path_buf(),
        }
        .into());
    }
    let mut parts = Vec::with_capacity(files.len());
    for file in &files {
        let part = read_sheet(file, sheet)
            .with_context(|| format!("Reading sheet '{sheet}' from {file:?}"))?;
        debug!(
            "Read {} row(s) across {} column(s) from {:?}",
            part.row_count(),
            part.column_count(),
            file
        );
        parts.push(part);
    }
    let merged = RowSet::concat(parts);
    info!(
        "Merged {} file(s) into {} row(s) from {:?}",
        files.len(),
        merged.row_count(),
        folder
    );
    Ok(merged)
}

/// Keeps the first row for each distinct value of `key_column`.
///
/// A missing key column is logged and the row-set comes back untouched.
pub fn remove_duplicate_rows(rowset: RowSet, key_column: &str) -> RowSet {
    let Some(index) = rowset.column_index(key_column) else {
        warn!("Column '{key_column}' not found; keeping all rows");
        return rowset;
    };
    let RowSet { columns, rows } = rowset;
    let before = rows.len();
    let mut kept = Vec::with_capacity(before);
    {
        let mut seen = HashSet::with_capacity(before);
        for row in &rows {
            kept.push(seen.insert(row[index].key()));
        }
    }
    let rows = rows
        .into_iter()
        .zip(kept)
        .filter_map(|(row, keep)| keep.then_some(row))
        .collect::<Vec<_>>();
    if rows.len() < before {
        info!(
            "Removed {} duplicate row(s) keyed on '{key_column}'",
            before - rows.len()
        );
    }
    RowSet { columns, rows }
}

fn unique_labels(header: &[Data]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(header.len());
    let mut suffixes: HashMap<String, usize> = HashMap::new();
    let mut labels = Vec::with_capacity(header.len());
    for (idx, cell) in header.iter().enumerate() {
        let base = match CellValue::from_sheet_cell(cell) {
            CellValue::Null => format!("Unnamed: {idx}"),
            other => other.as_display(),
        };
        let mut label = base.clone();
        if seen.contains(&label) {
            let suffix = suffixes.entry(base.clone()).or_insert(0);
            loop {
                *suffix += 1;
                label = format!("{base}.{suffix}");
                if !seen.contains(&label) {
                    break;
                }
            }
        }
        seen.insert(label.clone());
        labels.push(label);
    }
    labels
}
