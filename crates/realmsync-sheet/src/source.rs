//! Loading tables from spreadsheet documents.
//!
//! Two document shapes are understood:
//! - a spreadsheet file (`.xlsx`, `.xlsm`, `.xls`, `.ods`), one table per sheet
//! - a directory of CSV files, where sheet `Roles` is `Roles.csv`

use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};
use tracing::debug;

use crate::cell::CellValue;
use crate::error::{SheetError, SheetResult};
use crate::table::{Row, Table};

/// A sheet of a document, loaded and forward-filled.
#[derive(Debug, Clone)]
pub struct RecordSource {
    path: PathBuf,
    sheet: String,
    table: Table,
}

impl RecordSource {
    /// Load `sheet` from the document at `path`.
    ///
    /// # Errors
    ///
    /// - `FileNotFound` if `path` does not exist
    /// - `SheetNotFound` if the document has no such sheet
    /// - `Validation` if the sheet has no header row or no data rows
    pub fn load(path: impl AsRef<Path>, sheet: &str) -> SheetResult<Self> {
        let path = path.as_ref().to_path_buf();
        let table = read_sheet(&path, sheet)?;
        Ok(Self {
            path,
            sheet: sheet.to_string(),
            table,
        })
    }

    /// Reload from a different sheet of the same document.
    ///
    /// On error the current sheet stays loaded.
    pub fn switch_sheet(&mut self, sheet: &str) -> SheetResult<()> {
        self.table = read_sheet(&self.path, sheet)?;
        self.sheet = sheet.to_string();
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    pub fn headers(&self) -> &[String] {
        self.table.columns()
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn into_table(self) -> Table {
        self.table
    }

    /// Shorthand for [`Table::project`] on the loaded sheet.
    pub fn project(&self, fields: &[&str]) -> SheetResult<Table> {
        self.table.project(fields)
    }
}

fn read_sheet(path: &Path, sheet: &str) -> SheetResult<Table> {
    if !path.exists() {
        return Err(SheetError::FileNotFound(path.to_path_buf()));
    }

    let (headers, records) = if path.is_dir() {
        read_csv_sheet(path, sheet)?
    } else {
        read_workbook_sheet(path, sheet)?
    };

    let mut table = build_table(path, sheet, headers, records)?;
    table.fill_down();

    debug!(
        path = %path.display(),
        sheet,
        rows = table.len(),
        "loaded sheet"
    );

    Ok(table)
}

type RawSheet = (Vec<String>, Vec<Vec<CellValue>>);

fn read_workbook_sheet(path: &Path, sheet: &str) -> SheetResult<RawSheet> {
    let mut workbook = open_workbook_auto(path)?;

    if !workbook.sheet_names().iter().any(|name| name == sheet) {
        return Err(SheetError::SheetNotFound {
            path: path.to_path_buf(),
            sheet: sheet.to_string(),
        });
    }

    let range = workbook.worksheet_range(sheet)?;
    let mut rows = range.rows();

    let headers = rows
        .next()
        .map(|cells| cells.iter().map(|c| cell_from_data(c).to_string()).collect())
        .unwrap_or_default();
    let records = rows
        .map(|cells| cells.iter().map(cell_from_data).collect())
        .collect();

    Ok((headers, records))
}

fn read_csv_sheet(dir: &Path, sheet: &str) -> SheetResult<RawSheet> {
    let file = dir.join(format!("{sheet}.csv"));
    if !file.is_file() {
        return Err(SheetError::SheetNotFound {
            path: dir.to_path_buf(),
            sheet: sheet.to_string(),
        });
    }

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(&file)?;
    let headers = reader.headers()?.iter().map(str::to_string).collect();

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        records.push(record.iter().map(cell_from_text).collect());
    }

    Ok((headers, records))
}

fn build_table(
    path: &Path,
    sheet: &str,
    headers: Vec<String>,
    records: Vec<Vec<CellValue>>,
) -> SheetResult<Table> {
    let headers: Vec<String> = headers
        .into_iter()
        .enumerate()
        .map(|(i, h)| {
            let h = h.trim();
            if h.is_empty() {
                format!("column_{i}")
            } else {
                h.to_string()
            }
        })
        .collect();

    let mut table = Table::new(headers.iter().cloned());
    for record in records {
        if record.iter().all(CellValue::is_empty) {
            continue;
        }
        let row: Row = headers.iter().cloned().zip(record).collect();
        table.push_row(row);
    }

    if headers.is_empty() || table.is_empty() {
        return Err(SheetError::Validation(format!(
            "The sheet '{}' in file '{}' is empty.",
            sheet,
            path.display()
        )));
    }

    Ok(table)
}

fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) => cell_from_text(s),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        other => CellValue::Text(other.to_string()),
    }
}

fn cell_from_text(text: &str) -> CellValue {
    if text.trim().is_empty() {
        CellValue::Empty
    } else {
        CellValue::Text(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_table_names_blank_headers() {
        let table = build_table(
            Path::new("doc"),
            "Roles",
            vec!["Role".to_string(), " ".to_string()],
            vec![vec![CellValue::from("admin"), CellValue::from("x")]],
        )
        .unwrap();
        assert_eq!(table.columns(), ["Role", "column_1"]);
    }

    #[test]
    fn test_build_table_skips_blank_rows() {
        let table = build_table(
            Path::new("doc"),
            "Roles",
            vec!["Role".to_string()],
            vec![
                vec![CellValue::from("admin")],
                vec![CellValue::Empty],
                vec![CellValue::from("viewer")],
            ],
        )
        .unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_build_table_rejects_header_only_sheet() {
        let err = build_table(Path::new("doc"), "Roles", vec!["Role".to_string()], vec![])
            .unwrap_err();
        assert!(matches!(err, SheetError::Validation(_)));
        assert!(err.to_string().contains("'Roles'"));
    }

    #[test]
    fn test_cell_from_data_numbers() {
        assert_eq!(cell_from_data(&Data::Int(7)), CellValue::Number(7.0));
        assert_eq!(cell_from_data(&Data::Float(1.5)), CellValue::Number(1.5));
        assert_eq!(cell_from_data(&Data::String(" ".into())), CellValue::Empty);
    }
}
