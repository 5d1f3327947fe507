//! Workbook access.
//!
//! The aggregator only ever sees [`Row`]s. This module turns a sheet of a
//! spreadsheet file into rows with absolute addressing: row 0 is sheet row 1
//! and column 0 is column A, whatever the sheet's used range is.

use crate::error::WorkbookError;
use crate::models::{Cell, Row};
use calamine::{open_workbook_auto, Data, Reader, Sheets};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info};

/// Name of the sheet holding the competition rows.
pub const COMPETITION_SHEET: &str = "Wedstrijd";

/// A source of named sheets.
pub trait SheetSource {
    /// Names of all sheets, in workbook order.
    fn sheet_names(&self) -> Vec<String>;

    /// Reads every row of `sheet`. Returns `Ok(None)` if there is no such sheet.
    fn sheet_rows(&mut self, sheet: &str) -> Result<Option<Vec<Row>>, WorkbookError>;

    /// Reads `sheet`, failing with [`WorkbookError::MissingSheet`] if it is absent.
    fn require_sheet(&mut self, sheet: &str) -> Result<Vec<Row>, WorkbookError> {
        match self.sheet_rows(sheet)? {
            Some(rows) => Ok(rows),
            None => Err(WorkbookError::MissingSheet {
                sheet: sheet.to_string(),
                available: self.sheet_names(),
            }),
        }
    }
}

/// A spreadsheet file (xlsx, xlsm, xlsb, xls or ods) opened with calamine.
pub struct ExcelWorkbook {
    sheets: Sheets<BufReader<File>>,
}

impl ExcelWorkbook {
    /// Opens the workbook at `path`, detecting the format from its extension.
    pub fn open(path: &Path) -> Result<Self, WorkbookError> {
        info!("Opening workbook: {}", path.display());

        let sheets = open_workbook_auto(path).map_err(|source| WorkbookError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self { sheets })
    }
}

impl SheetSource for ExcelWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names()
    }

    fn sheet_rows(&mut self, sheet: &str) -> Result<Option<Vec<Row>>, WorkbookError> {
        if !self.sheet_names().iter().any(|name| name == sheet) {
            return Ok(None);
        }

        let range = self
            .sheets
            .worksheet_range(sheet)
            .map_err(|source| WorkbookError::Read {
                sheet: sheet.to_string(),
                source,
            })?;

        let (start_row, start_col) = range.start().unwrap_or((0, 0));
        debug!(
            "Sheet '{}' used range starts at row {}, column {}",
            sheet, start_row, start_col
        );

        let rows = absolute_rows(
            start_row as usize,
            start_col as usize,
            range.rows().map(|cells| cells.iter().map(Cell::from)),
        );

        info!("Read {} rows from sheet '{}'", rows.len(), sheet);
        Ok(Some(rows))
    }
}

/// Pads a range that starts at `(start_row, start_col)` out to A1.
fn absolute_rows<R, C>(start_row: usize, start_col: usize, rows: R) -> Vec<Row>
where
    R: Iterator<Item = C>,
    C: Iterator<Item = Cell>,
{
    let mut out: Vec<Row> = (0..start_row).map(|_| Row::default()).collect();

    for cells in rows {
        let mut row = vec![Cell::Empty; start_col];
        row.extend(cells);
        out.push(Row::new(row));
    }

    out
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => Cell::Empty,
            Data::Error(_) => Cell::Empty,
            Data::String(s) => Cell::Text(s.clone()),
            Data::DateTimeIso(s) => Cell::Text(s.clone()),
            Data::DurationIso(s) => Cell::Text(s.clone()),
            Data::Float(f) => Cell::Number(*f),
            Data::Int(i) => Cell::Number(*i as f64),
            Data::DateTime(dt) => Cell::Number(dt.as_f64()),
            Data::Bool(b) => Cell::Bool(*b),
        }
    }
}

/// In-memory workbook for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryWorkbook {
    sheets: Vec<(String, Vec<Row>)>,
}

#[cfg(test)]
impl MemoryWorkbook {
    pub fn with_sheet(mut self, name: &str, rows: Vec<Row>) -> Self {
        self.sheets.push((name.to_string(), rows));
        self
    }
}

#[cfg(test)]
impl SheetSource for MemoryWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|(name, _)| name.clone()).collect()
    }

    fn sheet_rows(&mut self, sheet: &str) -> Result<Option<Vec<Row>>, WorkbookError> {
        Ok(self
            .sheets
            .iter()
            .find(|(name, _)| name == sheet)
            .map(|(_, rows)| rows.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_rows_pads_offset_range() {
        let rows = absolute_rows(
            2,
            1,
            vec![vec![Cell::from("Jane"), Cell::from("X")].into_iter()].into_iter(),
        );

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], Row::default());
        assert_eq!(rows[2].cell(0), &Cell::Empty);
        assert_eq!(rows[2].cell(1), &Cell::from("Jane"));
        assert_eq!(rows[2].cell(2), &Cell::from("X"));
    }

    #[test]
    fn test_cell_from_data() {
        assert_eq!(Cell::from(&Data::Int(3)), Cell::Number(3.0));
        assert_eq!(Cell::from(&Data::Float(9.5)), Cell::Number(9.5));
        assert_eq!(
            Cell::from(&Data::String("Vault".to_string())),
            Cell::from("Vault")
        );
        assert_eq!(Cell::from(&Data::Empty), Cell::Empty);
        assert_eq!(Cell::from(&Data::Bool(false)), Cell::Bool(false));
    }

    #[test]
    fn test_require_sheet_missing() {
        let mut workbook = MemoryWorkbook::default().with_sheet("Blad1", Vec::new());

        match workbook.require_sheet(COMPETITION_SHEET) {
            Err(WorkbookError::MissingSheet { sheet, available }) => {
                assert_eq!(sheet, "Wedstrijd");
                assert_eq!(available, vec!["Blad1".to_string()]);
            }
            other => panic!("expected missing sheet, got {:?}", other),
        }
    }

    #[test]
    fn test_open_nonexistent_workbook() {
        let result = ExcelWorkbook::open(Path::new("/nonexistent/results.xlsx"));
        assert!(matches!(result, Err(WorkbookError::Open { .. })));
    }
}
