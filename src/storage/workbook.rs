//! Workbook I/O
//!
//! Reads every sheet of an `.xlsx` file into a cell grid and writes the grid
//! back. Values and formulas survive a round trip; styles and column widths
//! are not carried.

use std::path::Path;

use calamine::{open_workbook, Data, Reader, Xlsx};
use chrono::NaiveDateTime;
use rust_xlsxwriter::{Format, Formula};

use crate::error::Result;
use crate::record::DATE_FORMAT;

/// A single cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDateTime),
    /// Formula text (no leading `=`) with its last computed value
    Formula { formula: String, value: Box<Cell> },
}

static EMPTY_CELL: Cell = Cell::Empty;

impl Cell {
    /// Convert a calamine value
    fn from_data(data: &Data) -> Self {
        match data {
            Data::Empty => Cell::Empty,
            Data::String(s) if s.is_empty() => Cell::Empty,
            Data::String(s) => Cell::Text(s.clone()),
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Float(f) => Cell::Number(*f),
            Data::Bool(b) => Cell::Bool(*b),
            Data::DateTime(dt) => dt
                .as_datetime()
                .map(Cell::Date)
                .unwrap_or_else(|| Cell::Number(dt.as_f64())),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
            Data::Error(e) => Cell::Text(e.to_string()),
        }
    }

    /// Text shown for this cell in a record field
    ///
    /// Dates render as `YYYY-MM-DD`; integral numbers drop the fraction.
    pub fn render(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Cell::Number(n) => n.to_string(),
            Cell::Bool(b) => b.to_string(),
            Cell::Date(dt) => dt.format(DATE_FORMAT).to_string(),
            Cell::Formula { value, .. } => value.render(),
        }
    }

    /// Only a missing value or a zero-length string counts as empty
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

/// One worksheet as a sparse-free grid of rows
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    name: String,
    rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cell at (row, col), `Empty` outside the grid
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    /// Store a cell, growing the grid as needed
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        if matches!(cell, Cell::Empty) && row >= self.rows.len() {
            return;
        }
        if row >= self.rows.len() {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.rows[row];
        if col >= cells.len() {
            if matches!(cell, Cell::Empty) {
                return;
            }
            cells.resize(col + 1, Cell::Empty);
        }
        cells[col] = cell;
    }

    /// Rendered text of the first `width` cells of a row
    pub fn row_text(&self, row: usize, width: usize) -> Vec<String> {
        (0..width).map(|col| self.cell(row, col).render()).collect()
    }

    /// Number of rows in the grid, including empty ones
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_row_empty(&self, row: usize) -> bool {
        self.rows
            .get(row)
            .map(|cells| cells.iter().all(Cell::is_empty))
            .unwrap_or(true)
    }

    /// Index one past the last non-empty row
    pub fn used_rows(&self) -> usize {
        (0..self.rows.len())
            .rev()
            .find(|&row| !self.is_row_empty(row))
            .map(|row| row + 1)
            .unwrap_or(0)
    }
}

/// All sheets of a workbook, in tab order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every sheet of an `.xlsx` file
    pub fn read(path: &Path) -> Result<Self> {
        let mut source: Xlsx<_> = open_workbook(path)?;

        let mut sheets = Vec::new();
        for name in source.sheet_names() {
            let range = source.worksheet_range(&name)?;
            let (row0, col0) = range.start().unwrap_or((0, 0));

            let mut sheet = Sheet::new(name);
            for (row, col, value) in range.used_cells() {
                sheet.set(row0 as usize + row, col0 as usize + col, Cell::from_data(value));
            }

            // Formulas come as a separate range; keep the cached value beside them
            let formulas = source.worksheet_formula(sheet.name())?;
            let (row0, col0) = formulas.start().unwrap_or((0, 0));
            for (row, col, formula) in formulas.used_cells() {
                if formula.is_empty() {
                    continue;
                }
                let (row, col) = (row0 as usize + row, col0 as usize + col);
                let value = Box::new(sheet.cell(row, col).clone());
                sheet.set(
                    row,
                    col,
                    Cell::Formula {
                        formula: formula.trim_start_matches('=').to_string(),
                        value,
                    },
                );
            }
            sheets.push(sheet);
        }

        tracing::debug!("Read {} sheet(s) from {}", sheets.len(), path.display());
        Ok(Self { sheets })
    }

    /// Write every sheet to an `.xlsx` file, replacing it
    pub fn write(&self, path: &Path) -> Result<()> {
        let mut target = rust_xlsxwriter::Workbook::new();
        let date_format = Format::new().set_num_format("yyyy-mm-dd");

        for sheet in &self.sheets {
            let worksheet = target.add_worksheet();
            worksheet.set_name(sheet.name())?;

            for (r, cells) in sheet.rows.iter().enumerate() {
                let row = r as u32;
                for (c, cell) in cells.iter().enumerate() {
                    let col = c as u16;
                    match cell {
                        Cell::Empty => {}
                        Cell::Text(s) => {
                            worksheet.write_string(row, col, s)?;
                        }
                        Cell::Number(n) => {
                            worksheet.write_number(row, col, *n)?;
                        }
                        Cell::Bool(b) => {
                            worksheet.write_boolean(row, col, *b)?;
                        }
                        Cell::Date(dt) => {
                            worksheet.write_datetime_with_format(row, col, dt, &date_format)?;
                        }
                        Cell::Formula { formula, value } => {
                            let formula = Formula::new(formula).set_result(value.render());
                            worksheet.write_formula(row, col, formula)?;
                        }
                    }
                }
            }
        }

        target.save(path)?;
        tracing::debug!("Wrote {} sheet(s) to {}", self.sheets.len(), path.display());
        Ok(())
    }

    pub fn add_sheet(&mut self, sheet: Sheet) {
        self.sheets.push(sheet);
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut Sheet> {
        self.sheets.iter_mut().find(|s| s.name == name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name()).collect()
    }
}
