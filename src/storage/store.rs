//! Record Store
//!
//! Owns the authoritative records and their backing sheet.
//!
//! ## Responsibilities
//! - Load every non-empty row after the header, in file order
//! - Append new records straight to disk
//! - Write view edits back to the rows they came from
//! - Maintain the id → sheet row index

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{ReserveError, Result};
use crate::record::{Field, Record, COLUMNS};

use super::workbook::{Cell, Sheet, Workbook};

/// Register of reserves backed by one sheet of an `.xlsx` workbook
///
/// ## Row addressing
/// Row 0 of the sheet is the header. `index` maps each id to the sheet row
/// of the first record carrying it, so duplicate ids already present in the
/// file resolve to their first occurrence. The index is rebuilt after every
/// load and every save.
pub struct RecordStore {
    /// Workbook file
    path: PathBuf,

    /// Name of the records sheet
    sheet_name: String,

    /// Whole workbook as last read or written
    workbook: Workbook,

    /// Records in sheet order
    records: Vec<Record>,

    /// id → zero-based sheet row
    index: HashMap<String, usize>,
}

impl RecordStore {
    /// Open an existing register
    pub fn open(path: &Path, sheet_name: &str) -> Result<Self> {
        let mut store = Self {
            path: path.to_path_buf(),
            sheet_name: sheet_name.to_string(),
            workbook: Workbook::new(),
            records: Vec::new(),
            index: HashMap::new(),
        };
        store.load()?;
        Ok(store)
    }

    /// Create a new register holding only the header row
    ///
    /// Refuses to overwrite an existing file.
    pub fn create(path: &Path, sheet_name: &str) -> Result<Self> {
        if path.exists() {
            return Err(ReserveError::Io(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                format!("{} already exists", path.display()),
            )));
        }

        let mut sheet = Sheet::new(sheet_name);
        for (col, header) in COLUMNS.iter().enumerate() {
            sheet.set(0, col, Cell::Text(header.to_string()));
        }
        let mut workbook = Workbook::new();
        workbook.add_sheet(sheet);
        workbook.write(path)?;

        tracing::info!("Created register {}", path.display());
        Self::open(path, sheet_name)
    }

    /// Re-read the workbook and return all records in file order
    pub fn load(&mut self) -> Result<Vec<Record>> {
        self.workbook = Workbook::read(&self.path)?;
        self.rebuild()?;

        tracing::debug!(
            "Loaded {} record(s) from {}",
            self.records.len(),
            self.path.display()
        );
        Ok(self.records.clone())
    }

    /// Add a record after the last used row and save immediately
    ///
    /// Rejects an empty id and an id already in the register; nothing is
    /// written in that case. A failed write leaves the store as it was.
    pub fn append(&mut self, mut record: Record) -> Result<String> {
        record.id = record.id.trim().to_string();
        if record.id.is_empty() {
            return Err(ReserveError::Validation(
                "N° Réserve must not be empty".to_string(),
            ));
        }
        if self.index.contains_key(&record.id) {
            return Err(ReserveError::Validation(format!(
                "reserve {} already exists",
                record.id
            )));
        }

        let mut staged = self.workbook.clone();
        let sheet = staged
            .sheet_mut(&self.sheet_name)
            .ok_or_else(|| missing_sheet(&self.sheet_name))?;

        // Never write over the header, even in a sheet emptied by hand
        let row = sheet.used_rows().max(1);
        for field in Field::ALL {
            sheet.set(row, field.column(), text_cell(record.get(field)));
        }

        self.commit(staged)?;

        tracing::info!("Appended reserve {} at row {}", record.id, row + 1);
        Ok(record.id)
    }

    /// Write edited view records back to their rows and save
    ///
    /// Each view record updates the row of the first stored record with the
    /// same id; records with unknown ids are ignored. Empty values clear the
    /// cell. A value equal to the cell's current text keeps the cell as is,
    /// so saving an unchanged view does not alter the sheet.
    ///
    /// Returns the number of rows updated. A failed write leaves the store as
    /// it was.
    pub fn save_edits(&mut self, view: &[Record]) -> Result<usize> {
        let mut staged = self.workbook.clone();
        let sheet = staged
            .sheet_mut(&self.sheet_name)
            .ok_or_else(|| missing_sheet(&self.sheet_name))?;

        let mut updated = 0;
        for record in view {
            let Some(&row) = self.index.get(&record.id) else {
                tracing::debug!("No stored reserve {}, skipping", record.id);
                continue;
            };

            for field in Field::ALL {
                let value = record.get(field);
                let col = field.column();
                if sheet.cell(row, col).render() != value {
                    sheet.set(row, col, text_cell(value));
                }
            }
            updated += 1;
        }

        self.commit(staged)?;

        tracing::info!("Saved {} edited reserve(s)", updated);
        Ok(updated)
    }

    /// Records as of the last load or save
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Sheet row (zero-based, header is row 0) holding this id
    pub fn row_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Sorted distinct non-empty statuses
    pub fn distinct_statuses(&self) -> Vec<String> {
        let mut statuses: Vec<String> = self
            .records
            .iter()
            .filter(|r| !r.status.is_empty())
            .map(|r| r.status.clone())
            .collect();
        statuses.sort();
        statuses.dedup();
        statuses
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Write a staged workbook and adopt it
    ///
    /// On a failed write the in-memory workbook stays as last read or
    /// written, so a later save cannot carry the rejected changes.
    fn commit(&mut self, staged: Workbook) -> Result<()> {
        staged.write(&self.path)?;
        self.workbook = staged;
        self.rebuild()
    }

    /// Validate the header and rebuild records and index from the workbook
    fn rebuild(&mut self) -> Result<()> {
        let sheet = self
            .workbook
            .sheet(&self.sheet_name)
            .ok_or_else(|| missing_sheet(&self.sheet_name))?;

        let header = sheet.row_text(0, COLUMNS.len());
        let extra = sheet.cell(0, COLUMNS.len());
        if header != COLUMNS || !extra.is_empty() {
            return Err(ReserveError::Schema(format!(
                "header of sheet '{}' is {:?}, expected {:?}",
                self.sheet_name, header, COLUMNS
            )));
        }

        let mut records = Vec::new();
        let mut index = HashMap::new();
        for row in 1..sheet.row_count() {
            if sheet.is_row_empty(row) {
                continue;
            }
            let record = Record::from_cells(&sheet.row_text(row, COLUMNS.len()));
            if !record.id.is_empty() {
                index.entry(record.id.clone()).or_insert(row);
            }
            records.push(record);
        }

        tracing::debug!("Indexed {} id(s) over {} record(s)", index.len(), records.len());
        self.records = records;
        self.index = index;
        Ok(())
    }
}

fn text_cell(value: &str) -> Cell {
    if value.is_empty() {
        Cell::Empty
    } else {
        Cell::Text(value.to_string())
    }
}

fn missing_sheet(name: &str) -> ReserveError {
    ReserveError::Schema(format!("sheet '{}' not found", name))
}
