//! Record Module
//!
//! The reserve record and the fixed column schema of the register sheet.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ReserveError, Result};

/// Header row of the register sheet, in column order
pub const COLUMNS: [&str; 5] = [
    "N° Réserve",
    "Description",
    "Date de création",
    "Date de levée",
    "Statut",
];

/// Conventional status values offered when adding a record
pub const STATUS_CHOICES: [&str; 4] = ["", "en cours", "levée", "N/A"];

/// Date format used in the sheet
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One reserve (punch-list item)
///
/// Every field keeps the text found in the sheet. An empty string means the
/// cell is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub description: String,
    pub created_at: String,
    pub closed_at: String,
    pub status: String,
}

/// A column of the register, used for addressed edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Id,
    Description,
    CreatedAt,
    ClosedAt,
    Status,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Id,
        Field::Description,
        Field::CreatedAt,
        Field::ClosedAt,
        Field::Status,
    ];

    /// Zero-based column index in the sheet
    pub fn column(self) -> usize {
        self as usize
    }

    /// Header text of this column
    pub fn header(self) -> &'static str {
        COLUMNS[self.column()]
    }
}

impl FromStr for Field {
    type Err = ReserveError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "id" => Ok(Field::Id),
            "description" => Ok(Field::Description),
            "created_at" | "created" => Ok(Field::CreatedAt),
            "closed_at" | "closed" => Ok(Field::ClosedAt),
            "status" => Ok(Field::Status),
            other => Field::ALL
                .into_iter()
                .find(|f| f.header() == other)
                .ok_or_else(|| ReserveError::Validation(format!("unknown field '{}'", other))),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

impl Record {
    /// Build a record from its five fields
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        created_at: impl Into<String>,
        closed_at: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            created_at: created_at.into(),
            closed_at: closed_at.into(),
            status: status.into(),
        }
    }

    /// Build a record from sheet cells in column order; missing cells are empty
    pub fn from_cells<S: AsRef<str>>(cells: &[S]) -> Self {
        let cell = |i: usize| cells.get(i).map(|s| s.as_ref().to_string()).unwrap_or_default();
        Self::new(cell(0), cell(1), cell(2), cell(3), cell(4))
    }

    /// Field values in column order
    pub fn cells(&self) -> [&str; 5] {
        [
            &self.id,
            &self.description,
            &self.created_at,
            &self.closed_at,
            &self.status,
        ]
    }

    pub fn get(&self, field: Field) -> &str {
        self.cells()[field.column()]
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Id => self.id = value,
            Field::Description => self.description = value,
            Field::CreatedAt => self.created_at = value,
            Field::ClosedAt => self.closed_at = value,
            Field::Status => self.status = value,
        }
    }

    /// Creation date, if the stored text parses
    pub fn created_on(&self) -> Option<NaiveDate> {
        parse_date(&self.created_at).ok()
    }
}

/// Parse a sheet date
///
/// Accepts `YYYY-MM-DD`, optionally followed by a time part
/// (`2024-01-01 00:00:00`, `2024-01-01T00:00:00`).
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    let text = text.trim();
    let date_part = text
        .split(|c| c == ' ' || c == 'T')
        .next()
        .unwrap_or_default();
    NaiveDate::parse_from_str(date_part, DATE_FORMAT)
        .map_err(|_| ReserveError::ParseDate(text.to_string()))
}

/// Render a date the way the sheet stores it
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
