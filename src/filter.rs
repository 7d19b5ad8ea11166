//! Filter Module
//!
//! Derives the working view from the stored records.

use chrono::NaiveDate;

use crate::record::Record;

/// Status value meaning "no status filtering"
pub const STATUS_ALL: &str = "Tous";

/// Status and minimum-creation-date predicates, combined with AND
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub status: Option<String>,
    pub min_created: Option<NaiveDate>,
}

impl Filter {
    /// A filter that keeps everything
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_min_created(mut self, date: NaiveDate) -> Self {
        self.min_created = Some(date);
        self
    }

    /// Does this record pass both predicates?
    pub fn matches(&self, record: &Record) -> bool {
        if let Some(status) = self.status.as_deref() {
            if status != STATUS_ALL && record.status != status {
                return false;
            }
        }

        if let Some(min) = self.min_created {
            // Unparseable or missing dates never pass
            match record.created_on() {
                Some(created) if created >= min => {}
                _ => return false,
            }
        }

        true
    }

    /// Matching records, in their original order
    pub fn apply(&self, records: &[Record]) -> Vec<Record> {
        records
            .iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect()
    }
}

/// Filter `records` by status and minimum creation date
pub fn filter(records: &[Record], status: Option<&str>, min_created: Option<NaiveDate>) -> Vec<Record> {
    Filter {
        status: status.map(str::to_string),
        min_created,
    }
    .apply(records)
}
