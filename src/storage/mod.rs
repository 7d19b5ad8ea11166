//! Storage Module
//!
//! Persistent storage of the register in an `.xlsx` workbook.
//!
//! ## Sheet Layout
//! ```text
//! ┌────────────┬─────────────┬──────────────────┬───────────────┬────────┐
//! │ N° Réserve │ Description │ Date de création │ Date de levée │ Statut │  row 0
//! ├────────────┼─────────────┼──────────────────┼───────────────┼────────┤
//! │ R1         │ leak        │ 2024-01-01       │               │en cours│  row 1
//! │ R2         │ crack       │ 2024-02-01       │ 2024-03-01    │ levée  │  row 2
//! └────────────┴─────────────┴──────────────────┴───────────────┴────────┘
//! ```
//!
//! Dates are written as `YYYY-MM-DD` text. Other sheets of the workbook are
//! carried through saves.

mod store;
mod workbook;

pub use store::RecordStore;
pub use workbook::{Cell, Sheet, Workbook};
