//! Command definitions
//!
//! One variant per operator action. The engine executes them one at a time.

use crate::filter::Filter;
use crate::record::{Field, Record};

/// An operator action
#[derive(Debug, Clone)]
pub enum Command {
    /// Submit the shared secret
    Unlock { password: String },

    /// Re-read the register and recompute the view
    Reload,

    /// Replace the view filter
    Filter(Filter),

    /// Change one field of a view row
    Edit {
        row: usize,
        field: Field,
        value: String,
    },

    /// Add a row to the view (saved only if its id is already stored)
    PushRow(Record),

    /// Drop a row from the view
    RemoveRow { row: usize },

    /// Submit a new record to the register
    Add(Record),

    /// Write the displayed rows back to the register
    Save,

    /// Render the view as PDF
    Export,
}

impl Command {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::Unlock { .. } => "unlock",
            Command::Reload => "reload",
            Command::Filter(_) => "filter",
            Command::Edit { .. } => "edit",
            Command::PushRow(_) => "push-row",
            Command::RemoveRow { .. } => "remove-row",
            Command::Add(_) => "add",
            Command::Save => "save",
            Command::Export => "export",
        }
    }
}

/// Result of an executed command
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Password checked; `false` when the input was empty
    Unlocked(bool),

    /// Number of rows in the view after the command
    View(usize),

    /// Row removed from the view
    Removed(Record),

    /// Id of the record added
    Added(String),

    /// Number of stored rows updated
    Saved(usize),

    /// PDF document
    Exported(Vec<u8>),
}
