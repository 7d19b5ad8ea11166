//! Export Module
//!
//! Renders a set of records as a paginated PDF table.
//!
//! ## Page Layout (A4, millimetres)
//! ```text
//!  10 ┌──────────────────────────────────────────────┐
//!     │              Liste des Réserves              │  title, 10 high
//!  25 ├────────┬────────┬────────┬────────┬────────┬─┘
//!     │ header │ header │ header │ header │ header │   shaded, 8 high
//!  33 ├────────┼────────┼────────┼────────┼────────┤
//!     │ cell   │ cell   │ cell   │ cell   │ cell   │   38 wide each
//!     └────────┴────────┴────────┴────────┴────────┘
//! 282 ─ ─ ─ ─ ─ ─ ─ ─ page break line ─ ─ ─ ─ ─ ─ ─
//! ```

mod layout;
mod metrics;
mod pdf;

pub use layout::{Element, Font, Page, Report, MAX_CELL_CHARS, TITLE};

use crate::error::Result;
use crate::record::Record;

/// Render `records` as PDF bytes
pub fn export(records: &[Record]) -> Result<Vec<u8>> {
    let report = Report::build(records);
    tracing::debug!(
        "Laid out {} row(s) on {} page(s)",
        report.rendered_rows(),
        report.page_count()
    );
    report.to_pdf()
}
