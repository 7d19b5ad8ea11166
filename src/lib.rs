//! # Reserves
//!
//! Register of project reserves (punch-list items) kept in an `.xlsx`
//! workbook:
//! - Shared-secret session gate
//! - Load, append and save-back of records with an explicit id index
//! - Status / creation-date filtering of the working view
//! - Paginated PDF export of the view
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        CLI / caller                          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ Command
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                         Engine                               │
//! │          (Session gate → view → store / exporter)            │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┼─────────────────┐
//!          │            │                 │
//!          ▼            ▼                 ▼
//!   ┌─────────────┐ ┌──────────┐  ┌─────────────┐
//!   │ RecordStore │ │  Filter  │  │   Export    │
//!   │   (xlsx)    │ │          │  │   (PDF)     │
//!   └─────────────┘ └──────────┘  └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod session;
pub mod storage;
pub mod filter;
pub mod export;
pub mod command;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ReserveError, Result};
pub use config::Config;
pub use engine::Engine;
pub use filter::{filter, Filter, STATUS_ALL};
pub use record::{Field, Record, COLUMNS};
pub use storage::RecordStore;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
