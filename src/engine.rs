//! Engine Module
//!
//! Top-level handler for one operator session.
//!
//! ## Responsibilities
//! - Own the session gate and refuse work until it is open
//! - Open the register once the operator is admitted
//! - Keep the filtered, editable view
//! - Route commands to the store, the filter and the exporter

use crate::command::{Command, Outcome};
use crate::config::Config;
use crate::error::{ReserveError, Result};
use crate::export;
use crate::filter::{Filter, STATUS_ALL};
use crate::record::{Field, Record};
use crate::session::{CredentialCheck, Session, StaticSecret};
use crate::storage::RecordStore;

/// Session-scoped register handler
///
/// ## Lifecycle
/// - `open`: session locked, register not read yet
/// - `unlock`: on success, load the register and compute the view
/// - view edits stay in memory until `save`
/// - `close`: lock the session and drop everything
///
/// Every operation other than `unlock` fails with `Auth` while the session is
/// locked.
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// Gate for this session
    session: Session,

    /// Register, opened after admission
    store: Option<RecordStore>,

    /// Active filter
    filter: Filter,

    /// Filtered, possibly edited rows
    view: Vec<Record>,
}

impl Engine {
    /// Start a locked session checking against the configured secret
    pub fn open(config: Config) -> Self {
        let credentials = StaticSecret::new(config.password.clone());
        Self::with_credentials(config, credentials)
    }

    /// Start a locked session with a custom credential check
    pub fn with_credentials(config: Config, credentials: impl CredentialCheck + 'static) -> Self {
        Self {
            config,
            session: Session::new(credentials),
            store: None,
            filter: Filter::all(),
            view: Vec::new(),
        }
    }

    /// Execute a command
    pub fn execute(&mut self, command: Command) -> Result<Outcome> {
        tracing::debug!("Executing {}", command.name());

        match command {
            Command::Unlock { password } => self.unlock(&password).map(Outcome::Unlocked),
            Command::Reload => self.reload().map(|v| Outcome::View(v.len())),
            Command::Filter(filter) => self.set_filter(filter).map(|v| Outcome::View(v.len())),
            Command::Edit { row, field, value } => {
                self.edit(row, field, value)?;
                Ok(Outcome::View(self.view.len()))
            }
            Command::PushRow(record) => {
                self.push_row(record)?;
                Ok(Outcome::View(self.view.len()))
            }
            Command::RemoveRow { row } => self.remove_row(row).map(Outcome::Removed),
            Command::Add(record) => self.add(record).map(Outcome::Added),
            Command::Save => self.save().map(Outcome::Saved),
            Command::Export => self.export().map(Outcome::Exported),
        }
    }

    /// Submit the shared secret; on success load the register
    ///
    /// Returns `Ok(false)` for empty input and `Err(Auth)` for a wrong secret.
    pub fn unlock(&mut self, password: &str) -> Result<bool> {
        if !self.session.check(password)? {
            return Ok(false);
        }

        self.reload()?;
        tracing::info!("Session opened on {}", self.config.workbook_path.display());
        Ok(true)
    }

    /// Re-read the register and recompute the view
    ///
    /// Unsaved view edits are discarded.
    pub fn reload(&mut self) -> Result<&[Record]> {
        let records = self.store_mut()?.load()?;
        self.view = self.filter.apply(&records);
        Ok(&self.view)
    }

    /// Replace the filter and recompute the view from the loaded records
    pub fn set_filter(&mut self, filter: Filter) -> Result<&[Record]> {
        let view = filter.apply(self.store_mut()?.records());
        self.filter = filter;
        self.view = view;
        Ok(&self.view)
    }

    /// The current view
    pub fn view(&self) -> Result<&[Record]> {
        self.session.require()?;
        Ok(&self.view)
    }

    /// Status choices offered by the filter: "Tous" then the distinct statuses
    pub fn status_choices(&mut self) -> Result<Vec<String>> {
        let statuses = self.store_mut()?.distinct_statuses();
        Ok(std::iter::once(STATUS_ALL.to_string()).chain(statuses).collect())
    }

    /// Change one field of a view row
    pub fn edit(&mut self, row: usize, field: Field, value: impl Into<String>) -> Result<()> {
        self.session.require()?;
        let record = self.view.get_mut(row).ok_or_else(|| out_of_range(row))?;
        record.set(field, value);
        Ok(())
    }

    /// Append a row to the view
    pub fn push_row(&mut self, record: Record) -> Result<()> {
        self.session.require()?;
        self.view.push(record);
        Ok(())
    }

    /// Remove a row from the view
    ///
    /// The stored record is not deleted; saving only updates rows.
    pub fn remove_row(&mut self, row: usize) -> Result<Record> {
        self.session.require()?;
        if row >= self.view.len() {
            return Err(out_of_range(row));
        }
        Ok(self.view.remove(row))
    }

    /// Submit a new record, then reload the view
    pub fn add(&mut self, record: Record) -> Result<String> {
        let id = self.store_mut()?.append(record)?;
        self.reload()?;
        Ok(id)
    }

    /// Write the view back to the register, then reload it
    pub fn save(&mut self) -> Result<usize> {
        let view = std::mem::take(&mut self.view);
        let result = self.store_mut().and_then(|store| store.save_edits(&view));
        match result {
            Ok(updated) => {
                let records = self.store_mut()?.records().to_vec();
                self.view = self.filter.apply(&records);
                Ok(updated)
            }
            Err(e) => {
                self.view = view;
                Err(e)
            }
        }
    }

    /// Render the view as PDF bytes
    pub fn export(&self) -> Result<Vec<u8>> {
        self.session.require()?;
        let bytes = export::export(&self.view)?;
        tracing::info!("Exported {} reserve(s), {} bytes", self.view.len(), bytes.len());
        Ok(bytes)
    }

    /// End the session
    pub fn close(mut self) {
        self.session.lock();
        tracing::debug!("Session closed");
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// The register, opened on first use after admission
    fn store_mut(&mut self) -> Result<&mut RecordStore> {
        self.session.require()?;

        let store = match self.store.take() {
            Some(store) => store,
            None => RecordStore::open(&self.config.workbook_path, &self.config.sheet_name)?,
        };
        Ok(self.store.insert(store))
    }
}

fn out_of_range(row: usize) -> ReserveError {
    ReserveError::Validation(format!("row {} is not in the view", row))
}
