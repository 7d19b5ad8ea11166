//! Configuration for the reserve register
//!
//! The defaults are compiled in; the builder exists so tests and the CLI can
//! point at another workbook.

use std::path::PathBuf;

/// Shared secret admitting a session
pub const DEFAULT_PASSWORD: &str = "admin123";

/// Workbook holding the register
pub const DEFAULT_WORKBOOK: &str = "Sommaire_Projet_Reserves.xlsx";

/// Sheet holding the records
pub const DEFAULT_SHEET: &str = "Réserves";

/// File written by an export
pub const DEFAULT_EXPORT: &str = "export_reserves.pdf";

/// Main configuration
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Path of the `.xlsx` register
    pub workbook_path: PathBuf,

    /// Name of the sheet carrying the records
    pub sheet_name: String,

    // -------------------------------------------------------------------------
    // Export Configuration
    // -------------------------------------------------------------------------
    /// Where the CLI writes exported PDFs
    pub export_path: PathBuf,

    // -------------------------------------------------------------------------
    // Session Configuration
    // -------------------------------------------------------------------------
    /// Shared secret checked by the session gate
    pub password: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workbook_path: PathBuf::from(DEFAULT_WORKBOOK),
            sheet_name: DEFAULT_SHEET.to_string(),
            export_path: PathBuf::from(DEFAULT_EXPORT),
            password: DEFAULT_PASSWORD.to_string(),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the workbook path
    pub fn workbook_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.workbook_path = path.into();
        self
    }

    /// Set the records sheet name
    pub fn sheet_name(mut self, name: impl Into<String>) -> Self {
        self.config.sheet_name = name.into();
        self
    }

    /// Set the export output path
    pub fn export_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.export_path = path.into();
        self
    }

    /// Set the shared secret
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.config.password = password.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
