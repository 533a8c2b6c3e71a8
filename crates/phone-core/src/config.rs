//! Simulator configuration
//!
//! Settings can be built in code with the `with_*` methods or read from a
//! TOML file. Every field is optional in the file:
//!
//! ```toml
//! log_level = "debug"
//! initial_phones = 5
//! export_dir = "registers"
//! ```
//!
//! ```rust
//! use phonesim_core::SimulatorConfig;
//!
//! let config = SimulatorConfig::new()
//!     .with_initial_phones(3)
//!     .with_export_dir("registers");
//!
//! assert_eq!(config.initial_phones, 3);
//! assert!(config.validate().is_ok());
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::directory::MAX_GENERATED_PHONES;
use crate::error::{PhoneSimError, PhoneSimResult};
use crate::logging::parse_log_level;

/// Top-level settings of a simulation run
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulatorConfig {
    /// `tracing` level name (trace, debug, info, warn, error)
    pub log_level: String,
    /// Phones generated at startup
    pub initial_phones: usize,
    /// Directory register files are saved into
    pub export_dir: PathBuf,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            initial_phones: 0,
            export_dir: PathBuf::from("."),
        }
    }
}

impl SimulatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document
    pub fn from_toml_str(text: &str) -> PhoneSimResult<Self> {
        let config: SimulatorConfig =
            toml::from_str(text).map_err(|e| PhoneSimError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> PhoneSimResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            PhoneSimError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    pub fn with_initial_phones(mut self, amount: usize) -> Self {
        self.initial_phones = amount;
        self
    }

    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    /// Reject settings that cannot be applied
    pub fn validate(&self) -> PhoneSimResult<()> {
        parse_log_level(&self.log_level)?;
        if self.initial_phones > MAX_GENERATED_PHONES {
            return Err(PhoneSimError::config(format!(
                "initial_phones must be at most {}",
                MAX_GENERATED_PHONES
            )));
        }
        if self.export_dir.as_os_str().is_empty() {
            return Err(PhoneSimError::config("export_dir must not be empty"));
        }
        Ok(())
    }

    /// Location of a register file inside the export directory
    pub fn export_path(&self, file_name: &str) -> PathBuf {
        self.export_dir.join(file_name)
    }
}
