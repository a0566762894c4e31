//! Configuration loading functionality.
//!
//! The [`ConfigLoader`] reads engine settings and the four statutory
//! contribution tables from a YAML directory and validates bracket
//! coverage before anything else runs. Parsing is exposed at the string
//! level so table data can also arrive from a database or fixture.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::contributions::{ContributionTables, ShareBracket, TableSet, TableVersion, TaxBracket};
use crate::error::{EngineError, EngineResult};

use super::types::EngineSettings;

#[derive(Debug, Deserialize)]
struct ShareTableFile {
    versions: Vec<TableVersion<ShareBracket>>,
}

#[derive(Debug, Deserialize)]
struct TaxTableFile {
    versions: Vec<TableVersion<TaxBracket>>,
}

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/ph_2024/
/// ├── settings.yaml        # Engine parameters
/// ├── sss.yaml             # SSS table versions
/// ├── philhealth.yaml      # PhilHealth table versions
/// ├── pagibig.yaml         # Pag-IBIG table versions
/// └── withholding_tax.yaml # Withholding tax table versions
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/ph_2024")?;
/// assert_eq!(loader.settings().overtime_minimum_minutes, 30);
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    settings: EngineSettings,
    tables: ContributionTables,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Errors
    ///
    /// - [`EngineError::ConfigNotFound`] when a required file is missing
    /// - [`EngineError::ConfigParseError`] on invalid YAML
    /// - [`EngineError::InvalidContributionTable`] when a table fails
    ///   bracket-coverage validation
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let settings = {
            let (name, content) = Self::read(&path.join("settings.yaml"))?;
            Self::parse_settings(&name, &content)?
        };
        let mut share = |file: &str| -> EngineResult<TableSet<ShareBracket>> {
            let (name, content) = Self::read(&path.join(file))?;
            Self::parse_share_table(&name, &content)
        };
        let sss = share("sss.yaml")?;
        let philhealth = share("philhealth.yaml")?;
        let pagibig = share("pagibig.yaml")?;
        let withholding = {
            let (name, content) = Self::read(&path.join("withholding_tax.yaml"))?;
            Self::parse_tax_table(&name, &content)?
        };

        let tables = ContributionTables {
            sss,
            philhealth,
            pagibig,
            withholding,
        };
        tables.validate()?;

        Ok(Self { settings, tables })
    }

    fn read(path: &Path) -> EngineResult<(String, String)> {
        let path_str = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;
        Ok((path_str, content))
    }

    fn parse_yaml<T: serde::de::DeserializeOwned>(path: &str, content: &str) -> EngineResult<T> {
        serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    /// Parses engine settings from YAML text.
    pub fn parse_settings(path: &str, yaml: &str) -> EngineResult<EngineSettings> {
        Self::parse_yaml(path, yaml)
    }

    /// Parses a share-based contribution table file from YAML text.
    pub fn parse_share_table(path: &str, yaml: &str) -> EngineResult<TableSet<ShareBracket>> {
        let file: ShareTableFile = Self::parse_yaml(path, yaml)?;
        Ok(TableSet::new(file.versions))
    }

    /// Parses a withholding-tax table file from YAML text.
    pub fn parse_tax_table(path: &str, yaml: &str) -> EngineResult<TableSet<TaxBracket>> {
        let file: TaxTableFile = Self::parse_yaml(path, yaml)?;
        Ok(TableSet::new(file.versions))
    }

    /// Returns the loaded settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Returns the loaded contribution tables.
    pub fn tables(&self) -> &ContributionTables {
        &self.tables
    }
}
