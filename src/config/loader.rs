//! Configuration loading functionality.
//!
//! This module provides the [`RateTableLoader`] type for loading rate tables
//! and engine settings from YAML files.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{CommuteAllowanceBand, InsuranceRate, TaxBracket};

use super::types::{
    CommuteBandsConfig, EngineSettings, InsuranceRatesConfig, RateTableProvider, RateTables,
    TaxBracketsConfig,
};

/// Loads and provides access to rate tables.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/jp_2024/
/// ├── insurance_rates.yaml    # Employee insurance percentages
/// ├── tax_brackets.yaml       # Progressive income tax brackets
/// ├── commute_allowance.yaml  # Commute allowance bands
/// └── engine.yaml             # Optional engine settings
/// ```
///
/// # Example
///
/// ```no_run
/// use payslip_engine::config::{RateTableLoader, RateTableProvider};
///
/// let loader = RateTableLoader::load("./config/jp_2024").unwrap();
/// println!("Loaded {} tax brackets", loader.tax_brackets().len());
/// ```
#[derive(Debug, Clone)]
pub struct RateTableLoader {
    tables: RateTables,
    settings: EngineSettings,
}

impl RateTableLoader {
    /// Loads rate tables from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/jp_2024")
    ///
    /// # Returns
    ///
    /// Returns a `RateTableLoader` on success, or an error if:
    /// - Any required file is missing (`ConfigNotFound`)
    /// - Any file contains invalid YAML or is missing a field (`ConfigParseError`)
    ///
    /// A missing `engine.yaml` is not an error; default settings are used.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let insurance = Self::load_yaml::<InsuranceRatesConfig>(&path.join("insurance_rates.yaml"))?;
        let brackets = Self::load_yaml::<TaxBracketsConfig>(&path.join("tax_brackets.yaml"))?;
        let bands = Self::load_yaml::<CommuteBandsConfig>(&path.join("commute_allowance.yaml"))?;

        let settings_path = path.join("engine.yaml");
        let settings = if settings_path.exists() {
            Self::load_yaml::<EngineSettings>(&settings_path)?
        } else {
            EngineSettings::default()
        };

        debug!(
            path = %path.display(),
            insurance_rates = insurance.insurance_rates.len(),
            tax_brackets = brackets.tax_brackets.len(),
            commute_bands = bands.commute_allowance.len(),
            "Loaded rate tables"
        );

        Ok(Self {
            tables: RateTables {
                insurance_rates: insurance.insurance_rates,
                tax_brackets: brackets.tax_brackets,
                commute_bands: bands.commute_allowance,
            },
            settings,
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the loaded rate tables.
    pub fn tables(&self) -> &RateTables {
        &self.tables
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> EngineSettings {
        self.settings
    }
}

impl RateTableProvider for RateTableLoader {
    fn insurance_rates(&self) -> &[InsuranceRate] {
        &self.tables.insurance_rates
    }

    fn tax_brackets(&self) -> &[TaxBracket] {
        &self.tables.tax_brackets
    }

    fn commute_bands(&self) -> &[CommuteAllowanceBand] {
        &self.tables.commute_bands
    }
}
