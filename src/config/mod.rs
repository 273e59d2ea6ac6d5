//! Configuration loading and rate table access for the payslip engine.
//!
//! This module provides the [`RateTableProvider`] trait the engine reads
//! rates through, an in-memory [`RateTables`] implementation, and
//! [`RateTableLoader`] for loading the tables from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use payslip_engine::config::{RateTableLoader, RateTableProvider};
//!
//! let loader = RateTableLoader::load("./config/jp_2024").unwrap();
//! println!("{} insurance rates", loader.insurance_rates().len());
//! ```

mod loader;
mod types;

pub use loader::RateTableLoader;
pub use types::{
    CommuteBandsConfig, CommutePolicy, EngineSettings, InsuranceRatesConfig, RateTableProvider,
    RateTables, TaxBracketsConfig,
};
