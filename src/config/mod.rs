//! Tax table configuration.
//!
//! This module loads dated INSS/IRPF tables from YAML files and provides the
//! compiled-in tables used when a caller explicitly opts into a fallback.
//!
//! # Example
//!
//! ```no_run
//! use finance_engine::config::{TaxConfigLoader, TaxTables};
//! use chrono::NaiveDate;
//!
//! let loader = TaxConfigLoader::load("./config/tax").unwrap();
//! let fallback = TaxTables::defaults().unwrap();
//! let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
//! let tables = loader.tables_effective_on_or(date, &fallback);
//! println!("Using tables effective {}", tables.effective_date);
//! ```

mod defaults;
mod loader;
mod types;

pub use defaults::{
    DEFAULT_DEPENDENT_DEDUCTION, DEFAULT_EFFECTIVE_DATE, DEFAULT_INCOME_TAX_BRACKETS,
    DEFAULT_SOCIAL_SECURITY_BRACKETS, DEFAULT_WELFARE_FUND_RATE,
};
pub use loader::TaxConfigLoader;
pub use types::{TaxTableFile, TaxTables};
