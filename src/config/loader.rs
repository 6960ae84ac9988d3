//! Configuration loading functionality.
//!
//! This module provides the [`TaxConfigLoader`] type for loading tax tables
//! from a directory of YAML files.

use chrono::{Datelike, NaiveDate};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{EngineError, EngineResult};

use super::types::{TaxTableFile, TaxTables};

/// Loads and provides access to dated tax tables.
///
/// # Directory Structure
///
/// Every `*.yaml` file in the directory describes one set of tables:
/// ```text
/// config/tax/
/// ├── 2024.yaml   # effective_date: "2024-01-01"
/// └── 2025.yaml   # effective_date: "2025-01-01"
/// ```
///
/// Files with `active: false` are skipped.
///
/// # Example
///
/// ```no_run
/// use finance_engine::config::TaxConfigLoader;
/// use chrono::NaiveDate;
///
/// let loader = TaxConfigLoader::load("./config/tax")?;
/// let date = NaiveDate::from_ymd_opt(2024, 8, 1).unwrap();
/// let tables = loader.tables_effective_on(date)?;
/// println!("Dependent deduction: {}", tables.dependent_deduction);
/// # Ok::<(), finance_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct TaxConfigLoader {
    /// Sorted by effective date, oldest first. Never empty.
    tables: Vec<TaxTables>,
}

impl TaxConfigLoader {
    /// Loads every active tax table file from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `TaxConfigLoader` on success, or an error if:
    /// - The directory is missing or holds no active table files
    /// - Any file contains invalid YAML or misses a required field
    /// - Any table is malformed, or two files share an effective date
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let dir = path.as_ref();
        let dir_str = dir.display().to_string();

        if !dir.is_dir() {
            return Err(EngineError::ConfigNotFound { path: dir_str });
        }

        let entries = fs::read_dir(dir).map_err(|_| EngineError::ConfigNotFound {
            path: dir_str.clone(),
        })?;

        let mut tables = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: dir_str.clone(),
            })?;

            let path = entry.path();
            if !path.extension().is_some_and(|ext| ext == "yaml" || ext == "yml") {
                continue;
            }

            let file = Self::load_yaml::<TaxTableFile>(&path)?;
            if !file.active {
                debug!(path = %path.display(), "Skipping inactive tax table file");
                continue;
            }

            let parsed = TaxTables::try_from(file).map_err(|e| match e {
                EngineError::ConfigurationError { message } => EngineError::ConfigurationError {
                    message: format!("{}: {}", path.display(), message),
                },
                other => other,
            })?;
            tables.push(parsed);
        }

        if tables.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no active tax table files found)", dir_str),
            });
        }

        let loader = Self::from_tables(tables)?;
        info!(
            path = %dir_str,
            table_count = loader.tables.len(),
            "Loaded tax tables"
        );
        Ok(loader)
    }

    /// Builds a loader from tables already in memory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigNotFound` for an empty list and `ConfigurationError`
    /// when two sets share an effective date.
    pub fn from_tables(mut tables: Vec<TaxTables>) -> EngineResult<Self> {
        if tables.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: "(no tax tables supplied)".to_string(),
            });
        }

        tables.sort_by_key(|t| t.effective_date);
        if let Some(pair) = tables
            .windows(2)
            .find(|pair| pair[0].effective_date == pair[1].effective_date)
        {
            return Err(EngineError::configuration(format!(
                "two tax table sets share the effective date {}",
                pair[0].effective_date
            )));
        }

        Ok(Self { tables })
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

    /// Returns every loaded table set, oldest first.
    pub fn tables(&self) -> &[TaxTables] {
        &self.tables
    }

    /// Returns the most recent table set effective on or before `date`.
    ///
    /// # Errors
    ///
    /// Returns `TaxTablesNotFound` when `date` precedes every loaded set.
    pub fn tables_effective_on(&self, date: NaiveDate) -> EngineResult<&TaxTables> {
        self.tables
            .iter()
            .rfind(|t| t.effective_date <= date)
            .ok_or(EngineError::TaxTablesNotFound { date })
    }

    /// Returns the tables in force on the last day of `year`.
    ///
    /// # Errors
    ///
    /// Returns `TaxTablesNotFound` when no set is effective by then, or
    /// `ConfigurationError` for a year chrono cannot represent.
    pub fn tables_for_year(&self, year: i32) -> EngineResult<&TaxTables> {
        let date = NaiveDate::from_ymd_opt(year, 12, 31)
            .ok_or_else(|| EngineError::configuration(format!("year {} is out of range", year)))?;
        self.tables_effective_on(date)
    }

    /// Like [`tables_effective_on`](Self::tables_effective_on), but returns
    /// `fallback` instead of failing.
    ///
    /// Callers pass [`TaxTables::defaults`] (or their own tables) here to make
    /// the fallback an explicit decision.
    pub fn tables_effective_on_or<'a>(
        &'a self,
        date: NaiveDate,
        fallback: &'a TaxTables,
    ) -> &'a TaxTables {
        match self.tables_effective_on(date) {
            Ok(tables) => tables,
            Err(_) => {
                warn!(
                    %date,
                    fallback_effective_date = %fallback.effective_date,
                    "No tax tables effective on date, using fallback tables"
                );
                fallback
            }
        }
    }

    /// Returns the most recent table set.
    pub fn latest(&self) -> &TaxTables {
        // `tables` is never empty; see `from_tables`.
        &self.tables[self.tables.len() - 1]
    }

    /// Returns the years in which at least one loaded set took effect.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.tables.iter().map(|t| t.effective_date.year()).collect();
        years.dedup();
        years
    }
}
