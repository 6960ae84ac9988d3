//! Error types for the finance engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while computing financial figures.
//! Errors fall into two classes: configuration errors (malformed or missing tax
//! tables, which should never happen with well-formed configuration) and caller
//! input errors (values outside the ranges an operation accepts).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// The main error type for the finance engine.
///
/// Every public operation validates its inputs eagerly and fails fast with the
/// most specific variant. No operation returns a partially computed result.
///
/// # Example
///
/// ```
/// use finance_engine::error::EngineError;
///
/// let error = EngineError::InvalidTargetMonths { months: 2 };
/// assert_eq!(
///     error.to_string(),
///     "Invalid target months 2: must be between 3 and 24"
/// );
/// assert!(!error.is_configuration_error());
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file or directory was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// No active tax tables are effective on the requested date.
    #[error("No tax tables effective on {date}")]
    TaxTablesNotFound {
        /// The date for which tables were requested.
        date: NaiveDate,
    },

    /// A bracket table is malformed (gaps, overlaps, rates out of range, no
    /// unbounded top bracket) or no bracket contains a base amount.
    #[error("Configuration error: {message}")]
    ConfigurationError {
        /// A description of what is wrong with the configuration.
        message: String,
    },

    /// An income kind could not be recognised.
    #[error("Invalid income kind: {kind}")]
    InvalidIncomeKind {
        /// The unrecognised kind.
        kind: String,
    },

    /// A rate or percentage was outside its accepted range.
    #[error("Invalid rate for '{field}': {message}")]
    InvalidRate {
        /// The field holding the rate.
        field: String,
        /// A description of the accepted range.
        message: String,
    },

    /// The emergency fund target was outside the 3 to 24 month range.
    #[error("Invalid target months {months}: must be between 3 and 24")]
    InvalidTargetMonths {
        /// The rejected number of months.
        months: u32,
    },

    /// A monetary amount was negative where only non-negative values are valid.
    #[error("Invalid amount for '{field}': {cents} cents must not be negative")]
    InvalidAmount {
        /// The field holding the amount.
        field: String,
        /// The rejected amount in cents.
        cents: i64,
    },

    /// Split percentages did not add up to 100% within tolerance.
    #[error("Split percentages must sum to 100% (actual: {total}%)")]
    SplitSumMismatch {
        /// The actual sum of the percentages.
        total: Decimal,
    },

    /// The same participant appeared more than once in a split.
    #[error("Participant '{participant_id}' appears more than once in the split")]
    DuplicateParticipant {
        /// The repeated participant.
        participant_id: String,
    },

    /// A split had no shares at all.
    #[error("Split must include at least one participant")]
    EmptySplit,

    /// A money string could not be parsed.
    #[error("Invalid money format: '{input}'")]
    InvalidMoneyFormat {
        /// The rejected input.
        input: String,
    },
}

impl EngineError {
    /// Returns true for errors caused by configuration rather than caller input.
    ///
    /// Configuration errors map to a server-side failure upstream; every other
    /// variant is a validation failure of the caller's input. None of them is
    /// transient, so none should be retried.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            EngineError::ConfigNotFound { .. }
                | EngineError::ConfigParseError { .. }
                | EngineError::TaxTablesNotFound { .. }
                | EngineError::ConfigurationError { .. }
        )
    }

    /// Returns a stable error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                "CONFIG_ERROR"
            }
            EngineError::TaxTablesNotFound { .. } => "TAX_TABLES_NOT_FOUND",
            EngineError::ConfigurationError { .. } => "CONFIGURATION_ERROR",
            EngineError::InvalidIncomeKind { .. } => "INVALID_INCOME_KIND",
            EngineError::InvalidRate { .. } => "INVALID_RATE",
            EngineError::InvalidTargetMonths { .. } => "INVALID_TARGET_MONTHS",
            EngineError::InvalidAmount { .. } => "INVALID_AMOUNT",
            EngineError::SplitSumMismatch { .. } => "SPLIT_SUM_MISMATCH",
            EngineError::DuplicateParticipant { .. } => "DUPLICATE_PARTICIPANT",
            EngineError::EmptySplit => "EMPTY_SPLIT",
            EngineError::InvalidMoneyFormat { .. } => "INVALID_MONEY_FORMAT",
        }
    }

    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        EngineError::ConfigurationError {
            message: message.into(),
        }
    }

    pub(crate) fn negative_amount(field: &str, cents: i64) -> Self {
        EngineError::InvalidAmount {
            field: field.to_string(),
            cents,
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
