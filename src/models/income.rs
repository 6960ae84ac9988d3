//! Income model and related types.
//!
//! This module defines the [`IncomeRecord`] struct and the [`IncomeKind`] sum
//! type that distinguishes salaried (CLT) from self-employed (PJ) income.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::Money;

/// How an income is taxed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IncomeKind {
    /// Salaried employment (CLT): progressive INSS and IRPF withholding.
    Salaried,
    /// Self-employed or business income (PJ): a flat rate on gross plus a
    /// mandatory owner's draw.
    SelfEmployed {
        /// Flat tax rate as a percentage of gross (e.g. 6.5 for 6.5%).
        flat_rate_percent: Decimal,
        /// Owner's draw ("pró-labore") subtracted before arriving at net.
        #[serde(default)]
        fixed_draw: Money,
    },
}

impl IncomeKind {
    /// Builds a kind from a loosely-typed label plus the self-employed fields.
    ///
    /// Accepts `clt`/`salaried` and `pj`/`self_employed`, case-insensitively.
    /// The flat rate and draw are ignored for salaried income.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIncomeKind` for any other label.
    ///
    /// # Example
    ///
    /// ```
    /// use finance_engine::models::{IncomeKind, Money};
    /// use rust_decimal::Decimal;
    ///
    /// let kind = IncomeKind::parse("PJ", Decimal::new(65, 1), Money::from_cents(141_200)).unwrap();
    /// assert!(kind.is_self_employed());
    /// assert!(IncomeKind::parse("freelance", Decimal::ZERO, Money::ZERO).is_err());
    /// ```
    pub fn parse(label: &str, flat_rate_percent: Decimal, fixed_draw: Money) -> EngineResult<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "clt" | "salaried" => Ok(IncomeKind::Salaried),
            "pj" | "self_employed" => Ok(IncomeKind::SelfEmployed {
                flat_rate_percent,
                fixed_draw,
            }),
            _ => Err(EngineError::InvalidIncomeKind {
                kind: label.to_string(),
            }),
        }
    }

    /// Returns true for salaried income.
    pub fn is_salaried(&self) -> bool {
        matches!(self, IncomeKind::Salaried)
    }

    /// Returns true for self-employed income.
    pub fn is_self_employed(&self) -> bool {
        matches!(self, IncomeKind::SelfEmployed { .. })
    }

    /// Returns the short label used in breakdowns.
    pub fn label(&self) -> &'static str {
        match self {
            IncomeKind::Salaried => "CLT",
            IncomeKind::SelfEmployed { .. } => "PJ",
        }
    }
}

/// Non-salary components paid on top of gross.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Benefits {
    /// Meal/food voucher.
    #[serde(default)]
    pub food_voucher: Money,
    /// Transport voucher.
    #[serde(default)]
    pub transport_voucher: Money,
    /// Bonus.
    #[serde(default)]
    pub bonus: Money,
}

impl Benefits {
    /// Returns the sum of all benefit components.
    pub fn total(&self) -> Money {
        self.food_voucher + self.transport_voucher + self.bonus
    }
}

/// A monthly income to be turned into net pay.
///
/// # Example
///
/// ```
/// use finance_engine::models::{IncomeRecord, Money};
///
/// let record = IncomeRecord::salaried(Money::from_cents(500_000)).with_dependents(2);
/// assert!(record.kind.is_salaried());
/// assert_eq!(record.dependents, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeRecord {
    /// Gross monthly amount.
    pub gross_monthly: Money,
    /// Benefits added to net pay.
    #[serde(default)]
    pub benefits: Benefits,
    /// Number of dependents for the income tax deduction.
    #[serde(default)]
    pub dependents: u32,
    /// How this income is taxed.
    pub kind: IncomeKind,
}

impl IncomeRecord {
    /// Creates a salaried income with no benefits or dependents.
    pub fn salaried(gross_monthly: Money) -> Self {
        Self {
            gross_monthly,
            benefits: Benefits::default(),
            dependents: 0,
            kind: IncomeKind::Salaried,
        }
    }

    /// Creates a self-employed income with no benefits.
    pub fn self_employed(gross_monthly: Money, flat_rate_percent: Decimal, fixed_draw: Money) -> Self {
        Self {
            gross_monthly,
            benefits: Benefits::default(),
            dependents: 0,
            kind: IncomeKind::SelfEmployed {
                flat_rate_percent,
                fixed_draw,
            },
        }
    }

    /// Replaces the benefits.
    pub fn with_benefits(mut self, benefits: Benefits) -> Self {
        self.benefits = benefits;
        self
    }

    /// Replaces the number of dependents.
    pub fn with_dependents(mut self, dependents: u32) -> Self {
        self.dependents = dependents;
        self
    }

    /// Checks amounts and rates before any computation.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if gross, any benefit or the owner's draw is negative
    /// - `InvalidRate` if a self-employed flat rate lies outside `[0, 100]`
    pub fn validate(&self) -> EngineResult<()> {
        let amounts = [
            ("gross_monthly", self.gross_monthly),
            ("food_voucher", self.benefits.food_voucher),
            ("transport_voucher", self.benefits.transport_voucher),
            ("bonus", self.benefits.bonus),
        ];
        for (field, amount) in amounts {
            if amount.is_negative() {
                return Err(EngineError::negative_amount(field, amount.cents()));
            }
        }

        if let IncomeKind::SelfEmployed {
            flat_rate_percent,
            fixed_draw,
        } = &self.kind
        {
            if *flat_rate_percent < Decimal::ZERO || *flat_rate_percent > Decimal::ONE_HUNDRED {
                return Err(EngineError::InvalidRate {
                    field: "flat_rate_percent".to_string(),
                    message: format!("{} must be between 0 and 100", flat_rate_percent),
                });
            }
            if fixed_draw.is_negative() {
                return Err(EngineError::negative_amount("fixed_draw", fixed_draw.cents()));
            }
        }

        Ok(())
    }
}
