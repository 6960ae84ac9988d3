//! Investment models.
//!
//! An [`InvestmentPosition`] carries the three numbers a projection needs. An
//! [`InvestmentHolding`] attaches a name and an asset class to a position for
//! portfolio summaries.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::Money;

/// Lowest accepted annual return, in percent (total loss).
pub const MIN_ANNUAL_RETURN_PERCENT: f64 = -100.0;

/// Highest accepted annual return, in percent.
pub const MAX_ANNUAL_RETURN_PERCENT: f64 = 1000.0;

/// The inputs of a compound-growth projection.
///
/// # Example
///
/// ```
/// use finance_engine::models::{InvestmentPosition, Money};
///
/// let position = InvestmentPosition::new(Money::from_cents(1_000_000), Money::from_cents(50_000), 10.5);
/// assert!(position.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InvestmentPosition {
    /// Balance at month zero.
    pub current_balance: Money,
    /// Contribution added at the end of every month.
    pub monthly_contribution: Money,
    /// Expected annual return in percent (10.5 = 10.5% a year).
    pub annual_return_rate_percent: f64,
}

impl InvestmentPosition {
    /// Creates a position.
    pub fn new(
        current_balance: Money,
        monthly_contribution: Money,
        annual_return_rate_percent: f64,
    ) -> Self {
        Self {
            current_balance,
            monthly_contribution,
            annual_return_rate_percent,
        }
    }

    /// Rejects negative amounts and nonsensical return rates.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if the balance or the contribution is negative
    /// - `InvalidRate` if the rate is not finite or lies outside
    ///   [`MIN_ANNUAL_RETURN_PERCENT`]..=[`MAX_ANNUAL_RETURN_PERCENT`]
    pub fn validate(&self) -> EngineResult<()> {
        if self.current_balance.is_negative() {
            return Err(EngineError::negative_amount(
                "current_balance",
                self.current_balance.cents(),
            ));
        }
        if self.monthly_contribution.is_negative() {
            return Err(EngineError::negative_amount(
                "monthly_contribution",
                self.monthly_contribution.cents(),
            ));
        }
        let rate = self.annual_return_rate_percent;
        if !rate.is_finite() || !(MIN_ANNUAL_RETURN_PERCENT..=MAX_ANNUAL_RETURN_PERCENT).contains(&rate)
        {
            return Err(EngineError::InvalidRate {
                field: "annual_return_rate_percent".to_string(),
                message: format!(
                    "{} must be between {} and {}",
                    rate, MIN_ANNUAL_RETURN_PERCENT, MAX_ANNUAL_RETURN_PERCENT
                ),
            });
        }
        Ok(())
    }
}

/// Asset class of a holding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentKind {
    /// Fixed income (renda fixa).
    FixedIncome,
    /// Equities and other variable income (renda variável).
    VariableIncome,
    /// Investment funds.
    Funds,
    /// Cryptocurrencies.
    Crypto,
    /// Real estate.
    RealEstate,
}

impl InvestmentKind {
    /// Returns the display name shown to users.
    pub fn display_name(&self) -> &'static str {
        match self {
            InvestmentKind::FixedIncome => "Renda Fixa",
            InvestmentKind::VariableIncome => "Renda Variável",
            InvestmentKind::Funds => "Fundos",
            InvestmentKind::Crypto => "Criptomoedas",
            InvestmentKind::RealEstate => "Imóveis",
        }
    }
}

/// A named position of a given asset class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentHolding {
    /// Name given by the user (e.g. "Tesouro Selic 2029").
    pub name: String,
    /// Asset class.
    pub kind: InvestmentKind,
    /// Projection inputs.
    #[serde(flatten)]
    pub position: InvestmentPosition,
}
