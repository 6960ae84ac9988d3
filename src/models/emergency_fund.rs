//! Emergency fund plan model.

use serde::{Deserialize, Serialize};

use super::Money;

/// Fewest months of expenses an emergency fund may target.
pub const MIN_TARGET_MONTHS: u32 = 3;

/// Most months of expenses an emergency fund may target.
pub const MAX_TARGET_MONTHS: u32 = 24;

/// A family's emergency fund settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyFundPlan {
    /// How many months of expenses the fund should cover.
    pub target_months: u32,
    /// Monthly expenses the fund is sized against.
    pub monthly_expenses: Money,
    /// Amount already saved.
    pub current_amount: Money,
    /// Amount the family plans to save each month.
    pub monthly_goal: Money,
}

impl EmergencyFundPlan {
    /// Returns `monthly_expenses × target_months`.
    pub fn target_amount(&self) -> Money {
        self.monthly_expenses * i64::from(self.target_months)
    }
}

/// How long reaching the target will take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimatedMonths {
    /// The target is reached after this many monthly contributions
    /// (zero when it is already reached).
    Months(u32),
    /// Nothing is being saved, so the target is never reached.
    Unreachable,
}

impl EstimatedMonths {
    /// Returns the number of months, or `None` when unreachable.
    pub fn months(self) -> Option<u32> {
        match self {
            EstimatedMonths::Months(months) => Some(months),
            EstimatedMonths::Unreachable => None,
        }
    }
}
