//! Expense split shares.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Money;

/// One participant's percentage of a shared expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitShare {
    /// The family member paying this share.
    pub participant_id: String,
    /// The share of the expense, in percent (50.00 = half).
    pub percentage: Decimal,
}

impl SplitShare {
    /// Creates a share.
    pub fn new(participant_id: impl Into<String>, percentage: Decimal) -> Self {
        Self {
            participant_id: participant_id.into(),
            percentage,
        }
    }
}

/// The amount allocated to one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitAllocation {
    /// The family member paying this share.
    pub participant_id: String,
    /// The percentage the amount was derived from.
    pub percentage: Decimal,
    /// The allocated amount.
    pub amount: Money,
}
