//! Family income summary.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::Money;

use super::net_income::NetIncomeResult;

/// One family member's computed income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberIncome {
    /// The family member.
    pub member_id: String,
    /// The member's net income result.
    pub result: NetIncomeResult,
}

/// A single member's line in a family summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberIncomeLine {
    /// The family member.
    pub member_id: String,
    /// Gross income.
    pub gross: Money,
    /// Taxes withheld.
    pub withheld: Money,
    /// Net income.
    pub net: Money,
}

/// Household totals across every member's income.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyIncomeSummary {
    /// Sum of gross incomes.
    pub total_gross: Money,
    /// Sum of benefits.
    pub total_benefits: Money,
    /// Sum of taxes withheld.
    pub total_withheld: Money,
    /// Sum of net incomes.
    pub total_net: Money,
    /// Per-member lines, in input order.
    pub members: Vec<MemberIncomeLine>,
}

/// Totals the net income results of a household.
///
/// A member may appear more than once (one entry per income source).
pub fn summarize_family_income(incomes: &[MemberIncome]) -> FamilyIncomeSummary {
    let mut summary = FamilyIncomeSummary::default();

    for income in incomes {
        let withheld = income.result.breakdown.total_withheld();
        summary.total_gross += income.result.gross;
        summary.total_benefits += income.result.benefits;
        summary.total_withheld += withheld;
        summary.total_net += income.result.net;
        summary.members.push(MemberIncomeLine {
            member_id: income.member_id.clone(),
            gross: income.result.gross,
            withheld,
            net: income.result.net,
        });
    }

    debug!(
        member_count = incomes.len(),
        total_net_cents = summary.total_net.cents(),
        "Summarized family income"
    );
    summary
}
