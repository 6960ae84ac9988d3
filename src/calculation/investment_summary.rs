//! Portfolio summary by asset class.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{InvestmentHolding, InvestmentKind, Money};

/// Totals for one asset class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KindSummary {
    /// The asset class.
    pub kind: InvestmentKind,
    /// Number of holdings of this class.
    pub count: usize,
    /// Sum of current balances.
    pub total_balance: Money,
    /// Sum of monthly contributions.
    pub total_monthly: Money,
    /// Unweighted mean of the holdings' annual return rates, in percent.
    pub average_return_rate_percent: f64,
}

/// Totals across a portfolio, with a breakdown per asset class.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HoldingsSummary {
    /// Sum of current balances.
    pub total_balance: Money,
    /// Sum of monthly contributions.
    pub total_monthly: Money,
    /// One entry per asset class present, in [`InvestmentKind`] order.
    pub by_kind: Vec<KindSummary>,
}

/// Summarizes holdings by asset class.
pub fn summarize_holdings(holdings: &[InvestmentHolding]) -> HoldingsSummary {
    let mut groups: BTreeMap<InvestmentKind, (usize, Money, Money, f64)> = BTreeMap::new();

    for holding in holdings {
        let entry = groups
            .entry(holding.kind)
            .or_insert((0, Money::ZERO, Money::ZERO, 0.0));
        entry.0 += 1;
        entry.1 += holding.position.current_balance;
        entry.2 += holding.position.monthly_contribution;
        entry.3 += holding.position.annual_return_rate_percent;
    }

    let by_kind: Vec<KindSummary> = groups
        .into_iter()
        .map(|(kind, (count, balance, monthly, rate_sum))| KindSummary {
            kind,
            count,
            total_balance: balance,
            total_monthly: monthly,
            average_return_rate_percent: rate_sum / count as f64,
        })
        .collect();

    let summary = HoldingsSummary {
        total_balance: by_kind.iter().map(|k| k.total_balance).sum(),
        total_monthly: by_kind.iter().map(|k| k.total_monthly).sum(),
        by_kind,
    };

    debug!(
        holdings = holdings.len(),
        kinds = summary.by_kind.len(),
        total_balance_cents = summary.total_balance.cents(),
        "Summarized holdings"
    );
    summary
}
