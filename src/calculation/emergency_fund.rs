//! Emergency fund planning.
//!
//! Sizes an emergency fund as a number of months of expenses, tracks progress
//! toward it, suggests a monthly saving amount and projects the fund's growth.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    EmergencyFundPlan, EstimatedMonths, MAX_TARGET_MONTHS, MIN_TARGET_MONTHS, Money,
};

/// Share of available income a suggested goal may never exceed (30%).
pub const MAX_SAVINGS_SHARE: Decimal = Decimal::from_parts(30, 0, 0, false, 2);

/// Share of available income suggested when no deadline is given (15%).
pub const DEFAULT_SAVINGS_SHARE: Decimal = Decimal::from_parts(15, 0, 0, false, 2);

fn check_target_months(target_months: u32) -> EngineResult<()> {
    if (MIN_TARGET_MONTHS..=MAX_TARGET_MONTHS).contains(&target_months) {
        Ok(())
    } else {
        Err(EngineError::InvalidTargetMonths {
            months: target_months,
        })
    }
}

fn check_non_negative(amounts: &[(&str, Money)]) -> EngineResult<()> {
    for (field, amount) in amounts {
        if amount.is_negative() {
            return Err(EngineError::negative_amount(field, amount.cents()));
        }
    }
    Ok(())
}

/// Progress toward an emergency fund target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyFundGoal {
    /// Months of expenses the fund should cover.
    pub target_months: u32,
    /// Monthly expenses the fund is sized against.
    pub monthly_expenses: Money,
    /// `monthly_expenses × target_months`.
    pub target_amount: Money,
    /// Amount already saved.
    pub current_amount: Money,
    /// What is still missing, never negative.
    pub remaining_amount: Money,
    /// Planned monthly saving.
    pub monthly_goal: Money,
    /// Months of saving left.
    pub estimated_months: EstimatedMonths,
    /// Saved share of the target in percent, capped at 100.
    pub completion_percent: Decimal,
    /// True once a non-zero target has been reached.
    pub is_complete: bool,
}

/// Computes progress toward an emergency fund target.
///
/// # Arguments
///
/// * `target_months` - How many months of expenses the fund should cover (3 to 24)
/// * `monthly_expenses` - The monthly expenses the target is sized against
/// * `current_amount` - The amount already saved
/// * `monthly_goal` - The amount saved each month
///
/// # Returns
///
/// Returns an `EmergencyFundGoal` with the target, what remains, the months
/// still needed and the completion percentage.
///
/// # Errors
///
/// - `InvalidTargetMonths` if `target_months` is outside 3..=24
/// - `InvalidAmount` if any amount is negative
///
/// # Example
///
/// ```
/// use finance_engine::calculation::plan_goal;
/// use finance_engine::models::{EstimatedMonths, Money};
///
/// let goal = plan_goal(6, Money::from_cents(200_000), Money::ZERO, Money::from_cents(50_000)).unwrap();
/// assert_eq!(goal.target_amount.cents(), 1_200_000);
/// assert_eq!(goal.estimated_months, EstimatedMonths::Months(24));
/// ```
pub fn plan_goal(
    target_months: u32,
    monthly_expenses: Money,
    current_amount: Money,
    monthly_goal: Money,
) -> EngineResult<EmergencyFundGoal> {
    check_target_months(target_months)?;
    check_non_negative(&[
        ("monthly_expenses", monthly_expenses),
        ("current_amount", current_amount),
        ("monthly_goal", monthly_goal),
    ])?;

    let target_amount = monthly_expenses * i64::from(target_months);
    let remaining_amount = (target_amount - current_amount).clamp_non_negative();

    let estimated_months = if remaining_amount.is_zero() {
        EstimatedMonths::Months(0)
    } else if monthly_goal.is_zero() {
        EstimatedMonths::Unreachable
    } else {
        let (remaining, goal) = (remaining_amount.cents(), monthly_goal.cents());
        let months = remaining / goal + i64::from(remaining % goal != 0);
        EstimatedMonths::Months(u32::try_from(months).unwrap_or(u32::MAX))
    };

    let completion_percent = if target_amount.is_zero() {
        Decimal::ZERO
    } else {
        Money::percentage_of(current_amount, target_amount).min(Decimal::ONE_HUNDRED)
    };

    debug!(
        target_months,
        target_cents = target_amount.cents(),
        remaining_cents = remaining_amount.cents(),
        ?estimated_months,
        "Planned emergency fund goal"
    );

    Ok(EmergencyFundGoal {
        target_months,
        monthly_expenses,
        target_amount,
        current_amount,
        remaining_amount,
        monthly_goal,
        estimated_months,
        completion_percent,
        is_complete: remaining_amount.is_zero() && !target_amount.is_zero(),
    })
}

/// Computes progress for a stored plan.
///
/// # Errors
///
/// Same as [`plan_goal`].
pub fn plan(plan: &EmergencyFundPlan) -> EngineResult<EmergencyFundGoal> {
    plan_goal(
        plan.target_months,
        plan.monthly_expenses,
        plan.current_amount,
        plan.monthly_goal,
    )
}

/// A suggested monthly saving with the figures it was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyGoalSuggestion {
    /// The suggested monthly saving.
    pub suggested: Money,
    /// Income left after expenses and investments; may be negative.
    pub available: Money,
    /// The suggestion as a percentage of available income, zero when nothing
    /// is available.
    pub percentage_of_available: Decimal,
}

/// Suggests a monthly saving toward the emergency fund.
///
/// Available income is income − expenses − investments. When it is not
/// positive the suggestion is zero. With a deadline, the suggestion is the
/// target spread over `desired_months_to_complete`, capped at 30% of available
/// income. Without one (`0`), it is 15% of available income.
///
/// # Errors
///
/// - `InvalidTargetMonths` if `target_months` is outside 3..=24
/// - `InvalidAmount` if any amount is negative
pub fn suggest_monthly_goal(
    total_income: Money,
    total_expenses: Money,
    investments: Money,
    target_months: u32,
    desired_months_to_complete: u32,
) -> EngineResult<Money> {
    suggest_monthly_goal_detailed(
        total_income,
        total_expenses,
        investments,
        target_months,
        desired_months_to_complete,
    )
    .map(|suggestion| suggestion.suggested)
}

/// Like [`suggest_monthly_goal`], also returning available income.
///
/// # Errors
///
/// Same as [`suggest_monthly_goal`].
pub fn suggest_monthly_goal_detailed(
    total_income: Money,
    total_expenses: Money,
    investments: Money,
    target_months: u32,
    desired_months_to_complete: u32,
) -> EngineResult<MonthlyGoalSuggestion> {
    check_target_months(target_months)?;
    check_non_negative(&[
        ("total_income", total_income),
        ("total_expenses", total_expenses),
        ("investments", investments),
    ])?;

    let available = total_income - total_expenses - investments;

    let suggested = if available <= Money::ZERO {
        Money::ZERO
    } else if desired_months_to_complete > 0 {
        let target = total_expenses.to_decimal() * Decimal::from(target_months);
        let spread = Money::from_decimal(target / Decimal::from(desired_months_to_complete));
        spread.min(available.apply_rate(MAX_SAVINGS_SHARE))
    } else {
        available.apply_rate(DEFAULT_SAVINGS_SHARE)
    };

    let percentage_of_available = if available <= Money::ZERO {
        Decimal::ZERO
    } else {
        Money::percentage_of(suggested, available)
    };

    debug!(
        available_cents = available.cents(),
        suggested_cents = suggested.cents(),
        desired_months_to_complete,
        "Suggested emergency fund monthly goal"
    );

    Ok(MonthlyGoalSuggestion {
        suggested,
        available,
        percentage_of_available,
    })
}

/// The fund's balance at the end of a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalProjectionPoint {
    /// Month number, starting at 1.
    pub month: u32,
    /// Balance at the end of the month.
    pub balance: Money,
    /// True once the balance has reached the target.
    pub is_complete: bool,
}

/// Projects the fund month by month.
///
/// While the balance is below `target`, each month adds `monthly_goal`,
/// clamped so the balance never passes the target. A balance already above
/// the target is left as it is.
///
/// # Errors
///
/// Returns `InvalidAmount` if any amount is negative.
pub fn project_goal(
    current_amount: Money,
    monthly_goal: Money,
    target: Money,
    months: u32,
) -> EngineResult<Vec<GoalProjectionPoint>> {
    check_non_negative(&[
        ("current_amount", current_amount),
        ("monthly_goal", monthly_goal),
        ("target", target),
    ])?;

    let mut balance = current_amount;
    let points = (1..=months)
        .map(|month| {
            if balance < target {
                balance = (balance + monthly_goal).min(target);
            }
            GoalProjectionPoint {
                month,
                balance,
                is_complete: balance >= target,
            }
        })
        .collect();

    Ok(points)
}
