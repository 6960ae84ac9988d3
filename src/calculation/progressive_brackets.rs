//! Progressive bracket engine.
//!
//! Applies a [`TaxBracketTable`] to a base amount in one of two modes:
//!
//! - [`BracketMode::MarginalSum`]: each bracket taxes the slice of the base
//!   inside its band and the slices are summed.
//! - [`BracketMode::MarginalWithDeduction`]: the bracket containing the base
//!   taxes the whole base, then its deduction is subtracted.
//!
//! Intermediate values keep fractional centavos. The result is rounded once,
//! half away from zero.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{BracketMode, Money, TaxBracket, TaxBracketTable};

/// Returns the first bracket whose upper bound is at or above `base`.
///
/// # Errors
///
/// Returns `ConfigurationError` when no bracket contains `base`. A validated
/// table always has an unbounded top bracket, so this only guards the invariant.
pub fn find_bracket(base: Money, table: &TaxBracketTable) -> EngineResult<(usize, &TaxBracket)> {
    table
        .brackets()
        .iter()
        .enumerate()
        .find(|(_, bracket)| bracket.covers(base))
        .ok_or_else(|| {
            EngineError::configuration(format!(
                "no bracket contains base amount {} cents",
                base.cents()
            ))
        })
}

/// Applies a progressive table to `base` and returns the withheld amount.
///
/// # Arguments
///
/// * `base` - The amount the table is applied to
/// * `table` - A validated bracket table
/// * `mode` - Whether slices are summed or the containing bracket's deduction is used
///
/// # Returns
///
/// Returns the withheld amount, rounded once to the centavo.
///
/// # Errors
///
/// - `InvalidAmount` if `base` is negative
/// - `ConfigurationError` if no bracket contains `base`
///
/// # Example
///
/// ```
/// use finance_engine::calculation::apply_progressive_brackets;
/// use finance_engine::models::{BracketMode, Money, TaxBracket, TaxBracketTable};
/// use rust_decimal::Decimal;
///
/// let band = |lower: i64, upper: Option<i64>, pct: i64| TaxBracket {
///     lower_bound: Money::from_cents(lower),
///     upper_bound: upper.map(Money::from_cents),
///     rate: Decimal::new(pct, 2),
///     deduction: Money::ZERO,
/// };
/// let table = TaxBracketTable::new(vec![
///     band(0, Some(1000), 10),
///     band(1000, Some(2000), 20),
///     band(2000, None, 30),
/// ])
/// .unwrap();
///
/// let tax = apply_progressive_brackets(Money::from_cents(2500), &table, BracketMode::MarginalSum).unwrap();
/// assert_eq!(tax.cents(), 450);
/// ```
pub fn apply_progressive_brackets(
    base: Money,
    table: &TaxBracketTable,
    mode: BracketMode,
) -> EngineResult<Money> {
    if base.is_negative() {
        return Err(EngineError::negative_amount("base", base.cents()));
    }

    let exact = match mode {
        BracketMode::MarginalSum => marginal_sum(base, table),
        BracketMode::MarginalWithDeduction => {
            let (_, bracket) = find_bracket(base, table)?;
            (base.to_decimal() * bracket.rate - bracket.deduction.to_decimal()).max(Decimal::ZERO)
        }
    };

    let withheld = Money::from_decimal(exact);
    debug!(
        base_cents = base.cents(),
        ?mode,
        exact = %exact,
        withheld_cents = withheld.cents(),
        "Applied progressive brackets"
    );
    Ok(withheld)
}

fn marginal_sum(base: Money, table: &TaxBracketTable) -> Decimal {
    let mut total = Decimal::ZERO;
    for bracket in table.brackets() {
        if base <= bracket.lower_bound {
            break;
        }
        let top = match bracket.upper_bound {
            Some(upper) => base.min(upper),
            None => base,
        };
        let slice = (top - bracket.lower_bound).clamp_non_negative();
        total += slice.to_decimal() * bracket.rate;
    }
    total
}

/// A withheld amount together with the bracket that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketWithholding {
    /// The amount the table was applied to.
    pub base: Money,
    /// The withheld amount, rounded to the centavo.
    pub withheld: Money,
    /// Index of the bracket containing the base.
    pub bracket_index: usize,
    /// `withheld / base`, or zero for a zero base.
    pub effective_rate: Decimal,
}

/// Like [`apply_progressive_brackets`], also reporting the bracket reached
/// and the effective rate.
///
/// # Errors
///
/// Same as [`apply_progressive_brackets`].
pub fn withhold(
    base: Money,
    table: &TaxBracketTable,
    mode: BracketMode,
) -> EngineResult<BracketWithholding> {
    let withheld = apply_progressive_brackets(base, table, mode)?;
    let (bracket_index, _) = find_bracket(base, table)?;
    let effective_rate = if base.is_zero() {
        Decimal::ZERO
    } else {
        withheld.to_decimal() / base.to_decimal()
    };

    Ok(BracketWithholding {
        base,
        withheld,
        bracket_index,
        effective_rate,
    })
}
