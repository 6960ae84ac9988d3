//! Expense split allocation.
//!
//! Divides a shared expense among family members by percentage. Two
//! allocators share the same validation:
//!
//! - [`allocate_split`] rounds every share independently, half away from zero.
//!   The amounts may miss the total by a few centavos; use
//!   [`allocation_residue`] to see by how much.
//! - [`allocate_split_conserving`] uses the largest remainder method, so the
//!   amounts always add up to the total exactly.

use std::collections::HashSet;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::{Money, SplitAllocation, SplitShare};

/// How far the percentages may sum from 100.
pub const SPLIT_SUM_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Checks a split, returning the sum of its percentages.
///
/// Checks run in this order: negative total, no shares, a percentage outside
/// `[0, 100]`, a repeated participant, a sum outside `100 ± 0.01`.
fn validate_split(total: Money, shares: &[SplitShare]) -> EngineResult<Decimal> {
    if total.is_negative() {
        return Err(EngineError::negative_amount("total", total.cents()));
    }
    if shares.is_empty() {
        return Err(EngineError::EmptySplit);
    }

    for share in shares {
        if share.percentage < Decimal::ZERO || share.percentage > Decimal::ONE_HUNDRED {
            return Err(EngineError::InvalidRate {
                field: "percentage".to_string(),
                message: format!(
                    "{}% for participant '{}' must be between 0 and 100",
                    share.percentage, share.participant_id
                ),
            });
        }
    }

    let mut seen = HashSet::with_capacity(shares.len());
    for share in shares {
        if !seen.insert(share.participant_id.as_str()) {
            return Err(EngineError::DuplicateParticipant {
                participant_id: share.participant_id.clone(),
            });
        }
    }

    let sum: Decimal = shares.iter().map(|s| s.percentage).sum();
    if (sum - Decimal::ONE_HUNDRED).abs() > SPLIT_SUM_TOLERANCE {
        warn!(total = %sum, "Split percentages do not sum to 100");
        return Err(EngineError::SplitSumMismatch { total: sum });
    }

    Ok(sum)
}

/// Allocates `total` by rounding each share independently.
///
/// With percentages summing to exactly 100, the allocated amounts differ from
/// `total` by at most `shares.len() - 1` centavos.
///
/// # Errors
///
/// - `InvalidAmount` if `total` is negative
/// - `EmptySplit` if `shares` is empty
/// - `InvalidRate` if a percentage lies outside `[0, 100]`
/// - `DuplicateParticipant` if a participant appears twice
/// - `SplitSumMismatch` if the percentages do not sum to 100 ± 0.01
///
/// # Example
///
/// ```
/// use finance_engine::calculation::{allocate_split, allocation_residue};
/// use finance_engine::models::{Money, SplitShare};
/// use rust_decimal::Decimal;
///
/// let third = Decimal::new(3333, 2);
/// let shares = vec![
///     SplitShare::new("ana", third),
///     SplitShare::new("bruno", third),
///     SplitShare::new("carla", third),
/// ];
/// let total = Money::from_cents(100);
///
/// let allocations = allocate_split(total, &shares).unwrap();
/// assert!(allocations.iter().all(|a| a.amount.cents() == 33));
/// assert_eq!(allocation_residue(total, &allocations).cents(), 1);
/// ```
pub fn allocate_split(total: Money, shares: &[SplitShare]) -> EngineResult<Vec<SplitAllocation>> {
    validate_split(total, shares)?;

    let allocations: Vec<SplitAllocation> = shares
        .iter()
        .map(|share| SplitAllocation {
            participant_id: share.participant_id.clone(),
            percentage: share.percentage,
            amount: total.percentage(share.percentage),
        })
        .collect();

    debug!(
        total_cents = total.cents(),
        participants = shares.len(),
        residue_cents = allocation_residue(total, &allocations).cents(),
        "Allocated split"
    );
    Ok(allocations)
}

/// Allocates `total` so the amounts add up to it exactly.
///
/// Each participant first receives the floor of `total × pct / Σpct`. The
/// centavos left over go one each to the participants with the largest
/// fractional remainders, earlier participants winning ties.
///
/// # Errors
///
/// Same as [`allocate_split`].
pub fn allocate_split_conserving(
    total: Money,
    shares: &[SplitShare],
) -> EngineResult<Vec<SplitAllocation>> {
    let sum = validate_split(total, shares)?;

    let mut floors = Vec::with_capacity(shares.len());
    let mut remainders = Vec::with_capacity(shares.len());
    for share in shares {
        let exact = if sum.is_zero() {
            Decimal::ZERO
        } else {
            total.to_decimal() * share.percentage / sum
        };
        let floor = exact.floor();
        floors.push(Money::from_decimal(floor));
        remainders.push(exact - floor);
    }

    let leftover = total - floors.iter().sum::<Money>();
    let mut order: Vec<usize> = (0..shares.len()).collect();
    // Stable sort keeps input order among equal remainders.
    order.sort_by(|&a, &b| remainders[b].cmp(&remainders[a]));

    let leftover = usize::try_from(leftover.cents()).unwrap_or(0);
    for &index in order.iter().cycle().take(leftover) {
        floors[index] += Money::from_cents(1);
    }

    let allocations: Vec<SplitAllocation> = shares
        .iter()
        .zip(floors)
        .map(|(share, amount)| SplitAllocation {
            participant_id: share.participant_id.clone(),
            percentage: share.percentage,
            amount,
        })
        .collect();

    debug!(
        total_cents = total.cents(),
        participants = shares.len(),
        distributed_cents = leftover,
        "Allocated split by largest remainder"
    );
    Ok(allocations)
}

/// Returns `total` minus the sum of the allocated amounts.
///
/// Positive when rounding left centavos unallocated, negative when it
/// allocated more than the total.
pub fn allocation_residue(total: Money, allocations: &[SplitAllocation]) -> Money {
    total - allocations.iter().map(|a| a.amount).sum::<Money>()
}
