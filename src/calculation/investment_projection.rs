//! Investment projection engine.
//!
//! Projects compound growth month by month. The balance compounds at the
//! effective monthly rate equivalent to the annual rate, not at annual / 12,
//! and the contribution is added at the end of every month.
//!
//! Simulation state stays in `f64`; each emitted point rounds the running
//! totals to the centavo, so rounding never feeds back into later months.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::EngineResult;
use crate::models::{InvestmentPosition, Money};

/// Checkpoints reported when the caller has no preference: 1, 3 and 5 years.
pub const DEFAULT_CHECKPOINTS: [u32; 3] = [12, 36, 60];

/// Returns the monthly rate equivalent to `annual_percent` compounded
/// monthly: `(1 + annual / 100)^(1/12) - 1`.
///
/// # Example
///
/// ```
/// use finance_engine::calculation::monthly_rate;
///
/// let rate = monthly_rate(12.682503013196972);
/// assert!((rate - 0.01).abs() < 1e-12);
/// ```
pub fn monthly_rate(annual_percent: f64) -> f64 {
    (1.0 + annual_percent / 100.0).powf(1.0 / 12.0) - 1.0
}

/// The state of a projection at the end of a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    /// Month number, starting at 1.
    pub month: u32,
    /// Balance after the month's return and contribution.
    pub balance: Money,
    /// Contributions made so far, excluding the starting balance.
    pub total_contributed: Money,
    /// Returns earned so far.
    pub total_returns: Money,
}

/// A lazy month-by-month projection of one position.
///
/// Yields exactly as many points as months requested, then ends.
#[derive(Debug, Clone)]
pub struct MonthlyProjection {
    rate: f64,
    contribution: f64,
    balance: f64,
    contributed: f64,
    returns: f64,
    month: u32,
    months: u32,
}

impl Iterator for MonthlyProjection {
    type Item = ProjectionPoint;

    fn next(&mut self) -> Option<ProjectionPoint> {
        if self.month >= self.months {
            return None;
        }
        self.month += 1;

        let monthly_return = self.balance * self.rate;
        self.balance += monthly_return + self.contribution;
        self.contributed += self.contribution;
        self.returns += monthly_return;

        Some(ProjectionPoint {
            month: self.month,
            balance: Money::from_f64(self.balance),
            total_contributed: Money::from_f64(self.contributed),
            total_returns: Money::from_f64(self.returns),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.months - self.month) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for MonthlyProjection {}

/// Starts a projection of `position` over `months` months.
///
/// # Arguments
///
/// * `position` - The starting balance, monthly contribution and annual rate
/// * `months` - The horizon; zero yields an empty projection
///
/// # Returns
///
/// Returns a `MonthlyProjection` iterator yielding one `ProjectionPoint` per
/// month. Balances too large for an `i64` count of centavos saturate.
///
/// # Errors
///
/// Returns the position's validation error (negative amounts, a rate that is
/// not finite or lies outside -100%..=1000%).
///
/// # Example
///
/// ```
/// use finance_engine::calculation::project_single;
/// use finance_engine::models::{InvestmentPosition, Money};
///
/// let position = InvestmentPosition::new(Money::from_cents(100_000), Money::ZERO, 0.0);
/// let points: Vec<_> = project_single(&position, 3).unwrap().collect();
/// assert_eq!(points.len(), 3);
/// assert!(points.iter().all(|p| p.balance.cents() == 100_000));
/// ```
pub fn project_single(position: &InvestmentPosition, months: u32) -> EngineResult<MonthlyProjection> {
    position.validate()?;

    Ok(MonthlyProjection {
        rate: monthly_rate(position.annual_return_rate_percent),
        contribution: position.monthly_contribution.cents() as f64,
        balance: position.current_balance.cents() as f64,
        contributed: 0.0,
        returns: 0.0,
        month: 0,
        months,
    })
}

/// Projects several positions and sums their points month by month.
///
/// Every position compounds on its own; only the rounded points are added,
/// saturating at the `Money` bounds.
/// With no positions, every month reports zero.
///
/// # Errors
///
/// Returns the first invalid position's validation error.
pub fn project_many(positions: &[InvestmentPosition], months: u32) -> EngineResult<Vec<ProjectionPoint>> {
    let projections = positions
        .iter()
        .map(|position| project_single(position, months))
        .collect::<EngineResult<Vec<_>>>()?;

    let mut combined: Vec<ProjectionPoint> = (1..=months)
        .map(|month| ProjectionPoint {
            month,
            balance: Money::ZERO,
            total_contributed: Money::ZERO,
            total_returns: Money::ZERO,
        })
        .collect();

    for projection in projections {
        for (slot, point) in combined.iter_mut().zip(projection) {
            slot.balance += point.balance;
            slot.total_contributed += point.total_contributed;
            slot.total_returns += point.total_returns;
        }
    }

    debug!(
        positions = positions.len(),
        months,
        final_balance_cents = combined.last().map(|p| p.balance.cents()).unwrap_or(0),
        "Projected investments"
    );
    Ok(combined)
}

/// Picks the points at the requested months, in checkpoint order.
///
/// Checkpoints beyond the end of `points` are omitted.
pub fn summarize_checkpoints(points: &[ProjectionPoint], checkpoints: &[u32]) -> Vec<ProjectionPoint> {
    checkpoints
        .iter()
        .filter_map(|&month| points.iter().find(|p| p.month == month).copied())
        .collect()
}

/// A combined projection with its starting figures and checkpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionReport {
    /// Sum of the starting balances.
    pub current_balance: Money,
    /// Sum of the monthly contributions.
    pub monthly_contribution: Money,
    /// One point per month.
    pub points: Vec<ProjectionPoint>,
    /// The points at [`DEFAULT_CHECKPOINTS`] that fall within the horizon.
    pub checkpoints: Vec<ProjectionPoint>,
}

/// Projects `positions` and extracts the default checkpoints.
///
/// # Errors
///
/// Same as [`project_many`].
pub fn project_report(positions: &[InvestmentPosition], months: u32) -> EngineResult<ProjectionReport> {
    let points = project_many(positions, months)?;
    let checkpoints = summarize_checkpoints(&points, &DEFAULT_CHECKPOINTS);

    Ok(ProjectionReport {
        current_balance: positions.iter().map(|p| p.current_balance).sum(),
        monthly_contribution: positions.iter().map(|p| p.monthly_contribution).sum(),
        points,
        checkpoints,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    fn position(balance: i64, contribution: i64, rate: f64) -> InvestmentPosition {
        InvestmentPosition::new(
            Money::from_cents(balance),
            Money::from_cents(contribution),
            rate,
        )
    }

    #[test]
    fn test_monthly_rate_is_compound_not_linear() {
        let rate = monthly_rate(12.0);
        assert!(rate < 0.01);
        assert!((rate - 0.0094887929).abs() < 1e-9);
        assert_eq!(monthly_rate(0.0), 0.0);
    }

    #[test]
    fn test_zero_rate_zero_contribution_is_constant() {
        let points: Vec<_> = project_single(&position(100_000, 0, 0.0), 120)
            .unwrap()
            .collect();
        assert_eq!(points.len(), 120);
        for point in &points {
            assert_eq!(point.balance.cents(), 100_000);
            assert_eq!(point.total_returns, Money::ZERO);
            assert_eq!(point.total_contributed, Money::ZERO);
        }
    }

    #[test]
    fn test_one_percent_monthly_rate() {
        let mut projection = project_single(&position(100_000, 0, 12.682503013196972), 2).unwrap();

        let first = projection.next().unwrap();
        assert_eq!(first.month, 1);
        assert!((first.balance.cents() - 101_000).abs() <= 1);

        let second = projection.next().unwrap();
        assert!((second.balance.cents() - 102_010).abs() <= 1);
        assert!(projection.next().is_none());
    }

    #[test]
    fn test_contributions_without_growth() {
        let points: Vec<_> = project_single(&position(0, 50_000, 0.0), 12).unwrap().collect();
        assert_eq!(points[11].balance.cents(), 600_000);
        assert_eq!(points[11].total_contributed.cents(), 600_000);
    }

    #[test]
    fn test_balance_equals_start_plus_contributions_plus_returns() {
        let points: Vec<_> = project_single(&position(1_000_000, 50_000, 10.5), 60)
            .unwrap()
            .collect();
        for point in &points {
            let rebuilt = 1_000_000 + point.total_contributed.cents() + point.total_returns.cents();
            assert!((point.balance.cents() - rebuilt).abs() <= 1);
        }
    }

    #[test]
    fn test_total_loss() {
        let points: Vec<_> = project_single(&position(100_000, 0, -100.0), 3).unwrap().collect();
        assert!(points.iter().all(|p| p.balance == Money::ZERO));
    }

    #[test]
    fn test_zero_horizon_is_empty() {
        let projection = project_single(&position(100, 100, 5.0), 0).unwrap();
        assert_eq!(projection.len(), 0);
        assert!(project_many(&[position(100, 100, 5.0)], 0).unwrap().is_empty());
    }

    #[test]
    fn test_iterator_reports_exact_length() {
        let mut projection = project_single(&position(100, 100, 5.0), 5).unwrap();
        assert_eq!(projection.len(), 5);
        projection.next();
        assert_eq!(projection.len(), 4);
    }

    #[test]
    fn test_invalid_position_is_rejected() {
        assert!(matches!(
            project_single(&position(-1, 0, 5.0), 12),
            Err(EngineError::InvalidAmount { .. })
        ));
        assert!(matches!(
            project_many(&[position(0, 0, 5.0), position(0, 0, f64::NAN)], 12),
            Err(EngineError::InvalidRate { .. })
        ));
    }

    #[test]
    fn test_many_sums_independent_projections() {
        let a = position(1_000_000, 10_000, 8.0);
        let b = position(500_000, 0, 15.0);

        let combined = project_many(&[a, b], 24).unwrap();
        let only_a: Vec<_> = project_single(&a, 24).unwrap().collect();
        let only_b: Vec<_> = project_single(&b, 24).unwrap().collect();

        for ((c, pa), pb) in combined.iter().zip(&only_a).zip(&only_b) {
            assert_eq!(c.month, pa.month);
            assert_eq!(c.balance, pa.balance + pb.balance);
            assert_eq!(c.total_contributed, pa.total_contributed + pb.total_contributed);
            assert_eq!(c.total_returns, pa.total_returns + pb.total_returns);
        }
    }

    #[test]
    fn test_many_differs_from_averaging_rates() {
        // Compounding 0% and 20% separately beats compounding 10% on the sum.
        let combined = project_many(&[position(100_000, 0, 0.0), position(100_000, 0, 20.0)], 120)
            .unwrap();
        let averaged: Vec<_> = project_single(&position(200_000, 0, 10.0), 120)
            .unwrap()
            .collect();
        assert!(combined[119].balance > averaged[119].balance);
    }

    #[test]
    fn test_many_without_positions_reports_zeros() {
        let points = project_many(&[], 3).unwrap();
        assert_eq!(points.len(), 3);
        assert!(points.iter().all(|p| p.balance == Money::ZERO));
        assert_eq!(points[2].month, 3);
    }

    #[test]
    fn test_checkpoints_beyond_horizon_are_omitted() {
        let points = project_many(&[position(100_000, 1_000, 6.0)], 40).unwrap();
        let checkpoints = summarize_checkpoints(&points, &DEFAULT_CHECKPOINTS);
        let months: Vec<u32> = checkpoints.iter().map(|p| p.month).collect();
        assert_eq!(months, vec![12, 36]);
        assert_eq!(checkpoints[0], points[11]);
    }

    #[test]
    fn test_report_totals_starting_figures() {
        let report = project_report(
            &[position(100_000, 1_000, 6.0), position(50_000, 2_000, 9.0)],
            60,
        )
        .unwrap();
        assert_eq!(report.current_balance.cents(), 150_000);
        assert_eq!(report.monthly_contribution.cents(), 3_000);
        assert_eq!(report.points.len(), 60);
        assert_eq!(report.checkpoints.len(), 3);
        assert_eq!(report.checkpoints[2].month, 60);
    }

    #[test]
    fn test_projection_is_deterministic() {
        let first = project_many(&[position(123_456, 7_890, 11.3)], 600).unwrap();
        let second = project_many(&[position(123_456, 7_890, 11.3)], 600).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_combined_extreme_growth_saturates() {
        let booming = position(1_000_000, 0, 1000.0);

        let points = project_many(&[booming, booming], 300).unwrap();

        let last = points.last().unwrap();
        assert_eq!(last.balance, Money::from_cents(i64::MAX));
        assert_eq!(last.total_returns, Money::from_cents(i64::MAX));
        assert!(points.iter().all(|p| !p.balance.is_negative()));
    }
}
