//! Built-in tax tables.
//!
//! These are the 2024 tables, compiled in so that a caller without a
//! configuration directory can still compute net income. Using them is always
//! an explicit decision: nothing in the engine falls back to them implicitly.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{Money, TaxBracket};

use super::TaxTables;

const fn band(lower: i64, upper: Option<i64>, rate: Decimal, deduction: i64) -> TaxBracket {
    TaxBracket {
        lower_bound: Money::from_cents(lower),
        upper_bound: match upper {
            Some(cents) => Some(Money::from_cents(cents)),
            None => None,
        },
        rate,
        deduction: Money::from_cents(deduction),
    }
}

/// 7.5%
const RATE_7_5: Decimal = Decimal::from_parts(75, 0, 0, false, 3);
/// 9%
const RATE_9: Decimal = Decimal::from_parts(9, 0, 0, false, 2);
/// 12%
const RATE_12: Decimal = Decimal::from_parts(12, 0, 0, false, 2);
/// 14%
const RATE_14: Decimal = Decimal::from_parts(14, 0, 0, false, 2);
/// 15%
const RATE_15: Decimal = Decimal::from_parts(15, 0, 0, false, 2);
/// 22.5%
const RATE_22_5: Decimal = Decimal::from_parts(225, 0, 0, false, 3);
/// 27.5%
const RATE_27_5: Decimal = Decimal::from_parts(275, 0, 0, false, 3);

/// Effective date of the built-in tables.
pub const DEFAULT_EFFECTIVE_DATE: (i32, u32, u32) = (2024, 1, 1);

/// Built-in social security (INSS) brackets. The final 0% band caps the
/// contribution at the ceiling of the 14% band.
pub const DEFAULT_SOCIAL_SECURITY_BRACKETS: [TaxBracket; 5] = [
    band(0, Some(141_200), RATE_7_5, 0),
    band(141_200, Some(266_668), RATE_9, 0),
    band(266_668, Some(400_003), RATE_12, 0),
    band(400_003, Some(778_602), RATE_14, 0),
    band(778_602, None, Decimal::ZERO, 0),
];

/// Built-in income tax (IRPF) brackets with their deductions.
pub const DEFAULT_INCOME_TAX_BRACKETS: [TaxBracket; 5] = [
    band(0, Some(225_920), Decimal::ZERO, 0),
    band(225_920, Some(282_665), RATE_7_5, 16_944),
    band(282_665, Some(375_105), RATE_15, 38_144),
    band(375_105, Some(466_468), RATE_22_5, 66_277),
    band(466_468, None, RATE_27_5, 89_600),
];

/// Built-in income tax deduction per dependent (R$ 189,59).
pub const DEFAULT_DEPENDENT_DEDUCTION: Money = Money::from_cents(18_959);

/// Built-in welfare fund (FGTS) rate, 8% of gross.
pub const DEFAULT_WELFARE_FUND_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

impl TaxTables {
    /// Builds the validated built-in tables.
    ///
    /// # Errors
    ///
    /// Only fails if the compiled-in constants are themselves inconsistent.
    pub fn defaults() -> EngineResult<Self> {
        let (year, month, day) = DEFAULT_EFFECTIVE_DATE;
        let effective_date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| EngineError::configuration("invalid built-in effective date"))?;

        Self::new(
            effective_date,
            DEFAULT_SOCIAL_SECURITY_BRACKETS.to_vec(),
            DEFAULT_INCOME_TAX_BRACKETS.to_vec(),
            DEFAULT_DEPENDENT_DEDUCTION,
            DEFAULT_WELFARE_FUND_RATE,
        )
    }
}
