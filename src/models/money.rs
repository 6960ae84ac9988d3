//! Integer money representation.
//!
//! All monetary storage and arithmetic in the engine happens in integer
//! centavos. Conversion to or from a decimal amount of reais, and any rounding
//! of fractional cents, happens only at the boundaries defined here.
//!
//! # Rounding
//!
//! The engine rounds half away from zero everywhere: `Money::from_decimal`
//! uses [`RoundingStrategy::MidpointAwayFromZero`] and `Money::from_f64` uses
//! [`f64::round`], which has the same midpoint behaviour.
//!
//! # Overflow
//!
//! The arithmetic operators saturate at the `i64` bounds instead of wrapping
//! or panicking, matching the saturating conversions from `Decimal` and `f64`.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A monetary amount as a count of centavos.
///
/// # Example
///
/// ```
/// use finance_engine::models::Money;
///
/// let salary = Money::from_cents(500_000);
/// assert_eq!(salary.format_brl(), "R$ 5.000,00");
/// assert_eq!((salary - Money::from_cents(51_882)).cents(), 448_118);
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero centavos.
    pub const ZERO: Money = Money(0);

    /// Creates an amount from centavos.
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the amount in centavos.
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Rounds a fractional cent amount to the nearest centavo, half away from zero.
    ///
    /// Values beyond the `i64` range saturate.
    ///
    /// # Example
    ///
    /// ```
    /// use finance_engine::models::Money;
    /// use rust_decimal::Decimal;
    /// use std::str::FromStr;
    ///
    /// assert_eq!(Money::from_decimal(Decimal::from_str("34549.5").unwrap()).cents(), 34_550);
    /// assert_eq!(Money::from_decimal(Decimal::from_str("-0.5").unwrap()).cents(), -1);
    /// ```
    pub fn from_decimal(cents: Decimal) -> Self {
        let rounded = cents.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        Money(rounded.to_i64().unwrap_or(if rounded.is_sign_negative() {
            i64::MIN
        } else {
            i64::MAX
        }))
    }

    /// Rounds a floating-point cent amount to the nearest centavo, half away from zero.
    ///
    /// Values beyond the `i64` range saturate and NaN becomes zero.
    pub fn from_f64(cents: f64) -> Self {
        Money(cents.round() as i64)
    }

    /// Converts an amount of reais to centavos, rounding sub-centavo digits.
    ///
    /// Amounts beyond the `i64` range of centavos saturate.
    pub fn from_major(reais: Decimal) -> Self {
        Self::checked_from_major(reais).unwrap_or(if reais.is_sign_negative() {
            Money(i64::MIN)
        } else {
            Money(i64::MAX)
        })
    }

    /// Converts an amount of reais to centavos, or `None` when the result does
    /// not fit in an `i64` count of centavos.
    pub fn checked_from_major(reais: Decimal) -> Option<Self> {
        reais
            .checked_mul(Decimal::ONE_HUNDRED)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .map(Money)
    }

    /// Returns the amount in reais.
    pub fn to_major(self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Returns the amount as an exact decimal count of centavos.
    pub fn to_decimal(self) -> Decimal {
        Decimal::from(self.0)
    }

    /// Returns `percent`% of this amount, rounded to the centavo.
    ///
    /// # Example
    ///
    /// ```
    /// use finance_engine::models::Money;
    /// use rust_decimal::Decimal;
    /// use std::str::FromStr;
    ///
    /// let gross = Money::from_cents(100_000);
    /// assert_eq!(gross.percentage(Decimal::from_str("10.5").unwrap()).cents(), 10_500);
    /// ```
    pub fn percentage(self, percent: Decimal) -> Money {
        Self::from_decimal(self.to_decimal() * percent / Decimal::ONE_HUNDRED)
    }

    /// Returns this amount multiplied by a fractional rate, rounded to the centavo.
    pub fn apply_rate(self, rate: Decimal) -> Money {
        Self::from_decimal(self.to_decimal() * rate)
    }

    /// Returns what percentage `part` is of `total`, or zero when `total` is zero.
    pub fn percentage_of(part: Money, total: Money) -> Decimal {
        if total.0 == 0 {
            return Decimal::ZERO;
        }
        part.to_decimal() * Decimal::ONE_HUNDRED / total.to_decimal()
    }

    /// Returns the amount, or zero when it is negative.
    pub fn clamp_non_negative(self) -> Money {
        self.max(Money::ZERO)
    }

    /// Returns true when the amount is below zero.
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Returns true when the amount is exactly zero.
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Formats the amount the Brazilian way, e.g. `R$ 1.500,00`.
    ///
    /// Negative amounts carry a leading minus sign: `-R$ 15,50`.
    pub fn format_brl(self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}R$ {}", sign, self.unsigned_digits())
    }

    /// Formats the amount without the currency symbol, e.g. `1.500,00`.
    pub fn format_compact(self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}", sign, self.unsigned_digits())
    }

    /// Formats the amount with an explicit sign, e.g. `+R$ 1.500,00`.
    pub fn format_signed(self) -> String {
        if self.0 >= 0 {
            format!("+{}", self.format_brl())
        } else {
            self.format_brl()
        }
    }

    fn unsigned_digits(self) -> String {
        let abs = self.0.unsigned_abs();
        let whole = (abs / 100).to_string();
        let fraction = abs % 100;

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, digit) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(digit);
        }

        format!("{},{:02}", grouped, fraction)
    }

    /// Parses a Brazilian-formatted amount such as `R$ 1.500,00`, `1.500,00`
    /// or `-15,5` into centavos.
    ///
    /// Dots are thousands separators and a single comma separates centavos.
    /// More than two decimal digits are rounded half away from zero.
    ///
    /// # Example
    ///
    /// ```
    /// use finance_engine::models::Money;
    ///
    /// assert_eq!(Money::parse_brl("R$ 1.500,00").unwrap().cents(), 150_000);
    /// assert!(Money::parse_brl("mil reais").is_err());
    /// ```
    pub fn parse_brl(input: &str) -> EngineResult<Money> {
        let invalid = || EngineError::InvalidMoneyFormat {
            input: input.to_string(),
        };

        let trimmed = input.trim();
        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest.trim_start()),
            None => (false, trimmed),
        };
        let rest = rest.strip_prefix("R$").unwrap_or(rest).trim();

        let (whole, fraction) = match rest.split_once(',') {
            Some((whole, fraction)) => (whole, fraction),
            None => (rest, ""),
        };
        let whole: String = whole.chars().filter(|c| *c != '.').collect();

        let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
        if whole.is_empty() || !all_digits(&whole) || !all_digits(fraction) {
            return Err(invalid());
        }

        let literal = if fraction.is_empty() {
            whole
        } else {
            format!("{}.{}", whole, fraction)
        };
        let reais = Decimal::from_str(&literal).map_err(|_| invalid())?;
        let money = Money::checked_from_major(reais).ok_or_else(invalid)?;

        Ok(if negative { -money } else { money })
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_brl())
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 = self.0.saturating_sub(rhs.0);
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(self.0.saturating_neg())
    }
}

impl Mul<i64> for Money {
    type Output = Money;

    fn mul(self, rhs: i64) -> Money {
        Money(self.0.saturating_mul(rhs))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}
