//! Tax bracket models.
//!
//! A [`TaxBracketTable`] is an ordered, contiguous list of [`TaxBracket`]s
//! whose last bracket is unbounded. Tables are validated on construction, so
//! every table the engine receives covers all non-negative amounts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::Money;

/// How a bracket table turns a base amount into a withheld amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketMode {
    /// Each bracket taxes only the slice of the base inside its band, and the
    /// slices are summed (INSS-style social security contribution).
    MarginalSum,
    /// The bracket containing the base applies its rate to the whole base and
    /// subtracts its precomputed deduction (IRPF-style income tax).
    MarginalWithDeduction,
}

/// A single band of a progressive table.
///
/// # Example
///
/// ```
/// use finance_engine::models::{Money, TaxBracket};
/// use rust_decimal::Decimal;
///
/// let bracket = TaxBracket {
///     lower_bound: Money::ZERO,
///     upper_bound: Some(Money::from_cents(141_200)),
///     rate: Decimal::new(75, 3),
///     deduction: Money::ZERO,
/// };
/// assert!(bracket.covers(Money::from_cents(141_200)));
/// assert!(!bracket.covers(Money::from_cents(141_201)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Lower edge of the band, in centavos.
    pub lower_bound: Money,
    /// Upper edge of the band (inclusive), or `None` for the unbounded top band.
    #[serde(default)]
    pub upper_bound: Option<Money>,
    /// Rate applied within the band, as a fraction (0.075 = 7.5%).
    pub rate: Decimal,
    /// Amount subtracted in deduction mode ("parcela a deduzir").
    #[serde(default)]
    pub deduction: Money,
}

impl TaxBracket {
    /// Returns true when `base` does not exceed this bracket's upper edge.
    ///
    /// The unbounded bracket covers every amount.
    pub fn covers(&self, base: Money) -> bool {
        self.upper_bound.is_none_or(|upper| base <= upper)
    }

    /// Returns true for the unbounded top bracket.
    pub fn is_unbounded(&self) -> bool {
        self.upper_bound.is_none()
    }
}

/// A validated progressive bracket table.
///
/// Invariants, checked by [`TaxBracketTable::new`]:
/// - at least one bracket, the first starting at zero
/// - contiguous: each bracket starts where the previous one ends
/// - every bounded bracket has `upper_bound > lower_bound`
/// - exactly one unbounded bracket, and it is the last
/// - every rate lies in `[0, 1]` and every deduction is non-negative
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TaxBracket>", into = "Vec<TaxBracket>")]
pub struct TaxBracketTable {
    brackets: Vec<TaxBracket>,
}

impl TaxBracketTable {
    /// Validates and wraps an ordered list of brackets.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` describing the first violated invariant.
    pub fn new(brackets: Vec<TaxBracket>) -> EngineResult<Self> {
        let Some(first) = brackets.first() else {
            return Err(EngineError::configuration("bracket table has no brackets"));
        };
        if first.lower_bound != Money::ZERO {
            return Err(EngineError::configuration(format!(
                "first bracket must start at 0, starts at {} cents",
                first.lower_bound.cents()
            )));
        }

        let last_index = brackets.len() - 1;
        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(EngineError::configuration(format!(
                    "bracket {} has rate {} outside [0, 1]",
                    index, bracket.rate
                )));
            }
            if bracket.deduction.is_negative() {
                return Err(EngineError::configuration(format!(
                    "bracket {} has negative deduction {} cents",
                    index,
                    bracket.deduction.cents()
                )));
            }

            match bracket.upper_bound {
                Some(upper) => {
                    if upper <= bracket.lower_bound {
                        return Err(EngineError::configuration(format!(
                            "bracket {} upper bound {} is not above its lower bound {}",
                            index,
                            upper.cents(),
                            bracket.lower_bound.cents()
                        )));
                    }
                    match brackets.get(index + 1) {
                        Some(next) if next.lower_bound != upper => {
                            return Err(EngineError::configuration(format!(
                                "bracket {} starts at {} but bracket {} ends at {}",
                                index + 1,
                                next.lower_bound.cents(),
                                index,
                                upper.cents()
                            )));
                        }
                        Some(_) => {}
                        None => {
                            return Err(EngineError::configuration(
                                "top bracket must be unbounded",
                            ));
                        }
                    }
                }
                None if index != last_index => {
                    return Err(EngineError::configuration(format!(
                        "bracket {} is unbounded but is not the top bracket",
                        index
                    )));
                }
                None => {}
            }
        }

        Ok(Self { brackets })
    }

    /// Returns the brackets in ascending order.
    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// Returns the number of brackets.
    pub fn len(&self) -> usize {
        self.brackets.len()
    }

    /// Always false: a validated table has at least one bracket.
    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }

    /// Returns the unbounded top bracket.
    pub fn top_bracket(&self) -> Option<&TaxBracket> {
        self.brackets.last()
    }
}

impl TryFrom<Vec<TaxBracket>> for TaxBracketTable {
    type Error = EngineError;

    fn try_from(brackets: Vec<TaxBracket>) -> EngineResult<Self> {
        Self::new(brackets)
    }
}

impl From<TaxBracketTable> for Vec<TaxBracket> {
    fn from(table: TaxBracketTable) -> Self {
        table.brackets
    }
}
