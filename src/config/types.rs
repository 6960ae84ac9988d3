//! Configuration types for tax tables.
//!
//! [`TaxTableFile`] mirrors one YAML file as written on disk. It becomes a
//! [`TaxTables`] only after both bracket tables and the scalar parameters have
//! been validated.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{Money, TaxBracket, TaxBracketTable};

fn default_active() -> bool {
    true
}

/// One tax table file, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxTableFile {
    /// The first date these tables apply to.
    pub effective_date: NaiveDate,
    /// Inactive files are skipped by the loader.
    #[serde(default = "default_active")]
    pub active: bool,
    /// Income tax base reduction per dependent, in centavos.
    pub dependent_deduction: Money,
    /// Employer welfare fund (FGTS) rate, as a fraction of gross.
    pub welfare_fund_rate: Decimal,
    /// Social security (INSS) brackets.
    pub social_security: Vec<TaxBracket>,
    /// Income tax (IRPF) brackets.
    pub income_tax: Vec<TaxBracket>,
}

/// Everything a salaried net-income computation needs for one period.
///
/// # Example
///
/// ```
/// use finance_engine::config::TaxTables;
///
/// let tables = TaxTables::defaults().unwrap();
/// assert_eq!(tables.dependent_deduction.cents(), 18_959);
/// assert_eq!(tables.income_tax.len(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxTables {
    /// The first date these tables apply to.
    pub effective_date: NaiveDate,
    /// Social security (INSS) table, applied in marginal-sum mode.
    pub social_security: TaxBracketTable,
    /// Income tax (IRPF) table, applied in deduction mode.
    pub income_tax: TaxBracketTable,
    /// Income tax base reduction per dependent.
    pub dependent_deduction: Money,
    /// Employer welfare fund (FGTS) rate, as a fraction of gross.
    pub welfare_fund_rate: Decimal,
}

impl TaxTables {
    /// Validates and bundles the parts of a tax table set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` when either bracket table is malformed,
    /// the dependent deduction is negative, or the welfare fund rate lies
    /// outside `[0, 1]`.
    pub fn new(
        effective_date: NaiveDate,
        social_security: Vec<TaxBracket>,
        income_tax: Vec<TaxBracket>,
        dependent_deduction: Money,
        welfare_fund_rate: Decimal,
    ) -> EngineResult<Self> {
        let social_security = TaxBracketTable::new(social_security).map_err(|e| {
            EngineError::configuration(format!("social security table: {}", detail(&e)))
        })?;
        let income_tax = TaxBracketTable::new(income_tax)
            .map_err(|e| EngineError::configuration(format!("income tax table: {}", detail(&e))))?;

        if dependent_deduction.is_negative() {
            return Err(EngineError::configuration(format!(
                "dependent deduction {} cents is negative",
                dependent_deduction.cents()
            )));
        }
        if welfare_fund_rate < Decimal::ZERO || welfare_fund_rate > Decimal::ONE {
            return Err(EngineError::configuration(format!(
                "welfare fund rate {} outside [0, 1]",
                welfare_fund_rate
            )));
        }

        Ok(Self {
            effective_date,
            social_security,
            income_tax,
            dependent_deduction,
            welfare_fund_rate,
        })
    }
}

impl TryFrom<TaxTableFile> for TaxTables {
    type Error = EngineError;

    fn try_from(file: TaxTableFile) -> EngineResult<Self> {
        Self::new(
            file.effective_date,
            file.social_security,
            file.income_tax,
            file.dependent_deduction,
            file.welfare_fund_rate,
        )
    }
}

fn detail(error: &EngineError) -> String {
    match error {
        EngineError::ConfigurationError { message } => message.clone(),
        other => other.to_string(),
    }
}
