//! Net income calculation.
//!
//! Turns an [`IncomeRecord`] into net monthly pay:
//!
//! - Salaried (CLT): gross − INSS − IRPF + benefits, where INSS comes from the
//!   social security table in marginal-sum mode and IRPF from the income tax
//!   table in deduction mode, applied to gross − INSS − dependent deductions.
//!   The employer's welfare fund (FGTS) deposit is reported but never
//!   subtracted.
//! - Self-employed (PJ): gross − flat tax − owner's draw + benefits.
//!
//! Each rule records an [`AuditStep`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::TaxTables;
use crate::error::EngineResult;
use crate::models::{AuditStep, BracketMode, IncomeKind, IncomeRecord, Money, TaxBracketTable};

use super::progressive_brackets::withhold;

/// The result of the social security (INSS) calculation.
#[derive(Debug, Clone)]
pub struct SocialSecurityResult {
    /// The employee contribution.
    pub contribution: Money,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the employee social security contribution on `gross`.
///
/// # Errors
///
/// Propagates bracket engine errors (negative gross, malformed table).
pub fn calculate_social_security(
    gross: Money,
    table: &TaxBracketTable,
    step_number: u32,
) -> EngineResult<SocialSecurityResult> {
    let result = withhold(gross, table, BracketMode::MarginalSum)?;

    let audit_step = AuditStep {
        step_number,
        rule_id: "social_security".to_string(),
        rule_name: "Social Security Contribution (INSS)".to_string(),
        input: serde_json::json!({
            "gross_cents": gross.cents(),
            "bracket_count": table.len()
        }),
        output: serde_json::json!({
            "contribution_cents": result.withheld.cents(),
            "bracket_index": result.bracket_index,
            "effective_rate": result.effective_rate.round_dp(4).normalize().to_string()
        }),
        reasoning: format!(
            "{} summed across brackets 0..={} = {}",
            gross, result.bracket_index, result.withheld
        ),
    };

    Ok(SocialSecurityResult {
        contribution: result.withheld,
        audit_step,
    })
}

/// The result of the income tax (IRPF) calculation.
#[derive(Debug, Clone)]
pub struct IncomeTaxResult {
    /// The withheld income tax.
    pub tax: Money,
    /// Gross minus social security minus dependent deductions, floored at zero.
    pub taxable_base: Money,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates income tax on gross after social security and dependents.
///
/// # Errors
///
/// Propagates bracket engine errors.
pub fn calculate_income_tax(
    gross: Money,
    social_security: Money,
    dependents: u32,
    tables: &TaxTables,
    step_number: u32,
) -> EngineResult<IncomeTaxResult> {
    let dependent_total = tables.dependent_deduction * i64::from(dependents);
    let taxable_base = (gross - social_security - dependent_total).clamp_non_negative();
    let result = withhold(
        taxable_base,
        &tables.income_tax,
        BracketMode::MarginalWithDeduction,
    )?;

    let bracket = &tables.income_tax.brackets()[result.bracket_index];
    let audit_step = AuditStep {
        step_number,
        rule_id: "income_tax".to_string(),
        rule_name: "Income Tax Withholding (IRPF)".to_string(),
        input: serde_json::json!({
            "gross_cents": gross.cents(),
            "social_security_cents": social_security.cents(),
            "dependents": dependents,
            "dependent_deduction_cents": tables.dependent_deduction.cents()
        }),
        output: serde_json::json!({
            "taxable_base_cents": taxable_base.cents(),
            "tax_cents": result.withheld.cents(),
            "bracket_index": result.bracket_index,
            "rate": bracket.rate.normalize().to_string(),
            "deduction_cents": bracket.deduction.cents()
        }),
        reasoning: format!(
            "{} x {} - {} = {}",
            taxable_base,
            bracket.rate.normalize(),
            bracket.deduction,
            result.withheld
        ),
    };

    Ok(IncomeTaxResult {
        tax: result.withheld,
        taxable_base,
        audit_step,
    })
}

/// The result of the welfare fund (FGTS) calculation.
#[derive(Debug, Clone)]
pub struct WelfareFundResult {
    /// The employer deposit, reported but not subtracted from net pay.
    pub accrual: Money,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the employer welfare fund deposit on `gross`.
pub fn calculate_welfare_fund(gross: Money, rate: Decimal, step_number: u32) -> WelfareFundResult {
    let accrual = gross.apply_rate(rate);

    let audit_step = AuditStep {
        step_number,
        rule_id: "welfare_fund".to_string(),
        rule_name: "Welfare Fund Deposit (FGTS)".to_string(),
        input: serde_json::json!({
            "gross_cents": gross.cents(),
            "rate": rate.normalize().to_string()
        }),
        output: serde_json::json!({
            "accrual_cents": accrual.cents(),
            "deducted_from_net": false
        }),
        reasoning: format!(
            "{} x {} = {} (employer deposit, informational)",
            gross,
            rate.normalize(),
            accrual
        ),
    };

    WelfareFundResult {
        accrual,
        audit_step,
    }
}

/// The result of the self-employed flat tax calculation.
#[derive(Debug, Clone)]
pub struct FlatTaxResult {
    /// The flat tax due.
    pub tax: Money,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the flat tax on self-employed gross, `flat_rate_percent` being a
/// percentage (6.5 = 6.5%).
pub fn calculate_flat_tax(gross: Money, flat_rate_percent: Decimal, step_number: u32) -> FlatTaxResult {
    let tax = gross.percentage(flat_rate_percent).clamp_non_negative();

    let audit_step = AuditStep {
        step_number,
        rule_id: "flat_tax".to_string(),
        rule_name: "Flat Tax (Simples Nacional)".to_string(),
        input: serde_json::json!({
            "gross_cents": gross.cents(),
            "flat_rate_percent": flat_rate_percent.normalize().to_string()
        }),
        output: serde_json::json!({
            "tax_cents": tax.cents()
        }),
        reasoning: format!("{} x {}% = {}", gross, flat_rate_percent.normalize(), tax),
    };

    FlatTaxResult { tax, audit_step }
}

/// What was withheld from gross, per income kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaxBreakdown {
    /// Salaried withholdings.
    Salaried {
        /// INSS contribution.
        social_security: Money,
        /// IRPF withholding.
        income_tax: Money,
        /// FGTS employer deposit, not subtracted from net.
        welfare_fund_accrual: Money,
        /// The base IRPF was applied to.
        taxable_base: Money,
    },
    /// Self-employed withholdings.
    SelfEmployed {
        /// Flat tax on gross.
        flat_tax: Money,
        /// Owner's draw.
        fixed_draw: Money,
    },
}

impl TaxBreakdown {
    /// Returns the taxes withheld: INSS + IRPF, or the flat tax.
    ///
    /// The welfare fund deposit and the owner's draw are not taxes.
    pub fn total_withheld(&self) -> Money {
        match self {
            TaxBreakdown::Salaried {
                social_security,
                income_tax,
                ..
            } => *social_security + *income_tax,
            TaxBreakdown::SelfEmployed { flat_tax, .. } => *flat_tax,
        }
    }

    /// Returns labelled lines for display, in the order they are applied.
    ///
    /// The owner's draw is listed only when non-zero.
    pub fn labelled(&self) -> Vec<(&'static str, Money)> {
        match self {
            TaxBreakdown::Salaried {
                social_security,
                income_tax,
                welfare_fund_accrual,
                ..
            } => vec![
                ("INSS", *social_security),
                ("IRPF", *income_tax),
                ("FGTS", *welfare_fund_accrual),
            ],
            TaxBreakdown::SelfEmployed {
                flat_tax,
                fixed_draw,
            } => {
                let mut lines = vec![("Simples Nacional", *flat_tax)];
                if !fixed_draw.is_zero() {
                    lines.push(("Pró-labore", *fixed_draw));
                }
                lines
            }
        }
    }
}

/// The complete result of a net income calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetIncomeResult {
    /// Gross monthly income.
    pub gross: Money,
    /// Total benefits added to net.
    pub benefits: Money,
    /// Net monthly income.
    pub net: Money,
    /// What was withheld.
    pub breakdown: TaxBreakdown,
    /// The rules applied, in order.
    pub audit_steps: Vec<AuditStep>,
}

/// Computes net monthly income for a salaried or self-employed record.
///
/// `tables` is only consulted for salaried income.
///
/// # Arguments
///
/// * `record` - The gross income, benefits, dependents and income kind
/// * `tables` - The INSS and IRPF tables, dependent deduction and FGTS rate in force
///
/// # Returns
///
/// Returns a `NetIncomeResult` with the net amount, the withheld breakdown and
/// one audit step per rule applied.
///
/// # Errors
///
/// - `InvalidAmount` for a negative gross, benefit or owner's draw
/// - `InvalidRate` for a flat rate outside `[0, 100]`
/// - `ConfigurationError` if a bracket table cannot place an amount
///
/// # Example
///
/// ```
/// use finance_engine::calculation::compute_net_income;
/// use finance_engine::config::TaxTables;
/// use finance_engine::models::{IncomeRecord, Money};
///
/// let tables = TaxTables::defaults().unwrap();
/// let record = IncomeRecord::salaried(Money::from_cents(500_000));
///
/// let result = compute_net_income(&record, &tables).unwrap();
/// assert_eq!(result.net.cents(), 413_568);
/// ```
pub fn compute_net_income(record: &IncomeRecord, tables: &TaxTables) -> EngineResult<NetIncomeResult> {
    if let Err(e) = record.validate() {
        warn!(error = %e, "Rejected income record");
        return Err(e);
    }

    let gross = record.gross_monthly;
    let benefits = record.benefits.total();

    let (net, breakdown, audit_steps) = match &record.kind {
        IncomeKind::Salaried => {
            let inss = calculate_social_security(gross, &tables.social_security, 1)?;
            let irpf = calculate_income_tax(
                gross,
                inss.contribution,
                record.dependents,
                tables,
                2,
            )?;
            let fgts = calculate_welfare_fund(gross, tables.welfare_fund_rate, 3);

            let net = gross - inss.contribution - irpf.tax + benefits;
            let breakdown = TaxBreakdown::Salaried {
                social_security: inss.contribution,
                income_tax: irpf.tax,
                welfare_fund_accrual: fgts.accrual,
                taxable_base: irpf.taxable_base,
            };
            (
                net,
                breakdown,
                vec![inss.audit_step, irpf.audit_step, fgts.audit_step],
            )
        }
        IncomeKind::SelfEmployed {
            flat_rate_percent,
            fixed_draw,
        } => {
            let flat = calculate_flat_tax(gross, *flat_rate_percent, 1);

            let net = gross - flat.tax - *fixed_draw + benefits;
            let breakdown = TaxBreakdown::SelfEmployed {
                flat_tax: flat.tax,
                fixed_draw: *fixed_draw,
            };
            (net, breakdown, vec![flat.audit_step])
        }
    };

    debug!(
        kind = record.kind.label(),
        gross_cents = gross.cents(),
        withheld_cents = breakdown.total_withheld().cents(),
        net_cents = net.cents(),
        "Computed net income"
    );

    Ok(NetIncomeResult {
        gross,
        benefits,
        net,
        breakdown,
        audit_steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::models::Benefits;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn cents(c: i64) -> Money {
        Money::from_cents(c)
    }

    fn tables() -> TaxTables {
        TaxTables::defaults().unwrap()
    }

    #[test]
    fn test_salaried_five_thousand_reais() {
        let record = IncomeRecord::salaried(cents(500_000));
        let result = compute_net_income(&record, &tables()).unwrap();

        match result.breakdown {
            TaxBreakdown::Salaried {
                social_security,
                income_tax,
                welfare_fund_accrual,
                taxable_base,
            } => {
                assert_eq!(social_security, cents(51_882));
                assert_eq!(taxable_base, cents(448_118));
                assert_eq!(income_tax, cents(34_550));
                assert_eq!(welfare_fund_accrual, cents(40_000));
            }
            other => panic!("Expected salaried breakdown, got {:?}", other),
        }
        assert_eq!(result.net, cents(413_568));
        assert_eq!(result.audit_steps.len(), 3);
        assert_eq!(result.audit_steps[0].rule_id, "social_security");
        assert_eq!(result.audit_steps[1].rule_id, "income_tax");
        assert_eq!(result.audit_steps[2].rule_id, "welfare_fund");
    }

    #[test]
    fn test_welfare_fund_is_not_subtracted() {
        let record = IncomeRecord::salaried(cents(500_000));
        let result = compute_net_income(&record, &tables()).unwrap();
        assert_eq!(
            result.net,
            result.gross - result.breakdown.total_withheld() + result.benefits
        );
    }

    #[test]
    fn test_dependents_reduce_income_tax() {
        let without = compute_net_income(&IncomeRecord::salaried(cents(500_000)), &tables()).unwrap();
        let with_two = compute_net_income(
            &IncomeRecord::salaried(cents(500_000)).with_dependents(2),
            &tables(),
        )
        .unwrap();

        // Taxable base 448118 - 2 * 18959 = 410200; 410200 * 0.225 - 66277 = 26018
        match with_two.breakdown {
            TaxBreakdown::Salaried {
                income_tax,
                taxable_base,
                ..
            } => {
                assert_eq!(taxable_base, cents(410_200));
                assert_eq!(income_tax, cents(26_018));
            }
            other => panic!("Expected salaried breakdown, got {:?}", other),
        }
        assert!(with_two.net > without.net);
    }

    #[test]
    fn test_many_dependents_floor_taxable_base_at_zero() {
        let record = IncomeRecord::salaried(cents(300_000)).with_dependents(50);
        let result = compute_net_income(&record, &tables()).unwrap();
        match result.breakdown {
            TaxBreakdown::Salaried {
                income_tax,
                taxable_base,
                ..
            } => {
                assert_eq!(taxable_base, Money::ZERO);
                assert_eq!(income_tax, Money::ZERO);
            }
            other => panic!("Expected salaried breakdown, got {:?}", other),
        }
    }

    #[test]
    fn test_minimum_wage_pays_no_income_tax() {
        let record = IncomeRecord::salaried(cents(141_200));
        let result = compute_net_income(&record, &tables()).unwrap();
        // 141200 * 0.075
        assert_eq!(result.breakdown.labelled()[0], ("INSS", cents(10_590)));
        assert_eq!(result.breakdown.labelled()[1], ("IRPF", Money::ZERO));
        assert_eq!(result.net, cents(130_610));
    }

    #[test]
    fn test_benefits_are_added_to_net() {
        let benefits = Benefits {
            food_voucher: cents(80_000),
            transport_voucher: cents(20_000),
            bonus: Money::ZERO,
        };
        let plain = compute_net_income(&IncomeRecord::salaried(cents(500_000)), &tables()).unwrap();
        let with_benefits = compute_net_income(
            &IncomeRecord::salaried(cents(500_000)).with_benefits(benefits),
            &tables(),
        )
        .unwrap();

        assert_eq!(with_benefits.benefits, cents(100_000));
        assert_eq!(with_benefits.net - plain.net, cents(100_000));
    }

    #[test]
    fn test_self_employed_net() {
        let record = IncomeRecord::self_employed(cents(1_000_000), dec("6"), cents(141_200));
        let result = compute_net_income(&record, &tables()).unwrap();

        assert_eq!(
            result.breakdown,
            TaxBreakdown::SelfEmployed {
                flat_tax: cents(60_000),
                fixed_draw: cents(141_200),
            }
        );
        assert_eq!(result.net, cents(798_800));
        assert_eq!(result.audit_steps.len(), 1);
        assert_eq!(
            result.breakdown.labelled(),
            vec![("Simples Nacional", cents(60_000)), ("Pró-labore", cents(141_200))]
        );
    }

    #[test]
    fn test_self_employed_flat_tax_rounds_half_away_from_zero() {
        let flat = calculate_flat_tax(cents(333_333), dec("6.5"), 1);
        // 21666.645 -> 21667
        assert_eq!(flat.tax, cents(21_667));
    }

    #[test]
    fn test_self_employed_without_draw_omits_draw_line() {
        let record = IncomeRecord::self_employed(cents(100_000), dec("0"), Money::ZERO);
        let result = compute_net_income(&record, &tables()).unwrap();
        assert_eq!(result.net, cents(100_000));
        assert_eq!(result.breakdown.labelled(), vec![("Simples Nacional", Money::ZERO)]);
    }

    #[test]
    fn test_zero_gross() {
        let result = compute_net_income(&IncomeRecord::salaried(Money::ZERO), &tables()).unwrap();
        assert_eq!(result.net, Money::ZERO);
        assert_eq!(result.breakdown.total_withheld(), Money::ZERO);
    }

    #[test]
    fn test_negative_gross_is_rejected() {
        match compute_net_income(&IncomeRecord::salaried(cents(-100)), &tables()) {
            Err(EngineError::InvalidAmount { field, .. }) => assert_eq!(field, "gross_monthly"),
            other => panic!("Expected InvalidAmount, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_flat_rate_is_rejected() {
        let record = IncomeRecord::self_employed(cents(100_000), dec("150"), Money::ZERO);
        assert!(matches!(
            compute_net_income(&record, &tables()),
            Err(EngineError::InvalidRate { .. })
        ));
    }

    #[test]
    fn test_income_tax_audit_step_records_bracket() {
        let result = compute_net_income(&IncomeRecord::salaried(cents(500_000)), &tables()).unwrap();
        let step = &result.audit_steps[1];
        assert_eq!(step.step_number, 2);
        assert_eq!(step.output["bracket_index"], 3);
        assert_eq!(step.output["rate"], "0.225");
        assert_eq!(step.output["tax_cents"], 34_550);
    }
}
