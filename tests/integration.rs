//! Integration tests for the finance engine.
//!
//! This test suite drives the public API end to end:
//! - Net income against the shipped tax tables
//! - Household totals across salaried and self-employed members
//! - Expense splits
//! - Investment projections and portfolio summaries
//! - Emergency fund planning
//! - Error cases

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use finance_engine::calculation::{
    allocate_split, allocate_split_conserving, allocation_residue, apply_progressive_brackets,
    compute_net_income, plan_goal, project_goal, project_report, project_single,
    suggest_monthly_goal, summarize_family_income, summarize_holdings, MemberIncome,
    TaxBreakdown,
};
use finance_engine::config::{TaxConfigLoader, TaxTables};
use finance_engine::error::EngineError;
use finance_engine::models::{
    Benefits, BracketMode, EstimatedMonths, IncomeKind, IncomeRecord, InvestmentHolding,
    InvestmentKind, InvestmentPosition, Money, SplitShare,
};

// =============================================================================
// Test Helpers
// =============================================================================

fn loader() -> TaxConfigLoader {
    TaxConfigLoader::load("./config/tax").expect("Failed to load config")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn cents(c: i64) -> Money {
    Money::from_cents(c)
}

fn salaried_parts(breakdown: &TaxBreakdown) -> (Money, Money) {
    match breakdown {
        TaxBreakdown::Salaried {
            social_security,
            income_tax,
            ..
        } => (*social_security, *income_tax),
        other => panic!("Expected salaried breakdown, got {:?}", other),
    }
}

// =============================================================================
// SECTION 1: Net income with loaded tables
// =============================================================================

#[test]
fn test_salaried_net_with_2024_tables() {
    let loader = loader();
    let tables = loader.tables_effective_on(date(2024, 6, 1)).unwrap();

    let result = compute_net_income(&IncomeRecord::salaried(cents(500_000)), tables).unwrap();

    assert_eq!(salaried_parts(&result.breakdown), (cents(51_882), cents(34_550)));
    assert_eq!(result.net, cents(413_568));
}

#[test]
fn test_salaried_net_with_2025_tables() {
    let loader = loader();
    let tables = loader.tables_effective_on(date(2025, 6, 1)).unwrap();

    let result = compute_net_income(&IncomeRecord::salaried(cents(500_000)), tables).unwrap();
    let (inss, irpf) = salaried_parts(&result.breakdown);

    // 11385 + 11482.92 + 16763.40 + 11328.38 = 50959.70
    assert_eq!(inss, cents(50_960));
    // (500000 - 50960) * 0.225 - 67549 = 33485
    assert_eq!(irpf, cents(33_485));
    assert_eq!(result.net, result.gross - inss - irpf);
}

#[test]
fn test_net_identity_holds_for_salaried_records() {
    let tables = TaxTables::defaults().unwrap();
    let benefits = Benefits {
        food_voucher: cents(60_000),
        transport_voucher: cents(25_000),
        bonus: cents(10_000),
    };

    for gross in [0, 141_200, 225_920, 300_000, 778_602, 2_000_000] {
        let record = IncomeRecord::salaried(cents(gross))
            .with_benefits(benefits)
            .with_dependents(1);
        let result = compute_net_income(&record, &tables).unwrap();
        let (inss, irpf) = salaried_parts(&result.breakdown);

        assert_eq!(result.net, cents(gross) - inss - irpf + benefits.total());
    }
}

#[test]
fn test_withholding_is_non_decreasing_across_bracket_seams() {
    let loader = loader();
    let mut all_tables: Vec<TaxTables> = loader.tables().to_vec();
    all_tables.push(TaxTables::defaults().unwrap());

    for tables in &all_tables {
        for (table, mode) in [
            (&tables.social_security, BracketMode::MarginalSum),
            (&tables.income_tax, BracketMode::MarginalWithDeduction),
        ] {
            for bracket in table.brackets() {
                let Some(upper) = bracket.upper_bound else {
                    continue;
                };
                let around: Vec<Money> = [-1i64, 0, 1]
                    .iter()
                    .map(|delta| {
                        apply_progressive_brackets(cents(upper.cents() + delta), table, mode).unwrap()
                    })
                    .collect();

                assert!(
                    around[0] <= around[1] && around[1] <= around[2],
                    "Withholding decreased near {} cents ({:?}, tables effective {}): {:?}",
                    upper.cents(),
                    mode,
                    tables.effective_date,
                    around
                );
            }
        }
    }
}

#[test]
fn test_fallback_tables_are_an_explicit_choice() {
    let loader = loader();
    let fallback = TaxTables::defaults().unwrap();

    assert!(matches!(
        loader.tables_effective_on(date(2010, 1, 1)),
        Err(EngineError::TaxTablesNotFound { .. })
    ));

    let tables = loader.tables_effective_on_or(date(2010, 1, 1), &fallback);
    let result = compute_net_income(&IncomeRecord::salaried(cents(500_000)), tables).unwrap();
    assert_eq!(result.net, cents(413_568));
}

#[test]
fn test_income_kind_parsed_from_label() {
    let tables = TaxTables::defaults().unwrap();
    let kind = IncomeKind::parse("pj", dec("6"), cents(141_200)).unwrap();
    let record = IncomeRecord {
        gross_monthly: cents(1_000_000),
        benefits: Benefits::default(),
        dependents: 0,
        kind,
    };

    let result = compute_net_income(&record, &tables).unwrap();
    assert_eq!(result.net, cents(798_800));

    assert!(matches!(
        IncomeKind::parse("estagio", Decimal::ZERO, Money::ZERO),
        Err(EngineError::InvalidIncomeKind { .. })
    ));
}

#[test]
fn test_record_deserialized_from_json() {
    let tables = TaxTables::defaults().unwrap();
    let record: IncomeRecord = serde_json::from_str(
        r#"{"gross_monthly": 500000, "dependents": 2, "kind": {"kind": "salaried"}}"#,
    )
    .unwrap();

    let result = compute_net_income(&record, &tables).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["net"], 500_000 - 51_882 - 26_018);
    assert_eq!(json["breakdown"]["kind"], "salaried");
    assert_eq!(json["audit_steps"].as_array().unwrap().len(), 3);
}

// =============================================================================
// SECTION 2: Household totals
// =============================================================================

#[test]
fn test_family_summary() {
    let tables = TaxTables::defaults().unwrap();
    let incomes: Vec<MemberIncome> = [
        ("ana", IncomeRecord::salaried(cents(500_000))),
        ("bruno", IncomeRecord::salaried(cents(141_200))),
    ]
    .into_iter()
    .map(|(id, record)| MemberIncome {
        member_id: id.to_string(),
        result: compute_net_income(&record, &tables).unwrap(),
    })
    .collect();

    let summary = summarize_family_income(&incomes);
    assert_eq!(summary.total_gross, cents(641_200));
    assert_eq!(summary.total_net, cents(413_568 + 130_610));
    assert_eq!(
        summary.total_withheld,
        summary.total_gross - summary.total_net
    );
}

// =============================================================================
// SECTION 3: Expense splits
// =============================================================================

#[test]
fn test_split_of_household_bill() {
    let shares = vec![
        SplitShare::new("ana", dec("60")),
        SplitShare::new("bruno", dec("40")),
    ];
    let total = Money::parse_brl("R$ 1.234,57").unwrap();

    let allocations = allocate_split(total, &shares).unwrap();
    // 123457 * 0.6 = 74074.2, 123457 * 0.4 = 49382.8
    assert_eq!(allocations[0].amount, cents(74_074));
    assert_eq!(allocations[1].amount, cents(49_383));
    assert_eq!(allocation_residue(total, &allocations), Money::ZERO);
}

#[test]
fn test_split_thirds_drift_is_bounded() {
    let third = dec("33.333333333333333333333333");
    let shares = vec![
        SplitShare::new("a", third),
        SplitShare::new("b", third),
        SplitShare::new("c", third),
    ];
    let total = cents(10_000);

    let independent = allocate_split(total, &shares).unwrap();
    assert!(allocation_residue(total, &independent).cents().abs() <= 2);

    let conserving = allocate_split_conserving(total, &shares).unwrap();
    assert_eq!(allocation_residue(total, &conserving), Money::ZERO);
}

#[test]
fn test_split_rejections() {
    let total = cents(10_000);
    for pcts in [["50", "45"], ["50", "55"]] {
        let shares = vec![SplitShare::new("a", dec(pcts[0])), SplitShare::new("b", dec(pcts[1]))];
        assert!(matches!(
            allocate_split(total, &shares),
            Err(EngineError::SplitSumMismatch { .. })
        ));
    }

    let repeated = vec![SplitShare::new("a", dec("50")), SplitShare::new("a", dec("50"))];
    assert!(matches!(
        allocate_split(total, &repeated),
        Err(EngineError::DuplicateParticipant { .. })
    ));
}

// =============================================================================
// SECTION 4: Investments
// =============================================================================

#[test]
fn test_ten_year_projection_report() {
    let positions = [
        InvestmentPosition::new(cents(1_000_000), cents(50_000), 10.5),
        InvestmentPosition::new(cents(200_000), Money::ZERO, 0.0),
    ];

    let report = project_report(&positions, 120).unwrap();

    assert_eq!(report.points.len(), 120);
    assert_eq!(report.current_balance, cents(1_200_000));
    assert_eq!(report.monthly_contribution, cents(50_000));
    let months: Vec<u32> = report.checkpoints.iter().map(|p| p.month).collect();
    assert_eq!(months, vec![12, 36, 60]);

    let last = report.points.last().unwrap();
    assert_eq!(last.total_contributed, cents(6_000_000));
    assert!(last.total_returns > Money::ZERO);
    // Balances never shrink with a non-negative rate.
    assert!(report.points.windows(2).all(|w| w[1].balance >= w[0].balance));
}

#[test]
fn test_holdings_feed_projection() {
    let holdings: Vec<InvestmentHolding> = serde_json::from_str(
        r#"[
            {"name": "Tesouro IPCA", "kind": "fixed_income", "current_balance": 500000, "monthly_contribution": 20000, "annual_return_rate_percent": 11.0},
            {"name": "IVVB11", "kind": "variable_income", "current_balance": 300000, "monthly_contribution": 10000, "annual_return_rate_percent": 14.0}
        ]"#,
    )
    .unwrap();

    let summary = summarize_holdings(&holdings);
    assert_eq!(summary.total_balance, cents(800_000));
    assert_eq!(summary.by_kind[1].kind, InvestmentKind::VariableIncome);

    let positions: Vec<InvestmentPosition> = holdings.iter().map(|h| h.position).collect();
    let report = project_report(&positions, 12).unwrap();
    assert_eq!(report.checkpoints.len(), 1);
    assert_eq!(report.checkpoints[0].total_contributed, cents(360_000));
}

#[test]
fn test_projection_is_lazy_and_finite() {
    let position = InvestmentPosition::new(cents(100_000), cents(1_000), 8.0);
    let first_three: Vec<_> = project_single(&position, 1_200).unwrap().take(3).collect();
    assert_eq!(first_three.len(), 3);
    assert_eq!(first_three[2].month, 3);
}

// =============================================================================
// SECTION 5: Emergency fund
// =============================================================================

#[test]
fn test_emergency_fund_flow() {
    let monthly_expenses = cents(400_000);
    let suggested =
        suggest_monthly_goal(cents(1_200_000), monthly_expenses, cents(200_000), 6, 24).unwrap();
    // 2400000 / 24 = 100000, under the 30% cap of 600000 * 0.3 = 180000
    assert_eq!(suggested, cents(100_000));

    let goal = plan_goal(6, monthly_expenses, cents(600_000), suggested).unwrap();
    assert_eq!(goal.remaining_amount, cents(1_800_000));
    assert_eq!(goal.estimated_months, EstimatedMonths::Months(18));
    assert_eq!(goal.completion_percent, dec("25"));

    let projection = project_goal(goal.current_amount, suggested, goal.target_amount, 20).unwrap();
    assert!(!projection[16].is_complete);
    assert!(projection[17].is_complete);
    assert_eq!(projection[19].balance, goal.target_amount);
}

#[test]
fn test_emergency_fund_rejects_bad_target() {
    assert!(matches!(
        plan_goal(36, cents(100), Money::ZERO, cents(10)),
        Err(EngineError::InvalidTargetMonths { months: 36 })
    ));
}

// =============================================================================
// SECTION 6: Errors
// =============================================================================

#[test]
fn test_error_classes() {
    let config_error = TaxConfigLoader::load("./config/missing").unwrap_err();
    assert!(config_error.is_configuration_error());
    assert_eq!(config_error.code(), "CONFIG_ERROR");

    let input_error = allocate_split(cents(100), &[]).unwrap_err();
    assert!(!input_error.is_configuration_error());
    assert_eq!(input_error.code(), "EMPTY_SPLIT");
}
