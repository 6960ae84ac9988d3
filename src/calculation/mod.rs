//! Calculation logic for the finance engine.
//!
//! This module contains the pure computations: the progressive bracket engine,
//! net income for salaried and self-employed work, household income totals,
//! expense split allocation, investment projections and portfolio summaries,
//! and emergency fund planning.

mod emergency_fund;
mod expense_split;
mod income_summary;
mod investment_projection;
mod investment_summary;
mod net_income;
mod progressive_brackets;

pub use emergency_fund::{
    DEFAULT_SAVINGS_SHARE, EmergencyFundGoal, GoalProjectionPoint, MAX_SAVINGS_SHARE,
    MonthlyGoalSuggestion, plan, plan_goal, project_goal, suggest_monthly_goal,
    suggest_monthly_goal_detailed,
};
pub use expense_split::{
    SPLIT_SUM_TOLERANCE, allocate_split, allocate_split_conserving, allocation_residue,
};
pub use income_summary::{
    FamilyIncomeSummary, MemberIncome, MemberIncomeLine, summarize_family_income,
};
pub use investment_projection::{
    DEFAULT_CHECKPOINTS, MonthlyProjection, ProjectionPoint, ProjectionReport, monthly_rate,
    project_many, project_report, project_single, summarize_checkpoints,
};
pub use investment_summary::{HoldingsSummary, KindSummary, summarize_holdings};
pub use net_income::{
    FlatTaxResult, IncomeTaxResult, NetIncomeResult, SocialSecurityResult, TaxBreakdown,
    WelfareFundResult, calculate_flat_tax, calculate_income_tax, calculate_social_security,
    calculate_welfare_fund, compute_net_income,
};
pub use progressive_brackets::{
    BracketWithholding, apply_progressive_brackets, find_bracket, withhold,
};
