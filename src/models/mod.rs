//! Core data models for the finance engine.
//!
//! This module contains the value types shared by every calculation: money,
//! bracket tables, incomes, split shares, investment positions and emergency
//! fund plans. None of them references another by identity.

mod audit;
mod emergency_fund;
mod expense_split;
mod income;
mod investment;
mod money;
mod tax_bracket;

pub use audit::AuditStep;
pub use emergency_fund::{EmergencyFundPlan, EstimatedMonths, MAX_TARGET_MONTHS, MIN_TARGET_MONTHS};
pub use expense_split::{SplitAllocation, SplitShare};
pub use income::{Benefits, IncomeKind, IncomeRecord};
pub use investment::{
    InvestmentHolding, InvestmentKind, InvestmentPosition, MAX_ANNUAL_RETURN_PERCENT,
    MIN_ANNUAL_RETURN_PERCENT,
};
pub use money::Money;
pub use tax_bracket::{BracketMode, TaxBracket, TaxBracketTable};
