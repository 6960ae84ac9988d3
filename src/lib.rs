//! Household finance computation engine
//!
//! This crate turns raw monetary inputs into derived figures for a family
//! finance tracker: INSS and IRPF withholding through a progressive bracket
//! engine, net income for salaried (CLT) and self-employed (PJ) work, expense
//! splits, compound-growth investment projections and emergency fund plans.
//!
//! All money is held as integer centavos in [`models::Money`]. Every
//! operation is a pure function of its arguments; tax tables are always
//! passed in explicitly, typically from [`config::TaxConfigLoader`].
//!
//! # Example
//!
//! ```
//! use finance_engine::calculation::compute_net_income;
//! use finance_engine::config::TaxTables;
//! use finance_engine::models::{IncomeRecord, Money};
//!
//! let tables = TaxTables::defaults()?;
//! let result = compute_net_income(&IncomeRecord::salaried(Money::from_cents(500_000)), &tables)?;
//! assert_eq!(result.net.format_brl(), "R$ 4.135,68");
//! # Ok::<(), finance_engine::error::EngineError>(())
//! ```

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
