//! Audit trail models.
//!
//! Every rule applied while computing a figure records an [`AuditStep`], so a
//! caller can show how a net salary or a withheld amount was reached.

use serde::{Deserialize, Serialize};

/// A single step in the audit trail recording one rule application.
///
/// Each step captures the input, output, and reasoning for a rule application.
///
/// # Example
///
/// ```
/// use finance_engine::models::AuditStep;
///
/// let step = AuditStep {
///     step_number: 1,
///     rule_id: "inss".to_string(),
///     rule_name: "Social Security Contribution".to_string(),
///     input: serde_json::json!({"gross_cents": 500000}),
///     output: serde_json::json!({"withheld_cents": 51882}),
///     reasoning: "R$ 5.000,00 across 4 brackets = R$ 518,82".to_string(),
/// };
/// assert_eq!(step.rule_id, "inss");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}
