//! Shared result types produced by checks: check results and the
//! polymorphic check-fact shape persisted alongside them.

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckResultType {
    Passed,
    Failed,
    Skipped,
    Unknown,
}

/// Recorded when a check is skipped because a parent relationship's
/// expected result was not satisfied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedInfo {
    pub check_id: String,
    pub suppress_comment: String,
}

/// One polymorphic check-specific fact: each check
/// in the corpus defines its own JSON shape (build tool name, deploy
/// command, language, risk score, ...), kept untyped here since the
/// scheduler and registry never need to interpret it, only persist it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckFact {
    pub confidence: f64,
    pub data: Json,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    pub check_id: String,
    pub result_type: CheckResultType,
    pub justification: Vec<String>,
    pub facts: Vec<CheckFact>,
}
