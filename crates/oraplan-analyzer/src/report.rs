//! Analysis report - merged result of one analysis run

use crate::explain::PlanRow;
use crate::warning::{Severity, Warning};
use serde::{Deserialize, Serialize};

/// Message shown when neither rule set found anything
pub const NO_PROBLEMS_MESSAGE: &str = "No significant problems detected.";

/// Result of one analysis run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Query text as submitted
    pub query: String,
    /// Reformatted query for display
    pub formatted_sql: String,
    /// Statement id used in `PLAN_TABLE`, if a session was opened
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statement_id: Option<String>,
    /// Plan rows in step order; empty or partial when a plan step failed
    pub plan: Vec<PlanRow>,
    /// Findings from the query text, in rule order
    pub static_warnings: Vec<Warning>,
    /// Findings from the plan, in row order
    pub plan_warnings: Vec<Warning>,
    /// Message of the plan step that failed, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_error: Option<String>,
}

impl AnalysisReport {
    /// Creates an empty report for `query`
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// All warnings: static ones first, then plan ones
    pub fn warnings(&self) -> impl Iterator<Item = &Warning> {
        self.static_warnings.iter().chain(self.plan_warnings.iter())
    }

    /// Number of warnings across both rule sets
    pub fn warning_count(&self) -> usize {
        self.static_warnings.len() + self.plan_warnings.len()
    }

    /// Returns true if no rule fired
    pub fn is_clean(&self) -> bool {
        self.warning_count() == 0
    }

    /// Returns true if plan rows were retrieved
    pub fn has_plan(&self) -> bool {
        !self.plan.is_empty()
    }

    /// Highest severity in the report
    pub fn max_severity(&self) -> Option<Severity> {
        self.warnings().map(|w| w.severity).max()
    }

    /// Warning counts per severity
    pub fn summary(&self) -> ReportSummary {
        let mut summary = ReportSummary::default();
        for warning in self.warnings() {
            match warning.severity {
                Severity::Critical => summary.critical += 1,
                Severity::High => summary.high += 1,
                Severity::Medium => summary.medium += 1,
            }
        }
        summary
    }
}

/// Warning counts per severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
}

impl ReportSummary {
    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium
    }
}

impl std::fmt::Display for ReportSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.total() == 0 {
            return f.write_str(NO_PROBLEMS_MESSAGE);
        }
        write!(
            f,
            "{} critical, {} high, {} medium",
            self.critical, self.high, self.medium
        )
    }
}
