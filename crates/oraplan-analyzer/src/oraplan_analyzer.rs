//! oraplan analyzer - query checks and EXPLAIN PLAN analysis
//!
//! This crate provides:
//! - Lexical rules over the raw query text
//! - The `PLAN_TABLE` round trip (explain, fetch, cleanup)
//! - Per-row rules over the retrieved plan
//! - The merged report and the service that drives one analysis run

pub mod explain;
pub mod format;
pub mod report;
pub mod rules;
pub mod service;
pub mod warning;

#[cfg(test)]
mod test_support;

pub use explain::{PlanRow, plan_rows_from_result};
pub use format::{FormatterConfig, SqlFormatter, format_sql};
pub use report::{AnalysisReport, NO_PROBLEMS_MESSAGE, ReportSummary};
pub use rules::{check_plan_rules, check_static_rules};
pub use service::AnalysisService;
pub use warning::{DisplayColor, Severity, Warning, WarningKind};
