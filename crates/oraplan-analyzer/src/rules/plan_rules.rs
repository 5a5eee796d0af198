//! Checks on execution plan rows

use crate::explain::PlanRow;
use crate::warning::{Warning, WarningKind};

/// Table attribution for findings that are not tied to one object
pub const NO_TABLE: &str = "N/A";

/// Table attribution when the plan row names no object
pub const UNKNOWN_TABLE: &str = "unknown";

fn object_of(row: &PlanRow) -> String {
    row.object_name
        .clone()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNKNOWN_TABLE.to_string())
}

/// Evaluates one plan row; a row can produce several warnings
pub fn check_plan_row(row: &PlanRow) -> Vec<Warning> {
    let mut warnings = Vec::new();
    let options = row.options_str();

    if row.operation == "TABLE ACCESS" && options == "FULL" {
        warnings.push(Warning::new(WarningKind::FullTableScan).with_table(object_of(row)));
    }

    if options.contains("CARTESIAN") || row.operation.contains("CARTESIAN") {
        warnings.push(Warning::new(WarningKind::CartesianProduct).with_table(NO_TABLE));
    }

    if options.contains("SKIP SCAN") {
        warnings.push(Warning::new(WarningKind::IndexSkipScan).with_table(object_of(row)));
    }

    warnings
}

/// Evaluates every row in plan order
pub fn check_plan_rules(rows: &[PlanRow]) -> Vec<Warning> {
    let warnings: Vec<Warning> = rows.iter().flat_map(check_plan_row).collect();
    tracing::trace!(
        row_count = rows.len(),
        warning_count = warnings.len(),
        "plan rules evaluated"
    );
    warnings
}
