//! Report rendering for the terminal and for JSON output

use colored::{ColoredString, Colorize};
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use oraplan_analyzer::{AnalysisReport, DisplayColor, NO_PROBLEMS_MESSAGE, PlanRow, Warning};

/// Options for text rendering
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub show_plan: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { show_plan: true }
    }
}

fn paint(text: &str, color: DisplayColor) -> ColoredString {
    match color {
        DisplayColor::Alert => text.red().bold(),
        DisplayColor::Caution => text.truecolor(255, 165, 0),
    }
}

fn heading(text: &str) -> ColoredString {
    text.cyan().bold()
}

/// Renders the plan rows as a table, one row per step
pub fn plan_table(rows: &[PlanRow]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Operation", "Options", "Object", "Cost", "Cardinality"]);

    for (idx, row) in rows.iter().enumerate() {
        table.add_row(vec![
            idx.to_string(),
            row.operation.clone(),
            row.options.clone().unwrap_or_default(),
            row.object_name.clone().unwrap_or_default(),
            row.cost.map(|c| c.to_string()).unwrap_or_default(),
            row.cardinality.map(|c| c.to_string()).unwrap_or_default(),
        ]);
    }
    table
}

/// One report line, colored by severity
pub fn warning_line(warning: &Warning) -> String {
    let tag = format!("[{}]", warning.severity);
    let mut line = format!(
        "{} {}",
        paint(&tag, warning.severity.display_color()),
        warning.problem.bold()
    );
    if let Some(table) = &warning.table {
        line.push_str(&format!(" ({})", table));
    }
    line.push_str(&format!(" - {}", warning.advice));
    line
}

/// Full text report: formatted SQL, plan table, plan error, warnings
pub fn render_text(report: &AnalysisReport, options: RenderOptions) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n", heading("Formatted SQL")));
    out.push_str(&report.formatted_sql);
    out.push_str("\n\n");

    if options.show_plan && report.has_plan() {
        out.push_str(&format!(
            "{} ({} steps)\n",
            heading("Execution plan"),
            report.plan.len()
        ));
        out.push_str(&plan_table(&report.plan).to_string());
        out.push_str("\n\n");
    }

    if let Some(error) = &report.execution_error {
        out.push_str(&format!(
            "{} {}\n\n",
            "Plan retrieval failed:".red().bold(),
            error
        ));
    }

    out.push_str(&format!("{}\n", heading("Findings")));
    if report.is_clean() {
        out.push_str(&format!("{} {}\n", "✓".green(), NO_PROBLEMS_MESSAGE.green()));
    } else {
        for warning in report.warnings() {
            out.push_str(&format!("  {}\n", warning_line(warning)));
        }
        let summary = report.summary().to_string();
        let summary = match report.max_severity() {
            Some(severity) => paint(&summary, severity.display_color()),
            None => summary.dimmed(),
        };
        out.push_str(&format!("\n{}\n", summary));
    }

    out
}

/// Pretty-printed JSON report
pub fn render_json(report: &AnalysisReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// Error line shown inline by the interactive loop
pub fn render_error(context: &str, error: &dyn std::fmt::Display) -> String {
    format!("{} {}", format!("{}:", context).red().bold(), error)
}

#[cfg(test)]
mod tests;
