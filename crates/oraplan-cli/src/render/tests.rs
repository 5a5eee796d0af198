use super::*;
use oraplan_analyzer::WarningKind;
use pretty_assertions::assert_eq;

fn plain() {
    colored::control::set_override(false);
}

fn employees_report() -> AnalysisReport {
    let mut report = AnalysisReport::new("select * from employees");
    report.formatted_sql = "SELECT\n  *\nFROM\n  employees".to_string();
    report.plan = vec![
        PlanRow::new("SELECT STATEMENT").with_cost(3),
        PlanRow::new("TABLE ACCESS")
            .with_options("FULL")
            .with_object("EMPLOYEES")
            .with_cost(3)
            .with_cardinality(107),
    ];
    report.static_warnings = vec![Warning::new(WarningKind::SelectStar)];
    report.plan_warnings = vec![Warning::new(WarningKind::FullTableScan).with_table("EMPLOYEES")];
    report
}

#[test]
fn test_warning_line() {
    plain();
    let warning = Warning::new(WarningKind::FullTableScan).with_table("EMPLOYEES");
    assert_eq!(
        warning_line(&warning),
        "[Critical] Full table scan (EMPLOYEES) - The whole table is read. Review indexing."
    );

    let warning = Warning::new(WarningKind::SelectStar);
    assert_eq!(
        warning_line(&warning),
        "[High] Unqualified column selection (SELECT *) - Select only the columns you need."
    );
}

#[test]
fn test_text_report_sections_in_order() {
    plain();
    let text = render_text(&employees_report(), RenderOptions::default());

    let sql = text.find("FROM\n  employees").unwrap();
    let plan = text.find("Execution plan (2 steps)").unwrap();
    let findings = text.find("Findings").unwrap();
    let select_star = text.find("[High]").unwrap();
    let full_scan = text.find("[Critical]").unwrap();

    assert!(sql < plan && plan < findings);
    assert!(select_star < full_scan);
    assert!(text.contains("107"));
    assert!(text.contains("1 critical, 1 high, 0 medium"));
    assert!(!text.contains(NO_PROBLEMS_MESSAGE));
}

#[test]
fn test_plan_can_be_hidden() {
    plain();
    let text = render_text(&employees_report(), RenderOptions { show_plan: false });
    assert!(!text.contains("Execution plan"));
    assert!(text.contains("[Critical]"));
}

#[test]
fn test_clean_report_acknowledges() {
    plain();
    let mut report = AnalysisReport::new("select id from employees where id = 1");
    report.formatted_sql = "SELECT id FROM employees WHERE id = 1".to_string();
    let text = render_text(&report, RenderOptions::default());

    assert!(text.contains(NO_PROBLEMS_MESSAGE));
    assert!(!text.contains("Execution plan"));
}

#[test]
fn test_execution_error_is_shown() {
    plain();
    let mut report = employees_report();
    report.plan.clear();
    report.plan_warnings.clear();
    report.execution_error = Some("Query error: ORA-00942: table or view does not exist".into());

    let text = render_text(&report, RenderOptions::default());
    assert!(text.contains("Plan retrieval failed: Query error: ORA-00942"));
    assert!(text.contains("[High]"));
}

#[test]
fn test_plan_table_rows() {
    let rendered = plan_table(&employees_report().plan).to_string();
    assert!(rendered.contains("TABLE ACCESS"));
    assert!(rendered.contains("EMPLOYEES"));
    assert!(rendered.contains("Cardinality"));
}

#[test]
fn test_json_report() {
    let json = render_json(&employees_report()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["plan"][1]["object_name"], "EMPLOYEES");
    assert_eq!(value["static_warnings"][0]["severity"], "high");
    assert_eq!(value["plan_warnings"][0]["kind"], "full_table_scan");
}
