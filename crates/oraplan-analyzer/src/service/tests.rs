//! Tests for the analysis service

use super::*;
use crate::test_support::{Script, ScriptedDriver, test_config};
use crate::warning::{Severity, WarningKind};
use pretty_assertions::assert_eq;

const EMPLOYEES_QUERY: &str = "SELECT * FROM employees WHERE TRUNC(hire_date) = TRUNC(SYSDATE)";

fn employees_plan() -> Vec<PlanRow> {
    vec![
        PlanRow::new("SELECT STATEMENT").with_cost(3).with_cardinality(1),
        PlanRow::new("TABLE ACCESS")
            .with_options("FULL")
            .with_object("EMPLOYEES")
            .with_cost(3)
            .with_cardinality(1),
    ]
}

fn verbs(driver: &ScriptedDriver) -> Vec<String> {
    driver
        .last_connection()
        .map(|conn| conn.verbs())
        .unwrap_or_default()
}

mod validation_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_empty_query_never_connects() {
        let driver = ScriptedDriver::new(Script::default());
        let service = AnalysisService::default();

        for query in ["", "   ", "\n\t  \n"] {
            let result = service.analyze(&driver, &test_config(), query).await;
            assert!(matches!(result, Err(OraplanError::EmptyQuery)));
        }
        assert_eq!(driver.connect_attempts(), 0);
    }

    #[tokio::test]
    async fn test_invalid_descriptor_never_connects() {
        let driver = ScriptedDriver::new(Script::default());
        let mut config = test_config();
        config.service_name = String::new();

        let err = AnalysisService::default()
            .analyze(&driver, &config, "SELECT 1 FROM dual")
            .await
            .unwrap_err();
        assert!(err.is_connection_error());
        assert_eq!(driver.connect_attempts(), 0);
    }

    #[tokio::test]
    async fn test_connection_failure_produces_nothing_else() {
        let driver = ScriptedDriver::failing();
        let err = AnalysisService::default()
            .analyze(&driver, &test_config(), EMPLOYEES_QUERY)
            .await
            .unwrap_err();

        assert!(matches!(err, OraplanError::Connection(ref msg) if msg.contains("ORA-12541")));
        assert_eq!(driver.connect_attempts(), 1);
        assert!(driver.last_connection().is_none());
    }

    #[test]
    fn test_check_only() {
        let service = AnalysisService::default();
        let report = service.check_only(EMPLOYEES_QUERY).unwrap();

        assert!(report.formatted_sql.starts_with("SELECT"));
        assert_eq!(report.static_warnings.len(), 2);
        assert!(report.plan.is_empty());
        assert!(report.statement_id.is_none());
        assert!(matches!(service.check_only(" "), Err(OraplanError::EmptyQuery)));
    }
}

mod run_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_employees_example() {
        let driver = ScriptedDriver::new(Script::with_plan(employees_plan()));
        let report = AnalysisService::default()
            .analyze(&driver, &test_config(), EMPLOYEES_QUERY)
            .await
            .unwrap();

        let warnings: Vec<_> = report
            .warnings()
            .map(|w| (w.kind, w.severity, w.table.clone()))
            .collect();
        assert_eq!(
            warnings,
            vec![
                (WarningKind::SelectStar, Severity::High, None),
                (WarningKind::FunctionOnFilteredColumn, Severity::Medium, None),
                (
                    WarningKind::FullTableScan,
                    Severity::Critical,
                    Some("EMPLOYEES".to_string())
                ),
            ]
        );
        assert_eq!(report.plan, employees_plan());
        assert!(report.execution_error.is_none());
        assert_eq!(report.query, EMPLOYEES_QUERY);
    }

    #[tokio::test]
    async fn test_statement_sequence_on_success() {
        let driver = ScriptedDriver::new(Script::with_plan(employees_plan()));
        let report = AnalysisService::default()
            .analyze(&driver, &test_config(), "SELECT id FROM employees;")
            .await
            .unwrap();

        assert_eq!(verbs(&driver), vec!["EXPLAIN", "SELECT", "DELETE", "COMMIT", "CLOSE"]);

        let conn = driver.last_connection().unwrap();
        let statement_id = report.statement_id.unwrap();
        assert_eq!(
            conn.log()[0],
            format!("EXPLAIN PLAN SET STATEMENT_ID = '{statement_id}' FOR SELECT id FROM employees")
        );
        assert!(conn.is_closed());
    }

    #[tokio::test]
    async fn test_fresh_statement_id_per_run() {
        let driver = ScriptedDriver::new(Script::default());
        let service = AnalysisService::default();

        let first = service.analyze(&driver, &test_config(), "SELECT 1 FROM dual").await.unwrap();
        let second = service.analyze(&driver, &test_config(), "SELECT 1 FROM dual").await.unwrap();

        assert_eq!(driver.connect_attempts(), 2);
        assert_ne!(first.statement_id, second.statement_id);
    }

    #[tokio::test]
    async fn test_clean_plan() {
        let plan = vec![
            PlanRow::new("SELECT STATEMENT"),
            PlanRow::new("INDEX")
                .with_options("UNIQUE SCAN")
                .with_object("EMP_EMP_ID_PK"),
        ];
        let driver = ScriptedDriver::new(Script::with_plan(plan));
        let report = AnalysisService::default()
            .analyze(&driver, &test_config(), "SELECT id FROM employees WHERE id = 7")
            .await
            .unwrap();

        assert!(report.is_clean());
        assert!(report.has_plan());
    }
}

mod failure_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_explain_failure() {
        let script = Script {
            fail_explain: true,
            ..Script::with_plan(employees_plan())
        };
        let driver = ScriptedDriver::new(script);
        let report = AnalysisService::default()
            .analyze(&driver, &test_config(), EMPLOYEES_QUERY)
            .await
            .unwrap();

        assert_eq!(verbs(&driver), vec!["EXPLAIN", "CLOSE"]);
        assert!(report.plan.is_empty());
        assert!(report.plan_warnings.is_empty());
        assert_eq!(report.static_warnings.len(), 2);
        assert!(report.execution_error.unwrap().contains("ORA-00942"));
    }

    #[tokio::test]
    async fn test_fetch_failure_rolls_back() {
        let script = Script {
            fail_fetch: true,
            ..Script::with_plan(employees_plan())
        };
        let driver = ScriptedDriver::new(script);
        let report = AnalysisService::default()
            .analyze(&driver, &test_config(), EMPLOYEES_QUERY)
            .await
            .unwrap();

        assert_eq!(verbs(&driver), vec!["EXPLAIN", "SELECT", "ROLLBACK", "CLOSE"]);
        assert!(report.plan.is_empty());
        assert!(report.execution_error.unwrap().contains("ORA-01031"));
    }

    #[tokio::test]
    async fn test_cleanup_failure_keeps_rows() {
        let script = Script {
            fail_delete: true,
            ..Script::with_plan(employees_plan())
        };
        let driver = ScriptedDriver::new(script);
        let report = AnalysisService::default()
            .analyze(&driver, &test_config(), EMPLOYEES_QUERY)
            .await
            .unwrap();

        assert_eq!(
            verbs(&driver),
            vec!["EXPLAIN", "SELECT", "DELETE", "ROLLBACK", "CLOSE"]
        );
        assert_eq!(report.plan.len(), 2);
        assert_eq!(report.plan_warnings.len(), 1);
        assert_eq!(report.plan_warnings[0].kind, WarningKind::FullTableScan);
        assert!(report.execution_error.unwrap().contains("ORA-00054"));
    }

    #[tokio::test]
    async fn test_commit_failure_keeps_rows() {
        let script = Script {
            fail_commit: true,
            ..Script::with_plan(employees_plan())
        };
        let driver = ScriptedDriver::new(script);
        let report = AnalysisService::default()
            .analyze(&driver, &test_config(), EMPLOYEES_QUERY)
            .await
            .unwrap();

        assert_eq!(
            verbs(&driver),
            vec!["EXPLAIN", "SELECT", "DELETE", "COMMIT", "ROLLBACK", "CLOSE"]
        );
        assert_eq!(report.plan.len(), 2);
        assert!(report.execution_error.is_some());
    }

    #[tokio::test]
    async fn test_close_failure_is_not_surfaced() {
        let script = Script {
            fail_close: true,
            ..Script::with_plan(employees_plan())
        };
        let driver = ScriptedDriver::new(script);
        let report = AnalysisService::default()
            .analyze(&driver, &test_config(), EMPLOYEES_QUERY)
            .await
            .unwrap();

        assert!(report.execution_error.is_none());
        assert!(driver.last_connection().unwrap().is_closed());
    }
}
