//! Tests for the PLAN_TABLE round trip

use super::*;
use crate::test_support::{Script, ScriptedConnection};
use oraplan_core::{OraplanError, Value};
use pretty_assertions::assert_eq;

mod statement_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_statement_id_shape() {
        let id = new_statement_id();
        assert_eq!(id.len(), STATEMENT_ID_MAX_LEN);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() || c == '-'));
        assert_ne!(id, new_statement_id());
    }

    #[test]
    fn test_explain_sql() {
        let sql = explain_sql("abc-123", "SELECT * FROM dual").unwrap();
        assert_eq!(
            sql,
            "EXPLAIN PLAN SET STATEMENT_ID = 'abc-123' FOR SELECT * FROM dual"
        );
    }

    #[test]
    fn test_explain_sql_strips_terminator() {
        let sql = explain_sql("id", "  SELECT 1 FROM dual ;  \n").unwrap();
        assert_eq!(sql, "EXPLAIN PLAN SET STATEMENT_ID = 'id' FOR SELECT 1 FROM dual");
    }

    #[test]
    fn test_explain_sql_rejects_unsafe_ids() {
        assert!(explain_sql("x' OR '1'='1", "SELECT 1 FROM dual").is_err());
        assert!(explain_sql("", "SELECT 1 FROM dual").is_err());
        assert!(explain_sql(&"a".repeat(31), "SELECT 1 FROM dual").is_err());
    }

    #[test]
    fn test_explainable_text_keeps_inner_semicolons() {
        assert_eq!(
            explainable_text("SELECT ';' FROM dual;"),
            "SELECT ';' FROM dual"
        );
        assert_eq!(explainable_text("SELECT 1 FROM dual"), "SELECT 1 FROM dual");
    }

    #[test]
    fn test_fetch_and_cleanup_sql() {
        assert_eq!(
            fetch_plan_sql(),
            "SELECT OPERATION, OPTIONS, OBJECT_NAME, COST, CARDINALITY FROM PLAN_TABLE \
             WHERE STATEMENT_ID = :1 ORDER BY ID ASC"
        );
        assert_eq!(
            cleanup_sql(),
            "DELETE FROM PLAN_TABLE WHERE STATEMENT_ID = :1"
        );
    }
}

mod round_trip_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn full_scan_plan() -> Vec<PlanRow> {
        vec![
            PlanRow::new("SELECT STATEMENT").with_cost(3).with_cardinality(14),
            PlanRow::new("TABLE ACCESS")
                .with_options("FULL")
                .with_object("EMPLOYEES")
                .with_cost(3)
                .with_cardinality(14),
        ]
    }

    #[tokio::test]
    async fn test_steps_issue_expected_statements() {
        let conn = ScriptedConnection::new(Script::with_plan(full_scan_plan()));

        explain(&conn, "stmt-1", "SELECT * FROM employees").await.unwrap();
        let rows = fetch_plan(&conn, "stmt-1").await.unwrap();
        cleanup(&conn, "stmt-1").await.unwrap();

        assert_eq!(rows, full_scan_plan());
        assert_eq!(conn.verbs(), vec!["EXPLAIN", "SELECT", "DELETE", "COMMIT"]);
        assert_eq!(
            conn.log()[0],
            "EXPLAIN PLAN SET STATEMENT_ID = 'stmt-1' FOR SELECT * FROM employees"
        );

        let binds = conn.binds();
        assert!(binds[0].is_empty());
        assert_eq!(binds[1], vec![Value::from("stmt-1")]);
        assert_eq!(binds[2], vec![Value::from("stmt-1")]);
    }

    #[tokio::test]
    async fn test_explain_failure_is_reported() {
        let conn = ScriptedConnection::new(Script {
            fail_explain: true,
            ..Default::default()
        });

        let err = explain(&conn, "stmt-1", "SELEC oops").await.unwrap_err();
        assert!(matches!(err, OraplanError::Query(ref msg) if msg.contains("ORA-00942")));
    }

    #[tokio::test]
    async fn test_cleanup_does_not_commit_when_delete_fails() {
        let conn = ScriptedConnection::new(Script {
            fail_delete: true,
            ..Default::default()
        });

        assert!(cleanup(&conn, "stmt-1").await.is_err());
        assert_eq!(conn.verbs(), vec!["DELETE"]);
    }

    #[tokio::test]
    async fn test_cleanup_reports_commit_failure() {
        let conn = ScriptedConnection::new(Script {
            fail_commit: true,
            ..Default::default()
        });

        assert!(cleanup(&conn, "stmt-1").await.is_err());
        assert_eq!(conn.verbs(), vec!["DELETE", "COMMIT"]);
    }
}
