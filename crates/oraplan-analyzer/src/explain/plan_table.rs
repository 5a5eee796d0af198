//! `PLAN_TABLE` round trip: explain, fetch, cleanup
//!
//! Each step is a separate call returning its own `Result` so callers can
//! keep whatever was produced before a later step failed.

use super::plan::{PLAN_COLUMNS, PlanRow, plan_rows_from_result};
use oraplan_core::{Connection, OraplanError, Result, Value};

/// Width of `PLAN_TABLE.STATEMENT_ID`
pub const STATEMENT_ID_MAX_LEN: usize = 30;

/// Generates a fresh statement id for one run
///
/// Hyphenated UUID v4 cut to the column width; only hex digits and hyphens,
/// so it is safe to embed as a literal.
pub fn new_statement_id() -> String {
    let mut id = uuid::Uuid::new_v4().hyphenated().to_string();
    id.truncate(STATEMENT_ID_MAX_LEN);
    id
}

/// Strips surrounding whitespace and a single trailing `;`
///
/// `EXPLAIN PLAN ... FOR` rejects a statement terminator.
pub fn explainable_text(query: &str) -> &str {
    let trimmed = query.trim();
    trimmed
        .strip_suffix(';')
        .map(str::trim_end)
        .unwrap_or(trimmed)
}

/// Builds the `EXPLAIN PLAN` statement
///
/// `EXPLAIN PLAN` does not accept bind variables, so the id is a literal.
pub fn explain_sql(statement_id: &str, query: &str) -> Result<String> {
    if !is_valid_statement_id(statement_id) {
        return Err(OraplanError::Query(format!(
            "invalid statement id '{}'",
            statement_id
        )));
    }
    Ok(format!(
        "EXPLAIN PLAN SET STATEMENT_ID = '{}' FOR {}",
        statement_id,
        explainable_text(query)
    ))
}

/// Builds the plan select, filtered by a bind variable
pub fn fetch_plan_sql() -> String {
    format!(
        "SELECT {} FROM PLAN_TABLE WHERE STATEMENT_ID = :1 ORDER BY ID ASC",
        PLAN_COLUMNS.join(", ")
    )
}

/// Builds the cleanup delete, filtered by a bind variable
pub fn cleanup_sql() -> &'static str {
    "DELETE FROM PLAN_TABLE WHERE STATEMENT_ID = :1"
}

fn is_valid_statement_id(statement_id: &str) -> bool {
    !statement_id.is_empty()
        && statement_id.len() <= STATEMENT_ID_MAX_LEN
        && statement_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Step 1: ask the optimizer to write the plan rows for `query`
pub async fn explain(conn: &dyn Connection, statement_id: &str, query: &str) -> Result<()> {
    let sql = explain_sql(statement_id, query)?;
    tracing::debug!(statement_id = %statement_id, "running EXPLAIN PLAN");
    conn.execute(&sql, &[]).await?;
    Ok(())
}

/// Step 2: read back the plan rows for `statement_id`, ordered by step id
pub async fn fetch_plan(conn: &dyn Connection, statement_id: &str) -> Result<Vec<PlanRow>> {
    let result = conn
        .query(&fetch_plan_sql(), &[Value::from(statement_id)])
        .await?;
    let rows = plan_rows_from_result(&result)?;
    tracing::debug!(
        statement_id = %statement_id,
        row_count = rows.len(),
        duration_ms = result.execution_time_ms,
        "plan rows fetched"
    );
    Ok(rows)
}

/// Step 3: delete the plan rows for `statement_id` and commit
pub async fn cleanup(conn: &dyn Connection, statement_id: &str) -> Result<()> {
    let deleted = conn
        .execute(cleanup_sql(), &[Value::from(statement_id)])
        .await?;
    conn.commit().await?;
    tracing::debug!(
        statement_id = %statement_id,
        deleted_rows = deleted.affected_rows,
        "plan rows removed"
    );
    Ok(())
}
