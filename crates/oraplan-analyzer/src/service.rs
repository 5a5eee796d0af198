//! Analysis service
//!
//! Drives one analysis run: open a session, run the static rules, walk the
//! `PLAN_TABLE` round trip, evaluate the plan rules and close the session.

use crate::explain::{self, PlanRow};
use crate::format::SqlFormatter;
use crate::report::AnalysisReport;
use crate::rules::{check_plan_rules, check_static_rules};
use oraplan_core::{Connection, ConnectionConfig, DatabaseDriver, OraplanError, Result};

/// Rows gathered by the plan round trip and the first error it hit
#[derive(Debug, Default)]
struct PlanOutcome {
    rows: Vec<PlanRow>,
    error: Option<OraplanError>,
}

#[derive(Debug, Clone, Default)]
pub struct AnalysisService {
    formatter: SqlFormatter,
}

impl AnalysisService {
    pub fn new(formatter: SqlFormatter) -> Self {
        Self { formatter }
    }

    /// Static rules and formatting only; no session is opened
    pub fn check_only(&self, query: &str) -> Result<AnalysisReport> {
        if query.trim().is_empty() {
            return Err(OraplanError::EmptyQuery);
        }

        let mut report = AnalysisReport::new(query);
        report.formatted_sql = self.formatter.format(query);
        report.static_warnings = check_static_rules(query);
        Ok(report)
    }

    /// Runs a full analysis of `query` against the server described by `config`
    ///
    /// Fails only before a session exists: empty query, invalid descriptor or
    /// connection failure. Errors from the plan steps end up in
    /// `AnalysisReport::execution_error` next to whatever rows were read.
    #[tracing::instrument(
        skip_all,
        fields(driver = driver.name(), host = %config.host, service = %config.service_name)
    )]
    pub async fn analyze(
        &self,
        driver: &dyn DatabaseDriver,
        config: &ConnectionConfig,
        query: &str,
    ) -> Result<AnalysisReport> {
        if query.trim().is_empty() {
            return Err(OraplanError::EmptyQuery);
        }
        config.validate()?;

        let conn = driver.connect(config).await.map_err(|e| match e {
            OraplanError::Connection(_) | OraplanError::Configuration(_) => e,
            other => OraplanError::Connection(other.to_string()),
        })?;
        tracing::debug!("session opened");

        let mut report = self.check_only(query)?;
        let statement_id = explain::new_statement_id();
        report.statement_id = Some(statement_id.clone());

        let outcome = run_plan(conn.as_ref(), &statement_id, query).await;
        report.plan = outcome.rows;
        report.plan_warnings = check_plan_rules(&report.plan);
        if let Some(error) = outcome.error {
            tracing::warn!(statement_id = %statement_id, error = %error, "plan retrieval failed");
            report.execution_error = Some(error.to_string());
        }

        if let Err(e) = conn.close().await {
            tracing::warn!(error = %e, "failed to close session");
        }

        tracing::info!(
            statement_id = %statement_id,
            plan_rows = report.plan.len(),
            warnings = report.warning_count(),
            "analysis finished"
        );
        Ok(report)
    }
}

async fn run_plan(conn: &dyn Connection, statement_id: &str, query: &str) -> PlanOutcome {
    if let Err(e) = explain::explain(conn, statement_id, query).await {
        return PlanOutcome {
            rows: Vec::new(),
            error: Some(e),
        };
    }

    let rows = match explain::fetch_plan(conn, statement_id).await {
        Ok(rows) => rows,
        Err(e) => {
            rollback(conn).await;
            return PlanOutcome {
                rows: Vec::new(),
                error: Some(e),
            };
        }
    };

    let error = match explain::cleanup(conn, statement_id).await {
        Ok(()) => None,
        Err(e) => {
            rollback(conn).await;
            Some(e)
        }
    };

    PlanOutcome { rows, error }
}

async fn rollback(conn: &dyn Connection) {
    if let Err(e) = conn.rollback().await {
        tracing::warn!(error = %e, "rollback failed");
    }
}

#[cfg(test)]
mod tests;
