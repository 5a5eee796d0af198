//! Test doubles for the connection and driver traits
//!
//! `ScriptedConnection` answers the `PLAN_TABLE` round trip from a canned
//! plan and can be told to fail at any step. Every call is logged so tests
//! can assert on the statement sequence and on session cleanup.

use crate::explain::{PLAN_COLUMNS, PlanRow};
use async_trait::async_trait;
use oraplan_core::{
    ColumnMeta, Connection, ConnectionConfig, DatabaseDriver, OraplanError, QueryResult, Result,
    StatementResult, Value,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// What the scripted server does
#[derive(Debug, Clone, Default)]
pub struct Script {
    pub plan: Vec<PlanRow>,
    pub fail_explain: bool,
    pub fail_fetch: bool,
    pub fail_delete: bool,
    pub fail_commit: bool,
    pub fail_close: bool,
}

impl Script {
    pub fn with_plan(plan: Vec<PlanRow>) -> Self {
        Self {
            plan,
            ..Default::default()
        }
    }
}

pub struct ScriptedConnection {
    script: Script,
    log: Mutex<Vec<String>>,
    binds: Mutex<Vec<Vec<Value>>>,
    closed: AtomicBool,
}

impl ScriptedConnection {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            log: Mutex::new(Vec::new()),
            binds: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Every statement and session call, in order
    pub fn log(&self) -> Vec<String> {
        self.log.lock().clone()
    }

    /// First keyword of every logged call
    pub fn verbs(&self) -> Vec<String> {
        self.log
            .lock()
            .iter()
            .map(|s| s.split_whitespace().next().unwrap_or_default().to_string())
            .collect()
    }

    /// Bind values passed with each execute/query call
    pub fn binds(&self) -> Vec<Vec<Value>> {
        self.binds.lock().clone()
    }

    fn record(&self, entry: &str, params: &[Value]) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(OraplanError::Driver("Connection is closed".into()));
        }
        self.log.lock().push(entry.to_string());
        self.binds.lock().push(params.to_vec());
        Ok(())
    }

    fn plan_result(&self) -> QueryResult {
        let columns = PLAN_COLUMNS
            .iter()
            .enumerate()
            .map(|(idx, name)| ColumnMeta::new(*name, "VARCHAR2", idx))
            .collect();
        let values = self
            .script
            .plan
            .iter()
            .map(|row| {
                vec![
                    Value::from(row.operation.clone()),
                    Value::from(row.options.clone()),
                    Value::from(row.object_name.clone()),
                    Value::from(row.cost),
                    Value::from(row.cardinality),
                ]
            })
            .collect();
        QueryResult::from_rows(columns, values)
    }
}

#[async_trait]
impl Connection for ScriptedConnection {
    fn driver_name(&self) -> &str {
        "scripted"
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> Result<StatementResult> {
        self.record(sql, params)?;
        if sql.starts_with("EXPLAIN PLAN") {
            if self.script.fail_explain {
                return Err(OraplanError::Query(
                    "ORA-00942: table or view does not exist".into(),
                ));
            }
            return Ok(StatementResult {
                affected_rows: self.script.plan.len() as u64,
            });
        }
        if sql.starts_with("DELETE") {
            if self.script.fail_delete {
                return Err(OraplanError::Query(
                    "ORA-00054: resource busy and acquire with NOWAIT specified".into(),
                ));
            }
            return Ok(StatementResult {
                affected_rows: self.script.plan.len() as u64,
            });
        }
        Ok(StatementResult::default())
    }

    async fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult> {
        self.record(sql, params)?;
        if self.script.fail_fetch {
            return Err(OraplanError::Query(
                "ORA-01031: insufficient privileges".into(),
            ));
        }
        Ok(self.plan_result())
    }

    async fn commit(&self) -> Result<()> {
        self.record("COMMIT", &[])?;
        if self.script.fail_commit {
            return Err(OraplanError::Query("ORA-02091: transaction rolled back".into()));
        }
        Ok(())
    }

    async fn rollback(&self) -> Result<()> {
        self.record("ROLLBACK", &[])
    }

    async fn close(&self) -> Result<()> {
        self.record("CLOSE", &[])?;
        self.closed.store(true, Ordering::SeqCst);
        if self.script.fail_close {
            return Err(OraplanError::Driver("ORA-03113: end-of-file on communication channel".into()));
        }
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

pub struct ScriptedDriver {
    script: Script,
    fail_connect: bool,
    connects: AtomicUsize,
    last: Mutex<Option<Arc<ScriptedConnection>>>,
}

impl ScriptedDriver {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            fail_connect: false,
            connects: AtomicUsize::new(0),
            last: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_connect: true,
            ..Self::new(Script::default())
        }
    }

    pub fn connect_attempts(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    /// The most recently opened session
    pub fn last_connection(&self) -> Option<Arc<ScriptedConnection>> {
        self.last.lock().clone()
    }
}

#[async_trait]
impl DatabaseDriver for ScriptedDriver {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn connect(&self, _config: &ConnectionConfig) -> Result<Arc<dyn Connection>> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if self.fail_connect {
            return Err(OraplanError::Connection(
                "ORA-12541: TNS:no listener".into(),
            ));
        }
        let conn = Arc::new(ScriptedConnection::new(self.script.clone()));
        *self.last.lock() = Some(conn.clone());
        Ok(conn as Arc<dyn Connection>)
    }

    async fn test_connection(&self, config: &ConnectionConfig) -> Result<()> {
        let conn = self.connect(config).await?;
        conn.close().await
    }

    fn build_connection_string(&self, config: &ConnectionConfig) -> String {
        format!("//{}:{}/{}", config.host, config.port, config.service_name)
    }
}

pub fn test_config() -> ConnectionConfig {
    ConnectionConfig::new("localhost", 1521, "ORCL").with_credentials("system", "manager")
}
