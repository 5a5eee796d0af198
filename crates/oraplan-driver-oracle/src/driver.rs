//! Oracle driver implementation

use async_trait::async_trait;
use oracle::sql_type::{OracleType, ToSql};
use oraplan_core::{
    ColumnMeta, Connection, ConnectionConfig, ConnectionField, ConnectionFieldSchema,
    DatabaseDriver, OraplanError, QueryResult, Result, Row, StatementResult, Value,
};
use parking_lot::Mutex;
use std::borrow::Cow;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Oracle database driver
pub struct OracleDriver;

impl OracleDriver {
    pub fn new() -> Self {
        tracing::debug!("Oracle driver initialized");
        Self
    }
}

impl Default for OracleDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatabaseDriver for OracleDriver {
    fn name(&self) -> &'static str {
        "oracle"
    }

    #[tracing::instrument(skip(self, config), fields(host = %config.host, port = config.port, service = %config.service_name))]
    async fn connect(&self, config: &ConnectionConfig) -> Result<Arc<dyn Connection>> {
        config.validate()?;
        let connect_string = self.build_connection_string(config);
        let username = config.username.as_deref().unwrap_or_default();
        let password = config.password.as_deref().unwrap_or_default();

        tracing::debug!(connect_string = %connect_string, "connecting to Oracle");
        let connection = oracle::Connection::connect(username, password, &connect_string)
            .map_err(|e| OraplanError::Connection(format!("Failed to connect to Oracle: {}", e)))?;

        tracing::info!(user = %username, "Oracle session opened");
        Ok(Arc::new(OracleConnection::new(connection, connect_string)))
    }

    #[tracing::instrument(skip(self, config))]
    async fn test_connection(&self, config: &ConnectionConfig) -> Result<()> {
        let conn = self.connect(config).await?;
        let probe = conn.query("SELECT 1 FROM DUAL", &[]).await;
        conn.close().await?;
        probe.map(|_| ())
    }

    /// Easy Connect string: `//host:port/service_name`
    fn build_connection_string(&self, config: &ConnectionConfig) -> String {
        format!(
            "//{}:{}/{}",
            config.host.trim(),
            config.port,
            config.service_name.trim()
        )
    }

    fn connection_field_schema(&self) -> ConnectionFieldSchema {
        ConnectionFieldSchema {
            title: Cow::Borrowed("Oracle Connection"),
            fields: vec![
                ConnectionField::text("host", "Host")
                    .default_value("localhost")
                    .required(),
                ConnectionField::number("port", "Port")
                    .default_value("1521")
                    .required(),
                ConnectionField::text("service_name", "Service Name")
                    .default_value("ORCL")
                    .required()
                    .help_text("Service name registered with the listener"),
                ConnectionField::text("user", "Username").default_value("system"),
                ConnectionField::password("password", "Password"),
            ],
        }
    }
}

/// Oracle session wrapper implementing the Connection trait
pub struct OracleConnection {
    connection: Mutex<oracle::Connection>,
    connect_string: String,
    closed: AtomicBool,
}

impl OracleConnection {
    pub fn new(connection: oracle::Connection, connect_string: String) -> Self {
        Self {
            connection: Mutex::new(connection),
            connect_string,
            closed: AtomicBool::new(false),
        }
    }

    fn ensure_not_closed(&self) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(OraplanError::Driver("Connection is closed".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Connection for OracleConnection {
    fn driver_name(&self) -> &str {
        "oracle"
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> Result<StatementResult> {
        self.ensure_not_closed()?;
        let start = std::time::Instant::now();

        let binds = bind_values(params);
        let bind_refs = bind_refs(&binds);
        let conn = self.connection.lock();
        let stmt = conn
            .execute(sql, &bind_refs)
            .map_err(|e| OraplanError::Query(e.to_string()))?;
        let affected = stmt
            .row_count()
            .map_err(|e| OraplanError::Driver(format!("Failed to read row count: {}", e)))?;

        tracing::debug!(
            affected_rows = affected,
            duration_ms = start.elapsed().as_millis() as u64,
            "execute completed"
        );

        Ok(StatementResult {
            affected_rows: affected,
        })
    }

    async fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult> {
        self.ensure_not_closed()?;
        let start = std::time::Instant::now();

        let binds = bind_values(params);
        let bind_refs = bind_refs(&binds);
        let conn = self.connection.lock();
        let result_set = conn
            .query(sql, &bind_refs)
            .map_err(|e| OraplanError::Query(e.to_string()))?;

        let column_types: Vec<OracleType> = result_set
            .column_info()
            .iter()
            .map(|info| info.oracle_type().clone())
            .collect();
        let columns: Vec<ColumnMeta> = result_set
            .column_info()
            .iter()
            .enumerate()
            .map(|(idx, info)| ColumnMeta::new(info.name(), info.oracle_type().to_string(), idx))
            .collect();
        let names: Vec<String> = columns.iter().map(|c| c.name.clone()).collect();

        let mut rows = Vec::new();
        for row in result_set {
            let row = row.map_err(|e| OraplanError::Driver(format!("Row fetch failed: {}", e)))?;
            let values = column_types
                .iter()
                .enumerate()
                .map(|(idx, oracle_type)| row_to_value(&row, idx, oracle_type))
                .collect();
            rows.push(Row::new(names.clone(), values));
        }

        let execution_time_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(
            row_count = rows.len(),
            duration_ms = execution_time_ms,
            "query completed"
        );

        let mut result = QueryResult::empty();
        result.columns = columns;
        result.rows = rows;
        result.execution_time_ms = execution_time_ms;
        Ok(result)
    }

    async fn commit(&self) -> Result<()> {
        self.ensure_not_closed()?;
        self.connection
            .lock()
            .commit()
            .map_err(|e| OraplanError::Query(format!("Commit failed: {}", e)))
    }

    async fn rollback(&self) -> Result<()> {
        self.ensure_not_closed()?;
        self.connection
            .lock()
            .rollback()
            .map_err(|e| OraplanError::Query(format!("Rollback failed: {}", e)))
    }

    async fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.connection
            .lock()
            .close()
            .map_err(|e| OraplanError::Driver(format!("Failed to close session: {}", e)))?;
        tracing::debug!("Oracle session closed");
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for OracleConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OracleConnection")
            .field("connect_string", &self.connect_string)
            .field("closed", &self.closed.load(Ordering::SeqCst))
            .finish()
    }
}

/// Owned bind values in positional order (`:1`, `:2`, ...)
fn bind_values(params: &[Value]) -> Vec<Box<dyn ToSql>> {
    params
        .iter()
        .map(|value| -> Box<dyn ToSql> {
            match value {
                Value::Null => Box::new(None::<String>),
                Value::Int64(n) => Box::new(*n),
                Value::Float64(n) => Box::new(*n),
                Value::String(s) => Box::new(s.clone()),
            }
        })
        .collect()
}

fn bind_refs(binds: &[Box<dyn ToSql>]) -> Vec<&dyn ToSql> {
    binds.iter().map(|b| b.as_ref()).collect()
}

/// Column types that only hold whole numbers
pub(crate) fn is_integer_type(oracle_type: &OracleType) -> bool {
    matches!(
        oracle_type,
        OracleType::Number(_, 0) | OracleType::Int64 | OracleType::UInt64
    )
}

/// Column types read as numbers
pub(crate) fn is_numeric_type(oracle_type: &OracleType) -> bool {
    matches!(
        oracle_type,
        OracleType::Number(_, _)
            | OracleType::Float(_)
            | OracleType::BinaryFloat
            | OracleType::BinaryDouble
    )
}

fn row_to_value(row: &oracle::Row, idx: usize, oracle_type: &OracleType) -> Value {
    if is_integer_type(oracle_type) {
        if let Ok(v) = row.get::<usize, Option<i64>>(idx) {
            return v.map(Value::Int64).unwrap_or(Value::Null);
        }
    }
    if is_numeric_type(oracle_type) {
        if let Ok(v) = row.get::<usize, Option<f64>>(idx) {
            return v.map(Value::Float64).unwrap_or(Value::Null);
        }
    }
    match row.get::<usize, Option<String>>(idx) {
        Ok(Some(s)) => Value::String(s),
        Ok(None) => Value::Null,
        Err(e) => {
            tracing::warn!(column = idx, error = %e, "unreadable column value");
            Value::Null
        }
    }
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;
