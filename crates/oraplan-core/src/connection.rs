//! Connection trait

use crate::{QueryResult, Result, StatementResult, Value};
use async_trait::async_trait;

/// An open database session
///
/// A session is owned by exactly one analysis run. Statements are issued
/// sequentially; nothing is committed until [`Connection::commit`] is called.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Get the driver name (e.g., "oracle")
    fn driver_name(&self) -> &str;

    /// Execute a statement that does not return rows (EXPLAIN PLAN, DELETE, ...)
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<StatementResult>;

    /// Execute a query that returns rows
    async fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult>;

    /// Commit the current transaction
    async fn commit(&self) -> Result<()>;

    /// Roll back the current transaction
    async fn rollback(&self) -> Result<()>;

    /// Close the session. Subsequent calls fail with a driver error.
    async fn close(&self) -> Result<()>;

    /// Check if the session is closed
    fn is_closed(&self) -> bool;
}
