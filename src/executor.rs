use async_trait::async_trait;

use crate::error::DbAdapterError;
use crate::results::ResultSet;
use crate::types::{RunResult, SqlValue};

/// The capability set shared by both connection strategies.
///
/// Implementations resolve a `?`-placeholder query and its positional
/// parameters against SQL Server, each in their own way; callers treat them
/// uniformly.
#[async_trait]
pub trait QueryExecutor {
    /// Execute a query and return the ordered row set.
    async fn all(&mut self, query: &str, params: &[SqlValue])
    -> Result<ResultSet, DbAdapterError>;

    /// Execute a DML statement and report `{changes, last_id}`.
    async fn run(&mut self, query: &str, params: &[SqlValue])
    -> Result<RunResult, DbAdapterError>;

    /// Execute a batch of one or more statements without a structured result.
    async fn exec(&mut self, batch: &str) -> Result<(), DbAdapterError>;

    /// Release any persistent resource this strategy holds.
    async fn close(&mut self) -> Result<(), DbAdapterError>;
}
