use async_trait::async_trait;
use bb8::Pool;
use bb8_tiberius::ConnectionManager;
use tracing::{debug, error};

use crate::config::MssqlConfig;
use crate::error::DbAdapterError;
use crate::executor::QueryExecutor;
use crate::query;
use crate::results::ResultSet;
use crate::translation::translate_qmarks;
use crate::types::{RunResult, SqlValue};

/// Pooled connection strategy.
///
/// Keeps a bb8-managed tiberius pool open across calls; `close` releases the
/// pool and subsequent query methods fail with a not-initialized error until
/// `open` is called again.
pub struct PooledBackend {
    config: MssqlConfig,
    pool: Option<Pool<ConnectionManager>>,
}

impl PooledBackend {
    #[must_use]
    pub fn new(config: MssqlConfig) -> Self {
        Self { config, pool: None }
    }

    /// Open the connection pool and verify reachability with a probe query.
    ///
    /// # Errors
    /// Returns `DbAdapterError::ConnectionError` if manager or pool creation
    /// fails, or if the probe cannot reach the server.
    pub async fn open(&mut self) -> Result<(), DbAdapterError> {
        let tiberius_config = self.config.to_tiberius_config();

        let manager = ConnectionManager::build(tiberius_config).map_err(|e| {
            DbAdapterError::ConnectionError(format!(
                "Failed to configure SQL Server manager: {e}"
            ))
        })?;

        let pool = Pool::builder()
            .max_size(20)
            .build(manager)
            .await
            .map_err(|e| {
                DbAdapterError::ConnectionError(format!("Failed to create SQL Server pool: {e}"))
            })?;

        if let Err(e) = Self::probe(&pool).await {
            error!(
                server = %self.config.server,
                database = %self.config.database,
                error = %e,
                "SQL Server pool connection failed"
            );
            return Err(e);
        }

        debug!(
            server = %self.config.server,
            database = %self.config.database,
            "SQL Server pool opened"
        );
        self.pool = Some(pool);
        Ok(())
    }

    // Checking out a connection is what actually dials the server
    async fn probe(pool: &Pool<ConnectionManager>) -> Result<(), DbAdapterError> {
        let mut conn = pool.get().await.map_err(|e| {
            DbAdapterError::ConnectionError(format!("SQL Server pool connection failed: {e}"))
        })?;
        let stream = conn.simple_query("SELECT 1").await.map_err(|e| {
            DbAdapterError::ConnectionError(format!("SQL Server connection probe failed: {e}"))
        })?;
        stream.into_results().await.map_err(|e| {
            DbAdapterError::ConnectionError(format!("SQL Server connection probe failed: {e}"))
        })?;
        Ok(())
    }

    fn pool(&self) -> Result<&Pool<ConnectionManager>, DbAdapterError> {
        self.pool.as_ref().ok_or_else(|| {
            DbAdapterError::NotInitialized(
                "connection pool is not open; call init() first".to_string(),
            )
        })
    }
}

impl std::fmt::Debug for PooledBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PooledBackend")
            .field("server", &self.config.server)
            .field("database", &self.config.database)
            .field("open", &self.pool.is_some())
            .finish()
    }
}

#[async_trait]
impl QueryExecutor for PooledBackend {
    async fn all(
        &mut self,
        query: &str,
        params: &[SqlValue],
    ) -> Result<ResultSet, DbAdapterError> {
        let pool = self.pool()?;
        let mut conn = pool
            .get()
            .await
            .map_err(|e| DbAdapterError::QueryError(format!("SQL Server pool error: {e}")))?;

        // The pool driver wants named parameters; rewrite ? to @P1..@PN
        let translated = translate_qmarks(query);
        query::build_result_set(&mut *conn, &translated, params).await
    }

    async fn run(
        &mut self,
        query: &str,
        params: &[SqlValue],
    ) -> Result<RunResult, DbAdapterError> {
        let pool = self.pool()?;
        let mut conn = pool
            .get()
            .await
            .map_err(|e| DbAdapterError::QueryError(format!("SQL Server pool error: {e}")))?;

        let translated = translate_qmarks(query);
        query::run_statement(&mut *conn, &translated, params).await
    }

    async fn exec(&mut self, batch: &str) -> Result<(), DbAdapterError> {
        let pool = self.pool()?;
        let mut conn = pool
            .get()
            .await
            .map_err(|e| DbAdapterError::BatchError(format!("SQL Server pool error: {e}")))?;

        query::execute_batch(&mut *conn, batch).await
    }

    async fn close(&mut self) -> Result<(), DbAdapterError> {
        if self.pool.take().is_some() {
            debug!(server = %self.config.server, "SQL Server pool released");
        }
        Ok(())
    }
}
