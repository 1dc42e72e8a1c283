use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::MssqlConfig;
use crate::direct::DirectBackend;
use crate::error::DbAdapterError;
use crate::executor::QueryExecutor;
use crate::pooled::PooledBackend;
use crate::results::ResultSet;
use crate::schema;
use crate::types::{DriverKind, RunResult, SqlValue};

/// Diagnostic description of an adapter instance.
#[derive(Debug, Clone, Serialize)]
pub struct AdapterMetadata {
    /// Adapter family name
    pub name: &'static str,
    /// Active connection strategy
    #[serde(rename = "type")]
    pub kind: DriverKind,
    /// Configured server address (possibly `host\instance`)
    pub server: String,
    /// Configured database name
    pub database: String,
}

/// The one active connection strategy of an adapter instance.
///
/// Selected once at construction; the only transition is the documented
/// pooled-to-direct fallback during `init`.
#[derive(Debug)]
enum Backend {
    Pooled(PooledBackend),
    Direct(DirectBackend),
}

#[async_trait]
impl QueryExecutor for Backend {
    async fn all(
        &mut self,
        query: &str,
        params: &[SqlValue],
    ) -> Result<ResultSet, DbAdapterError> {
        match self {
            Backend::Pooled(b) => b.all(query, params).await,
            Backend::Direct(b) => b.all(query, params).await,
        }
    }

    async fn run(
        &mut self,
        query: &str,
        params: &[SqlValue],
    ) -> Result<RunResult, DbAdapterError> {
        match self {
            Backend::Pooled(b) => b.run(query, params).await,
            Backend::Direct(b) => b.run(query, params).await,
        }
    }

    async fn exec(&mut self, batch: &str) -> Result<(), DbAdapterError> {
        match self {
            Backend::Pooled(b) => b.exec(batch).await,
            Backend::Direct(b) => b.exec(batch).await,
        }
    }

    async fn close(&mut self) -> Result<(), DbAdapterError> {
        match self {
            Backend::Pooled(b) => b.close().await,
            Backend::Direct(b) => b.close().await,
        }
    }
}

/// Uniform query interface over SQL Server with two interchangeable
/// connection strategies.
///
/// ```rust,no_run
/// use mssql_adapter::prelude::*;
///
/// # async fn demo() -> Result<(), DbAdapterError> {
/// let config = MssqlConfig::builder("HOST\\INSTANCE", "master")
///     .user("sa")
///     .password("x")
///     .finish();
///
/// let mut adapter = MssqlAdapter::new(config);
/// adapter.init().await?;
/// let rows = adapter.all("SELECT ? AS V", &[SqlValue::Int(42)]).await?;
/// assert_eq!(rows.rows[0].get("V"), Some(&SqlValue::Int(42)));
/// adapter.close().await?;
/// # Ok(())
/// # }
/// ```
///
/// Callers serialize access per instance; no internal locking is provided.
#[derive(Debug)]
pub struct MssqlAdapter {
    config: MssqlConfig,
    backend: Backend,
    metadata: AdapterMetadata,
}

impl MssqlAdapter {
    /// Construct an adapter; the connection strategy is resolved here and
    /// fixed for this instance's lifetime.
    #[must_use]
    pub fn new(config: MssqlConfig) -> Self {
        let kind = config.resolved_driver();
        let backend = match kind {
            DriverKind::Pooled => Backend::Pooled(PooledBackend::new(config.clone())),
            DriverKind::Direct => Backend::Direct(DirectBackend::new(&config)),
        };
        let metadata = AdapterMetadata {
            name: "mssql",
            kind,
            server: config.server.clone(),
            database: config.database.clone(),
        };
        debug!(driver = %kind, server = %config.server, "adapter constructed");

        Self {
            config,
            backend,
            metadata,
        }
    }

    /// Establish the backend-specific resource.
    ///
    /// When `fallback_to_direct` is configured and the pooled strategy cannot
    /// connect, the direct strategy is attempted once; `init` succeeds if
    /// either succeeds and fails only if both fail.
    ///
    /// # Errors
    /// Returns `DbAdapterError::ConnectionError` when the selected strategy
    /// (and its fallback, if any) cannot reach the server.
    pub async fn init(&mut self) -> Result<(), DbAdapterError> {
        let first = match &mut self.backend {
            Backend::Pooled(pooled) => match pooled.open().await {
                Ok(()) => return Ok(()),
                Err(e) => e,
            },
            Backend::Direct(direct) => return direct.open().await,
        };

        if !self.config.fallback_to_direct {
            return Err(first);
        }

        warn!(error = %first, "pooled connection failed; attempting direct fallback");
        let mut direct = DirectBackend::new(&self.config);
        direct.open().await?;

        self.backend = Backend::Direct(direct);
        self.metadata.kind = DriverKind::Direct;
        Ok(())
    }

    /// Execute a query and return the ordered row set.
    ///
    /// # Errors
    /// Returns `DbAdapterError::QueryError` on any failure, or
    /// `DbAdapterError::NotInitialized` when the pooled strategy has no open
    /// pool.
    pub async fn all(
        &mut self,
        query: &str,
        params: &[SqlValue],
    ) -> Result<ResultSet, DbAdapterError> {
        self.backend.all(query, params).await
    }

    /// Execute a DML statement and report `{changes, last_id}`.
    ///
    /// # Errors
    /// Same failure surface as [`all`](Self::all).
    pub async fn run(
        &mut self,
        query: &str,
        params: &[SqlValue],
    ) -> Result<RunResult, DbAdapterError> {
        self.backend.run(query, params).await
    }

    /// Execute a batch of one or more statements.
    ///
    /// # Errors
    /// Returns `DbAdapterError::BatchError` on failure.
    pub async fn exec(&mut self, batch: &str) -> Result<(), DbAdapterError> {
        self.backend.exec(batch).await
    }

    /// Release the pooled resource, if any.
    ///
    /// The direct strategy holds nothing and stays callable afterwards; the
    /// pooled strategy rejects further query methods until `init` runs again.
    /// That asymmetry is part of the contract.
    ///
    /// # Errors
    /// Currently always succeeds; the `Result` keeps the completion contract
    /// uniform across strategies.
    pub async fn close(&mut self) -> Result<(), DbAdapterError> {
        self.backend.close().await
    }

    /// Cached diagnostics for this instance.
    #[must_use]
    pub fn metadata(&self) -> &AdapterMetadata {
        &self.metadata
    }

    /// SQL text listing the user tables of the current database.
    #[must_use]
    pub fn list_tables_query(&self) -> &'static str {
        schema::list_tables_query()
    }

    /// SQL text describing the columns of `table_name` (caller escapes).
    #[must_use]
    pub fn describe_table_query(&self, table_name: &str) -> String {
        schema::describe_table_query(table_name)
    }
}
