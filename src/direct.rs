use async_trait::async_trait;
use tiberius::Config;
use tracing::{debug, warn};

use crate::client::{MssqlClient, connect_client};
use crate::config::MssqlConfig;
use crate::error::DbAdapterError;
use crate::executor::QueryExecutor;
use crate::query;
use crate::results::ResultSet;
use crate::translation::translate_qmarks;
use crate::types::{RunResult, SqlValue};

/// Direct connection strategy.
///
/// Each call builds a fresh client from the stored connection descriptor and
/// releases it afterwards; no persistent resource is held, so `close` has
/// nothing to tear down and the backend stays callable after it.
#[derive(Debug, Clone)]
pub struct DirectBackend {
    descriptor: String,
    named_instance: bool,
}

impl DirectBackend {
    #[must_use]
    pub fn new(config: &MssqlConfig) -> Self {
        Self {
            descriptor: config.to_ado_string(),
            named_instance: config.instance().is_some(),
        }
    }

    /// The ADO-style connection descriptor this backend dials.
    #[must_use]
    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }

    async fn connect(&self) -> Result<MssqlClient, DbAdapterError> {
        let config = Config::from_ado_string(&self.descriptor).map_err(|e| {
            DbAdapterError::ConnectionError(format!("Invalid connection descriptor: {e}"))
        })?;
        connect_client(&config, self.named_instance).await
    }

    /// Verify reachability with a probe query.
    ///
    /// On failure a targeted hint is logged when the error message matches a
    /// known pattern; the returned error is unchanged.
    ///
    /// # Errors
    /// Returns `DbAdapterError::ConnectionError` if the connection or the
    /// probe fails.
    pub async fn open(&mut self) -> Result<(), DbAdapterError> {
        let result = self.probe().await;
        if let Err(ref e) = result {
            log_connection_hint(e);
        }
        result
    }

    async fn probe(&self) -> Result<(), DbAdapterError> {
        let mut client = self.connect().await?;
        let stream = client.simple_query("SELECT 1").await.map_err(|e| {
            DbAdapterError::ConnectionError(format!("SQL Server connection probe failed: {e}"))
        })?;
        stream.into_results().await.map_err(|e| {
            DbAdapterError::ConnectionError(format!("SQL Server connection probe failed: {e}"))
        })?;
        let _ = client.close().await;

        debug!(descriptor = %redact_password(&self.descriptor), "direct connection verified");
        Ok(())
    }
}

/// Pick a diagnostic hint for a connection failure message, if one applies.
pub(crate) fn connection_hint(message: &str) -> Option<&'static str> {
    let lower = message.to_lowercase();
    if lower.contains("named") || lower.contains("instance") {
        Some("named-instance lookups need the SQL Browser service reachable on UDP 1434")
    } else if lower.contains("timeout") {
        Some("the server did not respond; check the host, port, and any firewall in between")
    } else if lower.contains("login") {
        Some("login was rejected; check the user, password, and database name")
    } else if lower.contains("driver") {
        Some("the connection descriptor was not accepted; check the extra options")
    } else {
        None
    }
}

fn log_connection_hint(err: &DbAdapterError) {
    if let Some(hint) = connection_hint(&err.to_string()) {
        warn!(error = %err, "{hint}");
    }
}

fn redact_password(descriptor: &str) -> String {
    descriptor
        .split(';')
        .map(|part| {
            if part.to_lowercase().starts_with("password=") {
                "Password=***"
            } else {
                part
            }
        })
        .collect::<Vec<_>>()
        .join(";")
}

#[async_trait]
impl QueryExecutor for DirectBackend {
    async fn all(
        &mut self,
        query: &str,
        params: &[SqlValue],
    ) -> Result<ResultSet, DbAdapterError> {
        let mut client = self
            .connect()
            .await
            .map_err(|e| DbAdapterError::QueryError(format!("SQL Server query error: {e}")))?;

        // The native call path accepts ?-style text; numbering for the wire
        // happens here, not in the adapter
        let translated = translate_qmarks(query);
        let result = query::build_result_set(&mut client, &translated, params).await;
        let _ = client.close().await;
        result
    }

    async fn run(
        &mut self,
        query: &str,
        params: &[SqlValue],
    ) -> Result<RunResult, DbAdapterError> {
        let mut client = self
            .connect()
            .await
            .map_err(|e| DbAdapterError::QueryError(format!("SQL Server query error: {e}")))?;

        let translated = translate_qmarks(query);
        let result = query::run_statement(&mut client, &translated, params).await;
        let _ = client.close().await;
        result
    }

    async fn exec(&mut self, batch: &str) -> Result<(), DbAdapterError> {
        let mut client = self.connect().await.map_err(|e| {
            DbAdapterError::BatchError(format!("SQL Server batch execution error: {e}"))
        })?;

        let result = query::execute_batch(&mut client, batch).await;
        let _ = client.close().await;
        result
    }

    // No persistent resource to release; kept async so callers treat both
    // strategies uniformly
    async fn close(&mut self) -> Result<(), DbAdapterError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hints_match_known_substrings() {
        assert!(connection_hint("error locating named instance").is_some());
        assert!(connection_hint("Instance not found").is_some());
        assert!(connection_hint("connection TIMEOUT expired").is_some());
        assert!(connection_hint("Login failed for user 'sa'").is_some());
        assert!(connection_hint("driver rejected the descriptor").is_some());
        assert!(connection_hint("connection refused").is_none());
    }

    #[test]
    fn descriptor_password_is_redacted_in_logs() {
        let redacted = redact_password("Server=tcp:h,1433;Password=secret;Database=db");
        assert_eq!(redacted, "Server=tcp:h,1433;Password=***;Database=db");
    }
}
