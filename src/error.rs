use thiserror::Error;

/// Error type surfaced by every adapter operation.
///
/// Backend-specific failures are caught and re-wrapped into one of the
/// adapter-level categories with a descriptive message. Nothing is retried
/// automatically except the pooled-to-direct fallback during `init` when the
/// configuration enables it.
#[derive(Debug, Error)]
pub enum DbAdapterError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Batch error: {0}")]
    BatchError(String),

    #[error("Adapter not initialized: {0}")]
    NotInitialized(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_carry_context_in_display() {
        let e = DbAdapterError::ConnectionError("no route to host".to_string());
        assert_eq!(e.to_string(), "Connection error: no route to host");

        let e = DbAdapterError::NotInitialized("connection pool is closed".to_string());
        assert!(e.to_string().contains("not initialized"));
    }

    #[test]
    fn every_category_is_a_plain_message_wrapper() {
        // Each variant carries only the descriptive message; backend errors
        // get re-wrapped at the call site rather than passed through
        let cases = [
            (
                DbAdapterError::ConfigError("bad".into()),
                "Configuration error: bad",
            ),
            (
                DbAdapterError::ConnectionError("bad".into()),
                "Connection error: bad",
            ),
            (DbAdapterError::QueryError("bad".into()), "Query error: bad"),
            (DbAdapterError::BatchError("bad".into()), "Batch error: bad"),
            (
                DbAdapterError::NotInitialized("bad".into()),
                "Adapter not initialized: bad",
            ),
        ];
        for (err, display) in cases {
            assert_eq!(err.to_string(), display);
        }
    }
}
