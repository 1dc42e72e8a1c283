//! Convenient imports for common functionality.
//!
//! Re-exports the types most callers need to construct and use an adapter.

pub use crate::adapter::{AdapterMetadata, MssqlAdapter};
pub use crate::config::{MssqlConfig, MssqlConfigBuilder};
pub use crate::error::DbAdapterError;
pub use crate::executor::QueryExecutor;
pub use crate::results::{ResultSet, Row};
pub use crate::translation::translate_qmarks;
pub use crate::types::{DriverKind, RunResult, SqlValue};
