//! Lightweight async adapter for Microsoft SQL Server.
//!
//! One uniform query surface (`init`, `all`, `run`, `exec`, `close`, plus
//! schema-introspection helpers) over two interchangeable connection
//! strategies, selected once at construction:
//!
//! - **Pooled**: a bb8-managed tiberius pool kept open across calls
//! - **Direct**: a fresh tiberius client per call, built from an ADO-style
//!   connection descriptor, with nothing retained between calls
//!
//! Queries use `?` positional placeholders for all parameters, in order;
//! see [`translation::translate_qmarks`] for how they reach the wire.

pub mod adapter;
pub mod client;
pub mod config;
pub mod direct;
pub mod error;
pub mod executor;
pub mod pooled;
pub mod prelude;
pub mod query;
pub mod results;
pub mod schema;
pub mod translation;
pub mod types;

pub use adapter::{AdapterMetadata, MssqlAdapter};
pub use client::{MssqlClient, connect_client};
pub use config::{MssqlConfig, MssqlConfigBuilder};
pub use direct::DirectBackend;
pub use error::DbAdapterError;
pub use executor::QueryExecutor;
pub use pooled::PooledBackend;
pub use query::build_result_set;
pub use results::{ResultSet, Row};
pub use schema::{describe_table_query, list_tables_query};
pub use translation::translate_qmarks;
pub use types::{DriverKind, RunResult, SqlValue};
