use tiberius::{Client, Config, SqlBrowser};
use tokio::net::TcpStream;
use tokio_util::compat::TokioAsyncWriteCompatExt;

use crate::error::DbAdapterError;

/// Type alias for the SQL Server client used by both connection strategies.
pub type MssqlClient = bb8_tiberius::rt::Client;

/// Open a single tiberius client outside the pool.
///
/// Named instances are resolved through the SQL Browser service (UDP 1434);
/// otherwise the configured address is dialed directly.
///
/// # Errors
/// Returns `DbAdapterError::ConnectionError` if address resolution, the TCP
/// dial, or the TDS handshake fails.
pub async fn connect_client(
    config: &Config,
    named_instance: bool,
) -> Result<MssqlClient, DbAdapterError> {
    let tcp = if named_instance {
        TcpStream::connect_named(config).await.map_err(|e| {
            DbAdapterError::ConnectionError(format!("SQL Browser instance lookup failed: {e}"))
        })?
    } else {
        TcpStream::connect(config.get_addr()).await.map_err(|e| {
            DbAdapterError::ConnectionError(format!("TCP connection error: {e}"))
        })?
    };

    tcp.set_nodelay(true).ok();

    // Make compatible with Tiberius
    let tcp = tcp.compat_write();

    Client::connect(config.clone(), tcp).await.map_err(|e| {
        DbAdapterError::ConnectionError(format!("SQL Server connection error: {e}"))
    })
}
