use mssql_adapter::prelude::*;

fn unreachable_config() -> MssqlConfigBuilder {
    // Port 1 refuses immediately; nothing listens there
    MssqlConfig::builder("127.0.0.1", "master")
        .user("sa")
        .password("x")
        .port(1)
}

#[tokio::test]
async fn pooled_query_methods_require_init() {
    let mut adapter = MssqlAdapter::new(unreachable_config().finish());

    let err = adapter.all("SELECT 1", &[]).await.unwrap_err();
    assert!(matches!(err, DbAdapterError::NotInitialized(_)));
    assert!(err.to_string().contains("not initialized"));

    let err = adapter
        .run("UPDATE t SET a = ?", &[SqlValue::Int(1)])
        .await
        .unwrap_err();
    assert!(matches!(err, DbAdapterError::NotInitialized(_)));

    let err = adapter.exec("DELETE FROM t").await.unwrap_err();
    assert!(matches!(err, DbAdapterError::NotInitialized(_)));
}

#[tokio::test]
async fn pooled_close_without_init_succeeds_and_stays_uninitialized() {
    let mut adapter = MssqlAdapter::new(unreachable_config().finish());

    adapter.close().await.unwrap();

    let err = adapter.all("SELECT 1", &[]).await.unwrap_err();
    assert!(matches!(err, DbAdapterError::NotInitialized(_)));
}

#[tokio::test]
async fn direct_init_against_unreachable_server_is_connection_error() {
    let config = unreachable_config().driver(DriverKind::Direct).finish();
    let mut adapter = MssqlAdapter::new(config);

    let err = adapter.init().await.unwrap_err();
    assert!(matches!(err, DbAdapterError::ConnectionError(_)));
    assert!(err.to_string().starts_with("Connection error:"));
}

#[tokio::test]
async fn direct_backend_stays_callable_after_close() {
    let config = unreachable_config().driver(DriverKind::Direct).finish();
    let mut adapter = MssqlAdapter::new(config);

    // Nothing is held, so close always completes
    adapter.close().await.unwrap();

    // Still callable: it dials per call and fails at the network, not with a
    // not-initialized error
    let err = adapter.all("SELECT 1", &[]).await.unwrap_err();
    assert!(matches!(err, DbAdapterError::QueryError(_)));

    let err = adapter.run("INSERT INTO t (a) VALUES (?)", &[SqlValue::Int(1)])
        .await
        .unwrap_err();
    assert!(matches!(err, DbAdapterError::QueryError(_)));

    let err = adapter.exec("CREATE TABLE t (a INT)").await.unwrap_err();
    assert!(matches!(err, DbAdapterError::BatchError(_)));
}

#[tokio::test]
async fn fallback_fails_only_when_both_strategies_fail() {
    let config = unreachable_config().fallback_to_direct(true).finish();
    let mut adapter = MssqlAdapter::new(config);

    // Pooled cannot connect, direct fallback cannot either; the reported
    // error comes from the second attempt
    let err = adapter.init().await.unwrap_err();
    assert!(matches!(err, DbAdapterError::ConnectionError(_)));
}

#[tokio::test]
async fn metadata_reflects_construction_parameters() {
    let config = MssqlConfig::builder("HOST\\INSTANCE", "master")
        .user("sa")
        .password("x")
        .finish();
    let adapter = MssqlAdapter::new(config);

    let meta = adapter.metadata();
    assert_eq!(meta.name, "mssql");
    assert_eq!(meta.kind, DriverKind::Pooled);
    assert_eq!(meta.server, "HOST\\INSTANCE");
    assert_eq!(meta.database, "master");

    let json = serde_json::to_value(meta).unwrap();
    assert_eq!(json["type"], "pooled");
    assert_eq!(json["name"], "mssql");
}

#[tokio::test]
async fn metadata_tracks_explicit_direct_selection() {
    let config = MssqlConfig::builder("localhost", "master")
        .driver(DriverKind::Direct)
        .finish();
    let adapter = MssqlAdapter::new(config);
    assert_eq!(adapter.metadata().kind, DriverKind::Direct);
}

#[tokio::test]
async fn schema_helpers_are_pure() {
    let adapter = MssqlAdapter::new(MssqlConfig::new("localhost", "master"));

    assert_eq!(adapter.list_tables_query(), adapter.list_tables_query());

    let first = adapter.describe_table_query("Orders");
    let second = adapter.describe_table_query("Orders");
    assert_eq!(first, second);
    assert!(first.contains("'Orders'"));
}
