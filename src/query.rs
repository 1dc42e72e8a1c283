use chrono::NaiveDateTime;
use futures_util::TryStreamExt;
use tiberius::Query;

use crate::client::MssqlClient;
use crate::error::DbAdapterError;
use crate::results::ResultSet;
use crate::types::{RunResult, SqlValue};

/// Bind parameters directly to the query for SQL Server.
/// Return a query builder with parameters already bound.
pub fn bind_params<'a>(query: &'a str, params: &[SqlValue]) -> Query<'a> {
    let mut query_builder = Query::new(query);

    // Bind owned values; tiberius Query takes ownership of the data
    for param in params {
        match param {
            SqlValue::Int(i) => query_builder.bind(*i),
            SqlValue::Float(f) => query_builder.bind(*f),
            SqlValue::Text(s) => query_builder.bind(s.clone()),
            SqlValue::Bool(b) => query_builder.bind(*b),
            SqlValue::Timestamp(dt) => {
                let formatted = dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string();
                query_builder.bind(formatted);
            }
            SqlValue::Null => query_builder.bind(Option::<String>::None),
            SqlValue::Json(jsval) => query_builder.bind(jsval.to_string()),
            SqlValue::Blob(bytes) => query_builder.bind(bytes.clone()),
        }
    }

    query_builder
}

/// Build a result set from a SQL Server query execution.
///
/// Expects `query` to already carry `@PN` parameter names.
///
/// # Errors
/// Returns `DbAdapterError::QueryError` if execution or result processing
/// fails.
pub async fn build_result_set(
    client: &mut MssqlClient,
    query: &str,
    params: &[SqlValue],
) -> Result<ResultSet, DbAdapterError> {
    let query_builder = bind_params(query, params);

    let mut stream = query_builder
        .query(client)
        .await
        .map_err(|e| DbAdapterError::QueryError(format!("SQL Server query error: {e}")))?;

    let columns_opt = stream
        .columns()
        .await
        .map_err(|e| DbAdapterError::QueryError(format!("SQL Server column fetch error: {e}")))?;

    let columns = columns_opt.ok_or_else(|| {
        DbAdapterError::QueryError("No columns returned from query".to_string())
    })?;

    let column_names: Vec<String> = columns.iter().map(|col| col.name().to_string()).collect();
    let col_count = column_names.len();

    let mut result_set = ResultSet::with_capacity(10);
    // Store column names once in the result set
    result_set.set_column_names(std::sync::Arc::new(column_names));

    let mut rows_stream = stream.into_row_stream();
    while let Some(row_result) = rows_stream
        .try_next()
        .await
        .map_err(|e| DbAdapterError::QueryError(format!("SQL Server row fetch error: {e}")))?
    {
        let mut row_values = Vec::with_capacity(col_count);

        for i in 0..col_count {
            if let Some(value) = extract_value(&row_result, i) {
                row_values.push(value);
            } else {
                row_values.push(SqlValue::Null);
            }
        }

        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}

/// Extract a value from a row at a specific index.
fn extract_value(row: &tiberius::Row, idx: usize) -> Option<SqlValue> {
    // The Tiberius Row API varies by column type, so probe the likely types
    // in order

    if let Ok(Some(val)) = row.try_get::<i32, _>(idx) {
        return Some(SqlValue::Int(i64::from(val)));
    }

    if let Ok(Some(val)) = row.try_get::<i64, _>(idx) {
        return Some(SqlValue::Int(val));
    }

    if let Ok(Some(val)) = row.try_get::<f32, _>(idx) {
        return Some(SqlValue::Float(f64::from(val)));
    }

    if let Ok(Some(val)) = row.try_get::<f64, _>(idx) {
        return Some(SqlValue::Float(val));
    }

    if let Ok(Some(val)) = row.try_get::<bool, _>(idx) {
        return Some(SqlValue::Bool(val));
    }

    if let Ok(Some(val)) = row.try_get::<&str, _>(idx) {
        // If it looks like a date/time, try to parse it
        if val.contains('-') && (val.contains(':') || val.contains(' ')) {
            if let Ok(dt) = NaiveDateTime::parse_from_str(val, "%Y-%m-%d %H:%M:%S%.f") {
                return Some(SqlValue::Timestamp(dt));
            } else if let Ok(dt) = NaiveDateTime::parse_from_str(val, "%Y-%m-%d %H:%M:%S") {
                return Some(SqlValue::Timestamp(dt));
            }
        }

        return Some(SqlValue::Text(val.to_string()));
    }

    if let Ok(Some(val)) = row.try_get::<&[u8], _>(idx) {
        return Some(SqlValue::Blob(val.to_vec()));
    }

    // NULL or an unrecognized column type
    None
}

/// Case-insensitive INSERT prefix check, ignoring leading whitespace.
pub(crate) fn is_insert(sql: &str) -> bool {
    sql.trim_start()
        .as_bytes()
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(b"INSERT"))
}

/// Append the identity-retrieval statement to an INSERT batch.
///
/// SCOPE_IDENTITY() comes back as NUMERIC(38,0); cast to BIGINT so the value
/// reads cleanly as an i64.
pub(crate) fn augment_insert(sql: &str) -> String {
    format!("{sql}; SELECT CAST(SCOPE_IDENTITY() AS BIGINT) AS last_id;")
}

/// Execute a DML statement and report `{changes, last_id}`.
///
/// INSERT statements get the identity-retrieval clause appended and the
/// generated key is parsed from the final result set of the batch. For other
/// statements both fields stay 0; affected-row counts for UPDATE/DELETE are
/// not computed (documented limitation).
///
/// # Errors
/// Returns `DbAdapterError::QueryError` if execution fails; a failure of the
/// identity retrieval is not distinguished from a failure of the original
/// statement.
pub async fn run_statement(
    client: &mut MssqlClient,
    sql: &str,
    params: &[SqlValue],
) -> Result<RunResult, DbAdapterError> {
    if is_insert(sql) {
        let augmented = augment_insert(sql);
        let query_builder = bind_params(&augmented, params);

        let stream = query_builder
            .query(client)
            .await
            .map_err(|e| DbAdapterError::QueryError(format!("SQL Server query error: {e}")))?;

        let results = stream.into_results().await.map_err(|e| {
            DbAdapterError::QueryError(format!("SQL Server row fetch error: {e}"))
        })?;

        // The identity value arrives in the final result set of the batch
        let last_id = results
            .last()
            .and_then(|rows| rows.last())
            .and_then(|row| row.try_get::<i64, _>(0).ok().flatten())
            .unwrap_or(0);

        Ok(RunResult {
            changes: 1,
            last_id,
        })
    } else {
        let query_builder = bind_params(sql, params);
        query_builder
            .execute(client)
            .await
            .map_err(|e| DbAdapterError::QueryError(format!("SQL Server DML error: {e}")))?;

        Ok(RunResult::default())
    }
}

/// Execute a batch of SQL statements without collecting a structured result.
///
/// # Errors
/// Returns `DbAdapterError::BatchError` if execution fails.
pub async fn execute_batch(client: &mut MssqlClient, query: &str) -> Result<(), DbAdapterError> {
    let query_builder = tiberius::Query::new(query.to_string());
    query_builder.execute(client).await.map_err(|e| {
        DbAdapterError::BatchError(format!("SQL Server batch execution error: {e}"))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_detection_is_prefix_and_case_insensitive() {
        assert!(is_insert("INSERT INTO t (a) VALUES (?)"));
        assert!(is_insert("  insert into t values (1)"));
        assert!(is_insert("\n\tInSeRt INTO t DEFAULT VALUES"));
        assert!(!is_insert("UPDATE t SET a = 1"));
        assert!(!is_insert("DELETE FROM t"));
        assert!(!is_insert("SELECT * FROM inserts"));
        assert!(!is_insert("ins"));
    }

    #[test]
    fn insert_augmentation_appends_identity_select() {
        let out = augment_insert("INSERT INTO t (a) VALUES (@P1)");
        assert_eq!(
            out,
            "INSERT INTO t (a) VALUES (@P1); SELECT CAST(SCOPE_IDENTITY() AS BIGINT) AS last_id;"
        );
    }
}
