//! Schema-introspection SQL against the INFORMATION_SCHEMA views.
//!
//! Pure string templates; the same input always produces the same text.

/// SQL text listing the user tables of the current database.
#[must_use]
pub fn list_tables_query() -> &'static str {
    "SELECT TABLE_NAME AS name \
     FROM INFORMATION_SCHEMA.TABLES \
     WHERE TABLE_TYPE = 'BASE TABLE' \
     ORDER BY TABLE_NAME"
}

/// SQL text describing the columns of `table_name`.
///
/// The table name is interpolated directly; the caller is responsible for any
/// escaping it needs.
#[must_use]
pub fn describe_table_query(table_name: &str) -> String {
    format!(
        "SELECT COLUMN_NAME AS name, DATA_TYPE AS type, \
         IS_NULLABLE AS nullable, COLUMN_DEFAULT AS dflt_value \
         FROM INFORMATION_SCHEMA.COLUMNS \
         WHERE TABLE_NAME = '{table_name}' \
         ORDER BY ORDINAL_POSITION"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_tables_text_is_fixed() {
        assert_eq!(list_tables_query(), list_tables_query());
        assert!(list_tables_query().contains("INFORMATION_SCHEMA.TABLES"));
        assert!(list_tables_query().contains("BASE TABLE"));
    }

    #[test]
    fn describe_table_interpolates_name_verbatim() {
        let sql = describe_table_query("Orders");
        assert!(sql.contains("WHERE TABLE_NAME = 'Orders'"));
        assert!(sql.contains("INFORMATION_SCHEMA.COLUMNS"));
        assert_eq!(sql, describe_table_query("Orders"));
    }
}
