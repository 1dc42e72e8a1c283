use crate::types::SqlValue;

/// A row from a query result.
///
/// Column names are shared across all rows in a result set.
#[derive(Debug, Clone)]
pub struct Row {
    /// The column names for this row (shared across the result set)
    pub column_names: std::sync::Arc<Vec<String>>,
    /// The values for this row
    pub values: Vec<SqlValue>,
    // Cache column name -> index lookups to avoid repeated string comparisons
    #[doc(hidden)]
    pub(crate) column_index_cache: std::sync::Arc<std::collections::HashMap<String, usize>>,
}

impl Row {
    #[must_use]
    pub fn new(column_names: std::sync::Arc<Vec<String>>, values: Vec<SqlValue>) -> Self {
        let cache = std::sync::Arc::new(
            column_names
                .iter()
                .enumerate()
                .map(|(i, name)| (name.clone(), i))
                .collect::<std::collections::HashMap<_, _>>(),
        );

        Self {
            column_names,
            values,
            column_index_cache: cache,
        }
    }

    /// Get the index of a column by name.
    #[must_use]
    pub fn column_index(&self, column_name: &str) -> Option<usize> {
        if let Some(&idx) = self.column_index_cache.get(column_name) {
            return Some(idx);
        }

        // Fall back to linear search
        self.column_names.iter().position(|col| col == column_name)
    }

    /// Get a value from the row by column name.
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&SqlValue> {
        self.column_index(column_name)
            .and_then(|idx| self.values.get(idx))
    }

    /// Get a value from the row by column index.
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&SqlValue> {
        self.values.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_name_and_index() {
        let names = std::sync::Arc::new(vec!["id".to_string(), "name".to_string()]);
        let row = Row::new(names, vec![SqlValue::Int(7), SqlValue::Text("x".into())]);

        assert_eq!(row.get("id"), Some(&SqlValue::Int(7)));
        assert_eq!(row.get_by_index(1), Some(&SqlValue::Text("x".into())));
        assert_eq!(row.get("missing"), None);
    }
}
