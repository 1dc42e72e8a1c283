use super::row::Row;
use crate::types::SqlValue;

/// An ordered set of rows returned by a query.
///
/// The row shape is whatever the backend produced; rows are passed through
/// verbatim in arrival order.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// The rows returned by the query
    pub rows: Vec<Row>,
    /// The number of rows collected
    pub rows_affected: usize,
    /// Column names shared by all rows (to avoid duplicating in each row)
    column_names: Option<std::sync::Arc<Vec<String>>>,
    column_index: Option<std::sync::Arc<std::collections::HashMap<String, usize>>>,
}

impl ResultSet {
    /// Create a new result set with a known capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> ResultSet {
        ResultSet {
            rows: Vec::with_capacity(capacity),
            rows_affected: 0,
            column_names: None,
            column_index: None,
        }
    }

    /// Set the column names shared by all rows in this result set.
    pub fn set_column_names(&mut self, column_names: std::sync::Arc<Vec<String>>) {
        self.column_index = Some(std::sync::Arc::new(
            column_names
                .iter()
                .enumerate()
                .map(|(i, name)| (name.clone(), i))
                .collect::<std::collections::HashMap<_, _>>(),
        ));
        self.column_names = Some(column_names);
    }

    /// Get the column names for this result set.
    #[must_use]
    pub fn column_names(&self) -> Option<&std::sync::Arc<Vec<String>>> {
        self.column_names.as_ref()
    }

    /// Append a row built from the shared column names.
    ///
    /// A no-op when `set_column_names` has not been called yet.
    pub fn add_row_values(&mut self, values: Vec<SqlValue>) {
        if let (Some(column_names), Some(index)) = (&self.column_names, &self.column_index) {
            self.rows.push(Row {
                column_names: column_names.clone(),
                values,
                column_index_cache: index.clone(),
            });
            self.rows_affected += 1;
        }
    }

    /// Append an externally constructed row.
    pub fn add_row(&mut self, row: Row) {
        if self.column_names.is_none() {
            self.column_names = Some(row.column_names.clone());
            self.column_index = Some(row.column_index_cache.clone());
        }

        self.rows.push(row);
        self.rows_affected += 1;
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_keep_arrival_order() {
        let mut rs = ResultSet::with_capacity(2);
        rs.set_column_names(std::sync::Arc::new(vec!["v".to_string()]));
        rs.add_row_values(vec![SqlValue::Int(1)]);
        rs.add_row_values(vec![SqlValue::Int(2)]);

        assert_eq!(rs.len(), 2);
        assert_eq!(rs.rows_affected, 2);
        assert_eq!(rs.rows[0].get("v"), Some(&SqlValue::Int(1)));
        assert_eq!(rs.rows[1].get("v"), Some(&SqlValue::Int(2)));
    }

    #[test]
    fn add_row_values_requires_column_names() {
        let mut rs = ResultSet::default();
        rs.add_row_values(vec![SqlValue::Int(1)]);
        assert!(rs.is_empty());
    }
}
