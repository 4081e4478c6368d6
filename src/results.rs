use std::collections::HashMap;
use std::sync::Arc;

use crate::types::RowValues;

/// A row from a statement result.
///
/// Column names are per-row: response items carry no declared schema, so two
/// rows of the same result may expose different attribute sets. Positional
/// order follows the attribute encounter order in the response.
#[derive(Debug, Clone)]
pub struct CustomDbRow {
    /// The column names for this row
    pub column_names: Arc<Vec<String>>,
    /// The values for this row
    pub rows: Vec<RowValues>,
    // Internal cache for faster column lookups (to avoid repeated string comparisons)
    #[doc(hidden)]
    pub(crate) column_index_cache: Arc<HashMap<String, usize>>,
}

impl CustomDbRow {
    /// Create a new row from column names and values.
    #[must_use]
    pub fn new(column_names: Arc<Vec<String>>, rows: Vec<RowValues>) -> Self {
        // Build a cache of column name to index for faster lookups
        let cache = Arc::new(
            column_names
                .iter()
                .enumerate()
                .map(|(i, name)| (name.clone(), i))
                .collect::<HashMap<_, _>>(),
        );

        Self {
            column_names,
            rows,
            column_index_cache: cache,
        }
    }

    /// Get the index of a column by name, or None if not found.
    #[must_use]
    pub fn get_column_index(&self, column_name: &str) -> Option<usize> {
        // First check the cache
        if let Some(&idx) = self.column_index_cache.get(column_name) {
            return Some(idx);
        }

        // Fall back to linear search
        self.column_names.iter().position(|col| col == column_name)
    }

    /// Get a value from the row by column name.
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&RowValues> {
        let index_opt = self.get_column_index(column_name);
        if let Some(idx) = index_opt {
            self.rows.get(idx)
        } else {
            None
        }
    }

    /// Get a value from the row by column index.
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&RowValues> {
        self.rows.get(index)
    }
}

/// A fully materialized result set, produced by draining a row cursor.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// The rows returned by the statement
    pub results: Vec<CustomDbRow>,
    /// The number of rows collected
    pub rows_affected: usize,
}

impl ResultSet {
    /// Create a new result set with a known capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> ResultSet {
        ResultSet {
            results: Vec::with_capacity(capacity),
            rows_affected: 0,
        }
    }

    /// Add a row to the result set.
    pub fn add_row(&mut self, row: CustomDbRow) {
        self.results.push(row);
        self.rows_affected += 1;
    }
}
