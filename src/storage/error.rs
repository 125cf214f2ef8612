//! Errors raised by the table store.

use super::schema::ColumnType;

/// Custom error type for table store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The operation named a table that was never created.
    #[error("Unknown table '{0}'")]
    UnknownTable(String),

    /// A row or filter named a column the table does not declare.
    #[error("Unknown column '{column}' in table '{table}'")]
    UnknownColumn { table: String, column: String },

    /// A table declaration the store cannot hold.
    #[error("Invalid schema for table '{table}': {reason}")]
    InvalidSchema { table: String, reason: String },

    /// A value of the wrong kind for its column.
    #[error("Column '{column}' expects {expected}, got {found}")]
    TypeMismatch {
        column: String,
        expected: ColumnType,
        found: &'static str,
    },

    /// A required column was absent or null.
    #[error("Missing value for required column '{0}'")]
    MissingValue(String),

    /// A row tried to set a column the store assigns itself.
    #[error("Column '{column}' in table '{table}' is generated by the store")]
    GeneratedColumn { table: String, column: String },

    /// Underlying SQLite failure.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Stored schema metadata could not be encoded or decoded.
    #[error("Schema metadata error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn missing(column: &str) -> Self {
        StoreError::MissingValue(column.to_string())
    }

    /// Whether the error means the target table does not exist.
    pub fn is_unknown_table(&self) -> bool {
        matches!(self, StoreError::UnknownTable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display_unknown_table() {
        let err = StoreError::UnknownTable("courses".to_string());
        assert_eq!(err.to_string(), "Unknown table 'courses'");
        assert!(err.is_unknown_table());
    }

    #[test]
    fn test_store_error_display_type_mismatch() {
        let err = StoreError::TypeMismatch {
            column: "year".to_string(),
            expected: ColumnType::Integer,
            found: "text",
        };
        assert!(err.to_string().contains("expects integer, got text"));
        assert!(!err.is_unknown_table());
    }
}
