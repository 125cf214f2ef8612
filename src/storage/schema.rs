//! Table schemas, scalar values, rows, and equality filters.
//!
//! These types describe the shape of data held by the [`TableStore`](super::TableStore)
//! independently of how it is persisted.

use std::collections::BTreeMap;
use std::fmt;

use rusqlite::types::{ToSql, ToSqlOutput};
use serde::{Deserialize, Serialize};

use super::error::StoreError;

/// Name prefix reserved for the store's own bookkeeping tables.
pub(crate) const RESERVED_PREFIX: &str = "__";

/// Table name prefix SQLite keeps for its internal tables.
const SQLITE_PREFIX: &str = "sqlite_";

/// Names SQLite resolves to a table's row id. Rows are returned in row id
/// order, so a user column may not take one of these names.
const ROWID_ALIASES: [&str; 3] = ["rowid", "oid", "_rowid_"];

/// The type tag of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// A 64-bit signed integer.
    Integer,
    /// A UTF-8 string.
    Text,
}

impl ColumnType {
    /// The SQL type name used when the table is materialized.
    pub fn sql_name(&self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Text => "TEXT",
        }
    }

    /// Whether a value of this kind can be stored in (or compared with) the column.
    ///
    /// `Null` is admitted by every type; nullability is checked separately.
    pub fn admits(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (_, Value::Null) | (ColumnType::Integer, Value::Integer(_)) | (ColumnType::Text, Value::Text(_))
        )
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Integer => write!(f, "integer"),
            ColumnType::Text => write!(f, "text"),
        }
    }
}

/// A single column declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Column name, unique within its table
    pub name: String,

    /// Declared type
    #[serde(rename = "type")]
    pub column_type: ColumnType,

    /// Part of the primary key
    #[serde(default)]
    pub primary_key: bool,

    /// Rejects missing or null values on insert
    #[serde(default)]
    pub not_null: bool,

    /// Assigned by the store from a per-table counter starting at 1
    #[serde(default)]
    pub auto_increment: bool,
}

impl ColumnDef {
    /// Creates a nullable column with no constraints.
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            primary_key: false,
            not_null: false,
            auto_increment: false,
        }
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Integer)
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Text)
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    /// Renders the column as it appears in a `CREATE TABLE` statement.
    ///
    /// Only auto-increment keys become SQLite rowid aliases, so rowid order
    /// always matches insertion order.
    pub(crate) fn sql_definition(&self) -> String {
        let mut sql = format!("{} {}", quote_ident(&self.name), self.column_type.sql_name());
        if self.auto_increment {
            sql.push_str(" PRIMARY KEY AUTOINCREMENT");
        } else if self.primary_key {
            sql.push_str(" NOT NULL UNIQUE");
        } else if self.not_null {
            sql.push_str(" NOT NULL");
        }
        sql
    }

    /// Short human-readable list of constraints, e.g. `pk, autoincrement`.
    pub fn constraint_summary(&self) -> String {
        let mut parts = Vec::new();
        if self.primary_key {
            parts.push("pk");
        }
        if self.auto_increment {
            parts.push("autoincrement");
        }
        if self.not_null {
            parts.push("not null");
        }
        parts.join(", ")
    }
}

/// A validated table declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnDef>,
}

impl TableSchema {
    /// Builds a schema, rejecting names and column sets the store cannot hold.
    pub fn new(name: &str, columns: Vec<ColumnDef>) -> Result<Self, StoreError> {
        let invalid = |reason: String| StoreError::InvalidSchema {
            table: name.to_string(),
            reason,
        };

        if !is_valid_ident(name) {
            return Err(invalid(format!("'{name}' is not a valid table name")));
        }
        if name.starts_with(RESERVED_PREFIX) {
            return Err(invalid(format!(
                "names starting with '{RESERVED_PREFIX}' are reserved"
            )));
        }
        if name.to_ascii_lowercase().starts_with(SQLITE_PREFIX) {
            return Err(invalid(format!(
                "names starting with '{SQLITE_PREFIX}' belong to SQLite"
            )));
        }
        if columns.is_empty() {
            return Err(invalid("a table needs at least one column".to_string()));
        }

        let mut primary_keys = 0;
        for (i, column) in columns.iter().enumerate() {
            if !is_valid_ident(&column.name) || column.name.starts_with(RESERVED_PREFIX) {
                return Err(invalid(format!("'{}' is not a valid column name", column.name)));
            }
            if ROWID_ALIASES
                .iter()
                .any(|alias| column.name.eq_ignore_ascii_case(alias))
            {
                return Err(invalid(format!(
                    "'{}' is reserved for the row id",
                    column.name
                )));
            }
            if columns[..i]
                .iter()
                .any(|c| c.name.eq_ignore_ascii_case(&column.name))
            {
                return Err(invalid(format!("duplicate column '{}'", column.name)));
            }
            if column.primary_key {
                primary_keys += 1;
            }
            if column.auto_increment
                && (!column.primary_key || column.column_type != ColumnType::Integer)
            {
                return Err(invalid(format!(
                    "auto-increment column '{}' must be an integer primary key",
                    column.name
                )));
            }
        }
        if primary_keys > 1 {
            return Err(invalid("at most one primary key column is supported".to_string()));
        }

        Ok(Self {
            name: name.to_string(),
            columns,
        })
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Checks a row against the declared columns before it is written.
    pub fn validate_row(&self, row: &Row) -> Result<(), StoreError> {
        for (name, value) in row.iter() {
            let column = self.column(name).ok_or_else(|| StoreError::UnknownColumn {
                table: self.name.clone(),
                column: name.to_string(),
            })?;
            if column.auto_increment && !value.is_null() {
                return Err(StoreError::GeneratedColumn {
                    table: self.name.clone(),
                    column: name.to_string(),
                });
            }
            if !column.column_type.admits(value) {
                return Err(StoreError::TypeMismatch {
                    column: name.to_string(),
                    expected: column.column_type,
                    found: value.type_name(),
                });
            }
        }

        for column in &self.columns {
            let required = !column.auto_increment && (column.not_null || column.primary_key);
            if required && row.get(&column.name).map_or(true, Value::is_null) {
                return Err(StoreError::missing(&column.name));
            }
        }

        Ok(())
    }

    /// The `CREATE TABLE` statement for this schema.
    pub(crate) fn create_sql(&self) -> String {
        let columns: Vec<String> = self.columns.iter().map(ColumnDef::sql_definition).collect();
        format!(
            "CREATE TABLE {} ({})",
            quote_ident(&self.name),
            columns.join(", ")
        )
    }
}

/// A scalar cell value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Name of the value's kind, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Integer(_) => "integer",
            Value::Text(_) => "text",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Owned(rusqlite::types::Value::Null),
            Value::Integer(i) => ToSqlOutput::from(*i),
            Value::Text(s) => ToSqlOutput::from(s.as_str()),
        })
    }
}

/// A mapping from column name to value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    values: BTreeMap<String, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Row::set`].
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(column, value);
        self
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Reads a required integer cell.
    pub fn integer(&self, column: &str) -> Result<i64, StoreError> {
        self.optional_integer(column)?
            .ok_or_else(|| StoreError::missing(column))
    }

    /// Reads a required text cell.
    pub fn text(&self, column: &str) -> Result<String, StoreError> {
        self.optional_text(column)?
            .ok_or_else(|| StoreError::missing(column))
    }

    /// Reads an integer cell that may be absent or null.
    pub fn optional_integer(&self, column: &str) -> Result<Option<i64>, StoreError> {
        match self.values.get(column) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Integer(i)) => Ok(Some(*i)),
            Some(other) => Err(StoreError::TypeMismatch {
                column: column.to_string(),
                expected: ColumnType::Integer,
                found: other.type_name(),
            }),
        }
    }

    /// Reads a text cell that may be absent or null.
    pub fn optional_text(&self, column: &str) -> Result<Option<String>, StoreError> {
        match self.values.get(column) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Text(s)) => Ok(Some(s.clone())),
            Some(other) => Err(StoreError::TypeMismatch {
                column: column.to_string(),
                expected: ColumnType::Text,
                found: other.type_name(),
            }),
        }
    }
}

/// A conjunction of column equality terms.
///
/// An empty filter matches every row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    terms: Vec<(String, Value)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The filter that matches every row.
    pub fn all() -> Self {
        Self::default()
    }

    /// Adds a `column == value` term.
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.terms.push((column.into(), value.into()));
        self
    }

    pub fn terms(&self) -> &[(String, Value)] {
        &self.terms
    }
}

/// Maps a typed record onto a table row.
///
/// Implementors own their table's column list so the table can be created
/// from the type alone.
pub trait Record: Sized {
    /// Table the record lives in.
    const TABLE: &'static str;

    /// Column declarations for [`Self::TABLE`].
    fn columns() -> Vec<ColumnDef>;

    /// Converts the record to a row. Unassigned generated keys are left out.
    fn to_row(&self) -> Row;

    /// Rebuilds the record from a stored row.
    fn from_row(row: &Row) -> Result<Self, StoreError>;
}

/// Identifiers are restricted to `[A-Za-z_][A-Za-z0-9_]*`.
pub(crate) fn is_valid_ident(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
