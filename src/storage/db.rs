//! SQLite-backed table store.
//!
//! Every table the caller declares becomes a real SQLite table. Declared
//! schemas are kept in a bookkeeping table so a reopened store file still
//! knows its tables and validates rows against them.
//!
//! Table names are case-insensitive, as they are in SQLite: `Courses` and
//! `courses` name the same table. Row and filter keys must use a column's
//! declared spelling.

use std::path::Path;

use anyhow::Context;
use rusqlite::types::{Type, ValueRef};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use super::error::StoreError;
use super::schema::{quote_ident, ColumnDef, Filter, Record, Row, TableSchema, Value};
use crate::config::Config;

/// Bookkeeping table holding one row per declared table.
const SCHEMA_TABLE: &str = "__tables";

/// A collection of named tables with declared column schemas.
///
/// Operations run to completion on the calling thread. The store owns its
/// connection; services borrow the store.
pub struct TableStore {
    conn: Connection,
}

impl TableStore {
    /// Open or create a store file
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// Open a store that lives only as long as this value
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    /// Open the store at the configured database path
    pub fn open_default() -> anyhow::Result<Self> {
        let path = Config::load()?.database_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        Self::open(&path).with_context(|| format!("Failed to open store at {}", path.display()))
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Create the bookkeeping table
    fn migrate(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {SCHEMA_TABLE} (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                columns TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#
        ))?;
        Ok(())
    }

    // ==================== Tables ====================

    /// Register a new table.
    ///
    /// Returns `false` without touching anything when a table with this name
    /// already exists, in any letter case, even if the requested columns differ.
    pub fn create_table(&self, name: &str, columns: Vec<ColumnDef>) -> Result<bool, StoreError> {
        let schema = TableSchema::new(name, columns)?;
        if self.has_table(name)? {
            tracing::debug!("Table {} already exists, skipping create", name);
            return Ok(false);
        }

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(&schema.create_sql(), [])?;
        tx.execute(
            &format!("INSERT INTO {SCHEMA_TABLE} (name, columns) VALUES (?1, ?2)"),
            params![schema.name, serde_json::to_string(&schema.columns)?],
        )?;
        tx.commit()?;

        tracing::debug!("Created table {} with {} columns", name, schema.columns.len());
        Ok(true)
    }

    /// Create the table backing a record type
    pub fn create_record_table<R: Record>(&self) -> Result<bool, StoreError> {
        self.create_table(R::TABLE, R::columns())
    }

    /// Names of all tables, in creation order
    pub fn show_tables(&self) -> Result<Vec<String>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT name FROM {SCHEMA_TABLE} ORDER BY seq"))?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        Ok(rows.collect::<Result<Vec<String>, _>>()?)
    }

    /// Check whether a table exists
    pub fn has_table(&self, name: &str) -> Result<bool, StoreError> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {SCHEMA_TABLE} WHERE name = ?1 COLLATE NOCASE"),
            params![name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Get the declared schema of a table, under the name it was created with
    pub fn schema(&self, name: &str) -> Result<TableSchema, StoreError> {
        let stored: Option<(String, String)> = self
            .conn
            .query_row(
                &format!("SELECT name, columns FROM {SCHEMA_TABLE} WHERE name = ?1 COLLATE NOCASE"),
                params![name],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let (name, columns) = stored.ok_or_else(|| StoreError::UnknownTable(name.to_string()))?;
        Ok(TableSchema {
            name,
            columns: serde_json::from_str(&columns)?,
        })
    }

    // ==================== Rows ====================

    /// Append a row and return its assigned row id.
    ///
    /// For tables with an auto-increment key the returned id is the key value.
    pub fn insert(&self, table: &str, row: &Row) -> Result<i64, StoreError> {
        let schema = self.schema(table)?;
        schema.validate_row(row)?;

        let present: Vec<(&ColumnDef, &Value)> = schema
            .columns
            .iter()
            .filter_map(|c| row.get(&c.name).map(|v| (c, v)))
            .collect();

        let sql = if present.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES", quote_ident(&schema.name))
        } else {
            let names: Vec<String> = present.iter().map(|(c, _)| quote_ident(&c.name)).collect();
            let placeholders: Vec<String> = (1..=present.len()).map(|i| format!("?{i}")).collect();
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                quote_ident(&schema.name),
                names.join(", "),
                placeholders.join(", ")
            )
        };

        self.conn
            .execute(&sql, params_from_iter(present.iter().map(|(_, v)| *v)))?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Rows matching every term of the filter, in insertion order.
    ///
    /// An empty filter returns the whole table.
    pub fn select(&self, table: &str, filter: &Filter) -> Result<Vec<Row>, StoreError> {
        let schema = self.schema(table)?;
        let Some(where_sql) = where_clause(&schema, filter)? else {
            return Ok(Vec::new());
        };

        let names: Vec<String> = schema.columns.iter().map(|c| quote_ident(&c.name)).collect();
        let sql = format!(
            "SELECT {} FROM {}{} ORDER BY rowid",
            names.join(", "),
            quote_ident(&schema.name),
            where_sql
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(filter.terms().iter().map(|(_, v)| v)), |row| {
            read_row(&schema, row)
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Remove rows matching the filter and return how many went.
    ///
    /// An empty filter truncates the table. Generated keys are never reused.
    pub fn delete(&self, table: &str, filter: &Filter) -> Result<usize, StoreError> {
        let schema = self.schema(table)?;
        let Some(where_sql) = where_clause(&schema, filter)? else {
            return Ok(0);
        };

        let removed = self.conn.execute(
            &format!("DELETE FROM {}{}", quote_ident(&schema.name), where_sql),
            params_from_iter(filter.terms().iter().map(|(_, v)| v)),
        )?;

        tracing::debug!("Deleted {} rows from {}", removed, schema.name);
        Ok(removed)
    }

    /// Get the number of rows in a table
    pub fn count(&self, table: &str) -> Result<usize, StoreError> {
        let schema = self.schema(table)?;
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", quote_ident(&schema.name)),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    // ==================== Records ====================

    /// Insert a typed record into its table
    pub fn insert_record<R: Record>(&self, record: &R) -> Result<i64, StoreError> {
        self.insert(R::TABLE, &record.to_row())
    }

    /// Select typed records from their table
    pub fn select_records<R: Record>(&self, filter: &Filter) -> Result<Vec<R>, StoreError> {
        self.select(R::TABLE, filter)?
            .iter()
            .map(R::from_row)
            .collect()
    }

    /// First record matching the filter, in insertion order
    pub fn find_record<R: Record>(&self, filter: &Filter) -> Result<Option<R>, StoreError> {
        Ok(self.select_records(filter)?.into_iter().next())
    }
}

/// Builds the `WHERE` clause for a filter.
///
/// Returns `None` when a term can never match because its value is of a
/// different kind than the column.
fn where_clause(schema: &TableSchema, filter: &Filter) -> Result<Option<String>, StoreError> {
    let mut columns = Vec::with_capacity(filter.terms().len());
    for (name, _) in filter.terms() {
        let column = schema.column(name).ok_or_else(|| StoreError::UnknownColumn {
            table: schema.name.clone(),
            column: name.clone(),
        })?;
        columns.push(column);
    }

    if filter
        .terms()
        .iter()
        .zip(&columns)
        .any(|((_, value), column)| !column.column_type.admits(value))
    {
        return Ok(None);
    }

    if columns.is_empty() {
        return Ok(Some(String::new()));
    }

    let terms: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{} IS ?{}", quote_ident(&c.name), i + 1))
        .collect();
    Ok(Some(format!(" WHERE {}", terms.join(" AND "))))
}

fn read_row(schema: &TableSchema, row: &rusqlite::Row) -> rusqlite::Result<Row> {
    let mut out = Row::new();
    for (i, column) in schema.columns.iter().enumerate() {
        let value = match row.get_ref(i)? {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(n) => Value::Integer(n),
            ValueRef::Text(bytes) => match std::str::from_utf8(bytes) {
                Ok(text) => Value::Text(text.to_string()),
                Err(e) => {
                    return Err(rusqlite::Error::FromSqlConversionFailure(
                        i,
                        Type::Text,
                        Box::new(e),
                    ))
                }
            },
            other => {
                return Err(rusqlite::Error::InvalidColumnType(
                    i,
                    column.name.clone(),
                    other.data_type(),
                ))
            }
        };
        out.set(column.name.clone(), value);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn create_test_store() -> TableStore {
        TableStore::open_in_memory().expect("Failed to open in-memory store")
    }

    fn course_columns() -> Vec<ColumnDef> {
        vec![
            ColumnDef::integer("id").primary_key().auto_increment(),
            ColumnDef::text("name").not_null(),
            ColumnDef::text("code").not_null(),
            ColumnDef::integer("year").not_null(),
            ColumnDef::integer("semester").not_null(),
            ColumnDef::text("description"),
        ]
    }

    fn course_row(code: &str, year: i64, semester: i64) -> Row {
        Row::new()
            .with("name", format!("Course {code}"))
            .with("code", code)
            .with("year", year)
            .with("semester", semester)
    }

    // ==================== Table Tests ====================

    #[test]
    fn test_create_table_is_idempotent() {
        let store = create_test_store();

        let created = store
            .create_table("courses", course_columns())
            .expect("Failed to create table");
        assert!(created, "First create should register the table");
        assert_eq!(store.show_tables().unwrap(), vec!["courses".to_string()]);

        let again = store
            .create_table("courses", vec![ColumnDef::text("other")])
            .expect("Second create should not fail");
        assert!(!again, "Second create should be a no-op");

        let schema = store.schema("courses").unwrap();
        assert_eq!(schema.columns, course_columns(), "Original schema should be kept");
    }

    #[test]
    fn test_show_tables_in_creation_order() {
        let store = create_test_store();
        store.create_table("students", vec![ColumnDef::text("name")]).unwrap();
        store.create_table("courses", course_columns()).unwrap();

        assert_eq!(
            store.show_tables().unwrap(),
            vec!["students".to_string(), "courses".to_string()]
        );
        assert!(store.has_table("courses").unwrap());
        assert!(!store.has_table("teachers").unwrap());
    }

    #[test]
    fn test_table_names_ignore_case() {
        let store = create_test_store();
        assert!(store.create_table("courses", course_columns()).unwrap());

        let again = store
            .create_table("Courses", course_columns())
            .expect("Differently cased create should not fail");
        assert!(!again, "Courses and courses should be the same table");
        assert_eq!(store.show_tables().unwrap(), vec!["courses".to_string()]);

        assert!(store.has_table("COURSES").unwrap());
        assert_eq!(store.schema("COURSES").unwrap().name, "courses");

        store.insert("Courses", &course_row("A", 1, 1)).unwrap();
        assert_eq!(store.count("courses").unwrap(), 1);
        assert_eq!(store.select("COURSES", &Filter::all()).unwrap().len(), 1);
    }

    #[test]
    fn test_create_table_rejects_columns_differing_in_case() {
        let store = create_test_store();
        let result = store.create_table(
            "courses",
            vec![ColumnDef::text("Code"), ColumnDef::text("code")],
        );
        assert!(matches!(result, Err(StoreError::InvalidSchema { .. })));
        assert!(!store.has_table("courses").unwrap());
    }

    #[test]
    fn test_create_table_rejects_rowid_column() {
        let store = create_test_store();
        let result = store.create_table("t", vec![ColumnDef::text("RowId")]);
        assert!(matches!(result, Err(StoreError::InvalidSchema { .. })));
        assert!(!store.has_table("t").unwrap());
    }

    #[test]
    fn test_schema_unknown_table() {
        let store = create_test_store();
        assert!(matches!(
            store.schema("courses"),
            Err(StoreError::UnknownTable(name)) if name == "courses"
        ));
    }

    // ==================== Insert Tests ====================

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let store = create_test_store();
        store.create_table("courses", course_columns()).unwrap();

        let ids: Vec<i64> = ["A", "B", "C"]
            .iter()
            .map(|code| store.insert("courses", &course_row(code, 1, 1)).unwrap())
            .collect();

        assert_eq!(ids, vec![1, 2, 3], "Ids should start at 1 and increase");

        let rows = store.select("courses", &Filter::all()).unwrap();
        let stored: Vec<i64> = rows.iter().map(|r| r.integer("id").unwrap()).collect();
        assert_eq!(stored, ids);
    }

    #[test]
    fn test_ids_not_reused_after_truncate() {
        let store = create_test_store();
        store.create_table("courses", course_columns()).unwrap();

        store.insert("courses", &course_row("A", 1, 1)).unwrap();
        store.insert("courses", &course_row("B", 1, 1)).unwrap();
        store.delete("courses", &Filter::all()).unwrap();

        let id = store.insert("courses", &course_row("C", 1, 1)).unwrap();
        assert_eq!(id, 3, "Truncate should not reset the id counter");
    }

    #[test]
    fn test_insert_into_unknown_table_fails() {
        let store = create_test_store();

        let result = store.insert("courses", &course_row("CLANG", 1, 1));
        assert!(matches!(result, Err(StoreError::UnknownTable(_))));
        assert!(
            !store.has_table("courses").unwrap(),
            "Insert must not create the table"
        );
    }

    #[test]
    fn test_insert_rejects_invalid_row() {
        let store = create_test_store();
        store.create_table("courses", course_columns()).unwrap();

        let missing = Row::new().with("code", "X").with("year", 1).with("semester", 1);
        assert!(matches!(
            store.insert("courses", &missing),
            Err(StoreError::MissingValue(column)) if column == "name"
        ));
        assert_eq!(store.count("courses").unwrap(), 0);
    }

    #[test]
    fn test_insert_with_not_null_generated_key() {
        let store = create_test_store();
        store
            .create_table(
                "tags",
                vec![
                    ColumnDef::integer("id").primary_key().auto_increment().not_null(),
                    ColumnDef::text("label"),
                ],
            )
            .unwrap();

        assert_eq!(store.insert("tags", &Row::new().with("label", "a")).unwrap(), 1);
        assert_eq!(store.insert("tags", &Row::new().with("label", "b")).unwrap(), 2);
    }

    #[test]
    fn test_insert_without_generated_key_returns_rowid() {
        let store = create_test_store();
        store
            .create_table(
                "tags",
                vec![ColumnDef::text("label").primary_key(), ColumnDef::integer("weight")],
            )
            .unwrap();

        let first = store.insert("tags", &Row::new().with("label", "a")).unwrap();
        let second = store
            .insert("tags", &Row::new().with("label", "b").with("weight", 2))
            .unwrap();
        assert!(second > first);

        let rows = store.select("tags", &Filter::all()).unwrap();
        assert_eq!(rows[0].get("weight"), Some(&Value::Null));
    }

    // ==================== Select Tests ====================

    #[test]
    fn test_select_with_filter() {
        let store = create_test_store();
        store.create_table("courses", course_columns()).unwrap();

        store.insert("courses", &course_row("A", 1, 1)).unwrap();
        store.insert("courses", &course_row("B", 1, 2)).unwrap();
        store.insert("courses", &course_row("C", 1, 1)).unwrap();
        store.insert("courses", &course_row("D", 2, 1)).unwrap();

        let rows = store
            .select("courses", &Filter::new().eq("year", 1).eq("semester", 1))
            .unwrap();
        let codes: Vec<String> = rows.iter().map(|r| r.text("code").unwrap()).collect();
        assert_eq!(codes, vec!["A", "C"], "Should keep insertion order");

        let all = store.select("courses", &Filter::all()).unwrap();
        assert_eq!(all.len(), 4);
    }

    #[test]
    fn test_select_type_mismatch_matches_nothing() {
        let store = create_test_store();
        store.create_table("courses", course_columns()).unwrap();
        store.insert("courses", &course_row("A", 1, 1)).unwrap();

        let rows = store.select("courses", &Filter::new().eq("year", "1")).unwrap();
        assert!(rows.is_empty(), "Text '1' should not equal integer 1");
    }

    #[test]
    fn test_select_null_filter_matches_null_cells() {
        let store = create_test_store();
        store.create_table("courses", course_columns()).unwrap();
        store.insert("courses", &course_row("A", 1, 1)).unwrap();
        store
            .insert("courses", &course_row("B", 1, 1).with("description", "has one"))
            .unwrap();

        let rows = store
            .select("courses", &Filter::new().eq("description", Value::Null))
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text("code").unwrap(), "A");
    }

    #[test]
    fn test_select_unknown_column_fails() {
        let store = create_test_store();
        store.create_table("courses", course_columns()).unwrap();

        let result = store.select("courses", &Filter::new().eq("teacher", "x"));
        assert!(matches!(result, Err(StoreError::UnknownColumn { .. })));
    }

    #[test]
    fn test_select_rejects_invalid_utf8_text() {
        let store = create_test_store();
        store.create_table("notes", vec![ColumnDef::text("body")]).unwrap();
        store
            .conn
            .execute("INSERT INTO notes (body) VALUES (CAST(x'ff' AS TEXT))", [])
            .unwrap();

        let result = store.select("notes", &Filter::all());
        assert!(matches!(
            result,
            Err(StoreError::Sqlite(rusqlite::Error::FromSqlConversionFailure(0, Type::Text, _)))
        ));
    }

    #[test]
    fn test_select_unknown_table_fails() {
        let store = create_test_store();
        let result = store.select("courses", &Filter::all());
        assert!(matches!(result, Err(StoreError::UnknownTable(_))));
    }

    // ==================== Delete Tests ====================

    #[test]
    fn test_delete_with_filter() {
        let store = create_test_store();
        store.create_table("courses", course_columns()).unwrap();
        store.insert("courses", &course_row("A", 1, 1)).unwrap();
        store.insert("courses", &course_row("B", 2, 1)).unwrap();
        store.insert("courses", &course_row("C", 2, 2)).unwrap();

        let removed = store.delete("courses", &Filter::new().eq("year", 2)).unwrap();
        assert_eq!(removed, 2);

        let rows = store.select("courses", &Filter::all()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text("code").unwrap(), "A");
    }

    #[test]
    fn test_delete_empty_filter_truncates() {
        let store = create_test_store();
        store.create_table("courses", course_columns()).unwrap();
        store.insert("courses", &course_row("A", 1, 1)).unwrap();
        store.insert("courses", &course_row("B", 1, 1)).unwrap();

        let removed = store.delete("courses", &Filter::all()).unwrap();
        assert_eq!(removed, 2);
        assert!(store.select("courses", &Filter::all()).unwrap().is_empty());
    }

    #[test]
    fn test_delete_unknown_table_fails() {
        let store = create_test_store();
        let result = store.delete("courses", &Filter::all());
        assert!(matches!(result, Err(StoreError::UnknownTable(_))));
    }

    // ==================== Persistence Tests ====================

    #[test]
    fn test_reopen_keeps_tables_and_rows() {
        let dir = tempdir().expect("Failed to create temp directory");
        let path = dir.path().join("library.db");

        {
            let store = TableStore::open(&path).expect("Failed to open store");
            store.create_table("courses", course_columns()).unwrap();
            store.insert("courses", &course_row("OS", 2, 2)).unwrap();
        }

        assert!(path.exists(), "Store file should exist after close");

        let store = TableStore::open(&path).expect("Failed to reopen store");
        assert_eq!(store.show_tables().unwrap(), vec!["courses".to_string()]);
        assert_eq!(store.schema("courses").unwrap().columns, course_columns());

        let next = store.insert("courses", &course_row("PROB", 2, 2)).unwrap();
        assert_eq!(next, 2, "Id counter should survive reopen");
        assert_eq!(store.count("courses").unwrap(), 2);
    }
}
