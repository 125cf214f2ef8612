//! Course and student records.
//!
//! Both are stored through the generic table store; the [`Record`] impls
//! here own the column layout of their tables.

use serde::{Deserialize, Serialize};

use crate::storage::{ColumnDef, Record, Row, StoreError};

/// A course offered in a given academic year and semester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Store-assigned id (None until inserted)
    pub id: Option<i64>,

    /// Display name (e.g., "Data Structure")
    pub name: String,

    /// Short course code (e.g., "DS"); expected but not enforced to be unique
    pub code: String,

    /// Academic year, starting at 1
    pub year: i64,

    /// Semester within the year, starting at 1
    pub semester: i64,

    /// One-line description
    pub description: Option<String>,

    /// Serialized resource list, opaque to the library
    pub resources: Option<String>,
}

impl Course {
    /// Creates an unsaved course without resources.
    pub fn new(name: &str, code: &str, year: i64, semester: i64, description: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            code: code.to_string(),
            year,
            semester,
            description: Some(description.to_string()),
            resources: None,
        }
    }
}

impl Record for Course {
    const TABLE: &'static str = "courses";

    fn columns() -> Vec<ColumnDef> {
        vec![
            ColumnDef::integer("id").primary_key().auto_increment(),
            ColumnDef::text("name").not_null(),
            ColumnDef::text("code").not_null(),
            ColumnDef::integer("year").not_null(),
            ColumnDef::integer("semester").not_null(),
            ColumnDef::text("description"),
            ColumnDef::text("resources"),
        ]
    }

    fn to_row(&self) -> Row {
        let mut row = Row::new()
            .with("name", self.name.as_str())
            .with("code", self.code.as_str())
            .with("year", self.year)
            .with("semester", self.semester)
            .with("description", self.description.clone())
            .with("resources", self.resources.clone());
        if let Some(id) = self.id {
            row.set("id", id);
        }
        row
    }

    fn from_row(row: &Row) -> Result<Self, StoreError> {
        Ok(Self {
            id: row.optional_integer("id")?,
            name: row.text("name")?,
            code: row.text("code")?,
            year: row.integer("year")?,
            semester: row.integer("semester")?,
            description: row.optional_text("description")?,
            resources: row.optional_text("resources")?,
        })
    }
}

/// A registered student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Store-assigned id (None until inserted)
    pub id: Option<i64>,

    /// Institution-issued student identifier
    pub student_id: String,

    /// Display name
    pub name: String,

    /// Current academic year
    pub academic_year: i64,
}

impl Student {
    pub fn new(student_id: &str, name: &str, academic_year: i64) -> Self {
        Self {
            id: None,
            student_id: student_id.to_string(),
            name: name.to_string(),
            academic_year,
        }
    }
}

impl Record for Student {
    const TABLE: &'static str = "students";

    fn columns() -> Vec<ColumnDef> {
        vec![
            ColumnDef::integer("id").primary_key().auto_increment(),
            ColumnDef::text("student_id").not_null(),
            ColumnDef::text("name").not_null(),
            ColumnDef::integer("academic_year").not_null(),
        ]
    }

    fn to_row(&self) -> Row {
        let mut row = Row::new()
            .with("student_id", self.student_id.as_str())
            .with("name", self.name.as_str())
            .with("academic_year", self.academic_year);
        if let Some(id) = self.id {
            row.set("id", id);
        }
        row
    }

    fn from_row(row: &Row) -> Result<Self, StoreError> {
        Ok(Self {
            id: row.optional_integer("id")?,
            student_id: row.text("student_id")?,
            name: row.text("name")?,
            academic_year: row.integer("academic_year")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{TableSchema, Value};

    #[test]
    fn test_course_row_skips_unassigned_id() {
        let course = Course::new("Operating System", "OS", 2, 2, "Operating system concepts and design");
        let row = course.to_row();

        assert!(row.get("id").is_none(), "Unsaved course should not carry an id");
        assert_eq!(row.get("resources"), Some(&Value::Null));

        let schema = TableSchema::new(Course::TABLE, Course::columns()).unwrap();
        assert!(schema.validate_row(&row).is_ok());
    }

    #[test]
    fn test_course_from_row() {
        let row = Row::new()
            .with("id", 4)
            .with("name", "Vedic Math")
            .with("code", "VMATH")
            .with("year", 1)
            .with("semester", 1)
            .with("description", Value::Null)
            .with("resources", r#"[{"title":"notes.pdf"}]"#);

        let course = Course::from_row(&row).expect("Row should decode");
        assert_eq!(course.id, Some(4));
        assert_eq!(course.code, "VMATH");
        assert_eq!(course.description, None);
        assert_eq!(course.resources.as_deref(), Some(r#"[{"title":"notes.pdf"}]"#));
    }

    #[test]
    fn test_course_from_row_missing_column() {
        let row = Row::new().with("name", "Vedic Math");
        assert!(matches!(
            Course::from_row(&row),
            Err(StoreError::MissingValue(column)) if column == "code"
        ));
    }

    #[test]
    fn test_student_row() {
        let student = Student::new("S-1001", "Asha", 2);
        let row = student.to_row();

        assert_eq!(row.iter().count(), 3);
        assert!(row.get("id").is_none(), "Unassigned id should be left out");
        assert_eq!(row.get("academic_year"), Some(&Value::Integer(2)));

        let schema = TableSchema::new(Student::TABLE, Student::columns()).unwrap();
        assert!(schema.validate_row(&row).is_ok());
    }
}
