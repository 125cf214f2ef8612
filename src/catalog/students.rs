//! Student registry.
//!
//! Students are append-only: there is no update or delete.

use super::models::Student;
use crate::storage::{Filter, StoreError, TableStore};

/// Student records over a borrowed table store.
pub struct StudentRegistry<'a> {
    store: &'a TableStore,
}

impl<'a> StudentRegistry<'a> {
    pub fn new(store: &'a TableStore) -> Self {
        Self { store }
    }

    /// Registers a student and returns the assigned id.
    pub fn add_student(&self, student: &Student) -> Result<i64, StoreError> {
        let id = self.store.insert_record(student)?;
        tracing::debug!("Registered student {} as id {}", student.student_id, id);
        Ok(id)
    }

    /// First student with this external id, if any.
    pub fn get_by_student_id(&self, student_id: &str) -> Result<Option<Student>, StoreError> {
        self.store
            .find_record(&Filter::new().eq("student_id", student_id))
    }

    /// All students in registration order
    pub fn list_all(&self) -> Result<Vec<Student>, StoreError> {
        self.store.select_records(&Filter::all())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CourseCatalog;

    fn create_test_store() -> TableStore {
        let store = TableStore::open_in_memory().expect("Failed to open in-memory store");
        CourseCatalog::new(&store)
            .initialize()
            .expect("Failed to initialize tables");
        store
    }

    #[test]
    fn test_add_and_get_student() {
        let store = create_test_store();
        let registry = StudentRegistry::new(&store);

        let id = registry
            .add_student(&Student::new("S-1001", "Asha", 1))
            .expect("Failed to add student");
        assert_eq!(id, 1);

        let student = registry
            .get_by_student_id("S-1001")
            .expect("Lookup failed")
            .expect("Student should exist");
        assert_eq!(student.id, Some(1));
        assert_eq!(student.name, "Asha");
        assert_eq!(student.academic_year, 1);

        assert!(registry.get_by_student_id("S-9999").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_student_id_returns_first() {
        let store = create_test_store();
        let registry = StudentRegistry::new(&store);

        let first = registry.add_student(&Student::new("S-1", "First", 1)).unwrap();
        let second = registry.add_student(&Student::new("S-1", "Second", 2)).unwrap();
        assert!(second > first);

        let found = registry.get_by_student_id("S-1").unwrap().unwrap();
        assert_eq!(found.name, "First");
        assert_eq!(registry.list_all().unwrap().len(), 2);
    }

    #[test]
    fn test_add_student_without_table_fails() {
        let store = TableStore::open_in_memory().unwrap();
        let registry = StudentRegistry::new(&store);

        let result = registry.add_student(&Student::new("S-1", "Asha", 1));
        assert!(matches!(result, Err(StoreError::UnknownTable(_))));
    }
}
