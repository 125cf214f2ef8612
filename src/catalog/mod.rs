//! Course catalog service.
//!
//! Owns the `courses` and `students` table layouts, seeds the fixed
//! curriculum, and answers the lookups the CLI needs.
//!
//! # Submodules
//!
//! - `curriculum` - the fixed course dataset
//! - `models` - course and student records
//! - `students` - append-only student registry

pub mod curriculum;
pub mod models;
pub mod students;

use std::collections::BTreeSet;

pub use curriculum::curriculum;
pub use models::{Course, Student};
pub use students::StudentRegistry;

use crate::storage::{Filter, Record, StoreError, TableStore};

/// A course that could not be inserted while seeding.
#[derive(Debug)]
pub struct SeedFailure {
    pub course: Course,
    pub error: StoreError,
}

/// Outcome of a seeding run.
///
/// Seeding is best-effort per record, so a report can hold both inserted
/// ids and failures.
#[derive(Debug, Default)]
pub struct SeedReport {
    /// Rows removed by the clear step
    pub cleared: usize,
    /// Ids assigned to inserted courses, in seeding order
    pub inserted: Vec<i64>,
    /// Courses that failed to insert
    pub failures: Vec<SeedFailure>,
}

impl SeedReport {
    /// True when every curriculum course was inserted.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Course queries over a borrowed table store.
pub struct CourseCatalog<'a> {
    store: &'a TableStore,
}

impl<'a> CourseCatalog<'a> {
    pub fn new(store: &'a TableStore) -> Self {
        Self { store }
    }

    /// Ensures the `courses` and `students` tables exist.
    pub fn initialize(&self) -> Result<(), StoreError> {
        let tables = self.store.show_tables()?;

        if !tables.iter().any(|t| t == Course::TABLE) {
            self.store.create_record_table::<Course>()?;
        }
        if !tables.iter().any(|t| t == Student::TABLE) {
            self.store.create_record_table::<Student>()?;
        }

        tracing::info!("Course database initialized");
        Ok(())
    }

    /// Replaces the contents of `courses` with the fixed curriculum.
    ///
    /// A missing `courses` table is tolerated at the clear step; the inserts
    /// that follow then fail individually and land in the report. Any other
    /// clear failure is returned.
    pub fn seed(&self) -> Result<SeedReport, StoreError> {
        let mut report = SeedReport::default();

        match self.store.delete(Course::TABLE, &Filter::all()) {
            Ok(cleared) => report.cleared = cleared,
            Err(e) if e.is_unknown_table() => {
                tracing::debug!("No courses table to clear yet");
            }
            Err(e) => return Err(e),
        }

        for course in curriculum() {
            match self.store.insert_record(&course) {
                Ok(id) => report.inserted.push(id),
                Err(error) => {
                    tracing::warn!("Error inserting course {}: {}", course.name, error);
                    report.failures.push(SeedFailure { course, error });
                }
            }
        }

        tracing::info!(
            "Course data populated: {} inserted, {} failed",
            report.inserted.len(),
            report.failures.len()
        );
        Ok(report)
    }

    /// Every course, in insertion order
    pub fn list_all(&self) -> Result<Vec<Course>, StoreError> {
        self.store.select_records(&Filter::all())
    }

    /// Courses taught in one year and semester
    pub fn list_by_year_semester(&self, year: i64, semester: i64) -> Result<Vec<Course>, StoreError> {
        self.store
            .select_records(&Filter::new().eq("year", year).eq("semester", semester))
    }

    pub fn get_by_id(&self, id: i64) -> Result<Option<Course>, StoreError> {
        self.store.find_record(&Filter::new().eq("id", id))
    }

    /// First course with this code. Codes are not unique-checked, so later
    /// duplicates are shadowed.
    pub fn get_by_code(&self, code: &str) -> Result<Option<Course>, StoreError> {
        self.store.find_record(&Filter::new().eq("code", code))
    }

    /// Distinct semesters that have courses in a year, ascending.
    pub fn semesters(&self, year: i64) -> Result<Vec<i64>, StoreError> {
        let courses: Vec<Course> = self.store.select_records(&Filter::new().eq("year", year))?;
        let semesters: BTreeSet<i64> = courses.iter().map(|c| c.semester).collect();
        Ok(semesters.into_iter().collect())
    }

    /// Number of stored courses
    pub fn count(&self) -> Result<usize, StoreError> {
        self.store.count(Course::TABLE)
    }
}

/// Creates the schema and seeds the curriculum.
///
/// Meant to run once at startup, before any lookups.
pub fn init(store: &TableStore) -> Result<SeedReport, StoreError> {
    let catalog = CourseCatalog::new(store);
    catalog.initialize()?;
    catalog.seed()
}
