//! CLI commands for the course library.
//!
//! Each submodule implements a single CLI command with its argument
//! parsing and execution logic.

use anyhow::Result;
use colored::Colorize;

use course_library::catalog::CourseCatalog;
use course_library::storage::TableStore;

/// Shell completion script generation.
pub mod completions;

/// Configuration viewing and management.
pub mod config;

/// List courses, optionally for one year and semester.
pub mod courses;

/// Create the schema and seed the curriculum.
pub mod init;

/// Display a single course.
pub mod show;

/// Register and look up students.
pub mod students;

/// Inspect tables in the store.
pub mod tables;

/// Opens the default store with the catalog ready for lookups.
///
/// Creates missing tables and seeds the curriculum when the courses table
/// is empty, so a fresh store behaves like one that has been initialized.
pub(crate) fn open_catalog_store() -> Result<TableStore> {
    let store = TableStore::open_default()?;
    let catalog = CourseCatalog::new(&store);
    catalog.initialize()?;

    if catalog.count()? == 0 {
        let report = catalog.seed()?;
        if !report.is_complete() {
            eprintln!(
                "{}",
                format!(
                    "Warning: {} courses could not be seeded",
                    report.failures.len()
                )
                .yellow()
            );
        }
    }

    Ok(store)
}
