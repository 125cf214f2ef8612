//! Init command - create the schema and seed the curriculum.
//!
//! Runs the same startup sequence the catalog uses on first access, but
//! always reseeds so the courses table matches the fixed curriculum.

use anyhow::Result;
use colored::Colorize;

use course_library::catalog::{self, CourseCatalog};
use course_library::config::Config;
use course_library::storage::TableStore;

/// Arguments for the init command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    courselib init                  Create tables and (re)seed courses\n    \
    courselib init --schema-only    Only create missing tables")]
pub struct Args {
    /// Only create missing tables, leave course rows untouched
    #[arg(long)]
    pub schema_only: bool,
}

/// Executes the init command.
pub fn run(args: Args) -> Result<()> {
    let db_path = Config::load()?.database_path()?;
    let store = TableStore::open_default()?;

    if args.schema_only {
        CourseCatalog::new(&store).initialize()?;
        println!("{} Tables ready", "Done.".green().bold());
        println!("  {} {}", "Database:".dimmed(), db_path.display());
        return Ok(());
    }

    let report = catalog::init(&store)?;

    println!("{} Course library initialized", "Done.".green().bold());
    println!("  {} {}", "Database:".dimmed(), db_path.display());
    if report.cleared > 0 {
        println!("  {}  {}", "Cleared:".dimmed(), report.cleared);
    }
    println!("  {} {}", "Inserted:".dimmed(), report.inserted.len());

    if !report.is_complete() {
        println!();
        println!(
            "{}",
            format!("{} courses failed to insert:", report.failures.len()).yellow()
        );
        for failure in &report.failures {
            println!(
                "  {}  {}",
                failure.course.code.cyan(),
                failure.error.to_string().dimmed()
            );
        }
    }

    Ok(())
}
