//! Show command - display a single course.
//!
//! Looks a course up by code or by id. Codes are not unique-checked, so a
//! code lookup shows the first matching course.

use anyhow::{bail, Result};
use colored::Colorize;

use super::open_catalog_store;
use crate::cli::OutputFormat;
use course_library::catalog::{Course, CourseCatalog};

/// Arguments for the show command.
#[derive(clap::Args)]
#[command(group(
    clap::ArgGroup::new("target")
        .required(true)
        .args(["code", "id"])
))]
#[command(after_help = "EXAMPLES:\n    \
    courselib show CLANG            Show the C Language course\n    \
    courselib show --id 9           Show the course with id 9\n    \
    courselib show DS -f json       Output as JSON")]
pub struct Args {
    /// Course code (e.g., DBMS)
    #[arg(value_name = "CODE")]
    pub code: Option<String>,

    /// Look the course up by id instead of code
    #[arg(long, value_name = "ID")]
    pub id: Option<i64>,

    /// Output format: text (default), json
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Executes the show command.
pub fn run(args: Args) -> Result<()> {
    let store = open_catalog_store()?;
    let catalog = CourseCatalog::new(&store);

    let course = match (&args.code, args.id) {
        (_, Some(id)) => catalog.get_by_id(id)?,
        (Some(code), None) => catalog.get_by_code(code)?,
        (None, None) => None,
    };

    let Some(course) = course else {
        let target = match (&args.code, args.id) {
            (_, Some(id)) => format!("id {id}"),
            (Some(code), None) => format!("code '{code}'"),
            (None, None) => "that target".to_string(),
        };
        bail!("No course found with {}", target);
    };

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&course)?),
        OutputFormat::Text => print_course(&course),
    }

    Ok(())
}

fn print_course(course: &Course) {
    println!("{}  {}", course.code.cyan().bold(), course.name.bold());
    println!();
    if let Some(id) = course.id {
        println!("  {}        {}", "Id:".dimmed(), id);
    }
    println!("  {}      {}", "Year:".dimmed(), course.year);
    println!("  {}  {}", "Semester:".dimmed(), course.semester);
    if let Some(description) = &course.description {
        println!("  {}     {}", "About:".dimmed(), description);
    }
    match &course.resources {
        Some(resources) => println!("  {} {}", "Resources:".dimmed(), resources),
        None => println!("  {} {}", "Resources:".dimmed(), "none yet".dimmed()),
    }
}
