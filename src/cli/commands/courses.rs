//! Courses command - list courses by academic year and semester.
//!
//! With no arguments every course is listed, grouped by year and
//! semester. Choosing a year without a semester shows that year's first
//! semester.

use anyhow::Result;
use colored::Colorize;

use super::open_catalog_store;
use crate::cli::OutputFormat;
use course_library::catalog::{Course, CourseCatalog};

/// Arguments for the courses command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    courselib courses                       List the whole curriculum\n    \
    courselib courses --year 1              First semester of year 1\n    \
    courselib courses --year 2 --semester 2 Year 2, semester 2\n    \
    courselib courses --format json         Output as JSON")]
pub struct Args {
    /// Academic year to show
    #[arg(short, long, value_name = "N")]
    pub year: Option<i64>,

    /// Semester within the year (defaults to the first one with courses)
    #[arg(short, long, value_name = "N", requires = "year")]
    pub semester: Option<i64>,

    /// Output format: text (default), json
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Executes the courses command.
pub fn run(args: Args) -> Result<()> {
    let store = open_catalog_store()?;
    let catalog = CourseCatalog::new(&store);

    let (heading, courses) = match args.year {
        Some(year) => {
            let semester = match args.semester {
                Some(semester) => Some(semester),
                None => catalog.semesters(year)?.first().copied(),
            };
            match semester {
                Some(semester) => (
                    Some(format!("Year {year}, Semester {semester}")),
                    catalog.list_by_year_semester(year, semester)?,
                ),
                None => (Some(format!("Year {year}")), Vec::new()),
            }
        }
        None => (None, catalog.list_all()?),
    };

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&courses)?);
        }
        OutputFormat::Text => print_courses(heading.as_deref(), &courses),
    }

    Ok(())
}

fn print_courses(heading: Option<&str>, courses: &[Course]) {
    if courses.is_empty() {
        println!("{}", "No courses found.".dimmed());
        return;
    }

    if let Some(heading) = heading {
        println!("{}", heading.bold());
        for course in courses {
            print_course_line(course);
        }
        return;
    }

    let mut current = None;
    for course in courses {
        if current != Some((course.year, course.semester)) {
            if current.is_some() {
                println!();
            }
            println!(
                "{}",
                format!("Year {}, Semester {}", course.year, course.semester).bold()
            );
            current = Some((course.year, course.semester));
        }
        print_course_line(course);
    }
}

fn print_course_line(course: &Course) {
    println!(
        "  {} {}  {}",
        format!("{:<8}", course.code).cyan(),
        course.name,
        course.description.as_deref().unwrap_or("").dimmed()
    );
}
