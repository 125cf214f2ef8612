//! Students command - register and look up students.
//!
//! Students are append-only; there is no edit or remove subcommand.

use anyhow::{bail, Result};
use colored::Colorize;

use super::open_catalog_store;
use crate::cli::OutputFormat;
use course_library::catalog::{Student, StudentRegistry};

/// Arguments for the students command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    courselib students add --student-id S-1001 --name Asha --year 1\n    \
    courselib students show S-1001\n    \
    courselib students list --format json")]
pub struct Args {
    #[command(subcommand)]
    pub command: StudentsCommand,
}

/// Student subcommands.
#[derive(clap::Subcommand)]
pub enum StudentsCommand {
    /// Register a student
    Add(AddArgs),

    /// Show a student by their student id
    Show {
        /// Institution-issued student id
        #[arg(value_name = "STUDENT_ID")]
        student_id: String,

        /// Output format: text (default), json
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List registered students
    List {
        /// Output format: text (default), json
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

/// Arguments for the add subcommand.
#[derive(clap::Args)]
pub struct AddArgs {
    /// Institution-issued student id
    #[arg(long, value_name = "ID")]
    pub student_id: String,

    /// Display name
    #[arg(long)]
    pub name: String,

    /// Current academic year
    #[arg(long, value_name = "N")]
    pub year: i64,
}

/// Executes the students command.
pub fn run(args: Args) -> Result<()> {
    let store = open_catalog_store()?;
    let registry = StudentRegistry::new(&store);

    match args.command {
        StudentsCommand::Add(add) => {
            if add.year < 1 {
                bail!("Academic year must be at least 1");
            }
            let student = Student::new(&add.student_id, &add.name, add.year);
            let id = registry.add_student(&student)?;
            println!(
                "{} {} ({}) as id {}",
                "Registered".green(),
                student.name,
                student.student_id.cyan(),
                id
            );
        }
        StudentsCommand::Show { student_id, format } => {
            let Some(student) = registry.get_by_student_id(&student_id)? else {
                bail!("No student found with id '{}'", student_id);
            };
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&student)?),
                OutputFormat::Text => print_student(&student),
            }
        }
        StudentsCommand::List { format } => {
            let students = registry.list_all()?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&students)?),
                OutputFormat::Text if students.is_empty() => {
                    println!("{}", "No students registered.".dimmed());
                }
                OutputFormat::Text => {
                    for student in &students {
                        print_student(student);
                    }
                }
            }
        }
    }

    Ok(())
}

fn print_student(student: &Student) {
    println!(
        "  {}  {}  {}",
        format!("{:<10}", student.student_id).cyan(),
        student.name,
        format!("year {}", student.academic_year).dimmed()
    );
}
