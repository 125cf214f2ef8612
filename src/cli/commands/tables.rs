//! Tables command - inspect the table store.
//!
//! Lists every table with its row count and declared columns. Does not
//! create or seed anything.

use anyhow::Result;
use colored::Colorize;

use course_library::storage::TableStore;

/// Arguments for the tables command.
#[derive(clap::Args)]
pub struct Args {
    /// Hide column declarations
    #[arg(long)]
    pub names_only: bool,
}

/// Executes the tables command.
pub fn run(args: Args) -> Result<()> {
    let store = TableStore::open_default()?;
    let tables = store.show_tables()?;

    if tables.is_empty() {
        println!("{}", "No tables yet.".dimmed());
        println!();
        println!("Run 'courselib init' to create the course tables.");
        return Ok(());
    }

    for name in &tables {
        let count = store.count(name)?;
        println!(
            "{}  {}",
            name.bold(),
            format!("{} {}", count, if count == 1 { "row" } else { "rows" }).dimmed()
        );

        if args.names_only {
            continue;
        }

        let schema = store.schema(name)?;
        for column in &schema.columns {
            println!(
                "  {}  {}  {}",
                format!("{:<14}", column.name).cyan(),
                format!("{:<8}", column.column_type.to_string()),
                column.constraint_summary().dimmed()
            );
        }
    }

    Ok(())
}
