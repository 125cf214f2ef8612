use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;

use cli::commands;
use course_library::config::Config;

/// The main CLI command line interface.
#[derive(Parser)]
#[command(name = "courselib")]
#[command(version)]
#[command(about = "Course resource library - browse the curriculum by year and semester")]
#[command(long_about = "Keeps the course curriculum and registered students in a small\n\
    table store and lets you browse courses by academic year and semester.")]
#[command(after_help = "EXAMPLES:\n    \
    courselib init                  Create tables and seed the curriculum\n    \
    courselib courses --year 1      Courses for year 1, first semester\n    \
    courselib show DBMS             View one course\n    \
    courselib students show S-1001  Look up a student\n    \
    courselib tables                Inspect the store\n\n\
    For more information about a command, run 'courselib <command> --help'.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available CLI subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Create the tables and seed the course curriculum
    #[command(long_about = "Creates the courses and students tables if they are missing,\n\
        then clears the courses table and inserts the fixed curriculum.\n\
        Running it again never duplicates courses.")]
    Init(commands::init::Args),

    /// List courses, optionally for one year and semester
    #[command(long_about = "Lists the curriculum grouped by year and semester. With --year\n\
        only, the first semester of that year is shown.")]
    Courses(commands::courses::Args),

    /// Show a single course by code or id
    Show(commands::show::Args),

    /// Register and look up students
    Students(commands::students::Args),

    /// List tables with row counts and columns
    Tables(commands::tables::Args),

    /// View and manage configuration settings
    #[command(long_about = "Provides subcommands to show, get, and set configuration values.\n\
        Configuration is stored in ~/.courselib/config.yaml.")]
    Config(commands::config::Args),

    /// Generate shell completion scripts
    Completions(commands::completions::Args),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "course_library=debug,courselib=debug"
    } else {
        "course_library=warn,courselib=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
        .init();

    // A broken config file is reported by the commands that read it
    if let Ok(config) = Config::load() {
        if !config.color {
            colored::control::set_override(false);
        }
    }

    match cli.command {
        Commands::Init(args) => commands::init::run(args),
        Commands::Courses(args) => commands::courses::run(args),
        Commands::Show(args) => commands::show::run(args),
        Commands::Students(args) => commands::students::run(args),
        Commands::Tables(args) => commands::tables::run(args),
        Commands::Config(args) => commands::config::run(args),
        Commands::Completions(args) => {
            commands::completions::generate_completions(&mut Cli::command(), args.shell);
            Ok(())
        }
    }
}
