//! Config command - manage configuration

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use course_library::config::{Config, KEYS};

#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    courselib config                              Show configuration\n    \
    courselib config get color                    Print one value\n    \
    courselib config set database_path ~/lib.db   Move the store")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<ConfigCommand>,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,
    /// Get a configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
}

pub fn run(args: Args) -> Result<()> {
    match args.command {
        Some(ConfigCommand::Show) | None => show_config(),
        Some(ConfigCommand::Get { key }) => get_config(&key),
        Some(ConfigCommand::Set { key, value }) => set_config(&key, &value),
    }
}

fn show_config() -> Result<()> {
    let config = Config::load()?;

    println!("{}", "Course Library Configuration".bold());
    println!();
    println!("  {}    {}", "Config:".dimmed(), Config::config_path()?.display());
    println!("  {}  {}", "Database:".dimmed(), config.database_path()?.display());
    println!();
    println!("{}", "Settings:".bold());
    for key in KEYS {
        let value = config.get(key)?.unwrap_or_else(|| "(default)".to_string());
        println!("  {}  {}", format!("{:<14}", key).cyan(), value);
    }

    Ok(())
}

fn get_config(key: &str) -> Result<()> {
    match Config::load()?.get(key)? {
        Some(value) => println!("{value}"),
        None => println!("{}", format!("Config key '{}' is not set", key).yellow()),
    }
    Ok(())
}

fn set_config(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;

    println!("{} {} = {}", "Set".green(), key, value);
    Ok(())
}
