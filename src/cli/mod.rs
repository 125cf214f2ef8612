//! Command-line interface for the course library.
//!
//! Provides the CLI commands for browsing the curriculum, registering
//! students, and inspecting the underlying table store.

/// Individual CLI command implementations.
pub mod commands;

/// Output format selection shared by commands.
pub mod format;

pub use format::OutputFormat;
