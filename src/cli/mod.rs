//! Command-line interface for Comunica.
//!
//! Provides the CLI commands for working with the card board. Every
//! interactive element of the board maps onto exactly one subcommand:
//! card creation, moving, deletion, speech playback, and session
//! management.

/// Individual CLI command implementations.
pub mod commands;

/// Output formatting utilities.
pub mod format;

pub use format::OutputFormat;
