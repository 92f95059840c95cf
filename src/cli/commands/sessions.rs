//! Sessions command - list sessions.
//!
//! Displays the session list in board order (principal first). The
//! active session is marked; output can also be JSON.

use anyhow::Result;
use colored::Colorize;

use crate::app;
use crate::cli::OutputFormat;
use crate::storage::Database;

/// Arguments for the sessions command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    comunica sessions              List sessions in board order\n    \
    comunica sessions --format json    Output as JSON")]
pub struct Args {
    /// Output format: text (default), json
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Executes the sessions command.
pub fn run(args: Args) -> Result<()> {
    let db = Database::open_default()?;
    let board = app::load_board(&db);

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(board.sessions())?;
            println!("{json}");
        }
        OutputFormat::Text => {
            // Column widths for consistent alignment
            const ID_WIDTH: usize = 14;
            const CARDS_WIDTH: usize = 5;
            const CREATED_WIDTH: usize = 16;

            println!(
                "{}",
                format!(
                    "  {:<ID_WIDTH$}  {:>CARDS_WIDTH$}  {:<CREATED_WIDTH$}  {}",
                    "ID", "CARDS", "CREATED", "NAME"
                )
                .bold()
            );

            for session in board.sessions() {
                let marker = if session.id == board.active_session() {
                    "*".green().to_string()
                } else {
                    " ".to_string()
                };
                let created = session.created_at.format("%Y-%m-%d %H:%M").to_string();

                println!(
                    "{} {:<ID_WIDTH$}  {:>CARDS_WIDTH$}  {:<CREATED_WIDTH$}  {}",
                    marker,
                    session.id.cyan(),
                    session.card_ids.len(),
                    created.dimmed(),
                    session.name
                );
            }
        }
    }

    Ok(())
}
