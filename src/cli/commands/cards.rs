//! Cards command - list the cards of a session.
//!
//! Shows the active session's cards by default, in the session's list
//! order. Another session can be selected by id, name, or id prefix.

use anyhow::Result;
use colored::Colorize;

use crate::app;
use crate::cli::OutputFormat;
use crate::storage::Database;

use super::resolve_session;

/// Arguments for the cards command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    comunica cards                 List cards of the active session\n    \
    comunica cards --session Escola    List cards of another session\n    \
    comunica cards --format json   Output as JSON (includes image payloads)")]
pub struct Args {
    /// Session to list (id, name, or id prefix); defaults to the active session
    #[arg(short, long, value_name = "SESSION")]
    pub session: Option<String>,

    /// Output format: text (default), json
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Executes the cards command.
pub fn run(args: Args) -> Result<()> {
    let db = Database::open_default()?;
    let board = app::load_board(&db);

    let session_id = match args.session {
        Some(ref reference) => resolve_session(&board, reference)?,
        None => board.active_session().to_string(),
    };
    let cards = board.cards_in(&session_id)?;
    let session_name = board
        .session(&session_id)
        .map(|s| s.name.clone())
        .unwrap_or_else(|| session_id.clone());

    if cards.is_empty() {
        println!("{}", format!("No cards in session '{session_name}'.").dimmed());
        println!();
        println!("Run 'comunica create --text \"...\" --image foto.jpg' to create one.");
        return Ok(());
    }

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&cards)?;
            println!("{json}");
        }
        OutputFormat::Text => {
            // Column widths for consistent alignment
            const ID_WIDTH: usize = 14;
            const IMAGE_WIDTH: usize = 20;
            const CREATED_WIDTH: usize = 16;

            println!("{}", format!("Cards in session: {session_name}").bold());
            println!(
                "{}",
                format!(
                    "{:<ID_WIDTH$}  {:<IMAGE_WIDTH$}  {:<CREATED_WIDTH$}  {}",
                    "ID", "IMAGE", "CREATED", "TEXT"
                )
                .bold()
            );

            for card in cards {
                let image = format!("{} ({} KiB)", card.mime_type, card.image.len() / 1024);
                let created = card.created_at.format("%Y-%m-%d %H:%M").to_string();

                println!(
                    "{:<ID_WIDTH$}  {:<IMAGE_WIDTH$}  {:<CREATED_WIDTH$}  {}",
                    card.id.to_string().cyan(),
                    image.dimmed(),
                    created.dimmed(),
                    card.text
                );
            }
        }
    }

    Ok(())
}
