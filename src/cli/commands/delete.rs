//! Delete command - permanently remove a card.
//!
//! Deletes a card from the board and strips its id from every session
//! list. This operation is irreversible, so it prompts for
//! confirmation unless --force is given.

use std::io::{self, Write};

use anyhow::Result;
use colored::Colorize;

use crate::app;
use crate::storage::Database;

use super::resolve_card;

/// Arguments for the delete command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    comunica delete 17283          Delete card (prompts for confirmation)\n    \
    comunica delete 17283 --force  Delete without confirmation")]
pub struct Args {
    /// Card to delete (id or id prefix)
    #[arg(value_name = "CARD")]
    pub card: String,

    /// Skip the confirmation prompt
    #[arg(long)]
    pub force: bool,
}

/// Executes the delete command.
pub fn run(args: Args) -> Result<()> {
    let mut db = Database::open_default()?;
    let mut board = app::load_board(&db);

    let card_id = resolve_card(&board, &args.card)?;

    // Card details are re-derived from the live board here; a stale
    // reference has already failed resolution above.
    if let Some(card) = board.card(card_id) {
        let session_name = board
            .session(&card.session_id)
            .map(|s| s.name.as_str())
            .unwrap_or(&card.session_id);

        println!();
        println!("{} {}", "Card".bold(), card.id.to_string().cyan());
        println!("  {}  {}", "Text:".dimmed(), card.text);
        println!("  {}  {}", "Session:".dimmed(), session_name);
        println!(
            "  {}  {}",
            "Created:".dimmed(),
            card.created_at.format("%Y-%m-%d %H:%M:%S")
        );
        println!();
    }

    if !args.force {
        print!("Delete this card? [y/N] ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("{}", "Cancelled".dimmed());
            return Ok(());
        }
    }

    let removed = board.delete_card(card_id)?;
    app::save_board(&mut db, &board)?;

    println!("{} card \"{}\"", "Deleted".green(), removed.text);

    Ok(())
}
