//! Move command - move a card out of the active session.
//!
//! The card must currently be in the active session; the target can be
//! referenced by id, name, or id prefix.

use anyhow::Result;
use colored::Colorize;

use crate::app;
use crate::storage::Database;

use super::{resolve_card, resolve_session};

/// Arguments for the move command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    comunica move 17283... Escola      Move a card to the session named Escola\n    \
    comunica move 17283 1700           Card and session referenced by id prefix")]
pub struct Args {
    /// Card to move (id or id prefix)
    #[arg(value_name = "CARD")]
    pub card: String,

    /// Target session (id, name, or id prefix)
    #[arg(value_name = "SESSION")]
    pub session: String,
}

/// Executes the move command.
pub fn run(args: Args) -> Result<()> {
    let mut db = Database::open_default()?;
    let mut board = app::load_board(&db);

    let card_id = resolve_card(&board, &args.card)?;
    let target_id = resolve_session(&board, &args.session)?;

    board.move_card(card_id, &target_id)?;
    app::save_board(&mut db, &board)?;

    let card_text = board
        .card(card_id)
        .map(|c| c.text.clone())
        .unwrap_or_default();
    let target_name = board
        .session(&target_id)
        .map(|s| s.name.as_str())
        .unwrap_or(&target_id);
    println!(
        "{} \"{}\" to session {}",
        "Moved".green(),
        card_text,
        target_name
    );

    Ok(())
}
