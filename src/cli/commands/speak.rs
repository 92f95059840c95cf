//! Speak command - text-to-speech playback of a card.
//!
//! The CLI equivalent of tapping a card on the board: the card's text
//! is handed to the speech collaborator, fire-and-forget.

use anyhow::Result;
use colored::Colorize;

use crate::app;
use crate::config::Config;
use crate::media::Speaker;
use crate::storage::Database;

use super::resolve_card;

/// Arguments for the speak command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    comunica speak 17283           Speak a card's text aloud\n    \
    comunica speak 17283000        Card referenced by id prefix")]
pub struct Args {
    /// Card to speak (id or id prefix)
    #[arg(value_name = "CARD")]
    pub card: String,
}

/// Executes the speak command.
pub fn run(args: Args) -> Result<()> {
    let db = Database::open_default()?;
    let board = app::load_board(&db);

    let card_id = resolve_card(&board, &args.card)?;
    let text = board
        .card(card_id)
        .map(|c| c.text.clone())
        .unwrap_or_default();

    let config = Config::load()?;
    Speaker::from_config(&config).speak(&text)?;

    println!("{} {}", "Speaking:".green(), text);

    Ok(())
}
