//! Status command - show current board state.
//!
//! Displays an overview of the card board: database statistics, the
//! active session, and the session list with card counts.

use anyhow::Result;
use colored::Colorize;

use crate::app;
use crate::storage::Database;

/// Executes the status command.
pub fn run() -> Result<()> {
    println!("{}", "Comunica".bold().cyan());
    println!("{}", "Visual communication cards with speech".dimmed());
    println!();

    let db = Database::open_default()?;
    let board = app::load_board(&db);

    println!("{}", "Board:".bold());
    println!("  Cards:    {}", board.cards().len());
    println!("  Sessions: {}", board.sessions().len());

    let active_name = board
        .session(board.active_session())
        .map(|s| s.name.as_str())
        .unwrap_or("-");
    println!("  Active:   {active_name}");

    println!();
    println!("{}", "Sessions:".bold());
    for session in board.sessions() {
        let marker = if session.id == board.active_session() {
            "*".green().to_string()
        } else {
            " ".to_string()
        };
        println!(
            "  {} {}  {}",
            marker,
            format!("{} cards", session.card_ids.len()).dimmed(),
            session.name
        );
    }

    if board.cards().is_empty() {
        println!();
        println!(
            "{}",
            "Hint: Run 'comunica create --text \"Quero água\" --image foto.jpg' to create your first card"
                .yellow()
        );
    }

    Ok(())
}
