//! Session command - manage sessions.
//!
//! Groups session management under one subcommand: creating, deleting
//! (with the cascade to principal), adjacent-swap reordering, and
//! selecting the active session.

use std::io::{self, Write};

use anyhow::Result;
use clap::{Subcommand, ValueEnum};
use colored::Colorize;

use crate::app::{self, Direction};
use crate::storage::Database;

use super::resolve_session;

/// Reorder direction on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DirectionArg {
    /// Swap with the session to the left.
    Left,
    /// Swap with the session to the right.
    Right,
}

impl From<DirectionArg> for Direction {
    fn from(value: DirectionArg) -> Self {
        match value {
            DirectionArg::Left => Direction::Left,
            DirectionArg::Right => Direction::Right,
        }
    }
}

/// Arguments for the session command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    comunica session new Escola        Create a session named Escola\n    \
    comunica session use Escola        Make Escola the active session\n    \
    comunica session move Escola left  Swap Escola with its left neighbor\n    \
    comunica session delete Escola     Delete Escola; its cards move to Principal")]
pub struct Args {
    #[command(subcommand)]
    pub command: SessionCommand,
}

/// Session management subcommands.
#[derive(Subcommand)]
pub enum SessionCommand {
    /// Create a new session (inserted right after Principal)
    New {
        /// Display name of the new session
        name: String,
    },
    /// Delete a session; its cards move to Principal
    Delete {
        /// Session to delete (id, name, or id prefix)
        session: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },
    /// Move a session one position left or right
    Move {
        /// Session to move (id, name, or id prefix)
        session: String,
        /// Direction to move in
        #[arg(value_enum)]
        direction: DirectionArg,
    },
    /// Select the active session
    Use {
        /// Session to activate (id, name, or id prefix)
        session: String,
    },
}

/// Executes the session command.
pub fn run(args: Args) -> Result<()> {
    match args.command {
        SessionCommand::New { name } => new_session(&name),
        SessionCommand::Delete { session, force } => delete_session(&session, force),
        SessionCommand::Move { session, direction } => move_session(&session, direction.into()),
        SessionCommand::Use { session } => use_session(&session),
    }
}

fn new_session(name: &str) -> Result<()> {
    let mut db = Database::open_default()?;
    let mut board = app::load_board(&db);

    let session = board.create_session(name)?;
    let (id, name) = (session.id.clone(), session.name.clone());
    app::save_board(&mut db, &board)?;

    println!("{} session {} ({})", "Created".green(), name, id.cyan());
    Ok(())
}

fn delete_session(reference: &str, force: bool) -> Result<()> {
    let mut db = Database::open_default()?;
    let mut board = app::load_board(&db);

    let session_id = resolve_session(&board, reference)?;

    if let Some(session) = board.session(&session_id) {
        println!();
        println!("{} {}", "Session".bold(), session.name.clone());
        println!("  {}  {}", "Id:".dimmed(), session.id.cyan());
        println!(
            "  {}  {}",
            "Created:".dimmed(),
            session.created_at.format("%Y-%m-%d %H:%M:%S")
        );
        println!();
        println!(
            "{}",
            format!(
                "Its {} card(s) will be moved to the Principal session.",
                session.card_ids.len()
            )
            .yellow()
        );
    }

    if !force {
        print!("Delete this session? [y/N] ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("{}", "Cancelled".dimmed());
            return Ok(());
        }
    }

    let moved = board.delete_session(&session_id)?;
    app::save_board(&mut db, &board)?;

    println!(
        "{} session ({} card(s) moved to Principal)",
        "Deleted".green(),
        moved
    );
    Ok(())
}

fn move_session(reference: &str, direction: Direction) -> Result<()> {
    let mut db = Database::open_default()?;
    let mut board = app::load_board(&db);

    let session_id = resolve_session(&board, reference)?;
    let moved = board.reorder_session(&session_id, direction)?;

    if !moved {
        println!("{}", "Nothing to do: the session is already at that edge (and Principal is pinned first).".dimmed());
        return Ok(());
    }

    app::save_board(&mut db, &board)?;

    let order: Vec<&str> = board.sessions().iter().map(|s| s.name.as_str()).collect();
    println!("{} session. Order: {}", "Moved".green(), order.join(" | "));
    Ok(())
}

fn use_session(reference: &str) -> Result<()> {
    let mut db = Database::open_default()?;
    let mut board = app::load_board(&db);

    let session_id = resolve_session(&board, reference)?;
    board.set_active(&session_id)?;
    app::save_board(&mut db, &board)?;

    let name = board
        .session(&session_id)
        .map(|s| s.name.as_str())
        .unwrap_or(&session_id);
    println!("{} session {}", "Active".green(), name);
    Ok(())
}
