//! CLI commands for Comunica.
//!
//! Each submodule implements a single CLI command with its argument
//! parsing and execution logic.

/// List cards of a session.
pub mod cards;

/// View and manage configuration settings.
pub mod config;

/// Generate shell completion scripts.
pub mod completions;

/// Create a new card from a file or camera image.
pub mod create;

/// Delete a card after confirmation.
pub mod delete;

/// Move a card out of the active session.
pub mod move_card;

/// Session management: new, delete, move, use.
pub mod session;

/// List sessions.
pub mod sessions;

/// Speak a card's text aloud.
pub mod speak;

/// Show board status and statistics.
pub mod status;

use anyhow::{bail, Result};
use colored::Colorize;

use crate::app::Board;

/// Resolves a session reference: exact id, exact name
/// (case-insensitive), or unique id prefix.
///
/// References are resolved against the live board at execution time;
/// a reference that no longer resolves aborts the command instead of
/// acting on a stale snapshot.
pub(crate) fn resolve_session(board: &Board, reference: &str) -> Result<String> {
    if board.session(reference).is_some() {
        return Ok(reference.to_string());
    }

    let by_name: Vec<_> = board
        .sessions()
        .iter()
        .filter(|s| s.name.eq_ignore_ascii_case(reference))
        .collect();
    if by_name.len() == 1 {
        return Ok(by_name[0].id.clone());
    }
    if by_name.len() > 1 {
        println!("{}", "Multiple sessions have that name:".yellow());
        for s in &by_name {
            println!("  {}  {}", s.id.cyan(), s.name);
        }
        bail!("Multiple sessions are named '{reference}'. Use an id from the list above.");
    }

    let by_prefix: Vec<_> = board
        .sessions()
        .iter()
        .filter(|s| s.id.starts_with(reference))
        .collect();
    match by_prefix.len() {
        0 => bail!(
            "No session matching '{reference}'. Run 'comunica sessions' to list sessions."
        ),
        1 => Ok(by_prefix[0].id.clone()),
        _ => {
            println!("{}", "Multiple sessions match that prefix:".yellow());
            for s in &by_prefix {
                println!("  {}  {}", s.id.cyan(), s.name);
            }
            bail!("Multiple sessions match '{reference}'. Use a more specific prefix.");
        }
    }
}

/// Resolves a card reference: exact id or unique id prefix.
pub(crate) fn resolve_card(board: &Board, reference: &str) -> Result<i64> {
    if let Ok(id) = reference.parse::<i64>() {
        if board.card(id).is_some() {
            return Ok(id);
        }
    }

    let matching: Vec<_> = board
        .cards()
        .iter()
        .filter(|c| c.id.to_string().starts_with(reference))
        .collect();
    match matching.len() {
        0 => bail!("No card matching '{reference}'. Run 'comunica cards' to list cards."),
        1 => Ok(matching[0].id),
        _ => {
            println!("{}", "Multiple cards match that prefix:".yellow());
            for c in &matching {
                println!("  {}  {}", c.id.to_string().cyan(), c.text);
            }
            bail!("Multiple cards match '{reference}'. Use a more specific prefix.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jpeg() -> Vec<u8> {
        vec![0xFF, 0xD8]
    }

    #[test]
    fn test_resolve_session_by_id_name_and_prefix() {
        let mut board = Board::empty();
        let id = board.create_session("Escola").unwrap().id.clone();

        assert_eq!(resolve_session(&board, &id).unwrap(), id);
        assert_eq!(resolve_session(&board, "escola").unwrap(), id);
        assert_eq!(resolve_session(&board, &id[..6]).unwrap(), id);
        assert_eq!(resolve_session(&board, "principal").unwrap(), "principal");
        assert!(resolve_session(&board, "zzz").is_err());
    }

    #[test]
    fn test_resolve_card_by_id_and_prefix() {
        let mut board = Board::empty();
        let id = board.create_card("Quero água", jpeg(), "image/jpeg").unwrap();

        assert_eq!(resolve_card(&board, &id.to_string()).unwrap(), id);
        assert_eq!(resolve_card(&board, &id.to_string()[..8]).unwrap(), id);
        assert!(resolve_card(&board, "999999999999999").is_err());
    }

    #[test]
    fn test_resolve_card_ambiguous_prefix_rejected() {
        let mut board = Board::empty();
        let first = board.create_card("um", jpeg(), "image/jpeg").unwrap();
        let second = board.create_card("dois", jpeg(), "image/jpeg").unwrap();

        // Consecutive ids share a long common prefix.
        let common: String = first
            .to_string()
            .chars()
            .zip(second.to_string().chars())
            .take_while(|(a, b)| a == b)
            .map(|(a, _)| a)
            .collect();
        assert!(!common.is_empty());
        assert!(resolve_card(&board, &common).is_err());
    }
}
