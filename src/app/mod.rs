//! Application core for Comunica.
//!
//! Owns the in-memory board state and its synchronization with the
//! storage layer: load-on-start (with the integrity repair pass) and
//! full overwrite on every change.

pub mod board;

pub use board::{Board, BoardError, Direction, RepairReport};

use anyhow::Result;
use tracing::warn;

use crate::storage::Database;

/// Loads the board from storage, degrading to the in-memory default.
///
/// A failing or corrupt store is logged and replaced by a single empty
/// principal session so the command surface stays usable. Integrity
/// repairs applied while rebuilding the board are logged as warnings.
pub fn load_board(db: &Database) -> Board {
    match try_load(db) {
        Ok((board, report)) => {
            log_repairs(&report);
            board
        }
        Err(e) => {
            warn!("storage unavailable, starting from an empty board: {:#}", e);
            Board::empty()
        }
    }
}

/// Persists the full board state: both collections plus the active
/// session pointer, replace-on-save.
pub fn save_board(db: &mut Database, board: &Board) -> Result<()> {
    db.save_cards(board.cards())?;
    db.save_sessions(board.sessions())?;
    db.set_active_session(board.active_session())?;
    Ok(())
}

fn try_load(db: &Database) -> Result<(Board, RepairReport)> {
    let cards = db.load_cards()?;
    let sessions = db.load_sessions()?;
    let active = db.active_session()?;
    Ok(Board::from_records(cards, sessions, active))
}

fn log_repairs(report: &RepairReport) {
    if report.is_clean() {
        return;
    }
    if report.created_principal {
        warn!("principal session was missing and has been re-created");
    }
    if report.adopted_orphans > 0 {
        warn!(
            "{} card(s) referenced a missing session and were moved to principal",
            report.adopted_orphans
        );
    }
    if report.pruned_ids > 0 {
        warn!(
            "{} dangling card reference(s) pruned from session lists",
            report.pruned_ids
        );
    }
    if report.deduplicated_ids > 0 {
        warn!(
            "{} duplicate card reference(s) removed from session lists",
            report.deduplicated_ids
        );
    }
    if report.restored_memberships > 0 {
        warn!(
            "{} card(s) re-attached to their owning session's list",
            report.restored_memberships
        );
    }
    if report.reset_active {
        warn!("active session no longer exists, switched back to principal");
    }
}
