//! Integration tests for the Comunica CLI
//!
//! These tests exercise the CLI commands through their underlying library
//! functions using temporary databases to ensure test isolation, plus a
//! few smoke tests that run the binary itself under an isolated $HOME.

use assert_cmd::Command;
use chrono::Utc;
use comunica_cli::app::{self, Board};
use comunica_cli::storage::{Card, Database, PRINCIPAL_SESSION_ID};
use predicates::prelude::*;
use tempfile::tempdir;

// =============================================================================
// Test Helpers
// =============================================================================

/// Creates a test database in a temporary directory.
/// Returns the Database instance and the temp directory (which must be kept alive).
fn create_test_db() -> (Database, tempfile::TempDir) {
    let dir = tempdir().expect("Failed to create temp directory");
    let db_path = dir.path().join("test.db");
    let db = Database::open(&db_path).expect("Failed to open test database");
    (db, dir)
}

fn jpeg() -> Vec<u8> {
    vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46]
}

// =============================================================================
// Persistence Lifecycle Tests
// =============================================================================

mod lifecycle_tests {
    use super::*;

    #[test]
    fn test_create_card_roundtrips_through_storage() {
        let dir = tempdir().expect("Failed to create temp directory");
        let db_path = dir.path().join("test.db");

        let card_id = {
            let mut db = Database::open(&db_path).expect("Failed to open database");
            let mut board = app::load_board(&db);

            let id = board
                .create_card("Quero água", jpeg(), "image/jpeg")
                .expect("Failed to create card");
            app::save_board(&mut db, &board).expect("Failed to save board");
            id
        };

        // A fresh process sees the latest snapshot.
        let db = Database::open(&db_path).expect("Failed to reopen database");
        let board = app::load_board(&db);

        let card = board.card(card_id).expect("Card should survive reload");
        assert_eq!(card.text, "Quero água");
        assert_eq!(card.session_id, PRINCIPAL_SESSION_ID);
        assert_eq!(card.image, jpeg());
        assert!(board
            .session(PRINCIPAL_SESSION_ID)
            .expect("Principal should exist")
            .card_ids
            .contains(&card_id));
    }

    #[test]
    fn test_move_card_persists() {
        let dir = tempdir().expect("Failed to create temp directory");
        let db_path = dir.path().join("test.db");

        let (card_id, target_id) = {
            let mut db = Database::open(&db_path).expect("Failed to open database");
            let mut board = app::load_board(&db);

            let card_id = board
                .create_card("Olá", jpeg(), "image/jpeg")
                .expect("Failed to create card");
            let target_id = board
                .create_session("Escola")
                .expect("Failed to create session")
                .id
                .clone();
            board
                .move_card(card_id, &target_id)
                .expect("Failed to move card");
            app::save_board(&mut db, &board).expect("Failed to save board");
            (card_id, target_id)
        };

        let db = Database::open(&db_path).expect("Failed to reopen database");
        let board = app::load_board(&db);

        assert_eq!(board.card(card_id).unwrap().session_id, target_id);
        assert!(!board
            .session(PRINCIPAL_SESSION_ID)
            .unwrap()
            .card_ids
            .contains(&card_id));
        assert_eq!(board.session(&target_id).unwrap().card_ids, vec![card_id]);
    }

    #[test]
    fn test_delete_session_cascade_persists() {
        let dir = tempdir().expect("Failed to create temp directory");
        let db_path = dir.path().join("test.db");

        let (a, b, session_id) = {
            let mut db = Database::open(&db_path).expect("Failed to open database");
            let mut board = app::load_board(&db);

            let session_id = board
                .create_session("Escola")
                .expect("Failed to create session")
                .id
                .clone();
            board.set_active(&session_id).expect("Failed to activate");
            let a = board.create_card("um", jpeg(), "image/jpeg").unwrap();
            let b = board.create_card("dois", jpeg(), "image/jpeg").unwrap();

            board
                .delete_session(&session_id)
                .expect("Failed to delete session");
            app::save_board(&mut db, &board).expect("Failed to save board");
            (a, b, session_id)
        };

        let db = Database::open(&db_path).expect("Failed to reopen database");
        let board = app::load_board(&db);

        assert!(board.session(&session_id).is_none());
        assert_eq!(board.active_session(), PRINCIPAL_SESSION_ID);
        let principal = board.session(PRINCIPAL_SESSION_ID).unwrap();
        for id in [a, b] {
            assert_eq!(board.card(id).unwrap().session_id, PRINCIPAL_SESSION_ID);
            assert!(principal.card_ids.contains(&id));
        }
    }

    #[test]
    fn test_session_reorder_persists() {
        let dir = tempdir().expect("Failed to create temp directory");
        let db_path = dir.path().join("test.db");

        let (a, b) = {
            let mut db = Database::open(&db_path).expect("Failed to open database");
            let mut board = app::load_board(&db);

            let a = board.create_session("A").unwrap().id.clone();
            let b = board.create_session("B").unwrap().id.clone();
            // Order: principal, b, a. Swap a to the middle.
            board
                .reorder_session(&a, comunica_cli::app::Direction::Left)
                .expect("Failed to reorder");
            app::save_board(&mut db, &board).expect("Failed to save board");
            (a, b)
        };

        let db = Database::open(&db_path).expect("Failed to reopen database");
        let board = app::load_board(&db);

        let order: Vec<&str> = board.sessions().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(order, vec![PRINCIPAL_SESSION_ID, a.as_str(), b.as_str()]);
    }

    #[test]
    fn test_inconsistent_store_is_repaired_on_load() {
        let (mut db, _dir) = create_test_db();

        // Write a card owned by a session that does not exist, bypassing
        // the board so the stored snapshot is inconsistent.
        let stray = Card {
            id: 1700000000000,
            text: "perdido".to_string(),
            image: jpeg(),
            mime_type: "image/jpeg".to_string(),
            session_id: "ghost".to_string(),
            created_at: Utc::now(),
        };
        db.save_cards(std::slice::from_ref(&stray))
            .expect("Failed to save cards");

        let board = app::load_board(&db);

        let card = board.card(stray.id).expect("Stray card should be kept");
        assert_eq!(card.session_id, PRINCIPAL_SESSION_ID);
        assert!(board
            .session(PRINCIPAL_SESSION_ID)
            .unwrap()
            .card_ids
            .contains(&stray.id));
    }

    #[test]
    fn test_empty_board_roundtrip_keeps_principal_only() {
        let dir = tempdir().expect("Failed to create temp directory");
        let db_path = dir.path().join("test.db");

        {
            let mut db = Database::open(&db_path).expect("Failed to open database");
            let board = Board::empty();
            app::save_board(&mut db, &board).expect("Failed to save board");
        }

        let db = Database::open(&db_path).expect("Failed to reopen database");
        let board = app::load_board(&db);

        assert_eq!(board.sessions().len(), 1);
        assert_eq!(board.sessions()[0].id, PRINCIPAL_SESSION_ID);
        assert!(board.cards().is_empty());
    }
}

// =============================================================================
// Binary Smoke Tests
// =============================================================================

mod binary_tests {
    use super::*;

    /// Runs the binary with $HOME pointing into a temp directory so the
    /// default database and config stay isolated.
    fn comunica(home: &std::path::Path) -> Command {
        let mut cmd = Command::cargo_bin("comunica").expect("Binary should build");
        cmd.env("HOME", home);
        cmd
    }

    #[test]
    fn test_help_lists_commands() {
        let dir = tempdir().expect("Failed to create temp directory");
        comunica(dir.path())
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("create"))
            .stdout(predicate::str::contains("speak"))
            .stdout(predicate::str::contains("session"));
    }

    #[test]
    fn test_status_on_fresh_home() {
        let dir = tempdir().expect("Failed to create temp directory");
        comunica(dir.path())
            .arg("status")
            .assert()
            .success()
            .stdout(predicate::str::contains("Comunica"))
            .stdout(predicate::str::contains("Principal"));
    }

    #[test]
    fn test_session_new_then_listed() {
        let dir = tempdir().expect("Failed to create temp directory");

        comunica(dir.path())
            .args(["session", "new", "Escola"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Escola"));

        comunica(dir.path())
            .arg("sessions")
            .assert()
            .success()
            .stdout(predicate::str::contains("Principal"))
            .stdout(predicate::str::contains("Escola"));
    }

    #[test]
    fn test_create_without_image_source_fails() {
        let dir = tempdir().expect("Failed to create temp directory");
        comunica(dir.path())
            .args(["create", "--text", "Quero água"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("needs an image"));
    }

    #[test]
    fn test_delete_principal_session_fails() {
        let dir = tempdir().expect("Failed to create temp directory");
        comunica(dir.path())
            .args(["session", "delete", "principal", "--force"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("principal session cannot be deleted"));
    }
}
