//! SQLite storage layer for Comunica

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::PathBuf;

use super::models::{Card, Session};

/// Get the default database path
pub fn default_db_path() -> Result<PathBuf> {
    let config_dir = dirs::home_dir()
        .context("Could not find home directory")?
        .join(".comunica");

    std::fs::create_dir_all(&config_dir)?;
    Ok(config_dir.join("comunica.db"))
}

/// Database connection wrapper
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create the database
    pub fn open(path: &PathBuf) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open the default database
    pub fn open_default() -> Result<Self> {
        let path = default_db_path()?;
        Self::open(&path)
    }

    /// Run migrations
    ///
    /// Creates the record collections on first use and provisions the
    /// principal session into an empty store without touching existing
    /// collections.
    fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            );

            CREATE TABLE IF NOT EXISTS cards (
                id INTEGER PRIMARY KEY,
                text TEXT NOT NULL,
                image BLOB NOT NULL,
                mime_type TEXT NOT NULL,
                session_id TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS sessions (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                card_ids TEXT NOT NULL,
                position INTEGER NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS app_state (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            INSERT OR IGNORE INTO schema_version (version) VALUES (1);
            "#,
        )?;

        let sessions: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))?;
        if sessions == 0 {
            let principal = Session::principal();
            self.conn.execute(
                "INSERT INTO sessions (id, name, card_ids, position, created_at) VALUES (?1, ?2, ?3, 0, ?4)",
                params![
                    principal.id,
                    principal.name,
                    serde_json::to_string(&principal.card_ids)?,
                    principal.created_at.to_rfc3339(),
                ],
            )?;
        }

        Ok(())
    }

    // ==================== Cards ====================

    /// Load every card record
    pub fn load_cards(&self) -> Result<Vec<Card>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, text, image, mime_type, session_id, created_at FROM cards ORDER BY id",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(Card {
                id: row.get(0)?,
                text: row.get(1)?,
                image: row.get(2)?,
                mime_type: row.get(3)?,
                session_id: row.get(4)?,
                created_at: parse_timestamp(5, &row.get::<_, String>(5)?)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>()
            .context("Failed to load cards")
    }

    /// Replace the card collection wholesale
    ///
    /// Clears the collection and inserts every given record. The whole
    /// batch commits as one transaction; a failed insert aborts the
    /// replace and leaves the previous snapshot in place.
    pub fn save_cards(&mut self, cards: &[Card]) -> Result<()> {
        let tx = self.conn.transaction()?;

        tx.execute("DELETE FROM cards", [])?;
        for card in cards {
            tx.execute(
                r#"
                INSERT INTO cards (id, text, image, mime_type, session_id, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    card.id,
                    card.text,
                    card.image,
                    card.mime_type,
                    card.session_id,
                    card.created_at.to_rfc3339(),
                ],
            )?;
        }

        tx.commit().context("Failed to commit card save")
    }

    // ==================== Sessions ====================

    /// Load every session record in persisted position order
    ///
    /// The caller is still responsible for restoring the principal-first
    /// invariant; stored position is a hint, not a guarantee.
    pub fn load_sessions(&self) -> Result<Vec<Session>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, card_ids, created_at FROM sessions ORDER BY position",
        )?;

        let rows = stmt.query_map([], |row| {
            let card_ids_json: String = row.get(2)?;
            Ok(Session {
                id: row.get(0)?,
                name: row.get(1)?,
                card_ids: parse_card_ids(2, &card_ids_json)?,
                created_at: parse_timestamp(3, &row.get::<_, String>(3)?)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>()
            .context("Failed to load sessions")
    }

    /// Replace the session collection wholesale, persisting list order
    pub fn save_sessions(&mut self, sessions: &[Session]) -> Result<()> {
        let tx = self.conn.transaction()?;

        tx.execute("DELETE FROM sessions", [])?;
        for (position, session) in sessions.iter().enumerate() {
            tx.execute(
                r#"
                INSERT INTO sessions (id, name, card_ids, position, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![
                    session.id,
                    session.name,
                    serde_json::to_string(&session.card_ids)?,
                    position as i64,
                    session.created_at.to_rfc3339(),
                ],
            )?;
        }

        tx.commit().context("Failed to commit session save")
    }

    // ==================== App state ====================

    /// Get the persisted active session id, if any
    pub fn active_session(&self) -> Result<Option<String>> {
        use rusqlite::OptionalExtension;

        self.conn
            .query_row(
                "SELECT value FROM app_state WHERE key = 'active_session'",
                [],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to read active session")
    }

    /// Persist the active session id
    pub fn set_active_session(&self, session_id: &str) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO app_state (key, value) VALUES ('active_session', ?1)
            ON CONFLICT(key) DO UPDATE SET value = ?1
            "#,
            params![session_id],
        )?;
        Ok(())
    }

    // ==================== Stats ====================

    /// Get total card count
    pub fn card_count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM cards", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Get total session count
    pub fn session_count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))?;
        Ok(count)
    }
}

/// Parses an RFC 3339 column value, surfacing corruption as a conversion error
fn parse_timestamp(idx: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// Parses the JSON-encoded card id list column
fn parse_card_ids(idx: usize, value: &str) -> rusqlite::Result<Vec<i64>> {
    serde_json::from_str(value).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::models::PRINCIPAL_SESSION_ID;
    use tempfile::tempdir;

    /// Creates a test database in a temporary directory.
    /// Returns the Database instance and the temp directory (which must be kept alive).
    fn create_test_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().expect("Failed to create temp directory");
        let db_path = dir.path().join("test.db");
        let db = Database::open(&db_path).expect("Failed to open test database");
        (db, dir)
    }

    /// Creates a test card owned by the given session.
    fn create_test_card(id: i64, text: &str, session_id: &str) -> Card {
        Card {
            id,
            text: text.to_string(),
            image: vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10],
            mime_type: "image/jpeg".to_string(),
            session_id: session_id.to_string(),
            created_at: Utc::now(),
        }
    }

    /// Creates a test session with the given id and members.
    fn create_test_session(id: &str, name: &str, card_ids: Vec<i64>) -> Session {
        Session {
            id: id.to_string(),
            name: name.to_string(),
            card_ids,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_database_creation_provisions_principal() {
        let dir = tempdir().expect("Failed to create temp directory");
        let db_path = dir.path().join("new_test.db");

        assert!(
            !db_path.exists(),
            "Database file should not exist before creation"
        );

        let db = Database::open(&db_path).expect("Failed to create database");

        assert!(db_path.exists(), "Database file should exist after creation");
        assert_eq!(db.card_count().expect("Failed to count cards"), 0);

        let sessions = db.load_sessions().expect("Failed to load sessions");
        assert_eq!(sessions.len(), 1, "New database should hold only principal");
        assert_eq!(sessions[0].id, PRINCIPAL_SESSION_ID);
        assert!(sessions[0].card_ids.is_empty());
    }

    #[test]
    fn test_migrate_preserves_existing_collections() {
        let dir = tempdir().expect("Failed to create temp directory");
        let db_path = dir.path().join("test.db");

        {
            let mut db = Database::open(&db_path).expect("Failed to open database");
            let sessions = vec![
                create_test_session(PRINCIPAL_SESSION_ID, "Principal", vec![]),
                create_test_session("1700000000000", "Escola", vec![]),
            ];
            db.save_sessions(&sessions).expect("Failed to save sessions");
        }

        // Reopening runs migrate() again; existing sessions must survive
        // and principal must not be re-provisioned on top of them.
        let db = Database::open(&db_path).expect("Failed to reopen database");
        let sessions = db.load_sessions().expect("Failed to load sessions");

        assert_eq!(sessions.len(), 2, "Existing sessions should survive reopen");
        assert_eq!(sessions[0].id, PRINCIPAL_SESSION_ID);
        assert_eq!(sessions[1].name, "Escola");
    }

    #[test]
    fn test_save_and_load_cards_roundtrip() {
        let (mut db, _dir) = create_test_db();

        let card = create_test_card(1700000000000, "Quero água", PRINCIPAL_SESSION_ID);
        db.save_cards(std::slice::from_ref(&card))
            .expect("Failed to save cards");

        let loaded = db.load_cards().expect("Failed to load cards");
        assert_eq!(loaded.len(), 1, "Should load exactly one card");
        assert_eq!(loaded[0].id, card.id);
        assert_eq!(loaded[0].text, "Quero água");
        assert_eq!(loaded[0].image, card.image);
        assert_eq!(loaded[0].mime_type, "image/jpeg");
        assert_eq!(loaded[0].session_id, PRINCIPAL_SESSION_ID);
    }

    #[test]
    fn test_save_cards_is_full_replace() {
        let (mut db, _dir) = create_test_db();

        let first = vec![
            create_test_card(1, "um", PRINCIPAL_SESSION_ID),
            create_test_card(2, "dois", PRINCIPAL_SESSION_ID),
        ];
        db.save_cards(&first).expect("Failed to save first batch");

        let second = vec![create_test_card(3, "três", PRINCIPAL_SESSION_ID)];
        db.save_cards(&second).expect("Failed to save second batch");

        let loaded = db.load_cards().expect("Failed to load cards");
        assert_eq!(loaded.len(), 1, "Save should replace, not append");
        assert_eq!(loaded[0].id, 3);
    }

    #[test]
    fn test_sessions_persist_list_order() {
        let (mut db, _dir) = create_test_db();

        let sessions = vec![
            create_test_session(PRINCIPAL_SESSION_ID, "Principal", vec![1, 2]),
            create_test_session("1700000000111", "Casa", vec![3]),
            create_test_session("1700000000000", "Escola", vec![]),
        ];
        db.save_sessions(&sessions).expect("Failed to save sessions");

        let loaded = db.load_sessions().expect("Failed to load sessions");
        let ids: Vec<&str> = loaded.iter().map(|s| s.id.as_str()).collect();

        // Position order wins over id order.
        assert_eq!(ids, vec![PRINCIPAL_SESSION_ID, "1700000000111", "1700000000000"]);
        assert_eq!(loaded[0].card_ids, vec![1, 2]);
        assert_eq!(loaded[1].card_ids, vec![3]);
    }

    #[test]
    fn test_active_session_roundtrip() {
        let (db, _dir) = create_test_db();

        assert_eq!(
            db.active_session().expect("Failed to read active session"),
            None,
            "Fresh database should have no persisted active session"
        );

        db.set_active_session("1700000000000")
            .expect("Failed to set active session");
        assert_eq!(
            db.active_session().expect("Failed to read active session"),
            Some("1700000000000".to_string())
        );

        db.set_active_session(PRINCIPAL_SESSION_ID)
            .expect("Failed to overwrite active session");
        assert_eq!(
            db.active_session().expect("Failed to read active session"),
            Some(PRINCIPAL_SESSION_ID.to_string())
        );
    }

    #[test]
    fn test_counts() {
        let (mut db, _dir) = create_test_db();

        assert_eq!(db.card_count().expect("Failed to count"), 0);
        assert_eq!(db.session_count().expect("Failed to count"), 1);

        db.save_cards(&[
            create_test_card(1, "um", PRINCIPAL_SESSION_ID),
            create_test_card(2, "dois", PRINCIPAL_SESSION_ID),
        ])
        .expect("Failed to save cards");

        assert_eq!(db.card_count().expect("Failed to count"), 2);
    }
}
