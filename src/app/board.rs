//! Application state controller
//!
//! The [`Board`] holds the authoritative in-memory state: the card list,
//! the ordered session list (principal pinned first), and the active
//! session id. Every user intent is a method returning a `Result`; a
//! failed intent leaves both collections unchanged.

use chrono::Utc;
use thiserror::Error;

use crate::storage::{Card, Session, PRINCIPAL_SESSION_ID};

/// Errors surfaced by board intents.
///
/// All of these are terminal for the single user action that caused
/// them and never fatal to the process.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    /// Card creation requires non-empty text.
    #[error("card text cannot be empty")]
    EmptyText,

    /// Card creation requires an image payload.
    #[error("a card needs an image")]
    MissingImage,

    /// Session creation requires a non-blank name.
    #[error("session name cannot be blank")]
    BlankSessionName,

    /// The principal session can never be deleted.
    #[error("the principal session cannot be deleted")]
    PrincipalImmutable,

    /// No session with the given id exists.
    #[error("no session with id '{0}'")]
    UnknownSession(String),

    /// No card with the given id exists.
    #[error("no card with id {0}")]
    UnknownCard(i64),

    /// Moving a card that is not in the active session is invalid input.
    #[error("card {0} is not in the active session '{1}'")]
    CardNotInActiveSession(i64, String),

    /// Moving a card onto the session it already lives in.
    #[error("card {0} is already in session '{1}'")]
    CardAlreadyInSession(i64, String),
}

/// Direction for the adjacent-swap session reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// What the load-time integrity pass had to fix.
///
/// The card/session dual reference is denormalized; this report records
/// every repair applied while rebuilding a consistent board from raw
/// records. All fields zero (and no flags set) means the stored
/// snapshot was already consistent.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RepairReport {
    /// Principal session was absent and had to be re-created.
    pub created_principal: bool,
    /// Duplicate ids removed from session lists.
    pub deduplicated_ids: usize,
    /// Ids referencing no existing card, pruned from session lists.
    pub pruned_ids: usize,
    /// Cards re-appended to the list of their owning session.
    pub restored_memberships: usize,
    /// Cards whose session no longer exists, adopted by principal.
    pub adopted_orphans: usize,
    /// Active-session pointer did not resolve and was reset to principal.
    pub reset_active: bool,
}

impl RepairReport {
    /// True when nothing needed repair.
    pub fn is_clean(&self) -> bool {
        !self.created_principal
            && !self.reset_active
            && self.deduplicated_ids == 0
            && self.pruned_ids == 0
            && self.restored_memberships == 0
            && self.adopted_orphans == 0
    }
}

/// In-memory card board: cards, ordered sessions, active session.
pub struct Board {
    cards: Vec<Card>,
    sessions: Vec<Session>,
    active_session: String,
}

impl Board {
    /// Creates the default board: a single empty principal session.
    pub fn empty() -> Self {
        Self {
            cards: Vec::new(),
            sessions: vec![Session::principal()],
            active_session: PRINCIPAL_SESSION_ID.to_string(),
        }
    }

    /// Rebuilds a consistent board from raw stored records.
    ///
    /// `card.session_id` is authoritative for membership. Session lists
    /// are deduplicated, dangling ids pruned, misplaced ids moved back
    /// to the owning session's list, and cards referencing a missing
    /// session are adopted by principal. Principal is re-created if
    /// absent and always forced to index 0. The pass never fails; every
    /// repair is counted in the returned [`RepairReport`].
    pub fn from_records(
        mut cards: Vec<Card>,
        mut sessions: Vec<Session>,
        active_session: Option<String>,
    ) -> (Self, RepairReport) {
        let mut report = RepairReport::default();

        // Principal first, created if missing.
        match sessions.iter().position(Session::is_principal) {
            Some(0) => {}
            Some(idx) => {
                let principal = sessions.remove(idx);
                sessions.insert(0, principal);
            }
            None => {
                sessions.insert(0, Session::principal());
                report.created_principal = true;
            }
        }

        // Cards whose session no longer exists go to principal.
        for card in &mut cards {
            if !sessions.iter().any(|s| s.id == card.session_id) {
                card.session_id = PRINCIPAL_SESSION_ID.to_string();
                report.adopted_orphans += 1;
            }
        }

        // Rebuild each session's list: keep ids that resolve to a card
        // actually owned by this session, first occurrence wins.
        for session in &mut sessions {
            let mut kept = Vec::with_capacity(session.card_ids.len());
            for &id in &session.card_ids {
                if kept.contains(&id) {
                    report.deduplicated_ids += 1;
                    continue;
                }
                match cards.iter().find(|c| c.id == id) {
                    Some(card) if card.session_id == session.id => kept.push(id),
                    Some(_) => {} // counted when appended to the owning session
                    None => report.pruned_ids += 1,
                }
            }
            session.card_ids = kept;
        }

        // Append cards missing from their owning session's list. Every
        // card resolves here because orphans were adopted above.
        for card in &cards {
            if let Some(session) = sessions.iter_mut().find(|s| s.id == card.session_id) {
                if !session.card_ids.contains(&card.id) {
                    session.card_ids.push(card.id);
                    report.restored_memberships += 1;
                }
            }
        }

        // Resolve the active-session pointer against the repaired list.
        let active = match active_session {
            Some(id) if sessions.iter().any(|s| s.id == id) => id,
            Some(_) => {
                report.reset_active = true;
                PRINCIPAL_SESSION_ID.to_string()
            }
            None => PRINCIPAL_SESSION_ID.to_string(),
        };

        (
            Self {
                cards,
                sessions,
                active_session: active,
            },
            report,
        )
    }

    // ==================== Intents ====================

    /// Creates a card in the active session and returns its id.
    ///
    /// Rejects empty/whitespace text and empty image payloads without
    /// touching either collection.
    pub fn create_card(
        &mut self,
        text: &str,
        image: Vec<u8>,
        mime_type: &str,
    ) -> Result<i64, BoardError> {
        if text.trim().is_empty() {
            return Err(BoardError::EmptyText);
        }
        if image.is_empty() {
            return Err(BoardError::MissingImage);
        }

        let id = self.next_card_id();
        let session_id = self.active_session.clone();
        let session = self
            .session_mut(&session_id)
            .ok_or_else(|| BoardError::UnknownSession(session_id.clone()))?;
        session.card_ids.push(id);

        self.cards.push(Card {
            id,
            text: text.trim().to_string(),
            image,
            mime_type: mime_type.to_string(),
            session_id,
            created_at: Utc::now(),
        });

        Ok(id)
    }

    /// Creates a session, inserted immediately after principal.
    pub fn create_session(&mut self, name: &str) -> Result<&Session, BoardError> {
        if name.trim().is_empty() {
            return Err(BoardError::BlankSessionName);
        }

        let session = Session {
            id: self.next_session_id(),
            name: name.trim().to_string(),
            card_ids: Vec::new(),
            created_at: Utc::now(),
        };
        self.sessions.insert(1, session);
        Ok(&self.sessions[1])
    }

    /// Moves a card out of the active session into the target session.
    ///
    /// A card that is not actually in the active session is invalid
    /// input and is rejected rather than silently moved.
    pub fn move_card(&mut self, card_id: i64, target_id: &str) -> Result<(), BoardError> {
        if self.card(card_id).is_none() {
            return Err(BoardError::UnknownCard(card_id));
        }
        if self.session(target_id).is_none() {
            return Err(BoardError::UnknownSession(target_id.to_string()));
        }

        let source_id = self.active_session.clone();
        let in_active = self
            .session(&source_id)
            .is_some_and(|s| s.card_ids.contains(&card_id));
        if !in_active {
            return Err(BoardError::CardNotInActiveSession(card_id, source_id));
        }
        if target_id == source_id {
            return Err(BoardError::CardAlreadyInSession(card_id, source_id));
        }

        if let Some(source) = self.session_mut(&source_id) {
            source.card_ids.retain(|&id| id != card_id);
        }
        if let Some(target) = self.session_mut(target_id) {
            if !target.card_ids.contains(&card_id) {
                target.card_ids.push(card_id);
            }
        }
        if let Some(card) = self.card_mut(card_id) {
            card.session_id = target_id.to_string();
        }

        Ok(())
    }

    /// Deletes a card.
    ///
    /// The id is stripped from every session's list, not only the
    /// owner's, so a stale dual reference cannot survive the delete.
    pub fn delete_card(&mut self, card_id: i64) -> Result<Card, BoardError> {
        let idx = self
            .cards
            .iter()
            .position(|c| c.id == card_id)
            .ok_or(BoardError::UnknownCard(card_id))?;
        let card = self.cards.remove(idx);

        for session in &mut self.sessions {
            session.card_ids.retain(|&id| id != card_id);
        }

        Ok(card)
    }

    /// Deletes a session, cascading its cards to principal.
    ///
    /// Member cards are reassigned, never deleted. Returns how many
    /// cards were moved. If the deleted session was active, the active
    /// session switches to principal.
    pub fn delete_session(&mut self, session_id: &str) -> Result<usize, BoardError> {
        if session_id == PRINCIPAL_SESSION_ID {
            return Err(BoardError::PrincipalImmutable);
        }
        let idx = self
            .sessions
            .iter()
            .position(|s| s.id == session_id)
            .ok_or_else(|| BoardError::UnknownSession(session_id.to_string()))?;

        let removed = self.sessions.remove(idx);
        let mut moved = 0;

        // Merge the removed list into principal in order, then sweep for
        // cards the list missed (stale dual reference).
        for card_id in removed.card_ids {
            if self.cards.iter().any(|c| c.id == card_id) {
                self.adopt_into_principal(card_id);
                moved += 1;
            }
        }
        let stragglers: Vec<i64> = self
            .cards
            .iter()
            .filter(|c| c.session_id == removed.id)
            .map(|c| c.id)
            .collect();
        for card_id in stragglers {
            self.adopt_into_principal(card_id);
            moved += 1;
        }

        if self.active_session == removed.id {
            self.active_session = PRINCIPAL_SESSION_ID.to_string();
        }

        Ok(moved)
    }

    /// Swaps a session with its neighbor in the given direction.
    ///
    /// Returns `Ok(false)` for the no-op cases: principal itself, a
    /// left move from the leftmost non-principal position, or a right
    /// move from the last position.
    pub fn reorder_session(
        &mut self,
        session_id: &str,
        direction: Direction,
    ) -> Result<bool, BoardError> {
        let idx = self
            .sessions
            .iter()
            .position(|s| s.id == session_id)
            .ok_or_else(|| BoardError::UnknownSession(session_id.to_string()))?;

        if idx == 0 {
            return Ok(false);
        }
        let target = match direction {
            Direction::Left if idx > 1 => idx - 1,
            Direction::Right if idx + 1 < self.sessions.len() => idx + 1,
            _ => return Ok(false),
        };

        self.sessions.swap(idx, target);
        Ok(true)
    }

    /// Selects the active session.
    pub fn set_active(&mut self, session_id: &str) -> Result<(), BoardError> {
        if self.session(session_id).is_none() {
            return Err(BoardError::UnknownSession(session_id.to_string()));
        }
        self.active_session = session_id.to_string();
        Ok(())
    }

    // ==================== Accessors ====================

    /// All sessions, principal first.
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// All cards.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Id of the active session.
    pub fn active_session(&self) -> &str {
        &self.active_session
    }

    /// Looks up a session by exact id.
    pub fn session(&self, session_id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == session_id)
    }

    /// Looks up a card by id.
    pub fn card(&self, card_id: i64) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == card_id)
    }

    /// Cards of a session, in the session's list order.
    pub fn cards_in(&self, session_id: &str) -> Result<Vec<&Card>, BoardError> {
        let session = self
            .session(session_id)
            .ok_or_else(|| BoardError::UnknownSession(session_id.to_string()))?;
        Ok(session
            .card_ids
            .iter()
            .filter_map(|&id| self.card(id))
            .collect())
    }

    // ==================== Internals ====================

    fn session_mut(&mut self, session_id: &str) -> Option<&mut Session> {
        self.sessions.iter_mut().find(|s| s.id == session_id)
    }

    fn card_mut(&mut self, card_id: i64) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| c.id == card_id)
    }

    fn adopt_into_principal(&mut self, card_id: i64) {
        if let Some(card) = self.card_mut(card_id) {
            card.session_id = PRINCIPAL_SESSION_ID.to_string();
        }
        if let Some(principal) = self.session_mut(PRINCIPAL_SESSION_ID) {
            if !principal.card_ids.contains(&card_id) {
                principal.card_ids.push(card_id);
            }
        }
    }

    /// Timestamp-derived card id, bumped past the current maximum so
    /// rapid creations stay unique and strictly increasing.
    fn next_card_id(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        match self.cards.iter().map(|c| c.id).max() {
            Some(max) if now <= max => max + 1,
            _ => now,
        }
    }

    /// Timestamp-derived session id with the same collision bump.
    fn next_session_id(&self) -> String {
        let now = Utc::now().timestamp_millis();
        let max = self
            .sessions
            .iter()
            .filter_map(|s| s.id.parse::<i64>().ok())
            .max();
        match max {
            Some(m) if now <= m => (m + 1).to_string(),
            _ => now.to_string(),
        }
    }
}
