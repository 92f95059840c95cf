//! Core data models for Comunica
//!
//! These represent the two persisted record collections: visual cards
//! and the sessions that group them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reserved id of the default/home session.
///
/// The principal session always exists, is always first in the session
/// order, and can never be deleted.
pub const PRINCIPAL_SESSION_ID: &str = "principal";

/// A Card is a single image+text communication unit.
///
/// Selecting a card triggers text-to-speech playback of its text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// Unique timestamp-derived identifier (epoch milliseconds,
    /// bumped past the current maximum on collision)
    pub id: i64,

    /// The text spoken when the card is selected (e.g., "Quero água")
    pub text: String,

    /// Binary image payload (base64 in JSON output)
    #[serde(with = "image_payload")]
    pub image: Vec<u8>,

    /// MIME type of the image payload (e.g., "image/jpeg")
    pub mime_type: String,

    /// Id of the owning session
    pub session_id: String,

    /// When the card was created
    pub created_at: DateTime<Utc>,
}

/// A Session is a named, ordered grouping of cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Session identifier; "principal" is reserved for the home session,
    /// user sessions get a timestamp-derived id
    pub id: String,

    /// Display name
    pub name: String,

    /// Ordered ids of the member cards
    pub card_ids: Vec<i64>,

    /// When the session was created
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Creates the principal session with no cards.
    pub fn principal() -> Self {
        Self {
            id: PRINCIPAL_SESSION_ID.to_string(),
            name: "Principal".to_string(),
            card_ids: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Whether this is the reserved principal session.
    pub fn is_principal(&self) -> bool {
        self.id == PRINCIPAL_SESSION_ID
    }
}

/// Serializes the image payload as base64 text in JSON output,
/// mirroring the data-URL encoding used by browser exports.
mod image_payload {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}
