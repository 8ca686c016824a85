//! Types shared across the chat engine: intents, slots, sessions, turns.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use krishi_core::types::Season;

/// What the user is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    PredictGroundwater,
    RecommendCrop,
    Greeting,
    Unknown,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::PredictGroundwater => "predict_groundwater",
            Intent::RecommendCrop => "recommend_crop",
            Intent::Greeting => "greeting",
            Intent::Unknown => "unknown",
        }
    }
}

/// Slots pulled out of a single utterance.
///
/// Absence is `None`, never an error. District and month are lowercase
/// vocabulary labels; season is always derived from the month.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedSlots {
    pub district: Option<String>,
    pub month: Option<String>,
    pub season: Option<Season>,
    pub year: Option<i32>,
}

/// Slots after memory fallback; what the responder consumes.
///
/// Year always resolves (extracted, remembered, or the current calendar
/// year); the other slots stay optional and trigger guidance when missing.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveSlots {
    pub district: Option<String>,
    pub month: Option<String>,
    pub season: Option<Season>,
    pub year: i32,
}

/// Last successfully resolved slots, carried across turns in one session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionMemory {
    pub district: Option<String>,
    pub month: Option<String>,
    pub season: Option<Season>,
    pub year: Option<i32>,
}

impl SessionMemory {
    /// Partial update: only non-null extracted fields overwrite memory.
    pub fn absorb(&mut self, extracted: &ExtractedSlots) {
        if let Some(ref district) = extracted.district {
            self.district = Some(district.clone());
        }
        if let Some(ref month) = extracted.month {
            self.month = Some(month.clone());
            // Season travels with the month it was derived from.
            self.season = extracted.season;
        }
        if let Some(year) = extracted.year {
            self.year = Some(year);
        }
    }
}

/// One conversation session. Exclusively owned by one user's interaction;
/// discarded when the session expires or is deleted.
#[derive(Debug, Clone)]
pub struct ChatSession {
    pub id: Uuid,
    pub started_at: i64,
    pub last_message_at: i64,
    pub memory: SessionMemory,
    pub message_count: u64,
}

/// One transcript entry. `role` is "user" or "assistant".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub text: String,
    pub created_at: i64,
}

/// Session metadata for listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSessionSummary {
    pub id: Uuid,
    pub started_at: String,
    pub last_message_at: String,
    pub message_count: u64,
}

/// The responder's output for one turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub text: String,
    pub intent: Intent,
}
