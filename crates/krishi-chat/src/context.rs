//! Session lifecycle and slot resolution across turns.
//!
//! Session memory keeps the last resolved slots so follow-ups like
//! "what about October?" inherit the district from an earlier turn.

use chrono::{Datelike, Local};
use uuid::Uuid;

use crate::types::{ChatSession, EffectiveSlots, ExtractedSlots, SessionMemory};

// =============================================================================
// SessionManager
// =============================================================================

/// Creates, expires, and updates chat sessions.
pub struct SessionManager {
    /// Session timeout in minutes.
    pub session_timeout_minutes: u32,
}

impl SessionManager {
    /// Create a new `SessionManager`.
    pub fn new(session_timeout_minutes: u32) -> Self {
        Self {
            session_timeout_minutes,
        }
    }

    /// Create a fresh session with empty memory.
    pub fn create_session(&self) -> ChatSession {
        let now = Local::now().timestamp();
        ChatSession {
            id: Uuid::new_v4(),
            started_at: now,
            last_message_at: now,
            memory: SessionMemory::default(),
            message_count: 0,
        }
    }

    /// Whether a session has been idle past the configured timeout.
    pub fn is_expired(&self, session: &ChatSession) -> bool {
        let now = Local::now().timestamp();
        let timeout_secs = i64::from(self.session_timeout_minutes) * 60;
        now - session.last_message_at > timeout_secs
    }

    /// Record one turn against a session: bump counters and fold the
    /// extracted slots into memory (non-null fields only).
    pub fn note_turn(&self, session: &mut ChatSession, extracted: &ExtractedSlots) {
        session.last_message_at = Local::now().timestamp();
        session.message_count += 1;
        session.memory.absorb(extracted);
    }
}

// =============================================================================
// SlotResolver
// =============================================================================

/// Fills slots the current utterance left empty from session memory.
pub struct SlotResolver;

impl SlotResolver {
    /// Per slot: extracted value if present, else remembered value, else
    /// none. Month and season resolve as a pair so the season always belongs
    /// to the month actually in effect. The year has a final fallback to the
    /// current calendar year.
    pub fn resolve(&self, extracted: &ExtractedSlots, memory: &SessionMemory) -> EffectiveSlots {
        let district = extracted
            .district
            .clone()
            .or_else(|| memory.district.clone());

        let (month, season) = match &extracted.month {
            Some(month) => (Some(month.clone()), extracted.season),
            None => (memory.month.clone(), memory.season),
        };

        let year = extracted
            .year
            .or(memory.year)
            .unwrap_or_else(current_year);

        EffectiveSlots {
            district,
            month,
            season,
            year,
        }
    }
}

/// The current calendar year.
pub fn current_year() -> i32 {
    Local::now().year()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use krishi_core::types::Season;

    fn manager() -> SessionManager {
        SessionManager::new(30)
    }

    fn full_memory() -> SessionMemory {
        SessionMemory {
            district: Some("tirupati".to_string()),
            month: Some("july".to_string()),
            season: Some(Season::Monsoon),
            year: Some(2024),
        }
    }

    // ---- Session creation ----

    #[test]
    fn test_create_session_fresh() {
        let session = manager().create_session();
        assert_ne!(session.id, Uuid::nil());
        assert_eq!(session.message_count, 0);
        assert_eq!(session.memory, SessionMemory::default());
    }

    #[test]
    fn test_create_session_timestamps() {
        let session = manager().create_session();
        let now = Local::now().timestamp();
        assert!((session.started_at - now).abs() < 2);
        assert!((session.last_message_at - now).abs() < 2);
    }

    #[test]
    fn test_sessions_have_distinct_ids() {
        let mgr = manager();
        assert_ne!(mgr.create_session().id, mgr.create_session().id);
    }

    // ---- Session expiry ----

    #[test]
    fn test_session_not_expired_when_fresh() {
        let mgr = manager();
        let session = mgr.create_session();
        assert!(!mgr.is_expired(&session));
    }

    #[test]
    fn test_session_expired_past_timeout() {
        let mgr = manager();
        let mut session = mgr.create_session();
        session.last_message_at = Local::now().timestamp() - 31 * 60;
        assert!(mgr.is_expired(&session));
    }

    #[test]
    fn test_session_exactly_at_timeout_not_expired() {
        let mgr = manager();
        let mut session = mgr.create_session();
        session.last_message_at = Local::now().timestamp() - 30 * 60;
        assert!(!mgr.is_expired(&session));
    }

    #[test]
    fn test_session_one_second_over_timeout() {
        let mgr = manager();
        let mut session = mgr.create_session();
        session.last_message_at = Local::now().timestamp() - 30 * 60 - 1;
        assert!(mgr.is_expired(&session));
    }

    // ---- note_turn ----

    #[test]
    fn test_note_turn_increments_count() {
        let mgr = manager();
        let mut session = mgr.create_session();
        mgr.note_turn(&mut session, &ExtractedSlots::default());
        mgr.note_turn(&mut session, &ExtractedSlots::default());
        assert_eq!(session.message_count, 2);
    }

    #[test]
    fn test_note_turn_updates_memory() {
        let mgr = manager();
        let mut session = mgr.create_session();
        mgr.note_turn(
            &mut session,
            &ExtractedSlots {
                district: Some("kadapa".to_string()),
                month: None,
                season: None,
                year: None,
            },
        );
        assert_eq!(session.memory.district.as_deref(), Some("kadapa"));
        assert_eq!(session.memory.month, None);
    }

    #[test]
    fn test_note_turn_keeps_unextracted_memory() {
        let mgr = manager();
        let mut session = mgr.create_session();
        session.memory = full_memory();
        mgr.note_turn(
            &mut session,
            &ExtractedSlots {
                district: None,
                month: Some("october".to_string()),
                season: Some(Season::Winter),
                year: None,
            },
        );
        assert_eq!(session.memory.district.as_deref(), Some("tirupati"));
        assert_eq!(session.memory.month.as_deref(), Some("october"));
        assert_eq!(session.memory.season, Some(Season::Winter));
        assert_eq!(session.memory.year, Some(2024));
    }

    // ---- Slot resolution ----

    #[test]
    fn test_resolve_prefers_extracted() {
        let resolver = SlotResolver;
        let extracted = ExtractedSlots {
            district: Some("kadapa".to_string()),
            month: Some("march".to_string()),
            season: Some(Season::Summer),
            year: Some(2026),
        };
        let effective = resolver.resolve(&extracted, &full_memory());
        assert_eq!(effective.district.as_deref(), Some("kadapa"));
        assert_eq!(effective.month.as_deref(), Some("march"));
        assert_eq!(effective.season, Some(Season::Summer));
        assert_eq!(effective.year, 2026);
    }

    #[test]
    fn test_resolve_falls_back_to_memory() {
        let resolver = SlotResolver;
        let effective = resolver.resolve(&ExtractedSlots::default(), &full_memory());
        assert_eq!(effective.district.as_deref(), Some("tirupati"));
        assert_eq!(effective.month.as_deref(), Some("july"));
        assert_eq!(effective.season, Some(Season::Monsoon));
        assert_eq!(effective.year, 2024);
    }

    #[test]
    fn test_resolve_mixes_extracted_and_memory() {
        // New month, remembered district.
        let resolver = SlotResolver;
        let extracted = ExtractedSlots {
            district: None,
            month: Some("october".to_string()),
            season: Some(Season::Winter),
            year: None,
        };
        let effective = resolver.resolve(&extracted, &full_memory());
        assert_eq!(effective.district.as_deref(), Some("tirupati"));
        assert_eq!(effective.month.as_deref(), Some("october"));
        assert_eq!(effective.season, Some(Season::Winter));
    }

    #[test]
    fn test_resolve_season_pairs_with_extracted_month() {
        // An extracted month never inherits the remembered season.
        let resolver = SlotResolver;
        let extracted = ExtractedSlots {
            district: None,
            month: Some("march".to_string()),
            season: Some(Season::Summer),
            year: None,
        };
        let effective = resolver.resolve(&extracted, &full_memory());
        assert_eq!(effective.season, Some(Season::Summer));
    }

    #[test]
    fn test_resolve_empty_everything() {
        let resolver = SlotResolver;
        let effective = resolver.resolve(&ExtractedSlots::default(), &SessionMemory::default());
        assert_eq!(effective.district, None);
        assert_eq!(effective.month, None);
        assert_eq!(effective.season, None);
        assert_eq!(effective.year, current_year());
    }

    #[test]
    fn test_resolve_year_defaults_to_current() {
        let resolver = SlotResolver;
        let mut memory = full_memory();
        memory.year = None;
        let effective = resolver.resolve(&ExtractedSlots::default(), &memory);
        assert_eq!(effective.year, current_year());
    }
}
