//! Chat orchestrator: central coordinator wiring parser, context, and
//! response generation.
//!
//! Owns sessions and transcripts, routes each utterance through the
//! slot-filling pipeline, and returns the rendered reply.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, TimeZone};
use uuid::Uuid;

use krishi_core::config::{AdvisorConfig, ChatConfig};
use krishi_model::ModelRegistry;

use crate::context::{SessionManager, SlotResolver};
use crate::error::ChatError;
use crate::parser::UtteranceParser;
use crate::response::AdvisoryComposer;
use crate::types::{ChatReply, ChatSession, ChatSessionSummary, ChatTurn};

/// Central chat orchestrator for the slot-filling responder.
pub struct ChatOrchestrator {
    parser: UtteranceParser,
    session_manager: SessionManager,
    resolver: SlotResolver,
    composer: AdvisoryComposer,
    models: Arc<ModelRegistry>,
    sessions: Mutex<HashMap<Uuid, ChatSession>>,
    transcripts: Mutex<HashMap<Uuid, Vec<ChatTurn>>>,
    config: ChatConfig,
}

impl ChatOrchestrator {
    /// Create a new orchestrator.
    pub fn new(config: ChatConfig, advisor: AdvisorConfig, models: Arc<ModelRegistry>) -> Self {
        let parser = UtteranceParser::new(config.match_threshold);
        let session_manager = SessionManager::new(config.session_timeout_minutes);
        let composer = AdvisoryComposer::new(advisor);

        Self {
            parser,
            session_manager,
            resolver: SlotResolver,
            composer,
            models,
            sessions: Mutex::new(HashMap::new()),
            transcripts: Mutex::new(HashMap::new()),
            config,
        }
    }

    /// Handle one incoming utterance.
    ///
    /// Returns the generated reply and the session ID (new or existing).
    pub fn handle_message(
        &self,
        message: &str,
        session_id: Option<Uuid>,
    ) -> Result<(ChatReply, Uuid), ChatError> {
        if !self.config.enabled {
            return Err(ChatError::Disabled);
        }
        if message.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if message.len() > self.config.max_message_length {
            return Err(ChatError::MessageTooLong(self.config.max_message_length));
        }

        let sid = self.resolve_session(session_id)?;

        let intent = self.parser.classify_intent(message);
        let extracted = self.parser.extract_slots(
            message,
            self.models.districts.labels(),
            self.models.months.labels(),
        );
        tracing::debug!(
            intent = intent.as_str(),
            district = extracted.district.as_deref(),
            month = extracted.month.as_deref(),
            "Utterance parsed"
        );

        // Resolve against the session's memory snapshot.
        let memory = {
            let sessions = self
                .sessions
                .lock()
                .map_err(|e| ChatError::State(format!("session lock poisoned: {}", e)))?;
            sessions
                .get(&sid)
                .map(|s| s.memory.clone())
                .unwrap_or_default()
        };
        let effective = self.resolver.resolve(&extracted, &memory);

        let reply_text = self.composer.respond(intent, &effective, &self.models);

        // Append both turns to the transcript (append-only).
        let now = Local::now().timestamp();
        {
            let mut transcripts = self
                .transcripts
                .lock()
                .map_err(|e| ChatError::State(format!("transcript lock poisoned: {}", e)))?;
            let entry = transcripts.entry(sid).or_default();
            entry.push(ChatTurn {
                role: "user".to_string(),
                text: message.to_string(),
                created_at: now,
            });
            entry.push(ChatTurn {
                role: "assistant".to_string(),
                text: reply_text.clone(),
                created_at: now,
            });
        }

        // Fold extracted slots into session memory.
        {
            let mut sessions = self
                .sessions
                .lock()
                .map_err(|e| ChatError::State(format!("session lock poisoned: {}", e)))?;
            if let Some(session) = sessions.get_mut(&sid) {
                self.session_manager.note_turn(session, &extracted);
            }
        }

        Ok((
            ChatReply {
                text: reply_text,
                intent,
            },
            sid,
        ))
    }

    /// Get a session by ID.
    pub fn get_session(&self, session_id: Uuid) -> Option<ChatSession> {
        self.sessions
            .lock()
            .ok()
            .and_then(|s| s.get(&session_id).cloned())
    }

    /// List all active sessions as summaries.
    pub fn list_sessions(&self) -> Vec<ChatSessionSummary> {
        let sessions = match self.sessions.lock() {
            Ok(s) => s,
            Err(_) => return vec![],
        };
        sessions
            .values()
            .map(|s| ChatSessionSummary {
                id: s.id,
                started_at: format_epoch(s.started_at),
                last_message_at: format_epoch(s.last_message_at),
                message_count: s.message_count,
            })
            .collect()
    }

    /// Get the transcript for a session.
    pub fn get_history(&self, session_id: Uuid) -> Result<Vec<ChatTurn>, ChatError> {
        {
            let sessions = self
                .sessions
                .lock()
                .map_err(|e| ChatError::State(format!("session lock poisoned: {}", e)))?;
            if !sessions.contains_key(&session_id) {
                return Err(ChatError::SessionNotFound(session_id));
            }
        }

        let transcripts = self
            .transcripts
            .lock()
            .map_err(|e| ChatError::State(format!("transcript lock poisoned: {}", e)))?;
        Ok(transcripts.get(&session_id).cloned().unwrap_or_default())
    }

    /// Delete a session and its transcript.
    pub fn delete_session(&self, session_id: Uuid) -> Result<(), ChatError> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|e| ChatError::State(format!("session lock poisoned: {}", e)))?;
        if sessions.remove(&session_id).is_some() {
            if let Ok(mut transcripts) = self.transcripts.lock() {
                transcripts.remove(&session_id);
            }
            Ok(())
        } else {
            Err(ChatError::SessionNotFound(session_id))
        }
    }

    // -- Private helpers --

    /// Resolve an existing session or create a new one, replacing expired
    /// sessions transparently.
    fn resolve_session(&self, requested: Option<Uuid>) -> Result<Uuid, ChatError> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|e| ChatError::State(format!("session lock poisoned: {}", e)))?;

        if let Some(sid) = requested {
            if let Some(session) = sessions.get(&sid) {
                if !self.session_manager.is_expired(session) {
                    return Ok(sid);
                }
                sessions.remove(&sid);
                tracing::debug!(session_id = %sid, "Expired session replaced");
            }
        }

        let session = self.session_manager.create_session();
        let sid = session.id;
        sessions.insert(sid, session);
        Ok(sid)
    }
}

/// Format epoch seconds as an RFC 3339 string.
fn format_epoch(epoch: i64) -> String {
    Local
        .timestamp_opt(epoch, 0)
        .single()
        .map(|dt: DateTime<Local>| dt.to_rfc3339())
        .unwrap_or_else(|| epoch.to_string())
}

// =============================================================================
// Tests
// =============================================================================
