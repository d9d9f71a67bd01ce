// Response dispatcher
//
// Orders every turn the same way: validate, detect crisis, handle any
// pending safety follow-up, then fall through to normal framework-driven
// conversation. Crisis detection always runs first and short-circuits
// everything else.

use anyhow::Result;
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use thiserror::Error;

use crate::crisis;
use crate::framework::Framework;
use crate::responder::TherapeuticResponder;
use crate::store::{
    ChatHistoryStore, ChatTurn, CrisisEvent, CrisisEventStore, ProfileStore, TurnKind,
    UserProfile,
};

use super::safety::SafetyState;
use super::sessions::SessionManager;

/// Maximum accepted message length, in characters.
pub const DEFAULT_MAX_MESSAGE_CHARS: usize = 2000;

/// Errors surfaced to the chat endpoint.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Message is required")]
    EmptyMessage,
    #[error("Message is too long (max {max} characters)")]
    MessageTooLong { max: usize },
    #[error("Profile not found for subject")]
    ProfileNotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Result of handling one turn.
#[derive(Debug, Clone)]
pub struct ChatOutcome {
    pub reply: String,
    pub is_crisis: bool,
    pub crisis_resolved: bool,
    pub still_in_crisis_mode: bool,
    /// Framework used, present on normal turns
    pub framework: Option<Framework>,
}

impl ChatOutcome {
    fn reply(reply: String) -> Self {
        Self {
            reply,
            is_crisis: false,
            crisis_resolved: false,
            still_in_crisis_mode: false,
            framework: None,
        }
    }
}

/// The chat core: validation, crisis pipeline, safety follow-up, and
/// dispatch to the therapeutic responder.
pub struct ChatEngine {
    profiles: Arc<dyn ProfileStore>,
    history: Arc<dyn ChatHistoryStore>,
    crisis_events: Arc<dyn CrisisEventStore>,
    responder: Arc<dyn TherapeuticResponder>,
    sessions: Arc<SessionManager>,
    max_message_chars: usize,
}

impl ChatEngine {
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        history: Arc<dyn ChatHistoryStore>,
        crisis_events: Arc<dyn CrisisEventStore>,
        responder: Arc<dyn TherapeuticResponder>,
        sessions: Arc<SessionManager>,
        max_message_chars: usize,
    ) -> Self {
        Self {
            profiles,
            history,
            crisis_events,
            responder,
            sessions,
            max_message_chars,
        }
    }

    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    /// Handle one incoming message for an authenticated subject.
    pub async fn handle_message(
        &self,
        subject_id: &str,
        message: &str,
    ) -> Result<ChatOutcome, ChatError> {
        if message.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if message.chars().count() > self.max_message_chars {
            return Err(ChatError::MessageTooLong {
                max: self.max_message_chars,
            });
        }

        tracing::debug!(
            subject = %subject_id,
            message_hash = %hash_for_log(message),
            "Handling chat turn"
        );

        // Crisis detection runs before anything else, every turn. A fresh
        // crisis short-circuits the follow-up state machine too.
        let detection = crisis::classify(message);
        if detection.is_crisis {
            tracing::warn!(
                subject = %subject_id,
                keywords = ?detection.keywords,
                "Crisis detected"
            );
            return self
                .crisis_turn(subject_id, message, detection.keywords)
                .await;
        }

        if let Some(crisis_at) = self.sessions.safety_state(subject_id).pending_crisis_at() {
            return self.follow_up_turn(subject_id, message, crisis_at).await;
        }

        self.normal_turn(subject_id, message).await
    }

    /// Crisis path: compose the fixed response, record the audit event,
    /// persist the turn, and arm the safety follow-up.
    async fn crisis_turn(
        &self,
        subject_id: &str,
        message: &str,
        keywords: Vec<String>,
    ) -> Result<ChatOutcome, ChatError> {
        let profile = self.load_profile(subject_id).await?;
        let response = crisis::compose_crisis_response(&profile);
        let now = Utc::now();

        // The audit trail is awaited before responding, but its failure
        // never withholds the response already composed.
        let event = CrisisEvent::new(subject_id, now, message, keywords.clone(), &response);
        if let Err(e) = self.crisis_events.record(event).await {
            tracing::error!(subject = %subject_id, error = %e, "Failed to record crisis event");
        }

        self.spawn_history_write(ChatTurn {
            subject_id: subject_id.to_string(),
            timestamp: now,
            user_message: message.to_string(),
            assistant_reply: response.clone(),
            kind: TurnKind::Crisis,
            framework: None,
            crisis_keywords: keywords,
        });

        self.sessions
            .set_safety_state(subject_id, SafetyState::AwaitingConfirmation { crisis_at: now });

        Ok(ChatOutcome {
            is_crisis: true,
            ..ChatOutcome::reply(response)
        })
    }

    /// Safety follow-up path, entered when the previous turn was a crisis
    /// and the current message is not itself crisis-positive.
    async fn follow_up_turn(
        &self,
        subject_id: &str,
        message: &str,
        crisis_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<ChatOutcome, ChatError> {
        if crisis::is_safety_confirmation(message) {
            tracing::info!(subject = %subject_id, "Subject confirmed safety");

            // Best-effort resolution of the triggering event.
            let confirmed_at = Utc::now();
            if let Err(e) = self
                .crisis_events
                .confirm_safe(subject_id, crisis_at, confirmed_at)
                .await
            {
                tracing::error!(
                    subject = %subject_id,
                    error = %e,
                    "Could not update safety confirmation"
                );
            }

            self.sessions.clear_safety_state(subject_id);

            let profile = self.load_profile(subject_id).await?;
            let reply = crisis::compose_safety_confirmed(&profile);

            self.spawn_history_write(ChatTurn {
                subject_id: subject_id.to_string(),
                timestamp: confirmed_at,
                user_message: message.to_string(),
                assistant_reply: reply.clone(),
                kind: TurnKind::SafetyConfirmation,
                framework: None,
                crisis_keywords: vec![],
            });

            return Ok(ChatOutcome {
                crisis_resolved: true,
                ..ChatOutcome::reply(reply)
            });
        }

        if crisis::is_safety_negation(message) {
            // The subject says they are not safe: re-escalate to the crisis
            // path with the negation as the recorded signal, keeping the
            // session in follow-up mode against the new event.
            tracing::warn!(subject = %subject_id, "Subject denied being safe, re-escalating");
            let keyword = if message.to_lowercase().contains("not safe") {
                "not safe"
            } else {
                "no"
            };
            let mut outcome = self
                .crisis_turn(subject_id, message, vec![keyword.to_string()])
                .await?;
            outcome.still_in_crisis_mode = true;
            return Ok(outcome);
        }

        // Neither confirmation nor negation: re-ask the assessment and keep
        // waiting. Nothing is persisted for this turn.
        Ok(ChatOutcome {
            still_in_crisis_mode: true,
            ..ChatOutcome::reply(crisis::compose_safety_assessment())
        })
    }

    /// Normal path: framework selection and the therapeutic responder.
    async fn normal_turn(&self, subject_id: &str, message: &str) -> Result<ChatOutcome, ChatError> {
        let profile = self.load_profile(subject_id).await?;
        let framework = Framework::for_diagnosis(&profile.primary_diagnosis);

        let reply = self
            .responder
            .respond(message, framework, &profile)
            .await
            .map_err(ChatError::Internal)?;

        self.spawn_history_write(ChatTurn {
            subject_id: subject_id.to_string(),
            timestamp: Utc::now(),
            user_message: message.to_string(),
            assistant_reply: reply.clone(),
            kind: TurnKind::Normal,
            framework: Some(framework),
            crisis_keywords: vec![],
        });

        // A completed normal turn clears any stale follow-up state.
        self.sessions.clear_safety_state(subject_id);

        Ok(ChatOutcome {
            framework: Some(framework),
            ..ChatOutcome::reply(reply)
        })
    }

    async fn load_profile(&self, subject_id: &str) -> Result<UserProfile, ChatError> {
        self.profiles
            .get(subject_id)
            .await
            .map_err(ChatError::Internal)?
            .ok_or(ChatError::ProfileNotFound)
    }

    /// Fire-and-forget chat-history write. The user-facing path never
    /// blocks on or fails because of history storage.
    fn spawn_history_write(&self, turn: ChatTurn) {
        let history = Arc::clone(&self.history);
        tokio::spawn(async move {
            if let Err(e) = history.append(turn).await {
                tracing::error!(error = %e, "Failed to store chat turn");
            }
        });
    }
}

/// Short digest of message text for log lines; raw text stays out of logs.
fn hash_for_log(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    digest
        .iter()
        .take(8)
        .map(|b| format!("{b:02x}"))
        .collect()
}
