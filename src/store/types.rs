// Domain records persisted by (or read from) the stores

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Name and phone pair from the user's onboarding profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub name: String,
    pub phone: String,
}

/// User profile, read-only from the chat core's perspective.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Subject identifier (the authenticated identity)
    pub subject_id: String,
    /// Display name collected at onboarding
    pub user_name: String,
    /// Companion display name the user chose
    pub companion_name: String,
    /// Free-text primary diagnosis, drives framework selection
    pub primary_diagnosis: String,
    /// Optional emergency contacts shown in crisis responses
    #[serde(default)]
    pub emergency_contacts: Vec<EmergencyContact>,
    /// Optional local crisis resources text
    #[serde(default)]
    pub local_crisis_resources: Option<String>,
}

/// Which path produced a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnKind {
    Crisis,
    SafetyConfirmation,
    Normal,
}

/// One persisted request/response pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub subject_id: String,
    pub timestamp: DateTime<Utc>,
    pub user_message: String,
    pub assistant_reply: String,
    pub kind: TurnKind,
    /// Framework used, present on normal turns only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<crate::framework::Framework>,
    /// Keywords that triggered a crisis turn
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub crisis_keywords: Vec<String>,
}

/// Durable audit record of one crisis detection and its resolution.
/// Keyed by (subject_id, created_at). Append-only: the single permitted
/// mutation is the one-shot false -> true flip of `user_confirmed_safe`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrisisEvent {
    pub subject_id: String,
    pub created_at: DateTime<Utc>,
    /// Message text truncated for privacy
    pub message: String,
    pub detected_keywords: Vec<String>,
    pub response_given: String,
    pub user_confirmed_safe: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety_confirmed_at: Option<DateTime<Utc>>,
    /// After this instant the record may be purged
    pub expires_at: DateTime<Utc>,
}

/// Character cap applied to stored crisis message text.
pub const CRISIS_MESSAGE_CAP: usize = 500;

/// Retention window for crisis events.
pub const CRISIS_RETENTION_DAYS: i64 = 90;

impl CrisisEvent {
    /// Build a new unresolved event, truncating the message for privacy and
    /// stamping the retention expiry.
    pub fn new(
        subject_id: &str,
        created_at: DateTime<Utc>,
        message: &str,
        detected_keywords: Vec<String>,
        response_given: &str,
    ) -> Self {
        Self {
            subject_id: subject_id.to_string(),
            created_at,
            message: truncate_chars(message, CRISIS_MESSAGE_CAP),
            detected_keywords,
            response_given: response_given.to_string(),
            user_confirmed_safe: false,
            safety_confirmed_at: None,
            expires_at: created_at + Duration::days(CRISIS_RETENTION_DAYS),
        }
    }
}

/// Truncate to at most `cap` characters, respecting char boundaries.
pub fn truncate_chars(text: &str, cap: usize) -> String {
    text.chars().take(cap).collect()
}
