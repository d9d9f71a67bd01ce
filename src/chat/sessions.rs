// Per-subject session state for concurrent HTTP clients

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time;

use super::safety::SafetyState;

/// One subject's conversation session.
#[derive(Debug, Clone)]
pub struct Session {
    /// Subject this session belongs to
    pub subject_id: String,
    /// Safety follow-up state for the conversation
    pub safety: SafetyState,
    /// Last activity timestamp
    pub last_activity: DateTime<Utc>,
    /// Session creation time
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(subject_id: &str) -> Self {
        Self {
            subject_id: subject_id.to_string(),
            safety: SafetyState::Normal,
            last_activity: Utc::now(),
            created_at: Utc::now(),
        }
    }

    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }

    pub fn is_expired(&self, timeout_minutes: u64) -> bool {
        let elapsed = Utc::now().signed_duration_since(self.last_activity);
        elapsed.num_minutes() >= timeout_minutes as i64
    }
}

/// Concurrent session manager keyed by subject id.
///
/// Session expiry is the implicit end-of-session clear for safety state: an
/// expired session comes back as `SafetyState::Normal`.
pub struct SessionManager {
    sessions: Arc<DashMap<String, Session>>,
    timeout_minutes: u64,
}

impl SessionManager {
    pub fn new(timeout_minutes: u64) -> Self {
        let manager = Self {
            sessions: Arc::new(DashMap::new()),
            timeout_minutes,
        };
        manager.start_cleanup_task();
        manager
    }

    /// Current safety state for a subject, `Normal` if no session exists.
    pub fn safety_state(&self, subject_id: &str) -> SafetyState {
        self.sessions
            .get(subject_id)
            .map(|s| s.safety)
            .unwrap_or_default()
    }

    /// Set a subject's safety state, creating the session if needed.
    pub fn set_safety_state(&self, subject_id: &str, state: SafetyState) {
        let mut session = self
            .sessions
            .entry(subject_id.to_string())
            .or_insert_with(|| Session::new(subject_id));
        session.safety = state;
        session.touch();
    }

    /// Force a subject back to `Normal`.
    pub fn clear_safety_state(&self, subject_id: &str) {
        if let Some(mut session) = self.sessions.get_mut(subject_id) {
            session.safety = SafetyState::Normal;
            session.touch();
        }
    }

    /// Snapshot of a subject's session, if one exists.
    pub fn get(&self, subject_id: &str) -> Option<Session> {
        self.sessions.get(subject_id).map(|s| s.clone())
    }

    pub fn active_count(&self) -> usize {
        self.sessions.len()
    }

    /// Drop a subject's session entirely.
    pub fn end(&self, subject_id: &str) -> bool {
        self.sessions.remove(subject_id).is_some()
    }

    fn start_cleanup_task(&self) {
        let sessions = Arc::clone(&self.sessions);
        let timeout_minutes = self.timeout_minutes;

        tokio::spawn(async move {
            let mut interval = time::interval(Duration::from_secs(60));

            loop {
                interval.tick().await;

                let expired: Vec<String> = sessions
                    .iter()
                    .filter(|entry| entry.value().is_expired(timeout_minutes))
                    .map(|entry| entry.key().clone())
                    .collect();

                let mut removed = 0;
                for subject_id in expired {
                    if sessions.remove(&subject_id).is_some() {
                        removed += 1;
                        tracing::debug!(subject = %subject_id, "Removed expired session");
                    }
                }

                if removed > 0 {
                    tracing::info!(
                        removed,
                        active = sessions.len(),
                        "Cleaned up expired sessions"
                    );
                }
            }
        });
    }
}
