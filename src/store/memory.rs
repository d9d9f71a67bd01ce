// In-memory store implementations
//
// DashMap-backed stores for development and tests. Production deployments
// put a durable key-value store behind the same traits.

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use super::traits::{ChatHistoryStore, CrisisEventStore, ProfileStore};
use super::types::{ChatTurn, CrisisEvent, UserProfile};

/// Profiles keyed by subject id.
#[derive(Default)]
pub struct MemoryProfileStore {
    profiles: DashMap<String, UserProfile>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, profile: UserProfile) {
        self.profiles.insert(profile.subject_id.clone(), profile);
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn get(&self, subject_id: &str) -> Result<Option<UserProfile>> {
        Ok(self.profiles.get(subject_id).map(|p| p.clone()))
    }
}

/// Chat turns per subject, appended in arrival order.
#[derive(Default)]
pub struct MemoryChatHistory {
    turns: DashMap<String, Vec<ChatTurn>>,
}

impl MemoryChatHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChatHistoryStore for MemoryChatHistory {
    async fn append(&self, turn: ChatTurn) -> Result<()> {
        self.turns
            .entry(turn.subject_id.clone())
            .or_default()
            .push(turn);
        Ok(())
    }

    async fn list(&self, subject_id: &str) -> Result<Vec<ChatTurn>> {
        let mut turns = self
            .turns
            .get(subject_id)
            .map(|t| t.clone())
            .unwrap_or_default();
        turns.sort_by_key(|t| t.timestamp);
        Ok(turns)
    }
}

/// Crisis events per subject.
#[derive(Default)]
pub struct MemoryCrisisEvents {
    events: DashMap<String, Vec<CrisisEvent>>,
}

impl MemoryCrisisEvents {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CrisisEventStore for MemoryCrisisEvents {
    async fn record(&self, event: CrisisEvent) -> Result<()> {
        self.events
            .entry(event.subject_id.clone())
            .or_default()
            .push(event);
        Ok(())
    }

    async fn confirm_safe(
        &self,
        subject_id: &str,
        created_at: DateTime<Utc>,
        confirmed_at: DateTime<Utc>,
    ) -> Result<()> {
        let mut entry = match self.events.get_mut(subject_id) {
            Some(entry) => entry,
            None => bail!("No crisis events for subject"),
        };

        match entry.iter_mut().find(|e| e.created_at == created_at) {
            Some(event) => {
                if !event.user_confirmed_safe {
                    event.user_confirmed_safe = true;
                    event.safety_confirmed_at = Some(confirmed_at);
                }
                Ok(())
            }
            None => bail!("Crisis event not found at {}", created_at),
        }
    }

    async fn list(&self, subject_id: &str) -> Result<Vec<CrisisEvent>> {
        let mut events = self
            .events
            .get(subject_id)
            .map(|e| e.clone())
            .unwrap_or_default();
        events.sort_by_key(|e| e.created_at);
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::types::TurnKind;

    fn profile(subject: &str) -> UserProfile {
        UserProfile {
            subject_id: subject.to_string(),
            user_name: "Ash".to_string(),
            companion_name: "Willow".to_string(),
            primary_diagnosis: "GAD".to_string(),
            emergency_contacts: vec![],
            local_crisis_resources: None,
        }
    }

    #[tokio::test]
    async fn test_profile_roundtrip() {
        let store = MemoryProfileStore::new();
        store.insert(profile("user-1"));

        let found = store.get("user-1").await.unwrap();
        assert_eq!(found.unwrap().user_name, "Ash");
        assert!(store.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_history_ordering() {
        let store = MemoryChatHistory::new();
        let base = Utc::now();

        for offset in [2, 0, 1] {
            store
                .append(ChatTurn {
                    subject_id: "user-1".to_string(),
                    timestamp: base + chrono::Duration::seconds(offset),
                    user_message: format!("msg {offset}"),
                    assistant_reply: "ok".to_string(),
                    kind: TurnKind::Normal,
                    framework: None,
                    crisis_keywords: vec![],
                })
                .await
                .unwrap();
        }

        let turns = store.list("user-1").await.unwrap();
        assert_eq!(turns.len(), 3);
        assert!(turns.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[tokio::test]
    async fn test_confirm_safe_flips_once() {
        let store = MemoryCrisisEvents::new();
        let created = Utc::now();
        let event = CrisisEvent::new("user-1", created, "help", vec!["suicide".into()], "988");
        store.record(event).await.unwrap();

        let first = created + chrono::Duration::seconds(30);
        store.confirm_safe("user-1", created, first).await.unwrap();

        // A second confirmation must not move the resolution timestamp.
        let later = created + chrono::Duration::seconds(90);
        store.confirm_safe("user-1", created, later).await.unwrap();

        let events = store.list("user-1").await.unwrap();
        assert!(events[0].user_confirmed_safe);
        assert_eq!(events[0].safety_confirmed_at, Some(first));
    }

    #[tokio::test]
    async fn test_confirm_safe_unknown_event_errors() {
        let store = MemoryCrisisEvents::new();
        let result = store.confirm_safe("user-1", Utc::now(), Utc::now()).await;
        assert!(result.is_err());
    }
}
