// Store seams
//
// The chat core talks to its collaborators through these traits so the
// backing store (DynamoDB, SQLite, in-memory) stays swappable.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::types::{ChatTurn, CrisisEvent, UserProfile};

/// Read-only access to user profiles, keyed by subject identifier.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch a profile. `Ok(None)` means the subject does not exist; that is
    /// an expected absence, not an error.
    async fn get(&self, subject_id: &str) -> Result<Option<UserProfile>>;
}

/// Append-only chat history, keyed by subject + timestamp for ordering.
#[async_trait]
pub trait ChatHistoryStore: Send + Sync {
    async fn append(&self, turn: ChatTurn) -> Result<()>;

    /// Turns for a subject in ascending timestamp order.
    async fn list(&self, subject_id: &str) -> Result<Vec<ChatTurn>>;
}

/// Append-only crisis event audit log with one permitted in-place update.
#[async_trait]
pub trait CrisisEventStore: Send + Sync {
    async fn record(&self, event: CrisisEvent) -> Result<()>;

    /// Flip `user_confirmed_safe` to true on the event keyed by
    /// (subject_id, created_at), stamping the resolution time. No-op on a
    /// record that is already resolved.
    async fn confirm_safe(
        &self,
        subject_id: &str,
        created_at: DateTime<Utc>,
        confirmed_at: DateTime<Utc>,
    ) -> Result<()>;

    /// Events for a subject in ascending creation order.
    async fn list(&self, subject_id: &str) -> Result<Vec<CrisisEvent>>;
}
