// Store module
// Domain records, store traits, and in-memory implementations

mod memory;
mod traits;
mod types;

pub use memory::{MemoryChatHistory, MemoryCrisisEvents, MemoryProfileStore};
pub use traits::{ChatHistoryStore, CrisisEventStore, ProfileStore};
pub use types::{
    truncate_chars, ChatTurn, CrisisEvent, EmergencyContact, TurnKind, UserProfile,
    CRISIS_MESSAGE_CAP, CRISIS_RETENTION_DAYS,
};
