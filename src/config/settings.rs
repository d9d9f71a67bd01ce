// Configuration structs

use serde::Deserialize;

/// Server-wide settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bind address (e.g., "127.0.0.1:8080")
    pub bind_address: String,
    /// Session timeout in minutes; expiry implicitly clears safety state
    pub session_timeout_minutes: u64,
    /// Maximum accepted chat message length, in characters
    pub max_message_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            session_timeout_minutes: 30,
            max_message_chars: 2000,
        }
    }
}
