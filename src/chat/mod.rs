// Chat module
// Safety state machine, session management, and the response dispatcher

mod engine;
mod safety;
mod sessions;

pub use engine::{ChatEngine, ChatError, ChatOutcome, DEFAULT_MAX_MESSAGE_CHARS};
pub use safety::SafetyState;
pub use sessions::{Session, SessionManager};
