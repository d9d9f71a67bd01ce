// Crisis classifier
//
// Reduces matched signals to a boolean crisis flag with the matched
// keywords as evidence. Zero-tolerance OR: a single signal escalates, and
// no signal type is ever downgraded.

use serde::{Deserialize, Serialize};

use super::matcher::{match_signals, CrisisSignal};

/// Result of classifying one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrisisDetectionResult {
    /// True iff at least one signal fired
    pub is_crisis: bool,
    /// Canonical matched keywords, insertion order, no duplicates
    pub keywords: Vec<String>,
}

impl CrisisDetectionResult {
    pub fn none() -> Self {
        Self {
            is_crisis: false,
            keywords: Vec::new(),
        }
    }
}

/// Classify a set of matched signals.
pub fn classify_signals(signals: Vec<CrisisSignal>) -> CrisisDetectionResult {
    CrisisDetectionResult {
        is_crisis: !signals.is_empty(),
        keywords: signals.into_iter().map(|s| s.keyword).collect(),
    }
}

/// Match and classify a message in one step.
pub fn classify(text: &str) -> CrisisDetectionResult {
    classify_signals(match_signals(text))
}
