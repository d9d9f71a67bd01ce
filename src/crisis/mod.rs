// Crisis detection module
// Matcher, classifier, and crisis/safety response composition

mod classifier;
mod lexicon;
mod matcher;
mod response;

pub use classifier::{classify, classify_signals, CrisisDetectionResult};
pub use lexicon::{MOOD_INTENSITY_SIGNAL, SAFETY_INDICATORS};
pub use matcher::{match_signals, CrisisSignal, DetectionMethod};
pub use response::{
    compose_crisis_response, compose_safety_assessment, compose_safety_confirmed,
    is_safety_confirmation, is_safety_negation, SAFETY_ASSESSMENT_QUESTIONS,
};
