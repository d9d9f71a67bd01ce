// Keyword/pattern matcher
//
// Scans one message against the signal tables in `lexicon` and returns the
// matched signals. Pure function of the input text: no state, no I/O.

use serde::{Deserialize, Serialize};

use super::lexicon;

/// How a signal was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    /// Case-insensitive substring match against the direct phrase lexicon
    DirectPhrase,
    /// Word-boundary regex for short ambiguous tokens ("od", "o.d.")
    BoundaryToken,
    /// High mood self-rating (8-10) co-occurring with a negative-affect term
    MoodIntensity,
    /// Flexible sentence-pattern regex
    PhrasePattern,
}

/// One matched lexical or pattern indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrisisSignal {
    /// Canonical keyword/phrase string, lowercase
    pub keyword: String,
    /// Detection method that produced this signal
    pub method: DetectionMethod,
}

/// Scan a message for crisis signals.
///
/// Signals are returned in detection order with duplicates (same canonical
/// keyword, first-seen-wins) suppressed, regardless of which method fired.
pub fn match_signals(text: &str) -> Vec<CrisisSignal> {
    let mut signals: Vec<CrisisSignal> = Vec::new();
    let lowered = text.to_lowercase();

    let mut push = |keyword: String, method: DetectionMethod| {
        if !signals.iter().any(|s| s.keyword == keyword) {
            signals.push(CrisisSignal { keyword, method });
        }
    };

    for phrase in lexicon::DIRECT_PHRASES {
        if lowered.contains(phrase) {
            push((*phrase).to_string(), DetectionMethod::DirectPhrase);
        }
    }

    for (pattern, canonical) in lexicon::BOUNDARY_TOKENS.iter() {
        if pattern.is_match(text) {
            push((*canonical).to_string(), DetectionMethod::BoundaryToken);
        }
    }

    if lexicon::MOOD_INTENSITY_PATTERNS
        .iter()
        .any(|p| p.is_match(text))
    {
        push(
            lexicon::MOOD_INTENSITY_SIGNAL.to_string(),
            DetectionMethod::MoodIntensity,
        );
    }

    // Each phrase pattern contributes at most one signal: its first match
    // text, normalized. Dedup happens against everything collected so far.
    for pattern in lexicon::PHRASE_PATTERNS.iter() {
        if let Some(found) = pattern.find(text) {
            push(
                found.as_str().to_lowercase().trim().to_string(),
                DetectionMethod::PhrasePattern,
            );
        }
    }

    if !signals.is_empty() {
        tracing::warn!(
            signal_count = signals.len(),
            first = %signals[0].keyword,
            "Crisis signals matched"
        );
    }

    signals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords(text: &str) -> Vec<String> {
        match_signals(text).into_iter().map(|s| s.keyword).collect()
    }

    #[test]
    fn test_direct_phrase_match() {
        let signals = match_signals("I've been thinking about suicide lately");
        assert_eq!(signals[0].keyword, "suicide");
        assert_eq!(signals[0].method, DetectionMethod::DirectPhrase);
    }

    #[test]
    fn test_direct_phrase_case_insensitive() {
        assert!(keywords("SUICIDE").contains(&"suicide".to_string()));
        assert!(keywords("Kill Myself").contains(&"kill myself".to_string()));
    }

    #[test]
    fn test_overlapping_phrases_all_retained() {
        let kws = keywords("tired of living, no point in living");
        assert!(kws.contains(&"tired of living".to_string()));
        assert!(kws.contains(&"no point in living".to_string()));
        // "no point living" is not a substring of "no point in living"
        assert!(!kws.contains(&"no point living".to_string()));
    }

    #[test]
    fn test_boundary_token_standalone() {
        let signals = match_signals("I took an OD last night");
        assert!(signals.iter().any(|s| s.keyword == "od"));
        assert!(signals
            .iter()
            .any(|s| s.method == DetectionMethod::BoundaryToken));
    }

    #[test]
    fn test_boundary_token_not_inside_words() {
        assert!(keywords("today was a good day").is_empty());
        assert!(keywords("I installed a new mod").is_empty());
    }

    #[test]
    fn test_mood_intensity_both_orders() {
        let kws = keywords("my sadness is at a 9, so depressed");
        assert!(kws.contains(&super::lexicon::MOOD_INTENSITY_SIGNAL.to_string()));

        let kws = keywords("I'd rate it 10 out of 10 hopeless");
        assert!(kws.contains(&super::lexicon::MOOD_INTENSITY_SIGNAL.to_string()));
    }

    #[test]
    fn test_mood_intensity_needs_both_halves() {
        assert!(keywords("I feel sad today").is_empty());
        assert!(keywords("I slept 9 hours").is_empty());
        // low rating with affect term is not a signal
        assert!(keywords("feeling sad, maybe a 3").is_empty());
    }

    #[test]
    fn test_phrase_pattern_contractions() {
        let kws = keywords("honestly I can't do this anymore");
        assert!(kws.iter().any(|k| k.contains("do this anymore")));

        let kws = keywords("I wanna die");
        assert!(kws.contains(&"i wanna die".to_string()));
    }

    #[test]
    fn test_phrase_pattern_first_match_only() {
        let signals = match_signals("i want to die. I said i want to die");
        let count = signals.iter().filter(|s| s.keyword == "i want to die").count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_dedup_across_methods() {
        // "i want to die" fires both the direct phrase "want to die" and the
        // phrase pattern; each canonical string appears once.
        let kws = keywords("i want to die");
        let mut sorted = kws.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), kws.len());
    }

    #[test]
    fn test_benign_message_matches_nothing() {
        assert!(keywords("What should I make for dinner tonight?").is_empty());
        assert!(keywords("").is_empty());
    }

    #[test]
    fn test_deterministic() {
        let text = "I'm feeling empty, like a 10, thinking about ending things";
        assert_eq!(match_signals(text), match_signals(text));
    }
}
