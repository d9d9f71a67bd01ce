// Crisis signal tables
//
// All detection data lives here as tables so the lexicon can be reviewed
// and extended without touching the matcher's control logic.

use once_cell::sync::Lazy;
use regex::Regex;

/// Direct self-harm/suicide phrases, matched as case-insensitive substrings.
/// Overlap is allowed: a message may match many phrases at once.
pub const DIRECT_PHRASES: &[&str] = &[
    "suicide",
    "suicidal",
    "kill myself",
    "kill my self",
    "end my life",
    "want to die",
    "better off dead",
    "no longer exist",
    "not be here",
    "self-harm",
    "self harm",
    "hurt myself",
    "hurt my self",
    "cut myself",
    "cutting",
    "overdose",
    "end it all",
    "no point living",
    "no reason to live",
    "might as well be dead",
    "don't want to be alive",
    "wish i was dead",
    "wish i were dead",
    "take my life",
    "taking my life",
    "end everything",
    "can't go on",
    "cannot go on",
    "done with life",
    "plan to die",
    "method to die",
    "way to die",
    "goodbye forever",
    "final goodbye",
    "this is goodbye",
    "life isn't worth living",
    "life is not worth living",
    "not worth living",
    "worthless to live",
    "why live",
    "why go on",
    "why continue",
    "what's the point of living",
    "no point in living",
    "tired of living",
    "tired of life",
];

/// Short ambiguous tokens that must only match as whole words.
/// "od" as a substring would fire on "good", "mod", "period".
pub static BOUNDARY_TOKENS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (Regex::new(r"(?i)\bod\b").unwrap(), "od"),
        (Regex::new(r"(?i)\bods\b").unwrap(), "ods"),
        (Regex::new(r"(?i)\bo\.?d\.?\b").unwrap(), "o.d."),
    ]
});

/// Canonical signal string for the mood-intensity composite.
pub const MOOD_INTENSITY_SIGNAL: &str = "high intensity mood with crisis indicators";

/// A self-rating of 8, 9, or 10 co-occurring with a negative-affect term,
/// in either order. Neither half alone is a signal.
pub static MOOD_INTENSITY_PATTERNS: Lazy<[Regex; 2]> = Lazy::new(|| {
    [
        Regex::new(r"(?i)\b(8|9|10)\b.*?(sad|depressed|anxious|hopeless|worthless|empty|numb)")
            .unwrap(),
        Regex::new(r"(?i)(sad|depressed|anxious|hopeless|worthless|empty|numb).*?\b(8|9|10)\b")
            .unwrap(),
    ]
});

/// Flexible sentence patterns tolerant of contractions and filler.
/// Each contributes at most one signal per message: its first match text.
pub static PHRASE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)i\s+want\s+to\s+die",
        r"(?i)i\s+wanna\s+die",
        r"(?i)i\s+don'?t\s+want\s+to\s+live",
        r"(?i)i\s+can'?t\s+do\s+this\s+anymore",
        r"(?i)i'?m\s+going\s+to\s+(hurt|kill|end)",
        r"(?i)i'?m\s+gonna\s+(hurt|kill|end)",
        r"(?i)no\s+point\s+(in\s+)?(living|going\s+on)",
        r"(?i)what'?s\s+the\s+point\s+of\s+living",
        r"(?i)thinking\s+about\s+(ending|killing|hurting)",
        r"(?i)planning\s+to\s+(die|hurt|kill)",
        r"(?i)have\s+a\s+plan\s+to",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Phrases that count as a safety confirmation after a crisis turn,
/// matched as case-insensitive substrings.
pub const SAFETY_INDICATORS: &[&str] = &[
    "yes",
    "i am safe",
    "i'm safe",
    "called 988",
    "got help",
    "someone is here",
    "with me",
    "i'm okay",
    "i am okay",
    "feeling better",
    "crisis passed",
    "not in danger",
];
