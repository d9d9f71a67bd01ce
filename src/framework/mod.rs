// Therapeutic framework selection
//
// Maps a free-text primary diagnosis to a dispatch key for the responder.
// The framework is a closed enum so every dispatch site is exhaustive.

use serde::{Deserialize, Serialize};

/// Therapeutic framework dispatch key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    /// Dialectical behavior therapy: distress tolerance, emotion regulation
    Dbt,
    /// Cognitive behavioral therapy: thought identification and reframing
    Cbt,
    /// Integrative default when no diagnosis-specific framework applies
    Integrative,
}

impl Framework {
    pub fn as_str(&self) -> &'static str {
        match self {
            Framework::Dbt => "dbt",
            Framework::Cbt => "cbt",
            Framework::Integrative => "integrative",
        }
    }

    /// Select a framework from a free-text diagnosis.
    ///
    /// Case-insensitive substring tests in fixed priority order; the first
    /// matching rule wins. Empty or unrecognized diagnoses fall back to the
    /// integrative approach.
    pub fn for_diagnosis(diagnosis: &str) -> Self {
        let diag = diagnosis.to_lowercase();

        if diag.contains("bpd") || diag.contains("borderline") {
            return Framework::Dbt;
        }
        if diag.contains("bipolar") {
            return Framework::Dbt;
        }
        if diag.contains("anxiety")
            || diag.contains("panic")
            || diag.contains("gad")
            || diag.contains("phobia")
        {
            return Framework::Cbt;
        }
        if diag.contains("depression") || diag.contains("depressive") || diag.contains("mdd") {
            return Framework::Cbt;
        }
        if diag.contains("ptsd") || diag.contains("trauma") {
            return Framework::Dbt;
        }
        if diag.contains("ocd") || diag.contains("obsessive") {
            return Framework::Cbt;
        }

        Framework::Integrative
    }
}

impl std::fmt::Display for Framework {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
