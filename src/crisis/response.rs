// Crisis and safety response composition
//
// The crisis script is fixed; emergency contacts and local resources from
// the profile are appended when present.

use crate::store::UserProfile;

use super::lexicon;

/// The four safety-assessment questions asked while awaiting confirmation.
pub const SAFETY_ASSESSMENT_QUESTIONS: [&str; 4] = [
    "Are you safe right now?",
    "Have you called 988 or reached out for help?",
    "Do you have someone with you?",
    "Can you tell me where you are?",
];

/// Compose the crisis response for a subject.
pub fn compose_crisis_response(profile: &UserProfile) -> String {
    let mut response = String::from(
        "I'm very concerned about your safety. Please call or text 988 right now. \
         The 988 Suicide & Crisis Lifeline is available 24/7.",
    );

    if !profile.emergency_contacts.is_empty() {
        response.push_str("\n\nYour emergency contacts:");
        for contact in &profile.emergency_contacts {
            response.push_str(&format!("\n- {}: {}", contact.name, contact.phone));
        }
    }

    if let Some(resources) = &profile.local_crisis_resources {
        response.push_str(&format!("\n\nLocal crisis resources:\n{resources}"));
    }

    response
}

/// Compose the re-asked safety assessment while a confirmation is pending.
pub fn compose_safety_assessment() -> String {
    let mut reply = SAFETY_ASSESSMENT_QUESTIONS.join("\n");
    reply.push_str("\n\nRemember: Call or text 988 for immediate support.");
    reply
}

/// Compose the relief reply after the user confirms they are safe.
pub fn compose_safety_confirmed(profile: &UserProfile) -> String {
    let name = if profile.user_name.is_empty() {
        "friend"
    } else {
        profile.user_name.as_str()
    };
    format!(
        "I'm relieved to hear you're safe, {name}. Thank you for letting me know. \
         Remember, I'm here to support you, and help is always available if you \
         need it. Would you like to talk about what you're experiencing?"
    )
}

/// Does this message, sent while a confirmation is pending, indicate the
/// user is safe?
pub fn is_safety_confirmation(message: &str) -> bool {
    let lowered = message.to_lowercase();
    lexicon::SAFETY_INDICATORS
        .iter()
        .any(|indicator| lowered.contains(indicator))
}

/// Does this message explicitly deny being safe?
pub fn is_safety_negation(message: &str) -> bool {
    let lowered = message.to_lowercase();
    lowered.contains("no") || lowered.contains("not safe")
}
