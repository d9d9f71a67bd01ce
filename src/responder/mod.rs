// Therapeutic responder
//
// The chat engine hands the selected framework and full profile context to
// a responder behind this trait. The built-in implementation is templated;
// an LLM-backed responder parameterized by a framework-specific system
// prompt plugs in behind the same seam.

use anyhow::Result;
use async_trait::async_trait;

use crate::framework::Framework;
use crate::store::UserProfile;

/// Generates the conversational reply for normal (non-crisis) turns.
#[async_trait]
pub trait TherapeuticResponder: Send + Sync {
    async fn respond(
        &self,
        message: &str,
        framework: Framework,
        profile: &UserProfile,
    ) -> Result<String>;
}

/// Rule-driven responder with framework-specific conversational templates.
#[derive(Default)]
pub struct TemplateResponder;

impl TemplateResponder {
    pub fn new() -> Self {
        Self
    }

    fn dbt_reply(&self, lowered: &str, profile: &UserProfile) -> String {
        if is_greeting(lowered) {
            return format!(
                "Hello {}! I'm {}. On a scale of 0-10, how intense are your emotions \
                 right now? This helps me know whether to focus on distress tolerance \
                 or emotion regulation.",
                profile.user_name, profile.companion_name
            );
        }
        if contains_any(lowered, &["empty", "numb", "void"]) {
            return "That feeling of emptiness is really difficult. Can you describe one \
                    physical sensation you're noticing? Even numbness has a physical \
                    quality - let's start there."
                .to_string();
        }
        if contains_any(lowered, &["overwhelm", "too much", "can't handle"]) {
            return "You're overwhelmed. Use STOP: Stop, Take a step back, Observe, \
                    Proceed mindfully. Can you freeze for 60 seconds before acting on \
                    any urges?"
                .to_string();
        }
        if contains_any(lowered, &["angry", "rage", "furious"]) {
            return "I hear intense anger. Rate it 0-10? If above 7, try TIPP - splash \
                    cold water on your face. If below 7, let's Check the Facts - what \
                    actually happened?"
                .to_string();
        }
        if contains_any(lowered, &["anxious", "anxiety", "panic"]) {
            return "Anxiety is overwhelming. Let's use TIPP - can you get ice on your \
                    face? This triggers your dive reflex and brings arousal down quickly."
                .to_string();
        }
        if contains_any(lowered, &["urge", "impulse"]) {
            return "You're having an urge. Let's use Opposite Action - if the urge says \
                    attack, practice kindness. What's opposite to your current urge?"
                .to_string();
        }
        if contains_any(lowered, &["sad", "depressed"]) {
            return "I hear sadness. Are you in Emotion Mind? Let's find Wise Mind - take \
                    three breaths and ask what someone wise would say about this."
                .to_string();
        }
        "I hear you. Are you in Emotion Mind, Reasonable Mind, or Wise Mind? This helps \
         me know which DBT skill would help most."
            .to_string()
    }

    fn cbt_reply(&self, lowered: &str, profile: &UserProfile) -> String {
        if is_greeting(lowered) {
            return format!(
                "Hello {}! I'm {}. What thoughts have been on your mind? I can help you \
                 examine them for patterns.",
                profile.user_name, profile.companion_name
            );
        }
        if contains_any(lowered, &["anxious", "anxiety", "worried"]) {
            return "Anxiety often comes from 'what if' thoughts. What specific thought \
                    is making you anxious? Let's check if it's realistic or \
                    catastrophizing."
                .to_string();
        }
        if contains_any(lowered, &["failure", "worthless", "stupid"]) {
            return "That's harsh self-labeling. What evidence supports that thought? \
                    What evidence contradicts it? Let's look at both sides."
                .to_string();
        }
        if contains_any(lowered, &["always", "never", "everyone"]) {
            return "I notice absolute thinking. Can you think of one exception? One time \
                    this wasn't true? That proves it's not absolute."
                .to_string();
        }
        if contains_any(lowered, &["should", "must"]) {
            return "Those 'should' statements add pressure. What if we changed 'I \
                    should' to 'I'd prefer to'? Notice how that feels different?"
                .to_string();
        }
        if contains_any(lowered, &["sad", "depressed"]) {
            return "What automatic thought came up? Is it a fact or interpretation? \
                    Let's examine if there's a more balanced view."
                .to_string();
        }
        "What thought popped into your head about this? Once we identify it, we can \
         check if it's helpful or needs reframing."
            .to_string()
    }

    fn integrative_reply(&self, lowered: &str, profile: &UserProfile) -> String {
        if is_greeting(lowered) {
            return format!(
                "Hello {}! I'm {}. How are you feeling right now?",
                profile.user_name, profile.companion_name
            );
        }
        if contains_any(lowered, &["anxious", "anxiety"]) {
            return "Let's ground you. Name 5 things you see, 4 you touch, 3 you hear, 2 \
                    you smell, 1 you taste. This brings you to the present."
                .to_string();
        }
        if contains_any(lowered, &["sad", "depressed"]) {
            return "That heaviness is real. What's one tiny thing you could do - not \
                    because you should, but to see if it shifts even 1%?"
                .to_string();
        }
        if lowered.contains("angry") {
            return "Anger signals a boundary crossed or need unmet. What boundary or \
                    need is involved? Understanding helps us respond wisely."
                .to_string();
        }
        "I hear you. What would help most - exploring these feelings, learning a coping \
         skill, or just having someone listen?"
            .to_string()
    }
}

fn is_greeting(lowered: &str) -> bool {
    contains_any(lowered, &["hello", "hi", "hey"])
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

#[async_trait]
impl TherapeuticResponder for TemplateResponder {
    async fn respond(
        &self,
        message: &str,
        framework: Framework,
        profile: &UserProfile,
    ) -> Result<String> {
        let lowered = message.to_lowercase();
        let reply = match framework {
            Framework::Dbt => self.dbt_reply(&lowered, profile),
            Framework::Cbt => self.cbt_reply(&lowered, profile),
            Framework::Integrative => self.integrative_reply(&lowered, profile),
        };
        Ok(reply)
    }
}
