//! AI insight generation for journal entries
//!
//! One short supportive comment per entry, requested from the completion
//! gateway with a family-therapist persona. A gateway failure never blocks
//! the entry; the caller stores the fallback text instead.

use tracing::error;

use crate::gateway::{CompletionGateway, GenerationParams};
use crate::models::EntryType;
use crate::session::{Role, Turn};

const INSIGHT_PERSONA: &str = "You are a compassionate family therapist who helps parents and teenagers understand each other better. You provide gentle, supportive insights that encourage open communication and mutual understanding.";

/// Stored in place of an insight when the completion API is unavailable
pub const INSIGHT_FALLBACK: &str =
    "AI insight temporarily unavailable. Please try again later.";

const INSIGHT_PARAMS: GenerationParams = GenerationParams {
    temperature: 0.7,
    max_tokens: 150,
};

fn build_prompt(content: &str, mood: &str, entry_type: EntryType) -> String {
    format!(
        "As a family therapist, provide a brief, supportive insight (2-3 sentences) for this journal entry.

Entry: \"{}\"
Mood: {}
Author: {}

Focus on:
- Understanding the emotions expressed
- Suggesting ways to bridge communication gaps
- Offering gentle guidance for better understanding
- Being supportive and non-judgmental

Keep the response warm, empathetic, and actionable.",
        content,
        mood,
        entry_type.author_label()
    )
}

/// Request one insight for a journal entry. Falls back to
/// [`INSIGHT_FALLBACK`] when the gateway call fails, so the entry is stored
/// either way.
pub async fn generate(
    gateway: &dyn CompletionGateway,
    model: &str,
    content: &str,
    mood: &str,
    entry_type: EntryType,
) -> String {
    let turns = [
        Turn::new(Role::System, INSIGHT_PERSONA),
        Turn::new(Role::User, build_prompt(content, mood, entry_type)),
    ];

    match gateway.complete(model, &turns, INSIGHT_PARAMS).await {
        Ok(insight) => insight.trim().to_string(),
        Err(e) => {
            error!("AI insight error: {}", e);
            INSIGHT_FALLBACK.to_string()
        }
    }
}
