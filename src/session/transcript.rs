//! Per-session conversation transcripts
//!
//! Holds the ordered turns for one chat session and enforces the fixed
//! turn ceiling after every append

use serde::{Deserialize, Serialize};

/// Role of a turn's author
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single conversational turn, immutable once appended.
///
/// Serializes as `{"role": ..., "content": ...}` so a transcript slice is
/// exactly the message array the completion API expects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    #[serde(rename = "content")]
    pub text: String,
}

impl Turn {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }
}

/// Ordered turn sequence for one session.
///
/// Index 0 is always the seed system turn, set at creation and never
/// removed by trimming.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// Create a transcript seeded with a single system turn
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::new(Role::System, system_prompt)],
        }
    }

    /// Append a turn at the end (no trimming; the store triggers that)
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Drop the oldest exchange turns until the transcript fits the ceiling.
    ///
    /// The ceiling is `max_exchange_turns` slots plus the seed system turn.
    /// Removal always starts at index 1, taking the two oldest non-system
    /// turns at a time (one user turn and its paired assistant turn), so an
    /// unpaired old turn can be evicted together with its partner-to-be.
    /// Counting is turn-based, not token-based: a single very long turn can
    /// still exceed an external model's token limit.
    pub fn trim_to_ceiling(&mut self, max_exchange_turns: usize) {
        let max_len = max_exchange_turns + 1;

        while self.turns.len() > max_len {
            // Never touch the seed turn at index 0.
            let evict = (self.turns.len() - 1).min(2);
            self.turns.drain(1..1 + evict);
        }
    }

    /// All turns in chronological order
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Number of turns, seed turn included
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Most recent turn
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transcript_with_exchanges(count: usize) -> Transcript {
        let mut transcript = Transcript::new("seed");
        for i in 0..count {
            transcript.append(Turn::new(Role::User, format!("question {}", i)));
            transcript.append(Turn::new(Role::Assistant, format!("answer {}", i)));
        }
        transcript
    }

    #[test]
    fn test_new_transcript_is_seeded() {
        let transcript = Transcript::new("You are a therapist");

        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.turns()[0].role, Role::System);
        assert_eq!(transcript.turns()[0].text, "You are a therapist");
    }

    #[test]
    fn test_append_preserves_order() {
        let mut transcript = Transcript::new("seed");
        transcript.append(Turn::new(Role::User, "hi"));
        transcript.append(Turn::new(Role::Assistant, "hello"));

        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript.turns()[1].text, "hi");
        assert_eq!(transcript.last().unwrap().text, "hello");
    }

    #[test]
    fn test_trim_is_noop_under_ceiling() {
        let mut transcript = transcript_with_exchanges(2);
        transcript.trim_to_ceiling(20);

        assert_eq!(transcript.len(), 5);
    }

    #[test]
    fn test_trim_evicts_oldest_pair() {
        // Ceiling of 2 exchange turns, max live length 3.
        let mut transcript = Transcript::new("seed");
        transcript.append(Turn::new(Role::User, "hi"));
        transcript.trim_to_ceiling(2);
        transcript.append(Turn::new(Role::Assistant, "hello"));
        transcript.trim_to_ceiling(2);
        assert_eq!(transcript.len(), 3);

        // The next append overflows; both oldest non-system turns go,
        // including the unpaired assistant reply.
        transcript.append(Turn::new(Role::User, "bye"));
        transcript.trim_to_ceiling(2);

        let texts: Vec<&str> = transcript.turns().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["seed", "bye"]);
        assert_eq!(transcript.turns()[0].role, Role::System);
        assert_eq!(transcript.turns()[1].role, Role::User);

        // The paired reply fits again without evicting anything.
        transcript.append(Turn::new(Role::Assistant, "farewell"));
        transcript.trim_to_ceiling(2);
        let texts: Vec<&str> = transcript.turns().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["seed", "bye", "farewell"]);
    }

    #[test]
    fn test_ceiling_holds_over_long_conversations() {
        let max_exchange_turns = 20;
        let mut transcript = Transcript::new("seed");

        for i in 0..50 {
            let role = if i % 2 == 0 { Role::User } else { Role::Assistant };
            transcript.append(Turn::new(role, format!("turn {}", i)));
            transcript.trim_to_ceiling(max_exchange_turns);

            assert!(transcript.len() <= max_exchange_turns + 1);
            assert_eq!(transcript.turns()[0].role, Role::System);
            assert_eq!(transcript.last().unwrap().text, format!("turn {}", i));
        }
    }

    #[test]
    fn test_trim_keeps_chronological_suffix() {
        let mut transcript = transcript_with_exchanges(30);
        transcript.trim_to_ceiling(20);

        assert_eq!(transcript.len(), 21);
        // Survivors are the newest turns, still in order.
        let texts: Vec<&str> = transcript.turns()[1..]
            .iter()
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(texts.first(), Some(&"question 20"));
        assert_eq!(texts.last(), Some(&"answer 29"));
    }

    #[test]
    fn test_zero_ceiling_degenerates_to_system_only() {
        let mut transcript = Transcript::new("seed");
        transcript.append(Turn::new(Role::User, "hi"));
        transcript.trim_to_ceiling(0);

        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.turns()[0].role, Role::System);
    }

    #[test]
    fn test_turn_wire_shape() {
        let turn = Turn::new(Role::Assistant, "hello");
        let json = serde_json::to_value(&turn).unwrap();

        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "hello");
    }
}
