//! Core data models for the family chat

use serde::{Deserialize, Serialize};
use std::fmt;

//
// ================= Personas =================
//

/// Wire identity of a family member. The wire value doubles as the
/// avatar key on the frontend, so it must stay stable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PersonaId {
    Father,
    Mother,
    Sister,
    Brother,
}

impl PersonaId {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonaId::Father => "father",
            PersonaId::Mother => "mother",
            PersonaId::Sister => "sister",
            PersonaId::Brother => "brother",
        }
    }
}

impl fmt::Display for PersonaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

//
// ================= Transcript =================
//

/// One speaker/text pair inside a turn. Never mutated after append.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub speaker: String,
    pub text: String,
}

/// Ordered record of everything said during one turn, starting with the
/// user's message. Append-only; discarded when the turn ends.
#[derive(Debug, Clone)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    /// Start a turn with the inbound user message as the first entry.
    pub fn new(user_text: &str) -> Self {
        Self {
            entries: vec![TranscriptEntry {
                speaker: "user".to_string(),
                text: user_text.to_string(),
            }],
        }
    }

    pub fn push(&mut self, speaker: &str, text: &str) {
        self.entries.push(TranscriptEntry {
            speaker: speaker.to_string(),
            text: text.to_string(),
        });
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    /// Render as `speaker: text` lines for inclusion in a prompt.
    /// Later speakers see earlier replies verbatim through this view.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("{}: {}", e.speaker, e.text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

//
// ================= Enrichment =================
//

/// A unit of external context fetched for a persona. Deduplication is
/// not guaranteed; ordering within a category is not significant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnrichmentRecord {
    pub title: String,
    pub source: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

//
// ================= Wire frames =================
//

/// Structured inbound frame from the frontend chat panel.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundFrame {
    pub message: String,
}

/// One persona response, pushed to the transport as soon as produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutboundEvent {
    pub sender_role: PersonaId,
    pub sender_name: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_starts_with_user() {
        let t = Transcript::new("BTC to the moon?");
        assert_eq!(t.entries().len(), 1);
        assert_eq!(t.entries()[0].speaker, "user");
        assert_eq!(t.entries()[0].text, "BTC to the moon?");
    }

    #[test]
    fn test_transcript_render_preserves_order() {
        let mut t = Transcript::new("hello");
        t.push("老媽 (Mom)", "哎喲你好");
        t.push("老爸 (Dad)", "要小心");

        let rendered = t.render();
        let mom = rendered.find("老媽 (Mom): 哎喲你好").unwrap();
        let dad = rendered.find("老爸 (Dad): 要小心").unwrap();
        assert!(rendered.starts_with("user: hello"));
        assert!(mom < dad);
    }

    #[test]
    fn test_outbound_event_wire_shape() {
        let event = OutboundEvent {
            sender_role: PersonaId::Mother,
            sender_name: "老媽 (Mom)".to_string(),
            message: "hello".to_string(),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["senderRole"], "mother");
        assert_eq!(json["senderName"], "老媽 (Mom)");
        assert_eq!(json["message"], "hello");
    }

    #[test]
    fn test_persona_id_display() {
        assert_eq!(PersonaId::Brother.to_string(), "brother");
        assert_eq!(PersonaId::Sister.as_str(), "sister");
    }
}
