//! Turn orchestrator - the turn-taking state machine
//!
//! One inbound user message drives one turn: every family member
//! replies in registry order, strictly sequentially, each seeing the
//! full transcript accumulated so far plus its own enrichment
//! briefing. Replies stream out one by one as they are produced.
//! A single member's failure is absorbed with that member's fallback
//! phrase; the turn always emits one event per persona.

use crate::enrichment::EnrichmentAggregator;
use crate::models::{OutboundEvent, Transcript};
use crate::persona::PersonaRegistry;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Receives outbound events as they are produced. The transport
/// implementation swallows write failures; emission is fire-and-forget
/// from the orchestrator's point of view.
#[async_trait]
pub trait EventSink: Send {
    async fn emit(&mut self, event: OutboundEvent);
}

/// Drives one turn at a time over an injected persona registry.
pub struct TurnOrchestrator {
    registry: Arc<PersonaRegistry>,
}

impl TurnOrchestrator {
    pub fn new(registry: Arc<PersonaRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &PersonaRegistry {
        &self.registry
    }

    /// Process one inbound user message through all personas in order.
    ///
    /// Each persona's enrichment and responder call completes, success
    /// or not, before the next persona starts; its reply (or fallback)
    /// is appended to the transcript and emitted immediately.
    pub async fn run_turn(&self, user_text: &str, sink: &mut dyn EventSink) {
        let mut transcript = Transcript::new(user_text);

        info!(personas = self.registry.list().len(), "Turn started");

        for persona in self.registry.list() {
            debug!(persona = %persona.id(), "Dispatching persona");

            let briefing = EnrichmentAggregator::briefing(persona.providers()).await;
            let context = build_context(&transcript, &briefing);

            let reply = match persona.respond(&context).await {
                Ok(text) if !text.trim().is_empty() => text,
                Ok(_) => {
                    warn!(persona = %persona.id(), "Responder returned empty reply, using fallback");
                    persona.fallback().to_string()
                }
                Err(e) => {
                    warn!(persona = %persona.id(), error = %e, "Responder failed, using fallback");
                    persona.fallback().to_string()
                }
            };

            transcript.push(persona.display_name(), &reply);

            sink.emit(OutboundEvent {
                sender_role: persona.id(),
                sender_name: persona.display_name().to_string(),
                message: reply,
            })
            .await;
        }

        info!(entries = transcript.entries().len(), "Turn complete");
    }

    /// Turn-level failure before the persona loop (malformed frame,
    /// transcript construction): emit exactly one notice attributed to
    /// the default persona and stop. No responders are invoked.
    pub async fn abort_turn(&self, reason: &str, sink: &mut dyn EventSink) {
        warn!(reason, "Turn aborted before persona loop");

        if let Some(persona) = self.registry.default_persona() {
            sink.emit(OutboundEvent {
                sender_role: persona.id(),
                sender_name: persona.display_name().to_string(),
                message: persona.fallback().to_string(),
            })
            .await;
        }
    }
}

/// Context string for one persona: its briefing, the transcript so
/// far, and the shared turn instructions.
fn build_context(transcript: &Transcript, briefing: &str) -> String {
    format!(
        "Here is the latest market context:\n{}\n\n\
         Here is the current conversation:\n{}\n\n\
         Respond in a conversational way, as if you're chatting with your family.\n\
         Respond to both the user's message and any previous responses from other family members.\n\
         Keep it short and limit your response to 1 or 2 sentences.",
        briefing,
        transcript.render()
    )
}
