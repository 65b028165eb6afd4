//! Family Chat Orchestrator
//!
//! A household of personas that chats with the user (and with each
//! other) over a persistent WebSocket channel:
//! - Fixed, ordered persona registry defining who speaks when
//! - Per-persona enrichment from live market/news providers
//! - Strictly sequential turn-taking with per-persona failure isolation
//! - Streaming per-reply emission to the transport
//!
//! TURN LOOP:
//! INBOUND MESSAGE → [per persona: ENRICH → RESPOND → APPEND → EMIT] → IDLE

pub mod channel;
pub mod enrichment;
pub mod error;
pub mod llm;
pub mod models;
pub mod orchestrator;
pub mod persona;

pub use error::Result;

// Re-export common types
pub use models::*;
pub use orchestrator::{EventSink, TurnOrchestrator};
pub use persona::{Persona, PersonaRegistry, Responder};
