//! Persona contracts and the family registry
//!
//! A persona is a configured conversational participant: a fixed wire
//! identity, a display name, a static fallback phrase, the enrichment
//! providers it consults before speaking, and a response capability.
//! The registry is an explicitly constructed value injected into the
//! orchestrator; there are no module-level persona singletons.

use crate::enrichment::providers::{HeadlineProvider, MarketChartProvider};
use crate::enrichment::EnrichmentProvider;
use crate::llm::OpenAiClient;
use crate::models::PersonaId;
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub mod prompts;

/// Fallback phrases, one per family member. Substituted verbatim when
/// that persona's responder fails or returns nothing.
pub const FATHER_FALLBACK: &str = "要小心，系統出問題了。讓我檢查一下再試試看。";
pub const MOTHER_FALLBACK: &str = "哎喲，出問題了！讓我休息一下再試試看。";
pub const SISTER_FALLBACK: &str = "我覺得系統好像有點問題，讓我檢查一下。";
pub const BROTHER_FALLBACK: &str = "靠北，系統掛了！等我一下，馬上修好！";

/// Trait for a persona's response capability
#[async_trait]
pub trait Responder: Send + Sync {
    /// Produce a reply from the turn context. An error or an empty
    /// string are both treated as failure by the orchestrator.
    async fn respond(&self, context: &str) -> Result<String>;
}

/// A configured family member. Immutable after construction.
pub struct Persona {
    id: PersonaId,
    display_name: &'static str,
    fallback: &'static str,
    responder: Arc<dyn Responder>,
    providers: Vec<Arc<dyn EnrichmentProvider>>,
}

impl Persona {
    pub fn new(
        id: PersonaId,
        display_name: &'static str,
        fallback: &'static str,
        responder: Arc<dyn Responder>,
        providers: Vec<Arc<dyn EnrichmentProvider>>,
    ) -> Self {
        Self {
            id,
            display_name,
            fallback,
            responder,
            providers,
        }
    }

    pub fn id(&self) -> PersonaId {
        self.id
    }

    pub fn display_name(&self) -> &'static str {
        self.display_name
    }

    pub fn fallback(&self) -> &'static str {
        self.fallback
    }

    pub fn providers(&self) -> &[Arc<dyn EnrichmentProvider>] {
        &self.providers
    }

    pub async fn respond(&self, context: &str) -> Result<String> {
        self.responder.respond(context).await
    }
}

/// Fixed, ordered list of personas. Registry order is conversational
/// turn order and stays stable for the process lifetime.
pub struct PersonaRegistry {
    personas: Vec<Persona>,
}

impl PersonaRegistry {
    pub fn new(personas: Vec<Persona>) -> Self {
        Self { personas }
    }

    /// Personas in fixed, deterministic order.
    pub fn list(&self) -> &[Persona] {
        &self.personas
    }

    /// Persona that fronts turn-level failure notices. Mom takes the
    /// blame for the household; falls back to the first member.
    pub fn default_persona(&self) -> Option<&Persona> {
        self.personas
            .iter()
            .find(|p| p.id == PersonaId::Mother)
            .or_else(|| self.personas.first())
    }

    /// Production wiring: the four family members in speaking order,
    /// sharing one pooled LLM client.
    pub fn family(api_key: String) -> Self {
        let client = Arc::new(OpenAiClient::new(api_key));

        let news = || -> Vec<Arc<dyn EnrichmentProvider>> {
            vec![
                Arc::new(HeadlineProvider::coindesk()),
                Arc::new(HeadlineProvider::cointelegraph()),
            ]
        };

        let sister_providers: Vec<Arc<dyn EnrichmentProvider>> = vec![
            Arc::new(HeadlineProvider::coindesk()),
            Arc::new(HeadlineProvider::cointelegraph()),
            Arc::new(MarketChartProvider::bitcoin()),
        ];

        let brother_providers: Vec<Arc<dyn EnrichmentProvider>> = vec![
            Arc::new(HeadlineProvider::coindesk()),
            Arc::new(HeadlineProvider::cointelegraph()),
            Arc::new(MarketChartProvider::bitcoin()),
            Arc::new(MarketChartProvider::ethereum()),
        ];

        Self::new(vec![
            Persona::new(
                PersonaId::Father,
                "老爸",
                FATHER_FALLBACK,
                Arc::new(LlmResponder::new(Arc::clone(&client), prompts::FATHER_PROMPT)),
                news(),
            ),
            Persona::new(
                PersonaId::Mother,
                "老媽",
                MOTHER_FALLBACK,
                Arc::new(LlmResponder::new(Arc::clone(&client), prompts::MOTHER_PROMPT)),
                news(),
            ),
            Persona::new(
                PersonaId::Sister,
                "姊寶",
                SISTER_FALLBACK,
                Arc::new(LlmResponder::new(Arc::clone(&client), prompts::SISTER_PROMPT)),
                sister_providers,
            ),
            Persona::new(
                PersonaId::Brother,
                "毛弟",
                BROTHER_FALLBACK,
                Arc::new(LlmResponder::new(client, prompts::BROTHER_PROMPT)),
                brother_providers,
            ),
        ])
    }
}

/// Production responder: one LLM call with the persona's system prompt.
pub struct LlmResponder {
    client: Arc<OpenAiClient>,
    system_prompt: &'static str,
}

impl LlmResponder {
    pub fn new(client: Arc<OpenAiClient>, system_prompt: &'static str) -> Self {
        Self {
            client,
            system_prompt,
        }
    }
}

#[async_trait]
impl Responder for LlmResponder {
    async fn respond(&self, context: &str) -> Result<String> {
        self.client.complete(self.system_prompt, context).await
    }
}

/// Mock responder for development & testing
/// Keeps the household functional without an LLM dependency
pub struct MockResponder {
    reply: String,
}

impl MockResponder {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

#[async_trait]
impl Responder for MockResponder {
    async fn respond(&self, _context: &str) -> Result<String> {
        Ok(self.reply.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PersonaId;

    #[test]
    fn test_family_order_is_stable() {
        let registry = PersonaRegistry::family("test-key".to_string());

        let first: Vec<PersonaId> = registry.list().iter().map(|p| p.id()).collect();
        let second: Vec<PersonaId> = registry.list().iter().map(|p| p.id()).collect();

        assert_eq!(first, second);
        assert_eq!(
            first,
            vec![
                PersonaId::Father,
                PersonaId::Mother,
                PersonaId::Sister,
                PersonaId::Brother
            ]
        );
    }

    #[test]
    fn test_default_persona_is_mother() {
        let registry = PersonaRegistry::family("test-key".to_string());
        let default = registry.default_persona().unwrap();
        assert_eq!(default.id(), PersonaId::Mother);
        assert_eq!(default.fallback(), MOTHER_FALLBACK);
    }

    #[test]
    fn test_default_persona_falls_back_to_first() {
        let registry = PersonaRegistry::new(vec![Persona::new(
            PersonaId::Brother,
            "毛弟",
            BROTHER_FALLBACK,
            Arc::new(MockResponder::new("gm")),
            vec![],
        )]);

        assert_eq!(
            registry.default_persona().unwrap().id(),
            PersonaId::Brother
        );
    }

    #[tokio::test]
    async fn test_mock_responder() {
        let responder = MockResponder::new("衝了啦");
        let reply = responder.respond("ignored").await.unwrap();
        assert_eq!(reply, "衝了啦");
    }
}
