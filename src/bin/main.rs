use family_chat_orchestrator::{
    channel::start_server, orchestrator::TurnOrchestrator, persona::PersonaRegistry,
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let openai_api_key = std::env::var("OPENAI_API_KEY").unwrap_or_else(|_| {
        eprintln!("⚠️  OPENAI_API_KEY not set in .env");
        eprintln!("📌 Personas will answer with their fallback phrases");
        "mock_key".to_string()
    });

    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()?;

    info!("🏠 Family Chat Orchestrator");
    info!("📍 Port: {}", port);

    // Create components
    let registry = Arc::new(PersonaRegistry::family(openai_api_key));
    let orchestrator = Arc::new(TurnOrchestrator::new(registry));

    info!("✅ Family registry initialized");
    info!("📡 Starting server...");

    start_server(orchestrator, port).await?;

    Ok(())
}
