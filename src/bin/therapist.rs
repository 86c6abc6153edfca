use generation_gap::chat;
use generation_gap::config::ChatConfig;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let config = ChatConfig::from_env()?;

    info!("🚀 GenerationGap AI Therapist - API Server");
    info!("📍 Port: {}", config.port);
    if config.openrouter.api_key.is_empty() {
        warn!("OPENROUTER_API_KEY is not set. Please set it in your .env file.");
    }

    chat::serve(config).await?;

    Ok(())
}
