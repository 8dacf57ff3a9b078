//! PDF chat server binary
//!
//! Run with: cargo run -p pdf-chat --bin pdf-chat-server

use pdf_chat::{config::ChatConfig, server::ChatServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdf_chat=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                  Chat with multiple PDFs                  ║
║        Upload, process, then ask about your documents     ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    // Load configuration
    let config = ChatConfig::load()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Provider: {:?}", config.provider);
    tracing::info!("  - Embedding model: {}", config.embed_model());
    tracing::info!("  - Chat model: {}", config.chat_model());
    tracing::info!(
        "  - Chunking: {} chars, {} overlap",
        config.chunking.chunk_size,
        config.chunking.chunk_overlap
    );
    tracing::info!("  - Memory window: {} messages", config.memory.max_messages);

    // Create server
    let server = ChatServer::new(config)?;

    // Check providers; an unavailable backend only fails the requests that need it
    match server.state().chat_model().health_check().await {
        Ok(true) => tracing::info!("{} is reachable", server.state().chat_model().name()),
        _ => {
            tracing::warn!(
                "{} is not reachable; Process and chat requests will fail until it is",
                server.state().chat_model().name()
            );
        }
    }

    println!("\nServer starting...");
    println!("  UI: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
