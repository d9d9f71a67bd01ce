// Sanctum - Mental-health companion chat server
// Main entry point

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use sanctum::chat::{ChatEngine, SessionManager};
use sanctum::config::load_config;
use sanctum::responder::TemplateResponder;
use sanctum::server::{CompanionServer, ServerConfig};
use sanctum::store::{
    ChatHistoryStore, MemoryChatHistory, MemoryCrisisEvents, MemoryProfileStore,
};

#[derive(Parser, Debug)]
#[command(name = "sanctum")]
#[command(about = "Mental-health companion chat server", version)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Parser, Debug)]
enum Command {
    /// Run the HTTP server
    Serve {
        /// Bind address (overrides config file)
        #[arg(long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sanctum=info")),
        )
        .init();

    let args = Args::parse();
    let mut config = load_config()?;

    if let Some(Command::Serve { bind: Some(bind) }) = &args.command {
        config.bind_address = bind.clone();
    }

    let profiles = Arc::new(MemoryProfileStore::new());
    let history: Arc<dyn ChatHistoryStore> = Arc::new(MemoryChatHistory::new());
    let crisis_events = Arc::new(MemoryCrisisEvents::new());
    let sessions = Arc::new(SessionManager::new(config.session_timeout_minutes));

    let engine = Arc::new(ChatEngine::new(
        profiles,
        Arc::clone(&history),
        crisis_events,
        Arc::new(TemplateResponder::new()),
        sessions,
        config.max_message_chars,
    ));

    let server_config = ServerConfig {
        bind_address: config.bind_address.clone(),
    };

    let server = CompanionServer::new(engine, history, server_config);
    server.serve().await
}
