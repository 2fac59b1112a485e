use anyhow::{Context, Result};
use clap::Parser;
use gamesmith_interface::GameGenerator;
use gamesmith_models::{GeminiClient, StubGenerator};
use gamesmith_pipeline::Orchestrator;
use gamesmith_server::{API_KEY_ENV, ApiState, GamesmithConfig, create_router, init_tracing};
use gamesmith_storage::FileSystemStorage;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Gamesmith educational game generator", long_about = None)]
struct Args {
    /// Configuration file layered over the defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on (overrides server.bind)
    #[arg(short, long)]
    bind: Option<String>,

    /// Directory for generated games (overrides storage.root)
    #[arg(long)]
    storage_root: Option<PathBuf>,

    /// Answer with canned games instead of calling Gemini
    #[arg(long)]
    stub: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    init_tracing(args.verbose, args.json_logs)?;

    let mut config = GamesmithConfig::load(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config = config.with_bind(bind);
    }
    if let Some(root) = args.storage_root {
        config = config.with_storage_root(root);
    }

    let generator: Arc<dyn GameGenerator> = if args.stub {
        info!("Using stub backend, no Gemini calls will be made");
        Arc::new(StubGenerator::echo())
    } else {
        let api_key = std::env::var(API_KEY_ENV).ok();
        let gemini = config.gemini_config(api_key.as_deref())?;
        Arc::new(GeminiClient::new(gemini)?)
    };

    let storage = FileSystemStorage::new(config.storage().root())?;
    let orchestrator = Orchestrator::new(generator, Arc::new(storage), *config.prompt());

    let state = ApiState::new(Arc::new(orchestrator))
        .with_frontend_index(config.server().frontend_index().clone());
    let app = create_router(state);

    let bind = config.server().bind();
    let listener = tokio::net::TcpListener::bind(bind.as_str())
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;

    info!(
        address = %listener.local_addr()?,
        storage = %config.storage().root().display(),
        model = %config.gemini().model(),
        stub = args.stub,
        "Gamesmith server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gamesmith server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
