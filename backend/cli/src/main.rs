mod ask_cmd;
mod config;
mod config_cmd;
mod status_cmd;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tower_http::trace::TraceLayer;
use tracing::info;

use tutorbridge_config::TutorConfig;
use tutorbridge_dialog::{spawn_pending_reaper, DialogHandler, InMemorySessionStore};
use tutorbridge_gateway::{build_router, start_server, GatewayState};
use tutorbridge_logging::init_logger;
use tutorbridge_model::{MockProvider, ModelClient};

/// Canned answer used by `serve --mock`.
const MOCK_ANSWER: &str = "Hello — это «привет». Скажи: hello!";

#[derive(Parser)]
#[command(name = "tutorbridge")]
#[command(about = "Voice-assistant English tutor backed by a chat-completion model")]
#[command(version)]
struct Cli {
    /// YAML config file (overrides TUTOR_CONFIG)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the webhook server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
        /// Answer with a canned mock model instead of calling the API
        #[arg(long)]
        mock: bool,
    },
    /// Query /health of a running server
    Status {
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Ask the model one question and print the answer
    Ask {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Print the effective configuration with secrets masked
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    config::load_dotenv();
    let cli = Cli::parse();

    let config = config::load(cli.config).await?;
    init_logger(&config::log_options(&config));
    config::log_warnings(&config);

    match cli.command {
        Commands::Serve { port, mock } => {
            let mut config = config;
            if let Some(port) = port {
                config.server.port = port;
            }
            run_server(config, mock).await?;
        }
        Commands::Status { port } => {
            status_cmd::run(port.unwrap_or(config.server.port)).await?;
        }
        Commands::Ask { text } => {
            ask_cmd::run(&config, &text.join(" ")).await?;
        }
        Commands::Config => {
            config_cmd::run(&config)?;
        }
    }

    Ok(())
}

async fn run_server(config: TutorConfig, mock: bool) -> Result<()> {
    let addr = config.server.socket_addr()?;

    let model = if mock {
        let provider = Arc::new(MockProvider::new("mock").with_response(MOCK_ANSWER));
        ModelClient::new(provider, &config.model, config.dialog.system_message())
    } else {
        ModelClient::from_config(&config)?
    };

    info!(
        addr = %addr,
        provider = model.provider_name(),
        model = model.model(),
        timeout_secs = config.dialog.response_timeout_secs,
        history_depth = config.dialog.history_depth,
        "Starting tutorbridge"
    );

    let handler = DialogHandler::new(
        model,
        Arc::new(InMemorySessionStore::new()),
        config.dialog.clone(),
    );

    let reaper = spawn_pending_reaper(
        handler.pending().clone(),
        config.dialog.pending_ttl(),
        config.dialog.sweep_interval(),
    );

    let state = GatewayState::new(handler, config);
    let app = build_router(state).layer(TraceLayer::new_for_http());

    let result = start_server(addr, app).await;
    reaper.abort();
    result
}
