use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use student_api::{
    api,
    config::{self, Config},
    logging,
    students::StudentStore,
    summary::CommandSummaryGenerator,
};
use tokio::net::TcpListener;

/// Command-line overrides for values otherwise read from the environment.
#[derive(Parser)]
#[command(name = "student-api", about = "In-memory student records over HTTP")]
struct Cli {
    /// Address to bind (overrides `SERVER_HOST`).
    #[arg(long)]
    host: Option<String>,
    /// Port to bind (overrides `SERVER_PORT`).
    #[arg(long)]
    port: Option<u16>,
    /// Model passed to the runner (overrides `OLLAMA_MODEL`).
    #[arg(long)]
    model: Option<String>,
}

impl Cli {
    /// Flags win over environment values; absent flags leave them untouched.
    fn apply(self, settings: &mut Config) {
        if let Some(host) = self.host {
            settings.server_host = host;
        }
        if let Some(port) = self.port {
            settings.server_port = port;
        }
        if let Some(model) = self.model {
            settings.summary.model = model;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = config::init_config().context("failed to load configuration")?;
    cli.apply(&mut settings);
    logging::init_tracing(settings.log_file.as_deref());
    tracing::debug!(
        host = %settings.server_host,
        port = settings.server_port,
        command = %settings.summary.command,
        model = %settings.summary.model,
        api_url = %settings.summary.api_url,
        timeout_secs = settings.summary.timeout.as_secs(),
        "Loaded configuration"
    );

    let store = Arc::new(StudentStore::new());
    let generator = Arc::new(CommandSummaryGenerator::new(settings.summary.clone()));
    let app = api::create_router(store, generator);

    let listener = TcpListener::bind((settings.server_host.as_str(), settings.server_port))
        .await
        .with_context(|| {
            format!(
                "failed to bind {}:{}",
                settings.server_host, settings.server_port
            )
        })?;
    tracing::info!(
        "Server running at http://{}:{}",
        settings.server_host,
        settings.server_port
    );
    axum::serve(listener, app)
        .await
        .context("HTTP server terminated unexpectedly")?;

    Ok(())
}
