//! # probr
//!
//! Probr server binary: loads settings, wires the analyzer into the
//! HTTP/WebSocket server and runs until ctrl-c.

#![deny(unsafe_code)]

mod logging;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use probr_analysis::{Analyzer, GrammarChecker, LanguageToolClient};
use probr_server::{ProbrServer, ServerConfig};
use probr_settings::{DEFAULT_CONFIG_PATH, Settings, Transport, load_settings_from_path};
use tracing::info;

/// Probr text-analysis server.
#[derive(Parser, Debug)]
#[command(name = "probr", about = "Probr text-analysis server")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Host to bind (overrides settings).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind, 0 for auto-assign (overrides settings).
    #[arg(long)]
    port: Option<u16>,

    /// Transports to expose: http, websocket or both (overrides settings).
    #[arg(long)]
    transport: Option<Transport>,

    /// Log filter directive, e.g. `info` or `probr_server=debug` (overrides settings).
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    /// Apply CLI flags on top of file and environment settings.
    fn apply(&self, settings: &mut Settings) {
        if let Some(ref host) = self.host {
            settings.host.clone_from(host);
        }
        if let Some(port) = self.port {
            settings.port = port;
        }
        if let Some(transport) = self.transport {
            settings.transport = transport;
        }
        if let Some(ref level) = self.log_level {
            settings.logging.level.clone_from(level);
        }
    }
}

/// Build the analyzer, with a LanguageTool client when grammar checking is enabled.
fn build_analyzer(settings: &Settings) -> Result<Analyzer> {
    let grammar: Option<Arc<dyn GrammarChecker>> = if settings.language_tool.enabled {
        let client = LanguageToolClient::new(&settings.language_tool)
            .context("Failed to build LanguageTool client")?;
        Some(Arc::new(client))
    } else {
        None
    };
    Ok(Analyzer::new(grammar, settings.max_message_bytes))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let mut settings = load_settings_from_path(&args.config)
        .with_context(|| format!("Failed to load settings from {}", args.config.display()))?;
    args.apply(&mut settings);

    logging::init_subscriber(&settings.logging);
    settings.validate().context("Invalid configuration")?;

    let metrics = probr_server::metrics::install_recorder()
        .context("Failed to install metrics recorder")?;
    let analyzer = Arc::new(build_analyzer(&settings)?);
    info!(
        grammar = analyzer.grammar_enabled(),
        language_tool = %settings.language_tool.url,
        "analyzer ready"
    );

    let server = ProbrServer::new(ServerConfig::from(&settings), analyzer).with_metrics(metrics);
    let (addr, handle) = server.listen().await.context("Failed to bind server")?;
    info!("Probr listening on http://{addr} (transport: {})", settings.transport);

    // Wait for shutdown signal
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl-c")?;

    info!("Shutting down...");
    server.shutdown().graceful_shutdown(vec![handle], None).await;

    info!("Shutdown complete");
    Ok(())
}
