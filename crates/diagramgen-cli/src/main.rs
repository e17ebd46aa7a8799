//! Diagramgen CLI — entry point.
//!
//! # Commands
//!
//! - `diagramgen serve [--host HOST] [--port PORT]` — run the HTTP gateway
//! - `diagramgen generate -p PROVIDER TEXT` — one-shot generation
//! - `diagramgen simulate TEXT` — print a canned diagram (no network)
//! - `diagramgen status` — show configuration and provider status
//! - `diagramgen init` — write a default config file

mod helpers;
mod init;
mod server;
mod simulate;
mod status;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use diagramgen_core::config::{load_config, load_dotenv};
use diagramgen_providers::{DiagramGenerator, GenerationRequest, GenerationService, ProviderId};

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// 📐 Diagramgen — natural language in, Mermaid diagrams out
#[derive(Parser)]
#[command(name = "diagramgen", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP gateway
    Serve {
        /// Interface to bind (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides config / PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Generate a diagram once and print it
    Generate {
        /// Provider to use: deepseek | gemini
        #[arg(short, long, default_value = "deepseek")]
        provider: String,

        /// Description of the diagram
        text: String,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Print a canned diagram without calling any provider
    Simulate {
        /// Description of the diagram
        text: String,
    },

    /// Show configuration and provider status
    Status,

    /// Write a default config file
    Init,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    load_dotenv();

    match cli.command {
        Commands::Serve { host, port, logs } => {
            init_logging(logs, "info");
            let mut config = load_config(None);
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            helpers::print_banner();
            server::run(&config).await
        }
        Commands::Generate {
            provider,
            text,
            logs,
        } => {
            init_logging(logs, "warn");
            run_generate(&provider, text).await
        }
        Commands::Simulate { text } => {
            helpers::print_diagram(&simulate::simulate(&text));
            Ok(())
        }
        Commands::Status => status::run(&load_config(None)),
        Commands::Init => init::run(),
    }
}

// ─────────────────────────────────────────────
// Generate command
// ─────────────────────────────────────────────

async fn run_generate(provider: &str, text: String) -> Result<()> {
    let config = load_config(None);

    let provider: ProviderId = match provider.parse() {
        Ok(id) => id,
        Err(e) => {
            helpers::print_failure(&e.summary(), &serde_json::Value::String(provider.to_string()));
            anyhow::bail!("unknown provider '{provider}'");
        }
    };

    let service = GenerationService::new(&config.providers)
        .context("failed to initialize providers")?;

    info!(provider = provider.as_str(), "processing single request");
    match service.generate(&GenerationRequest::new(provider, text)).await {
        Ok(code) => {
            helpers::print_diagram(&code);
            Ok(())
        }
        Err(e) => {
            helpers::print_failure(&e.summary(), &e.details());
            Err(anyhow::Error::new(e).context("diagram generation failed"))
        }
    }
}

/// Initialize tracing/logging.
///
/// `RUST_LOG` wins when set; otherwise `--logs` turns on debug output.
fn init_logging(verbose: bool, default_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("diagramgen=debug,diagramgen_core=debug,diagramgen_providers=debug,info")
        } else {
            EnvFilter::new(default_level)
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
