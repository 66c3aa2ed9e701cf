//! CLI binary for mineru-gateway.
//!
//! A thin shim over the library crate: `serve` runs the HTTP surface,
//! `job` processes one serverless job event from a file or stdin and
//! prints the result envelope (the hosting scheduler owns the queue loop).

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mineru_gateway::{job, server, DropMode, GatewayConfig};
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Serve the chat-completion API on the default port
  mineru-gateway serve --engine-cmd mineru-engine

  # Serve on a specific interface and port
  mineru-gateway serve --host 127.0.0.1 --port 8200

  # Process one serverless job event from a file
  mineru-gateway job --input event.json

  # Process a job event from stdin
  echo '{"input":{"pdf_base64":"JVBERi0..."}}' | mineru-gateway job

ENVIRONMENT VARIABLES:
  MINERU_ENGINE_CMD       Document engine command (fallback for --engine-cmd)
  MINERU_GATEWAY_HOST     Bind host for `serve`
  MINERU_GATEWAY_PORT     Bind port for `serve`
  RUST_LOG                Log filter (e.g. info, mineru_gateway=debug)
"#;

/// Serve the MinerU document pipeline over HTTP or a serverless job queue.
#[derive(Parser, Debug)]
#[command(
    name = "mineru-gateway",
    version,
    about = "Serve the MinerU document-understanding pipeline",
    long_about = "Expose the MinerU document-understanding engine as an OpenAI-style \
chat-completion API or as a serverless job handler. Documents arrive base64-encoded, \
markdown comes back.",
    arg_required_else_help = true,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Document engine command for the subprocess backend.
    #[arg(long, global = true, env = "MINERU_ENGINE_CMD")]
    engine_cmd: Option<String>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP chat-completion surface.
    Serve {
        /// Bind host.
        #[arg(long, env = "MINERU_GATEWAY_HOST", default_value = "0.0.0.0")]
        host: String,

        /// Bind port.
        #[arg(long, env = "MINERU_GATEWAY_PORT", default_value_t = 8000)]
        port: u16,

        /// Model name advertised on the chat surface.
        #[arg(long, env = "MINERU_GATEWAY_MODEL", default_value = "mineru")]
        model: String,
    },

    /// Process one serverless job event and print the result envelope.
    Job {
        /// Path to the job event JSON; stdin when omitted.
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve { host, port, model } => {
            let mut builder = GatewayConfig::builder()
                .host(host)
                .port(port)
                .model_name(model);
            if let Some(cmd) = cli.engine_cmd {
                builder = builder.engine_cmd(cmd);
            }
            let config = builder.build().context("Invalid configuration")?;

            server::serve(config)
                .await
                .map_err(|e| anyhow::anyhow!("{e}"))
                .context("Server failed")
        }

        Command::Job { input } => {
            let raw = match input {
                Some(ref path) => std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read job event from {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("Failed to read job event from stdin")?;
                    buf
                }
            };
            let event: serde_json::Value =
                serde_json::from_str(&raw).context("Job event is not valid JSON")?;

            let mut builder = GatewayConfig::builder();
            if let Some(cmd) = cli.engine_cmd {
                builder = builder.engine_cmd(cmd);
            }
            let config = builder.build().context("Invalid configuration")?;
            let backend = config
                .resolve_backend()
                .context("No document engine available")?;

            let result = job::handle(&event, backend.as_ref(), DropMode::None).await;
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
    }
}
