//! sliderepl CLI - live-coding slide server for Go talks.

mod colors;
mod export;
mod serve;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use sliderepl_server::{OutputMode, ServerConfig};

#[derive(Parser)]
#[command(name = "sliderepl")]
#[command(about = "Present Go slides with a live editor that builds and runs each one")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the presentation server
    Serve {
        /// host:port to listen on
        #[arg(long, default_value = "127.0.0.1:3999")]
        http: String,

        /// Slide file, with slides separated by `//!`
        #[arg(long, default_value = "slides.go")]
        slides: PathBuf,

        /// Send program output as raw HTML instead of escaped text
        #[arg(long)]
        html: bool,

        /// Kill builds and programs that run longer than this many seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Go executable to build with (default: `go` from PATH)
        #[arg(long)]
        go: Option<PathBuf>,
    },

    /// Export every slide into one standalone HTML file
    Export {
        /// Slide file, with slides separated by `//!`
        #[arg(long, default_value = "slides.go")]
        slides: PathBuf,

        /// Output path for the HTML file
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Attach recovery hints to library errors
    let format_error = |err: anyhow::Error| -> anyhow::Error {
        if let Some(server_err) = err.downcast_ref::<sliderepl_server::ServerError>() {
            anyhow::anyhow!("{}", server_err.with_hint())
        } else if let Some(core_err) = err.downcast_ref::<sliderepl_core::Error>() {
            anyhow::anyhow!("{}", core_err.with_hint())
        } else {
            err
        }
    };

    match cli.command {
        Commands::Serve {
            http,
            slides,
            html,
            timeout,
            go,
        } => {
            let config = ServerConfig {
                http,
                output_mode: if html { OutputMode::Html } else { OutputMode::Text },
                timeout: timeout.map(Duration::from_secs),
                go,
            };
            serve::execute(&slides, config).await.map_err(format_error)?;
        }

        Commands::Export { slides, output } => {
            export::execute(&slides, &output).map_err(format_error)?;
        }
    }

    Ok(())
}
