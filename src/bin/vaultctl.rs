// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Vault health service
//!
//! Standalone HTTP server answering `GET /health`.

use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use vault::config::AppConfig;
use vault::Result;

#[derive(Parser, Debug)]
#[command(name = "vaultctl")]
#[command(author = "Jonathan D. A. Jewell <hyperpolymath>")]
#[command(version = "2.0.0")]
#[command(about = "Vault health-check server")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Host to bind to
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    info!("vaultctl v2.0.0");

    let mut config = AppConfig::load(&args.config)?;
    if let Some(host) = args.host {
        config.web.host = host;
    }
    if let Some(port) = args.port {
        config.web.port = port;
    }

    vault::web::start_server(&config.web).await
}
