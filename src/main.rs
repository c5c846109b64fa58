//! di-server: hosts the sample messaging application.
//!
//! ```text
//!   TCP ─▶ axum + tower-http layers ─▶ RouterService ─▶ Router
//!                                                       │ (method, path)
//!                                                       ▼
//!                                          dispatch closure
//!                                  AppFactory.with(req) → RequestScope
//!                                  RequestScope.new_controller(name)
//!                                  type check → handler(rw, req)
//! ```

use std::path::PathBuf;

use clap::Parser;

use di_dispatch::config::{load_config, validate_config, ConfigError, ServerConfig};
use di_dispatch::lifecycle::startup;

#[derive(Parser)]
#[command(name = "di-server")]
#[command(about = "Serve controllers through the request-scoped dispatcher", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    startup::run(config).await?;
    Ok(())
}
