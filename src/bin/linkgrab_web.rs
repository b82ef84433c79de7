//! linkgrab-web - local HTTP API.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use linkgrab::config::{validate_config, Config};
use linkgrab::web::{self, function, AppState};

/// Serve the scrape and download API.
#[derive(Parser, Debug)]
#[command(name = "linkgrab-web", version, about = "Serve the linkgrab web API")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long, default_value = "linkgrab.toml")]
    config: PathBuf,

    /// Address to listen on, overriding the configuration.
    #[arg(short, long, env = "LINKGRAB_BIND")]
    bind: Option<String>,

    /// Serve only the stateless scrape function.
    #[arg(long)]
    stateless: bool,

    /// Enable debug logging.
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt().with_env_filter(filter).with_target(false).init();

    let mut config = Config::load_or_default(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    validate_config(&config).context("invalid configuration")?;

    let bind = config.server.bind.clone();
    let app = if args.stateless {
        function::router(config)
    } else {
        web::router(AppState::new(config).context("building application state")?)
    };

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("binding {}", bind))?;
    tracing::info!(
        "Listening on http://{}{}",
        listener.local_addr()?,
        if args.stateless { " (stateless)" } else { "" }
    );

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
