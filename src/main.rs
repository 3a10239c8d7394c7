use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dirserve::{AppState, Config};

#[derive(Parser, Debug)]
#[command(name = "dirserve")]
#[command(about = "Minimal HTTP file browser confined to a single root directory")]
#[command(version)]
struct Cli {
    /// Port to listen on [default: 13939]
    #[arg(short, long, env = "DIRSERVE_PORT")]
    port: Option<u16>,

    /// Address to bind to [default: 0.0.0.0]
    #[arg(short, long, env = "DIRSERVE_BIND")]
    bind: Option<String>,

    /// Root directory to serve files from, created if missing [default: ./ftp_folder]
    #[arg(short, long, env = "DIRSERVE_ROOT")]
    root: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, env = "DIRSERVE_VERBOSE")]
    verbose: bool,

    /// Config file path (optional)
    #[arg(short, long, env = "DIRSERVE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "dirserve=debug,tower_http=debug"
    } else {
        "dirserve=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load config from file if provided, otherwise use defaults
    let config = if let Some(config_path) = &cli.config {
        info!("Loading config from {}", config_path.display());
        Config::from_file(config_path)?
    } else {
        Config::default()
    };
    let config = config.with_overrides(cli.root, cli.bind, cli.port);

    let root_dir = config.prepare_root().map_err(|e| {
        format!(
            "Cannot use root directory {}: {}",
            config.root_dir.display(),
            e
        )
    })?;
    info!("Serving files from: {}", root_dir.display());

    let addr: SocketAddr = config.listen_addr().parse()?;
    let app = dirserve::app(AppState::with_config(root_dir, config));

    info!("Starting dirserve on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
