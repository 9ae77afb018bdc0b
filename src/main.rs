use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use taskd::{config::ServerConfig, rest, storage::Storage, tasks::service::TaskService, AppContext};
use tracing::info;

#[derive(Parser)]
#[command(name = "taskd", about = "taskd — task-tracking REST backend", version)]
struct Args {
    /// HTTP server port
    #[arg(long, env = "TASKD_PORT")]
    port: Option<u16>,

    /// Data directory for the SQLite database and config.toml
    #[arg(long, env = "TASKD_DATA_DIR")]
    data_dir: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "TASKD_LOG")]
    log: Option<String>,

    /// Bind address (default: 127.0.0.1; use 0.0.0.0 for LAN access)
    #[arg(long, env = "TASKD_BIND")]
    bind_address: Option<String>,

    /// Origin allowed for cross-origin browser requests
    #[arg(long, env = "TASKD_CORS_ORIGIN")]
    cors_origin: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = ServerConfig::new(
        args.port,
        args.data_dir,
        args.log,
        args.bind_address,
        args.cors_origin,
    );

    tracing_subscriber::fmt()
        .with_env_filter(config.log.clone())
        .compact()
        .init();

    info!("taskd v{} starting", env!("CARGO_PKG_VERSION"));
    info!(data_dir = %config.data_dir.display(), "using data directory");

    let storage = Arc::new(Storage::new(&config.data_dir).await?);
    let tasks = Arc::new(TaskService::new(storage));

    let ctx = Arc::new(AppContext {
        config: Arc::new(config),
        tasks,
        started_at: std::time::Instant::now(),
    });

    rest::start_rest_server(ctx).await
}
