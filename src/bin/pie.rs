//! Pie server and query client
//!
//! Usage:
//!   pie [server] [-d DIR] [--addr ADDR]
//!   pie exec [--addr ADDR] SELECT fname FROM people

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use pie::config::ServerConfig;
use pie::{build_router, AppState, Database};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pie")]
#[command(about = "Tabular data store queried with PieQL", long_about = None)]
#[command(version, args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    server: ServerArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API (default)
    Server(ServerArgs),

    /// Send a query to a running server and print the CSV result
    #[command(alias = "execute")]
    Exec(ExecArgs),
}

#[derive(Args, Clone)]
struct ServerArgs {
    /// Data directory
    #[arg(short = 'd', long, env = "PIE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Bind address
    #[arg(long, env = "PIE_ADDR")]
    addr: Option<String>,
}

#[derive(Args)]
struct ExecArgs {
    /// Server address
    #[arg(long, env = "PIE_ADDR")]
    addr: Option<String>,

    /// Query text; multiple arguments are joined with spaces
    #[arg(required = true, trailing_var_arg = true)]
    query: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Exec(args)) => run_exec(args).await,
        Some(Commands::Server(args)) => run_server(args).await,
        None => run_server(cli.server).await,
    }
}

async fn run_server(args: ServerArgs) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pie=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env().with_overrides(args.data_dir, args.addr);
    let addr = config.socket_addr()?;

    let mut db = Database::new();
    db.open(&config.data_dir)
        .with_context(|| format!("open {}", config.data_dir.display()))?;

    let state = AppState::new(db);
    let app = build_router(state.clone());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    state.db.write().close()?;
    Ok(())
}

async fn run_exec(args: ExecArgs) -> anyhow::Result<()> {
    let config = ServerConfig::from_env().with_overrides(None, args.addr);
    let query = args.query.join(" ");

    let response = reqwest::Client::new()
        .post(format!("http://{}/query", config.addr))
        .header("Content-Type", "application/pieql")
        .body(query)
        .send()
        .await
        .with_context(|| format!("connect to {}", config.addr))?;

    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
        std::io::stderr().write_all(&body)?;
        std::process::exit(1);
    }

    std::io::stdout().write_all(&body)?;
    Ok(())
}
