use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use mel::auth::PasswordHasher;
use mel::cli::{
    AdminCommands, init_store, load_config, run_bless, run_init, run_list, run_password,
    run_transfer,
};
use mel::server::{AppState, create_router};
use mel::store::Store;

#[derive(Parser)]
#[command(name = "mel")]
#[command(about = "A permission-gated project tracking server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Administrative commands
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },

    /// Start the server
    Serve {
        /// TOML config file
        #[arg(long)]
        config: Option<String>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long, short)]
        port: Option<u16>,

        /// Data directory holding mel.db
        #[arg(long)]
        data_dir: Option<String>,
    },
}

async fn serve(
    config: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    data_dir: Option<String>,
) -> anyhow::Result<()> {
    let mut config = load_config(config.as_deref(), data_dir)?;
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }

    let store = init_store(&config)?;
    store.initialize()?;
    let hasher = PasswordHasher::new(config.hash)?;

    let state = Arc::new(AppState::new(Arc::new(store), hasher));
    let app = create_router(state);
    let addr = config.socket_addr()?;

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("mel=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Admin { command } => match command {
            AdminCommands::Init {
                target,
                demo,
                non_interactive,
            } => run_init(target, demo, non_interactive)?,
            AdminCommands::Bless {
                target,
                user,
                revoke,
            } => run_bless(target, user, revoke)?,
            AdminCommands::Password {
                target,
                user,
                password,
            } => run_password(target, user, password)?,
            AdminCommands::Transfer {
                target,
                project,
                user,
            } => run_transfer(target, project, user)?,
            AdminCommands::List { target, user } => run_list(target, user)?,
        },
        Commands::Serve {
            config,
            host,
            port,
            data_dir,
        } => serve(config, host, port, data_dir).await?,
    }

    Ok(())
}
