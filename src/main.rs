use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use clap::{Parser, Subcommand};
use tracing::{error, info};

use elcamejob::api::{self, auth::SessionStore, state::AppState, validation};
use elcamejob::config::{Config, StorageBackend};
use elcamejob::db::Backend;
use elcamejob::logging;
use elcamejob::seed;
use elcamejob::shutdown::ShutdownCoordinator;

#[derive(Parser)]
#[command(name = "elcamejob", about = "Job marketplace connecting clients and workers")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP API (default)
    Serve {
        /// Address to bind, overrides BIND_ADDRESS
        #[arg(long)]
        bind: Option<String>,
    },
    /// Apply database migrations and exit (postgres backend only)
    Migrate,
    /// Load the demo users, jobs and application into empty storage
    Seed,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env().map_err(std::io::Error::other)?;
    logging::init(&config.log_dir)?;

    let command = cli.command.unwrap_or(Command::Serve { bind: None });
    if let Command::Serve { bind: Some(bind) } = &command {
        config.bind_address = bind.clone();
    }

    info!("Starting elcamejob");
    info!("Configuration loaded successfully:");
    info!("  - Storage backend: {:?}", config.storage_backend);
    info!("  - Max payload size: {} bytes", config.max_payload_size);
    info!("  - Max database connections: {}", config.max_db_connections);

    // Connecting also runs pending migrations on postgres
    let backend = Backend::connect(&config).await.map_err(|e| {
        error!("Failed to open storage: {}", e);
        std::io::Error::other(e)
    })?;

    match command {
        Command::Migrate => {
            if config.storage_backend != StorageBackend::Postgres {
                info!("Local backend has no migrations to run");
            }
            backend.close().await;
            Ok(())
        }
        Command::Seed => {
            let report = seed::seed_demo_data(&backend.repositories(), config.password_cost)
                .await
                .map_err(std::io::Error::other)?;
            info!("Seed finished: {:?}", report);
            backend.close().await;
            Ok(())
        }
        Command::Serve { .. } => serve(config, backend).await,
    }
}

async fn serve(config: Config, backend: Backend) -> std::io::Result<()> {
    let repositories = backend.repositories();
    if config.seed_demo_data {
        seed::seed_demo_data(&repositories, config.password_cost)
            .await
            .map_err(std::io::Error::other)?;
    }

    // Sessions are process-local and shared by every worker
    let state = web::Data::new(AppState::new(
        repositories,
        Arc::new(SessionStore::new()),
        config.password_cost,
    ));
    let max_payload_size = config.max_payload_size;

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(web::PayloadConfig::default().limit(max_payload_size))
            .app_data(web::JsonConfig::default().limit(max_payload_size))
            .app_data(validation::json_config().limit(max_payload_size))
            .configure(api::routes)
    })
    .disable_signals()
    .bind(config.bind_address.as_str())?
    .run();

    info!("Server starting on http://{}", config.bind_address);

    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    ShutdownCoordinator::new(server_handle, server_task, backend)
        .wait_for_shutdown()
        .await
}
