use std::net::SocketAddr;
use std::path::PathBuf;
use dotenv::dotenv;
use thiserror::Error;
use tokio::signal;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};
use heart_check_api::api::{
    handlers::{health, heart_check},
    retention::{spawn_session_pruner, SessionRetention},
    routes::create_app_with_services,
};
use heart_check_domain::database;

/// Errors that stop the server from starting or running
#[derive(Debug, Error)]
enum AppError {
    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),

    #[error("Invalid PORT '{value}': {source}")]
    PortParse {
        value: String,
        source: std::num::ParseIntError,
    },
}

fn database_enabled() -> bool {
    std::env::var("ENABLE_DATABASE")
        .map(|v| !matches!(v.trim().to_lowercase().as_str(), "false" | "0" | "no"))
        .unwrap_or(true)
}

/// Prepare the data directory and open the session database.
/// Failures are logged and sessions fall back to memory.
fn setup_database() {
    if !database_enabled() {
        info!("Database disabled via ENABLE_DATABASE, session results are kept in memory");
        return;
    }

    let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string());
    let db_path = PathBuf::from(&data_dir).join("heart_check.db");

    if !PathBuf::from(&data_dir).exists() {
        info!("Creating data directory: {}", data_dir);
        if let Err(e) = std::fs::create_dir_all(&data_dir) {
            warn!("Failed to create data directory {}: {}", data_dir, e);
        }
    }

    if std::env::var("DB_SQLITE_PATH").is_err() {
        std::env::set_var("DB_SQLITE_PATH", db_path.to_string_lossy().to_string());
        info!("Set DB_SQLITE_PATH to {}", db_path.display());
    }

    match database::initialize_database_pool() {
        Ok(()) => {
            match database::get_connection_info() {
                Some(Ok(info)) if info.is_in_memory() => {
                    warn!("Database pool initialized on {}, session results will not survive a restart", info)
                }
                Some(Ok(info)) => info!("Database pool initialized: {}", info),
                Some(Err(e)) => error!("Database pool initialized but unusable: {}", e),
                None => {}
            }
        }
        Err(e) => error!("Failed to initialize database pool, using in-memory sessions: {}", e),
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    if dotenv().is_err() {
        eprintln!("Warning: .env file not found or couldn't be read. Using environment variables.");
    }

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer()
            .with_span_events(FmtSpan::CLOSE)
            .with_target(false)
            .with_ansi(true)
            .with_timer(fmt::time::uptime())
            .with_writer(std::io::stdout))
        .with(env_filter)
        .init();

    info!("Starting HeartCheck API server");

    setup_database();
    health::initialize_server_start_time();

    let heart_check_service = heart_check::create_service();
    let _pruner = spawn_session_pruner(heart_check_service.clone(), SessionRetention::from_env());

    let app = create_app_with_services(heart_check_service, health::create_health_service());

    let port_value = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let port = port_value
        .parse::<u16>()
        .map_err(|source| AppError::PortParse { value: port_value.clone(), source })?;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on CTRL+C or, on Unix, SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutting down server...");
}
