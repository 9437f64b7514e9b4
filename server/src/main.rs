use std::{fs::OpenOptions, net::SocketAddr, sync::Arc};

use anyhow::{Context, Result};
use local_ip_address::local_ip;
use relay_viewer_data_management::DataManager;
use server::{app, server_state::ServerState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_PORT: u16 = 8501;
const PORT_VAR: &str = "RELAY_VIEWER_PORT";

#[tokio::main]
async fn main() -> Result<()> {
    std::fs::create_dir_all("server/log").context("Failed to create log directory")?;
    let log_file = "server/log/server.log";

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Failed to open {}", log_file))?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| format!("{}=debug,relay_viewer_data_management=info", env!("CARGO_CRATE_NAME")).into())
        )
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(file))
        .init();

    tracing::info!("Starting server...");

    let data_manager = DataManager::start().await?;
    match data_manager.directories() {
        Ok(dirs) if dirs.is_empty() => tracing::warn!("No relay directory found in {:?}", data_manager.base_dir()),
        Ok(dirs) => {
            for dir in dirs {
                tracing::info!("Found relay directory {}", dir.display_name);
            }
        }
        Err(err) => tracing::error!("Failed to list relay directories: {}", err),
    }

    let ip_address = match local_ip() {
        Ok(ip) => Some(ip),
        Err(err) => {
            tracing::warn!("Could not determine the local network address: {}", err);
            None
        }
    };

    let server_state = Arc::new(ServerState {
        data_manager,
        ip_address,
    });

    let port = match std::env::var(PORT_VAR) {
        Ok(port) => port.parse().with_context(|| format!("Invalid {}: {}", PORT_VAR, port))?,
        Err(_) => DEFAULT_PORT,
    };

    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([0, 0, 0, 0], port)))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;

    tracing::info!("Local URL: http://localhost:{}", port);
    if let Some(ip) = ip_address {
        tracing::info!("Network URL: http://{}:{}", ip, port);
    }

    axum::serve(listener, app(server_state).into_make_service_with_connect_info::<SocketAddr>())
        .await
        .context("Server stopped")?;

    Ok(())
}
