use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use room_persistence::connection::connect_and_migrate;
use room_persistence::repositories::{RoomRepository, UserRepository};
use room_server::{auth::AuthService, config::Config, create_routes};

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm = match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                if signal::ctrl_c().await.is_ok() {
                    info!("Received Ctrl+C, shutting down gracefully...");
                }
                return;
            }
        };

        tokio::select! {
            _ = signal::ctrl_c() => {
                info!("Received SIGINT, shutting down gracefully...");
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down gracefully...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        info!("Received Ctrl+C, shutting down gracefully...");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting live room server...");

    let config = Config::from_env().context("invalid configuration")?;
    let addr = config.bind_address().context("invalid bind address")?;

    let db = connect_and_migrate(&config.database_url)
        .await
        .context("failed to connect to database and run migrations")?;

    let user_repository = Arc::new(UserRepository::new(db.clone()));
    let room_repository = Arc::new(RoomRepository::new(db, config.max_user_count));
    let auth_service = Arc::new(AuthService::new(user_repository.clone()));

    info!(
        "Rooms open with {} seats each",
        room_repository.max_user_count()
    );

    let routes = create_routes(auth_service, user_repository, room_repository);

    let (addr, server) = warp::serve(routes)
        .try_bind_with_graceful_shutdown(addr, shutdown_signal())
        .with_context(|| format!("failed to bind {}", addr))?;

    info!(
        "Server started successfully on {}. Press Ctrl+C to stop.",
        addr
    );
    server.await;
    info!("Server shutdown complete.");

    Ok(())
}
