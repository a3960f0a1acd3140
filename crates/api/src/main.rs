use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use autoriza_api::background::{orphan_files, retention};
use autoriza_api::config::ServerConfig;
use autoriza_api::router::build_app_router;
use autoriza_api::state::AppState;
use autoriza_api::storage::FileStore;
use autoriza_events::{
    EmailConfig, LogMailer, Mailer, NotificationBus, NotificationDispatcher, SmtpMailer,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    "autoriza_api=debug,autoriza_events=debug,tower_http=debug".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = autoriza_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    autoriza_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    autoriza_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- File storage ---
    let file_store = Arc::new(FileStore::new(
        config.upload.directory.clone(),
        config.upload.max_file_size,
    ));
    file_store
        .ensure_root()
        .await
        .expect("Failed to create upload directory");
    tracing::info!(directory = %file_store.root().display(), "Upload directory ready");

    // --- Notifications ---
    let notifications = Arc::new(NotificationBus::default());
    let mailer: Arc<dyn Mailer> = match EmailConfig::from_env() {
        Some(email_config) => {
            tracing::info!(host = %email_config.smtp_host, "SMTP delivery enabled");
            Arc::new(SmtpMailer::new(email_config).expect("Invalid SMTP configuration"))
        }
        None => {
            tracing::warn!("SMTP_HOST not set, emails will only be logged");
            Arc::new(LogMailer)
        }
    };
    let dispatcher_handle = tokio::spawn(NotificationDispatcher::run(
        notifications.subscribe(),
        mailer,
    ));

    // --- Maintenance jobs ---
    let maintenance_cancel = CancellationToken::new();
    let retention_handle = tokio::spawn(retention::run(
        pool.clone(),
        Arc::clone(&file_store),
        config.maintenance.retention_days,
        maintenance_cancel.clone(),
    ));
    let orphan_handle = tokio::spawn(orphan_files::run(
        pool.clone(),
        Arc::clone(&file_store),
        config.maintenance.orphan_grace_mins,
        maintenance_cancel.clone(),
    ));
    tracing::info!("Background services started (dispatcher, retention, orphan files)");

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        file_store,
        notifications: Arc::clone(&notifications),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    maintenance_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), retention_handle).await;
    let _ = tokio::time::timeout(Duration::from_secs(5), orphan_handle).await;
    tracing::info!("Maintenance jobs stopped");

    // Dropping the last bus handle closes the channel and lets the
    // dispatcher drain what is already queued.
    drop(notifications);
    let _ = tokio::time::timeout(Duration::from_secs(10), dispatcher_handle).await;
    tracing::info!("Notification dispatcher shut down");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
