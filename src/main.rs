use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lunar_reminders::config::Config;
use lunar_reminders::db::{EventStore, InMemoryEventStore};
use lunar_reminders::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lunar_reminders=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing::info!("Starting Lunar Reminders Service");

    let store: Arc<dyn EventStore> = match &config.store.events_file {
        Some(path) => Arc::new(InMemoryEventStore::from_json_file(path).await?),
        None => {
            tracing::info!("EVENTS_FILE not set, starting with an empty event store");
            Arc::new(InMemoryEventStore::default())
        }
    };

    tracing::info!(
        "Recurrence search bound: {} lunar years",
        config.recurrence.search_years
    );

    let app_state = Arc::new(AppState::new(config.clone(), store));
    let app = lunar_reminders::app(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let server_fut = axum::serve(listener, app.into_make_service());

    let signal_fut = async {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut term) => {
                    tokio::select! {
                        _ = ctrl_c => {},
                        _ = term.recv() => {},
                    }
                }
                Err(e) => {
                    tracing::warn!("Failed to bind SIGTERM: {}", e);
                    let _ = ctrl_c.await;
                }
            }
        }

        #[cfg(not(unix))]
        {
            let _ = ctrl_c.await;
        }

        tracing::info!("Shutdown signal received");
    };

    tokio::select! {
        res = server_fut => {
            if let Err(e) = res {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = signal_fut => {
            tracing::info!("Server stopped accepting new connections");
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
