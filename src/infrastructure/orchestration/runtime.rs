//! Service composition and lifecycle.
//!
//! [`run_with_shutdown`] wires the SQLite store, the order service, the
//! optional stream ingestor and the HTTP server, then runs until the shutdown
//! channel flips. [`execute_serve`] adds OS signal handling on top.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::adapter::inbound::http::{build_router, AppState};
use crate::adapter::outbound::sqlite::{create_pool, run_migrations, SqliteOrderStore};
use crate::adapter::outbound::websocket::{ReconnectingFeed, WebSocketFeed};
use crate::application::ingest::{IngestStats, StreamIngestor};
use crate::application::order::OrderService;
use crate::error::{Error, Result};
use crate::infrastructure::config::feed::FeedConfig;
use crate::infrastructure::config::settings::Config;
use crate::port::{MessageFeed, OrderStore};

/// Open the database and bring its schema up to date.
///
/// # Errors
///
/// Returns an error if the pool cannot be created or a migration fails.
pub fn open_store(database: &str) -> Result<SqliteOrderStore> {
    let pool = create_pool(database)?;
    run_migrations(&pool)?;
    Ok(SqliteOrderStore::new(pool))
}

/// The production feed: a reconnecting WebSocket consumer.
#[must_use]
pub fn build_feed(config: &FeedConfig) -> Box<dyn MessageFeed> {
    let socket = WebSocketFeed::new(
        config.url.as_str(),
        config.topic.as_str(),
        config.group_id.as_str(),
    );
    Box::new(ReconnectingFeed::new(socket, config.reconnection.clone()))
}

/// Run the service until `shutdown` flips to `true`.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or migrated, the listen
/// address cannot be bound, or the HTTP server fails.
pub async fn run_with_shutdown(config: Config, shutdown: watch::Receiver<bool>) -> Result<()> {
    let store: Arc<dyn OrderStore> = Arc::new(open_store(&config.database)?);
    info!(database = %config.database, "Order store ready");

    let feed = config.feed.enabled.then(|| build_feed(&config.feed));
    serve_with(config, store, feed, shutdown).await
}

/// Run the service over explicit collaborators.
///
/// # Errors
///
/// Returns an error if the listen address cannot be bound or the HTTP server
/// fails.
pub async fn serve_with(
    config: Config,
    store: Arc<dyn OrderStore>,
    feed: Option<Box<dyn MessageFeed>>,
    shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let service = Arc::new(OrderService::new(store));

    let ingest = match feed {
        Some(feed) => Some(spawn_ingestor(feed, Arc::clone(&service), shutdown.clone())),
        None => {
            info!("Order feed disabled");
            None
        }
    };

    let listener = TcpListener::bind(config.http.address.as_str()).await?;
    info!(address = %listener.local_addr()?, "HTTP server listening");

    let router = build_router(AppState::new(service), &config.http);
    let mut http_shutdown = shutdown;
    let served = axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let _ = http_shutdown.wait_for(|stop| *stop).await;
        })
        .await;

    if let Err(e) = served {
        error!(error = %e, "HTTP server failed");
        if let Some(handle) = ingest {
            handle.abort();
        }
        return Err(Error::Io(e));
    }
    info!("HTTP server stopped");

    if let Some(handle) = ingest {
        match handle.await {
            Ok(Ok(stats)) => info!(saved = stats.saved, "Stream ingestor drained"),
            Ok(Err(e)) => warn!(error = %e, "Stream ingestor exited with error"),
            Err(e) => error!(error = %e, "Stream ingestor task join failed"),
        }
    }
    Ok(())
}

fn spawn_ingestor(
    feed: Box<dyn MessageFeed>,
    service: Arc<OrderService>,
    shutdown: watch::Receiver<bool>,
) -> JoinHandle<Result<IngestStats>> {
    tokio::spawn(async move { StreamIngestor::new(feed, service).run(shutdown).await })
}

/// Run the service in the foreground until Ctrl-C or SIGTERM.
///
/// # Errors
///
/// Returns the service's error, or a join error if its task panicked.
pub async fn execute_serve(config: Config) -> Result<()> {
    info!(env = ?config.env, "orderbridge starting");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut app_handle = tokio::spawn(run_with_shutdown(config, shutdown_rx));

    tokio::select! {
        result = &mut app_handle => {
            map_app_result(result)?;
            info!("orderbridge stopped");
            return Ok(());
        }
        () = shutdown_signal() => {
            info!("Shutdown signal received");
            let _ = shutdown_tx.send(true);
        }
    }

    map_app_result(app_handle.await)?;
    info!("orderbridge stopped");
    Ok(())
}

fn map_app_result(result: std::result::Result<Result<()>, tokio::task::JoinError>) -> Result<()> {
    match result {
        Ok(Ok(())) => Ok(()),
        Ok(Err(error)) => {
            error!(error = %error, "Application exited with error");
            Err(error)
        }
        Err(error) => {
            error!(error = %error, "Application task join failed");
            Err(Error::Connection(error.to_string()))
        }
    }
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
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
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::testkit::domain::order_json;
    use crate::testkit::feed::ChannelFeed;
    use crate::testkit::store::MemoryOrderStore;

    fn test_config() -> Config {
        let mut config = Config::default();
        config.http.address = "127.0.0.1:0".into();
        config.http.static_dir = "does-not-exist".into();
        config
    }

    #[tokio::test]
    async fn open_store_migrates_a_fresh_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh.db");

        let store = open_store(path.to_str().unwrap()).unwrap();

        assert!(store.get_all_orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn serve_stops_on_shutdown_and_drains_ingestor() {
        let store = Arc::new(MemoryOrderStore::new());
        let (feed, tx) = ChannelFeed::new();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(serve_with(
            test_config(),
            Arc::clone(&store) as Arc<dyn OrderStore>,
            Some(Box::new(feed)),
            shutdown_rx,
        ));

        tx.send(order_json("via-feed")).unwrap();
        for _ in 0..100 {
            if store.stored("via-feed").is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(store.stored("via-feed").is_some());

        shutdown_tx.send(true).unwrap();
        let result = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("serve did not stop")
            .unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn occupied_address_is_an_error() {
        let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let mut config = test_config();
        config.http.address = taken.local_addr().unwrap().to_string();
        let (_tx, rx) = watch::channel(false);

        let result = serve_with(
            config,
            Arc::new(MemoryOrderStore::new()) as Arc<dyn OrderStore>,
            None,
            rx,
        )
        .await;

        assert!(result.is_err());
    }
}
