/// Shared application state for the webserver
///
/// Owns the store, the subscription registry and the ingestion service.
/// Route handlers receive it as `State<Arc<AppState>>`.
use std::sync::Arc;
use tokio::sync::watch;

use crate::config::Config;
use crate::database::{ReadingStore, SqliteStore};
use crate::readings::IngestionService;
use crate::webserver::ws::{Broadcaster, SubscriptionRegistry};

pub struct AppState {
    /// Configuration snapshot taken at startup
    pub config: Arc<Config>,

    pub store: Arc<SqliteStore>,

    /// Live readings-channel subscriptions
    pub registry: Arc<SubscriptionRegistry>,

    pub ingest: Arc<IngestionService>,

    /// Server startup time
    pub startup_time: chrono::DateTime<chrono::Utc>,

    /// Flipped to `true` once to close open channels on shutdown
    shutdown_tx: watch::Sender<bool>,
}

impl AppState {
    pub fn new(config: Config, store: SqliteStore) -> Self {
        let store = Arc::new(store);
        let registry = SubscriptionRegistry::new(config.websocket.buffer_size);
        let broadcaster = Arc::new(Broadcaster::new(Arc::clone(&registry)));
        let reading_store: Arc<dyn ReadingStore> = store.clone();
        let ingest = Arc::new(IngestionService::new(reading_store, broadcaster));
        let (shutdown_tx, _) = watch::channel(false);

        Self {
            config: Arc::new(config),
            store,
            registry,
            ingest,
            startup_time: chrono::Utc::now(),
            shutdown_tx,
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        (chrono::Utc::now() - self.startup_time)
            .num_seconds()
            .max(0) as u64
    }

    pub fn shutdown_receiver(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }

    /// Tell every open channel to close
    pub fn signal_shutdown(&self) {
        self.shutdown_tx.send_replace(true);
    }
}
