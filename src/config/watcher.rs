//! Configuration file watcher for hot reload.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::{broadcast, mpsc};

use crate::config::loader::load_config;
use crate::config::schema::DispatchConfig;
use crate::registry::memory::InMemoryRegistry;

/// A watcher that monitors the configuration file for changes.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<DispatchConfig>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher.
    ///
    /// Returns the watcher and a receiver for configuration updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<DispatchConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching the file in a background thread.
    ///
    /// A change that fails to load or validate is logged and dropped; the
    /// previously applied configuration stays in effect.
    pub fn run(self, poll_interval: Duration) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx.clone();
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::info!("Endpoint file change detected, reloading...");
                        match load_config(&path) {
                            Ok(new_config) => {
                                let _ = tx.send(new_config);
                            }
                            Err(e) => {
                                tracing::error!(
                                    "Failed to reload endpoints: {}. Keeping current endpoint set.",
                                    e
                                );
                            }
                        }
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(poll_interval),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Endpoint file watcher started");
        Ok(watcher)
    }
}

/// Apply reloaded configurations to `registry` until the channel closes or
/// shutdown is signalled.
pub async fn run_update_loop(
    registry: Arc<InMemoryRegistry>,
    mut updates: mpsc::UnboundedReceiver<DispatchConfig>,
    mut shutdown: broadcast::Receiver<()>,
) {
    loop {
        tokio::select! {
            maybe_config = updates.recv() => {
                match maybe_config {
                    Some(config) => {
                        let endpoints = config.to_endpoints();
                        tracing::info!(endpoints = endpoints.len(), "Applying reloaded endpoint set");
                        registry.replace_all(endpoints);
                    }
                    None => {
                        tracing::debug!("Update channel closed, stopping update loop");
                        break;
                    }
                }
            }
            _ = shutdown.recv() => {
                tracing::info!("Shutdown signal received, stopping update loop");
                break;
            }
        }
    }
}
