//! Hot reload of the configuration file.
//!
//! Only the origin allow-list is applied live; the watcher still reloads and
//! validates the whole file so a broken edit is reported instead of applied.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::ServiceConfig;

/// Watches one configuration file and forwards reloaded configs whose
/// allow-list differs from the last one sent.
pub struct ConfigWatcher {
    path: PathBuf,
    origins: Vec<String>,
    update_tx: mpsc::UnboundedSender<ServiceConfig>,
}

impl ConfigWatcher {
    /// `current` is the configuration the server started with.
    pub fn new(path: &Path, current: &ServiceConfig) -> (Self, mpsc::UnboundedReceiver<ServiceConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let watcher = Self {
            path: path.to_path_buf(),
            origins: current.cors.allowed_origins.clone(),
            update_tx,
        };
        (watcher, update_rx)
    }

    /// Starts watching. The returned handle must be kept alive.
    ///
    /// The parent directory is watched so editors that save by renaming a
    /// temporary file over the original are still seen.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let Self { path, origins, update_tx } = self;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let file_name = path.file_name().map(|name| name.to_os_string());
        let last_origins = Mutex::new(origins);
        let config_path = path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                let event = match res {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::error!(error = ?e, "Config watch error");
                        return;
                    }
                };
                if !concerns_file(&event, file_name.as_deref()) {
                    return;
                }

                let config = match load_config(Some(config_path.as_path())) {
                    Ok(config) => config,
                    Err(e) => {
                        tracing::error!(error = %e, "Config reload failed, keeping current configuration");
                        return;
                    }
                };

                let Ok(mut last) = last_origins.lock() else {
                    return;
                };
                if *last == config.cors.allowed_origins {
                    tracing::debug!("Config file changed without touching the origin allow-list");
                    return;
                }
                *last = config.cors.allowed_origins.clone();
                tracing::info!(origins = ?config.cors.allowed_origins, "Origin allow-list change detected");
                let _ = update_tx.send(config);
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        tracing::info!(path = %path.display(), "Config watcher started");
        Ok(watcher)
    }
}

/// Whether `event` writes, creates or renames the watched file.
fn concerns_file(event: &Event, file_name: Option<&std::ffi::OsStr>) -> bool {
    let relevant_kind = matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_)
    );
    relevant_kind
        && event
            .paths
            .iter()
            .any(|p| p.file_name().is_some() && p.file_name() == file_name)
}
