//! contact-intake server binary.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use contact_intake::config::{load_config, watcher::ConfigWatcher};
use contact_intake::notification::{Notifier, SmtpNotifier};
use contact_intake::observability::{logging, metrics};
use contact_intake::store::PgContactStore;
use contact_intake::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "contact-intake")]
#[command(about = "Contact form intake service", long_about = None)]
struct Args {
    /// Optional TOML configuration file. Environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Do not watch the configuration file for changes.
    #[arg(long)]
    no_watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    logging::init_logging(&config.observability);

    tracing::info!("contact-intake v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address(),
        database_url = %config.database.url_masked(),
        rate_limit_enabled = config.rate_limit.enabled,
        max_requests = config.rate_limit.max_requests,
        window_secs = config.rate_limit.window_secs,
        notifications = config.mail.is_some(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let store = PgContactStore::connect(&config.database).await?;
    if config.database.auto_migrate {
        store.ensure_schema().await?;
    }

    let notifier: Option<Arc<dyn Notifier>> = match &config.mail {
        Some(mail) => Some(Arc::new(SmtpNotifier::new(mail)?)),
        None => {
            tracing::info!("Mail transport not configured, notifications disabled");
            None
        }
    };

    // Keep the watcher alive for the lifetime of the server.
    let (_watcher, config_updates) = match args.config.as_deref() {
        Some(path) if !args.no_watch => {
            let (watcher, updates) = ConfigWatcher::new(path, &config);
            (Some(watcher.run()?), updates)
        }
        _ => {
            let (_, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let listener = TcpListener::bind(config.listener.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "Server is listening");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, Arc::new(store.clone()), notifier);
    let mut server_task = tokio::spawn(server.run(listener, config_updates, shutdown.subscribe()));

    tokio::select! {
        _ = shutdown.trigger_on_signal() => server_task.await??,
        result = &mut server_task => result??,
    }

    store.close().await;
    tracing::info!("Shutdown complete");
    Ok(())
}
