//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, security headers, origin and
//!   rate policies, body limit)
//! - Bind server to listener
//! - Run the rate window sweeper and apply config reloads
//! - Graceful shutdown

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderName, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ServiceConfig;
use crate::contact::{ContactHandler, ContactInput};
use crate::http::request::{UuidRequestId, X_REQUEST_ID};
use crate::http::response::ApiError;
use crate::notification::Notifier;
use crate::security::headers::with_security_headers;
use crate::security::origin::{origin_middleware, OriginPolicy};
use crate::security::rate_limit::{
    rate_limit_middleware, run_sweeper, FixedWindowLimiter, RateLimitState,
};
use crate::store::ContactStore;

/// Liveness body for `GET /`.
pub const LIVENESS_MESSAGE: &str = "Contact intake service is running!";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub contacts: Arc<ContactHandler>,
}

/// HTTP server for the contact intake service.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
    origin_policy: Arc<OriginPolicy>,
    limiter: Option<Arc<FixedWindowLimiter>>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and collaborators.
    pub fn new(
        config: ServiceConfig,
        store: Arc<dyn ContactStore>,
        notifier: Option<Arc<dyn Notifier>>,
    ) -> Self {
        let contacts = Arc::new(ContactHandler::new(store, notifier));
        let origin_policy = Arc::new(OriginPolicy::new(config.cors.allowed_origins.clone()));
        let limiter = config
            .rate_limit
            .enabled
            .then(|| Arc::new(FixedWindowLimiter::from_config(&config.rate_limit)));

        let state = AppState { contacts };
        let router = Self::build_router(&config, state, origin_policy.clone(), limiter.clone());

        Self {
            router,
            config,
            origin_policy,
            limiter,
        }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layers run outermost first: request ID, trace, security headers,
    /// origin policy, rate policy, body limit, then the route.
    fn build_router(
        config: &ServiceConfig,
        state: AppState,
        origin_policy: Arc<OriginPolicy>,
        limiter: Option<Arc<FixedWindowLimiter>>,
    ) -> Router {
        let mut router = Router::new()
            .route("/", get(liveness))
            .route("/contact", post(submit_contact))
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.security.max_body_size));

        if let Some(limiter) = limiter {
            let rate_state = RateLimitState {
                limiter,
                trusted_proxy_hops: config.rate_limit.trusted_proxy_hops,
            };
            router = router.layer(middleware::from_fn_with_state(rate_state, rate_limit_middleware));
        }

        router = router.layer(middleware::from_fn_with_state(origin_policy, origin_middleware));

        if config.security.enable_headers {
            router = with_security_headers(router);
        }

        let request_id = HeaderName::from_static(X_REQUEST_ID);
        router
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::new(request_id.clone()))
            .layer(SetRequestIdLayer::new(request_id, UuidRequestId))
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires. Configs received on `config_updates` replace the
    /// origin allow-list.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<ServiceConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            rate_limit = self.limiter.is_some(),
            origins = ?self.origin_policy.allowed_origins(),
            "HTTP server starting"
        );

        if let Some(limiter) = self.limiter.clone() {
            tokio::spawn(run_sweeper(
                limiter,
                self.config.rate_limit.sweep_interval(),
                shutdown.resubscribe(),
            ));
        }

        let origin_policy = self.origin_policy.clone();
        let mut reload_shutdown = shutdown.resubscribe();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    update = config_updates.recv() => match update {
                        Some(config) => origin_policy.replace(config.cors.allowed_origins),
                        None => break,
                    },
                    _ = reload_shutdown.recv() => break,
                }
            }
        });

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn liveness() -> &'static str {
    LIVENESS_MESSAGE
}

async fn submit_contact(
    State(state): State<AppState>,
    input: ContactInput,
) -> Result<impl IntoResponse, ApiError> {
    let receipt = state.contacts.handle(input).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}
