//! Contact form intake service.
//!
//! Accepts contact submissions over HTTP, stores them in PostgreSQL and
//! optionally emails an operator.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──▶ http::server ──▶ security ──────────▶ contact::handler ──▶ store (PostgreSQL)
//!              (request id,     (origin policy,       (validate,            │
//!               trace, body      rate limit,           respond)             ▼
//!               limit)           headers)                          notification (SMTP,
//!                                                                  detached task)
//!
//!   Cross-cutting: config (TOML + env, hot reload of origins),
//!                  observability (tracing, Prometheus), lifecycle (signals, shutdown)
//! ```

// Core subsystems
pub mod config;
pub mod contact;
pub mod http;

// Collaborators
pub mod notification;
pub mod store;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
