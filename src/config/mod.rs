//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, then environment overrides)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → server swaps the origin allow-list
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Environment variables win over the file
//! - Only the origin allow-list is applied on reload; everything else needs a restart

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, load_config_with, ConfigError};
pub use schema::{
    CorsConfig, DatabaseConfig, ListenerConfig, LogFormat, MailConfig, ObservabilityConfig,
    RateLimitConfig, SecurityConfig, ServiceConfig,
};
