//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → headers.rs (hardening headers on the way out)
//!     → origin.rs (allow-list check, CORS pre-flight)
//!     → rate_limit.rs (per-client fixed window, identity from client_ip.rs)
//!     → Pass to routing
//! ```
//!
//! # Design Decisions
//! - Fail closed: reject on any security check failure
//! - Origin is checked first so pre-flights are never counted
//! - Rate state is owned by the server, not a global

pub mod client_ip;
pub mod headers;
pub mod origin;
pub mod rate_limit;

pub use origin::{OriginDecision, OriginPolicy};
pub use rate_limit::{FixedWindowLimiter, RateDecision};
