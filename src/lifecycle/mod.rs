//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Connect store → Build notifier → Bind listener
//!
//! Shutdown (shutdown.rs):
//!     Signal received (signals.rs) → Stop accepting → Drain requests → Close pool
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Detached notification tasks are not awaited on shutdown

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
