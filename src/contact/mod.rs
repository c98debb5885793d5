//! Contact form domain.
//!
//! # Data Flow
//! ```text
//! ContactInput (raw JSON or form fields)
//!     → ContactSubmission (required fields present)
//!     → ContactStore::insert_contact → StoredContact { id, created_at }
//!     → ContactReceipt (201 body) + ContactRecord (to the notifier)
//! ```

pub mod handler;
pub mod types;

pub use handler::{ContactError, ContactHandler};
pub use types::{ContactInput, ContactReceipt, ContactRecord, ContactSubmission, StoredContact};
