//! Best-effort operator notification.
//!
//! # Data Flow
//! ```text
//! handler (after a successful insert)
//!     → dispatch() spawns a detached task
//!     → Notifier::notify (SMTP)
//!     → outcome logged + counted, never returned to the caller
//! ```

pub mod smtp;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinHandle;

use crate::contact::ContactRecord;
use crate::observability::metrics;

pub use smtp::SmtpNotifier;

/// Errors raised while notifying. Only ever logged.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("smtp transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
    #[error("notification rejected: {0}")]
    Rejected(String),
}

/// Something that tells an operator about a new contact.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, record: &ContactRecord) -> Result<(), NotificationError>;
}

/// Run `notifier` on a detached task. The handle is returned for callers
/// that want to observe completion; the request path drops it.
pub fn dispatch(notifier: Arc<dyn Notifier>, record: ContactRecord) -> JoinHandle<()> {
    tokio::spawn(async move {
        match notifier.notify(&record).await {
            Ok(()) => {
                tracing::debug!(contact_id = record.id, "Contact notification sent");
                metrics::record_notification("sent");
            }
            Err(e) => {
                tracing::warn!(contact_id = record.id, error = %e, "Contact notification failed");
                metrics::record_notification("failed");
            }
        }
    })
}

/// Plain-text body for the operator email.
pub fn render_body(record: &ContactRecord) -> String {
    let sub = &record.submission;
    let or_dash = |v: Option<&str>| v.unwrap_or("–").to_string();

    format!(
        "New contact form submission:\n\
         \n\
         • Full Name: {}\n\
         • Company Name: {}\n\
         • Job Title: {}\n\
         • Work Email: {}\n\
         \n\
         Sent on: {}\n",
        sub.full_name,
        or_dash(sub.company_name.as_deref()),
        or_dash(sub.job_title.as_deref()),
        sub.work_email,
        record.created_at.to_rfc3339(),
    )
}
