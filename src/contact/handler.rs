//! Contact submission pipeline: validate, persist, notify, respond.

use std::sync::Arc;

use crate::contact::types::{ContactInput, ContactReceipt, ContactRecord, ContactSubmission};
use crate::notification::{self, Notifier};
use crate::observability::metrics;
use crate::store::{ContactStore, StoreError};

/// Why a submission was not accepted.
#[derive(Debug, thiserror::Error)]
pub enum ContactError {
    #[error("full name and work email are required")]
    Validation,
    #[error("failed to persist contact: {0}")]
    Persistence(#[from] StoreError),
}

/// Orchestrates a single contact submission.
pub struct ContactHandler {
    store: Arc<dyn ContactStore>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl ContactHandler {
    pub fn new(store: Arc<dyn ContactStore>, notifier: Option<Arc<dyn Notifier>>) -> Self {
        Self { store, notifier }
    }

    /// Handle one submission.
    ///
    /// The store write is awaited and never retried. Notification runs on a
    /// detached task after the receipt is built, so its outcome cannot reach
    /// the caller.
    pub async fn handle(&self, input: ContactInput) -> Result<ContactReceipt, ContactError> {
        let Some(submission) = ContactSubmission::from_input(input) else {
            tracing::debug!("Rejected contact submission with missing required fields");
            metrics::record_submission("invalid");
            return Err(ContactError::Validation);
        };

        let stored = match self.store.insert_contact(&submission).await {
            Ok(stored) => stored,
            Err(e) => {
                tracing::error!(error = %e, "Error saving contact");
                metrics::record_submission("failed");
                return Err(ContactError::Persistence(e));
            }
        };

        tracing::info!(
            contact_id = stored.id,
            created_at = %stored.created_at,
            "Contact saved"
        );
        metrics::record_submission("created");

        let receipt = ContactReceipt::new(stored);

        if let Some(notifier) = &self.notifier {
            notification::dispatch(notifier.clone(), ContactRecord::new(submission, stored));
        }

        Ok(receipt)
    }
}
