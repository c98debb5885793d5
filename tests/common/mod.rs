//! Shared fakes and request helpers for integration tests.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{header, Request, Response};
use chrono::Utc;
use serde_json::Value;
use tokio::sync::mpsc;

use contact_intake::config::ServiceConfig;
use contact_intake::contact::{ContactRecord, ContactSubmission, StoredContact};
use contact_intake::notification::{NotificationError, Notifier};
use contact_intake::store::{ContactStore, StoreError};

/// In-memory store that remembers what it handed back.
#[derive(Default)]
pub struct MemoryStore {
    next_id: AtomicI64,
    fail: AtomicBool,
    rows: Mutex<Vec<(StoredContact, ContactSubmission)>>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        let store = Self::default();
        store.fail.store(true, Ordering::SeqCst);
        Arc::new(store)
    }

    pub fn rows(&self) -> Vec<(StoredContact, ContactSubmission)> {
        self.rows.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl ContactStore for MemoryStore {
    async fn insert_contact(&self, submission: &ContactSubmission) -> Result<StoredContact, StoreError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("simulated outage".into()));
        }
        let stored = StoredContact {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push((stored, submission.clone()));
        Ok(stored)
    }
}

/// Notifier that forwards every record to a channel, optionally slowly or
/// with a failure.
pub struct RecordingNotifier {
    tx: mpsc::UnboundedSender<ContactRecord>,
    delay: Duration,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new(delay: Duration, fail: bool) -> (Arc<Self>, mpsc::UnboundedReceiver<ContactRecord>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { tx, delay, fail }), rx)
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, record: &ContactRecord) -> Result<(), NotificationError> {
        tokio::time::sleep(self.delay).await;
        let _ = self.tx.send(record.clone());
        if self.fail {
            return Err(NotificationError::Rejected("simulated relay failure".into()));
        }
        Ok(())
    }
}

/// Minimal valid configuration for tests.
pub fn test_config() -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.listener.host = "127.0.0.1".into();
    config.database.url = "postgres://test@localhost/contacts".into();
    config
}

pub fn peer(last_octet: u8) -> SocketAddr {
    SocketAddr::from(([10, 0, 0, last_octet], 40000))
}

/// Builds a request as the server would see it from `from`.
pub fn request(
    method: &str,
    uri: &str,
    content_type: Option<&str>,
    body: impl Into<Body>,
    origin: Option<&str>,
    from: SocketAddr,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(ct) = content_type {
        builder = builder.header(header::CONTENT_TYPE, ct);
    }
    if let Some(origin) = origin {
        builder = builder.header(header::ORIGIN, origin);
    }
    let mut req = builder.body(body.into()).unwrap();
    req.extensions_mut().insert(ConnectInfo(from));
    req
}

pub fn post_json(body: &str, origin: Option<&str>) -> Request<Body> {
    request("POST", "/contact", Some("application/json"), body.to_string(), origin, peer(1))
}

pub fn get_root(from: SocketAddr) -> Request<Body> {
    request("GET", "/", None, Body::empty(), None, from)
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}
