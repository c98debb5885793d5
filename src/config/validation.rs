//! Configuration validation.
//!
//! Serde handles syntax; this module checks values. Every problem found is
//! reported, not just the first.

use lettre::Address;
use url::Url;

use crate::config::schema::ServiceConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Validate a loaded configuration.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.port == 0 {
        errors.push(ValidationError::new("listener.port", "must be non-zero"));
    }

    if config.database.url.is_empty() {
        errors.push(ValidationError::new(
            "database.url",
            "connection string is required (set DATABASE or DATABASE_URL)",
        ));
    } else if Url::parse(&config.database.url).is_err() {
        errors.push(ValidationError::new("database.url", "not a valid connection URL"));
    }

    if config.database.max_connections == 0 {
        errors.push(ValidationError::new("database.max_connections", "must be at least 1"));
    }

    if let Some(mail) = &config.mail {
        if mail.host.is_empty() {
            errors.push(ValidationError::new("mail.host", "must not be empty"));
        }
        if mail.recipient.parse::<Address>().is_err() {
            errors.push(ValidationError::new(
                "mail.recipient",
                format!("'{}' is not a mail address", mail.recipient),
            ));
        }
        match mail.from_address() {
            Some(from) if from.parse::<Address>().is_err() => {
                errors.push(ValidationError::new(
                    "mail.sender_address",
                    format!("'{}' is not a mail address", from),
                ));
            }
            Some(_) => {}
            None => errors.push(ValidationError::new(
                "mail.sender_address",
                "set sender_address or username",
            )),
        }
    }

    for origin in &config.cors.allowed_origins {
        if let Err(reason) = check_origin(origin) {
            errors.push(ValidationError::new(
                "cors.allowed_origins",
                format!("'{}' {}", origin, reason),
            ));
        }
    }

    let rl = &config.rate_limit;
    if rl.enabled {
        if rl.window_secs == 0 {
            errors.push(ValidationError::new("rate_limit.window_secs", "must be positive"));
        }
        if rl.max_requests == 0 {
            errors.push(ValidationError::new("rate_limit.max_requests", "must be positive"));
        }
        if rl.sweep_interval_secs == 0 {
            errors.push(ValidationError::new(
                "rate_limit.sweep_interval_secs",
                "must be positive",
            ));
        }
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::new("security.max_body_size", "must be positive"));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<std::net::SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            "not a socket address",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Origins are serialized as `scheme://host[:port]` by browsers. An entry
/// with a path or trailing slash would never match, so reject it up front.
fn check_origin(origin: &str) -> Result<(), &'static str> {
    let parsed = Url::parse(origin).map_err(|_| "is not a URL")?;
    if parsed.host_str().is_none() {
        return Err("has no host");
    }
    if parsed.origin().ascii_serialization() != origin {
        return Err("is not a bare origin (no path, query or trailing slash)");
    }
    Ok(())
}
