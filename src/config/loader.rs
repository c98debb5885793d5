//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use crate::config::schema::{MailConfig, ServiceConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid environment variable {var}: {reason}")]
    Env { var: &'static str, reason: String },
    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration: optional TOML file, then environment overrides, then
/// validation.
pub fn load_config(path: Option<&Path>) -> Result<ServiceConfig, ConfigError> {
    load_config_with(path, |key| std::env::var(key).ok())
}

/// [`load_config`] with an explicit variable lookup in place of the process
/// environment.
pub fn load_config_with<F>(path: Option<&Path>, lookup: F) -> Result<ServiceConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => parse_config(&fs::read_to_string(path)?)?,
        None => ServiceConfig::default(),
    };

    apply_env_overrides(&mut config, lookup)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Parse a TOML document without touching the environment.
pub fn parse_config(content: &str) -> Result<ServiceConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Overlay recognised environment variables onto `config`.
///
/// `lookup` abstracts `std::env::var` so tests can supply their own values.
/// Empty values are treated as unset.
pub fn apply_env_overrides<F>(config: &mut ServiceConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = get("DATABASE_URL").or_else(|| get("DATABASE")) {
        config.database.url = url;
    }

    if let Some(port) = get("PORT") {
        config.listener.port = parse_number("PORT", &port)?;
    }

    if let Some(origins) = get("ALLOWED_ORIGINS") {
        config.cors.allowed_origins = origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(String::from)
            .collect();
    }

    if let Some(hops) = get("TRUST_PROXY") {
        config.rate_limit.trusted_proxy_hops = parse_number("TRUST_PROXY", &hops)?;
    }

    if let Some(host) = get("SMTP_HOST") {
        let mail = config.mail.get_or_insert_with(|| MailConfig {
            host: String::new(),
            port: 587,
            username: None,
            password: None,
            sender_address: None,
            sender_name: "Contact Form".to_string(),
            recipient: String::new(),
        });
        mail.host = host;
    }

    if let Some(mail) = config.mail.as_mut() {
        if let Some(port) = get("SMTP_PORT") {
            mail.port = parse_number("SMTP_PORT", &port)?;
        }
        if let Some(user) = get("SMTP_USER") {
            mail.username = Some(user);
        }
        if let Some(pass) = get("SMTP_PASS") {
            mail.password = Some(pass);
        }
        if let Some(to) = get("MAIL_TO") {
            mail.recipient = to;
        }
    }

    Ok(())
}

fn parse_number<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Env {
        var,
        reason: e.to_string(),
    })
}
