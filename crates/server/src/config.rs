//! Server configuration.

use serde::Deserialize;
use thiserror::Error;

/// Server-level configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Log filter used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            log_level: "info".to_string(),
        }
    }
}

/// Webhook route configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// Route the provider POSTs events to.
    pub path: String,
    /// Shared secret for signature verification. When unset, the
    /// `FACEGATE_CLIENT_SECRET` environment variable is consulted; when that
    /// is unset too, verification is skipped.
    pub secret: Option<String>,
    /// Whether to record per-event metrics.
    pub stats: bool,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            path: "/hooks/facegate".to_string(),
            secret: None,
            stats: true,
        }
    }
}

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    server: ServerConfig,
    webhook: WebhookConfig,
}

/// Loads configuration from a TOML file.
pub fn load_config(path: &str) -> Result<(ServerConfig, WebhookConfig), ConfigError> {
    let content =
        std::fs::read_to_string(path).map_err(|err| ConfigError::Io(err.to_string()))?;
    parse_config(&content)
}

fn parse_config(content: &str) -> Result<(ServerConfig, WebhookConfig), ConfigError> {
    let config: FileConfig =
        toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
    Ok((config.server, config.webhook))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_the_common_case() {
        let (server, webhook) = parse_config("").unwrap();
        assert_eq!(server.port, 8000);
        assert_eq!(webhook.path, "/hooks/facegate");
        assert!(webhook.secret.is_none());
        assert!(webhook.stats);
    }

    #[test]
    fn parses_full_config() {
        let content = r#"
            [server]
            host = "127.0.0.1"
            port = 9090
            log_level = "debug"

            [webhook]
            path = "/hooks/events"
            secret = "946b9654dcfc55342c55e533805cdba6"
            stats = false
        "#;

        let (server, webhook) = parse_config(content).unwrap();
        assert_eq!(server.host, "127.0.0.1");
        assert_eq!(server.port, 9090);
        assert_eq!(webhook.path, "/hooks/events");
        assert_eq!(
            webhook.secret.as_deref(),
            Some("946b9654dcfc55342c55e533805cdba6")
        );
        assert!(!webhook.stats);
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            parse_config("[server"),
            Err(ConfigError::Parse(_))
        ));
    }
}
