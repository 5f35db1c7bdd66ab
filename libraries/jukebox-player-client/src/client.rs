//! HTTP implementation of [`PlayerControl`].

use crate::command::{PlayerCommand, PlayerControl};
use crate::error::{PlayerClientError, Result};
use crate::types::PlayerClientConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Longest upstream error text copied into a failure message
const MAX_CAUSE_LEN: usize = 200;

/// Client for the player-control endpoint.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct PlayerClient {
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl PlayerClient {
    /// Create a new client with the given configuration.
    pub fn new(config: PlayerClientConfig) -> Result<Self> {
        if config.url.is_empty() {
            return Err(PlayerClientError::InvalidUrl("URL cannot be empty".into()));
        }

        let parsed = url::Url::parse(&config.url)
            .map_err(|e| PlayerClientError::InvalidUrl(format!("{}: {}", config.url, e)))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(PlayerClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let base_url = config.url.trim_end_matches('/').to_string();

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .user_agent(format!("Jukebox/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PlayerClientError::Unavailable(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            timeout: config.timeout,
        })
    }

    /// Get the normalized base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn transport_error(&self, error: &reqwest::Error) -> PlayerClientError {
        let cause = if error.is_timeout() {
            format!("Player did not answer within {:?}", self.timeout)
        } else if error.is_connect() {
            format!("Could not connect to player at {}", self.base_url)
        } else {
            error.to_string()
        };
        PlayerClientError::Unavailable(cause)
    }
}

#[async_trait]
impl PlayerControl for PlayerClient {
    async fn send(&self, command: PlayerCommand) -> Result<Value> {
        let url = format!("{}{}", self.base_url, command.endpoint());
        debug!(command = command.name(), url = %url, "Sending player command");

        let mut request = self.http.request(command.method(), url.as_str());
        if let Some(body) = command.body() {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|e| {
            warn!(command = command.name(), error = %e, "Player request failed");
            self.transport_error(&e)
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error(&e))?;

        if !status.is_success() {
            warn!(
                command = command.name(),
                status = status.as_u16(),
                "Player rejected command"
            );
            return Err(PlayerClientError::Unavailable(format!(
                "Player returned {}: {}",
                status.as_u16(),
                error_cause(&text)
            )));
        }

        if text.trim().is_empty() && command.allows_empty_response() {
            return Ok(Value::Object(serde_json::Map::new()));
        }

        serde_json::from_str(&text).map_err(|e| {
            warn!(command = command.name(), error = %e, "Unparseable player response");
            PlayerClientError::Unavailable(format!("Malformed response from player: {}", e))
        })
    }
}

/// Pull a readable message out of an error body.
///
/// Prefers an `error` or `message` string field when the body is JSON.
fn error_cause(body: &str) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|value| {
        ["error", "message"]
            .iter()
            .find_map(|key| value.get(key).and_then(Value::as_str).map(str::to_string))
    });

    let cause = from_json.unwrap_or_else(|| body.trim().to_string());
    if cause.is_empty() {
        return "empty response".to_string();
    }

    match cause.char_indices().nth(MAX_CAUSE_LEN) {
        Some((idx, _)) => format!("{}...", &cause[..idx]),
        None => cause,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_cause_prefers_json_field() {
        assert_eq!(error_cause(r#"{"error":"no mixer"}"#), "no mixer");
        assert_eq!(error_cause(r#"{"message":"busy"}"#), "busy");
        assert_eq!(error_cause("  plain text  "), "plain text");
        assert_eq!(error_cause(""), "empty response");
    }

    #[test]
    fn test_error_cause_is_truncated() {
        let long = "x".repeat(500);
        let cause = error_cause(&long);
        assert_eq!(cause.len(), MAX_CAUSE_LEN + 3);
        assert!(cause.ends_with("..."));
    }
}
