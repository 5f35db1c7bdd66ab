/// Readiness probe backed by the player's status endpoint
use crate::state::ProbeStatus;
use async_trait::async_trait;
use jukebox_player_client::PlayerControl;
use jukebox_supervisor::ReadinessProbe;
use std::sync::Arc;

/// The player is ready once `GET /status` answers with a valid state.
pub struct PlayerProbe {
    player: Arc<dyn PlayerControl>,
    status: ProbeStatus,
}

impl PlayerProbe {
    pub fn new(player: Arc<dyn PlayerControl>, status: ProbeStatus) -> Self {
        Self { player, status }
    }
}

#[async_trait]
impl ReadinessProbe for PlayerProbe {
    async fn probe(&self) -> Result<(), String> {
        let result = self.player.get_status().await;
        self.status.record(result.is_ok());
        result.map(|_| ()).map_err(|e| e.cause())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jukebox_player_client::{PlayerClient, PlayerClientConfig};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_probe_records_outcome() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/status"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "tocando": false })),
            )
            .mount(&server)
            .await;

        let status = ProbeStatus::default();
        let client = PlayerClient::new(PlayerClientConfig::new(server.uri())).unwrap();
        let probe = PlayerProbe::new(Arc::new(client), status.clone());

        probe.probe().await.unwrap();
        assert!(status.last_ok());
    }

    #[tokio::test]
    async fn test_probe_failure_carries_cause() {
        let status = ProbeStatus::default();
        status.record(true);

        let client = PlayerClient::new(PlayerClientConfig::new("http://127.0.0.1:1")).unwrap();
        let probe = PlayerProbe::new(Arc::new(client), status.clone());

        let cause = probe.probe().await.unwrap_err();
        assert!(!cause.is_empty());
        assert!(!status.last_ok());
    }
}
