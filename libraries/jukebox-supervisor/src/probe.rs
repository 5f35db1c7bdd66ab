/// Readiness check for a freshly spawned process
use async_trait::async_trait;

/// Answers "is the player accepting commands yet?".
///
/// `Err` carries a short reason that ends up in debug logs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    async fn probe(&self) -> Result<(), String>;
}
