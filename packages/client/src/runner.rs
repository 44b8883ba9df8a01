//! Client execution logic with reconnection support.

use crate::{
    error::ClientError,
    reconnect::{ReconnectDecision, ReconnectPolicy},
    session::{SessionConfig, run_client_session},
};

/// Run the countdown client with reconnection logic
///
/// # Arguments
///
/// * `url` - WebSocket endpoint, e.g. `ws://127.0.0.1:3000/ws`
/// * `client_id` - Connection name; the server generates one when `None`
/// * `team` - Default team for `select` / `request`
pub async fn run_client(
    url: String,
    client_id: Option<String>,
    team: Option<String>,
) -> Result<(), ClientError> {
    let config = SessionConfig {
        url,
        client_id,
        team,
    };
    let mut policy = ReconnectPolicy::default();
    let mut attempt = 1;

    loop {
        tracing::info!(
            "Attempting to connect to {} as '{}' (attempt {}/{})",
            config.url,
            config.label(),
            attempt,
            policy.max_attempts()
        );

        let error = match run_client_session(&config).await {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                return Ok(());
            }
            Err(e) => e,
        };

        match policy.on_failure(&error) {
            ReconnectDecision::Exit => {
                tracing::error!("{}. Exiting.", error);
                return Err(error);
            }
            ReconnectDecision::GiveUp => {
                tracing::error!(
                    "Failed to reconnect after {} attempts: {}. Exiting.",
                    policy.max_attempts(),
                    error
                );
                return Err(error);
            }
            ReconnectDecision::Retry {
                attempt: next,
                delay,
            } => {
                tracing::warn!("{}", error);
                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    delay.as_secs(),
                    next,
                    policy.max_attempts()
                );
                attempt = next;
                tokio::time::sleep(delay).await;
            }
        }
    }
}
