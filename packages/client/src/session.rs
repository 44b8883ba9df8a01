//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use reqwest::Url;
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{Error as WsError, http::StatusCode, protocol::Message},
};

use countdown_server::infrastructure::dto::websocket::StateMessage;

use crate::{
    command::{ConsoleAction, parse_line},
    error::ClientError,
    formatter::StateFormatter,
    ui::{prompt, redisplay_prompt},
};

/// Connection settings shared by every reconnect attempt
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub url: String,
    pub client_id: Option<String>,
    pub team: Option<String>,
}

impl SessionConfig {
    /// Endpoint with the percent-encoded `client_id` query, when one is set
    fn connect_url(&self) -> Result<String, ClientError> {
        let mut url = Url::parse(&self.url).map_err(|e| ClientError::Unreachable {
            url: self.url.clone(),
            reason: e.to_string(),
        })?;
        if let Some(client_id) = &self.client_id {
            url.query_pairs_mut().append_pair("client_id", client_id);
        }
        Ok(url.into())
    }

    /// Label shown in the prompt
    pub fn label(&self) -> &str {
        self.team
            .as_deref()
            .or(self.client_id.as_deref())
            .unwrap_or("countdown")
    }
}

/// Decode a text frame as a `state` message
fn decode_state(text: &str) -> Result<StateMessage, ClientError> {
    serde_json::from_str(text).map_err(|e| ClientError::InvalidStateFrame(e.to_string()))
}

/// Run one WebSocket client session until the user quits or the connection drops
pub async fn run_client_session(config: &SessionConfig) -> Result<(), ClientError> {
    let url = config.connect_url()?;
    let (ws_stream, _response) = match connect_async(url.as_str()).await {
        Ok(result) => result,
        Err(WsError::Http(response)) if response.status() == StatusCode::CONFLICT => {
            return Err(ClientError::ClientIdInUse(
                config.client_id.clone().unwrap_or_default(),
            ));
        }
        Err(e) => {
            return Err(ClientError::Unreachable {
                url,
                reason: e.to_string(),
            });
        }
    };

    tracing::info!("Connected to countdown server!");
    println!(
        "\nConnected as '{}'. Type 'help' for commands. Press Ctrl+C to exit.\n",
        config.label()
    );

    let (mut write, mut read) = ws_stream.split();

    let label_for_read = config.label().to_string();
    let focus_team = config.team.clone();

    // Spawn a task to render incoming state frames
    let mut read_task = tokio::spawn(async move {
        let mut connection_error = false;

        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let formatted = match decode_state(text.as_str()) {
                        Ok(state) => StateFormatter::format_state(&state, focus_team.as_deref()),
                        Err(e) => {
                            tracing::debug!("{}", e);
                            StateFormatter::format_raw_message(text.as_str())
                        }
                    };
                    print!("{}", formatted);
                    redisplay_prompt(&label_for_read);
                }
                Ok(Message::Binary(data)) => {
                    print!("{}", StateFormatter::format_binary_message(data.len()));
                    redisplay_prompt(&label_for_read);
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    connection_error = true;
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    connection_error = true;
                    break;
                }
                _ => {}
            }
        }

        connection_error
    });

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    let prompt_text = prompt(config.label());
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(&prompt_text) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Spawn a task to turn input lines into commands
    let default_team = config.team.clone();
    let label_for_write = config.label().to_string();
    let mut write_task = tokio::spawn(async move {
        let mut write_error = false;

        while let Some(line) = input_rx.recv().await {
            let envelope = match parse_line(&line, default_team.as_deref()) {
                Ok(ConsoleAction::Send(envelope)) => envelope,
                Ok(ConsoleAction::Help) => {
                    print!("{}", StateFormatter::format_help());
                    redisplay_prompt(&label_for_write);
                    continue;
                }
                Ok(ConsoleAction::Quit) => break,
                Err(e) => {
                    print!("{}", StateFormatter::format_input_error(&e));
                    redisplay_prompt(&label_for_write);
                    continue;
                }
            };

            let json = match serde_json::to_string(&envelope) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize command: {}", e);
                    continue;
                }
            };

            if let Err(e) = write.send(Message::Text(json.into())).await {
                tracing::warn!("Failed to send command: {}", e);
                write_error = true;
                break;
            }
            tracing::debug!("Sent '{}'", envelope.event);
        }

        if !write_error {
            write.close().await.ok();
        }
        write_error
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        read_result = &mut read_task => {
            write_task.abort();
            if read_result.unwrap_or(false) {
                return Err(ClientError::ConnectionLost);
            }
        }
        write_result = &mut write_task => {
            read_task.abort();
            if write_result.unwrap_or(false) {
                return Err(ClientError::ConnectionLost);
            }
        }
    }

    Ok(())
}
