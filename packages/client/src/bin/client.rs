//! Terminal client for the contest countdown server.
//!
//! Shows the shared countdown and the active teams, and sends timer / roster
//! commands typed at the prompt. Automatically reconnects on disconnection
//! (max 5 attempts with 5 second interval). Duplicate client_id connections
//! are rejected by the server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin countdown-client -- --client-id judge
//! cargo run --bin countdown-client -- -c owls -t team-7
//! ```

use clap::Parser;

use countdown_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "countdown-client")]
#[command(about = "Terminal viewer and command console for the countdown server", long_about = None)]
struct Args {
    /// Client ID (must be unique while connected; generated by the server when omitted)
    #[arg(short = 'c', long)]
    client_id: Option<String>,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:3000/ws")]
    url: String,

    /// Default team id for `select` and `request`
    #[arg(short = 't', long)]
    team: Option<String>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Run the client
    if let Err(e) = countdown_client::run_client(args.url, args.client_id, args.team).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
