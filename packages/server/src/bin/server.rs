//! Contest countdown server.
//!
//! Keeps one countdown timer, the team roster and the problem catalog in memory
//! and pushes the full session state to every connected WebSocket client.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin countdown-server
//! cargo run --bin countdown-server -- --host 0.0.0.0 --port 3000 --teams 20
//! ```

use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::Parser;
use countdown_server::{
    domain::{Countdown, DurationMs, Session, entity::DEFAULT_DURATION_MS},
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        seed::{SeedError, load_catalog, reference_catalog, seed_roster},
        snapshot_encoder::JsonSnapshotEncoder,
    },
    ui::Server,
    usecase::{DEFAULT_TICK_INTERVAL, SessionBroadcaster},
};
use countdown_shared::{
    logger::setup_logger,
    time::{SystemClock, get_timestamp, timestamp_to_rfc3339},
};

#[derive(Parser, Debug)]
#[command(name = "countdown-server")]
#[command(about = "Contest countdown server with live roster sync", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "3000")]
    port: u16,

    /// Duration restored by `reset` without a payload, in milliseconds
    #[arg(long, default_value_t = DEFAULT_DURATION_MS)]
    default_duration_ms: u64,

    /// Interval between countdown broadcasts while running, in milliseconds
    #[arg(long, default_value_t = DEFAULT_TICK_INTERVAL.as_millis() as u64)]
    tick_interval_ms: u64,

    /// Number of teams created at startup
    #[arg(long, default_value = "50")]
    teams: usize,

    /// JSON file with the problem catalog (built-in catalog when omitted)
    #[arg(long)]
    catalog: Option<PathBuf>,
}

fn build_session(args: &Args) -> Result<Session, SeedError> {
    let catalog = match &args.catalog {
        Some(path) => load_catalog(path)?,
        None => reference_catalog()?,
    };
    let roster = seed_roster(args.teams)?;
    let countdown = Countdown::new(DurationMs::try_from(args.default_duration_ms)?);

    tracing::info!(
        "Session seeded with {} teams and {} problems",
        roster.len(),
        catalog.len()
    );
    Ok(Session::new(countdown, roster, catalog))
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Session
    // 2. MessagePusher
    // 3. UseCase
    // 4. Server

    // 1. Seed the session
    let session = match build_session(&args) {
        Ok(session) => session,
        Err(e) => {
            tracing::error!("Failed to build session: {}", e);
            std::process::exit(1);
        }
    };

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::default());

    // 3. Create UseCase
    let broadcaster = SessionBroadcaster::new(
        session,
        message_pusher,
        Arc::new(JsonSnapshotEncoder),
        Arc::new(SystemClock),
        Duration::from_millis(args.tick_interval_ms.max(1)),
    );
    tracing::info!(
        "Session created at {}",
        timestamp_to_rfc3339(get_timestamp())
    );

    // 4. Create and run the server
    let server = Server::new(broadcaster);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
