//! WebSocket / HTTP server for the shared countdown session.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::Server;
