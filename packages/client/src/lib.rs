//! Terminal viewer and command console for the contest countdown server.

pub mod command;
pub mod error;
pub mod formatter;
pub mod reconnect;
mod runner;
mod session;
mod ui;

pub use runner::run_client;
