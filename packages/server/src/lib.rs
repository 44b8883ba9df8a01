//! Contest countdown server library.
//!
//! Keeps one countdown timer and one team roster in memory and pushes the full
//! session state to every connected WebSocket viewer whenever it changes.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
