//! Utilities shared by the countdown server and client.

pub mod logger;
pub mod time;
