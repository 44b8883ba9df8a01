//! Data Transfer Objects (DTOs) for the countdown protocol.
//!
//! - `websocket`: inbound command envelopes and the outbound `state` frame
//! - `conversion`: mapping between DTOs and domain values

pub mod conversion;
pub mod websocket;
