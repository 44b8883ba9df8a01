//! Infrastructure layer: wire DTOs, the JSON snapshot encoder, the WebSocket
//! message pusher and startup seeding of the catalog and roster.

pub mod dto;
pub mod message_pusher;
pub mod seed;
pub mod snapshot_encoder;
