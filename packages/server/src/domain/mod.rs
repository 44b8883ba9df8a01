//! Domain layer: value objects, entities, the session aggregate and the ports
//! the use cases depend on.

pub mod command;
pub mod entity;
pub mod error;
pub mod message_pusher;
pub mod session;
pub mod snapshot_encoder;
pub mod value_object;

pub use command::SessionCommand;
pub use entity::{Catalog, Countdown, ProblemStatement, Roster, Task, TaskStatus, Team, TickOutcome};
pub use error::{
    CatalogError, ClockError, CommandError, MessagePushError, RosterError, SnapshotEncodeError,
    ValueObjectError,
};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use session::{ClockEffect, Session, SessionSnapshot};
pub use snapshot_encoder::SnapshotEncoder;
pub use value_object::{ClientId, DurationMs, ProblemId, TaskIndex, TeamId, TeamName, Timestamp};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
#[cfg(test)]
pub use snapshot_encoder::MockSnapshotEncoder;
