//! UseCase 層
//!
//! セッション（タイマー・チーム・問題文）に対する全操作は
//! `SessionBroadcaster` を通して直列に実行されます。

mod error;
mod session_broadcaster;

pub use error::ConnectError;
pub use session_broadcaster::{DEFAULT_TICK_INTERVAL, SessionBroadcaster};
