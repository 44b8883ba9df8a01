//! Server state shared by every handler.

use std::sync::Arc;

use crate::usecase::SessionBroadcaster;

/// Shared application state
pub struct AppState {
    /// SessionBroadcaster（セッション操作と配信のユースケース）
    pub broadcaster: Arc<SessionBroadcaster>,
}
