//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続中クライアントの `UnboundedSender` を管理（接続時に追加、切断時に削除）
//! - クライアントへのメッセージ送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に使用します。
//! 送信は unbounded channel への push のみで、ソケットへの書き込みは
//! クライアントごとの pusher ループが行うため、遅いクライアントが他を待たせることはありません。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ClientId, MessagePushError, MessagePusher, PusherChannel};

/// WebSocket を使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let clients = Arc::new(Mutex::new(HashMap::new()));
/// let pusher = WebSocketMessagePusher::new(clients.clone());
///
/// pusher.broadcast("{\"type\":\"state\",...}").await;
/// ```
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの WebSocket sender
    ///
    /// Key: client_id (String)
    /// Value: PusherChannel
    clients: Arc<Mutex<HashMap<String, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new(clients: Arc<Mutex<HashMap<String, PusherChannel>>>) -> Self {
        Self { clients }
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(HashMap::new())))
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(
        &self,
        client_id: ClientId,
        sender: PusherChannel,
    ) -> Result<(), MessagePushError> {
        let mut clients = self.clients.lock().await;
        if clients.contains_key(client_id.as_str()) {
            return Err(MessagePushError::AlreadyRegistered(client_id.into_string()));
        }
        tracing::debug!("Client '{}' registered to MessagePusher", client_id);
        clients.insert(client_id.into_string(), sender);
        Ok(())
    }

    async fn unregister_client(&self, client_id: &ClientId) {
        let mut clients = self.clients.lock().await;
        if clients.remove(client_id.as_str()).is_some() {
            tracing::debug!("Client '{}' unregistered from MessagePusher", client_id);
        }
    }

    async fn push_to(&self, client_id: &ClientId, content: &str) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;

        let sender = clients
            .get(client_id.as_str())
            .ok_or_else(|| MessagePushError::ClientNotFound(client_id.as_str().to_string()))?;
        sender
            .send(content.to_string())
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed message to client '{}'", client_id);
        Ok(())
    }

    async fn broadcast(&self, content: &str) -> usize {
        let clients = self.clients.lock().await;

        let mut delivered = 0;
        for (id, sender) in clients.iter() {
            // ブロードキャストでは一部の送信失敗を許容
            match sender.send(content.to_string()) {
                Ok(()) => delivered += 1,
                Err(e) => tracing::warn!("Failed to push message to client '{}': {}", id, e),
            }
        }
        tracing::debug!("Broadcasted message to {}/{} clients", delivered, clients.len());
        delivered
    }

    async fn connected_clients(&self) -> Vec<ClientId> {
        let clients = self.clients.lock().await;
        let mut ids: Vec<ClientId> = clients
            .keys()
            .filter_map(|id| ClientId::try_from(id.as_str()).ok())
            .collect();
        ids.sort();
        ids
    }
}
