//! MessagePusher trait 定義
//!
//! 接続中のクライアント集合と、そのクライアントへのメッセージ送信を抽象化します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ClientId, MessagePushError};

/// クライアントへの送信チャンネル（JSON テキストを流す）
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// MessagePusher trait
///
/// 送信はすべて fire-and-forget。遅いクライアントや切断済みのクライアントが
/// 他のクライアントへの送信を遅延・失敗させてはならない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// クライアントを登録
    async fn register_client(
        &self,
        client_id: ClientId,
        sender: PusherChannel,
    ) -> Result<(), MessagePushError>;

    /// クライアントの登録を解除（存在しない場合は何もしない）
    async fn unregister_client(&self, client_id: &ClientId);

    /// 特定のクライアントにメッセージを送信
    async fn push_to(&self, client_id: &ClientId, content: &str) -> Result<(), MessagePushError>;

    /// 接続中の全クライアントにメッセージを送信
    ///
    /// 一部のクライアントへの送信失敗は許容し、送信できた数を返す
    async fn broadcast(&self, content: &str) -> usize;

    /// 接続中のクライアント ID 一覧
    async fn connected_clients(&self) -> Vec<ClientId>;
}
