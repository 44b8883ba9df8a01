//! SnapshotEncoder trait 定義
//!
//! セッションのスナップショットを、クライアントへ送るテキストに変換します。
//! ワイヤ形式の具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use super::{SessionSnapshot, SnapshotEncodeError};

/// SnapshotEncoder trait
#[cfg_attr(test, mockall::automock)]
pub trait SnapshotEncoder: Send + Sync {
    /// スナップショットを 1 フレーム分のテキストに変換
    fn encode(&self, snapshot: &SessionSnapshot) -> Result<String, SnapshotEncodeError>;
}
