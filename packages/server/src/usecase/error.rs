//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::SnapshotEncodeError;

/// 接続処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    /// 同じ client_id のクライアントが既に接続している
    #[error("client '{0}' is already connected")]
    DuplicateClientId(String),

    /// 初期同期用スナップショットの変換に失敗
    #[error(transparent)]
    SnapshotEncoding(#[from] SnapshotEncodeError),
}
