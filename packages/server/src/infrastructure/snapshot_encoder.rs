//! JSON による SnapshotEncoder 実装
//!
//! スナップショットを `{"type":"state", ...}` フレームに変換します。
//! WebSocket の配信と HTTP の `/api/state` は同じ DTO を使います。

use crate::{
    domain::{SessionSnapshot, SnapshotEncodeError, SnapshotEncoder},
    infrastructure::dto::conversion::encode_state,
};

/// `state` フレームを生成する SnapshotEncoder
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSnapshotEncoder;

impl SnapshotEncoder for JsonSnapshotEncoder {
    fn encode(&self, snapshot: &SessionSnapshot) -> Result<String, SnapshotEncodeError> {
        encode_state(snapshot).map_err(|e| SnapshotEncodeError(e.to_string()))
    }
}
