//! UseCase: セッション状態の同期配信
//!
//! ## 責務
//!
//! - クライアントからのコマンドを Session に適用し、状態が変わった場合のみ
//!   全クライアントにスナップショットを 1 回ブロードキャストする
//! - 新規接続したクライアントに現在のスナップショットを個別送信する（初期同期）
//! - タイマー実行中は一定間隔で tick を実行し、毎回ブロードキャストする
//!
//! ## 直列化
//!
//! コマンド・tick・初期同期はすべて同じ Mutex の中で
//! 「計算 → 更新 → 配信」まで完了させる。これにより配信順序は更新順序と一致する。
//! tick タスクは同時に最大 1 つ。start で生成し、pause / reset / 時間切れで破棄する。
//! 破棄済みタスクからの tick は世代番号の不一致で無視される。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - dispatch(): 受理されたコマンドは 1 回だけ配信、無視されたコマンドは配信しない
//! - connect(): 接続直後の初期同期、重複接続の拒否
//! - tick(): 経過時間の反映、時間切れでの自動停止、tick タスクのキャンセル

use std::{
    sync::{Arc, Weak},
    time::Duration,
};

use countdown_shared::time::Clock;
use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::MissedTickBehavior,
};

use crate::domain::{
    ClientId, ClockEffect, CommandError, MessagePusher, PusherChannel, Session, SessionCommand,
    SessionSnapshot, SnapshotEncoder, TickOutcome, Timestamp,
};

use super::error::ConnectError;

/// タイマー実行中の再評価間隔
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(250);

/// 実行中の tick タスク
struct Ticker {
    generation: u64,
    handle: JoinHandle<()>,
}

/// Mutex で保護される状態（Session と tick タスクの管理情報）
struct SessionSlot {
    session: Session,
    ticker: Option<Ticker>,
    last_generation: u64,
}

impl SessionSlot {
    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.handle.abort();
            tracing::debug!("Ticker #{} cancelled", ticker.generation);
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.ticker
            .as_ref()
            .is_some_and(|ticker| ticker.generation == generation)
    }
}

/// セッション同期配信のユースケース
pub struct SessionBroadcaster {
    slot: Mutex<SessionSlot>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// SnapshotEncoder（配信フレームの生成）
    encoder: Arc<dyn SnapshotEncoder>,
    /// 現在時刻の取得（テストでは手動で進める）
    clock: Arc<dyn Clock>,
    tick_interval: Duration,
    /// tick タスクから自身を参照するための弱参照
    weak_self: Weak<Self>,
}

impl SessionBroadcaster {
    /// 新しい SessionBroadcaster を作成
    ///
    /// # Arguments
    ///
    /// * `session` - 起動時に構築したセッション（プロセス終了まで保持）
    /// * `message_pusher` - クライアントへの配信
    /// * `encoder` - スナップショットから配信フレームへの変換
    /// * `clock` - 現在時刻の取得
    /// * `tick_interval` - タイマー実行中の再評価間隔
    pub fn new(
        session: Session,
        message_pusher: Arc<dyn MessagePusher>,
        encoder: Arc<dyn SnapshotEncoder>,
        clock: Arc<dyn Clock>,
        tick_interval: Duration,
    ) -> Arc<Self> {
        Arc::new_cyclic(|weak_self| Self {
            slot: Mutex::new(SessionSlot {
                session,
                ticker: None,
                last_generation: 0,
            }),
            message_pusher,
            encoder,
            clock,
            tick_interval,
            weak_self: weak_self.clone(),
        })
    }

    fn now(&self) -> Timestamp {
        Timestamp::new(self.clock.now_millis())
    }

    /// クライアントを登録し、現在のスナップショットをそのクライアントにだけ送信
    ///
    /// 登録と初期同期は同じロックの中で行うため、初期同期より古い状態が
    /// 後から届くことはない。
    ///
    /// # Returns
    ///
    /// * `Ok(Timestamp)` - 接続時刻
    /// * `Err(ConnectError)` - 重複接続など
    pub async fn connect(
        &self,
        client_id: ClientId,
        sender: PusherChannel,
    ) -> Result<Timestamp, ConnectError> {
        let slot = self.slot.lock().await;
        let now = self.now();

        let json = self
            .encoder
            .encode(&slot.session.snapshot(now))
            .map_err(ConnectError::SnapshotEncoding)?;
        self.message_pusher
            .register_client(client_id.clone(), sender)
            .await
            .map_err(|_| ConnectError::DuplicateClientId(client_id.as_str().to_string()))?;

        if let Err(e) = self.message_pusher.push_to(&client_id, &json).await {
            tracing::warn!("Failed to send initial state to '{}': {}", client_id, e);
        } else {
            tracing::info!("Sent initial state to '{}'", client_id);
        }

        Ok(now)
    }

    /// クライアントの登録を解除
    pub async fn disconnect(&self, client_id: &ClientId) {
        self.message_pusher.unregister_client(client_id).await;
    }

    /// 接続中かどうか
    pub async fn is_connected(&self, client_id: &ClientId) -> bool {
        self.message_pusher
            .connected_clients()
            .await
            .contains(client_id)
    }

    /// コマンドを適用し、状態が変わった場合のみ全クライアントに配信
    ///
    /// # Returns
    ///
    /// * `Ok(())` - 適用して配信した
    /// * `Err(CommandError)` - 無視した（状態変更・配信なし）
    pub async fn dispatch(&self, command: SessionCommand) -> Result<(), CommandError> {
        let mut slot = self.slot.lock().await;
        let now = self.now();

        match slot.session.apply(command, now)? {
            ClockEffect::StartTicker => self.start_ticker(&mut slot),
            ClockEffect::StopTicker => slot.stop_ticker(),
            ClockEffect::Keep => {}
        }

        self.broadcast_snapshot(&slot.session, now).await;
        Ok(())
    }

    /// 現在のスナップショット（配信はしない）
    pub async fn snapshot(&self) -> SessionSnapshot {
        let slot = self.slot.lock().await;
        slot.session.snapshot(self.now())
    }

    /// tick タスクが動作中かどうか
    pub async fn is_ticking(&self) -> bool {
        self.slot.lock().await.ticker.is_some()
    }

    fn start_ticker(&self, slot: &mut SessionSlot) {
        slot.stop_ticker();
        slot.last_generation += 1;
        let generation = slot.last_generation;

        let weak_self = self.weak_self.clone();
        let period = self.tick_interval;
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                let Some(broadcaster) = weak_self.upgrade() else {
                    break;
                };
                if !broadcaster.tick(generation).await {
                    break;
                }
            }
        });

        slot.ticker = Some(Ticker { generation, handle });
        tracing::debug!("Ticker #{} started ({:?} interval)", generation, period);
    }

    /// 1 回分の再評価。tick を続けるなら true を返す
    async fn tick(&self, generation: u64) -> bool {
        let mut slot = self.slot.lock().await;
        if !slot.is_current(generation) {
            return false;
        }
        let now = self.now();

        let outcome = match slot.session.tick(now) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!("Ticker #{} found countdown stopped: {}", generation, e);
                // Called from the ticker task itself, so detach instead of aborting
                slot.ticker = None;
                return false;
            }
        };
        if outcome == TickOutcome::Expired {
            slot.ticker = None;
            tracing::info!("Countdown reached zero");
        }

        self.broadcast_snapshot(&slot.session, now).await;
        outcome == TickOutcome::Running
    }

    async fn broadcast_snapshot(&self, session: &Session, now: Timestamp) -> usize {
        match self.encoder.encode(&session.snapshot(now)) {
            Ok(json) => self.message_pusher.broadcast(&json).await,
            Err(e) => {
                tracing::error!("Broadcast skipped: {}", e);
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            Catalog, Countdown, DurationMs, MockMessagePusher, MockSnapshotEncoder, ProblemId,
            Roster, SnapshotEncodeError, TaskIndex, TeamId, TeamName,
        },
        infrastructure::{
            dto::websocket::StateMessage,
            message_pusher::WebSocketMessagePusher,
            seed::{reference_catalog, seed_roster},
            snapshot_encoder::JsonSnapshotEncoder,
        },
    };
    use countdown_shared::time::ManualClock;
    use tokio::sync::mpsc;

    const START_MILLIS: i64 = 1_700_000_000_000;
    /// 長い間隔にして、テスト中に tick タスクが自発的に動かないようにする
    const IDLE_INTERVAL: Duration = Duration::from_secs(3600);

    fn session() -> Session {
        Session::new(
            Countdown::default(),
            seed_roster(3).unwrap(),
            reference_catalog().unwrap(),
        )
    }

    fn broadcaster_with(
        pusher: Arc<dyn MessagePusher>,
        interval: Duration,
    ) -> (Arc<SessionBroadcaster>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(START_MILLIS));
        let broadcaster = SessionBroadcaster::new(
            session(),
            pusher,
            Arc::new(JsonSnapshotEncoder),
            clock.clone(),
            interval,
        );
        (broadcaster, clock)
    }

    fn mock_expecting_broadcasts(times: usize) -> Arc<MockMessagePusher> {
        let mut pusher = MockMessagePusher::new();
        pusher.expect_broadcast().times(times).returning(|_| 1);
        Arc::new(pusher)
    }

    async fn current_generation(broadcaster: &SessionBroadcaster) -> u64 {
        let slot = broadcaster.slot.lock().await;
        slot.ticker.as_ref().map(|t| t.generation).unwrap()
    }

    fn state(json: &str) -> StateMessage {
        serde_json::from_str(json).unwrap()
    }

    fn team(id: &str) -> TeamId {
        TeamId::try_from(id).unwrap()
    }

    fn index(i: u32) -> TaskIndex {
        TaskIndex::new(i).unwrap()
    }

    #[tokio::test]
    async fn test_accepted_command_broadcasts_once() {
        // テスト項目: 受理されたコマンドは 1 回だけブロードキャストされる
        // given (前提条件):
        let (broadcaster, _clock) = broadcaster_with(mock_expecting_broadcasts(1), IDLE_INTERVAL);

        // when (操作):
        let result = broadcaster
            .dispatch(SessionCommand::SetRemaining(DurationMs::new(60_000)))
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(broadcaster.snapshot().await.remaining_ms.value(), 60_000);
    }

    #[tokio::test]
    async fn test_ignored_commands_do_not_broadcast() {
        // テスト項目: 無視されたコマンドはブロードキャストされない
        // given (前提条件):
        let (broadcaster, _clock) = broadcaster_with(mock_expecting_broadcasts(0), IDLE_INTERVAL);

        // when (操作):
        let pause = broadcaster.dispatch(SessionCommand::Pause).await;
        let select = broadcaster
            .dispatch(SessionCommand::SelectProblem {
                team_id: team("ghost"),
                problem_id: ProblemId::try_from("p1").unwrap(),
            })
            .await;
        let approve = broadcaster
            .dispatch(SessionCommand::ApproveTask {
                team_id: team("team-1"),
                task_index: index(1),
            })
            .await;
        let add = broadcaster
            .dispatch(SessionCommand::AddTeam {
                id: Some(team("team-1")),
                name: TeamName::try_from("Duplicate").unwrap(),
            })
            .await;

        // then (期待する結果):
        assert!(pause.is_err());
        assert!(select.is_err());
        assert!(approve.is_err());
        assert!(add.is_err());
        assert_eq!(broadcaster.snapshot().await.teams.len(), 3);
    }

    #[tokio::test]
    async fn test_selecting_same_problem_twice_broadcasts_once() {
        // テスト項目: 選択中の問題を再度選択しても状態は変わらず、配信は最初の 1 回だけ
        // given (前提条件):
        let (broadcaster, _clock) = broadcaster_with(mock_expecting_broadcasts(1), IDLE_INTERVAL);
        let select = || SessionCommand::SelectProblem {
            team_id: team("team-1"),
            problem_id: ProblemId::try_from("p1").unwrap(),
        };
        broadcaster.dispatch(select()).await.unwrap();
        let before = broadcaster.snapshot().await;

        // when (操作):
        let result = broadcaster.dispatch(select()).await;

        // then (期待する結果):
        assert!(result.is_err());
        assert_eq!(broadcaster.snapshot().await, before);
    }

    #[tokio::test]
    async fn test_requesting_requested_task_again_does_not_broadcast() {
        // テスト項目: 依頼中のタスクへの再依頼は配信されない
        // given (前提条件):
        let (broadcaster, _clock) = broadcaster_with(mock_expecting_broadcasts(2), IDLE_INTERVAL);
        let request = || SessionCommand::RequestTaskApproval {
            team_id: team("team-2"),
            task_index: index(1),
        };
        broadcaster
            .dispatch(SessionCommand::SelectProblem {
                team_id: team("team-2"),
                problem_id: ProblemId::try_from("p3").unwrap(),
            })
            .await
            .unwrap();
        broadcaster.dispatch(request()).await.unwrap();

        // when (操作):
        let result = broadcaster.dispatch(request()).await;

        // then (期待する結果):
        assert!(result.is_err());
        let snapshot = broadcaster.snapshot().await;
        assert!(snapshot.teams[1].current_tasks().unwrap()[0].requested);
    }

    #[tokio::test]
    async fn test_encoding_failure_rejects_connect_and_skips_broadcast() {
        // テスト項目: フレーム生成に失敗した場合、接続は拒否され配信も行われない
        // given (前提条件):
        let mut encoder = MockSnapshotEncoder::new();
        encoder
            .expect_encode()
            .returning(|_| Err(SnapshotEncodeError("boom".to_string())));
        let mut pusher = MockMessagePusher::new();
        pusher.expect_register_client().times(0);
        pusher.expect_broadcast().times(0);
        let broadcaster = SessionBroadcaster::new(
            session(),
            Arc::new(pusher),
            Arc::new(encoder),
            Arc::new(ManualClock::new(START_MILLIS)),
            IDLE_INTERVAL,
        );
        let (tx, _rx) = mpsc::unbounded_channel();

        // when (操作):
        let connected = broadcaster
            .connect(ClientId::try_from("viewer").unwrap(), tx)
            .await;
        let dispatched = broadcaster
            .dispatch(SessionCommand::SetRemaining(DurationMs::new(1_000)))
            .await;

        // then (期待する結果):
        assert_eq!(
            connected,
            Err(ConnectError::SnapshotEncoding(SnapshotEncodeError(
                "boom".to_string()
            )))
        );
        assert!(dispatched.is_ok());
        assert_eq!(broadcaster.snapshot().await.remaining_ms.value(), 1_000);
    }

    #[tokio::test]
    async fn test_start_while_running_does_not_spawn_second_ticker() {
        // テスト項目: 実行中の start は無視され、tick タスクは 1 つのまま
        // given (前提条件):
        let (broadcaster, _clock) = broadcaster_with(mock_expecting_broadcasts(1), IDLE_INTERVAL);
        broadcaster.dispatch(SessionCommand::Start).await.unwrap();
        let generation = current_generation(&broadcaster).await;

        // when (操作):
        let result = broadcaster.dispatch(SessionCommand::Start).await;

        // then (期待する結果):
        assert!(result.is_err());
        assert_eq!(current_generation(&broadcaster).await, generation);
    }

    #[tokio::test]
    async fn test_start_tick_pause_scenario() {
        // テスト項目: start → 1 秒経過して tick → pause で残り時間が 21,599,000 ms に固定される
        // given (前提条件):
        let (broadcaster, clock) = broadcaster_with(mock_expecting_broadcasts(3), IDLE_INTERVAL);
        broadcaster.dispatch(SessionCommand::Start).await.unwrap();
        let generation = current_generation(&broadcaster).await;

        // when (操作):
        clock.advance(1_000);
        let keep_ticking = broadcaster.tick(generation).await;
        let running = broadcaster.snapshot().await;
        broadcaster.dispatch(SessionCommand::Pause).await.unwrap();
        clock.advance(5_000);
        let paused = broadcaster.snapshot().await;

        // then (期待する結果):
        assert!(keep_ticking);
        assert!(running.running);
        assert_eq!(running.remaining_ms.value(), 21_599_000);
        assert!(!paused.running);
        assert_eq!(paused.remaining_ms.value(), 21_599_000);
        assert!(!broadcaster.is_ticking().await);
    }

    #[tokio::test]
    async fn test_set_remaining_while_running_repositions_countdown() {
        // テスト項目: 実行中の setRemaining(X) の直後に pause すると残り時間は X
        // given (前提条件):
        let (broadcaster, clock) = broadcaster_with(mock_expecting_broadcasts(3), IDLE_INTERVAL);
        broadcaster.dispatch(SessionCommand::Start).await.unwrap();
        clock.advance(7_000);

        // when (操作):
        broadcaster
            .dispatch(SessionCommand::SetRemaining(DurationMs::new(90_000)))
            .await
            .unwrap();
        broadcaster.dispatch(SessionCommand::Pause).await.unwrap();

        // then (期待する結果):
        assert_eq!(broadcaster.snapshot().await.remaining_ms.value(), 90_000);
    }

    #[tokio::test]
    async fn test_stale_ticker_generation_is_ignored() {
        // テスト項目: reset 後に古い世代の tick が来ても状態は変わらず配信もされない
        // given (前提条件):
        let (broadcaster, clock) = broadcaster_with(mock_expecting_broadcasts(2), IDLE_INTERVAL);
        broadcaster.dispatch(SessionCommand::Start).await.unwrap();
        let generation = current_generation(&broadcaster).await;
        broadcaster
            .dispatch(SessionCommand::Reset(Some(DurationMs::new(300_000))))
            .await
            .unwrap();

        // when (操作):
        clock.advance(1_000);
        let keep_ticking = broadcaster.tick(generation).await;

        // then (期待する結果):
        assert!(!keep_ticking);
        let snapshot = broadcaster.snapshot().await;
        assert!(!snapshot.running);
        assert_eq!(snapshot.remaining_ms.value(), 300_000);
    }

    #[tokio::test]
    async fn test_tick_expiry_stops_and_broadcasts_final_state() {
        // テスト項目: 残り時間が 0 になった tick で自動停止し、最後の状態が配信される
        // given (前提条件):
        let (broadcaster, clock) = broadcaster_with(mock_expecting_broadcasts(3), IDLE_INTERVAL);
        broadcaster
            .dispatch(SessionCommand::SetRemaining(DurationMs::new(500)))
            .await
            .unwrap();
        broadcaster.dispatch(SessionCommand::Start).await.unwrap();
        let generation = current_generation(&broadcaster).await;

        // when (操作):
        clock.advance(800);
        let keep_ticking = broadcaster.tick(generation).await;

        // then (期待する結果):
        assert!(!keep_ticking);
        assert!(!broadcaster.is_ticking().await);
        let snapshot = broadcaster.snapshot().await;
        assert!(!snapshot.running);
        assert_eq!(snapshot.remaining_ms, DurationMs::ZERO);
    }

    #[tokio::test]
    async fn test_connect_sends_initial_state_only_to_new_client() {
        // テスト項目: 接続したクライアントにだけ現在の状態が送信される
        // given (前提条件):
        let pusher = Arc::new(WebSocketMessagePusher::default());
        let (broadcaster, _clock) = broadcaster_with(pusher, IDLE_INTERVAL);
        let (tx_alice, mut rx_alice) = mpsc::unbounded_channel();
        let (tx_bob, mut rx_bob) = mpsc::unbounded_channel();
        broadcaster
            .connect(ClientId::try_from("alice").unwrap(), tx_alice)
            .await
            .unwrap();
        let _ = rx_alice.recv().await;

        // when (操作):
        broadcaster
            .connect(ClientId::try_from("bob").unwrap(), tx_bob)
            .await
            .unwrap();

        // then (期待する結果):
        let initial = state(&rx_bob.recv().await.unwrap());
        assert_eq!(initial.remaining_ms, 21_600_000);
        assert!(!initial.running);
        assert_eq!(initial.teams.len(), 3);
        assert_eq!(initial.problem_statements.len(), 3);
        assert!(rx_alice.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_connect_duplicate_client_is_rejected() {
        // テスト項目: 接続中の client_id での再接続は拒否される
        // given (前提条件):
        let pusher = Arc::new(WebSocketMessagePusher::default());
        let (broadcaster, _clock) = broadcaster_with(pusher, IDLE_INTERVAL);
        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();
        let alice = ClientId::try_from("alice").unwrap();
        broadcaster.connect(alice.clone(), tx1).await.unwrap();

        // when (操作):
        let result = broadcaster.connect(alice.clone(), tx2).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ConnectError::DuplicateClientId("alice".to_string()))
        );
        assert!(broadcaster.is_connected(&alice).await);

        broadcaster.disconnect(&alice).await;
        assert!(!broadcaster.is_connected(&alice).await);
    }

    #[tokio::test]
    async fn test_mutation_is_broadcast_to_every_client() {
        // テスト項目: あるクライアントの操作結果が送信元を含む全クライアントに配信される
        // given (前提条件):
        let pusher = Arc::new(WebSocketMessagePusher::default());
        let (broadcaster, _clock) = broadcaster_with(pusher, IDLE_INTERVAL);
        let (tx_admin, mut rx_admin) = mpsc::unbounded_channel();
        let (tx_team, mut rx_team) = mpsc::unbounded_channel();
        broadcaster
            .connect(ClientId::try_from("admin").unwrap(), tx_admin)
            .await
            .unwrap();
        broadcaster
            .connect(ClientId::try_from("team").unwrap(), tx_team)
            .await
            .unwrap();
        let _ = rx_admin.recv().await;
        let _ = rx_team.recv().await;

        // when (操作):
        broadcaster
            .dispatch(SessionCommand::SelectProblem {
                team_id: team("team-1"),
                problem_id: ProblemId::try_from("p1").unwrap(),
            })
            .await
            .unwrap();
        broadcaster
            .dispatch(SessionCommand::RequestTaskApproval {
                team_id: team("team-1"),
                task_index: index(2),
            })
            .await
            .unwrap();

        // then (期待する結果):
        for rx in [&mut rx_admin, &mut rx_team] {
            let selected = state(&rx.recv().await.unwrap());
            assert_eq!(selected.teams[0].selected_problem_id.as_deref(), Some("p1"));
            assert_eq!(selected.teams[0].tasks["p1"].len(), 3);
            let requested = state(&rx.recv().await.unwrap());
            assert!(requested.teams[0].tasks["p1"][1].requested);
            assert!(rx.try_recv().is_err());
        }
    }

    #[tokio::test]
    async fn test_ticker_broadcasts_until_expiry() {
        // テスト項目: tick タスクが実行中に配信を続け、時間切れで停止する
        // given (前提条件):
        let pusher = Arc::new(WebSocketMessagePusher::default());
        let (broadcaster, clock) = broadcaster_with(pusher, Duration::from_millis(10));
        let (tx, mut rx) = mpsc::unbounded_channel();
        broadcaster
            .connect(ClientId::try_from("viewer").unwrap(), tx)
            .await
            .unwrap();
        let _ = rx.recv().await;
        broadcaster
            .dispatch(SessionCommand::SetRemaining(DurationMs::new(1_000)))
            .await
            .unwrap();
        broadcaster.dispatch(SessionCommand::Start).await.unwrap();

        // when (操作): 自発的な tick を待ってから時間切れまで時計を進める
        tokio::time::sleep(Duration::from_millis(60)).await;
        clock.advance(2_000);
        tokio::time::sleep(Duration::from_millis(60)).await;

        // then (期待する結果):
        let mut frames = Vec::new();
        while let Ok(json) = rx.try_recv() {
            frames.push(state(&json));
        }
        // setRemaining + start + 1 回以上の tick + 時間切れの最終状態
        assert!(frames.len() >= 4, "got {} frames", frames.len());
        let last = frames.last().unwrap();
        assert!(!last.running);
        assert_eq!(last.remaining_ms, 0);
        assert!(!broadcaster.is_ticking().await);
        let remaining: Vec<u64> = frames.iter().map(|f| f.remaining_ms).collect();
        assert!(remaining.windows(2).all(|w| w[1] <= w[0]));
    }

    #[tokio::test]
    async fn test_reset_cancels_pending_ticks() {
        // テスト項目: 実行中の reset(300000) 以降、自動の配信は行われない
        // given (前提条件):
        let pusher = Arc::new(WebSocketMessagePusher::default());
        let (broadcaster, _clock) = broadcaster_with(pusher, Duration::from_millis(10));
        let (tx, mut rx) = mpsc::unbounded_channel();
        broadcaster
            .connect(ClientId::try_from("viewer").unwrap(), tx)
            .await
            .unwrap();
        broadcaster.dispatch(SessionCommand::Start).await.unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;

        // when (操作):
        broadcaster
            .dispatch(SessionCommand::Reset(Some(DurationMs::new(300_000))))
            .await
            .unwrap();
        let mut last = None;
        while let Ok(json) = rx.try_recv() {
            last = Some(state(&json));
        }
        tokio::time::sleep(Duration::from_millis(50)).await;

        // then (期待する結果):
        let last = last.unwrap();
        assert!(!last.running);
        assert_eq!(last.remaining_ms, 300_000);
        assert!(rx.try_recv().is_err());
        assert!(!broadcaster.is_ticking().await);
    }

    #[tokio::test]
    async fn test_empty_roster_session() {
        // テスト項目: チームも問題もないセッションでもタイマー操作は配信される
        // given (前提条件):
        let clock = Arc::new(ManualClock::new(START_MILLIS));
        let broadcaster = SessionBroadcaster::new(
            Session::new(Countdown::default(), Roster::new(), Catalog::default()),
            mock_expecting_broadcasts(1),
            Arc::new(JsonSnapshotEncoder),
            clock,
            IDLE_INTERVAL,
        );

        // when (操作):
        let result = broadcaster.dispatch(SessionCommand::Reset(None)).await;

        // then (期待する結果):
        assert!(result.is_ok());
        let snapshot = broadcaster.snapshot().await;
        assert!(snapshot.teams.is_empty());
        assert!(snapshot.problem_statements.is_empty());
    }
}
