//! Session aggregate: countdown, roster and catalog behind one owner.
//!
//! The session is created once at startup and lives for the whole process.
//! It is pure state; scheduling ticks and pushing snapshots is the use case
//! layer's job, driven by the [`ClockEffect`] each command returns.

use super::{
    command::SessionCommand,
    entity::{Catalog, Countdown, ProblemStatement, Roster, Team, TickOutcome},
    error::{ClockError, CommandError},
    value_object::{DurationMs, TeamId, Timestamp},
};

/// What an accepted command requires from the periodic ticker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEffect {
    Keep,
    StartTicker,
    StopTicker,
}

/// Full state pushed to viewers; computed on demand, never stored
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub remaining_ms: DurationMs,
    pub running: bool,
    pub teams: Vec<Team>,
    pub problem_statements: Vec<ProblemStatement>,
}

#[derive(Debug, Clone)]
pub struct Session {
    countdown: Countdown,
    roster: Roster,
    catalog: Catalog,
}

impl Session {
    pub fn new(countdown: Countdown, roster: Roster, catalog: Catalog) -> Self {
        Self {
            countdown,
            roster,
            catalog,
        }
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Apply a command; `Err` means nothing changed
    pub fn apply(
        &mut self,
        command: SessionCommand,
        now: Timestamp,
    ) -> Result<ClockEffect, CommandError> {
        match command {
            SessionCommand::Start => {
                self.countdown.start(now)?;
                Ok(ClockEffect::StartTicker)
            }
            SessionCommand::Pause => {
                self.countdown.pause(now)?;
                Ok(ClockEffect::StopTicker)
            }
            SessionCommand::Reset(duration) => {
                self.countdown.reset(duration);
                Ok(ClockEffect::StopTicker)
            }
            SessionCommand::SetRemaining(duration) => {
                self.countdown.set_remaining(duration, now);
                Ok(ClockEffect::Keep)
            }
            SessionCommand::AddTeam { id, name } => {
                let id = id.unwrap_or_else(TeamId::generate);
                self.roster.add_team(id, name)?;
                Ok(ClockEffect::Keep)
            }
            SessionCommand::SelectProblem {
                team_id,
                problem_id,
            } => {
                let problem = self
                    .catalog
                    .find(&problem_id)
                    .ok_or_else(|| CommandError::ProblemNotFound(problem_id.into_string()))?;
                self.roster.select_problem(&team_id, problem)?;
                Ok(ClockEffect::Keep)
            }
            SessionCommand::RequestTaskApproval {
                team_id,
                task_index,
            } => {
                self.roster.request_task_approval(&team_id, task_index)?;
                Ok(ClockEffect::Keep)
            }
            SessionCommand::ApproveTask {
                team_id,
                task_index,
            } => {
                self.roster.approve_task(&team_id, task_index)?;
                Ok(ClockEffect::Keep)
            }
        }
    }

    pub fn tick(&mut self, now: Timestamp) -> Result<TickOutcome, ClockError> {
        self.countdown.tick(now)
    }

    pub fn snapshot(&self, now: Timestamp) -> SessionSnapshot {
        SessionSnapshot {
            remaining_ms: self.countdown.remaining_at(now),
            running: self.countdown.is_running(),
            teams: self.roster.teams().to_vec(),
            problem_statements: self.catalog.problems().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        error::RosterError,
        value_object::{ProblemId, TaskIndex, TeamName},
    };

    fn session() -> Session {
        let catalog = Catalog::new(vec![ProblemStatement::new(
            ProblemId::try_from("p1").unwrap(),
            "Smart Attendance System".to_string(),
            String::new(),
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
        )])
        .unwrap();
        let mut roster = Roster::new();
        roster
            .add_team(
                TeamId::try_from("t1").unwrap(),
                TeamName::try_from("Team 1").unwrap(),
            )
            .unwrap();
        Session::new(Countdown::default(), roster, catalog)
    }

    fn now() -> Timestamp {
        Timestamp::new(1_000)
    }

    #[test]
    fn test_clock_commands_report_ticker_effects() {
        // テスト項目: start/pause/reset/setRemaining がそれぞれ適切な ClockEffect を返す
        // given (前提条件):
        let mut session = session();

        // when (操作) / then (期待する結果):
        assert_eq!(
            session.apply(SessionCommand::Start, now()),
            Ok(ClockEffect::StartTicker)
        );
        assert_eq!(
            session.apply(SessionCommand::SetRemaining(DurationMs::new(10)), now()),
            Ok(ClockEffect::Keep)
        );
        assert_eq!(
            session.apply(SessionCommand::Pause, now()),
            Ok(ClockEffect::StopTicker)
        );
        assert_eq!(
            session.apply(SessionCommand::Reset(None), now()),
            Ok(ClockEffect::StopTicker)
        );
    }

    #[test]
    fn test_select_unknown_problem_is_rejected() {
        // テスト項目: カタログにない問題の選択は拒否され、チームは変更されない
        // given (前提条件):
        let mut session = session();

        // when (操作):
        let result = session.apply(
            SessionCommand::SelectProblem {
                team_id: TeamId::try_from("t1").unwrap(),
                problem_id: ProblemId::try_from("p9").unwrap(),
            },
            now(),
        );

        // then (期待する結果):
        assert_eq!(result, Err(CommandError::ProblemNotFound("p9".to_string())));
        let team = session.roster().find(&TeamId::try_from("t1").unwrap()).unwrap();
        assert!(team.selected_problem_id.is_none());
    }

    #[test]
    fn test_add_team_without_id_generates_one() {
        // テスト項目: ID なしで追加したチームには ID が生成される
        // given (前提条件):
        let mut session = session();

        // when (操作):
        session
            .apply(
                SessionCommand::AddTeam {
                    id: None,
                    name: TeamName::try_from("Newcomers").unwrap(),
                },
                now(),
            )
            .unwrap();

        // then (期待する結果):
        let added = &session.roster().teams()[1];
        assert_eq!(added.name.as_str(), "Newcomers");
        assert!(added.id.as_str().starts_with("team-"));
    }

    #[test]
    fn test_task_commands_flow_through_roster() {
        // テスト項目: selectProblem → requestTaskApproval → approveTask が反映される
        // given (前提条件):
        let mut session = session();
        let t1 = TeamId::try_from("t1").unwrap();
        let two = TaskIndex::new(2).unwrap();

        // when (操作):
        session
            .apply(
                SessionCommand::SelectProblem {
                    team_id: t1.clone(),
                    problem_id: ProblemId::try_from("p1").unwrap(),
                },
                now(),
            )
            .unwrap();
        session
            .apply(
                SessionCommand::RequestTaskApproval {
                    team_id: t1.clone(),
                    task_index: two,
                },
                now(),
            )
            .unwrap();
        session
            .apply(
                SessionCommand::ApproveTask {
                    team_id: t1.clone(),
                    task_index: two,
                },
                now(),
            )
            .unwrap();

        // then (期待する結果):
        let snapshot = session.snapshot(now());
        let task = &snapshot.teams[0].current_tasks().unwrap()[1];
        assert!(task.approved && !task.requested);

        let again = session.apply(
            SessionCommand::RequestTaskApproval {
                team_id: t1,
                task_index: two,
            },
            now(),
        );
        assert!(matches!(
            again,
            Err(CommandError::Roster(RosterError::TaskAlreadyApproved { .. }))
        ));
    }

    #[test]
    fn test_snapshot_derives_remaining_while_running() {
        // テスト項目: 実行中のスナップショットは現在時刻から残り時間を算出する
        // given (前提条件):
        let mut session = session();
        session.apply(SessionCommand::Start, now()).unwrap();

        // when (操作):
        let snapshot = session.snapshot(Timestamp::new(3_500));

        // then (期待する結果):
        assert!(snapshot.running);
        assert_eq!(snapshot.remaining_ms.value(), 21_600_000 - 2_500);
        assert_eq!(snapshot.teams.len(), 1);
        assert_eq!(snapshot.problem_statements.len(), 1);
    }
}
