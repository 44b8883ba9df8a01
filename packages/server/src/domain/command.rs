//! Inbound client commands, already validated into domain values.

use super::value_object::{DurationMs, ProblemId, TaskIndex, TeamId, TeamName};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Start,
    Pause,
    /// `None` resets to the default duration
    Reset(Option<DurationMs>),
    SetRemaining(DurationMs),
    /// `id: None` asks the server to generate one
    AddTeam {
        id: Option<TeamId>,
        name: TeamName,
    },
    SelectProblem {
        team_id: TeamId,
        problem_id: ProblemId,
    },
    RequestTaskApproval {
        team_id: TeamId,
        task_index: TaskIndex,
    },
    ApproveTask {
        team_id: TeamId,
        task_index: TaskIndex,
    },
}

impl SessionCommand {
    /// Wire name of the command, for logging
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Pause => "pause",
            Self::Reset(_) => "reset",
            Self::SetRemaining(_) => "setRemaining",
            Self::AddTeam { .. } => "addTeam",
            Self::SelectProblem { .. } => "selectProblem",
            Self::RequestTaskApproval { .. } => "requestTaskApproval",
            Self::ApproveTask { .. } => "approveTask",
        }
    }
}
