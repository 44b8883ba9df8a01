//! Conversion logic between DTOs and domain values.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::{
    CommandError, DurationMs, ProblemId, ProblemStatement, SessionCommand, SessionSnapshot,
    TaskIndex, Team, TeamId, TeamName, ValueObjectError, entity::Task,
};
use crate::infrastructure::dto::websocket::{
    self as dto, AddTeamPayload, CommandEnvelope, MessageType, SelectProblemPayload, TaskPayload,
    event,
};

// ========================================
// DTO → Domain
// ========================================

fn parse_payload<T: DeserializeOwned>(payload: Value) -> Result<T, CommandError> {
    serde_json::from_value(payload).map_err(|e| CommandError::InvalidPayload(e.to_string()))
}

/// Parse a millisecond duration from a JSON number
fn parse_duration(payload: &Value) -> Result<DurationMs, CommandError> {
    let Value::Number(number) = payload else {
        return Err(CommandError::InvalidPayload(format!(
            "expected a duration in milliseconds, got {}",
            payload
        )));
    };
    if let Some(millis) = number.as_u64() {
        return Ok(DurationMs::try_from(millis)?);
    }
    if let Some(millis) = number.as_i64() {
        return Ok(DurationMs::try_from(millis)?);
    }
    let millis = number
        .as_f64()
        .ok_or_else(|| CommandError::InvalidPayload(number.to_string()))?;
    Ok(DurationMs::from_f64(millis)?)
}

impl TryFrom<CommandEnvelope> for SessionCommand {
    type Error = CommandError;

    fn try_from(envelope: CommandEnvelope) -> Result<Self, Self::Error> {
        let CommandEnvelope {
            event: name,
            payload,
        } = envelope;
        match name.as_str() {
            event::START => Ok(Self::Start),
            event::PAUSE => Ok(Self::Pause),
            event::RESET => match payload {
                Value::Null => Ok(Self::Reset(None)),
                other => Ok(Self::Reset(Some(parse_duration(&other)?))),
            },
            event::SET_REMAINING => Ok(Self::SetRemaining(parse_duration(&payload)?)),
            event::ADD_TEAM => {
                let payload: AddTeamPayload = parse_payload(payload)?;
                let id = payload
                    .id
                    .filter(|id| !id.trim().is_empty())
                    .map(TeamId::new)
                    .transpose()?;
                Ok(Self::AddTeam {
                    id,
                    name: TeamName::new(payload.name)?,
                })
            }
            event::SELECT_PROBLEM => {
                let payload: SelectProblemPayload = parse_payload(payload)?;
                Ok(Self::SelectProblem {
                    team_id: TeamId::new(payload.team_id)?,
                    problem_id: ProblemId::new(payload.problem_id)?,
                })
            }
            event::REQUEST_TASK_APPROVAL => {
                let payload: TaskPayload = parse_payload(payload)?;
                Ok(Self::RequestTaskApproval {
                    team_id: TeamId::new(payload.team_id)?,
                    task_index: TaskIndex::try_from(payload.task_index)?,
                })
            }
            event::APPROVE_TASK => {
                let payload: TaskPayload = parse_payload(payload)?;
                Ok(Self::ApproveTask {
                    team_id: TeamId::new(payload.team_id)?,
                    task_index: TaskIndex::try_from(payload.task_index)?,
                })
            }
            other => Err(CommandError::InvalidPayload(format!(
                "unknown event '{}'",
                other
            ))),
        }
    }
}

impl TryFrom<dto::ProblemStatementDto> for ProblemStatement {
    type Error = ValueObjectError;

    fn try_from(dto: dto::ProblemStatementDto) -> Result<Self, Self::Error> {
        Ok(ProblemStatement::new(
            ProblemId::new(dto.id)?,
            dto.title,
            dto.description,
            dto.tasks,
        ))
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<&Task> for dto::TaskDto {
    fn from(task: &Task) -> Self {
        Self {
            index: task.index.value(),
            text: task.text.clone(),
            requested: task.requested,
            approved: task.approved,
        }
    }
}

impl From<&Team> for dto::TeamDto {
    fn from(team: &Team) -> Self {
        Self {
            id: team.id.as_str().to_string(),
            name: team.name.as_str().to_string(),
            selected_problem_id: team
                .selected_problem_id
                .as_ref()
                .map(|id| id.as_str().to_string()),
            tasks: team
                .tasks
                .iter()
                .map(|(problem_id, tasks)| {
                    (
                        problem_id.as_str().to_string(),
                        tasks.iter().map(dto::TaskDto::from).collect(),
                    )
                })
                .collect(),
        }
    }
}

impl From<&ProblemStatement> for dto::ProblemStatementDto {
    fn from(problem: &ProblemStatement) -> Self {
        Self {
            id: problem.id.as_str().to_string(),
            title: problem.title.clone(),
            description: problem.description.clone(),
            tasks: problem.tasks.clone(),
        }
    }
}

impl From<&SessionSnapshot> for dto::StateMessage {
    fn from(snapshot: &SessionSnapshot) -> Self {
        Self {
            r#type: MessageType::State,
            remaining_ms: snapshot.remaining_ms.value(),
            running: snapshot.running,
            teams: snapshot.teams.iter().map(dto::TeamDto::from).collect(),
            problem_statements: snapshot
                .problem_statements
                .iter()
                .map(dto::ProblemStatementDto::from)
                .collect(),
        }
    }
}

/// Serialize a snapshot as a `state` frame
pub fn encode_state(snapshot: &SessionSnapshot) -> Result<String, serde_json::Error> {
    serde_json::to_string(&dto::StateMessage::from(snapshot))
}
