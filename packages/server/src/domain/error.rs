//! Domain error types
//!
//! Command rejections are logged by the broadcaster and never reported back
//! to clients.

use thiserror::Error;

/// Value object construction errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueObjectError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("task index must be a positive integer")]
    ZeroTaskIndex,

    #[error("invalid duration: {0}")]
    InvalidDuration(String),
}

/// Countdown state machine rejections
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClockError {
    #[error("countdown is already running")]
    AlreadyRunning,

    #[error("countdown is not running")]
    NotRunning,

    #[error("countdown has no remaining time to run")]
    NothingRemaining,
}

/// Roster command rejections
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("team '{0}' already exists")]
    DuplicateTeamId(String),

    #[error("team '{0}' not found")]
    TeamNotFound(String),

    #[error("team '{0}' has not selected a problem")]
    NoProblemSelected(String),

    #[error("task {index} not found for team '{team_id}'")]
    TaskNotFound { team_id: String, index: u32 },

    #[error("team '{team_id}' is already working on problem '{problem_id}'")]
    ProblemAlreadySelected { team_id: String, problem_id: String },

    #[error("task {index} of team '{team_id}' is already requested")]
    TaskAlreadyRequested { team_id: String, index: u32 },

    #[error("task {index} of team '{team_id}' is already approved")]
    TaskAlreadyApproved { team_id: String, index: u32 },
}

/// Catalog construction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("problem '{0}' is defined more than once")]
    DuplicateProblemId(String),
}

/// Reason a client command was discarded without changing state
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error(transparent)]
    InvalidValue(#[from] ValueObjectError),

    #[error("problem '{0}' not found")]
    ProblemNotFound(String),

    #[error(transparent)]
    Clock(#[from] ClockError),

    #[error(transparent)]
    Roster(#[from] RosterError),
}

/// A snapshot could not be turned into an outbound frame
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to encode session snapshot: {0}")]
pub struct SnapshotEncodeError(pub String);

/// Message fan-out errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("client '{0}' not found")]
    ClientNotFound(String),

    #[error("client '{0}' is already registered")]
    AlreadyRegistered(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),
}
