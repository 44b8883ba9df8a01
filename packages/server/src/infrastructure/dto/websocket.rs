//! WebSocket message DTOs.
//!
//! Inbound frames are `{"event": "<command>", "payload": <value>}`; the payload
//! is kept as raw JSON here and validated during conversion. The only outbound
//! frame is the full `state` snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Wire names of the inbound commands
pub mod event {
    pub const START: &str = "start";
    pub const PAUSE: &str = "pause";
    pub const RESET: &str = "reset";
    pub const SET_REMAINING: &str = "setRemaining";
    pub const ADD_TEAM: &str = "addTeam";
    pub const SELECT_PROBLEM: &str = "selectProblem";
    pub const REQUEST_TASK_APPROVAL: &str = "requestTaskApproval";
    pub const APPROVE_TASK: &str = "approveTask";
}

/// Outbound message type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageType {
    State,
}

/// Inbound command envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandEnvelope {
    pub event: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl CommandEnvelope {
    pub fn new(event: &str, payload: serde_json::Value) -> Self {
        Self {
            event: event.to_string(),
            payload,
        }
    }

    /// Envelope for a command that carries no payload
    pub fn bare(event: &str) -> Self {
        Self::new(event, serde_json::Value::Null)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTeamPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectProblemPayload {
    pub team_id: String,
    pub problem_id: String,
}

/// Payload of `requestTaskApproval` and `approveTask`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPayload {
    pub team_id: String,
    pub task_index: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDto {
    pub index: u32,
    pub text: String,
    pub requested: bool,
    pub approved: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamDto {
    pub id: String,
    pub name: String,
    pub selected_problem_id: Option<String>,
    /// problem id -> task list
    pub tasks: BTreeMap<String, Vec<TaskDto>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemStatementDto {
    pub id: String,
    pub title: String,
    pub description: String,
    pub tasks: Vec<String>,
}

/// Full session snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateMessage {
    pub r#type: MessageType,
    pub remaining_ms: u64,
    pub running: bool,
    pub teams: Vec<TeamDto>,
    pub problem_statements: Vec<ProblemStatementDto>,
}
