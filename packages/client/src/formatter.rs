//! Message formatting utilities for client display.

use countdown_server::infrastructure::dto::websocket::{StateMessage, TaskDto, TeamDto};
use countdown_shared::time::format_remaining;

use crate::command::InputError;

const RULE: &str = "============================================================";
const THIN_RULE: &str = "------------------------------------------------------------";

/// Message formatter for client display
pub struct StateFormatter;

impl StateFormatter {
    /// Format a `state` frame: countdown, running flag and active teams
    ///
    /// # Arguments
    ///
    /// * `state` - The snapshot pushed by the server
    /// * `focus_team` - Team id always listed (and marked) even when idle
    pub fn format_state(state: &StateMessage, focus_team: Option<&str>) -> String {
        let mut output = String::new();
        output.push_str("\n\n");
        output.push_str(RULE);
        output.push('\n');
        output.push_str(&format!(
            "  {}  {}\n",
            format_remaining(state.remaining_ms),
            if state.running { "RUNNING" } else { "PAUSED" }
        ));
        output.push_str(THIN_RULE);
        output.push('\n');

        let active: Vec<&TeamDto> = state
            .teams
            .iter()
            .filter(|team| Self::is_active(team) || Some(team.id.as_str()) == focus_team)
            .collect();

        if active.is_empty() {
            output.push_str(&format!("({} teams, none working yet)\n", state.teams.len()));
        } else {
            for team in active {
                let is_me = Some(team.id.as_str()) == focus_team;
                output.push_str(&Self::format_team(team, is_me));
                output.push('\n');
            }
        }

        output.push_str(RULE);
        output.push('\n');
        output
    }

    fn is_active(team: &TeamDto) -> bool {
        team.selected_problem_id.is_some() || !team.tasks.is_empty()
    }

    /// One roster line: `team-1 (Team 1) p1 [x][?][ ] 1/3 approved`
    pub fn format_team(team: &TeamDto, is_me: bool) -> String {
        let me_suffix = if is_me { " (me)" } else { "" };
        let Some(problem_id) = team.selected_problem_id.as_deref() else {
            return format!("{} ({}){} - no problem selected", team.id, team.name, me_suffix);
        };

        let tasks = team.tasks.get(problem_id).map(Vec::as_slice).unwrap_or(&[]);
        let marks: String = tasks.iter().map(Self::task_mark).collect();
        let approved = tasks.iter().filter(|task| task.approved).count();
        format!(
            "{} ({}){} {} {} {}/{} approved",
            team.id,
            team.name,
            me_suffix,
            problem_id,
            marks,
            approved,
            tasks.len()
        )
    }

    fn task_mark(task: &TaskDto) -> &'static str {
        if task.approved {
            "[x]"
        } else if task.requested {
            "[?]"
        } else {
            "[ ]"
        }
    }

    /// List of console commands
    pub fn format_help() -> String {
        [
            "Commands:",
            "  start                    start the countdown",
            "  pause                    pause the countdown",
            "  reset [minutes]          stop and restore the default (or given) duration",
            "  set <minutes>            set the remaining time",
            "  add <name> [--id <id>]   add a team (the name may contain spaces)",
            "  select [team] <problem>  select a problem for a team",
            "  request [team] <index>   request approval of a task",
            "  approve <team> <index>   approve a task",
            "  help                     show this list",
            "  quit                     leave",
        ]
        .join("\n")
            + "\n"
    }

    /// Format a locally rejected input line
    pub fn format_input_error(error: &InputError) -> String {
        format!("! {}\n", error)
    }

    /// Format a binary message notification
    pub fn format_binary_message(byte_count: usize) -> String {
        format!("\n← Received {} bytes of binary data\n", byte_count)
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}
