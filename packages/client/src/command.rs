//! Console input parsing.
//!
//! Each line typed at the prompt becomes either a command envelope for the
//! server or a local action. Malformed input never reaches the server.

use countdown_server::infrastructure::dto::websocket::{CommandEnvelope, event};
use serde_json::json;
use thiserror::Error;

const MS_PER_MINUTE: f64 = 60_000.0;

/// Input that could not be turned into a command
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("unknown command '{0}' (type 'help' for the list)")]
    UnknownCommand(String),

    #[error("missing {0}")]
    MissingArgument(&'static str),

    #[error("too many arguments for '{0}'")]
    TooManyArguments(String),

    #[error("'{0}' is not a non-negative number of minutes")]
    InvalidMinutes(String),

    #[error("'{0}' is not a task index (1, 2, 3, ...)")]
    InvalidIndex(String),

    #[error("no team given and no default team (start with --team)")]
    NoTeam,
}

/// What to do with one line of input
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleAction {
    Send(CommandEnvelope),
    Help,
    Quit,
}

fn minutes_to_ms(raw: &str) -> Result<u64, InputError> {
    let minutes: f64 = raw
        .parse()
        .map_err(|_| InputError::InvalidMinutes(raw.to_string()))?;
    if !minutes.is_finite() || minutes < 0.0 {
        return Err(InputError::InvalidMinutes(raw.to_string()));
    }
    Ok((minutes * MS_PER_MINUTE).round() as u64)
}

fn task_index(raw: &str) -> Result<u32, InputError> {
    match raw.parse::<u32>() {
        Ok(index) if index >= 1 => Ok(index),
        _ => Err(InputError::InvalidIndex(raw.to_string())),
    }
}

/// `[team] <value>`: the team may be omitted when a default is configured
fn team_and_value<'a>(
    name: &str,
    args: &[&'a str],
    default_team: Option<&'a str>,
    value_label: &'static str,
) -> Result<(&'a str, &'a str), InputError> {
    match args {
        [] => Err(InputError::MissingArgument(value_label)),
        [value] => default_team
            .map(|team| (team, *value))
            .ok_or(InputError::NoTeam),
        [team, value] => Ok((*team, *value)),
        _ => Err(InputError::TooManyArguments(name.to_string())),
    }
}

/// `<name words...> [--id <id>]`: every word outside the `--id` option is part of the name
fn add_team(args: &[&str]) -> Result<ConsoleAction, InputError> {
    let mut name_words = Vec::new();
    let mut id = None;
    let mut rest = args.iter();
    while let Some(word) = rest.next() {
        if *word == "--id" {
            let value = rest.next().ok_or(InputError::MissingArgument("team id"))?;
            if id.replace(*value).is_some() {
                return Err(InputError::TooManyArguments("--id".to_string()));
            }
        } else {
            name_words.push(*word);
        }
    }
    if name_words.is_empty() {
        return Err(InputError::MissingArgument("team name"));
    }

    let name = name_words.join(" ");
    let payload = match id {
        Some(id) => json!({ "id": id, "name": name }),
        None => json!({ "name": name }),
    };
    Ok(ConsoleAction::Send(CommandEnvelope::new(event::ADD_TEAM, payload)))
}

fn no_arguments(
    name: &str,
    args: &[&str],
    envelope: CommandEnvelope,
) -> Result<ConsoleAction, InputError> {
    if args.is_empty() {
        Ok(ConsoleAction::Send(envelope))
    } else {
        Err(InputError::TooManyArguments(name.to_string()))
    }
}

/// Parse one line typed at the prompt
///
/// # Arguments
///
/// * `line` - Trimmed, non-empty input line
/// * `default_team` - Team id used when `select` / `request` omit the team
pub fn parse_line(line: &str, default_team: Option<&str>) -> Result<ConsoleAction, InputError> {
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Err(InputError::MissingArgument("command"));
    };
    let args: Vec<&str> = words.collect();

    match name.to_ascii_lowercase().as_str() {
        "start" => no_arguments(name, &args, CommandEnvelope::bare(event::START)),
        "pause" => no_arguments(name, &args, CommandEnvelope::bare(event::PAUSE)),
        "reset" => match args.as_slice() {
            [] => Ok(ConsoleAction::Send(CommandEnvelope::bare(event::RESET))),
            [minutes] => Ok(ConsoleAction::Send(CommandEnvelope::new(
                event::RESET,
                json!(minutes_to_ms(minutes)?),
            ))),
            _ => Err(InputError::TooManyArguments(name.to_string())),
        },
        "set" => match args.as_slice() {
            [] => Err(InputError::MissingArgument("minutes")),
            [minutes] => Ok(ConsoleAction::Send(CommandEnvelope::new(
                event::SET_REMAINING,
                json!(minutes_to_ms(minutes)?),
            ))),
            _ => Err(InputError::TooManyArguments(name.to_string())),
        },
        "add" => add_team(&args),
        "select" => {
            let (team, problem) = team_and_value(name, &args, default_team, "problem id")?;
            Ok(ConsoleAction::Send(CommandEnvelope::new(
                event::SELECT_PROBLEM,
                json!({ "teamId": team, "problemId": problem }),
            )))
        }
        "request" => {
            let (team, index) = team_and_value(name, &args, default_team, "task index")?;
            Ok(ConsoleAction::Send(CommandEnvelope::new(
                event::REQUEST_TASK_APPROVAL,
                json!({ "teamId": team, "taskIndex": task_index(index)? }),
            )))
        }
        "approve" => match args.as_slice() {
            [] => Err(InputError::MissingArgument("team id")),
            [_] => Err(InputError::MissingArgument("task index")),
            [team, index] => Ok(ConsoleAction::Send(CommandEnvelope::new(
                event::APPROVE_TASK,
                json!({ "teamId": team, "taskIndex": task_index(index)? }),
            ))),
            _ => Err(InputError::TooManyArguments(name.to_string())),
        },
        "help" | "?" => Ok(ConsoleAction::Help),
        "quit" | "exit" => Ok(ConsoleAction::Quit),
        _ => Err(InputError::UnknownCommand(name.to_string())),
    }
}
