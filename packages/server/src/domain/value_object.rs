//! Value objects
//!
//! Every identifier and quantity that crosses the wire is validated here once,
//! so entities can assume well-formed input.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValueObjectError;

/// Upper bound for identifier and name length (in characters)
const MAX_LABEL_LENGTH: usize = 100;

fn validate_label(value: String, field: &'static str) -> Result<String, ValueObjectError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValueObjectError::Empty(field));
    }
    if trimmed.chars().count() > MAX_LABEL_LENGTH {
        return Err(ValueObjectError::TooLong {
            field,
            max: MAX_LABEL_LENGTH,
        });
    }
    Ok(trimmed.to_string())
}

macro_rules! label_value_object {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: String) -> Result<Self, ValueObjectError> {
                validate_label(value, $field).map(Self)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValueObjectError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = ValueObjectError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value.to_string())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

label_value_object!(
    /// Identifier of one WebSocket connection
    ClientId,
    "client_id"
);

label_value_object!(
    /// Identifier of a team (e.g. `team-1`)
    TeamId,
    "team_id"
);

label_value_object!(
    /// Display name of a team
    TeamName,
    "team_name"
);

label_value_object!(
    /// Identifier of a problem statement (e.g. `p1`)
    ProblemId,
    "problem_id"
);

impl ClientId {
    /// Generate a random connection identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl TeamId {
    /// Generate a team identifier for teams added without one
    pub fn generate() -> Self {
        Self(format!("team-{}", Uuid::new_v4().simple()))
    }
}

/// 1-based position of a task within a problem's task list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskIndex(u32);

impl TaskIndex {
    pub fn new(value: u32) -> Result<Self, ValueObjectError> {
        if value == 0 {
            return Err(ValueObjectError::ZeroTaskIndex);
        }
        Ok(Self(value))
    }

    /// Index for the task at zero-based `position` in a task list
    pub(crate) fn from_position(position: usize) -> Self {
        Self(u32::try_from(position).map_or(u32::MAX, |p| p.saturating_add(1)))
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl TryFrom<i64> for TaskIndex {
    type Error = ValueObjectError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        let value = u32::try_from(value).map_err(|_| ValueObjectError::ZeroTaskIndex)?;
        Self::new(value)
    }
}

/// Non-negative duration in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DurationMs(u64);

impl DurationMs {
    pub const ZERO: Self = Self(0);
    /// Largest accepted duration: 2^53 - 1 ms, the largest integer every JSON
    /// consumer reads back exactly
    pub const MAX: Self = Self(9_007_199_254_740_991);

    /// Trusted constructor for in-process constants; untrusted input goes
    /// through `TryFrom` or `from_f64`
    pub const fn new(millis: u64) -> Self {
        Self(millis)
    }

    /// Build a duration from an untrusted JSON number
    ///
    /// Fractions are floored; negative, NaN, infinite and above-`MAX` values
    /// are rejected.
    pub fn from_f64(millis: f64) -> Result<Self, ValueObjectError> {
        if !millis.is_finite() || millis < 0.0 || millis.floor() > Self::MAX.0 as f64 {
            return Err(ValueObjectError::InvalidDuration(millis.to_string()));
        }
        Ok(Self(millis.floor() as u64))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl TryFrom<u64> for DurationMs {
    type Error = ValueObjectError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value > Self::MAX.0 {
            return Err(ValueObjectError::InvalidDuration(value.to_string()));
        }
        Ok(Self(value))
    }
}

impl TryFrom<i64> for DurationMs {
    type Error = ValueObjectError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u64::try_from(value)
            .map_err(|_| ValueObjectError::InvalidDuration(value.to_string()))
            .and_then(Self::try_from)
    }
}

/// Unix timestamp in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// Timestamp `duration` after this one
    pub fn after(&self, duration: DurationMs) -> Self {
        let offset = i64::try_from(duration.value()).unwrap_or(i64::MAX);
        Self(self.0.saturating_add(offset))
    }

    /// Milliseconds from `now` until this timestamp, clamped at zero
    pub fn remaining_from(&self, now: Timestamp) -> DurationMs {
        let diff = self.0.saturating_sub(now.0);
        DurationMs(u64::try_from(diff).unwrap_or(0))
    }
}
