//! Priority and task type scalars.

use super::{ParsePriorityError, ParseTaskTypeError, status::normalize_label};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Story and task priority, ordered from most to least urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Drop everything.
    Highest,
    /// Next up.
    High,
    /// Normal work.
    #[default]
    Medium,
    /// Can wait.
    Low,
    /// Nice to have.
    Lowest,
}

impl Priority {
    /// Returns the ordinal rank used to sort board columns (`Highest` = 0).
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Highest => 0,
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
            Self::Lowest => 4,
        }
    }

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Highest => "highest",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Lowest => "lowest",
        }
    }
}

impl TryFrom<&str> for Priority {
    type Error = ParsePriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match normalize_label(value).as_str() {
            "highest" => Ok(Self::Highest),
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            "lowest" => Ok(Self::Lowest),
            _ => Err(ParsePriorityError(value.to_owned())),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of work item a task represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    /// Ordinary unit of work.
    #[default]
    Task,
    /// Defect report.
    Bug,
    /// Work split out of a larger task.
    Subtask,
}

impl TaskType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Bug => "bug",
            Self::Subtask => "subtask",
        }
    }
}

impl TryFrom<&str> for TaskType {
    type Error = ParseTaskTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match normalize_label(value).as_str() {
            "task" => Ok(Self::Task),
            "bug" => Ok(Self::Bug),
            "subtask" | "sub_task" => Ok(Self::Subtask),
            _ => Err(ParseTaskTypeError(value.to_owned())),
        }
    }
}
