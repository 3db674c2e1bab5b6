//! Workflow statuses and the status transition table.
//!
//! The table below is the single source of truth for which status changes
//! the board accepts. It is deliberately one-directional with a single
//! reopen edge:
//!
//! ```text
//! To Do       -> In Progress
//! In Progress -> Review
//! Review      -> Done
//! Done        -> To Do
//! ```

use super::ParseStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Workflow status shared by stories and tasks.
///
/// Deserialization goes through [`Status::try_from`], so payloads may carry
/// either the storage form (`in_progress`) or the label (`In Progress`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Status {
    /// Not yet planned into a sprint.
    Backlog,
    /// Planned but not started.
    ToDo,
    /// Being worked on.
    InProgress,
    /// Awaiting review.
    Review,
    /// Finished.
    Done,
    /// Waiting on something outside the team.
    Blocked,
}

impl Status {
    /// Statuses that get a board column, in layout order.
    pub const BOARD_COLUMNS: [Self; 4] = [Self::ToDo, Self::InProgress, Self::Review, Self::Done];

    /// Every status value.
    pub const ALL: [Self; 6] = [
        Self::Backlog,
        Self::ToDo,
        Self::InProgress,
        Self::Review,
        Self::Done,
        Self::Blocked,
    ];

    /// Returns the statuses reachable from `self` in a single move.
    #[must_use]
    pub const fn allowed_transitions(self) -> &'static [Self] {
        match self {
            Self::ToDo => &[Self::InProgress],
            Self::InProgress => &[Self::Review],
            Self::Review => &[Self::Done],
            Self::Done => &[Self::ToDo],
            Self::Backlog | Self::Blocked => &[],
        }
    }

    /// Returns whether a single move from `self` to `target` is legal.
    #[must_use]
    pub fn can_transition_to(self, target: Self) -> bool {
        self.allowed_transitions().contains(&target)
    }

    /// Returns whether the status has a column on the board.
    #[must_use]
    pub fn has_column(self) -> bool {
        Self::BOARD_COLUMNS.contains(&self)
    }

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Backlog => "backlog",
            Self::ToDo => "to_do",
            Self::InProgress => "in_progress",
            Self::Review => "review",
            Self::Done => "done",
            Self::Blocked => "blocked",
        }
    }

    /// Returns the column heading shown to users.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Backlog => "Backlog",
            Self::ToDo => "To Do",
            Self::InProgress => "In Progress",
            Self::Review => "Review",
            Self::Done => "Done",
            Self::Blocked => "Blocked",
        }
    }
}

/// Returns whether the transition table allows moving from `from` to `to`.
#[must_use]
pub fn is_transition_allowed(from: Status, to: Status) -> bool {
    from.can_transition_to(to)
}

/// Lowercases a label and folds spaces and hyphens into underscores.
pub(super) fn normalize_label(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|ch| match ch {
            ' ' | '-' => '_',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

impl TryFrom<&str> for Status {
    type Error = ParseStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match normalize_label(value).as_str() {
            "backlog" => Ok(Self::Backlog),
            "to_do" | "todo" => Ok(Self::ToDo),
            "in_progress" => Ok(Self::InProgress),
            "review" | "in_review" => Ok(Self::Review),
            "done" => Ok(Self::Done),
            "blocked" => Ok(Self::Blocked),
            _ => Err(ParseStatusError(value.to_owned())),
        }
    }
}

impl TryFrom<String> for Status {
    type Error = ParseStatusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
