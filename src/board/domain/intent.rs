//! Move intents and the tagged references they carry.

use super::{Status, Story, StoryId, Task, TaskId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of item a move applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectKind {
    /// A story card.
    Story,
    /// A task nested under a story, or standalone.
    Task,
}

/// Identifier of the item a move applies to, tagged with its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Subject {
    /// A story.
    Story(StoryId),
    /// A task.
    Task(TaskId),
}

impl Subject {
    /// Returns the subject kind.
    #[must_use]
    pub const fn kind(self) -> SubjectKind {
        match self {
            Self::Story(_) => SubjectKind::Story,
            Self::Task(_) => SubjectKind::Task,
        }
    }
}

impl From<StoryId> for Subject {
    fn from(id: StoryId) -> Self {
        Self::Story(id)
    }
}

impl From<TaskId> for Subject {
    fn from(id: TaskId) -> Self {
        Self::Task(id)
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Story(id) => write!(f, "story {id}"),
            Self::Task(id) => write!(f, "task {id}"),
        }
    }
}

/// Borrowed view of an item found on a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardItem<'a> {
    /// A story card.
    Story(&'a Story),
    /// A task.
    Task(&'a Task),
}

impl BoardItem<'_> {
    /// Returns the item's current status.
    #[must_use]
    pub const fn status(&self) -> Status {
        match self {
            Self::Story(story) => story.status(),
            Self::Task(task) => task.status(),
        }
    }

    /// Returns the item's current assignee.
    #[must_use]
    pub const fn assignee_id(&self) -> Option<UserId> {
        match self {
            Self::Story(story) => story.assignee_id(),
            Self::Task(task) => task.assignee_id(),
        }
    }
}

/// User request to change where an item sits on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MoveIntent {
    /// Change the workflow status of a story or task.
    StatusMove {
        /// Item to move.
        subject: Subject,
        /// Requested status.
        to_status: Status,
    },
    /// Move a task under another story, or detach it with `None`.
    Reparent {
        /// Task to move.
        task: TaskId,
        /// New parent story.
        to_story: Option<StoryId>,
    },
    /// Change who an item is assigned to.
    Reassign {
        /// Item to reassign.
        subject: Subject,
        /// New assignee, or `None` to unassign.
        assignee: Option<UserId>,
    },
}

impl MoveIntent {
    /// Builds a status move.
    #[must_use]
    pub fn status_move(subject: impl Into<Subject>, to_status: Status) -> Self {
        Self::StatusMove {
            subject: subject.into(),
            to_status,
        }
    }

    /// Builds a reparent move.
    #[must_use]
    pub const fn reparent(task: TaskId, to_story: Option<StoryId>) -> Self {
        Self::Reparent { task, to_story }
    }

    /// Builds a reassignment.
    #[must_use]
    pub fn reassign(subject: impl Into<Subject>, assignee: Option<UserId>) -> Self {
        Self::Reassign {
            subject: subject.into(),
            assignee,
        }
    }

    /// Returns the item the intent applies to.
    #[must_use]
    pub const fn subject(&self) -> Subject {
        match *self {
            Self::StatusMove { subject, .. } | Self::Reassign { subject, .. } => subject,
            Self::Reparent { task, .. } => Subject::Task(task),
        }
    }
}
