//! Epics, sprints, and the container a board is scoped to.

use super::{BoardDomainError, EpicId, SprintId, item::validated_title};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse progress state of an epic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpicStatus {
    /// No story has started.
    #[default]
    ToDo,
    /// Work is underway.
    InProgress,
    /// All work is finished.
    Done,
}

/// Large body of work that groups stories.
///
/// Stories point at their epic through [`super::Story::epic_id`]; the epic
/// does not own them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Epic {
    id: EpicId,
    name: String,
    status: EpicStatus,
}

impl Epic {
    /// Creates an epic in the `To Do` state.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTitle`] when the name is blank.
    pub fn new(name: impl Into<String>) -> Result<Self, BoardDomainError> {
        Ok(Self {
            id: EpicId::new(),
            name: validated_title(name)?,
            status: EpicStatus::default(),
        })
    }

    /// Sets the epic status.
    #[must_use]
    pub const fn with_status(mut self, status: EpicStatus) -> Self {
        self.status = status;
        self
    }

    /// Returns the epic identifier.
    #[must_use]
    pub const fn id(&self) -> EpicId {
        self.id
    }

    /// Returns the epic name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the epic status.
    #[must_use]
    pub const fn status(&self) -> EpicStatus {
        self.status
    }
}

/// Sprint lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SprintState {
    /// Being filled with stories.
    #[default]
    Planning,
    /// Currently running.
    Active,
    /// Closed.
    Completed,
}

/// Time-boxed iteration that scopes which stories the board shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprint {
    id: SprintId,
    name: String,
    state: SprintState,
    starts_at: Option<DateTime<Utc>>,
    ends_at: Option<DateTime<Utc>>,
}

impl Sprint {
    /// Creates a sprint in the planning state with no dates.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: SprintId::new(),
            name: name.into(),
            state: SprintState::default(),
            starts_at: None,
            ends_at: None,
        }
    }

    /// Sets the lifecycle state.
    #[must_use]
    pub const fn with_state(mut self, state: SprintState) -> Self {
        self.state = state;
        self
    }

    /// Sets the sprint window.
    #[must_use]
    pub const fn with_window(mut self, starts_at: DateTime<Utc>, ends_at: DateTime<Utc>) -> Self {
        self.starts_at = Some(starts_at);
        self.ends_at = Some(ends_at);
        self
    }

    /// Returns the sprint identifier.
    #[must_use]
    pub const fn id(&self) -> SprintId {
        self.id
    }

    /// Returns the sprint name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SprintState {
        self.state
    }

    /// Returns the planned start, if scheduled.
    #[must_use]
    pub const fn starts_at(&self) -> Option<DateTime<Utc>> {
        self.starts_at
    }

    /// Returns the planned end, if scheduled.
    #[must_use]
    pub const fn ends_at(&self) -> Option<DateTime<Utc>> {
        self.ends_at
    }

    /// Returns whole days left until the sprint ends, floored at zero.
    ///
    /// Returns `None` for sprints without an end date.
    #[must_use]
    pub fn days_remaining(&self, clock: &impl Clock) -> Option<u64> {
        let ends_at = self.ends_at?;
        let remaining = ends_at.signed_duration_since(clock.utc()).num_days();
        Some(u64::try_from(remaining).unwrap_or(0))
    }
}

/// Scope a board is materialized for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "sprint_id", rename_all = "snake_case")]
pub enum Container {
    /// Stories planned into the given sprint.
    Sprint(SprintId),
    /// Stories not planned into any sprint.
    Backlog,
}

impl Container {
    /// Returns the container for the first active sprint, or the backlog when
    /// no sprint is running.
    #[must_use]
    pub fn for_active_sprint(sprints: &[Sprint]) -> Self {
        sprints
            .iter()
            .find(|sprint| sprint.state() == SprintState::Active)
            .map_or(Self::Backlog, |sprint| Self::Sprint(sprint.id()))
    }

    /// Returns whether a story with the given sprint assignment belongs here.
    #[must_use]
    pub fn contains(self, sprint_id: Option<SprintId>) -> bool {
        match self {
            Self::Sprint(id) => sprint_id == Some(id),
            Self::Backlog => sprint_id.is_none(),
        }
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sprint(id) => write!(f, "sprint {id}"),
            Self::Backlog => f.write_str("backlog"),
        }
    }
}
