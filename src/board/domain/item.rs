//! Stories and tasks, the two kinds of item a board moves around.

use super::{BoardDomainError, EpicId, Priority, SprintId, Status, StoryId, TaskId, TaskType, UserId};
use serde::{Deserialize, Serialize};

pub(super) fn validated_title(title: impl Into<String>) -> Result<String, BoardDomainError> {
    let raw = title.into();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(BoardDomainError::EmptyTitle);
    }
    Ok(trimmed.to_owned())
}

/// User story tracked on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    id: StoryId,
    title: String,
    status: Status,
    priority: Priority,
    points: u32,
    epic_id: Option<EpicId>,
    sprint_id: Option<SprintId>,
    assignee_id: Option<UserId>,
}

impl Story {
    /// Creates a `To Do` story with medium priority and no estimate.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTitle`] when the title is blank.
    pub fn new(title: impl Into<String>) -> Result<Self, BoardDomainError> {
        Ok(Self {
            id: StoryId::new(),
            title: validated_title(title)?,
            status: Status::ToDo,
            priority: Priority::default(),
            points: 0,
            epic_id: None,
            sprint_id: None,
            assignee_id: None,
        })
    }

    /// Sets the status.
    #[must_use]
    pub const fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the story point estimate.
    #[must_use]
    pub const fn with_points(mut self, points: u32) -> Self {
        self.points = points;
        self
    }

    /// Places the story under an epic.
    #[must_use]
    pub const fn with_epic(mut self, epic_id: EpicId) -> Self {
        self.epic_id = Some(epic_id);
        self
    }

    /// Plans the story into a sprint.
    #[must_use]
    pub const fn with_sprint(mut self, sprint_id: SprintId) -> Self {
        self.sprint_id = Some(sprint_id);
        self
    }

    /// Assigns the story.
    #[must_use]
    pub const fn with_assignee(mut self, assignee_id: UserId) -> Self {
        self.assignee_id = Some(assignee_id);
        self
    }

    /// Returns the story identifier.
    #[must_use]
    pub const fn id(&self) -> StoryId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the workflow status.
    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the story point estimate.
    #[must_use]
    pub const fn points(&self) -> u32 {
        self.points
    }

    /// Returns the owning epic, if any.
    #[must_use]
    pub const fn epic_id(&self) -> Option<EpicId> {
        self.epic_id
    }

    /// Returns the sprint the story is planned into, if any.
    #[must_use]
    pub const fn sprint_id(&self) -> Option<SprintId> {
        self.sprint_id
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assignee_id(&self) -> Option<UserId> {
        self.assignee_id
    }

    pub(crate) const fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    pub(crate) const fn set_assignee(&mut self, assignee_id: Option<UserId>) {
        self.assignee_id = assignee_id;
    }
}

/// Task, bug, or subtask, optionally nested under a story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    status: Status,
    priority: Priority,
    task_type: TaskType,
    story_id: Option<StoryId>,
    assignee_id: Option<UserId>,
}

impl Task {
    /// Creates a standalone `To Do` task with medium priority.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTitle`] when the title is blank.
    pub fn new(title: impl Into<String>) -> Result<Self, BoardDomainError> {
        Ok(Self {
            id: TaskId::new(),
            title: validated_title(title)?,
            status: Status::ToDo,
            priority: Priority::default(),
            task_type: TaskType::default(),
            story_id: None,
            assignee_id: None,
        })
    }

    /// Sets the status.
    #[must_use]
    pub const fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the task type.
    #[must_use]
    pub const fn with_type(mut self, task_type: TaskType) -> Self {
        self.task_type = task_type;
        self
    }

    /// Nests the task under a story.
    #[must_use]
    pub const fn with_story(mut self, story_id: StoryId) -> Self {
        self.story_id = Some(story_id);
        self
    }

    /// Assigns the task.
    #[must_use]
    pub const fn with_assignee(mut self, assignee_id: UserId) -> Self {
        self.assignee_id = Some(assignee_id);
        self
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the workflow status.
    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the task type.
    #[must_use]
    pub const fn task_type(&self) -> TaskType {
        self.task_type
    }

    /// Returns the parent story, or `None` for a standalone task.
    #[must_use]
    pub const fn story_id(&self) -> Option<StoryId> {
        self.story_id
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assignee_id(&self) -> Option<UserId> {
        self.assignee_id
    }

    pub(crate) const fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    pub(crate) const fn set_story(&mut self, story_id: Option<StoryId>) {
        self.story_id = story_id;
    }

    pub(crate) const fn set_assignee(&mut self, assignee_id: Option<UserId>) {
        self.assignee_id = assignee_id;
    }
}
