//! In-memory board backend for tests and local demos.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::board::{
    domain::{Container, Status, Story, StoryId, Subject, Task, TaskId, UserId},
    ports::{BoardBackend, BoardBackendError, BoardBackendResult},
};

/// Thread-safe in-memory backend.
///
/// Enforces the status transition table on writes, like the real service,
/// and can be told to fail upcoming calls.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBoardBackend {
    state: Arc<RwLock<InMemoryBoardState>>,
}

#[derive(Debug, Default)]
struct InMemoryBoardState {
    stories: Vec<Story>,
    tasks: Vec<Task>,
    queued_failures: VecDeque<BoardBackendError>,
    write_calls: usize,
}

impl InMemoryBoardState {
    fn story_mut(&mut self, id: StoryId) -> BoardBackendResult<&mut Story> {
        self.stories
            .iter_mut()
            .find(|story| story.id() == id)
            .ok_or(BoardBackendError::NotFound(Subject::Story(id)))
    }

    fn task_mut(&mut self, id: TaskId) -> BoardBackendResult<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|task| task.id() == id)
            .ok_or(BoardBackendError::NotFound(Subject::Task(id)))
    }

    fn take_failure(&mut self) -> BoardBackendResult<()> {
        self.queued_failures.pop_front().map_or(Ok(()), Err)
    }

    /// Counts a write attempt and fails it if a failure is queued.
    fn begin_write(&mut self) -> BoardBackendResult<()> {
        self.write_calls = self.write_calls.saturating_add(1);
        self.take_failure()
    }
}

fn ensure_transition(subject: Subject, from: Status, to: Status) -> BoardBackendResult<()> {
    if from.can_transition_to(to) {
        return Ok(());
    }
    Err(BoardBackendError::rejected(format!(
        "{subject} cannot move from {from} to {to}"
    )))
}

impl InMemoryBoardBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> BoardBackendResult<RwLockReadGuard<'_, InMemoryBoardState>> {
        self.state.read().map_err(|err| {
            BoardBackendError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> BoardBackendResult<RwLockWriteGuard<'_, InMemoryBoardState>> {
        self.state.write().map_err(|err| {
            BoardBackendError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    /// Stores a story, replacing any story with the same identifier.
    ///
    /// # Errors
    ///
    /// Returns [`BoardBackendError::Persistence`] when the store lock is
    /// poisoned.
    pub fn seed_story(&self, story: Story) -> BoardBackendResult<()> {
        let mut state = self.write()?;
        state.stories.retain(|existing| existing.id() != story.id());
        state.stories.push(story);
        Ok(())
    }

    /// Stores a task, replacing any task with the same identifier.
    ///
    /// # Errors
    ///
    /// Returns [`BoardBackendError::Persistence`] when the store lock is
    /// poisoned.
    pub fn seed_task(&self, task: Task) -> BoardBackendResult<()> {
        let mut state = self.write()?;
        state.tasks.retain(|existing| existing.id() != task.id());
        state.tasks.push(task);
        Ok(())
    }

    /// Makes the next call fail with `error`. Queued failures fire in order.
    ///
    /// # Errors
    ///
    /// Returns [`BoardBackendError::Persistence`] when the store lock is
    /// poisoned.
    pub fn fail_next(&self, error: BoardBackendError) -> BoardBackendResult<()> {
        self.write()?.queued_failures.push_back(error);
        Ok(())
    }

    /// Returns how many write calls have been received, failed ones included.
    ///
    /// # Errors
    ///
    /// Returns [`BoardBackendError::Persistence`] when the store lock is
    /// poisoned.
    pub fn write_calls(&self) -> BoardBackendResult<usize> {
        Ok(self.read()?.write_calls)
    }

    /// Returns the stored copy of a story.
    ///
    /// # Errors
    ///
    /// Returns [`BoardBackendError::Persistence`] when the store lock is
    /// poisoned.
    pub fn stored_story(&self, id: StoryId) -> BoardBackendResult<Option<Story>> {
        Ok(self
            .read()?
            .stories
            .iter()
            .find(|story| story.id() == id)
            .cloned())
    }

    /// Returns the stored copy of a task.
    ///
    /// # Errors
    ///
    /// Returns [`BoardBackendError::Persistence`] when the store lock is
    /// poisoned.
    pub fn stored_task(&self, id: TaskId) -> BoardBackendResult<Option<Task>> {
        Ok(self
            .read()?
            .tasks
            .iter()
            .find(|task| task.id() == id)
            .cloned())
    }
}

#[async_trait]
impl BoardBackend for InMemoryBoardBackend {
    async fn update_story_status(
        &self,
        story_id: StoryId,
        status: Status,
    ) -> BoardBackendResult<Story> {
        let mut state = self.write()?;
        state.begin_write()?;
        let story = state.story_mut(story_id)?;
        ensure_transition(Subject::Story(story_id), story.status(), status)?;
        story.set_status(status);
        Ok(story.clone())
    }

    async fn update_task_status(&self, task_id: TaskId, status: Status) -> BoardBackendResult<Task> {
        let mut state = self.write()?;
        state.begin_write()?;
        let task = state.task_mut(task_id)?;
        ensure_transition(Subject::Task(task_id), task.status(), status)?;
        task.set_status(status);
        Ok(task.clone())
    }

    async fn update_task_parent(
        &self,
        task_id: TaskId,
        story_id: Option<StoryId>,
    ) -> BoardBackendResult<Task> {
        let mut state = self.write()?;
        state.begin_write()?;
        if let Some(parent) = story_id {
            state.story_mut(parent)?;
        }
        let task = state.task_mut(task_id)?;
        task.set_story(story_id);
        Ok(task.clone())
    }

    async fn update_assignee(
        &self,
        subject: Subject,
        assignee: Option<UserId>,
    ) -> BoardBackendResult<()> {
        let mut state = self.write()?;
        state.begin_write()?;
        match subject {
            Subject::Story(id) => state.story_mut(id)?.set_assignee(assignee),
            Subject::Task(id) => state.task_mut(id)?.set_assignee(assignee),
        }
        Ok(())
    }

    async fn fetch_stories_for_container(
        &self,
        container: Container,
    ) -> BoardBackendResult<Vec<Story>> {
        let mut state = self.write()?;
        state.take_failure()?;
        Ok(state
            .stories
            .iter()
            .filter(|story| container.contains(story.sprint_id()))
            .cloned()
            .collect())
    }

    async fn fetch_tasks_for_story(&self, story_id: StoryId) -> BoardBackendResult<Vec<Task>> {
        let mut state = self.write()?;
        state.take_failure()?;
        Ok(state
            .tasks
            .iter()
            .filter(|task| task.story_id() == Some(story_id))
            .cloned()
            .collect())
    }
}
