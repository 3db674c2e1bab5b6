//! Shared builders for board unit tests.

use std::sync::Arc;

use crate::board::{
    adapters::memory::InMemoryBoardBackend,
    domain::{Board, Container, Priority, SprintId, Status, Story, Task},
    services::materialize,
};

/// Stories and tasks of a small sprint, plus the backend holding them.
pub(super) struct SprintFixture {
    pub sprint: SprintId,
    pub todo: Story,
    pub in_progress: Story,
    pub review: Story,
    pub done: Story,
    pub nested: Task,
    pub standalone: Task,
    pub backend: Arc<InMemoryBoardBackend>,
}

impl SprintFixture {
    pub(super) fn stories(&self) -> Vec<Story> {
        vec![
            self.todo.clone(),
            self.in_progress.clone(),
            self.review.clone(),
            self.done.clone(),
        ]
    }

    pub(super) fn tasks(&self) -> Vec<Task> {
        vec![self.nested.clone(), self.standalone.clone()]
    }

    pub(super) fn board(&self) -> Board {
        materialize(&self.stories(), &self.tasks(), Container::Sprint(self.sprint))
    }
}

pub(super) fn story_in(sprint: SprintId, title: &str, status: Status) -> eyre::Result<Story> {
    Ok(Story::new(title)?.with_status(status).with_sprint(sprint))
}

pub(super) fn sprint_fixture() -> eyre::Result<SprintFixture> {
    let sprint = SprintId::new();
    let todo = story_in(sprint, "Login form", Status::ToDo)?
        .with_priority(Priority::High)
        .with_points(3);
    let in_progress = story_in(sprint, "Session expiry", Status::InProgress)?.with_points(5);
    let review = story_in(sprint, "Password reset", Status::Review)?.with_points(2);
    let done = story_in(sprint, "Audit log", Status::Done)?.with_points(1);
    let nested = Task::new("Wire submit button")?.with_story(todo.id());
    let standalone = Task::new("Update changelog")?;

    let backend = Arc::new(InMemoryBoardBackend::new());
    for story in [&todo, &in_progress, &review, &done] {
        backend.seed_story(story.clone())?;
    }
    backend.seed_task(nested.clone())?;
    backend.seed_task(standalone.clone())?;

    Ok(SprintFixture {
        sprint,
        todo,
        in_progress,
        review,
        done,
        nested,
        standalone,
        backend,
    })
}
