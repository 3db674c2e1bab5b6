//! Shared world state for board move BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use rstest::fixture;
use sprintboard::board::{
    adapters::memory::InMemoryBoardBackend,
    config::BoardConfig,
    domain::{Board, Container, SprintId, Status, Story, StoryId, Task, TaskId},
    services::{BoardService, MoveCoordinator, MoveEvent, MoveRejection},
};
use tokio::sync::mpsc;

/// Coordinator type used by the BDD world.
pub type TestCoordinator = MoveCoordinator<InMemoryBoardBackend>;

/// Scenario world for board move behaviour tests.
pub struct BoardMoveWorld {
    pub backend: Arc<InMemoryBoardBackend>,
    pub sprint: SprintId,
    pub stories: HashMap<String, StoryId>,
    pub tasks: HashMap<String, TaskId>,
    pub coordinator: Option<TestCoordinator>,
    pub events: Option<mpsc::Receiver<MoveEvent>>,
    pub optimistic_board: Option<Board>,
    pub last_rejection: Option<MoveRejection>,
    pub settled_event: Option<MoveEvent>,
    pub notifications: Vec<MoveEvent>,
}

impl BoardMoveWorld {
    /// Creates a world with an empty backend and sprint.
    #[must_use]
    pub fn new() -> Self {
        Self {
            backend: Arc::new(InMemoryBoardBackend::new()),
            sprint: SprintId::new(),
            stories: HashMap::new(),
            tasks: HashMap::new(),
            coordinator: None,
            events: None,
            optimistic_board: None,
            last_rejection: None,
            settled_event: None,
            notifications: Vec::new(),
        }
    }

    /// Seeds a story into the sprint and remembers it by title.
    pub fn add_story(&mut self, title: &str, status: &str) -> Result<(), eyre::Report> {
        let parsed = Status::try_from(status)?;
        let story = Story::new(title)?.with_status(parsed).with_sprint(self.sprint);
        self.stories.insert(title.to_owned(), story.id());
        self.backend.seed_story(story)?;
        Ok(())
    }

    /// Seeds a task under a known story and remembers it by title.
    pub fn add_task(&mut self, title: &str, story_title: &str) -> Result<(), eyre::Report> {
        let story_id = self.story_id(story_title)?;
        let task = Task::new(title)?.with_story(story_id);
        self.tasks.insert(title.to_owned(), task.id());
        self.backend.seed_task(task)?;
        Ok(())
    }

    /// Looks up a seeded story by title.
    pub fn story_id(&self, title: &str) -> Result<StoryId, eyre::Report> {
        self.stories
            .get(title)
            .copied()
            .ok_or_else(|| eyre::eyre!("unknown story {title:?} in scenario world"))
    }

    /// Looks up a seeded task by title.
    pub fn task_id(&self, title: &str) -> Result<TaskId, eyre::Report> {
        self.tasks
            .get(title)
            .copied()
            .ok_or_else(|| eyre::eyre!("unknown task {title:?} in scenario world"))
    }

    /// Loads the board from the backend and starts a coordinator over it.
    ///
    /// The coordinator is created lazily so every seeding step runs first.
    pub fn coordinator(&mut self) -> Result<&TestCoordinator, eyre::Report> {
        if self.coordinator.is_none() {
            let service = BoardService::new(self.backend.clone());
            let board = run_async(service.refresh(Container::Sprint(self.sprint)))?;
            let (coordinator, events) =
                MoveCoordinator::new(self.backend.clone(), board, BoardConfig::default());
            self.events = Some(events);
            self.coordinator = Some(coordinator);
        }
        self.coordinator
            .as_ref()
            .ok_or_else(|| eyre::eyre!("coordinator was not started"))
    }

    /// Moves every published event into `notifications`.
    pub fn drain_events(&mut self) {
        let Some(events) = self.events.as_mut() else {
            return;
        };
        while let Ok(event) = events.try_recv() {
            self.notifications.push(event);
        }
    }

    /// Returns the coordinator's current board.
    pub fn current_board(&self) -> Result<Board, eyre::Report> {
        let coordinator = self
            .coordinator
            .as_ref()
            .ok_or_else(|| eyre::eyre!("no move has been made in this scenario"))?;
        Ok(coordinator.board()?)
    }
}

impl Default for BoardMoveWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> BoardMoveWorld {
    BoardMoveWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
