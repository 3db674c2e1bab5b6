//! Board refresh: load from the backend and materialize.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::board::{
    domain::{Board, Container},
    ports::{BoardBackend, BoardBackendError},
    services::{
        coordinator::{MoveCoordinator, MoveRejection},
        materializer::materialize,
    },
};

/// Service-level errors for board refresh.
#[derive(Debug, Error)]
pub enum BoardServiceError {
    /// A backend fetch failed.
    #[error(transparent)]
    Backend(#[from] BoardBackendError),
    /// The coordinator's board could not be read or replaced.
    #[error(transparent)]
    State(#[from] MoveRejection),
}

/// Result type for board service operations.
pub type BoardServiceResult<T> = Result<T, BoardServiceError>;

/// Loads boards from the backend of record.
#[derive(Clone)]
pub struct BoardService<B>
where
    B: BoardBackend,
{
    backend: Arc<B>,
}

impl<B> BoardService<B>
where
    B: BoardBackend,
{
    /// Creates a new board service.
    #[must_use]
    pub const fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// Fetches the container's stories and their tasks and materializes the
    /// board.
    ///
    /// Stories dropped for having no column are logged, not reported as
    /// errors.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Backend`] when any fetch fails.
    pub async fn refresh(&self, container: Container) -> BoardServiceResult<Board> {
        let stories = self.backend.fetch_stories_for_container(container).await?;
        let mut tasks = Vec::new();
        for story in &stories {
            tasks.extend(self.backend.fetch_tasks_for_story(story.id()).await?);
        }

        let board = materialize(&stories, &tasks, container);
        for story_id in board.dropped() {
            warn!(%story_id, %container, "story status has no board column, leaving it off the board");
        }
        debug!(
            %container,
            stories = stories.len(),
            tasks = tasks.len(),
            "board refreshed"
        );
        Ok(board)
    }

    /// Reloads the coordinator's container and replaces its board.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError`] when the fetch fails or the coordinator
    /// state is unavailable.
    pub async fn reconcile<C>(&self, coordinator: &MoveCoordinator<C>) -> BoardServiceResult<Board>
    where
        C: BoardBackend + 'static,
    {
        let container = coordinator.board()?.container();
        let board = self.refresh(container).await?;
        coordinator.replace_board(board.clone())?;
        Ok(board)
    }
}
