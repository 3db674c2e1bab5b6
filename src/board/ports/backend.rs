//! Port for the persistence collaborator behind the board.
//!
//! The backend is the system of record. It validates status changes on its
//! own; the client-side transition check only spares a round trip.

use crate::board::domain::{Container, Status, Story, StoryId, Subject, Task, TaskId, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for board backend operations.
pub type BoardBackendResult<T> = Result<T, BoardBackendError>;

/// Persistence contract consumed by the board engine.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BoardBackend: Send + Sync {
    /// Changes a story's status and returns the stored story.
    ///
    /// # Errors
    ///
    /// Returns [`BoardBackendError::Rejected`] when the stored status cannot
    /// move to `status`, [`BoardBackendError::NotFound`] for unknown stories,
    /// or transport failures.
    async fn update_story_status(
        &self,
        story_id: StoryId,
        status: Status,
    ) -> BoardBackendResult<Story>;

    /// Changes a task's status and returns the stored task.
    ///
    /// # Errors
    ///
    /// Same as [`BoardBackend::update_story_status`].
    async fn update_task_status(&self, task_id: TaskId, status: Status) -> BoardBackendResult<Task>;

    /// Moves a task under another story, or detaches it with `None`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardBackendError::NotFound`] when the task or the target
    /// story does not exist, or transport failures.
    async fn update_task_parent(
        &self,
        task_id: TaskId,
        story_id: Option<StoryId>,
    ) -> BoardBackendResult<Task>;

    /// Changes the assignee of a story or task.
    ///
    /// # Errors
    ///
    /// Returns [`BoardBackendError::NotFound`] for unknown subjects, or
    /// transport failures.
    async fn update_assignee(
        &self,
        subject: Subject,
        assignee: Option<UserId>,
    ) -> BoardBackendResult<()>;

    /// Returns the stories planned into a container, in backend order.
    ///
    /// # Errors
    ///
    /// Returns transport or persistence failures.
    async fn fetch_stories_for_container(
        &self,
        container: Container,
    ) -> BoardBackendResult<Vec<Story>>;

    /// Returns the tasks nested under a story, in backend order.
    ///
    /// # Errors
    ///
    /// Returns transport or persistence failures.
    async fn fetch_tasks_for_story(&self, story_id: StoryId) -> BoardBackendResult<Vec<Task>>;
}

/// Errors returned by board backend implementations.
#[derive(Debug, Clone, Error)]
pub enum BoardBackendError {
    /// The backend refused the change and explained why.
    #[error("rejected by backend: {message}")]
    Rejected {
        /// Message reported by the server.
        message: String,
    },

    /// The subject does not exist in the backend.
    #[error("not found: {0}")]
    NotFound(Subject),

    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl BoardBackendError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Builds a rejection carrying the server's message.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// Returns the server-provided message, when the backend sent one.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message } if !message.trim().is_empty() => Some(message),
            Self::Rejected { .. } | Self::NotFound(_) | Self::Network(_) | Self::Persistence(_) => {
                None
            }
        }
    }
}
