//! Drag gesture adapter.
//!
//! Tracks the drag lifecycle `Idle -> Dragging -> {Dropped | Cancelled}` and
//! turns a finished drag into at most one [`MoveIntent`]. Both terminal
//! states return the adapter to idle; a new drag cannot start while one is
//! in progress.

use thiserror::Error;
use tracing::debug;

use crate::board::{
    domain::{Board, BoardItem, MoveIntent, Status, StoryId, Subject},
    ports::BoardBackend,
    services::coordinator::{MoveCoordinator, MoveDispatch, MoveRejection},
};

/// Place on the board a dragged item can be released over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropTarget {
    /// A status column.
    Column(Status),
    /// The task list of a story card.
    Story(StoryId),
    /// The list of tasks without a parent story.
    Standalone,
}

/// How a drag ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// The drop produced a move.
    Dropped(MoveIntent),
    /// The drop landed on the item's own location or on a target that does
    /// not accept it.
    NoMove,
    /// The drag was abandoned, or released outside any target.
    Cancelled,
}

/// Errors raised when starting a drag.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DragError {
    /// Another drag has not finished yet.
    #[error("already dragging {0}")]
    AlreadyDragging(Subject),

    /// The item is not on the board.
    #[error("{0} is not on the board")]
    UnknownSubject(Subject),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum DragState {
    #[default]
    Idle,
    Dragging {
        subject: Subject,
        origin: DropTarget,
    },
}

/// Converts drag gestures into move intents.
#[derive(Debug, Clone, Default)]
pub struct DragAdapter {
    state: DragState,
}

impl DragAdapter {
    /// Creates an idle adapter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the item being dragged, if any.
    #[must_use]
    pub const fn dragging(&self) -> Option<Subject> {
        match self.state {
            DragState::Idle => None,
            DragState::Dragging { subject, .. } => Some(subject),
        }
    }

    /// Starts dragging an item currently shown on `board`.
    ///
    /// # Errors
    ///
    /// Returns [`DragError::AlreadyDragging`] while another drag is active
    /// and [`DragError::UnknownSubject`] when the item is not on the board.
    pub fn begin(&mut self, board: &Board, subject: Subject) -> Result<(), DragError> {
        if let DragState::Dragging { subject: active, .. } = self.state {
            return Err(DragError::AlreadyDragging(active));
        }
        let origin = match board.locate(subject) {
            Some(BoardItem::Story(story)) => DropTarget::Column(story.status()),
            Some(BoardItem::Task(task)) => task
                .story_id()
                .map_or(DropTarget::Standalone, DropTarget::Story),
            None => return Err(DragError::UnknownSubject(subject)),
        };
        debug!(%subject, ?origin, "drag started");
        self.state = DragState::Dragging { subject, origin };
        Ok(())
    }

    /// Ends the drag over `target`, or outside any target when `None`.
    pub fn drop_on(&mut self, target: Option<DropTarget>) -> DragOutcome {
        let DragState::Dragging { subject, origin } = std::mem::take(&mut self.state) else {
            return DragOutcome::NoMove;
        };
        let Some(destination) = target else {
            debug!(%subject, "drag released outside the board");
            return DragOutcome::Cancelled;
        };
        if destination == origin {
            return DragOutcome::NoMove;
        }
        let outcome = match (subject, destination) {
            (Subject::Story(_), DropTarget::Column(status)) => {
                DragOutcome::Dropped(MoveIntent::status_move(subject, status))
            }
            (Subject::Task(task), DropTarget::Story(story)) => {
                DragOutcome::Dropped(MoveIntent::reparent(task, Some(story)))
            }
            (Subject::Task(task), DropTarget::Standalone) => {
                DragOutcome::Dropped(MoveIntent::reparent(task, None))
            }
            _ => DragOutcome::NoMove,
        };
        debug!(%subject, ?destination, ?outcome, "drag finished");
        outcome
    }

    /// Abandons the current drag, as when the user presses escape.
    pub fn cancel(&mut self) -> DragOutcome {
        match std::mem::take(&mut self.state) {
            DragState::Idle => DragOutcome::NoMove,
            DragState::Dragging { subject, .. } => {
                debug!(%subject, "drag cancelled");
                DragOutcome::Cancelled
            }
        }
    }

    /// Ends the drag over `target` and hands any resulting intent to the
    /// coordinator.
    ///
    /// Returns `Ok(None)` when the drag produced no move.
    ///
    /// # Errors
    ///
    /// Returns the coordinator's [`MoveRejection`] for refused moves.
    pub fn drop_and_apply<B>(
        &mut self,
        target: Option<DropTarget>,
        coordinator: &MoveCoordinator<B>,
    ) -> Result<Option<MoveDispatch>, MoveRejection>
    where
        B: BoardBackend + 'static,
    {
        match self.drop_on(target) {
            DragOutcome::Dropped(intent) => coordinator.apply_move(intent).map(Some),
            DragOutcome::NoMove | DragOutcome::Cancelled => Ok(None),
        }
    }
}
