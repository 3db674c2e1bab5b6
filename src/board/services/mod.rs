//! Application services for the board workflow engine.

mod backlog;
mod coordinator;
mod drag;
mod materializer;
mod optimistic;
mod refresh;

pub use backlog::{Backlog, EpicGroup, EpicProgress, build_backlog};
pub use coordinator::{InFlightMove, MoveCoordinator, MoveDispatch, MoveEvent, MoveRejection};
pub use drag::{DragAdapter, DragError, DragOutcome, DropTarget};
pub use materializer::materialize;
pub use optimistic::{OptimisticUpdate, Snapshot, with_optimistic_update};
pub use refresh::{BoardService, BoardServiceError, BoardServiceResult};
