//! Domain model for the agile board workflow engine.
//!
//! The domain covers the status transition table, the story/task/epic
//! hierarchy, sprint scoping, move intents, and the materialized board view.
//! Everything here is pure; persistence lives behind the ports.

mod board;
mod error;
mod ids;
mod intent;
mod item;
mod plan;
mod priority;
mod status;

pub use board::{Board, BoardStory, Column};
pub use error::{BoardDomainError, ParsePriorityError, ParseStatusError, ParseTaskTypeError};
pub use ids::{EpicId, SprintId, StoryId, TaskId, UserId};
pub use intent::{BoardItem, MoveIntent, Subject, SubjectKind};
pub use item::{Story, Task};
pub use plan::{Container, Epic, EpicStatus, Sprint, SprintState};
pub use priority::{Priority, TaskType};
pub use status::{Status, is_transition_allowed};
