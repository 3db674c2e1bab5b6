//! Optimistic move coordinator.
//!
//! The coordinator owns the board state shown to the user. A move is applied
//! to that state synchronously, the backend call runs on a spawned task, and
//! a failed call takes that move back out of the board. With no other move
//! in flight the board returns to the snapshot taken right before the failed
//! move; otherwise the other moves stay applied. Every settled or rejected
//! move is published as a [`MoveEvent`].

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error, info, warn};

use crate::board::{
    config::{BoardConfig, ConcurrentMovePolicy},
    domain::{
        Board, BoardDomainError, BoardItem, MoveIntent, Status, StoryId, Subject, TaskId, UserId,
    },
    ports::{BoardBackend, BoardBackendError, BoardBackendResult},
    services::optimistic::with_optimistic_update,
};

/// Notification produced when a move is rejected or settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveEvent {
    /// The backend accepted the move; `board` is the state after it.
    Committed {
        /// Item that moved.
        subject: Subject,
        /// Board state once the move settled.
        board: Board,
    },
    /// The backend refused or never answered; the board was restored.
    RolledBack {
        /// Item whose move failed.
        subject: Subject,
        /// Message for the error banner.
        message: String,
        /// Board state after the rollback.
        board: Board,
    },
    /// The move was refused before any backend call.
    Rejected {
        /// Item the move was requested for.
        subject: Subject,
        /// Message for the inline notice.
        reason: String,
    },
}

impl MoveEvent {
    /// Returns the item the event concerns.
    #[must_use]
    pub const fn subject(&self) -> Subject {
        match self {
            Self::Committed { subject, .. }
            | Self::RolledBack { subject, .. }
            | Self::Rejected { subject, .. } => *subject,
        }
    }
}

/// Reasons a move is refused before dispatch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MoveRejection {
    /// The transition table does not allow the requested status change.
    #[error(transparent)]
    InvalidTransition(#[from] BoardDomainError),

    /// The item already has a move in flight.
    #[error("{0} already has a move in flight")]
    MovePending(Subject),

    /// The shared board state could not be locked.
    #[error("board state is unavailable: {0}")]
    StateUnavailable(String),
}

/// Result of asking the coordinator to apply a move.
#[derive(Debug)]
pub enum MoveDispatch {
    /// The intent no longer matches the board, or would change nothing.
    Ignored,
    /// The move was applied locally and its backend call is in flight.
    Dispatched(InFlightMove),
}

/// A move that has been applied locally and is awaiting the backend.
#[derive(Debug)]
pub struct InFlightMove {
    subject: Subject,
    board: Board,
    handle: JoinHandle<MoveEvent>,
}

impl InFlightMove {
    /// Returns the moved item.
    #[must_use]
    pub const fn subject(&self) -> Subject {
        self.subject
    }

    /// Returns the optimistic board, captured before the backend answered.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Waits for the backend call and returns the resulting event.
    ///
    /// # Errors
    ///
    /// Returns [`JoinError`] if the commit task panicked or was aborted.
    pub async fn settled(self) -> Result<MoveEvent, JoinError> {
        self.handle.await
    }
}

/// Validated mutation ready to be applied and committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlannedMove {
    StoryStatus { story: StoryId, to: Status },
    TaskStatus { task: TaskId, to: Status },
    Reparent { task: TaskId, to_story: Option<StoryId> },
    Reassign { subject: Subject, assignee: Option<UserId> },
}

impl PlannedMove {
    fn apply(self, board: &mut Board) -> bool {
        match self {
            Self::StoryStatus { story, to } => board.move_story(story, to),
            Self::TaskStatus { task, to } => board.set_task_status(task, to),
            Self::Reparent { task, to_story } => board.reparent_task(task, to_story),
            Self::Reassign { subject, assignee } => board.reassign(subject, assignee),
        }
    }
}

/// Checks an intent against the located item.
///
/// Returns `Ok(None)` when the intent would not change anything or its
/// target has disappeared.
fn plan_move(
    intent: MoveIntent,
    item: BoardItem<'_>,
    board: &Board,
) -> Result<Option<PlannedMove>, BoardDomainError> {
    match intent {
        MoveIntent::StatusMove { subject, to_status } => {
            let from = item.status();
            if from == to_status {
                return Ok(None);
            }
            if !from.can_transition_to(to_status) {
                return Err(BoardDomainError::InvalidTransition {
                    subject,
                    from,
                    to: to_status,
                });
            }
            Ok(Some(match subject {
                Subject::Story(story) => PlannedMove::StoryStatus {
                    story,
                    to: to_status,
                },
                Subject::Task(task) => PlannedMove::TaskStatus {
                    task,
                    to: to_status,
                },
            }))
        }
        MoveIntent::Reparent { task, to_story } => {
            let BoardItem::Task(current) = item else {
                return Ok(None);
            };
            let target_missing = to_story.is_some_and(|id| board.story(id).is_none());
            if current.story_id() == to_story || target_missing {
                return Ok(None);
            }
            Ok(Some(PlannedMove::Reparent { task, to_story }))
        }
        MoveIntent::Reassign { subject, assignee } => {
            if item.assignee_id() == assignee {
                return Ok(None);
            }
            Ok(Some(PlannedMove::Reassign { subject, assignee }))
        }
    }
}

async fn commit<B>(backend: Arc<B>, plan: PlannedMove) -> BoardBackendResult<()>
where
    B: BoardBackend + ?Sized,
{
    match plan {
        PlannedMove::StoryStatus { story, to } => {
            backend.update_story_status(story, to).await?;
        }
        PlannedMove::TaskStatus { task, to } => {
            backend.update_task_status(task, to).await?;
        }
        PlannedMove::Reparent { task, to_story } => {
            backend.update_task_parent(task, to_story).await?;
        }
        PlannedMove::Reassign { subject, assignee } => {
            backend.update_assignee(subject, assignee).await?;
        }
    }
    Ok(())
}

fn publish(events: &mpsc::Sender<MoveEvent>, event: MoveEvent) {
    if let Err(err) = events.try_send(event) {
        match err {
            mpsc::error::TrySendError::Full(dropped) => warn!(
                subject = %dropped.subject(),
                "move event channel full, dropping event"
            ),
            mpsc::error::TrySendError::Closed(_) => {
                debug!("move event receiver dropped");
            }
        }
    }
}

/// A move applied to the board whose effect is not yet part of `base`.
#[derive(Debug, Clone, Copy)]
struct LiveMove {
    seq: u64,
    plan: PlannedMove,
    committed: bool,
}

/// Shared coordinator state.
///
/// `board` always equals `base` with every `live` plan applied in dispatch
/// order. Committed plans fold into `base` once no earlier move is still
/// live, so a rollback can rebuild the board without the failed move while
/// keeping every other move.
#[derive(Debug)]
struct CoordinatorState {
    board: Board,
    base: Board,
    live: VecDeque<LiveMove>,
    next_seq: u64,
    pending: HashMap<Subject, usize>,
}

impl CoordinatorState {
    fn new(board: Board) -> Self {
        Self {
            base: board.clone(),
            board,
            live: VecDeque::new(),
            next_seq: 0,
            pending: HashMap::new(),
        }
    }

    fn begin(&mut self, subject: Subject, plan: PlannedMove) -> u64 {
        let count = self.pending.entry(subject).or_insert(0);
        *count = count.saturating_add(1);
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.live.push_back(LiveMove {
            seq,
            plan,
            committed: false,
        });
        seq
    }

    fn finish(&mut self, subject: Subject) {
        if let Some(count) = self.pending.get_mut(&subject) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.pending.remove(&subject);
            }
        }
    }

    fn confirm(&mut self, seq: u64) {
        if let Some(entry) = self.live.iter_mut().find(|entry| entry.seq == seq) {
            entry.committed = true;
        }
        self.fold_committed();
    }

    /// Drops a failed move and rebuilds the board from `base` and the moves
    /// still live.
    fn roll_back(&mut self, seq: u64) {
        self.live.retain(|entry| entry.seq != seq);
        self.rebuild();
        self.fold_committed();
    }

    /// Installs a fresh board and replays the moves not yet confirmed.
    fn replace(&mut self, board: Board) {
        self.base = board;
        self.live.retain(|entry| !entry.committed);
        self.rebuild();
    }

    fn rebuild(&mut self) {
        let mut board = self.base.clone();
        for entry in &self.live {
            entry.plan.apply(&mut board);
        }
        self.board = board;
    }

    fn fold_committed(&mut self) {
        while let Some(entry) = self.live.front().copied() {
            if !entry.committed {
                break;
            }
            entry.plan.apply(&mut self.base);
            self.live.pop_front();
        }
    }
}

fn lock_state(
    state: &Mutex<CoordinatorState>,
) -> Result<MutexGuard<'_, CoordinatorState>, MoveRejection> {
    state
        .lock()
        .map_err(|err| MoveRejection::StateUnavailable(err.to_string()))
}

/// Applies move intents optimistically against a backend.
pub struct MoveCoordinator<B>
where
    B: BoardBackend + 'static,
{
    backend: Arc<B>,
    state: Arc<Mutex<CoordinatorState>>,
    events: mpsc::Sender<MoveEvent>,
    config: Arc<BoardConfig>,
}

impl<B> MoveCoordinator<B>
where
    B: BoardBackend + 'static,
{
    /// Creates a coordinator owning `board` and returns the receiving end of
    /// its event channel.
    #[must_use]
    pub fn new(
        backend: Arc<B>,
        board: Board,
        config: BoardConfig,
    ) -> (Self, mpsc::Receiver<MoveEvent>) {
        let (events, receiver) = mpsc::channel(config.event_buffer.max(1));
        let coordinator = Self {
            backend,
            state: Arc::new(Mutex::new(CoordinatorState::new(board))),
            events,
            config: Arc::new(config),
        };
        (coordinator, receiver)
    }

    /// Returns a copy of the current board.
    ///
    /// # Errors
    ///
    /// Returns [`MoveRejection::StateUnavailable`] when the state lock is
    /// poisoned.
    pub fn board(&self) -> Result<Board, MoveRejection> {
        Ok(lock_state(&self.state)?.board.clone())
    }

    /// Replaces the board with a freshly materialized one.
    ///
    /// Moves still in flight are applied again on top of the new board, and
    /// a later rollback removes only the failed move.
    ///
    /// # Errors
    ///
    /// Returns [`MoveRejection::StateUnavailable`] when the state lock is
    /// poisoned.
    pub fn replace_board(&self, board: Board) -> Result<(), MoveRejection> {
        lock_state(&self.state)?.replace(board);
        Ok(())
    }

    /// Returns how many backend calls are still in flight.
    ///
    /// # Errors
    ///
    /// Returns [`MoveRejection::StateUnavailable`] when the state lock is
    /// poisoned.
    pub fn pending_moves(&self) -> Result<usize, MoveRejection> {
        Ok(lock_state(&self.state)?.pending.values().sum())
    }

    /// Applies a move to the board and dispatches its backend call.
    ///
    /// Intents for items that are no longer on the board, or that would not
    /// change anything, return [`MoveDispatch::Ignored`] and publish nothing.
    /// Status moves outside the transition table are refused before any
    /// snapshot or backend call. Otherwise the board is mutated, the
    /// optimistic copy is returned, and the backend call runs on a Tokio
    /// task. On failure the board is rebuilt without this move, keeping
    /// every other move that is committed or still in flight.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`MoveRejection::InvalidTransition`] for illegal status moves,
    /// [`MoveRejection::MovePending`] when the policy forbids overlapping
    /// moves on one item, or [`MoveRejection::StateUnavailable`].
    pub fn apply_move(&self, intent: MoveIntent) -> Result<MoveDispatch, MoveRejection> {
        let subject = intent.subject();
        let mut state = lock_state(&self.state)?;

        let Some(item) = state.board.locate(subject) else {
            debug!(%subject, "ignoring move for item no longer on the board");
            return Ok(MoveDispatch::Ignored);
        };
        let plan = match plan_move(intent, item, &state.board) {
            Ok(Some(plan)) => plan,
            Ok(None) => {
                debug!(%subject, "ignoring move that changes nothing");
                return Ok(MoveDispatch::Ignored);
            }
            Err(err) => {
                debug!(%subject, error = %err, "rejecting move");
                publish(
                    &self.events,
                    MoveEvent::Rejected {
                        subject,
                        reason: err.to_string(),
                    },
                );
                return Err(err.into());
            }
        };

        if self.config.concurrent_moves == ConcurrentMovePolicy::RejectWhilePending
            && state.pending.contains_key(&subject)
        {
            let rejection = MoveRejection::MovePending(subject);
            debug!(%subject, "rejecting move while another is in flight");
            publish(
                &self.events,
                MoveEvent::Rejected {
                    subject,
                    reason: rejection.to_string(),
                },
            );
            return Err(rejection);
        }

        let backend = Arc::clone(&self.backend);
        let update = with_optimistic_update(
            &mut state.board,
            |board| {
                if !plan.apply(board) {
                    warn!(%subject, "planned move did not apply to the board");
                }
            },
            |_| commit(backend, plan),
        );
        let seq = state.begin(subject, plan);
        let optimistic = state.board.clone();
        drop(state);

        let shared = Arc::clone(&self.state);
        let events = self.events.clone();
        let config = Arc::clone(&self.config);
        let handle = tokio::spawn(async move {
            let outcome = update
                .settle(|_, _| match shared.lock() {
                    Ok(mut guard) => guard.roll_back(seq),
                    Err(err) => error!(%subject, error = %err, "cannot roll back move"),
                })
                .await;
            let event = settle_event(&shared, &config, subject, seq, outcome);
            publish(&events, event.clone());
            event
        });

        Ok(MoveDispatch::Dispatched(InFlightMove {
            subject,
            board: optimistic,
            handle,
        }))
    }
}

/// Clears the pending marker and builds the event for a settled move.
fn settle_event(
    shared: &Mutex<CoordinatorState>,
    config: &BoardConfig,
    subject: Subject,
    seq: u64,
    outcome: BoardBackendResult<()>,
) -> MoveEvent {
    let board = match shared.lock() {
        Ok(mut guard) => {
            guard.finish(subject);
            if outcome.is_ok() {
                guard.confirm(seq);
            }
            guard.board.clone()
        }
        Err(err) => err.into_inner().board.clone(),
    };
    match outcome {
        Ok(()) => {
            info!(%subject, "move committed");
            MoveEvent::Committed { subject, board }
        }
        Err(err) => {
            warn!(%subject, error = %err, "move failed, board rolled back");
            MoveEvent::RolledBack {
                subject,
                message: failure_message(&err, config),
                board,
            }
        }
    }
}

fn failure_message(err: &BoardBackendError, config: &BoardConfig) -> String {
    err.server_message()
        .map_or_else(|| config.generic_error_message.clone(), str::to_owned)
}
