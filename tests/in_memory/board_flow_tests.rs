//! End-to-end board flows against the in-memory backend.

use eyre::{OptionExt, bail, ensure};
use rstest::rstest;
use sprintboard::board::{
    config::BoardConfig,
    domain::{Container, Status, Subject},
    ports::BoardBackendError,
    services::{BoardService, DragAdapter, DropTarget, MoveCoordinator, MoveDispatch, MoveEvent},
};

use super::helpers::seed_sprint;

#[tokio::test(flavor = "multi_thread")]
async fn drag_story_across_the_board_and_reconcile() -> eyre::Result<()> {
    let seeded = seed_sprint()?;
    let container = Container::for_active_sprint(&[seeded.sprint.clone()]);
    let service = BoardService::new(seeded.backend.clone());
    let board = service.refresh(container).await?;
    let (coordinator, mut events) =
        MoveCoordinator::new(seeded.backend.clone(), board, BoardConfig::default());
    let story = Subject::Story(seeded.todo.id());
    let mut adapter = DragAdapter::new();

    adapter.begin(&coordinator.board()?, story)?;
    let Some(MoveDispatch::Dispatched(in_flight)) =
        adapter.drop_and_apply(Some(DropTarget::Column(Status::InProgress)), &coordinator)?
    else {
        bail!("expected the drop to dispatch a move");
    };
    let optimistic = in_flight
        .board()
        .column(Status::InProgress)
        .ok_or_eyre("missing In Progress column")?;
    ensure!(optimistic.contains_story(seeded.todo.id()));

    let settled = in_flight.settled().await?;
    ensure!(matches!(settled, MoveEvent::Committed { .. }));
    ensure!(events.recv().await == Some(settled));

    let reconciled = service.reconcile(&coordinator).await?;
    let card = reconciled
        .story(seeded.todo.id())
        .ok_or_eyre("story missing after reconcile")?;
    ensure!(card.story().status() == Status::InProgress);
    ensure!(card.tasks() == [seeded.subtask.clone()].as_slice());
    ensure!(seeded.backend.write_calls()? == 1);
    Ok(())
}

#[rstest]
#[case(Status::Done)]
#[case(Status::Review)]
#[tokio::test(flavor = "multi_thread")]
async fn skipping_a_column_never_reaches_the_backend(#[case] target: Status) -> eyre::Result<()> {
    let seeded = seed_sprint()?;
    let service = BoardService::new(seeded.backend.clone());
    let board = service.refresh(Container::Sprint(seeded.sprint.id())).await?;
    let (coordinator, mut events) =
        MoveCoordinator::new(seeded.backend.clone(), board.clone(), BoardConfig::default());
    let mut adapter = DragAdapter::new();

    adapter.begin(&board, Subject::Story(seeded.todo.id()))?;
    let result = adapter.drop_and_apply(Some(DropTarget::Column(target)), &coordinator);

    ensure!(result.is_err(), "expected the move to be rejected");
    ensure!(coordinator.board()? == board);
    ensure!(matches!(events.recv().await, Some(MoveEvent::Rejected { .. })));
    ensure!(seeded.backend.write_calls()? == 0);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_save_restores_the_board_and_keeps_server_state() -> eyre::Result<()> {
    let seeded = seed_sprint()?;
    let service = BoardService::new(seeded.backend.clone());
    let board = service.refresh(Container::Sprint(seeded.sprint.id())).await?;
    let (coordinator, mut events) =
        MoveCoordinator::new(seeded.backend.clone(), board.clone(), BoardConfig::default());
    seeded
        .backend
        .fail_next(BoardBackendError::rejected("Review slots are full"))?;
    let mut adapter = DragAdapter::new();

    adapter.begin(&board, Subject::Story(seeded.in_progress.id()))?;
    let Some(MoveDispatch::Dispatched(in_flight)) =
        adapter.drop_and_apply(Some(DropTarget::Column(Status::Review)), &coordinator)?
    else {
        bail!("expected the drop to dispatch a move");
    };
    in_flight.settled().await?;

    match events.recv().await {
        Some(MoveEvent::RolledBack { message, board: restored, .. }) => {
            ensure!(message == "Review slots are full");
            ensure!(restored == board);
        }
        other => bail!("expected a rollback event, got {other:?}"),
    }
    ensure!(coordinator.board()? == board);
    let stored = seeded
        .backend
        .stored_story(seeded.in_progress.id())?
        .ok_or_eyre("story missing from backend")?;
    ensure!(stored.status() == Status::InProgress);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn task_dragged_to_another_story_is_persisted() -> eyre::Result<()> {
    let seeded = seed_sprint()?;
    let service = BoardService::new(seeded.backend.clone());
    let board = service.refresh(Container::Sprint(seeded.sprint.id())).await?;
    let (coordinator, _events) =
        MoveCoordinator::new(seeded.backend.clone(), board.clone(), BoardConfig::default());
    let mut adapter = DragAdapter::new();

    adapter.begin(&board, Subject::Task(seeded.subtask.id()))?;
    let Some(MoveDispatch::Dispatched(in_flight)) =
        adapter.drop_and_apply(Some(DropTarget::Story(seeded.review.id())), &coordinator)?
    else {
        bail!("expected the drop to dispatch a move");
    };
    in_flight.settled().await?;

    let refreshed = service.refresh(Container::Sprint(seeded.sprint.id())).await?;
    let source = refreshed.story(seeded.todo.id()).ok_or_eyre("source story missing")?;
    let target = refreshed.story(seeded.review.id()).ok_or_eyre("target story missing")?;
    ensure!(source.tasks().is_empty());
    ensure!(target.tasks().iter().any(|task| task.id() == seeded.subtask.id()));
    ensure!(coordinator.board()? == refreshed);
    Ok(())
}
