//! When steps for board move BDD scenarios.

use super::world::{BoardMoveWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use sprintboard::board::{
    domain::{Status, Subject},
    services::{DragAdapter, DropTarget, MoveDispatch},
};

/// Drags `subject` onto `target` and records what the coordinator did.
fn drag_and_drop(
    world: &mut BoardMoveWorld,
    subject: Subject,
    target: DropTarget,
) -> Result<(), eyre::Report> {
    let coordinator = world.coordinator()?;
    let mut adapter = DragAdapter::new();
    adapter
        .begin(&coordinator.board()?, subject)
        .wrap_err("start drag in scenario")?;

    match adapter.drop_and_apply(Some(target), coordinator) {
        Ok(Some(MoveDispatch::Dispatched(in_flight))) => {
            world.optimistic_board = Some(in_flight.board().clone());
            let event = run_async(in_flight.settled()).wrap_err("settle move in scenario")?;
            world.settled_event = Some(event);
        }
        Ok(Some(MoveDispatch::Ignored) | None) => {
            return Err(eyre::eyre!("drop did not produce a move"));
        }
        Err(rejection) => world.last_rejection = Some(rejection),
    }
    world.drain_events();
    Ok(())
}

#[when(r#"the "{title}" story is dropped on the "{status}" column"#)]
fn story_dropped_on_column(
    world: &mut BoardMoveWorld,
    title: String,
    status: String,
) -> Result<(), eyre::Report> {
    let story = world.story_id(&title)?;
    let target = Status::try_from(status.as_str())?;
    drag_and_drop(world, Subject::Story(story), DropTarget::Column(target))
}

#[when(r#"the "{title}" task is dropped on the "{story}" story"#)]
fn task_dropped_on_story(
    world: &mut BoardMoveWorld,
    title: String,
    story: String,
) -> Result<(), eyre::Report> {
    let task = world.task_id(&title)?;
    let target = world.story_id(&story)?;
    drag_and_drop(world, Subject::Task(task), DropTarget::Story(target))
}
