//! Then steps for board move BDD scenarios.

use super::world::BoardMoveWorld;
use rstest_bdd_macros::then;
use sprintboard::board::{
    domain::{Board, Status, StoryId},
    services::{MoveEvent, MoveRejection},
};

fn story_status(board: &Board, story: StoryId) -> Result<Status, eyre::Report> {
    board
        .story(story)
        .map(|card| card.story().status())
        .ok_or_else(|| eyre::eyre!("story {story} is not on the board"))
}

fn expect_status(board: &Board, story: StoryId, status: &str) -> Result<(), eyre::Report> {
    let expected = Status::try_from(status)?;
    let actual = story_status(board, story)?;
    if actual != expected {
        return Err(eyre::eyre!("expected {expected}, found {actual}"));
    }
    Ok(())
}

#[then("the move is rejected")]
fn move_is_rejected(world: &BoardMoveWorld) -> Result<(), eyre::Report> {
    let rejection = world
        .last_rejection
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing move rejection"))?;
    if !matches!(rejection, MoveRejection::InvalidTransition(_)) {
        return Err(eyre::eyre!(
            "expected an invalid transition, got {rejection:?}"
        ));
    }
    if !world
        .notifications
        .iter()
        .any(|event| matches!(event, MoveEvent::Rejected { .. }))
    {
        return Err(eyre::eyre!("no rejection notice was published"));
    }
    Ok(())
}

#[then(r#"the "{title}" story is in "{status}""#)]
fn story_is_in(world: &BoardMoveWorld, title: String, status: String) -> Result<(), eyre::Report> {
    let story = world.story_id(&title)?;
    expect_status(&world.current_board()?, story, &status)
}

#[then(r#"the "{title}" story is shown in "{status}" before the save completes"#)]
fn story_is_shown_optimistically(
    world: &BoardMoveWorld,
    title: String,
    status: String,
) -> Result<(), eyre::Report> {
    let story = world.story_id(&title)?;
    let board = world
        .optimistic_board
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing optimistic board"))?;
    expect_status(board, story, &status)
}

#[then(r#"the "{title}" story is saved as "{status}""#)]
fn story_is_saved_as(
    world: &BoardMoveWorld,
    title: String,
    status: String,
) -> Result<(), eyre::Report> {
    let story = world.story_id(&title)?;
    let stored = world
        .backend
        .stored_story(story)?
        .ok_or_else(|| eyre::eyre!("story missing from backend"))?;
    let expected = Status::try_from(status.as_str())?;
    if stored.status() != expected {
        return Err(eyre::eyre!(
            "expected stored status {expected}, found {}",
            stored.status()
        ));
    }
    Ok(())
}

#[then("no save request was sent")]
fn no_save_request(world: &BoardMoveWorld) -> Result<(), eyre::Report> {
    let calls = world.backend.write_calls()?;
    if calls != 0 {
        return Err(eyre::eyre!("expected no save requests, found {calls}"));
    }
    Ok(())
}

#[then("the save succeeds")]
fn save_succeeds(world: &BoardMoveWorld) -> Result<(), eyre::Report> {
    match world.settled_event.as_ref() {
        Some(MoveEvent::Committed { .. }) => Ok(()),
        other => Err(eyre::eyre!("expected a committed move, got {other:?}")),
    }
}

#[then(r#"the save fails with the message "{message}""#)]
fn save_fails_with(world: &BoardMoveWorld, message: String) -> Result<(), eyre::Report> {
    let banner = world.notifications.iter().find_map(|event| match event {
        MoveEvent::RolledBack { message: shown, .. } => Some(shown),
        _ => None,
    });
    if banner != Some(&message) {
        return Err(eyre::eyre!(
            "expected an error banner with {message:?}, got {banner:?}"
        ));
    }
    match world.settled_event.as_ref() {
        Some(MoveEvent::RolledBack { .. }) => Ok(()),
        other => Err(eyre::eyre!("expected a rolled back move, got {other:?}")),
    }
}

#[then(r#"the "{title}" task is listed under the "{story}" story"#)]
fn task_is_listed_under(
    world: &BoardMoveWorld,
    title: String,
    story: String,
) -> Result<(), eyre::Report> {
    let task = world.task_id(&title)?;
    let parent = world.story_id(&story)?;
    let board = world.current_board()?;
    let card = board
        .story(parent)
        .ok_or_else(|| eyre::eyre!("story {story:?} is not on the board"))?;
    if !card.tasks().iter().any(|candidate| candidate.id() == task) {
        return Err(eyre::eyre!("task {title:?} is not under {story:?}"));
    }
    Ok(())
}

#[then(r#"the "{title}" story has no tasks"#)]
fn story_has_no_tasks(world: &BoardMoveWorld, title: String) -> Result<(), eyre::Report> {
    let story = world.story_id(&title)?;
    let board = world.current_board()?;
    let card = board
        .story(story)
        .ok_or_else(|| eyre::eyre!("story {title:?} is not on the board"))?;
    if !card.tasks().is_empty() {
        return Err(eyre::eyre!("expected {title:?} to have no tasks"));
    }
    Ok(())
}
