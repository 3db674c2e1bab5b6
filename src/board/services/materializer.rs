//! Builds the board view from flat story and task lists.

use crate::board::domain::{Board, BoardStory, Column, Container, Status, Story, Task};

/// Materializes the board for `container`.
///
/// Stories outside the container are skipped. Each remaining story gets the
/// tasks whose parent is that story, in input order. Every board column is
/// present even when empty, and cards within a column are ordered by
/// priority rank with ties kept in input order. Stories whose status has no
/// column are listed in [`Board::dropped`] for the caller to report.
///
/// The function is pure: identical inputs give equal boards.
#[must_use]
pub fn materialize(stories: &[Story], tasks: &[Task], container: Container) -> Board {
    let mut grouped: Vec<(Status, Vec<BoardStory>)> = Status::BOARD_COLUMNS
        .into_iter()
        .map(|status| (status, Vec::new()))
        .collect();
    let mut dropped = Vec::new();

    for story in stories
        .iter()
        .filter(|story| container.contains(story.sprint_id()))
    {
        let Some((_, cards)) = grouped
            .iter_mut()
            .find(|(status, _)| *status == story.status())
        else {
            dropped.push(story.id());
            continue;
        };
        let nested = tasks
            .iter()
            .filter(|task| task.story_id() == Some(story.id()))
            .cloned()
            .collect();
        cards.push(BoardStory::new(story.clone(), nested));
    }

    let columns = grouped
        .into_iter()
        .map(|(status, mut cards)| {
            cards.sort_by_key(|card| card.story().priority().rank());
            Column::new(status, cards)
        })
        .collect();
    let standalone = tasks
        .iter()
        .filter(|task| task.story_id().is_none())
        .cloned()
        .collect();

    Board::new(container, columns, standalone, dropped)
}
