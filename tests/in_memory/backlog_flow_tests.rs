//! Backlog hierarchy built from backend data.

use eyre::{OptionExt, ensure};
use sprintboard::board::{
    domain::{Container, Story},
    ports::BoardBackend,
    services::{BoardService, build_backlog},
};

use super::helpers::seed_sprint;

#[tokio::test(flavor = "multi_thread")]
async fn epic_progress_tracks_sprint_and_backlog_stories() -> eyre::Result<()> {
    let seeded = seed_sprint()?;
    let parked = Story::new("Gift cards")?.with_epic(seeded.epic.id()).with_points(8);
    let loose = Story::new("Fix typo in footer")?;
    seeded.backend.seed_story(parked.clone())?;
    seeded.backend.seed_story(loose.clone())?;

    let mut stories = seeded
        .backend
        .fetch_stories_for_container(Container::Sprint(seeded.sprint.id()))
        .await?;
    stories.extend(
        seeded
            .backend
            .fetch_stories_for_container(Container::Backlog)
            .await?,
    );
    let backlog = build_backlog(&[seeded.epic.clone()], &stories);

    ensure!(backlog.unassigned() == [loose].as_slice());
    let progress = backlog
        .epic(seeded.epic.id())
        .ok_or_eyre("epic group missing")?
        .progress();
    ensure!(progress.total_stories() == 5);
    ensure!(progress.done_stories() == 1);
    ensure!(progress.percent() == 20);
    ensure!(progress.total_points() == 19);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn backlog_board_holds_only_unplanned_stories() -> eyre::Result<()> {
    let seeded = seed_sprint()?;
    let parked = Story::new("Gift cards")?.with_epic(seeded.epic.id());
    seeded.backend.seed_story(parked.clone())?;

    let board = BoardService::new(seeded.backend.clone())
        .refresh(Container::Backlog)
        .await?;

    ensure!(board.stories().map(|card| card.story().id()).eq([parked.id()]));
    Ok(())
}
