//! Backlog hierarchy: stories grouped by epic with progress rollups.
//!
//! The backlog ignores sprint assignment; it is independent of the board.

use crate::board::domain::{Epic, EpicId, Status, Story};
use serde::Serialize;
use std::collections::HashMap;

/// Completion rollup for one epic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EpicProgress {
    percent: u8,
    done_stories: usize,
    total_stories: usize,
    done_points: u32,
    total_points: u32,
}

impl EpicProgress {
    fn from_stories(stories: &[Story]) -> Self {
        let mut progress = Self::default();
        for story in stories {
            progress.total_stories = progress.total_stories.saturating_add(1);
            progress.total_points = progress.total_points.saturating_add(story.points());
            if story.status() == Status::Done {
                progress.done_stories = progress.done_stories.saturating_add(1);
                progress.done_points = progress.done_points.saturating_add(story.points());
            }
        }
        progress.percent = rounded_percent(progress.done_stories, progress.total_stories);
        progress
    }

    /// Returns the share of done stories, rounded to a whole percent.
    ///
    /// An epic without stories reports zero.
    #[must_use]
    pub const fn percent(&self) -> u8 {
        self.percent
    }

    /// Returns the number of done stories.
    #[must_use]
    pub const fn done_stories(&self) -> usize {
        self.done_stories
    }

    /// Returns the number of stories in the epic.
    #[must_use]
    pub const fn total_stories(&self) -> usize {
        self.total_stories
    }

    /// Returns the story points of done stories.
    #[must_use]
    pub const fn done_points(&self) -> u32 {
        self.done_points
    }

    /// Returns the story points of all stories.
    #[must_use]
    pub const fn total_points(&self) -> u32 {
        self.total_points
    }
}

/// Rounds `100 * done / total` half up without floating point.
fn rounded_percent(done: usize, total: usize) -> u8 {
    let doubled_total = total.saturating_mul(2);
    let percent = done
        .saturating_mul(200)
        .saturating_add(total)
        .checked_div(doubled_total)
        .unwrap_or(0);
    u8::try_from(percent).unwrap_or(100)
}

/// An epic with its stories and progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EpicGroup {
    epic: Epic,
    stories: Vec<Story>,
    progress: EpicProgress,
}

impl EpicGroup {
    /// Returns the epic.
    #[must_use]
    pub const fn epic(&self) -> &Epic {
        &self.epic
    }

    /// Returns the epic's stories in input order.
    #[must_use]
    pub fn stories(&self) -> &[Story] {
        &self.stories
    }

    /// Returns the progress rollup.
    #[must_use]
    pub const fn progress(&self) -> EpicProgress {
        self.progress
    }
}

/// Backlog grouped by epic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Backlog {
    unassigned: Vec<Story>,
    by_epic: HashMap<EpicId, EpicGroup>,
    epic_order: Vec<EpicId>,
}

impl Backlog {
    /// Returns stories that belong to no known epic.
    #[must_use]
    pub fn unassigned(&self) -> &[Story] {
        &self.unassigned
    }

    /// Returns the group for an epic.
    #[must_use]
    pub fn epic(&self, id: EpicId) -> Option<&EpicGroup> {
        self.by_epic.get(&id)
    }

    /// Returns the groups keyed by epic.
    #[must_use]
    pub const fn by_epic(&self) -> &HashMap<EpicId, EpicGroup> {
        &self.by_epic
    }

    /// Iterates over the groups in the order the epics were given.
    pub fn groups(&self) -> impl Iterator<Item = &EpicGroup> {
        self.epic_order.iter().filter_map(|id| self.by_epic.get(id))
    }
}

/// Groups stories under their epics.
///
/// Stories without an epic, or whose epic is not in `epics`, land in
/// [`Backlog::unassigned`]. Every epic gets a group, including empty ones.
#[must_use]
pub fn build_backlog(epics: &[Epic], stories: &[Story]) -> Backlog {
    let mut unassigned = Vec::new();
    let mut members: HashMap<EpicId, Vec<Story>> = epics
        .iter()
        .map(|epic| (epic.id(), Vec::new()))
        .collect();

    for story in stories {
        match story.epic_id().and_then(|id| members.get_mut(&id)) {
            Some(bucket) => bucket.push(story.clone()),
            None => unassigned.push(story.clone()),
        }
    }

    let mut by_epic = HashMap::with_capacity(epics.len());
    let mut epic_order = Vec::with_capacity(epics.len());
    for epic in epics {
        if by_epic.contains_key(&epic.id()) {
            continue;
        }
        let epic_stories = members.remove(&epic.id()).unwrap_or_default();
        let progress = EpicProgress::from_stories(&epic_stories);
        epic_order.push(epic.id());
        by_epic.insert(
            epic.id(),
            EpicGroup {
                epic: epic.clone(),
                stories: epic_stories,
                progress,
            },
        );
    }

    Backlog {
        unassigned,
        by_epic,
        epic_order,
    }
}
