//! Board view model: columns of story cards with nested tasks.
//!
//! A board is a projection of stories and tasks owned by the persistence
//! layer. Its mutators are crate-private so that only the move coordinator
//! writes to a board after it has been materialized.

use super::{BoardItem, Container, Status, Story, StoryId, Subject, Task, TaskId, UserId};
use serde::Serialize;

/// Story together with the tasks nested under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardStory {
    story: Story,
    tasks: Vec<Task>,
}

impl BoardStory {
    pub(crate) const fn new(story: Story, tasks: Vec<Task>) -> Self {
        Self { story, tasks }
    }

    /// Returns the story.
    #[must_use]
    pub const fn story(&self) -> &Story {
        &self.story
    }

    /// Returns the tasks nested under the story.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Returns how many nested tasks are done.
    #[must_use]
    pub fn completed_tasks(&self) -> usize {
        self.tasks
            .iter()
            .filter(|task| task.status() == Status::Done)
            .count()
    }
}

/// Board column holding the stories currently in one status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    status: Status,
    stories: Vec<BoardStory>,
}

impl Column {
    pub(crate) const fn new(status: Status, stories: Vec<BoardStory>) -> Self {
        Self { status, stories }
    }

    /// Returns the status this column collects.
    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    /// Returns the story cards in display order.
    #[must_use]
    pub fn stories(&self) -> &[BoardStory] {
        &self.stories
    }

    /// Returns whether the column has no cards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }

    /// Returns the number of cards.
    #[must_use]
    pub fn story_count(&self) -> usize {
        self.stories.len()
    }

    /// Returns the sum of story points in the column.
    #[must_use]
    pub fn total_points(&self) -> u32 {
        self.stories
            .iter()
            .map(|card| card.story.points())
            .fold(0, u32::saturating_add)
    }

    /// Returns whether the column holds the given story.
    #[must_use]
    pub fn contains_story(&self, id: StoryId) -> bool {
        self.stories.iter().any(|card| card.story.id() == id)
    }

    /// Inserts a card after every card of equal or higher priority.
    fn insert_by_priority(&mut self, card: BoardStory) {
        let rank = card.story.priority().rank();
        let position = self
            .stories
            .iter()
            .position(|existing| existing.story.priority().rank() > rank)
            .unwrap_or(self.stories.len());
        self.stories.insert(position, card);
    }
}

/// Materialized board for one container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    container: Container,
    columns: Vec<Column>,
    standalone_tasks: Vec<Task>,
    dropped: Vec<StoryId>,
}

impl Board {
    pub(crate) const fn new(
        container: Container,
        columns: Vec<Column>,
        standalone_tasks: Vec<Task>,
        dropped: Vec<StoryId>,
    ) -> Self {
        Self {
            container,
            columns,
            standalone_tasks,
            dropped,
        }
    }

    /// Creates a board with every column present and empty.
    #[must_use]
    pub fn empty(container: Container) -> Self {
        let columns = Status::BOARD_COLUMNS
            .into_iter()
            .map(|status| Column::new(status, Vec::new()))
            .collect();
        Self::new(container, columns, Vec::new(), Vec::new())
    }

    /// Returns the container the board was built for.
    #[must_use]
    pub const fn container(&self) -> Container {
        self.container
    }

    /// Returns the columns in layout order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the column for a status, if the status has one.
    #[must_use]
    pub fn column(&self, status: Status) -> Option<&Column> {
        self.columns.iter().find(|column| column.status == status)
    }

    /// Returns tasks on the board that have no parent story.
    #[must_use]
    pub fn standalone_tasks(&self) -> &[Task] {
        &self.standalone_tasks
    }

    /// Returns stories left off the board because their status has no column.
    #[must_use]
    pub fn dropped(&self) -> &[StoryId] {
        &self.dropped
    }

    /// Iterates over every story card in column order.
    pub fn stories(&self) -> impl Iterator<Item = &BoardStory> {
        self.columns.iter().flat_map(|column| column.stories.iter())
    }

    /// Iterates over every task, nested ones first.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.stories()
            .flat_map(|card| card.tasks.iter())
            .chain(self.standalone_tasks.iter())
    }

    /// Finds a story card by identifier.
    #[must_use]
    pub fn story(&self, id: StoryId) -> Option<&BoardStory> {
        self.stories().find(|card| card.story.id() == id)
    }

    /// Finds a task by identifier.
    #[must_use]
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks().find(|task| task.id() == id)
    }

    /// Finds the item a subject refers to.
    #[must_use]
    pub fn locate(&self, subject: Subject) -> Option<BoardItem<'_>> {
        match subject {
            Subject::Story(id) => self.story(id).map(|card| BoardItem::Story(&card.story)),
            Subject::Task(id) => self.task(id).map(BoardItem::Task),
        }
    }

    /// Moves a story card into the column for `status`.
    ///
    /// Returns `false` without changes when the story is absent or the status
    /// has no column.
    pub(crate) fn move_story(&mut self, id: StoryId, status: Status) -> bool {
        if !status.has_column() || self.story(id).is_none() {
            return false;
        }
        let Some(mut card) = self.take_story(id) else {
            return false;
        };
        card.story.set_status(status);
        match self.columns.iter_mut().find(|column| column.status == status) {
            Some(column) => {
                column.insert_by_priority(card);
                true
            }
            None => false,
        }
    }

    /// Changes a task's status in place.
    pub(crate) fn set_task_status(&mut self, id: TaskId, status: Status) -> bool {
        let Some(task) = self.task_mut(id) else {
            return false;
        };
        task.set_status(status);
        true
    }

    /// Moves a task under another story, or into the standalone list.
    ///
    /// Returns `false` without changes when the task or the target story is
    /// absent.
    pub(crate) fn reparent_task(&mut self, id: TaskId, to_story: Option<StoryId>) -> bool {
        if self.task(id).is_none() {
            return false;
        }
        if let Some(story_id) = to_story
            && self.story(story_id).is_none()
        {
            return false;
        }
        let Some(mut task) = self.take_task(id) else {
            return false;
        };
        task.set_story(to_story);
        match to_story {
            Some(story_id) => match self.story_mut(story_id) {
                Some(card) => {
                    card.tasks.push(task);
                    true
                }
                None => false,
            },
            None => {
                self.standalone_tasks.push(task);
                true
            }
        }
    }

    /// Changes the assignee of a story or task in place.
    pub(crate) fn reassign(&mut self, subject: Subject, assignee: Option<UserId>) -> bool {
        match subject {
            Subject::Story(id) => {
                let Some(card) = self.story_mut(id) else {
                    return false;
                };
                card.story.set_assignee(assignee);
            }
            Subject::Task(id) => {
                let Some(task) = self.task_mut(id) else {
                    return false;
                };
                task.set_assignee(assignee);
            }
        }
        true
    }

    fn story_mut(&mut self, id: StoryId) -> Option<&mut BoardStory> {
        self.columns
            .iter_mut()
            .flat_map(|column| column.stories.iter_mut())
            .find(|card| card.story.id() == id)
    }

    fn task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.columns
            .iter_mut()
            .flat_map(|column| column.stories.iter_mut())
            .flat_map(|card| card.tasks.iter_mut())
            .chain(self.standalone_tasks.iter_mut())
            .find(|task| task.id() == id)
    }

    fn take_story(&mut self, id: StoryId) -> Option<BoardStory> {
        self.columns.iter_mut().find_map(|column| {
            let position = column
                .stories
                .iter()
                .position(|card| card.story.id() == id)?;
            Some(column.stories.remove(position))
        })
    }

    fn take_task(&mut self, id: TaskId) -> Option<Task> {
        let nested = self
            .columns
            .iter_mut()
            .flat_map(|column| column.stories.iter_mut())
            .find_map(|card| {
                let position = card.tasks.iter().position(|task| task.id() == id)?;
                Some(card.tasks.remove(position))
            });
        nested.or_else(|| {
            let position = self
                .standalone_tasks
                .iter()
                .position(|task| task.id() == id)?;
            Some(self.standalone_tasks.remove(position))
        })
    }
}
