//! Column-grouped view of the board.

use super::{Column, Task};

/// Tasks of one column, sorted by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lane {
    column: Column,
    tasks: Vec<Task>,
}

impl Lane {
    /// Returns the lane's column.
    #[must_use]
    pub const fn column(&self) -> Column {
        self.column
    }

    /// Returns the lane heading.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        self.column.title()
    }

    /// Returns the tasks in position order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Returns the number of tasks in the lane.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns whether the lane holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Every column of the board in board order, including empty ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    lanes: Vec<Lane>,
}

impl Board {
    /// Groups tasks into lanes.
    #[must_use]
    pub fn from_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let mut lanes: Vec<Lane> = Column::ALL
            .iter()
            .map(|column| Lane {
                column: *column,
                tasks: Vec::new(),
            })
            .collect();

        for task in tasks {
            if let Some(lane) = lanes.iter_mut().find(|lane| lane.column == task.column()) {
                lane.tasks.push(task);
            }
        }
        for lane in &mut lanes {
            lane.tasks.sort_by_key(|task| (task.position(), task.created_at()));
        }
        Self { lanes }
    }

    /// Returns the lanes in board order.
    #[must_use]
    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    /// Returns the lane for `column`.
    #[must_use]
    pub fn lane(&self, column: Column) -> Option<&Lane> {
        self.lanes.iter().find(|lane| lane.column == column)
    }
}
