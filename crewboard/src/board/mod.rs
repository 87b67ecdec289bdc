//! Board model: one ordered task list per lifecycle column.
//!
//! Pure data structure. Moves are expressed as remove-then-insert-at-index
//! operations so the UI and the command subsystem stay decoupled; the
//! status write-back to the store is the caller's job.

use crewboard_proto::task::{Task, TaskId, TaskStatus};

/// One board column: a lifecycle stage and its ordered tasks.
#[derive(Debug, Clone)]
pub struct Column {
    /// Which stage this column holds.
    pub status: TaskStatus,
    /// Tasks in display order.
    pub tasks: Vec<Task>,
}

/// A member's board: the four columns in stage order.
#[derive(Debug, Clone)]
pub struct Board {
    /// Columns in [`TaskStatus::ALL`] order.
    pub columns: Vec<Column>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Creates an empty board with all four columns.
    #[must_use]
    pub fn new() -> Self {
        Self {
            columns: TaskStatus::ALL
                .into_iter()
                .map(|status| Column {
                    status,
                    tasks: Vec::new(),
                })
                .collect(),
        }
    }

    /// Builds a board by grouping tasks into their status columns,
    /// preserving the given order within each column.
    #[must_use]
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut board = Self::new();
        for task in tasks {
            if let Some(column) = board.column_mut(task.status) {
                column.tasks.push(task);
            }
        }
        board
    }

    /// Returns the column for a stage.
    #[must_use]
    pub fn column(&self, status: TaskStatus) -> Option<&Column> {
        self.columns.iter().find(|c| c.status == status)
    }

    fn column_mut(&mut self, status: TaskStatus) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.status == status)
    }

    /// Total number of tasks on the board.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.iter().map(|c| c.tasks.len()).sum()
    }

    /// Whether the board holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Locates a task, returning its stage and index within the column.
    #[must_use]
    pub fn find_task(&self, id: TaskId) -> Option<(TaskStatus, usize)> {
        for column in &self.columns {
            if let Some(idx) = column.tasks.iter().position(|t| t.id == id) {
                return Some((column.status, idx));
            }
        }
        None
    }

    /// Returns the task at a column position.
    #[must_use]
    pub fn task(&self, status: TaskStatus, index: usize) -> Option<&Task> {
        self.column(status).and_then(|c| c.tasks.get(index))
    }

    /// Moves a task to a target column as remove-then-insert-at-index.
    ///
    /// `index` of `None` appends to the target column. The task's local
    /// status field is rewritten to the target stage. Returns `false` when
    /// the task is not on the board.
    pub fn move_task(&mut self, id: TaskId, target: TaskStatus, index: Option<usize>) -> bool {
        let Some((from, from_idx)) = self.find_task(id) else {
            return false;
        };
        let Some(mut task) = self
            .column_mut(from)
            .map(|c| c.tasks.remove(from_idx))
        else {
            return false;
        };
        task.status = target;

        let Some(column) = self.column_mut(target) else {
            return false;
        };
        let at = index.map_or(column.tasks.len(), |i| i.min(column.tasks.len()));
        column.tasks.insert(at, task);
        true
    }

    /// Reorders a task within its column (remove then insert at the new
    /// index). Returns `false` when either index is out of range.
    pub fn reorder(&mut self, status: TaskStatus, from: usize, to: usize) -> bool {
        let Some(column) = self.column_mut(status) else {
            return false;
        };
        if from >= column.tasks.len() || to >= column.tasks.len() {
            return false;
        }
        let task = column.tasks.remove(from);
        column.tasks.insert(to, task);
        true
    }

    /// Inserts or replaces a task.
    ///
    /// A task already on the board is updated in place; if its stage
    /// changed it is removed from the old column and appended to the new
    /// one. An unknown task is appended to its stage column.
    pub fn upsert(&mut self, task: Task) {
        match self.find_task(task.id) {
            Some((status, idx)) if status == task.status => {
                if let Some(column) = self.column_mut(status) {
                    column.tasks[idx] = task;
                }
            }
            Some((status, idx)) => {
                if let Some(column) = self.column_mut(status) {
                    column.tasks.remove(idx);
                }
                if let Some(column) = self.column_mut(task.status) {
                    column.tasks.push(task);
                }
            }
            None => {
                if let Some(column) = self.column_mut(task.status) {
                    column.tasks.push(task);
                }
            }
        }
    }

    /// Removes a task from the board, returning it.
    pub fn remove(&mut self, id: TaskId) -> Option<Task> {
        let (status, idx) = self.find_task(id)?;
        self.column_mut(status).map(|c| c.tasks.remove(idx))
    }
}
