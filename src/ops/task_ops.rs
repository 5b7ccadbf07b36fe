use crate::model::date::TaskDate;
use crate::model::store::TaskStore;

/// Broad class of a failed operation, for callers that only need to know
/// whether the input was bad or the target was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Input,
    NotFound,
}

/// Error type for task operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error("task text is empty")]
    EmptyText,
    #[error("invalid task number {0}: task numbers start at 1")]
    InvalidPosition(usize),
    #[error("no tasks on {0}")]
    NoTasks(TaskDate),
    #[error("no task {position} on {date}: it has {count} task(s)")]
    PositionOutOfRange {
        date: TaskDate,
        position: usize,
        count: usize,
    },
}

impl TaskError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TaskError::EmptyText | TaskError::InvalidPosition(_) => ErrorKind::Input,
            TaskError::NoTasks(_) | TaskError::PositionOutOfRange { .. } => ErrorKind::NotFound,
        }
    }
}

/// Append a task to a date. The text is stored trimmed.
/// Returns the 1-based position of the new task.
pub fn add_task(store: &mut TaskStore, date: &TaskDate, text: &str) -> Result<usize, TaskError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(TaskError::EmptyText);
    }
    let tasks = store.day_entry(date);
    tasks.push(text.to_string());
    Ok(tasks.len())
}

/// Tasks for a date in stored order; empty if the date has none.
pub fn list_tasks<'a>(store: &'a TaskStore, date: &TaskDate) -> &'a [String] {
    store.day(date).map(Vec::as_slice).unwrap_or(&[])
}

/// Remove the task at 1-based `position`. Later tasks move up by one.
///
/// Positions are recomputed from the current order, so a number read before
/// an earlier deletion may now point at a different task.
pub fn delete_task(
    store: &mut TaskStore,
    date: &TaskDate,
    position: usize,
) -> Result<String, TaskError> {
    if position == 0 {
        return Err(TaskError::InvalidPosition(position));
    }
    let tasks = store
        .day_mut(date)
        .filter(|tasks| !tasks.is_empty())
        .ok_or(TaskError::NoTasks(*date))?;
    if position > tasks.len() {
        return Err(TaskError::PositionOutOfRange {
            date: *date,
            position,
            count: tasks.len(),
        });
    }
    let removed = tasks.remove(position - 1);
    if tasks.is_empty() {
        store.remove_day(date);
    }
    Ok(removed)
}

/// Remove every task on a date. Returns `None` if there was nothing to clear.
pub fn clear_date(store: &mut TaskStore, date: &TaskDate) -> Option<Vec<String>> {
    store.remove_day(date)
}
