use std::collections::{BTreeMap, BTreeSet};

use crate::io::store_io::{PersistError, Recovery, StoreFile};
use crate::model::date::TaskDate;
use crate::model::store::TaskStore;
use crate::ops::{calendar, task_ops};
use crate::ops::task_ops::TaskError;

/// Error type for planner operations
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    #[error(transparent)]
    Task(#[from] TaskError),
    /// The change was applied in memory but could not be written out.
    #[error("task change not saved: {0}")]
    Persist(#[from] PersistError),
}

/// Owns the task store and the file it is persisted to.
///
/// Every successful mutation is followed by a full save before returning.
/// When that save fails the change stays in memory, [`Planner::is_dirty`]
/// reports it, and the next successful save writes it out.
#[derive(Debug)]
pub struct Planner {
    store: TaskStore,
    file: StoreFile,
    dirty: bool,
}

impl Planner {
    /// Load the store from `file`. The second value is set when the file
    /// was corrupt and has been set aside; the planner then starts empty.
    pub fn open(file: StoreFile) -> (Self, Option<Recovery>) {
        let loaded = file.load();
        let planner = Planner {
            store: loaded.store,
            file,
            dirty: false,
        };
        (planner, loaded.recovery)
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn file(&self) -> &StoreFile {
        &self.file
    }

    /// True when the in-memory store has changes the file does not.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn save(&mut self) -> Result<(), PersistError> {
        self.file.save(&self.store)?;
        self.dirty = false;
        Ok(())
    }

    /// Save only if something changed since the last successful save.
    pub fn flush(&mut self) -> Result<(), PersistError> {
        if self.dirty { self.save() } else { Ok(()) }
    }

    fn commit(&mut self) -> Result<(), PlannerError> {
        self.dirty = true;
        if let Err(e) = self.save() {
            log::error!("error saving {}: {}", self.file.path().display(), e);
            return Err(e.into());
        }
        Ok(())
    }

    pub fn add_task(&mut self, date: &TaskDate, text: &str) -> Result<usize, PlannerError> {
        let position = task_ops::add_task(&mut self.store, date, text)?;
        self.commit()?;
        log::info!("added task {} on {}", position, date);
        Ok(position)
    }

    pub fn list_tasks(&self, date: &TaskDate) -> &[String] {
        task_ops::list_tasks(&self.store, date)
    }

    pub fn delete_task(&mut self, date: &TaskDate, position: usize) -> Result<String, PlannerError> {
        let removed = task_ops::delete_task(&mut self.store, date, position)?;
        self.commit()?;
        log::info!("deleted task {} from {}", position, date);
        Ok(removed)
    }

    /// Clear a date. `Ok(None)` means there was nothing to clear, and
    /// nothing is written.
    pub fn clear_date(&mut self, date: &TaskDate) -> Result<Option<Vec<String>>, PlannerError> {
        let Some(removed) = task_ops::clear_date(&mut self.store, date) else {
            log::debug!("nothing to clear on {}", date);
            return Ok(None);
        };
        self.commit()?;
        log::info!("cleared {} task(s) from {}", removed.len(), date);
        Ok(Some(removed))
    }

    pub fn dates_with_tasks(&self, year: i32, month: u32) -> BTreeSet<u32> {
        calendar::dates_with_tasks(&self.store, year, month)
    }

    pub fn highlight_set(&self, year: i32) -> BTreeMap<u32, BTreeSet<u32>> {
        calendar::highlight_set(&self.store, year)
    }
}
