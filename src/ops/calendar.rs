use std::collections::{BTreeMap, BTreeSet};

use crate::model::date::TaskDate;
use crate::model::store::{MonthEntry, TaskStore};

/// Day numbers in `year`/`month` that have at least one task.
///
/// Only canonical keys (`"3"`, not `"03"`) are looked up, the same keys
/// `list_tasks` and `delete_task` address, so every day reported here can
/// be listed and deleted.
pub fn dates_with_tasks(store: &TaskStore, year: i32, month: u32) -> BTreeSet<u32> {
    store
        .year(year)
        .and_then(|months| months.get(&month.to_string()))
        .map(|entry| days_of(entry, year, month))
        .unwrap_or_default()
}

/// Month → days with tasks, for a whole year. Months 1 through 12 are
/// always present; month keys outside that range are not calendar months
/// and are left out.
pub fn highlight_set(store: &TaskStore, year: i32) -> BTreeMap<u32, BTreeSet<u32>> {
    (1..=12)
        .map(|month| (month, dates_with_tasks(store, year, month)))
        .collect()
}

fn days_of(entry: &MonthEntry, year: i32, month: u32) -> BTreeSet<u32> {
    entry
        .iter()
        .filter(|(_, tasks)| !tasks.is_empty())
        .filter_map(|(key, _)| canonical_day(key, year, month))
        .collect()
}

/// A day key exactly as `TaskDate` writes it, naming a real calendar date.
fn canonical_day(key: &str, year: i32, month: u32) -> Option<u32> {
    let day: u32 = key.parse().ok()?;
    let date = TaskDate::new(year, month, day).ok()?;
    (date.keys().2 == key).then_some(day)
}
