use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::date::TaskDate;

/// Day key → tasks for that day, in insertion order
pub type MonthEntry = IndexMap<String, Vec<String>>;
/// Month key → days
pub type YearEntry = IndexMap<String, MonthEntry>;

/// The hierarchical year → month → day → tasks mapping.
///
/// Serializes transparently as the on-disk JSON object. Key order is the
/// order keys were first created (or read from disk), so saving the same
/// store twice produces identical bytes.
///
/// Mutating methods keep one invariant: no key ever points at an empty
/// container. Removing the last task of a day drops the day, then the month
/// and the year if they become empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskStore {
    years: IndexMap<String, YearEntry>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Total number of tasks across every date
    pub fn task_count(&self) -> usize {
        self.days().map(|(_, _, _, tasks)| tasks.len()).sum()
    }

    /// Tasks for a date, if the date has an entry
    pub fn day(&self, date: &TaskDate) -> Option<&Vec<String>> {
        let (y, m, d) = date.keys();
        self.years.get(&y)?.get(&m)?.get(&d)
    }

    pub(crate) fn day_mut(&mut self, date: &TaskDate) -> Option<&mut Vec<String>> {
        let (y, m, d) = date.keys();
        self.years.get_mut(&y)?.get_mut(&m)?.get_mut(&d)
    }

    /// Tasks for a date, creating any missing year/month/day levels.
    ///
    /// Callers must push at least one task before returning control, or the
    /// empty day breaks the no-empty-container invariant.
    pub(crate) fn day_entry(&mut self, date: &TaskDate) -> &mut Vec<String> {
        let (y, m, d) = date.keys();
        self.years
            .entry(y)
            .or_default()
            .entry(m)
            .or_default()
            .entry(d)
            .or_default()
    }

    /// Remove a whole day and prune the month and year if they become empty.
    pub(crate) fn remove_day(&mut self, date: &TaskDate) -> Option<Vec<String>> {
        let (y, m, d) = date.keys();
        let year = self.years.get_mut(&y)?;
        let month = year.get_mut(&m)?;
        let removed = month.shift_remove(&d)?;
        if month.is_empty() {
            year.shift_remove(&m);
        }
        if year.is_empty() {
            self.years.shift_remove(&y);
        }
        Some(removed)
    }

    /// The month entries stored under a year key
    pub fn year(&self, year: i32) -> Option<&YearEntry> {
        self.years.get(&year.to_string())
    }

    /// Iterate over years in stored order
    pub fn years(&self) -> impl Iterator<Item = (&str, &YearEntry)> {
        self.years.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate over every (year, month, day, tasks) entry in stored order
    pub fn days(&self) -> impl Iterator<Item = (&str, &str, &str, &[String])> {
        self.years.iter().flat_map(|(y, months)| {
            months.iter().flat_map(move |(m, days)| {
                days.iter()
                    .map(move |(d, tasks)| (y.as_str(), m.as_str(), d.as_str(), tasks.as_slice()))
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> TaskDate {
        TaskDate::new(y, m, d).unwrap()
    }

    #[test]
    fn day_entry_creates_levels() {
        let mut store = TaskStore::new();
        store.day_entry(&date(2025, 3, 14)).push("write spec".into());
        assert_eq!(
            store.day(&date(2025, 3, 14)),
            Some(&vec!["write spec".to_string()])
        );
        assert!(store.year(2025).unwrap().contains_key("3"));
    }

    #[test]
    fn remove_day_prunes_empty_parents() {
        let mut store = TaskStore::new();
        store.day_entry(&date(2025, 3, 14)).push("a".into());
        store.day_entry(&date(2025, 3, 15)).push("b".into());

        store.remove_day(&date(2025, 3, 14));
        assert!(store.year(2025).is_some());

        store.remove_day(&date(2025, 3, 15));
        assert!(store.year(2025).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn remove_day_keeps_sibling_months() {
        let mut store = TaskStore::new();
        store.day_entry(&date(2025, 3, 14)).push("a".into());
        store.day_entry(&date(2025, 4, 1)).push("b".into());

        store.remove_day(&date(2025, 3, 14));
        let year = store.year(2025).unwrap();
        assert!(!year.contains_key("3"));
        assert!(year.contains_key("4"));
    }

    #[test]
    fn remove_missing_day_is_none() {
        let mut store = TaskStore::new();
        assert_eq!(store.remove_day(&date(2025, 1, 1)), None);
    }

    #[test]
    fn serializes_as_plain_nested_object() {
        let mut store = TaskStore::new();
        store.day_entry(&date(2025, 3, 14)).push("write spec".into());
        let json = serde_json::to_string(&store).unwrap();
        assert_eq!(json, r#"{"2025":{"3":{"14":["write spec"]}}}"#);
    }

    #[test]
    fn key_order_follows_insertion() {
        let mut store = TaskStore::new();
        store.day_entry(&date(2026, 1, 1)).push("later".into());
        store.day_entry(&date(2025, 12, 31)).push("earlier".into());
        let years: Vec<&str> = store.years().map(|(y, _)| y).collect();
        assert_eq!(years, vec!["2026", "2025"]);
    }

    #[test]
    fn task_count_spans_all_days() {
        let mut store = TaskStore::new();
        store.day_entry(&date(2025, 3, 14)).push("a".into());
        store.day_entry(&date(2025, 3, 14)).push("b".into());
        store.day_entry(&date(2024, 1, 2)).push("c".into());
        assert_eq!(store.task_count(), 3);
    }
}
