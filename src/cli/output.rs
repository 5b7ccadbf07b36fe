use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::io::store_io::Recovery;
use crate::model::date::{TaskDate, month_name};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson<'a> {
    pub number: usize,
    pub text: &'a str,
}

#[derive(Serialize)]
pub struct TaskListJson<'a> {
    pub date: String,
    pub tasks: Vec<TaskJson<'a>>,
}

#[derive(Serialize)]
pub struct DatesJson {
    pub year: i32,
    pub month: u32,
    pub days: Vec<u32>,
}

#[derive(Serialize)]
pub struct HighlightJson {
    pub year: i32,
    pub months: BTreeMap<u32, Vec<u32>>,
}

#[derive(Serialize)]
pub struct CheckJson {
    pub path: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tasks: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn task_list_to_json<'a>(date: &TaskDate, tasks: &'a [String]) -> TaskListJson<'a> {
    TaskListJson {
        date: date.to_string(),
        tasks: tasks
            .iter()
            .enumerate()
            .map(|(i, text)| TaskJson {
                number: i + 1,
                text,
            })
            .collect(),
    }
}

pub fn highlight_to_json(year: i32, months: &BTreeMap<u32, BTreeSet<u32>>) -> HighlightJson {
    HighlightJson {
        year,
        months: months
            .iter()
            .map(|(m, days)| (*m, days.iter().copied().collect()))
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// Format a task as `[ N ] text`, the numbering `yp delete` expects
pub fn format_task_line(number: usize, text: &str) -> String {
    format!("[ {} ] {}", number, text)
}

pub fn format_task_list(tasks: &[String]) -> Vec<String> {
    if tasks.is_empty() {
        return vec!["No tasks for this date.".to_string()];
    }
    tasks
        .iter()
        .enumerate()
        .map(|(i, t)| format_task_line(i + 1, t))
        .collect()
}

pub fn format_days(days: &BTreeSet<u32>) -> String {
    days.iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn month_label(month: u32) -> String {
    month_name(month)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Month {}", month))
}

/// One `Month: days` line per month that has tasks
pub fn format_highlight(months: &BTreeMap<u32, BTreeSet<u32>>) -> Vec<String> {
    months
        .iter()
        .filter(|(_, days)| !days.is_empty())
        .map(|(m, days)| format!("{:<9}  {}", format!("{}:", month_label(*m)), format_days(days)))
        .collect()
}

/// Warning lines for a load that had to set the task file aside
pub fn format_recovery(recovery: &Recovery) -> Vec<String> {
    let outcome = match &recovery.backup_error {
        None => format!(
            "a backup has been created at {}; starting with no tasks",
            recovery.backup_path.display()
        ),
        Some(e) => format!(
            "could not create a backup at {}: {}; starting with no tasks",
            recovery.backup_path.display(),
            e
        ),
    };
    vec![
        format!("warning: {}", recovery.reason),
        format!("warning: {}", outcome),
    ]
}
