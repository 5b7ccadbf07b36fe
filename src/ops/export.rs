//! Read-only HTML rendering of the whole store, grouped by year, month and
//! day. The page works without JavaScript; the script only adds year and
//! month filtering.

use std::cmp::Ordering;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use maud::{DOCTYPE, Markup, PreEscaped, html};
use tempfile::NamedTempFile;

use crate::model::date::{TaskDate, month_name};
use crate::model::store::TaskStore;

const CSS: &str = "\
body { font-family: Arial, sans-serif; margin: 20px; background-color: #f9f9f9; }
h1 { color: #333; text-align: center; }
.nav-bar, .month-buttons { text-align: center; margin-bottom: 10px; }
button { background-color: #4caf50; border: none; color: white; padding: 8px 16px; margin: 4px; border-radius: 4px; cursor: pointer; }
button:hover { background-color: #45a049; }
#all-tasks { background-color: #008cba; }
.year-section { margin-bottom: 30px; }
.year-title { font-size: 1.5em; color: #333; margin-top: 20px; }
.date-section { margin-bottom: 20px; }
.date-title { font-size: 1.2em; color: #555; margin: 10px 0; }
li { margin-bottom: 5px; }
.empty { text-align: center; color: gray; }
";

const SCRIPT: &str = "\
function each(selector, f) { document.querySelectorAll(selector).forEach(f); }
function showAllTasks() {
  each('.year-section', function (e) { e.style.display = 'block'; });
  each('.date-section', function (e) { e.style.display = 'block'; });
}
function setYear(year) {
  each('.year-section', function (e) {
    e.style.display = e.classList.contains('year-' + year) ? 'block' : 'none';
  });
}
function toggleMonth(year, month) {
  var id = 'section-' + year + '-' + month;
  each('.month-section-' + year, function (e) {
    e.style.display = e.id === id ? 'block' : 'none';
  });
}
";

struct YearGroup<'a> {
    key: &'a str,
    months: Vec<MonthGroup<'a>>,
}

struct MonthGroup<'a> {
    key: &'a str,
    name: String,
    days: Vec<DayGroup<'a>>,
}

struct DayGroup<'a> {
    label: String,
    tasks: &'a [String],
}

/// Render the store as a standalone HTML page.
pub fn render_html(store: &TaskStore, title: &str) -> String {
    render_page(&group(store), title).into_string()
}

fn render_page(years: &[YearGroup<'_>], title: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                title { (title) }
                style { (PreEscaped(CSS)) }
                script { (PreEscaped(SCRIPT)) }
            }
            body {
                h1 { (title) }
                div.nav-bar {
                    button id="all-tasks" onclick="showAllTasks()" { "All Tasks" }
                    @for year in years {
                        button onclick={ "setYear('" (year.key) "')" } { (year.key) }
                    }
                }
                @if years.is_empty() {
                    p.empty { "No tasks yet." }
                }
                @for year in years {
                    (render_year(year))
                }
            }
        }
    }
}

fn render_year(year: &YearGroup<'_>) -> Markup {
    html! {
        div class={ "year-section year-" (year.key) } {
            div.year-title { (year.key) }
            div.month-buttons {
                @for month in &year.months {
                    button onclick={ "toggleMonth('" (year.key) "', '" (month.key) "')" } { (month.name) }
                }
            }
            @for month in &year.months {
                div class={ "date-section month-section-" (year.key) } id={ "section-" (year.key) "-" (month.key) } {
                    @for day in &month.days {
                        div.date-title { (day.label) }
                        ul {
                            @for task in day.tasks {
                                li { (task) }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn group(store: &TaskStore) -> Vec<YearGroup<'_>> {
    let mut years: Vec<YearGroup<'_>> = store
        .years()
        .map(|(y, months)| {
            let mut months: Vec<MonthGroup<'_>> = months
                .iter()
                .map(|(m, days)| {
                    let mut days: Vec<(&str, &[String])> = days
                        .iter()
                        .filter(|(_, tasks)| !tasks.is_empty())
                        .map(|(d, tasks)| (d.as_str(), tasks.as_slice()))
                        .collect();
                    days.sort_by(|a, b| numeric_order(a.0, b.0));
                    MonthGroup {
                        key: m.as_str(),
                        name: month_label(m),
                        days: days
                            .into_iter()
                            .map(|(d, tasks)| DayGroup {
                                label: date_label(y, m, d),
                                tasks,
                            })
                            .collect(),
                    }
                })
                .filter(|month| !month.days.is_empty())
                .collect();
            months.sort_by(|a, b| numeric_order(a.key, b.key));
            YearGroup { key: y, months }
        })
        .filter(|year| !year.months.is_empty())
        .collect();
    years.sort_by(|a, b| numeric_order(a.key, b.key));
    years
}

/// Order digit strings by value without parsing, so oversized keys still sort.
fn numeric_order(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    (a.len(), a).cmp(&(b.len(), b))
}

fn month_label(key: &str) -> String {
    key.parse()
        .ok()
        .and_then(month_name)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Month {}", key))
}

/// "March 14, 2025", or the raw keys when they do not form a calendar date.
fn date_label(year: &str, month: &str, day: &str) -> String {
    let parsed = match (year.parse(), month.parse(), day.parse()) {
        (Ok(y), Ok(m), Ok(d)) => TaskDate::new(y, m, d).ok(),
        _ => None,
    };
    match parsed {
        Some(date) => date.naive().format("%B %d, %Y").to_string(),
        None => format!("{}-{:0>2}-{:0>2}", year, month, day),
    }
}

/// Write the page to `dest`, or to a new `.html` file in the system temp
/// directory when no destination is given. Returns the path written.
pub fn write_html(store: &TaskStore, title: &str, dest: Option<&Path>) -> io::Result<PathBuf> {
    let content = render_html(store, title);
    match dest {
        Some(path) => {
            let dir = match path.parent() {
                Some(p) if !p.as_os_str().is_empty() => p,
                _ => Path::new("."),
            };
            let mut tmp = NamedTempFile::new_in(dir)?;
            tmp.write_all(content.as_bytes())?;
            tmp.flush()?;
            tmp.persist(path).map_err(|e| e.error)?;
            Ok(path.to_path_buf())
        }
        None => {
            let mut tmp = tempfile::Builder::new()
                .prefix("planner-tasks-")
                .suffix(".html")
                .tempfile()?;
            tmp.write_all(content.as_bytes())?;
            tmp.flush()?;
            let (_file, path) = tmp.keep().map_err(|e| e.error)?;
            log::info!("wrote task export to {}", path.display());
            Ok(path)
        }
    }
}
