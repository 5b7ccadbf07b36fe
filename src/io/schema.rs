//! Structural validation of a decoded task file.
//!
//! A task file is trusted only if it has exactly the shape of
//! [`TaskStore`](crate::model::TaskStore): an object keyed by digit strings,
//! nested three levels deep, with arrays of strings at the leaves. Key values
//! are not range-checked (month `"13"` is structurally fine) and leaf strings
//! may be empty.

use std::fmt;

use serde_json::Value;

/// Nesting level a violation was found at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Root,
    Year,
    Month,
    Day,
    Task,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Root => write!(f, "top level"),
            Level::Year => write!(f, "year"),
            Level::Month => write!(f, "month"),
            Level::Day => write!(f, "day"),
            Level::Task => write!(f, "task"),
        }
    }
}

/// First structural problem found in a candidate document
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaViolation {
    #[error("{level} key '{key}' at {location} is not a digit string")]
    BadKey {
        level: Level,
        key: String,
        location: String,
    },
    #[error("{level} value at {location} should be {expected}, found {found}")]
    WrongType {
        level: Level,
        location: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// True iff `candidate` has the task-file shape.
pub fn validate(candidate: &Value) -> bool {
    check(candidate).is_ok()
}

/// Walk `candidate` and report the first violation, if any.
pub fn check(candidate: &Value) -> Result<(), SchemaViolation> {
    let years = expect_object(candidate, Level::Root, "")?;
    for (year, months) in years {
        let at_year = child_location("", year);
        expect_digit_key(year, Level::Year, "")?;
        let months = expect_object(months, Level::Year, &at_year)?;
        for (month, days) in months {
            let at_month = child_location(&at_year, month);
            expect_digit_key(month, Level::Month, &at_year)?;
            let days = expect_object(days, Level::Month, &at_month)?;
            for (day, tasks) in days {
                let at_day = child_location(&at_month, day);
                expect_digit_key(day, Level::Day, &at_month)?;
                let Value::Array(tasks) = tasks else {
                    return Err(wrong_type(Level::Day, &at_day, "an array", tasks));
                };
                for (i, task) in tasks.iter().enumerate() {
                    if !task.is_string() {
                        let at_task = child_location(&at_day, &i.to_string());
                        return Err(wrong_type(Level::Task, &at_task, "a string", task));
                    }
                }
            }
        }
    }
    Ok(())
}

fn is_digit_key(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit())
}

fn expect_digit_key(key: &str, level: Level, parent: &str) -> Result<(), SchemaViolation> {
    if is_digit_key(key) {
        Ok(())
    } else {
        Err(SchemaViolation::BadKey {
            level,
            key: key.to_string(),
            location: display_location(parent),
        })
    }
}

fn expect_object<'a>(
    value: &'a Value,
    level: Level,
    location: &str,
) -> Result<&'a serde_json::Map<String, Value>, SchemaViolation> {
    value
        .as_object()
        .ok_or_else(|| wrong_type(level, location, "an object", value))
}

fn wrong_type(
    level: Level,
    location: &str,
    expected: &'static str,
    value: &Value,
) -> SchemaViolation {
    SchemaViolation::WrongType {
        level,
        location: display_location(location),
        expected,
        found: type_name(value),
    }
}

fn child_location(parent: &str, key: &str) -> String {
    format!("{}/{}", parent, key)
}

fn display_location(location: &str) -> String {
    if location.is_empty() {
        "/".to_string()
    } else {
        location.to_string()
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
