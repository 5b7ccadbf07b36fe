use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::model::date::{MAX_YEAR, MIN_YEAR, TaskDate};

#[derive(Parser)]
#[command(name = "yp", about = concat!("yp v", env!("CARGO_PKG_VERSION"), " - a year of tasks in one JSON file"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different task file
    #[arg(short = 'f', long = "file", global = true)]
    pub file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a task to a date
    Add(AddArgs),
    /// List the tasks on a date
    List(DateArg),
    /// Delete a task by its number on a date
    Delete(DeleteArgs),
    /// Delete every task on a date
    Clear(DateArg),
    /// Show which days of a month have tasks
    Dates(DatesArgs),
    /// Show which days of every month in a year have tasks
    Highlight(YearArg),
    /// Write all tasks to an HTML page
    Export(ExportArgs),
    /// Validate the task file without changing it
    Check,
}

// ---------------------------------------------------------------------------
// Args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct DateArg {
    /// Date as YYYY-MM-DD
    pub date: TaskDate,
}

#[derive(Args)]
pub struct AddArgs {
    /// Date as YYYY-MM-DD
    pub date: TaskDate,
    /// Task text
    pub text: String,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Date as YYYY-MM-DD
    pub date: TaskDate,
    /// Task number as shown by `yp list`
    pub number: usize,
}

#[derive(Args)]
pub struct DatesArgs {
    #[arg(value_parser = clap::value_parser!(i32).range(MIN_YEAR as i64..=MAX_YEAR as i64))]
    pub year: i32,
    #[arg(value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: u32,
}

#[derive(Args)]
pub struct YearArg {
    #[arg(value_parser = clap::value_parser!(i32).range(MIN_YEAR as i64..=MAX_YEAR as i64))]
    pub year: i32,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Where to write the page (default: a new file in the temp directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Open the page in the default browser after writing it
    #[arg(long)]
    pub open: bool,
}
