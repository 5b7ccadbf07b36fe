use std::path::PathBuf;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::store_io::{Inspection, PersistError, Recovery, StoreFile};
use crate::model::config::PlannerConfig;
use crate::ops::export;
use crate::planner::Planner;

/// Everything a handler needs besides its own args
struct Context<'a> {
    config: &'a PlannerConfig,
    file: Option<PathBuf>,
    json: bool,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli, config: &PlannerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context {
        config,
        file: cli.file,
        json: cli.json,
    };

    match cli.command {
        // Read commands
        Commands::List(args) => cmd_list(&ctx, args),
        Commands::Dates(args) => cmd_dates(&ctx, args),
        Commands::Highlight(args) => cmd_highlight(&ctx, args),
        Commands::Export(args) => cmd_export(&ctx, args),
        Commands::Check => cmd_check(&ctx),

        // Write commands
        Commands::Add(args) => cmd_add(&ctx, args),
        Commands::Delete(args) => cmd_delete(&ctx, args),
        Commands::Clear(args) => cmd_clear(&ctx, args),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn store_file(ctx: &Context<'_>) -> StoreFile {
    let path = ctx
        .file
        .clone()
        .unwrap_or_else(|| ctx.config.tasks_path());
    StoreFile::new(path)
}

/// Load the planner, warning on stderr if the task file had to be reset.
fn open_planner(ctx: &Context<'_>) -> Planner {
    let (planner, recovery) = Planner::open(store_file(ctx));
    if let Some(recovery) = recovery {
        report_recovery(&recovery);
    }
    planner
}

/// Final persist before the process exits. After a successful mutation this
/// is a no-op; it only writes when a change is still pending.
fn close_planner(mut planner: Planner) -> Result<(), PersistError> {
    planner.flush()?;
    log::debug!("closed {}", planner.file().path().display());
    Ok(())
}

fn report_recovery(recovery: &Recovery) {
    for line in format_recovery(recovery) {
        eprintln!("{}", line);
    }
}

// ---------------------------------------------------------------------------
// Read command handlers
// ---------------------------------------------------------------------------

fn cmd_list(ctx: &Context<'_>, args: DateArg) -> Result<(), Box<dyn std::error::Error>> {
    let planner = open_planner(ctx);
    let tasks = planner.list_tasks(&args.date);

    if ctx.json {
        let out = task_list_to_json(&args.date, tasks);
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for line in format_task_list(tasks) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_dates(ctx: &Context<'_>, args: DatesArgs) -> Result<(), Box<dyn std::error::Error>> {
    let planner = open_planner(ctx);
    let days = planner.dates_with_tasks(args.year, args.month);

    if ctx.json {
        let out = DatesJson {
            year: args.year,
            month: args.month,
            days: days.into_iter().collect(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if days.is_empty() {
        println!("no tasks in {:04}-{:02}", args.year, args.month);
    } else {
        println!("{}", format_days(&days));
    }
    Ok(())
}

fn cmd_highlight(ctx: &Context<'_>, args: YearArg) -> Result<(), Box<dyn std::error::Error>> {
    let planner = open_planner(ctx);
    let months = planner.highlight_set(args.year);

    if ctx.json {
        let out = highlight_to_json(args.year, &months);
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        let lines = format_highlight(&months);
        if lines.is_empty() {
            println!("no tasks in {:04}", args.year);
        }
        for line in lines {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_export(ctx: &Context<'_>, args: ExportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let planner = open_planner(ctx);
    let path = export::write_html(
        planner.store(),
        &ctx.config.export.title,
        args.output.as_deref(),
    )
    .map_err(|e| format!("could not write HTML export: {}", e))?;
    println!("{}", path.display());

    if args.open && open::that(&path).is_err() {
        eprintln!("warning: could not open a browser, open the file above manually");
    }
    Ok(())
}

fn cmd_check(ctx: &Context<'_>) -> Result<(), Box<dyn std::error::Error>> {
    let file = store_file(ctx);
    let path = file.path().display().to_string();

    let (status, tasks, error) = match file.inspect() {
        Inspection::Missing => ("missing", None, None),
        Inspection::Valid(store) => ("valid", Some(store.task_count()), None),
        Inspection::Corrupt(e) => ("corrupt", None, Some(e.to_string())),
    };

    if ctx.json {
        let out = CheckJson {
            path: path.clone(),
            status,
            tasks,
            error: error.clone(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        match (status, tasks) {
            ("missing", _) => println!("no task file at {}", path),
            (_, Some(n)) => println!("✓ {} is valid ({} tasks)", path, n),
            _ => println!("✗ {} is corrupt", path),
        }
    }

    match error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Write command handlers
// ---------------------------------------------------------------------------

fn cmd_add(ctx: &Context<'_>, args: AddArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut planner = open_planner(ctx);
    let position = planner.add_task(&args.date, &args.text)?;
    close_planner(planner)?;
    println!("added task {} on {}", position, args.date);
    Ok(())
}

fn cmd_delete(ctx: &Context<'_>, args: DeleteArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut planner = open_planner(ctx);
    let removed = planner.delete_task(&args.date, args.number)?;
    close_planner(planner)?;
    println!("deleted task {} on {}: {}", args.number, args.date, removed);
    Ok(())
}

fn cmd_clear(ctx: &Context<'_>, args: DateArg) -> Result<(), Box<dyn std::error::Error>> {
    let mut planner = open_planner(ctx);
    let cleared = planner.clear_date(&args.date)?;
    close_planner(planner)?;
    match cleared {
        Some(removed) => println!("cleared {} task(s) on {}", removed.len(), args.date),
        None => println!("no tasks to clear on {}", args.date),
    }
    Ok(())
}
