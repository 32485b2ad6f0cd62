//! Command-line to-do list: add, edit, complete, delete and export tasks.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, bail, Result};
use chrono::{NaiveDate, Utc};

use taskdeck::config::AppConfig;
use taskdeck::domain::task::{Priority, Task};
use taskdeck::services::{ExportFormat, ScheduleView, TaskSummary};
use taskdeck::store::{snapshot, TaskPatch};

fn main() {
    tracing_subscriber::fmt::init();

    if let Err(e) = run() {
        eprintln!("taskdeck: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        print_usage();
        return Ok(());
    }

    let config = AppConfig::load()?;
    let command = args.remove(0);

    match command.as_str() {
        "add" => cmd_add(&config, args),
        "list" => cmd_list(&config),
        "done" => cmd_done(&config, args),
        "edit" => cmd_edit(&config, args),
        "rm" => cmd_remove(&config, args),
        "export" => cmd_export(&config, args),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => bail!("unknown subcommand `{other}` (use add|list|done|edit|rm|export)"),
    }
}

fn cmd_add(config: &AppConfig, mut args: Vec<String>) -> Result<()> {
    let priority = parse_priority(take_flag(&mut args, "--priority")?)?;
    let due_date = parse_due(take_flag(&mut args, "--due")?)?;

    if args.is_empty() {
        bail!("add needs the task text");
    }
    let text = args.join(" ");

    let mut store = snapshot::load(&config.data_file)?;
    let task = store.add(&text, priority, due_date)?;
    snapshot::save(&store, &config.data_file)?;

    println!("added {}  {}", short_id(task.id), task.text);
    Ok(())
}

fn cmd_list(config: &AppConfig) -> Result<()> {
    let store = snapshot::load(&config.data_file)?;
    let today = Utc::now().date_naive();
    let view = ScheduleView::build(store.tasks(), today);

    print_section("Today's Tasks", &view.today, "No tasks for today", today);
    println!();
    print_section("Upcoming Tasks", &view.upcoming, "No upcoming tasks", today);

    let unscheduled: Vec<&Task> = store
        .tasks()
        .iter()
        .filter(|t| t.due_date.is_none())
        .collect();
    if !unscheduled.is_empty() {
        println!();
        println!("Unscheduled");
        for (index, task) in unscheduled.iter().enumerate() {
            println!("{}", render_line(index, task, today));
        }
    }
    Ok(())
}

fn cmd_done(config: &AppConfig, args: Vec<String>) -> Result<()> {
    let input = single_id_arg(&args, "done")?;

    let mut store = snapshot::load(&config.data_file)?;
    let id = store.resolve(input)?;
    let completed = store.toggle_complete(id)?;
    snapshot::save(&store, &config.data_file)?;

    let text = store.get(id).map(|t| t.text.clone()).unwrap_or_default();
    if completed {
        println!("completed {}  {text}", short_id(id));
    } else {
        println!("reopened {}  {text}", short_id(id));
    }
    Ok(())
}

fn cmd_edit(config: &AppConfig, mut args: Vec<String>) -> Result<()> {
    let text = take_flag(&mut args, "--text")?;
    let priority = parse_priority(take_flag(&mut args, "--priority")?)?;
    let due_date = parse_due(take_flag(&mut args, "--due")?)?;
    let input = single_id_arg(&args, "edit")?;

    let patch = TaskPatch {
        text,
        priority,
        due_date,
    };
    if patch.is_empty() {
        bail!("edit needs at least one of --text, --priority, --due");
    }

    let mut store = snapshot::load(&config.data_file)?;
    let id = store.resolve(input)?;
    let task = store.update(id, patch)?;
    snapshot::save(&store, &config.data_file)?;

    println!("updated {}  {}", short_id(task.id), task.text);
    Ok(())
}

fn cmd_remove(config: &AppConfig, args: Vec<String>) -> Result<()> {
    let input = single_id_arg(&args, "rm")?;

    let mut store = snapshot::load(&config.data_file)?;
    let id = store.resolve(input)?;
    let text = store.get(id).map(|t| t.text.clone()).unwrap_or_default();
    store.remove(id);
    snapshot::save(&store, &config.data_file)?;

    println!("removed {}  {text}", short_id(id));
    Ok(())
}

fn cmd_export(config: &AppConfig, mut args: Vec<String>) -> Result<()> {
    let format = match take_flag(&mut args, "--format")? {
        Some(value) => ExportFormat::from_str(&value).map_err(|e| anyhow!(e))?,
        None => ExportFormat::Pdf,
    };
    let out = match take_flag(&mut args, "--out")? {
        Some(value) => PathBuf::from(value),
        None => config.export_file.with_extension(format.extension()),
    };
    if !args.is_empty() {
        bail!("export takes no positional arguments");
    }

    let store = snapshot::load(&config.data_file)?;
    let summary = TaskSummary::build(store.tasks())?;
    summary.write_to_file(format, &out)?;

    println!(
        "exported {} completed and {} pending tasks to {}",
        summary.completed.len(),
        summary.pending.len(),
        out.display()
    );
    Ok(())
}

fn print_section(title: &str, tasks: &[Task], empty_message: &str, today: NaiveDate) {
    println!("{title}");
    if tasks.is_empty() {
        println!("  {empty_message}");
        return;
    }
    for (index, task) in tasks.iter().enumerate() {
        println!("{}", render_line(index, task, today));
    }
}

fn render_line(index: usize, task: &Task, today: NaiveDate) -> String {
    let mark = if task.completed { "x" } else { " " };
    let mut line = format!(
        "  {}  {}. [{}] {} | Priority: {}",
        short_id(task.id),
        index + 1,
        mark,
        task.text,
        task.priority
    );
    if let Some(due) = task.due_date {
        line.push_str(&format!(" | Due: {due}"));
    }
    if task.is_due_soon(today) {
        line.push_str("  !! due soon");
    }
    line
}

fn short_id(id: uuid::Uuid) -> String {
    id.to_string()[..8].to_string()
}

/// Pull `name <value>` out of the argument list, wherever it appears.
fn take_flag(args: &mut Vec<String>, name: &str) -> Result<Option<String>> {
    match args.iter().position(|a| a == name) {
        Some(pos) => {
            if pos + 1 >= args.len() {
                bail!("{name} needs a value");
            }
            let value = args.remove(pos + 1);
            args.remove(pos);
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

fn single_id_arg<'a>(args: &'a [String], command: &str) -> Result<&'a str> {
    match args {
        [id] => Ok(id.as_str()),
        [] => bail!("{command} needs a task id"),
        _ => bail!("{command} takes exactly one task id"),
    }
}

fn parse_priority(value: Option<String>) -> Result<Option<Priority>> {
    value
        .map(|v| Priority::from_str(&v).map_err(|e| anyhow!(e)))
        .transpose()
}

fn parse_due(value: Option<String>) -> Result<Option<NaiveDate>> {
    value
        .map(|v| {
            NaiveDate::parse_from_str(&v, "%Y-%m-%d")
                .map_err(|_| anyhow!("invalid due date `{v}` (expected YYYY-MM-DD)"))
        })
        .transpose()
}

fn print_usage() {
    println!("usage: taskdeck <command>");
    println!();
    println!("commands:");
    println!("  add <text> [--priority low|medium|high] [--due YYYY-MM-DD]");
    println!("  list");
    println!("  done <id>");
    println!("  edit <id> [--text <text>] [--priority <p>] [--due <date>]");
    println!("  rm <id>");
    println!("  export [--format pdf|markdown|csv|json] [--out <path>]");
}
