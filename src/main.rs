mod app;
mod config;
mod domain;
mod error;
mod feedback;
mod mailer;
mod persistence;
mod recycle;
mod tasks;
mod timer;

use anyhow::Result;
use app::AppState;
use chrono::Local;
use clap::{Parser, Subcommand};
use config::AppConfig;
use domain::{DueStatus, FeedbackDraft, TaskDraft, TaskEdits};
use error::Error;
use persistence::{ensure_data_dir, init_local_campus};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use timer::TimerState;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "campus")]
#[command(about = "A single-user task tracker and feedback box for enrollment onboarding", long_about = None)]
struct Cli {
    /// Data directory (defaults to a local .campus or ~/.campus)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .campus directory in the current directory
    Init,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init) => {
            let campus_dir = init_local_campus()?;
            println!("Initialized campus directory: {}", campus_dir.display());
            println!();
            println!("Campus will now use this local directory for task storage.");
            println!("Run 'campus' to start tracking tasks.");
            Ok(())
        }
        None => {
            let dir = match cli.data_dir {
                Some(dir) => dir,
                None => ensure_data_dir()?,
            };
            eprintln!("Using campus directory: {}", dir.display());

            let config = AppConfig::from_env();
            let mut app = AppState::open(&dir, config)?;
            run_console(&mut app)
        }
    }
}

/// Line-oriented console over the core. One command per line; each command
/// is one synchronous read-modify-write cycle against the data files.
fn run_console(app: &mut AppState) -> Result<()> {
    println!("campus - type 'help' for commands, 'quit' to exit");

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((c, r)) => (c, r.trim()),
            None => (line, ""),
        };

        let result = match command {
            "quit" | "exit" | "q" => break,
            "help" => {
                print_help();
                Ok(())
            }
            "add" => cmd_add(app, rest),
            "list" | "ls" => cmd_list(app),
            "edit" => cmd_edit(app, rest),
            "done" => with_id(rest, |id| {
                let done = app.tasks.toggle_done(id)?;
                println!("Task {} is now {}", id, if done { "done" } else { "open" });
                Ok(())
            }),
            "rm" | "delete" => with_id(rest, |id| {
                app.delete_task(id, Local::now().naive_local())?;
                println!("Task {} moved to the recycle bin", id);
                Ok(())
            }),
            "start" => cmd_start(app, rest),
            "pause" => {
                app.timer.pause()?;
                println!("Timer paused");
                Ok(())
            }
            "resume" => {
                app.timer.resume()?;
                println!("Timer resumed");
                Ok(())
            }
            "stop" => {
                let entry = app.stop_timer(Local::now().naive_local())?;
                println!(
                    "Time recorded: {:.2} min on '{}'",
                    entry.duration_minutes, entry.task_title
                );
                Ok(())
            }
            "timer" => {
                cmd_timer(app);
                Ok(())
            }
            "log" => cmd_log(app),
            "bin" => cmd_bin(app),
            "restore" => with_id(rest, |id| {
                let task = app.restore_task(id)?;
                println!("Restored '{}' as task {}", task.title, task.id);
                Ok(())
            }),
            "purge" => with_id(rest, |id| {
                app.bin.purge(id)?;
                println!("Entry {} permanently deleted", id);
                Ok(())
            }),
            "purge-all" => cmd_purge_all(app, rest),
            "feedback" => cmd_feedback(app, rest),
            "stats" => cmd_stats(app),
            other => {
                println!("Unknown command: {} (try 'help')", other);
                Ok(())
            }
        };

        if let Err(err) = result {
            // Domain rejections print as plain messages; real I/O errors bubble up
            match err.downcast::<Error>() {
                Ok(rejection) => println!("{}", rejection),
                Err(fatal) => return Err(fatal),
            }
        }
    }

    Ok(())
}

fn print_help() {
    println!("tasks:");
    println!("  add <title> [due=YYYY-MM-DD] [cat=...] [prio=...] [est=MIN] [link=URL]");
    println!("  list | edit <id> <field> <value> | done <id> | rm <id>");
    println!("timer:");
    println!("  start <id> | pause | resume | stop | timer | log");
    println!("recycle bin:");
    println!("  bin | restore <id> | purge <id> | purge-all [password]");
    println!("other:");
    println!("  feedback [kind=...] [urgency=...] [name=...] [email=...] <text>");
    println!("  stats | help | quit");
}

fn with_id(rest: &str, f: impl FnOnce(u64) -> Result<()>) -> Result<()> {
    match rest.split_whitespace().next().and_then(|s| s.parse().ok()) {
        Some(id) => f(id),
        None => {
            println!("Expected a numeric task id");
            Ok(())
        }
    }
}

/// Split `key=value` tokens off a command tail; everything else joins back
/// into the free-text remainder.
fn split_kv(rest: &str) -> (Vec<(String, String)>, String) {
    let mut pairs = Vec::new();
    let mut words = Vec::new();
    for token in rest.split_whitespace() {
        match token.split_once('=') {
            Some((k, v)) if !k.is_empty() => pairs.push((k.to_string(), v.to_string())),
            _ => words.push(token),
        }
    }
    (pairs, words.join(" "))
}

fn cmd_add(app: &AppState, rest: &str) -> Result<()> {
    let (pairs, title) = split_kv(rest);
    let mut draft = TaskDraft {
        title,
        ..TaskDraft::default()
    };

    for (key, value) in pairs {
        match key.as_str() {
            "cat" | "category" => draft.category = parse_or_print(&value)?,
            "prio" | "priority" => draft.priority = parse_or_print(&value)?,
            "due" | "deadline" => draft.deadline = Some(parse_or_print(&value)?),
            "est" | "estimate" => draft.estimated_time = parse_or_print(&value)?,
            "link" => draft.link = value,
            "notes" => draft.notes = value,
            other => println!("Ignoring unknown field: {}", other),
        }
    }

    let task = app.tasks.create(draft)?;
    println!("Created task {} '{}'", task.id, task.title);
    Ok(())
}

fn cmd_edit(app: &AppState, rest: &str) -> Result<()> {
    let mut parts = rest.splitn(3, char::is_whitespace);
    let (Some(id), Some(field), Some(value)) = (parts.next(), parts.next(), parts.next()) else {
        println!("Usage: edit <id> <title|category|priority|estimate|notes> <value>");
        return Ok(());
    };
    let Ok(id) = id.parse::<u64>() else {
        println!("Expected a numeric task id");
        return Ok(());
    };

    let mut edits = TaskEdits::default();
    match field {
        "title" => edits.title = Some(value.to_string()),
        "category" | "cat" => edits.category = Some(parse_or_print(value)?),
        "priority" | "prio" => edits.priority = Some(parse_or_print(value)?),
        "estimate" | "est" => edits.estimated_time = Some(parse_or_print(value)?),
        "notes" => edits.notes = Some(value.to_string()),
        other => {
            println!("Unknown field: {}", other);
            return Ok(());
        }
    }

    let task = app.tasks.update(id, edits)?;
    println!("Updated task {} '{}'", task.id, task.title);
    Ok(())
}

fn cmd_list(app: &AppState) -> Result<()> {
    let tasks = app.tasks.all()?;
    if tasks.is_empty() {
        println!("No tasks yet - 'add <title>' creates one");
        return Ok(());
    }

    let today = Local::now().date_naive();
    for task in &tasks {
        let badge = match task.due_status(today) {
            DueStatus::Overdue => "OVERDUE".to_string(),
            DueStatus::DueToday => "due today".to_string(),
            DueStatus::Upcoming {
                days_left: Some(days),
            } => format!("{} days left", days),
            DueStatus::Upcoming { days_left: None } => "no deadline".to_string(),
        };
        let mark = if task.done { "x" } else { " " };
        println!(
            "[{}] {:>3}  {}  ({} | {} | {:.0}/{} min | {:.0}%)  {}",
            mark,
            task.id,
            task.title,
            task.category,
            task.priority,
            task.total_time_spent,
            task.estimated_time,
            task.progress_ratio() * 100.0,
            badge
        );
    }
    Ok(())
}

fn cmd_start(app: &mut AppState, rest: &str) -> Result<()> {
    let Some(id) = rest.split_whitespace().next().and_then(|s| s.parse().ok()) else {
        println!("Expected a numeric task id");
        return Ok(());
    };
    let Some(task) = app.tasks.get(id)? else {
        return Err(Error::TaskNotFound(id).into());
    };
    app.timer.start(&task, Local::now().naive_local())?;
    println!("Running: {}", task.title);
    Ok(())
}

fn cmd_timer(app: &AppState) {
    match app.timer.state() {
        TimerState::Idle => println!("No active timer"),
        TimerState::Running {
            task_title,
            started_at,
            ..
        } => println!("Running: '{}' since {}", task_title, started_at.time()),
        TimerState::Paused { task_title, .. } => println!("Paused: '{}'", task_title),
    }
}

fn cmd_log(app: &AppState) -> Result<()> {
    let entries = app.timer.entries()?;
    if entries.is_empty() {
        println!("No time recorded yet");
        return Ok(());
    }
    for entry in &entries {
        println!(
            "{}  {:>7.2} min  {} (task {})",
            entry.date, entry.duration_minutes, entry.task_title, entry.task_id
        );
    }
    Ok(())
}

fn cmd_bin(app: &AppState) -> Result<()> {
    let entries = app.bin.entries()?;
    if entries.is_empty() {
        println!("The recycle bin is empty");
        return Ok(());
    }
    let now = Local::now().naive_local();
    for entry in &entries {
        let age = match entry.age_in_days(now) {
            0 => "today".to_string(),
            1 => "yesterday".to_string(),
            days => format!("{} days ago", days),
        };
        println!(
            "{:>3}  {}  ({} | {})  deleted {}",
            entry.task.id, entry.task.title, entry.task.category, entry.task.priority, age
        );
    }
    Ok(())
}

fn cmd_purge_all(app: &AppState, rest: &str) -> Result<()> {
    if !app.config.verify_admin(rest.trim()) {
        println!("Admin password required: purge-all <password>");
        return Ok(());
    }
    app.bin.purge_all()?;
    println!("Recycle bin emptied");
    Ok(())
}

fn cmd_feedback(app: &AppState, rest: &str) -> Result<()> {
    let (pairs, text) = split_kv(rest);
    let mut draft = FeedbackDraft {
        feedback: text,
        ..FeedbackDraft::default()
    };

    for (key, value) in pairs {
        match key.as_str() {
            "kind" | "type" => draft.kind = parse_or_print(&value)?,
            "urgency" => draft.urgency = parse_or_print(&value)?,
            "name" => draft.name = value,
            "email" => draft.email = value,
            "lang" | "language" => draft.language = parse_or_print(&value)?,
            other => println!("Ignoring unknown field: {}", other),
        }
    }

    let (entry, outcome) = app.feedback.submit(draft, Local::now().naive_local())?;
    println!("Thank you for your feedback! (entry {})", entry.id);
    println!("{}", AppState::describe_outcome(&outcome));
    Ok(())
}

fn cmd_stats(app: &AppState) -> Result<()> {
    let stats = app.quick_stats()?;
    println!(
        "Total time: {:.0} min ({:.1} h)",
        stats.total_minutes,
        stats.total_minutes / 60.0
    );
    println!("Tasks: {}/{} done", stats.tasks_done, stats.tasks_total);
    Ok(())
}

/// Parse a console value; failures surface as a validation rejection the
/// loop prints instead of treating as fatal.
fn parse_or_print<T>(value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|err| Error::InvalidInput(format!("{}", err)).into())
}
