use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use taskboard::format::{format_timestamp, time_since};
use taskboard::models::validation::{build_draft, error_summary};
use taskboard::models::{Filter, StatusFilter, Task, TaskDraft, TaskStatus};
use taskboard::settings::Settings;
use taskboard::{ApiClient, tui};

#[derive(Parser)]
#[command(name = "taskboard", about = "Terminal client for a task REST backend")]
struct Cli {
    /// Base URL of the task resource, e.g. http://localhost:8080/api/tarefas
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the terminal UI (default)
    Tui,
    /// List tasks
    List {
        /// PENDENTE, EM_ANDAMENTO, CONCLUIDA or TODAS
        #[arg(long, default_value = "TODAS")]
        status: StatusFilter,
        /// Title substring
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Show task counters
    Stats,
    /// Show a single task
    Show { id: i64 },
    /// Create a task
    Add {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "PENDENTE")]
        status: TaskStatus,
    },
    /// Change a task; fields not given keep their stored values
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<TaskStatus>,
    },
    /// Delete a task
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
}

/// The alternate screen owns stdout/stderr while the UI runs, so logs go to a
/// file instead.
fn init_file_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load();
    let command = cli.command.unwrap_or(Commands::Tui);

    if matches!(command, Commands::Tui) {
        init_file_logging(&settings.resolve_log_file()?)?;
    } else {
        init_stderr_logging();
    }

    let api_url = settings.resolve_api_url(cli.api_url.as_deref());
    let client = ApiClient::new(&api_url).context("invalid API URL")?;

    match command {
        // Blocks this thread on terminal input; requests run on the other
        // workers of the multi-threaded runtime.
        Commands::Tui => tui::run(client)?,
        Commands::List { status, search } => {
            let tasks = client
                .list_tasks(&Filter::new(status, search))
                .await
                .context("failed to list tasks")?;
            if tasks.is_empty() {
                println!("No tasks found.");
            }
            let now = Local::now();
            for task in &tasks {
                println!("{}", summary_line(task, now));
            }
        }
        Commands::Stats => {
            let counters = client.stats().await.context("failed to load statistics")?;
            println!("Total:       {}", counters.total);
            println!("Pending:     {}", counters.pending);
            println!("In Progress: {}", counters.in_progress);
            println!("Completed:   {}", counters.completed);
            println!("Progress:    {}%", counters.completion_percentage());
        }
        Commands::Show { id } => {
            let task = client
                .get_task(id)
                .await
                .with_context(|| format!("failed to load task {id}"))?;
            print_task(&task);
        }
        Commands::Add {
            title,
            description,
            status,
        } => {
            let draft = build_draft(&title, &description, status)
                .map_err(|errors| anyhow::anyhow!(error_summary(&errors)))?;
            match client
                .create_task(&draft)
                .await
                .context("failed to create task")?
            {
                Some(task) => print_task(&task),
                None => println!("Created task {:?}.", draft.title),
            }
        }
        Commands::Edit {
            id,
            title,
            description,
            status,
        } => {
            // PUT replaces the whole record, so start from what is stored.
            let current = client
                .get_task(id)
                .await
                .with_context(|| format!("failed to load task {id}"))?;
            let merged = TaskDraft::from_task(&current).with_changes(title, description, status);
            let draft = build_draft(&merged.title, &merged.description, merged.status)
                .map_err(|errors| anyhow::anyhow!(error_summary(&errors)))?;
            match client
                .update_task(id, &draft)
                .await
                .with_context(|| format!("failed to update task {id}"))?
            {
                Some(task) => print_task(&task),
                None => println!("Updated task {id}."),
            }
        }
        Commands::Delete { id, yes } => {
            if !yes && !confirm(&format!("Delete task {id}?"))? {
                println!("Cancelled.");
                return Ok(());
            }
            client
                .delete_task(id)
                .await
                .with_context(|| format!("failed to delete task {id}"))?;
            println!("Deleted task {id}.");
        }
    }

    Ok(())
}

fn summary_line(task: &Task, now: chrono::DateTime<Local>) -> String {
    let id = task.id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string());
    let age = task
        .created_at
        .as_deref()
        .and_then(|ts| time_since(ts, now))
        .map(|age| format!("  (created {age})"))
        .unwrap_or_default();
    format!("{id:>5}  {:<12} {}{age}", task.status.label(), task.title)
}

fn print_task(task: &Task) {
    if let Some(id) = task.id {
        println!("ID:          {id}");
    }
    println!("Title:       {}", task.title);
    println!("Status:      {}", task.status.label());
    if !task.description.is_empty() {
        println!("Description: {}", task.description);
    }
    if let Some(created) = &task.created_at {
        println!("Created:     {}", format_timestamp(created));
    }
    if let Some(updated) = &task.updated_at {
        println!("Updated:     {}", format_timestamp(updated));
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
