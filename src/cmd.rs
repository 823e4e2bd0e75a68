//! Command implementations for the CLI interface.
//!
//! Each handler drives a `Board` through one of its paths (submit, load,
//! delete) and prints the resulting cards.

use std::error::Error;

use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::api::{HttpTaskApi, TaskApi};
use crate::board::{Board, Deletion};
use crate::fields::{Status, StatusFilter, DEFAULT_COLOR};
use crate::render::DisplayUnit;
use crate::task::TaskId;
use crate::validate::FormFields;

pub type CmdResult = Result<(), Box<dyn Error>>;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive UI interface.
    Ui,

    /// Create a new task.
    Add {
        /// Short title, at least 3 characters.
        #[arg(long)]
        title: Option<String>,
        /// Longer description, at least 10 characters.
        #[arg(long)]
        description: Option<String>,
        /// Due date: YYYY-MM-DDTHH:MM, YYYY-MM-DD or RFC 3339.
        #[arg(long)]
        date: Option<String>,
        /// Budget between 0 and 1,000,000.
        #[arg(long)]
        budget: Option<String>,
        /// Card colour as a hex string.
        #[arg(long, default_value = DEFAULT_COLOR)]
        color: String,
        /// Status: new | in progress | blocked | done.
        #[arg(long, value_enum, default_value_t = Status::New)]
        status: Status,
    },

    /// List tasks, optionally filtered by status.
    List {
        /// "All" or a status label such as "done" (case-insensitive).
        #[arg(long, default_value = "All")]
        status: StatusFilter,
        /// Print the visible cards as a JSON array.
        #[arg(long)]
        json: bool,
    },

    /// Delete a task by id.
    Delete {
        /// Task id as assigned by the API.
        id: String,
    },

    /// Check that the task API is reachable.
    Ping,

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Launch the terminal user interface.
pub async fn cmd_ui<A: TaskApi>(board: &mut Board<A>) -> CmdResult {
    crate::tui::run::run_tui(board).await?;
    Ok(())
}

/// Validate and create a task, then print its card.
pub async fn cmd_add<A: TaskApi>(board: &mut Board<A>, form: FormFields) -> CmdResult {
    let unit = board.submit(&form).await?;
    println!("{}", format_card(unit));
    println!("Task has been created successfully.");
    Ok(())
}

/// Load all tasks and print those passing the filter.
pub async fn cmd_list<A: TaskApi>(
    board: &mut Board<A>,
    filter: StatusFilter,
    json: bool,
) -> CmdResult {
    board.load().await?;
    board.filter(filter);

    let visible: Vec<&DisplayUnit> = board.list().visible().collect();
    if json {
        println!("{}", serde_json::to_string_pretty(&visible)?);
        return Ok(());
    }
    if visible.is_empty() {
        println!("No tasks to show ({}).", board.list().filter());
        return Ok(());
    }
    for unit in &visible {
        println!("{}\n", format_card(unit));
    }
    println!("Tasks: {}/{}", visible.len(), board.list().len());
    Ok(())
}

/// Load tasks, then delete the one with the given id.
pub async fn cmd_delete<A: TaskApi>(board: &mut Board<A>, id: String) -> CmdResult {
    board.load().await?;
    let id = TaskId::new(id);
    match board.delete(&id).await? {
        Deletion::Removed => println!("Deleted task {id}"),
        Deletion::NotDisplayed => println!("No task with id {id}; nothing deleted"),
    }
    Ok(())
}

/// Send a plain GET to the API and report the outcome.
pub async fn cmd_ping(api: &HttpTaskApi) -> CmdResult {
    let status = api.ping().await?;
    println!("API connection successful: {} ({})", api.base_url(), status);
    Ok(())
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use crate::cli::Cli;
    use clap::CommandFactory;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

/// Plain-text card for terminal output.
pub fn format_card(unit: &DisplayUnit) -> String {
    let mut lines = vec![
        format!("[{}] {}  ({})", unit.status, unit.title, unit.badge),
        format!("  {}", unit.description),
        format!("  Due: {}   Budget: {}   Color: {}", unit.date, unit.budget, unit.color),
    ];
    if let Some(id) = &unit.id {
        lines.push(format!("  ID: {id}"));
    }
    lines.join("\n")
}
