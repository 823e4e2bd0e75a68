//! # taskboard - task-list client
//!
//! A terminal client for a REST task API. Tasks carry a title, description,
//! colour, due date, status and budget; the client validates new tasks before
//! sending them, renders status-coded task cards, and deletes or filters them.
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the interactive board
//! taskboard ui
//!
//! # Create a task
//! taskboard add --title "Buy milk" --description "Get milk from the store" \
//!     --date 2030-01-05T09:30 --budget 9.50 --status new
//!
//! # List tasks that are done
//! taskboard list --status done
//!
//! # Same, as JSON
//! taskboard list --status done --json
//!
//! # Delete a task
//! taskboard delete 42
//! ```
//!
//! ## Configuration
//!
//! - `--api-url` / `TASKBOARD_API_URL` - base URL of the task resource
//! - `--timeout-secs` / `TASKBOARD_TIMEOUT_SECS` - per-request timeout
//! - `--owner` / `TASKBOARD_OWNER` - only show (and stamp) tasks with this owner name
//! - `--log-json` / `TASKBOARD_LOG_JSON` - JSON logs on stderr
//! - `RUST_LOG` - log filter, `info` by default
//!
//! The task API must answer `GET <base>`, `POST <base>` and `DELETE <base>/<id>`.

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub mod api;
pub mod board;
pub mod cli;
pub mod cmd;
pub mod fields;
pub mod render;
pub mod task;
pub mod validate;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
    pub mod task_form;
    pub mod utils;
}

use api::HttpTaskApi;
use board::Board;
use cli::Cli;
use cmd::*;
use validate::FormFields;

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs would draw over the alternate screen.
    if !matches!(cli.command, Commands::Ui) {
        init_tracing(cli.log_json);
    }

    if let Commands::Completions { shell } = cli.command {
        cmd_completions(shell);
        return;
    }

    let api = match HttpTaskApi::new(&cli.api_url, Duration::from_secs(cli.timeout_secs)) {
        Ok(api) => api,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Completions { .. } => unreachable!("completions handled above"),
        Commands::Ping => cmd_ping(&api).await,
        Commands::Ui => {
            let mut board = Board::new(api).with_owner(cli.owner);
            cmd_ui(&mut board).await
        }
        Commands::Add { title, description, date, budget, color, status } => {
            let form = FormFields {
                title: title.unwrap_or_default(),
                description: description.unwrap_or_default(),
                color,
                date: date.unwrap_or_default(),
                status,
                budget: budget.unwrap_or_default(),
            };
            let mut board = Board::new(api).with_owner(cli.owner);
            cmd_add(&mut board, form).await
        }
        Commands::List { status, json } => {
            let mut board = Board::new(api).with_owner(cli.owner);
            cmd_list(&mut board, status, json).await
        }
        Commands::Delete { id } => {
            let mut board = Board::new(api).with_owner(cli.owner);
            cmd_delete(&mut board, id).await
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
