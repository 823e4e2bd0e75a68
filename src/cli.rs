use clap::Parser;

use crate::api::{DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
use crate::cmd::Commands;

/// Task-list client for a REST task API.
/// The API location defaults to the shared class endpoint or TASKBOARD_API_URL.
#[derive(Parser)]
#[command(name = "taskboard", version, about = "Create, list and delete tasks on a task API")]
pub struct Cli {
    /// Base URL of the task resource.
    #[arg(long, global = true, env = "TASKBOARD_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Per-request timeout in seconds.
    #[arg(long, global = true, env = "TASKBOARD_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Only show tasks owned by this name, and stamp it on new tasks.
    #[arg(long, global = true, env = "TASKBOARD_OWNER")]
    pub owner: Option<String>,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true, env = "TASKBOARD_LOG_JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}
