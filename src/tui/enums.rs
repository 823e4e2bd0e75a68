//! Enumerations for TUI state management.

use crate::task::TaskId;

/// Screen currently shown by the terminal user interface.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AppState {
    TaskList,
    AddTask,
    Help,
    Confirm,
}

/// Work requested by a key press that needs the task API.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Action {
    None,
    Quit,
    Submit,
    Reload,
    Delete(TaskId),
}
