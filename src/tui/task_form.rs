//! Task form handling for the terminal user interface.
//!
//! This module provides the `TaskForm` structure used to create tasks in the
//! TUI, including field ordering, inline validation errors and reset.

use crate::fields::{Status, DEFAULT_COLOR};
use crate::tui::input::InputField;
use crate::validate::{Field, FormFields, ValidationReport};

/// Global order constants for the task form fields.
pub const TITLE_GLOBAL_ORDER: usize = 0;
pub const DESCRIPTION_GLOBAL_ORDER: usize = 1;
pub const COLOR_GLOBAL_ORDER: usize = 2;
pub const DATE_GLOBAL_ORDER: usize = 3;
pub const STATUS_GLOBAL_ORDER: usize = 4;
pub const BUDGET_GLOBAL_ORDER: usize = 5;

const FIELD_COUNT: usize = 6;

/// Task form for entering a new task.
pub struct TaskForm {
    pub title: InputField,
    pub description: InputField,
    pub color: InputField,
    pub date: InputField,
    pub budget: InputField,
    pub status: usize,
    pub statuses: Vec<Status>,
    pub current_field: usize,
    pub errors: ValidationReport,
}

impl Default for TaskForm {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskForm {
    /// Create a form with default values: accent colour, status `new`.
    pub fn new() -> Self {
        Self {
            title: InputField::new(),
            description: InputField::new(),
            color: InputField::with_value(DEFAULT_COLOR),
            date: InputField::new(),
            budget: InputField::new(),
            status: 0,
            statuses: Status::ALL.to_vec(),
            current_field: 0,
            errors: ValidationReport::default(),
        }
    }

    /// Return every field to its default value and drop all errors.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Snapshot of the raw form values for validation.
    pub fn to_fields(&self) -> FormFields {
        FormFields {
            title: self.title.value.clone(),
            description: self.description.value.clone(),
            color: self.color.value.clone(),
            date: self.date.value.clone(),
            status: self.selected_status(),
            budget: self.budget.value.clone(),
        }
    }

    pub fn selected_status(&self) -> Status {
        self.statuses.get(self.status).copied().unwrap_or_default()
    }

    /// Validation rule checked for the field at `order`, if any.
    pub fn validated_field(order: usize) -> Option<Field> {
        match order {
            TITLE_GLOBAL_ORDER => Some(Field::Title),
            DESCRIPTION_GLOBAL_ORDER => Some(Field::Description),
            DATE_GLOBAL_ORDER => Some(Field::Date),
            BUDGET_GLOBAL_ORDER => Some(Field::Budget),
            _ => None,
        }
    }

    fn current_input(&mut self) -> Option<&mut InputField> {
        match self.current_field {
            TITLE_GLOBAL_ORDER => Some(&mut self.title),
            DESCRIPTION_GLOBAL_ORDER => Some(&mut self.description),
            COLOR_GLOBAL_ORDER => Some(&mut self.color),
            DATE_GLOBAL_ORDER => Some(&mut self.date),
            BUDGET_GLOBAL_ORDER => Some(&mut self.budget),
            _ => None,
        }
    }

    /// Editing a field clears the error shown next to it.
    fn clear_current_error(&mut self) {
        if let Some(field) = Self::validated_field(self.current_field) {
            self.errors.errors.remove(&field);
        }
    }

    pub fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % FIELD_COUNT;
    }

    pub fn prev_field(&mut self) {
        self.current_field = if self.current_field == 0 {
            FIELD_COUNT - 1
        } else {
            self.current_field - 1
        };
    }

    pub fn handle_char(&mut self, c: char) {
        if let Some(input) = self.current_input() {
            input.handle_char(c);
            self.clear_current_error();
        }
    }

    pub fn handle_backspace(&mut self) {
        if let Some(input) = self.current_input() {
            input.handle_backspace();
            self.clear_current_error();
        }
    }

    pub fn handle_delete(&mut self) {
        if let Some(input) = self.current_input() {
            input.handle_delete();
            self.clear_current_error();
        }
    }

    /// Handle left/right arrow keys for cursor movement or status selection.
    pub fn handle_left_right(&mut self, right: bool) {
        if self.current_field == STATUS_GLOBAL_ORDER {
            let n = self.statuses.len();
            self.status = if right {
                (self.status + 1) % n
            } else if self.status == 0 {
                n - 1
            } else {
                self.status - 1
            };
            return;
        }
        if let Some(input) = self.current_input() {
            if right {
                input.move_cursor_right();
            } else {
                input.move_cursor_left();
            }
        }
    }
}
