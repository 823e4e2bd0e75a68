//! Form validation for new tasks.
//!
//! `validate` inspects a snapshot of the raw form values and reports every
//! failing field at once. It never touches the screen or the network.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use thiserror::Error;

use crate::fields::{Status, DEFAULT_COLOR};
use crate::task::Task;

pub const TITLE_MIN_CHARS: usize = 3;
pub const DESCRIPTION_MIN_CHARS: usize = 10;
pub const BUDGET_MAX: f64 = 1_000_000.0;

/// Raw, unvalidated values of the task form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormFields {
    pub title: String,
    pub description: String,
    pub color: String,
    pub date: String,
    pub status: Status,
    pub budget: String,
}

impl Default for FormFields {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            color: DEFAULT_COLOR.to_string(),
            date: String::new(),
            status: Status::New,
            budget: String::new(),
        }
    }
}

impl FormFields {
    /// Build the task record to submit. Call only after validation passed.
    pub fn to_task(&self) -> Result<Task, ValidationReport> {
        let budget = parse_budget(&self.budget).map_err(|e| {
            let mut report = ValidationReport::default();
            report.errors.insert(Field::Budget, e);
            report
        })?;
        let color = self.color.trim();
        Ok(Task {
            id: None,
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            color: if color.is_empty() { DEFAULT_COLOR.to_string() } else { color.to_string() },
            date: self.date.trim().to_string(),
            status: self.status.label().to_string(),
            budget,
            name: None,
        })
    }
}

/// Form fields subject to validation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Title,
    Description,
    Date,
    Budget,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::Description => "Description",
            Field::Date => "Due date",
            Field::Budget => "Budget",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why a single field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("is required and must be at least {min} characters")]
    TooShort { min: usize },
    #[error("is required")]
    Missing,
    #[error("cannot be in the past")]
    InPast,
    #[error("must be a positive number")]
    Invalid,
    #[error("cannot exceed $1,000,000")]
    TooLarge,
}

/// Outcome of validating a form snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: BTreeMap<Field, FieldError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&self, field: Field) -> Option<FieldError> {
        self.errors.get(&field).copied()
    }

    /// Human-readable message for a failing field.
    pub fn message(&self, field: Field) -> Option<String> {
        self.error(field).map(|e| match (field, e) {
            (Field::Date, FieldError::Invalid) => "Due date is not a valid date".to_string(),
            _ => format!("{} {}", field.label(), e),
        })
    }

    /// Messages for every failing field, in field order.
    pub fn messages(&self) -> Vec<(Field, String)> {
        self.errors
            .keys()
            .filter_map(|&f| self.message(f).map(|m| (f, m)))
            .collect()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msgs: Vec<String> = self.messages().into_iter().map(|(_, m)| m).collect();
        write!(f, "{}", msgs.join("; "))
    }
}

/// Validate the form against the local clock.
pub fn validate(fields: &FormFields) -> ValidationReport {
    validate_at(fields, Local::now())
}

/// Validate the form against an explicit "now".
///
/// A due date equal to `now` passes; only strictly earlier dates fail.
pub fn validate_at(fields: &FormFields, now: DateTime<Local>) -> ValidationReport {
    let mut report = ValidationReport::default();

    if fields.title.trim().chars().count() < TITLE_MIN_CHARS {
        report.errors.insert(Field::Title, FieldError::TooShort { min: TITLE_MIN_CHARS });
    }

    if fields.description.trim().chars().count() < DESCRIPTION_MIN_CHARS {
        report.errors.insert(
            Field::Description,
            FieldError::TooShort { min: DESCRIPTION_MIN_CHARS },
        );
    }

    let date = fields.date.trim();
    if date.is_empty() {
        report.errors.insert(Field::Date, FieldError::Missing);
    } else {
        match parse_due(date) {
            Some(due) if due < now => {
                report.errors.insert(Field::Date, FieldError::InPast);
            }
            Some(_) => {}
            None => {
                report.errors.insert(Field::Date, FieldError::Invalid);
            }
        }
    }

    if let Err(e) = parse_budget(&fields.budget) {
        report.errors.insert(Field::Budget, e);
    }

    report
}

/// Parse a budget entry, enforcing `0 <= budget <= 1,000,000`.
pub fn parse_budget(raw: &str) -> Result<f64, FieldError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(FieldError::Invalid);
    }
    match raw.parse::<f64>() {
        Ok(v) if !v.is_finite() || v < 0.0 => Err(FieldError::Invalid),
        Ok(v) if v > BUDGET_MAX => Err(FieldError::TooLarge),
        Ok(v) => Ok(v),
        Err(_) => Err(FieldError::Invalid),
    }
}

/// Parse a due date as entered in the form.
///
/// Supports:
/// - "YYYY-MM-DDTHH:MM" and "YYYY-MM-DDTHH:MM:SS" (local time)
/// - the same with a space instead of `T`
/// - "YYYY-MM-DD" (local midnight)
/// - RFC 3339 with an explicit offset
pub fn parse_due(s: &str) -> Option<DateTime<Local>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local));
    }

    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%d %H:%M:%S",
    ];
    let naive = FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    Local.from_local_datetime(&naive).earliest()
}
