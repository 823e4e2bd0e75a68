//! Enumerations and field types for task cards.
//!
//! This module defines the task status values, the badge categories used to
//! colour-code a card, and the status filter applied to the visible list.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Accent colour used when a task has no colour of its own.
pub const DEFAULT_COLOR: &str = "#00b4d8";

/// Literal that selects every card when filtering.
pub const FILTER_ALL: &str = "All";

/// Task progress status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    #[serde(rename = "new")]
    #[value(name = "new")]
    New,
    #[serde(rename = "in progress", alias = "in-progress")]
    #[value(name = "in progress", alias = "in-progress")]
    InProgress,
    #[serde(rename = "blocked")]
    #[value(name = "blocked")]
    Blocked,
    #[serde(rename = "done")]
    #[value(name = "done")]
    Done,
}

impl Status {
    pub const ALL: [Status; 4] = [Status::New, Status::InProgress, Status::Blocked, Status::Done];

    /// The label sent to and received from the task API.
    pub fn label(self) -> &'static str {
        match self {
            Status::New => "new",
            Status::InProgress => "in progress",
            Status::Blocked => "blocked",
            Status::Done => "done",
        }
    }

    /// Look up a status by its wire label. Unknown labels yield `None`.
    pub fn from_label(label: &str) -> Option<Status> {
        Status::ALL.into_iter().find(|s| s.label() == label)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Colour category of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeCategory {
    Primary,
    Warning,
    Danger,
    Success,
    /// Neutral category for statuses outside the known set.
    Secondary,
}

impl BadgeCategory {
    /// Map a status label to its badge category.
    pub fn for_label(label: &str) -> Self {
        match Status::from_label(label) {
            Some(Status::New) => BadgeCategory::Primary,
            Some(Status::InProgress) => BadgeCategory::Warning,
            Some(Status::Blocked) => BadgeCategory::Danger,
            Some(Status::Done) => BadgeCategory::Success,
            None => BadgeCategory::Secondary,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BadgeCategory::Primary => "primary",
            BadgeCategory::Warning => "warning",
            BadgeCategory::Danger => "danger",
            BadgeCategory::Success => "success",
            BadgeCategory::Secondary => "secondary",
        }
    }
}

impl fmt::Display for BadgeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Visibility filter over the displayed cards.
///
/// Only the exact literal `"All"` selects every card; any other text is
/// compared case-insensitively against each card's badge text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Status(String),
}

impl StatusFilter {
    pub fn parse(value: &str) -> Self {
        if value == FILTER_ALL {
            StatusFilter::All
        } else {
            StatusFilter::Status(value.to_string())
        }
    }

    /// Whether a card with the given badge text passes this filter.
    pub fn matches(&self, badge_text: &str) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Status(wanted) => {
                badge_text.trim().to_lowercase() == wanted.trim().to_lowercase()
            }
        }
    }
}

/// Command-line form: `all` in any case also selects every card.
impl FromStr for StatusFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case(FILTER_ALL) {
            return Ok(StatusFilter::All);
        }
        Ok(StatusFilter::parse(s))
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str(FILTER_ALL),
            StatusFilter::Status(s) => f.write_str(s),
        }
    }
}
