//! Task card rendering and the visible card list.
//!
//! `TaskList` owns the ordered collection of cards shown to the user. Cards
//! are tagged with the id the task API assigned, so they can later be removed
//! or filtered without consulting the API again.

use serde::Serialize;

use crate::fields::{BadgeCategory, StatusFilter};
use crate::task::{Task, TaskId};
use crate::validate::parse_due;

/// One on-screen representation of a task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayUnit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<TaskId>,
    pub title: String,
    pub description: String,
    pub color: String,
    /// Badge text, the task's status label as received.
    pub status: String,
    pub badge: BadgeCategory,
    pub date: String,
    pub budget: String,
    #[serde(skip)]
    pub visible: bool,
}

impl DisplayUnit {
    /// Build the card for a task. Visibility starts out true.
    pub fn from_task(task: &Task) -> Self {
        DisplayUnit {
            id: task.id.clone(),
            title: task.title.clone(),
            description: task.description.clone(),
            color: task.color.clone(),
            status: task.status.clone(),
            badge: BadgeCategory::for_label(&task.status),
            date: format_due(&task.date),
            budget: format_budget(task.budget),
            visible: true,
        }
    }
}

/// Format a due date as e.g. `Jan 5, 2030, 09:30 AM`.
///
/// Input that cannot be parsed is shown unchanged.
pub fn format_due(raw: &str) -> String {
    match parse_due(raw) {
        Some(dt) => dt.format("%b %-d, %Y, %I:%M %p").to_string(),
        None => raw.to_string(),
    }
}

/// Format an amount as dollars with exactly two decimals.
pub fn format_budget(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", -amount)
    } else {
        format!("${:.2}", amount)
    }
}

/// Ordered collection of displayed task cards.
#[derive(Debug, Default)]
pub struct TaskList {
    units: Vec<DisplayUnit>,
    filter: StatusFilter,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Display a task and return its card.
    ///
    /// A task whose id is already displayed replaces the existing card in place.
    pub fn render(&mut self, task: &Task) -> &DisplayUnit {
        let mut unit = DisplayUnit::from_task(task);
        unit.visible = self.filter.matches(&unit.status);

        let existing = unit
            .id
            .as_ref()
            .and_then(|id| self.position(id));
        let idx = match existing {
            Some(idx) => {
                self.units[idx] = unit;
                idx
            }
            None => {
                self.units.push(unit);
                self.units.len() - 1
            }
        };
        &self.units[idx]
    }

    /// Remove the card tagged with `id`. Returns whether a card was removed.
    pub fn remove_displayed(&mut self, id: &TaskId) -> bool {
        match self.position(id) {
            Some(idx) => {
                self.units.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Show only the cards whose badge text matches the filter.
    pub fn filter_displayed(&mut self, filter: StatusFilter) {
        for unit in &mut self.units {
            unit.visible = filter.matches(&unit.status);
        }
        self.filter = filter;
    }

    pub fn filter(&self) -> &StatusFilter {
        &self.filter
    }

    pub fn contains(&self, id: &TaskId) -> bool {
        self.position(id).is_some()
    }

    pub fn get(&self, id: &TaskId) -> Option<&DisplayUnit> {
        self.position(id).map(|idx| &self.units[idx])
    }

    /// Every card, visible or not, in display order.
    pub fn units(&self) -> &[DisplayUnit] {
        &self.units
    }

    pub fn visible(&self) -> impl Iterator<Item = &DisplayUnit> {
        self.units.iter().filter(|u| u.visible)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    fn position(&self, id: &TaskId) -> Option<usize> {
        self.units.iter().position(|u| u.id.as_ref() == Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::DEFAULT_COLOR;

    fn task(id: Option<&str>, status: &str) -> Task {
        Task {
            id: id.map(TaskId::from),
            title: format!("task {}", id.unwrap_or("-")),
            description: "A description long enough".into(),
            color: DEFAULT_COLOR.into(),
            date: "2030-01-05T09:30".into(),
            status: status.into(),
            budget: 10.0,
            name: None,
        }
    }

    #[test]
    fn test_render_done_task() {
        let mut t = task(Some("1"), "done");
        t.title = "X".into();
        t.budget = 9.5;
        let mut list = TaskList::new();
        let unit = list.render(&t);
        assert_eq!(unit.badge, BadgeCategory::Success);
        assert_eq!(unit.budget, "$9.50");
        assert_eq!(unit.date, "Jan 5, 2030, 09:30 AM");
    }

    #[test]
    fn test_render_unknown_status_is_secondary() {
        let mut list = TaskList::new();
        let unit = list.render(&task(Some("1"), "someday"));
        assert_eq!(unit.badge, BadgeCategory::Secondary);
        assert_eq!(unit.status, "someday");
    }

    #[test]
    fn test_format_helpers() {
        assert_eq!(format_budget(0.0), "$0.00");
        assert_eq!(format_budget(1_000_000.0), "$1000000.00");
        assert_eq!(format_budget(2.005), "$2.00");
        assert_eq!(format_due("2030-12-24T18:05"), "Dec 24, 2030, 06:05 PM");
        assert_eq!(format_due("not a date"), "not a date");
    }

    #[test]
    fn test_render_same_id_replaces_card() {
        let mut list = TaskList::new();
        list.render(&task(Some("7"), "new"));
        list.render(&task(Some("8"), "new"));
        list.render(&task(Some("7"), "done"));
        assert_eq!(list.len(), 2);
        assert_eq!(list.units()[0].id, Some(TaskId::from("7")));
        assert_eq!(list.units()[0].badge, BadgeCategory::Success);
    }

    #[test]
    fn test_render_without_id_never_dedupes() {
        let mut list = TaskList::new();
        list.render(&task(None, "new"));
        list.render(&task(None, "new"));
        assert_eq!(list.len(), 2);
        assert!(list.units().iter().all(|u| u.id.is_none()));
    }

    #[test]
    fn test_remove_missing_id_is_noop() {
        let mut list = TaskList::new();
        list.render(&task(Some("1"), "new"));
        assert!(!list.remove_displayed(&TaskId::from("99")));
        assert_eq!(list.len(), 1);
        assert!(list.remove_displayed(&TaskId::from("1")));
        assert!(!list.remove_displayed(&TaskId::from("1")));
        assert!(list.is_empty());
    }

    #[test]
    fn test_filter_then_all_restores_visibility() {
        let mut list = TaskList::new();
        list.render(&task(Some("1"), "new"));
        list.render(&task(Some("2"), "done"));
        list.render(&task(Some("3"), "in progress"));

        list.filter_displayed(StatusFilter::parse("Done"));
        let shown: Vec<_> = list.visible().filter_map(|u| u.id.clone()).collect();
        assert_eq!(shown, vec![TaskId::from("2")]);

        list.filter_displayed(StatusFilter::parse("blocked"));
        assert_eq!(list.visible().count(), 0);

        list.filter_displayed(StatusFilter::parse("All"));
        assert_eq!(list.visible().count(), 3);
    }

    #[test]
    fn test_active_filter_applies_to_new_cards() {
        let mut list = TaskList::new();
        list.filter_displayed(StatusFilter::parse("done"));
        assert!(!list.render(&task(Some("1"), "new")).visible);
        assert!(list.render(&task(Some("2"), "done")).visible);
    }
}
