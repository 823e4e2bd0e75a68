//! The task board: form submission, loading and deletion.
//!
//! `Board` ties the validator, the card list and a `TaskApi` together. Every
//! operation leaves the card list untouched when the API call fails.

use thiserror::Error;
use tracing::{error, info, warn};

use crate::api::{ApiError, TaskApi};
use crate::fields::StatusFilter;
use crate::render::{DisplayUnit, TaskList};
use crate::task::TaskId;
use crate::validate::{validate, FormFields, ValidationReport};

/// Why a board operation did not complete.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("validation failed: {0}")]
    Invalid(ValidationReport),
    #[error(transparent)]
    Network(#[from] ApiError),
}

/// State of the most recent API request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Pending(&'static str),
    Succeeded(&'static str),
    Failed { action: &'static str, message: String },
}

/// Result of asking the board to delete a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deletion {
    Removed,
    /// No card carries that id, so nothing was requested.
    NotDisplayed,
}

pub struct Board<A> {
    api: A,
    list: TaskList,
    owner: Option<String>,
    last_request: RequestState,
}

impl<A: TaskApi> Board<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            list: TaskList::new(),
            owner: None,
            last_request: RequestState::Idle,
        }
    }

    /// Scope the board to tasks owned by `owner`.
    pub fn with_owner(mut self, owner: Option<String>) -> Self {
        self.owner = owner.map(|o| o.trim().to_string()).filter(|o| !o.is_empty());
        self
    }

    pub fn list(&self) -> &TaskList {
        &self.list
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn last_request(&self) -> &RequestState {
        &self.last_request
    }

    /// Validate the form, create the task and display it.
    ///
    /// Nothing is sent when validation fails.
    pub async fn submit(&mut self, form: &FormFields) -> Result<&DisplayUnit, BoardError> {
        let report = validate(form);
        if !report.is_valid() {
            warn!(errors = %report, "task form rejected");
            return Err(BoardError::Invalid(report));
        }
        let mut task = form.to_task().map_err(BoardError::Invalid)?;
        task.name = self.owner.clone();

        self.last_request = RequestState::Pending("create");
        match self.api.create(&task).await {
            Ok(created) => {
                info!(id = ?created.id, title = %created.title, "task created");
                self.last_request = RequestState::Succeeded("create");
                Ok(self.list.render(&created))
            }
            Err(e) => Err(self.fail("create", e)),
        }
    }

    /// Fetch every task from the API and display it.
    ///
    /// Returns the number of tasks displayed.
    pub async fn load(&mut self) -> Result<usize, BoardError> {
        self.last_request = RequestState::Pending("load");
        let tasks = match self.api.list().await {
            Ok(tasks) => tasks,
            Err(e) => return Err(self.fail("load", e)),
        };

        let total = tasks.len();
        let owner = self.owner.clone();
        let mut shown = 0;
        for task in tasks.iter().filter(|t| owner.is_none() || t.name == owner) {
            self.list.render(task);
            shown += 1;
        }
        info!(total, shown, "tasks loaded");
        self.last_request = RequestState::Succeeded("load");
        Ok(shown)
    }

    /// Delete a displayed task and remove its card.
    pub async fn delete(&mut self, id: &TaskId) -> Result<Deletion, BoardError> {
        if !self.list.contains(id) {
            return Ok(Deletion::NotDisplayed);
        }
        self.last_request = RequestState::Pending("delete");
        if let Err(e) = self.api.delete(id).await {
            return Err(self.fail("delete", e));
        }
        self.list.remove_displayed(id);
        info!(%id, "task deleted");
        self.last_request = RequestState::Succeeded("delete");
        Ok(Deletion::Removed)
    }

    pub fn filter(&mut self, filter: StatusFilter) {
        self.list.filter_displayed(filter);
    }

    fn fail(&mut self, action: &'static str, e: ApiError) -> BoardError {
        error!(action, error = %e, "task api request failed");
        self.last_request = RequestState::Failed { action, message: e.to_string() };
        BoardError::Network(e)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::fields::{BadgeCategory, Status};
    use crate::task::Task;
    use crate::validate::Field;

    /// In-memory task API handing out sequential ids.
    #[derive(Default)]
    pub(crate) struct MemoryApi {
        pub tasks: Mutex<Vec<Task>>,
        pub next_id: Mutex<u64>,
        pub fail: Mutex<bool>,
        pub calls: Mutex<Vec<String>>,
    }

    impl MemoryApi {
        pub fn starting_at(id: u64) -> Self {
            let api = MemoryApi::default();
            *api.next_id.lock().unwrap() = id;
            api
        }

        pub fn with_tasks(tasks: Vec<Task>) -> Self {
            let api = MemoryApi::default();
            *api.tasks.lock().unwrap() = tasks;
            api
        }

        pub fn set_failing(&self, fail: bool) {
            *self.fail.lock().unwrap() = fail;
        }

        fn record(&self, call: String) -> Result<(), ApiError> {
            self.calls.lock().unwrap().push(call);
            if *self.fail.lock().unwrap() {
                Err(ApiError::Other("connection refused".into()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl TaskApi for MemoryApi {
        async fn list(&self) -> Result<Vec<Task>, ApiError> {
            self.record("list".into())?;
            Ok(self.tasks.lock().unwrap().clone())
        }

        async fn create(&self, task: &Task) -> Result<Task, ApiError> {
            self.record("create".into())?;
            let mut next = self.next_id.lock().unwrap();
            let mut created = task.clone();
            created.id = Some(TaskId::from(*next));
            *next += 1;
            self.tasks.lock().unwrap().push(created.clone());
            Ok(created)
        }

        async fn delete(&self, id: &TaskId) -> Result<(), ApiError> {
            self.record(format!("delete {id}"))?;
            self.tasks.lock().unwrap().retain(|t| t.id.as_ref() != Some(id));
            Ok(())
        }
    }

    pub(crate) fn valid_form() -> FormFields {
        FormFields {
            title: "Buy milk".into(),
            description: "Get milk from the store".into(),
            date: "2099-01-01T10:00".into(),
            budget: "9.5".into(),
            status: Status::Done,
            ..FormFields::default()
        }
    }

    pub(crate) fn stored(id: &str, name: Option<&str>, status: &str) -> Task {
        Task {
            id: Some(TaskId::from(id)),
            title: format!("Task {id}"),
            description: "Stored on the server".into(),
            color: "#123456".into(),
            date: "2099-02-02T08:00".into(),
            status: status.into(),
            budget: 1.0,
            name: name.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_create_then_delete_twice() {
        let mut board = Board::new(MemoryApi::starting_at(42));

        let unit = board.submit(&valid_form()).await.unwrap();
        assert_eq!(unit.id, Some(TaskId::from("42")));
        assert_eq!(unit.badge, BadgeCategory::Success);
        assert_eq!(unit.budget, "$9.50");

        let id = TaskId::from("42");
        assert_eq!(board.delete(&id).await.unwrap(), Deletion::Removed);
        assert!(board.list().is_empty());
        assert_eq!(board.delete(&id).await.unwrap(), Deletion::NotDisplayed);
        assert_eq!(
            *board.api().calls.lock().unwrap(),
            vec!["create".to_string(), "delete 42".to_string()]
        );
    }

    #[tokio::test]
    async fn test_invalid_form_makes_no_request() {
        let mut board = Board::new(MemoryApi::default());
        let mut form = valid_form();
        form.title = "Hi".into();

        match board.submit(&form).await {
            Err(BoardError::Invalid(report)) => {
                assert_eq!(report.errors.len(), 1);
                assert!(report.error(Field::Title).is_some());
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
        assert!(board.api().calls.lock().unwrap().is_empty());
        assert_eq!(*board.last_request(), RequestState::Idle);
    }

    #[tokio::test]
    async fn test_failed_create_adds_nothing() {
        let api = MemoryApi::default();
        api.set_failing(true);
        let mut board = Board::new(api);

        assert!(matches!(
            board.submit(&valid_form()).await,
            Err(BoardError::Network(_))
        ));
        assert!(board.list().is_empty());
        assert!(matches!(
            board.last_request(),
            RequestState::Failed { action: "create", .. }
        ));
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_card() {
        let mut board = Board::new(MemoryApi::with_tasks(vec![stored("5", None, "new")]));
        board.load().await.unwrap();
        board.api().set_failing(true);

        let id = TaskId::from("5");
        assert!(board.delete(&id).await.is_err());
        assert!(board.list().contains(&id));
    }

    #[tokio::test]
    async fn test_failed_load_keeps_existing_cards() {
        let mut board = Board::new(MemoryApi::with_tasks(vec![stored("1", None, "new")]));
        board.load().await.unwrap();
        board.api().set_failing(true);
        assert!(board.load().await.is_err());
        assert_eq!(board.list().len(), 1);
    }

    #[tokio::test]
    async fn test_reload_does_not_duplicate_cards() {
        let mut board = Board::new(MemoryApi::with_tasks(vec![
            stored("1", None, "new"),
            stored("2", None, "done"),
        ]));
        assert_eq!(board.load().await.unwrap(), 2);
        assert_eq!(board.load().await.unwrap(), 2);
        assert_eq!(board.list().len(), 2);
        assert_eq!(*board.last_request(), RequestState::Succeeded("load"));
    }

    #[tokio::test]
    async fn test_owner_scopes_load_and_create() {
        let api = MemoryApi::with_tasks(vec![
            stored("1", Some("Robert"), "new"),
            stored("2", Some("Alice"), "new"),
            stored("3", None, "new"),
        ]);
        *api.next_id.lock().unwrap() = 10;
        let mut board = Board::new(api).with_owner(Some("Robert".into()));

        assert_eq!(board.load().await.unwrap(), 1);
        assert!(board.list().contains(&TaskId::from("1")));

        board.submit(&valid_form()).await.unwrap();
        let tasks = board.api().tasks.lock().unwrap();
        let created = tasks.iter().find(|t| t.id == Some(TaskId::from("10"))).unwrap();
        assert_eq!(created.name.as_deref(), Some("Robert"));
    }

    #[tokio::test]
    async fn test_filter_through_board() {
        let mut board = Board::new(MemoryApi::with_tasks(vec![
            stored("1", None, "new"),
            stored("2", None, "blocked"),
        ]));
        board.load().await.unwrap();
        board.filter(StatusFilter::parse("blocked"));
        assert_eq!(board.list().visible().count(), 1);
        board.filter(StatusFilter::All);
        assert_eq!(board.list().visible().count(), 2);
    }
}
