//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which manages the TUI state,
//! maps key presses to board actions, renders the card list and the task
//! form, and runs the event loop.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};

use crate::api::TaskApi;
use crate::board::{Board, BoardError, Deletion};
use crate::fields::{BadgeCategory, Status, StatusFilter};
use crate::render::DisplayUnit;
use crate::tui::{
    colors::{badge_color, hex_color, ACCENT, DARK_RED, GOLD},
    enums::{Action, AppState},
    input::InputField,
    task_form::{
        TaskForm, BUDGET_GLOBAL_ORDER, COLOR_GLOBAL_ORDER, DATE_GLOBAL_ORDER,
        DESCRIPTION_GLOBAL_ORDER, STATUS_GLOBAL_ORDER, TITLE_GLOBAL_ORDER,
    },
    utils::{centered_rect, cursor_column},
};
use crate::validate::validate;

/// Terminal front end for a `Board`.
pub struct App<'a, A: TaskApi> {
    board: &'a mut Board<A>,
    state: AppState,
    task_list_state: TableState,
    selected: usize,
    task_form: TaskForm,
    status_message: String,
    confirm_target: Option<DisplayUnit>,
}

impl<'a, A: TaskApi> App<'a, A> {
    pub fn new(board: &'a mut Board<A>) -> Self {
        Self {
            board,
            state: AppState::TaskList,
            task_list_state: TableState::default(),
            selected: 0,
            task_form: TaskForm::new(),
            status_message: String::new(),
            confirm_target: None,
        }
    }

    fn visible_units(&self) -> Vec<&DisplayUnit> {
        self.board.list().visible().collect()
    }

    fn selected_unit(&self) -> Option<&DisplayUnit> {
        self.board.list().visible().nth(self.selected)
    }

    fn clamp_selection(&mut self) {
        let count = self.board.list().visible().count();
        if self.selected >= count {
            self.selected = count.saturating_sub(1);
        }
    }

    fn set_status_message(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    fn apply_filter(&mut self, filter: StatusFilter) {
        self.set_status_message(format!("Showing: {filter}"));
        self.board.filter(filter);
        self.selected = 0;
    }

    /// Map a key press to state changes, returning any API work to perform.
    pub fn handle_key(&mut self, key: KeyCode) -> Action {
        match self.state {
            AppState::TaskList => self.handle_task_list_key(key),
            AppState::AddTask => self.handle_form_key(key),
            AppState::Help => {
                if matches!(key, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('h')) {
                    self.state = AppState::TaskList;
                }
                Action::None
            }
            AppState::Confirm => self.handle_confirm_key(key),
        }
    }

    fn handle_task_list_key(&mut self, key: KeyCode) -> Action {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,
            KeyCode::Char('h') | KeyCode::Char('?') => self.state = AppState::Help,
            KeyCode::Char('a') => {
                self.state = AppState::AddTask;
                self.status_message.clear();
            }
            KeyCode::Char('r') => return Action::Reload,
            KeyCode::Up | KeyCode::Char('k') => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.board.list().visible().count() {
                    self.selected += 1;
                }
            }
            KeyCode::Char('1') => self.apply_filter(StatusFilter::All),
            KeyCode::Char('2') => self.apply_filter(StatusFilter::parse(Status::New.label())),
            KeyCode::Char('3') => self.apply_filter(StatusFilter::parse(Status::InProgress.label())),
            KeyCode::Char('4') => self.apply_filter(StatusFilter::parse(Status::Blocked.label())),
            KeyCode::Char('5') => self.apply_filter(StatusFilter::parse(Status::Done.label())),
            KeyCode::Char('d') | KeyCode::Delete => match self.selected_unit().cloned() {
                Some(unit) if unit.id.is_some() => {
                    self.confirm_target = Some(unit);
                    self.state = AppState::Confirm;
                }
                Some(_) => self.set_status_message("This task has no id and cannot be deleted"),
                None => {}
            },
            _ => {}
        }
        Action::None
    }

    fn handle_confirm_key(&mut self, key: KeyCode) -> Action {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.state = AppState::TaskList;
                match self.confirm_target.take().and_then(|u| u.id) {
                    Some(id) => Action::Delete(id),
                    None => Action::None,
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.state = AppState::TaskList;
                self.confirm_target = None;
                Action::None
            }
            _ => Action::None,
        }
    }

    fn handle_form_key(&mut self, key: KeyCode) -> Action {
        match key {
            KeyCode::Esc => self.state = AppState::TaskList,
            KeyCode::Tab | KeyCode::Down => self.task_form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.task_form.prev_field(),
            KeyCode::Left => self.task_form.handle_left_right(false),
            KeyCode::Right => self.task_form.handle_left_right(true),
            KeyCode::Backspace => self.task_form.handle_backspace(),
            KeyCode::Delete => self.task_form.handle_delete(),
            KeyCode::Enter => {
                let report = validate(&self.task_form.to_fields());
                if !report.is_valid() {
                    self.task_form.errors = report;
                    self.set_status_message("Please fix the highlighted fields");
                    return Action::None;
                }
                return Action::Submit;
            }
            KeyCode::Char(c) => self.task_form.handle_char(c),
            _ => {}
        }
        Action::None
    }

    /// Run the API work behind an action and report the outcome.
    pub async fn perform(&mut self, action: Action) {
        match action {
            Action::None | Action::Quit => {}
            Action::Reload => match self.board.load().await {
                Ok(n) => self.set_status_message(format!("Loaded {n} tasks")),
                Err(e) => self.set_status_message(format!("Error loading tasks: {e}")),
            },
            Action::Submit => {
                let fields = self.task_form.to_fields();
                match self.board.submit(&fields).await.map(|_| ()) {
                    Ok(_) => {
                        self.task_form.reset();
                        self.state = AppState::TaskList;
                        self.set_status_message("Task has been created successfully.");
                    }
                    Err(BoardError::Invalid(report)) => {
                        self.task_form.errors = report;
                        self.set_status_message("Please fix the highlighted fields");
                    }
                    Err(e) => self.set_status_message(format!("Error saving task: {e}")),
                }
            }
            Action::Delete(id) => {
                match self.board.delete(&id).await {
                    Ok(Deletion::Removed) => self.set_status_message(format!("Task {id} deleted")),
                    Ok(Deletion::NotDisplayed) => {
                        self.set_status_message(format!("Task {id} is no longer shown"))
                    }
                    Err(e) => self.set_status_message(format!("Error deleting task: {e}")),
                }
                self.clamp_selection();
            }
        }
    }

    fn pending_message(action: &Action) -> &'static str {
        match action {
            Action::Submit => "Saving task...",
            Action::Reload => "Loading tasks...",
            Action::Delete(_) => "Deleting task...",
            Action::None | Action::Quit => "",
        }
    }

    /// Render the card list with a detail pane for the selected card.
    fn render_task_list(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(6),
            ])
            .split(area);

        let header_text = vec![Line::from(vec![
            Span::styled("TASK BOARD", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                format!("Showing: {}", self.board.list().filter()),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ),
        ])];
        let header = Paragraph::new(header_text)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        f.render_widget(header, chunks[0]);

        let header_cells = ["", "ID", "Status", "Due", "Budget", "Title"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD)));
        let header_row = Row::new(header_cells)
            .style(Style::default().bg(ACCENT).fg(Color::Rgb(20, 20, 20)))
            .height(1);

        let visible = self.visible_units();
        let total = self.board.list().len();
        let rows: Vec<Row> = visible
            .iter()
            .map(|unit| {
                let badge = badge_color(unit.badge);
                Row::new(vec![
                    Cell::from("██").style(Style::default().fg(hex_color(&unit.color))),
                    Cell::from(unit.id.as_ref().map(|id| id.to_string()).unwrap_or_default()),
                    Cell::from(unit.status.clone())
                        .style(Style::default().bg(badge).fg(Color::White)),
                    Cell::from(unit.date.clone()),
                    Cell::from(unit.budget.clone()).style(Style::default().fg(Color::Green)),
                    Cell::from(unit.title.clone()),
                ])
            })
            .collect();
        let shown = rows.len();

        let widths = [
            Constraint::Length(2),
            Constraint::Length(10),
            Constraint::Length(13),
            Constraint::Length(24),
            Constraint::Length(14),
            Constraint::Min(20),
        ];
        let table = Table::new(rows, widths)
            .header(header_row)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Tasks ({shown}/{total}) - Press 'h' for help")),
            )
            .row_highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol(">> ");

        self.task_list_state
            .select(if shown == 0 { None } else { Some(self.selected.min(shown - 1)) });
        f.render_stateful_widget(table, chunks[1], &mut self.task_list_state);

        let detail = match self.selected_unit() {
            Some(unit) => vec![
                Line::from(Span::styled(
                    unit.title.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(unit.description.clone()),
                Line::from(format!("Due {}  |  Budget {}", unit.date, unit.budget)),
            ],
            None => vec![Line::from("No tasks to show. Press 'a' to add one.")],
        };
        let detail = Paragraph::new(detail)
            .block(Block::default().borders(Borders::ALL).title("Details"))
            .wrap(Wrap { trim: true });
        f.render_widget(detail, chunks[2]);
    }

    fn render_input(
        &self,
        f: &mut Frame,
        area: Rect,
        order: usize,
        label: &str,
        input: &InputField,
    ) {
        let error = TaskForm::validated_field(order).and_then(|field| self.task_form.errors.message(field));
        let border = if error.is_some() {
            Style::default().fg(Color::Red)
        } else if self.task_form.current_field == order {
            Style::default().fg(GOLD)
        } else {
            Style::default()
        };
        let mut block = Block::default()
            .borders(Borders::ALL)
            .title(label.to_string())
            .border_style(border);
        if let Some(msg) = error {
            block = block.title_bottom(Line::from(Span::styled(msg, Style::default().fg(Color::Red))));
        }
        f.render_widget(Paragraph::new(input.value.as_str()).block(block), area);

        if self.task_form.current_field == order {
            f.set_cursor_position((cursor_column(area, input.cursor), area.y + 1));
        }
    }

    /// Render the new-task form with inline validation errors.
    fn render_task_form(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(3), // Description
                Constraint::Length(3), // Color
                Constraint::Length(3), // Due date
                Constraint::Length(3), // Status
                Constraint::Length(3), // Budget
                Constraint::Min(1),    // Instructions
            ])
            .split(area);

        let form = &self.task_form;
        self.render_input(f, chunks[0], TITLE_GLOBAL_ORDER, "Title *", &form.title);
        self.render_input(f, chunks[1], DESCRIPTION_GLOBAL_ORDER, "Description *", &form.description);
        self.render_input(f, chunks[2], COLOR_GLOBAL_ORDER, "Color (#rrggbb)", &form.color);
        self.render_input(f, chunks[3], DATE_GLOBAL_ORDER, "Due date * (YYYY-MM-DDTHH:MM)", &form.date);

        let status_style = if form.current_field == STATUS_GLOBAL_ORDER {
            Style::default().fg(GOLD)
        } else {
            Style::default()
        };
        let status = form.selected_status();
        let selector = Paragraph::new(Line::from(vec![
            Span::raw("< "),
            Span::styled(
                status.label(),
                Style::default().fg(badge_color(BadgeCategory::for_label(status.label()))),
            ),
            Span::raw(" >"),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Status")
                .border_style(status_style),
        );
        f.render_widget(selector, chunks[4]);

        self.render_input(f, chunks[5], BUDGET_GLOBAL_ORDER, "Budget * ($)", &form.budget);

        let help = Paragraph::new(vec![
            Line::from("Tab/Down: next field  Shift+Tab/Up: previous field"),
            Line::from("Left/Right: move cursor or change status"),
            Line::from("Enter: save  Esc: back to list"),
        ])
        .style(Style::default().fg(Color::DarkGray));
        f.render_widget(help, chunks[6]);
    }

    fn render_help(&mut self, f: &mut Frame, area: Rect) {
        let text = vec![
            Line::from(Span::styled("Keys", Style::default().add_modifier(Modifier::BOLD))),
            Line::from(""),
            Line::from("a        add a task"),
            Line::from("d / Del  delete the selected task"),
            Line::from("r        reload tasks from the API"),
            Line::from("1        show all tasks"),
            Line::from("2..5     show new / in progress / blocked / done"),
            Line::from("j k      move selection"),
            Line::from("q / Esc  quit"),
        ];
        let help = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title("Help"))
            .wrap(Wrap { trim: false });
        f.render_widget(help, area);
    }

    fn render_confirm(&mut self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Confirm Delete")
            .borders(Borders::ALL)
            .style(Style::default().bg(DARK_RED));

        let area = centered_rect(50, 30, area);
        f.render_widget(Clear, area);

        let target = self
            .confirm_target
            .as_ref()
            .map(|u| format!("{} (ID {})", u.title, u.id.as_ref().map(|i| i.as_str()).unwrap_or("-")))
            .unwrap_or_default();
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Delete this task?",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(target),
            Line::from(""),
            Line::from("Press 'y' to confirm, 'n' to cancel"),
        ];
        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_status_bar(&mut self, f: &mut Frame, area: Rect) {
        let text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match self.state {
                AppState::TaskList => format!(
                    "Tasks: {} | Press 'h' for help",
                    self.board.list().visible().count()
                ),
                AppState::AddTask => "Add New Task".to_string(),
                AppState::Help => "Help".to_string(),
                AppState::Confirm => "Confirm Delete".to_string(),
            }
        };
        let status = Paragraph::new(text)
            .style(Style::default().bg(ACCENT).fg(Color::Rgb(20, 20, 20)))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    /// Draw the current screen.
    pub fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(f.area());

        match self.state {
            AppState::TaskList => self.render_task_list(f, chunks[0]),
            AppState::AddTask => self.render_task_form(f, chunks[0]),
            AppState::Help => self.render_help(f, chunks[0]),
            AppState::Confirm => {
                self.render_task_list(f, chunks[0]);
                self.render_confirm(f, chunks[0]);
            }
        }
        self.render_status_bar(f, chunks[1]);
    }

    /// Poll for a key press and translate it into an action.
    fn poll_input(&mut self) -> io::Result<Action> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(self.handle_key(key.code));
                }
            }
        }
        Ok(Action::None)
    }

    /// Main event loop: load tasks, then draw and handle input until quit.
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        let mut next = Action::Reload;
        loop {
            match next {
                Action::Quit => break,
                Action::None => {}
                action => {
                    self.set_status_message(Self::pending_message(&action));
                    terminal.draw(|f| self.render(f))?;
                    self.perform(action).await;
                }
            }
            terminal.draw(|f| self.render(f))?;
            next = self.poll_input()?;
        }
        Ok(())
    }
}
