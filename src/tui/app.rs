//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which owns the task store, routes key
//! presses to the list and detail controllers, and renders the list, add form,
//! detail view, help and delete confirmation screens.

use std::collections::BTreeSet;
use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{error, info};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};

use crate::controller::{DetailController, ListController, ListPresentation};
use crate::db::{format_check, format_created_long, format_created_short, StoreError, TaskStore};
use crate::fields::Priority;
use crate::tui::{
    colors::{priority_color, BAR_BG, DONE_GREEN, PRIORITY_RED},
    enums::{AddField, AppState, DetailField},
    input::InputField,
    utils::centered_rect,
};

const COMMENT_PLACEHOLDER: &str = "Add a note to this task...";

/// Main application state for the terminal user interface.
pub struct App {
    state: AppState,
    store: TaskStore,
    list: ListController,
    list_state: TableState,
    marked: BTreeSet<usize>,
    pending_delete: Vec<usize>,
    title_input: InputField,
    add_field: AddField,
    detail: Option<DetailController>,
    detail_field: DetailField,
    comment_input: InputField,
    status_message: String,
}

impl App {
    /// Create the app with the list view mounted.
    pub fn new(store: TaskStore) -> Self {
        let list = ListController::new(&store);
        let mut app = App {
            state: AppState::TaskList,
            store,
            list,
            list_state: TableState::default(),
            marked: BTreeSet::new(),
            pending_delete: Vec::new(),
            title_input: InputField::new(),
            add_field: AddField::Title,
            detail: None,
            detail_field: DetailField::Completed,
            comment_input: InputField::new(),
            status_message: String::new(),
        };
        app.clamp_selection();
        app
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn list(&self) -> &ListController {
        &self.list
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn selected(&self) -> Option<usize> {
        self.list_state
            .selected()
            .filter(|&i| i < self.list.rows().len())
    }

    /// Set a status message to display in the status bar.
    fn set_status_message(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    /// Clear the current status message.
    fn clear_status_message(&mut self) {
        self.status_message.clear();
    }

    fn report_error(&mut self, err: StoreError) {
        error!("event=tui_action module=tui status=error error={}", err);
        self.set_status_message(format!("Error saving: {}", err));
    }

    fn clamp_selection(&mut self) {
        let len = self.list.rows().len();
        match self.list_state.selected() {
            _ if len == 0 => self.list_state.select(None),
            Some(i) if i >= len => self.list_state.select(Some(len - 1)),
            None => self.list_state.select(Some(0)),
            _ => {}
        }
    }

    /// Pick up store changes made outside the list controller.
    fn sync_list(&mut self) {
        if self.list.sync(&self.store) {
            self.marked.clear();
            self.clamp_selection();
        }
    }

    /// Handle keyboard input when in the task list view.
    ///
    /// Returns true if the application should quit.
    fn handle_task_list_input(&mut self, key: KeyCode, _modifiers: KeyModifiers) -> bool {
        match key {
            KeyCode::Char('q') => return true,
            KeyCode::Esc => {
                if self.marked.is_empty() {
                    return true;
                }
                self.marked.clear();
                self.set_status_message("Selection cleared");
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if let Some(selected) = self.selected() {
                    if selected > 0 {
                        self.list_state.select(Some(selected - 1));
                    }
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if let Some(selected) = self.selected() {
                    if selected + 1 < self.list.rows().len() {
                        self.list_state.select(Some(selected + 1));
                    }
                }
            }
            KeyCode::Enter => {
                if let Some(task) = self.selected().and_then(|i| self.list.row(i)) {
                    let id = task.id;
                    self.enter_detail(id);
                }
            }
            KeyCode::Char('a') => {
                self.list.open_add_form();
                self.title_input = InputField::with_value(self.list.draft_title());
                self.add_field = AddField::Title;
                self.state = AppState::AddTask;
            }
            KeyCode::Char(' ') | KeyCode::Char('c') => {
                if let Some(task) = self.selected().and_then(|i| self.list.row(i)) {
                    let id = task.id;
                    match self.list.toggle_complete(&mut self.store, id) {
                        Ok(Some(true)) => self.set_status_message("Task completed"),
                        Ok(Some(false)) => self.set_status_message("Task reopened"),
                        Ok(None) => {}
                        Err(e) => self.report_error(e),
                    }
                }
            }
            KeyCode::Char('x') => {
                if let Some(selected) = self.selected() {
                    if !self.marked.remove(&selected) {
                        self.marked.insert(selected);
                    }
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                self.pending_delete = if self.marked.is_empty() {
                    self.selected().into_iter().collect()
                } else {
                    self.marked.iter().copied().collect()
                };
                if !self.pending_delete.is_empty() {
                    self.state = AppState::Confirm;
                }
            }
            KeyCode::Char('h') | KeyCode::F(1) => {
                self.state = AppState::Help;
            }
            _ => {}
        }
        false
    }

    /// Handle keyboard input on the add form.
    fn handle_add_input(&mut self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        let ctrl = modifiers.contains(KeyModifiers::CONTROL);
        match key {
            KeyCode::Esc => {
                self.list.cancel_add();
                self.state = AppState::TaskList;
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.add_field = self.add_field.next();
            }
            KeyCode::Enter => match self.list.submit_add(&mut self.store) {
                Ok(Some(task)) => {
                    info!("event=tui_add module=tui status=ok id={}", task.id);
                    self.title_input.clear();
                    self.marked.clear();
                    let pos = self.list.position_of(task.id);
                    self.list_state.select(pos);
                    self.state = AppState::TaskList;
                    self.set_status_message("Task created");
                }
                Ok(None) => {}
                Err(e) => self.report_error(e),
            },
            _ => match self.add_field {
                AddField::Title => {
                    match key {
                        KeyCode::Char(c) if !ctrl => self.title_input.handle_char(c),
                        KeyCode::Backspace => self.title_input.handle_backspace(),
                        KeyCode::Delete => self.title_input.handle_delete(),
                        KeyCode::Left => self.title_input.move_cursor_left(),
                        KeyCode::Right => self.title_input.move_cursor_right(),
                        KeyCode::Home => self.title_input.move_home(),
                        KeyCode::End => self.title_input.move_end(),
                        _ => {}
                    }
                    self.list.set_draft_title(self.title_input.value.clone());
                }
                AddField::Priority => match key {
                    KeyCode::Left => {
                        let p = self.list.draft_priority().cycle(false);
                        self.list.set_draft_priority(p);
                    }
                    KeyCode::Right => {
                        let p = self.list.draft_priority().cycle(true);
                        self.list.set_draft_priority(p);
                    }
                    _ => {}
                },
            },
        }
        false
    }

    fn enter_detail(&mut self, id: uuid::Uuid) {
        if let Some(detail) = DetailController::open(&self.store, id) {
            self.comment_input = InputField::with_value(detail.comment_draft());
            self.detail = Some(detail);
            self.detail_field = DetailField::Completed;
            self.state = AppState::TaskDetail;
        }
    }

    /// Commit the comment and return to the list. `done` picks the explicit Done path.
    fn leave_detail(&mut self, done: bool) {
        if let Some(mut detail) = self.detail.take() {
            detail.set_comment_draft(self.comment_input.value.clone());
            let result = if done {
                detail.confirm_done(&mut self.store)
            } else {
                detail.on_exit(&mut self.store)
            };
            if let Err(e) = result {
                self.report_error(e);
            }
        }
        self.comment_input.clear();
        self.state = AppState::TaskList;
        self.sync_list();
    }

    /// Handle keyboard input when viewing task details.
    fn handle_detail_input(&mut self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        if key == KeyCode::Char('s') && modifiers.contains(KeyModifiers::CONTROL) {
            self.leave_detail(true);
            return false;
        }
        match key {
            KeyCode::Esc => {
                self.leave_detail(false);
                return false;
            }
            KeyCode::Tab => {
                self.detail_field = self.detail_field.next();
                return false;
            }
            KeyCode::BackTab => {
                self.detail_field = self.detail_field.prev();
                return false;
            }
            _ => {}
        }

        let Some(detail) = self.detail.as_mut() else {
            self.state = AppState::TaskList;
            return false;
        };
        let result = match self.detail_field {
            DetailField::Completed => match key {
                KeyCode::Char(' ') | KeyCode::Enter => detail.toggle_completed(&mut self.store),
                _ => Ok(()),
            },
            DetailField::Priority => match key {
                KeyCode::Left => detail.cycle_priority(&mut self.store, false),
                KeyCode::Right => detail.cycle_priority(&mut self.store, true),
                KeyCode::Char('0') => detail.set_priority(&mut self.store, Priority::Low),
                KeyCode::Char('1') => detail.set_priority(&mut self.store, Priority::Medium),
                KeyCode::Char('2') => detail.set_priority(&mut self.store, Priority::High),
                _ => Ok(()),
            },
            DetailField::Comment => {
                match key {
                    KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
                        self.comment_input.handle_char(c)
                    }
                    KeyCode::Enter => self.comment_input.handle_char('\n'),
                    KeyCode::Backspace => self.comment_input.handle_backspace(),
                    KeyCode::Delete => self.comment_input.handle_delete(),
                    KeyCode::Left => self.comment_input.move_cursor_left(),
                    KeyCode::Right => self.comment_input.move_cursor_right(),
                    KeyCode::Home => self.comment_input.move_home(),
                    KeyCode::End => self.comment_input.move_end(),
                    _ => {}
                }
                detail.set_comment_draft(self.comment_input.value.clone());
                Ok(())
            }
        };
        if let Err(e) = result {
            self.report_error(e);
        }
        false
    }

    /// Handle keyboard input in the confirmation dialog.
    fn handle_confirm_input(&mut self, key: KeyCode, _modifiers: KeyModifiers) -> bool {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                let positions = std::mem::take(&mut self.pending_delete);
                match self.list.delete_at(&mut self.store, &positions) {
                    Ok(n) => self.set_status_message(format!("Deleted {} task(s)", n)),
                    Err(e) => self.report_error(e),
                }
                self.marked.clear();
                self.clamp_selection();
                self.state = AppState::TaskList;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.pending_delete.clear();
                self.state = AppState::TaskList;
            }
            _ => {}
        }
        false
    }

    fn handle_help_input(&mut self, key: KeyCode, _modifiers: KeyModifiers) -> bool {
        if matches!(key, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('h')) {
            self.state = AppState::TaskList;
        }
        false
    }

    /// Route one key press based on current application state.
    ///
    /// Returns true if the application should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind == KeyEventKind::Release {
            return false;
        }
        self.clear_status_message();

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            if self.state == AppState::TaskDetail {
                self.leave_detail(false);
            }
            return true;
        }

        match self.state {
            AppState::TaskList => self.handle_task_list_input(key.code, key.modifiers),
            AppState::AddTask => self.handle_add_input(key.code, key.modifiers),
            AppState::TaskDetail => self.handle_detail_input(key.code, key.modifiers),
            AppState::Confirm => self.handle_confirm_input(key.code, key.modifiers),
            AppState::Help => self.handle_help_input(key.code, key.modifiers),
        }
    }

    /// Poll for and handle keyboard events.
    ///
    /// Returns true if the application should quit.
    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                return Ok(self.handle_key(key));
            }
        }
        Ok(false)
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let done = self.list.rows().iter().filter(|t| t.is_completed).count();
        let open = self.list.rows().len() - done;
        let header = Paragraph::new(Line::from(vec![
            Span::styled("MY TASKS", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                format!("{} open, {} done", open, done),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ),
        ]))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
        f.render_widget(header, area);
    }

    /// Render the task list, or the empty state when there are no tasks.
    fn render_task_list(&mut self, f: &mut Frame, area: Rect) {
        if self.list.presentation() == ListPresentation::Empty {
            let text = vec![
                Line::from(""),
                Line::from(Span::styled("No tasks", Style::default().add_modifier(Modifier::BOLD))),
                Line::from(""),
                Line::from("Press 'a' to add your first task"),
            ];
            let empty = Paragraph::new(text)
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Center);
            f.render_widget(empty, area);
            return;
        }

        let rows: Vec<Row> = self
            .list
            .rows()
            .iter()
            .enumerate()
            .map(|(i, task)| {
                let mark = if self.marked.contains(&i) { "•" } else { " " };
                let check_style = if task.is_completed {
                    Style::default().fg(DONE_GREEN)
                } else {
                    Style::default().fg(Color::Gray)
                };
                let title_style = if task.is_completed {
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::CROSSED_OUT)
                } else {
                    Style::default().fg(Color::White)
                };
                let indicator = task
                    .priority
                    .row_indicator()
                    .map(|s| Span::styled(s, Style::default().fg(priority_color(task.priority))))
                    .unwrap_or_else(|| Span::raw(""));
                Row::new(vec![
                    Cell::from(Span::styled(mark, Style::default().fg(PRIORITY_RED))),
                    Cell::from(Span::styled(format_check(task.is_completed), check_style)),
                    Cell::from(Span::styled(task.title.clone(), title_style)),
                    Cell::from(Span::styled(
                        format_created_short(task.created_at),
                        Style::default().fg(Color::DarkGray),
                    )),
                    Cell::from(indicator),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(20),
            Constraint::Length(13),
            Constraint::Length(1),
        ];
        let table = Table::new(rows, widths)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Tasks ({}) - Press 'h' for help", self.list.rows().len())),
            )
            .row_highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, area, &mut self.list_state);
    }

    /// Low/Medium/High selector with the current level highlighted.
    fn priority_selector(current: Priority, focused: bool) -> Line<'static> {
        let mut spans = Vec::new();
        for p in Priority::ALL {
            let label = format!(" {} {} ", p.symbol(), p.label());
            let style = if p == current {
                Style::default()
                    .bg(priority_color(p))
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            spans.push(Span::styled(label, style));
            spans.push(Span::raw(" "));
        }
        if focused {
            spans.push(Span::styled("◀ ▶", Style::default().fg(Color::Yellow)));
        }
        Line::from(spans)
    }

    fn field_label(text: &str, focused: bool) -> Span<'static> {
        let style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        Span::styled(text.to_string(), style)
    }

    /// Render the add form as a popup over the list.
    fn render_add_form(&mut self, f: &mut Frame, area: Rect) {
        self.render_task_list(f, area);

        let popup = centered_rect(60, 50, area);
        f.render_widget(Clear, popup);
        let block = Block::default().title("New Task").borders(Borders::ALL);
        let inner = block.inner(popup);
        f.render_widget(block, popup);

        let title_focused = self.add_field == AddField::Title;
        let add_style = if self.list.can_submit() {
            Style::default().fg(DONE_GREEN).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let title_line = if self.title_input.value.is_empty() {
            Line::from(Span::styled("What needs to be done?", Style::default().fg(Color::DarkGray)))
        } else {
            Line::from(self.title_input.value.clone())
        };
        let text = vec![
            Line::from(Self::field_label("Title", title_focused)),
            title_line,
            Line::from(""),
            Line::from(Self::field_label("Priority", !title_focused)),
            Self::priority_selector(self.list.draft_priority(), !title_focused),
            Line::from(""),
            Line::from(vec![
                Span::styled("Enter: Add", add_style),
                Span::raw("   Tab: Next field   Esc: Cancel"),
            ]),
        ];
        f.render_widget(Paragraph::new(text), inner);

        if title_focused {
            let x = inner.x + (self.title_input.cursor as u16).min(inner.width.saturating_sub(1));
            f.set_cursor_position((x, inner.y + 1));
        }
    }

    /// Render the detail view of the open task.
    fn render_task_detail(&mut self, f: &mut Frame, area: Rect) {
        let Some(task) = self.detail.as_ref().and_then(|d| d.task(&self.store)).cloned() else {
            let missing = Paragraph::new("This task no longer exists. Press Esc to go back.")
                .block(Block::default().borders(Borders::ALL).title("Task Details"));
            f.render_widget(missing, area);
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(8), Constraint::Length(5), Constraint::Min(3)])
            .split(area);

        let bold = Style::default().add_modifier(Modifier::BOLD);
        let info = vec![
            Line::from(vec![Span::styled("Title: ", bold), Span::raw(task.title.clone())]),
            Line::from(""),
            Line::from(vec![
                Self::field_label("Completed: ", self.detail_field == DetailField::Completed),
                Span::styled(
                    format_check(task.is_completed),
                    Style::default().fg(if task.is_completed { DONE_GREEN } else { Color::Gray }),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Created: ", bold),
                Span::styled(format_created_long(task.created_at), Style::default().fg(Color::DarkGray)),
            ]),
        ];
        f.render_widget(
            Paragraph::new(info).block(Block::default().borders(Borders::ALL).title("Task")),
            chunks[0],
        );

        let priority_focused = self.detail_field == DetailField::Priority;
        let priority = vec![
            Self::priority_selector(task.priority, priority_focused),
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    format!("{} ", task.priority.symbol()),
                    Style::default().fg(priority_color(task.priority)),
                ),
                Span::styled(task.priority.description(), Style::default().fg(Color::Gray)),
            ]),
        ];
        let priority_title = if priority_focused { "Priority *" } else { "Priority" };
        f.render_widget(
            Paragraph::new(priority).block(Block::default().borders(Borders::ALL).title(priority_title)),
            chunks[1],
        );

        let comment_focused = self.detail_field == DetailField::Comment;
        let comment_block = Block::default()
            .borders(Borders::ALL)
            .title(if comment_focused { "Comment *" } else { "Comment" })
            .border_style(if comment_focused {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            });
        let inner = comment_block.inner(chunks[2]);
        f.render_widget(comment_block, chunks[2]);
        let comment = if self.comment_input.value.is_empty() {
            Paragraph::new(Span::styled(COMMENT_PLACEHOLDER, Style::default().fg(Color::DarkGray)))
        } else {
            let lines: Vec<Line> = self
                .comment_input
                .value
                .split('\n')
                .map(|l| Line::from(l.to_string()))
                .collect();
            Paragraph::new(lines).wrap(Wrap { trim: false })
        };
        f.render_widget(comment, inner);

        if comment_focused && inner.width > 0 && inner.height > 0 {
            let (col, line) = self.comment_input.cursor_line_col();
            let x = inner.x + (col as u16).min(inner.width - 1);
            let y = inner.y + (line as u16).min(inner.height - 1);
            f.set_cursor_position((x, y));
        }
    }

    fn render_help(&mut self, f: &mut Frame, area: Rect) {
        let heading = |s: &'static str| {
            Line::from(Span::styled(s, Style::default().add_modifier(Modifier::BOLD)))
        };
        let help_text = vec![
            heading("Task List:"),
            Line::from("  ↑/↓ k/j      Move selection"),
            Line::from("  Enter        Open task details"),
            Line::from("  a            Add new task"),
            Line::from("  Space/c      Toggle completion"),
            Line::from("  x            Mark task for deletion"),
            Line::from("  d/Del        Delete marked tasks (or the selected one)"),
            Line::from("  h/F1         Show this help"),
            Line::from("  q/Esc/Ctrl+C Quit"),
            Line::from(""),
            heading("New Task:"),
            Line::from("  Tab          Switch between title and priority"),
            Line::from("  ←/→          Change priority"),
            Line::from("  Enter        Add task"),
            Line::from("  Esc          Cancel"),
            Line::from(""),
            heading("Task Details:"),
            Line::from("  Tab/Shift+Tab Move between fields"),
            Line::from("  Space        Toggle completion"),
            Line::from("  ←/→ 0/1/2    Change priority"),
            Line::from("  Ctrl+S       Done"),
            Line::from("  Esc          Back to list (comment is saved)"),
        ];

        let paragraph = Paragraph::new(help_text)
            .block(Block::default().borders(Borders::ALL).title("Help - Press Esc to return"))
            .wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
    }

    /// Render a confirmation dialog for deletion.
    fn render_confirm(&mut self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Confirm Delete")
            .borders(Borders::ALL)
            .style(Style::default().bg(PRIORITY_RED).fg(Color::White));

        let area = centered_rect(50, 30, area);
        f.render_widget(Clear, area);

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("Delete {} task(s)?", self.pending_delete.len()),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Press 'y' to confirm, 'n' to cancel"),
        ];
        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    /// Render the status bar at the bottom of the screen.
    fn render_status_bar(&mut self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match self.state {
                AppState::TaskList if !self.marked.is_empty() => {
                    format!("{} marked | d: delete | Esc: clear", self.marked.len())
                }
                AppState::TaskList => "a: add | Enter: details | Space: done | h: help".to_string(),
                AppState::AddTask => "New Task".to_string(),
                AppState::TaskDetail => "Task Details | Ctrl+S: Done | Esc: back".to_string(),
                AppState::Help => "Help".to_string(),
                AppState::Confirm => "Confirm Delete".to_string(),
            }
        };
        let status = Paragraph::new(status_text)
            .style(Style::default().bg(BAR_BG).fg(Color::White))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    /// Main render function that dispatches to appropriate view renderers.
    pub fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)])
            .split(f.area());

        self.render_header(f, chunks[0]);
        match self.state {
            AppState::TaskList => self.render_task_list(f, chunks[1]),
            AppState::AddTask => self.render_add_form(f, chunks[1]),
            AppState::TaskDetail => self.render_task_detail(f, chunks[1]),
            AppState::Help => self.render_help(f, chunks[1]),
            AppState::Confirm => {
                self.render_task_list(f, chunks[1]);
                self.render_confirm(f, chunks[1]);
            }
        }
        self.render_status_bar(f, chunks[2]);
    }

    /// Main event loop for the TUI application.
    ///
    /// Handles rendering and input processing until the user exits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        info!("event=tui_start module=tui status=ok tasks={}", self.store.len());
        loop {
            self.sync_list();
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        if self.state == AppState::TaskDetail {
            self.leave_detail(false);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn render_to_string(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        let buf = terminal.backend().buffer().clone();
        let w = buf.area.width as usize;
        buf.content
            .chunks(w)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn add_task(app: &mut App, title: &str) {
        app.handle_key(key(KeyCode::Char('a')));
        type_text(app, title);
        app.handle_key(key(KeyCode::Enter));
    }

    #[test]
    fn empty_store_shows_empty_state() {
        let mut app = App::new(TaskStore::in_memory());
        let screen = render_to_string(&mut app);
        assert!(screen.contains("No tasks"));
        assert!(screen.contains("Press 'a' to add your first task"));
    }

    #[test]
    fn add_form_creates_task() {
        let mut app = App::new(TaskStore::in_memory());
        app.handle_key(key(KeyCode::Char('a')));
        assert_eq!(app.state(), AppState::AddTask);
        type_text(&mut app, "Buy milk");
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.state(), AppState::TaskList);
        let tasks = app.store().all();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Buy milk");
        assert_eq!(tasks[0].priority, Priority::High);
        assert_eq!(app.selected(), Some(0));
        assert!(render_to_string(&mut app).contains("Buy milk"));
    }

    #[test]
    fn blank_title_keeps_form_open() {
        let mut app = App::new(TaskStore::in_memory());
        add_task(&mut app, "   ");
        assert_eq!(app.state(), AppState::AddTask);
        assert!(app.store().is_empty());
        assert!(app.status_message().is_empty());
    }

    #[test]
    fn space_toggles_selected_task() {
        let mut app = App::new(TaskStore::in_memory());
        add_task(&mut app, "a");
        app.handle_key(key(KeyCode::Char(' ')));
        assert!(app.store().all()[0].is_completed);
        app.handle_key(key(KeyCode::Char(' ')));
        assert!(!app.store().all()[0].is_completed);
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut app = App::new(TaskStore::in_memory());
        add_task(&mut app, "keep");
        add_task(&mut app, "drop");

        app.handle_key(key(KeyCode::Char('d')));
        assert_eq!(app.state(), AppState::Confirm);
        app.handle_key(key(KeyCode::Char('n')));
        assert_eq!(app.store().len(), 2);

        let target = app.list().row(app.selected().unwrap()).unwrap().id;
        app.handle_key(key(KeyCode::Char('d')));
        app.handle_key(key(KeyCode::Char('y')));
        assert_eq!(app.store().len(), 1);
        assert!(app.store().get(target).is_none());
    }

    #[test]
    fn marked_rows_are_deleted_together() {
        let mut app = App::new(TaskStore::in_memory());
        for t in ["a", "b", "c"] {
            add_task(&mut app, t);
        }
        app.list_state.select(Some(0));
        app.handle_key(key(KeyCode::Char('x')));
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Char('x')));
        let keep = app.list().row(1).unwrap().id;

        app.handle_key(key(KeyCode::Char('d')));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.store().len(), 1);
        assert!(app.store().get(keep).is_some());
    }

    #[test]
    fn detail_edits_reach_the_list() {
        let mut app = App::new(TaskStore::in_memory());
        add_task(&mut app, "Buy milk");
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.state(), AppState::TaskDetail);

        app.handle_key(key(KeyCode::Char(' ')));
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Char('2')));
        app.handle_key(key(KeyCode::Tab));
        type_text(&mut app, "2%");
        assert_eq!(app.store().all()[0].comment, None);

        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.state(), AppState::TaskList);
        let task = &app.list().rows()[0];
        assert!(task.is_completed);
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.comment.as_deref(), Some("2%"));
    }

    #[test]
    fn ctrl_s_commits_and_clears_comment() {
        let mut app = App::new(TaskStore::in_memory());
        add_task(&mut app, "a");
        app.handle_key(key(KeyCode::Enter));
        app.handle_key(key(KeyCode::BackTab));
        type_text(&mut app, "x");
        app.handle_key(ctrl('s'));
        assert_eq!(app.store().all()[0].comment.as_deref(), Some("x"));

        app.handle_key(key(KeyCode::Enter));
        app.handle_key(key(KeyCode::BackTab));
        app.handle_key(key(KeyCode::Backspace));
        app.handle_key(ctrl('s'));
        assert_eq!(app.store().all()[0].comment, None);
    }

    #[test]
    fn detail_screen_shows_priority_description() {
        let mut app = App::new(TaskStore::in_memory());
        add_task(&mut app, "a");
        app.handle_key(key(KeyCode::Enter));
        let screen = render_to_string(&mut app);
        assert!(screen.contains("Medium priority - routine task"));
        assert!(screen.contains(COMMENT_PLACEHOLDER));
    }

    #[test]
    fn control_chars_are_not_typed() {
        let mut app = App::new(TaskStore::in_memory());
        app.handle_key(key(KeyCode::Char('a')));
        type_text(&mut app, "ab");
        app.handle_key(ctrl('a'));
        assert_eq!(app.list().draft_title(), "ab");
        app.handle_key(key(KeyCode::Enter));

        app.handle_key(key(KeyCode::Enter));
        app.handle_key(key(KeyCode::BackTab));
        type_text(&mut app, "n");
        app.handle_key(ctrl('e'));
        app.handle_key(ctrl('s'));
        assert_eq!(app.store().all()[0].comment.as_deref(), Some("n"));
    }

    #[test]
    fn ctrl_c_quits_from_any_screen() {
        let mut app = App::new(TaskStore::in_memory());
        app.handle_key(key(KeyCode::Char('a')));
        assert!(app.handle_key(ctrl('c')));
    }
}
