//! Main application logic for the terminal user interface.
//!
//! `App` owns the task store and an optional window host. Key presses are
//! turned into [`Command`]s and applied to the store; every frame is rendered
//! from the store's current list through the derived views.

use std::io;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Gauge, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use tracing::{debug, info};

use crate::command::Command;
use crate::db::TaskStorage;
use crate::fields::{Priority, StatusFilter};
use crate::store::TaskStore;
use crate::task::Task;
use crate::tui::{
    colors::{priority_color, NIGHT_MUTED, PETAL_WHITE, SAKURA_DEEP, SAKURA_PINK},
    enums::{AppState, InputMode},
    input::InputField,
    task_form::{TaskForm, CATEGORY_FIELD, NEW_CATEGORY_FIELD, NOTES_FIELD, PRIORITY_FIELD, TEXT_FIELD},
    utils::centered_rect,
};
use crate::views;
use crate::window::{WindowEvent, WindowHost, WindowState, Zoom};

/// Main application state for the terminal user interface.
pub struct App<S: TaskStorage> {
    state: AppState,
    store: TaskStore<S>,
    window: Option<Box<dyn WindowHost>>,
    window_rx: Option<Receiver<WindowState>>,
    window_state: WindowState,
    task_list_state: TableState,
    /// Ids of the tasks shown in the table, in display order.
    filtered_tasks: Vec<String>,
    status_filter: StatusFilter,
    /// Empty means every category.
    category_filter: String,
    task_form: TaskForm,
    edit_field: InputField,
    input_mode: InputMode,
    status_message: String,
    /// Id of the task awaiting delete confirmation.
    confirm_action: Option<String>,
}

impl<S: TaskStorage> App<S> {
    pub fn new(store: TaskStore<S>, mut window: Option<Box<dyn WindowHost>>) -> Self {
        let window_rx = window.as_mut().map(|w| w.subscribe());
        let window_state = window.as_ref().map_or(
            WindowState {
                is_focused: true,
                ..WindowState::default()
            },
            |w| w.state(),
        );
        let task_form = TaskForm::new(&views::categories(store.list()));

        let mut app = App {
            state: AppState::TaskList,
            store,
            window,
            window_rx,
            window_state,
            task_list_state: TableState::default(),
            filtered_tasks: Vec::new(),
            status_filter: StatusFilter::All,
            category_filter: String::new(),
            task_form,
            edit_field: InputField::new(),
            input_mode: InputMode::None,
            status_message: String::new(),
            confirm_action: None,
        };
        app.update_filtered_tasks();
        app
    }

    /// Recompute the visible ids from the filters, keeping the selected task
    /// selected when it is still visible.
    fn update_filtered_tasks(&mut self) {
        let old_index = self.task_list_state.selected().unwrap_or(0);
        let old_id = self.selected_task().map(|t| t.id.clone());

        self.filtered_tasks = views::filter(self.store.list(), self.status_filter, &self.category_filter)
            .into_iter()
            .map(|t| t.id.clone())
            .collect();

        let index = old_id
            .and_then(|id| self.filtered_tasks.iter().position(|t| *t == id))
            .or_else(|| {
                (!self.filtered_tasks.is_empty()).then(|| old_index.min(self.filtered_tasks.len() - 1))
            });
        self.task_list_state.select(index);
    }

    fn selected_task(&self) -> Option<&Task> {
        let index = self.task_list_state.selected()?;
        let id = self.filtered_tasks.get(index)?;
        self.store.get(id)
    }

    fn select_offset(&mut self, forward: bool) {
        let len = self.filtered_tasks.len();
        if len == 0 {
            return;
        }
        let current = self.task_list_state.selected().unwrap_or(0);
        let next = if forward {
            (current + 1).min(len - 1)
        } else {
            current.saturating_sub(1)
        };
        self.task_list_state.select(Some(next));
    }

    fn set_status_message(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    /// Apply a command and report the outcome in the status bar.
    fn apply_command(&mut self, command: Command, done: &str) {
        let changed = self.store.apply(command);
        self.update_filtered_tasks();
        match self.store.last_save_error() {
            Some(err) if changed => {
                let msg = format!("{done} (not saved: {err})");
                self.set_status_message(msg);
            }
            _ => self.set_status_message(done),
        }
    }

    /// Pull any state pushed by the window host since the last frame.
    fn drain_window_updates(&mut self) {
        if let Some(rx) = &self.window_rx {
            while let Ok(state) = rx.try_recv() {
                self.window_state = state;
            }
        }
    }

    /// Terminal focus changes are window focus changes.
    pub fn handle_focus(&mut self, focused: bool) {
        if let Some(window) = self.window.as_mut() {
            window.handle_event(if focused { WindowEvent::Focus } else { WindowEvent::Blur });
        }
        self.drain_window_updates();
    }

    fn zoom(&self) -> Zoom {
        self.window.as_ref().map_or_else(Zoom::default, |w| w.zoom())
    }

    fn with_window(&mut self, f: impl FnOnce(&mut dyn WindowHost) -> String) {
        let msg = match self.window.as_mut() {
            Some(window) => f(&mut **window),
            None => "No window host".to_string(),
        };
        self.drain_window_updates();
        self.set_status_message(msg);
    }

    fn close(&mut self) -> bool {
        if let Some(window) = self.window.as_mut() {
            window.close();
        }
        info!("closing terminal UI");
        true
    }

    /// Route a key press to the current screen. Returns true when the UI should quit.
    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        self.status_message.clear();
        if modifiers.contains(KeyModifiers::CONTROL) && matches!(key, KeyCode::Char('c') | KeyCode::Char('w')) {
            return self.close();
        }
        match self.state {
            AppState::TaskList => self.handle_task_list_input(key),
            AppState::AddTask => {
                self.handle_form_input(key);
                false
            }
            AppState::EditTask => {
                self.handle_edit_input(key);
                false
            }
            AppState::Help => {
                if matches!(key, KeyCode::Esc | KeyCode::Char('q' | 'h' | '?')) {
                    self.state = AppState::TaskList;
                }
                false
            }
            AppState::Confirm => {
                self.handle_confirm_input(key);
                false
            }
        }
    }

    fn handle_task_list_input(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => return self.close(),
            KeyCode::Up | KeyCode::Char('k') => self.select_offset(false),
            KeyCode::Down | KeyCode::Char('j') => self.select_offset(true),
            KeyCode::Char(' ') | KeyCode::Char('c') => {
                if let Some(task) = self.selected_task() {
                    let msg = if task.completed { "Marked active" } else { "Marked completed" };
                    let id = task.id.clone();
                    self.apply_command(Command::toggle(id), msg);
                }
            }
            KeyCode::Char('a') => {
                self.task_form = TaskForm::new(&views::categories(self.store.list()));
                self.state = AppState::AddTask;
                self.input_mode = InputMode::Text;
            }
            KeyCode::Char('e') => {
                if let Some(task) = self.selected_task() {
                    let mut field = InputField::with_value(&task.text);
                    field.active = true;
                    self.edit_field = field;
                    self.state = AppState::EditTask;
                    self.input_mode = InputMode::Text;
                }
            }
            KeyCode::Char('d') => {
                if let Some(task) = self.selected_task() {
                    self.confirm_action = Some(task.id.clone());
                    self.state = AppState::Confirm;
                }
            }
            KeyCode::Char('f') => {
                self.status_filter = self.status_filter.next();
                self.update_filtered_tasks();
                let msg = format!("Showing {} tasks", self.status_filter.label().to_lowercase());
                self.set_status_message(msg);
            }
            KeyCode::Char('g') => self.cycle_category_filter(),
            KeyCode::Char('h') | KeyCode::Char('?') => self.state = AppState::Help,
            KeyCode::Char('+') | KeyCode::Char('=') => self.set_zoom(self.zoom().zoomed_in()),
            KeyCode::Char('-') => self.set_zoom(self.zoom().zoomed_out()),
            KeyCode::Char('0') => self.set_zoom(Zoom::default()),
            KeyCode::F(9) => self.with_window(|w| {
                w.minimize();
                "Minimized".to_string()
            }),
            KeyCode::F(10) => self.with_window(|w| {
                let msg = if w.toggle_maximize() { "Maximized" } else { "Restored" };
                msg.to_string()
            }),
            KeyCode::F(11) => self.with_window(|w| {
                let msg = if w.toggle_full_screen() { "Full screen" } else { "Left full screen" };
                msg.to_string()
            }),
            _ => {}
        }
        false
    }

    fn cycle_category_filter(&mut self) {
        let mut options = vec![String::new()];
        options.extend(views::categories(self.store.list()));
        let current = options.iter().position(|c| *c == self.category_filter).unwrap_or(0);
        self.category_filter = options[(current + 1) % options.len()].clone();
        self.update_filtered_tasks();
        let msg = if self.category_filter.is_empty() {
            "All categories".to_string()
        } else {
            format!("Category: {}", self.category_filter)
        };
        self.set_status_message(msg);
    }

    fn set_zoom(&mut self, zoom: Zoom) {
        self.with_window(|w| {
            w.set_zoom(zoom);
            format!("Zoom {}%", w.zoom().percent())
        });
    }

    fn handle_form_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.state = AppState::TaskList;
                self.input_mode = InputMode::None;
            }
            KeyCode::Tab => self.task_form.next_field(),
            KeyCode::BackTab => self.task_form.prev_field(),
            KeyCode::Left => self.task_form.handle_left_right(false),
            KeyCode::Right => self.task_form.handle_left_right(true),
            KeyCode::Backspace => self.task_form.handle_backspace(),
            KeyCode::Delete => self.task_form.handle_delete(),
            KeyCode::Enter => match self.task_form.to_command() {
                Ok(command) => {
                    self.apply_command(command, "Task added");
                    self.state = AppState::TaskList;
                    self.input_mode = InputMode::None;
                    if let Some(id) = self.store.list().last().map(|t| t.id.clone()) {
                        if let Some(index) = self.filtered_tasks.iter().position(|t| *t == id) {
                            self.task_list_state.select(Some(index));
                        }
                    }
                }
                Err(e) => self.set_status_message(e.to_string()),
            },
            KeyCode::Char(c) => self.task_form.handle_char(c),
            _ => {}
        }
    }

    fn handle_edit_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.state = AppState::TaskList;
                self.input_mode = InputMode::None;
            }
            KeyCode::Enter => {
                let Some(id) = self.selected_task().map(|t| t.id.clone()) else {
                    self.state = AppState::TaskList;
                    return;
                };
                match Command::edit(id, &self.edit_field.value) {
                    Ok(command) => {
                        self.apply_command(command, "Task updated");
                        self.state = AppState::TaskList;
                        self.input_mode = InputMode::None;
                    }
                    Err(e) => self.set_status_message(e.to_string()),
                }
            }
            KeyCode::Left => self.edit_field.move_cursor_left(),
            KeyCode::Right => self.edit_field.move_cursor_right(),
            KeyCode::Home => self.edit_field.move_home(),
            KeyCode::End => self.edit_field.move_end(),
            KeyCode::Backspace => self.edit_field.handle_backspace(),
            KeyCode::Delete => self.edit_field.handle_delete(),
            KeyCode::Char(c) => self.edit_field.handle_char(c),
            _ => {}
        }
    }

    fn handle_confirm_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                if let Some(id) = self.confirm_action.take() {
                    self.apply_command(Command::delete(id), "Task deleted");
                }
                self.state = AppState::TaskList;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.confirm_action = None;
                self.state = AppState::TaskList;
            }
            _ => {}
        }
    }

    /// Poll for and handle terminal events. Returns true if the UI should quit.
    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    return Ok(self.handle_key(key.code, key.modifiers));
                }
                Event::FocusGained => self.handle_focus(true),
                Event::FocusLost => self.handle_focus(false),
                _ => {}
            }
        }
        Ok(false)
    }

    fn border_color(&self) -> Color {
        if self.window_state.is_focused {
            SAKURA_PINK
        } else {
            NIGHT_MUTED
        }
    }

    pub fn render(&mut self, f: &mut Frame) {
        let title_height = if self.window_state.is_full_screen { 0 } else { 1 };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(title_height),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(5),
                Constraint::Length(1),
            ])
            .split(f.area());

        if title_height > 0 {
            self.render_title_bar(f, chunks[0]);
        }
        self.render_header(f, chunks[1]);
        self.render_filters(f, chunks[2]);
        self.render_body(f, chunks[3]);
        self.render_status_bar(f, chunks[4]);

        let area = f.area();
        match self.state {
            AppState::TaskList => {}
            AppState::AddTask => self.render_task_form(f, area),
            AppState::EditTask => self.render_edit(f, area),
            AppState::Help => self.render_help(f, area),
            AppState::Confirm => self.render_confirm(f, area),
        }
    }

    fn render_title_bar(&self, f: &mut Frame, area: Rect) {
        let mut markers = Vec::new();
        if self.window.as_ref().is_some_and(|w| w.is_minimized()) {
            markers.push("minimized");
        }
        if self.window_state.is_maximized {
            markers.push("maximized");
        }
        if !self.window_state.is_focused {
            markers.push("unfocused");
        }
        let mut spans = vec![
            Span::styled(" Sakura Todo ", Style::default().fg(PETAL_WHITE).add_modifier(Modifier::BOLD)),
            Span::raw(" "),
            Span::styled(
                format!("zoom {}%", self.zoom().percent()),
                Style::default().fg(PETAL_WHITE),
            ),
        ];
        if !markers.is_empty() {
            spans.push(Span::styled(
                format!("  [{}]", markers.join(", ")),
                Style::default().fg(PETAL_WHITE).add_modifier(Modifier::ITALIC),
            ));
        }
        let bg = if self.window_state.is_focused { SAKURA_DEEP } else { NIGHT_MUTED };
        f.render_widget(Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)), area);
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let stats = views::stats(self.store.list());
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area);

        let summary = Line::from(vec![
            Span::styled(format!("Total {}", stats.total), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(format!("Done {}", stats.completed), Style::default().fg(Color::Green)),
            Span::raw("  "),
            Span::raw(format!("Pending {}", stats.pending)),
            Span::raw("  "),
            Span::styled(
                format!("High {}", stats.high_priority),
                Style::default().fg(priority_color(Priority::High)),
            ),
        ]);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.border_color()))
            .title("Today");
        f.render_widget(Paragraph::new(summary).block(block), chunks[0]);

        let rate = stats.completion_rate();
        let gauge = Gauge::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.border_color()))
                    .title("Progress"),
            )
            .gauge_style(Style::default().fg(SAKURA_PINK))
            .ratio((rate / 100.0).clamp(0.0, 1.0))
            .label(format!("{rate:.0}%"));
        f.render_widget(gauge, chunks[1]);
    }

    fn render_filters(&self, f: &mut Frame, area: Rect) {
        let category = if self.category_filter.is_empty() {
            "All"
        } else {
            self.category_filter.as_str()
        };
        let line = Line::from(vec![
            Span::raw(" Status: "),
            Span::styled(self.status_filter.label(), Style::default().fg(SAKURA_PINK)),
            Span::raw("   Category: "),
            Span::styled(category, Style::default().fg(SAKURA_PINK)),
            Span::styled(
                format!("   ({} shown)", self.filtered_tasks.len()),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        f.render_widget(Paragraph::new(line), area);
    }

    fn render_body(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(area);
        self.render_task_list(f, chunks[0]);
        self.render_notes(f, chunks[1]);
    }

    fn render_task_list(&mut self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.border_color()))
            .title("Tasks");

        if self.filtered_tasks.is_empty() {
            let empty = Paragraph::new(self.status_filter.empty_message())
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            f.render_widget(empty, area);
            return;
        }

        let header = Row::new(["", "Task", "Priority", "Category", "Created"].map(|h| {
            Cell::from(h).style(Style::default().add_modifier(Modifier::BOLD))
        }));

        let rows: Vec<Row> = self
            .filtered_tasks
            .iter()
            .filter_map(|id| self.store.get(id))
            .map(|task| {
                let text_style = if task.completed {
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
                } else {
                    Style::default()
                };
                Row::new(vec![
                    Cell::from(if task.completed { "✓" } else { "○" }),
                    Cell::from(task.text.clone()).style(text_style),
                    Cell::from(task.priority.label()).style(Style::default().fg(priority_color(task.priority))),
                    Cell::from(task.category.clone()),
                    Cell::from(task.created_at.with_timezone(&Local).format("%Y-%m-%d").to_string()),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(1),
            Constraint::Min(20),
            Constraint::Length(8),
            Constraint::Length(12),
            Constraint::Length(10),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().bg(SAKURA_PINK).fg(Color::Black))
            .highlight_symbol("> ");
        f.render_stateful_widget(table, area, &mut self.task_list_state);
    }

    fn render_notes(&self, f: &mut Frame, area: Rect) {
        let text = match self.selected_task() {
            Some(task) => task.notes.clone().unwrap_or_else(|| "No notes".to_string()),
            None => String::new(),
        };
        let notes = Paragraph::new(text).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.border_color()))
                .title("Notes"),
        );
        f.render_widget(notes, area);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let text = if self.status_message.is_empty() {
            match self.state {
                AppState::AddTask => "Tab next field | ←/→ change | Enter add | Esc cancel",
                AppState::EditTask => "Enter save | Esc cancel",
                AppState::Confirm => "y confirm | n cancel",
                _ => "a add | e edit | d delete | space toggle | f status | g category | h help | q quit",
            }
            .to_string()
        } else {
            self.status_message.clone()
        };
        let bar = Paragraph::new(format!(" {text}")).style(Style::default().bg(SAKURA_DEEP).fg(PETAL_WHITE));
        f.render_widget(bar, area);
    }

    fn field_block(&self, title: &str, focused: bool) -> Block<'static> {
        let style = if focused {
            Style::default().fg(SAKURA_PINK)
        } else {
            Style::default()
        };
        Block::default()
            .borders(Borders::ALL)
            .border_style(style)
            .title(title.to_string())
    }

    fn render_task_form(&self, f: &mut Frame, area: Rect) {
        let popup = centered_rect(60, 80, area);
        f.render_widget(Clear, popup);
        let outer = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(SAKURA_PINK))
            .title("Add Task");
        let inner = outer.inner(popup);
        f.render_widget(outer, popup);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(inner);

        let form = &self.task_form;
        let current = form.current_field;

        f.render_widget(
            Paragraph::new(form.text.value.as_str()).block(self.field_block("What needs doing?", current == TEXT_FIELD)),
            rows[0],
        );
        f.render_widget(
            Paragraph::new(format!("< {} >", form.selected_priority().label()))
                .style(Style::default().fg(priority_color(form.selected_priority())))
                .block(self.field_block("Priority", current == PRIORITY_FIELD)),
            rows[1],
        );
        let selected = form.categories.get(form.category).map_or("", String::as_str);
        f.render_widget(
            Paragraph::new(format!("< {selected} >")).block(self.field_block("Category", current == CATEGORY_FIELD)),
            rows[2],
        );
        f.render_widget(
            Paragraph::new(form.new_category.value.as_str())
                .block(self.field_block("New category (optional)", current == NEW_CATEGORY_FIELD)),
            rows[3],
        );
        f.render_widget(
            Paragraph::new(form.notes.value.as_str()).block(self.field_block("Notes (optional)", current == NOTES_FIELD)),
            rows[4],
        );

        if let (InputMode::Text, Some(input)) = (self.input_mode, form.active_input()) {
            let row = match current {
                TEXT_FIELD => rows[0],
                NEW_CATEGORY_FIELD => rows[3],
                _ => rows[4],
            };
            set_input_cursor(f, row, input);
        }
    }

    fn render_edit(&self, f: &mut Frame, area: Rect) {
        let popup = centered_rect(60, 20, area);
        let popup = Rect {
            height: popup.height.max(3),
            ..popup
        };
        f.render_widget(Clear, popup);
        f.render_widget(
            Paragraph::new(self.edit_field.value.as_str()).block(self.field_block("Edit Task", true)),
            popup,
        );
        if self.input_mode == InputMode::Text {
            set_input_cursor(f, popup, &self.edit_field);
        }
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let popup = centered_rect(60, 80, area);
        f.render_widget(Clear, popup);
        let keys = [
            ("↑/↓ k/j", "Move selection"),
            ("Space c", "Toggle completed"),
            ("a", "Add task"),
            ("e", "Edit task text"),
            ("d", "Delete task"),
            ("f", "Cycle status filter"),
            ("g", "Cycle category filter"),
            ("+ - 0", "Zoom in, out, reset"),
            ("F9", "Minimize"),
            ("F10", "Maximize or restore"),
            ("F11", "Toggle full screen"),
            ("h ?", "Toggle this help"),
            ("q Esc", "Quit"),
        ];
        let lines: Vec<Line> = keys
            .iter()
            .map(|(key, what)| {
                Line::from(vec![
                    Span::styled(format!("{key:<10}"), Style::default().fg(SAKURA_PINK).add_modifier(Modifier::BOLD)),
                    Span::raw(*what),
                ])
            })
            .collect();
        let help = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(SAKURA_PINK))
                .title("Help"),
        );
        f.render_widget(help, popup);
    }

    fn render_confirm(&self, f: &mut Frame, area: Rect) {
        let popup = centered_rect(50, 20, area);
        f.render_widget(Clear, popup);
        let text = self
            .confirm_action
            .as_deref()
            .and_then(|id| self.store.get(id))
            .map_or_else(String::new, |t| format!("Delete \"{}\"? (y/n)", t.text));
        let confirm = Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(priority_color(Priority::High)))
                    .title("Confirm"),
            );
        f.render_widget(confirm, popup);
    }

    /// Draw and handle events until the user quits or the window is closed.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            self.drain_window_updates();
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
            if self.window.as_ref().is_some_and(|w| w.is_closed()) {
                debug!("window host closed");
                break;
            }
        }
        Ok(())
    }
}

/// Place the terminal cursor inside the bordered `area` of an active field.
fn set_input_cursor(f: &mut Frame, area: Rect, input: &InputField) {
    if !input.active {
        return;
    }
    let column = u16::try_from(input.cursor_column()).unwrap_or(u16::MAX);
    let max_x = area.x.saturating_add(area.width.saturating_sub(2));
    let x = area.x.saturating_add(1).saturating_add(column).min(max_x);
    f.set_cursor_position((x, area.y.saturating_add(1)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStorage;
    use crate::window::HeadlessWindow;
    use ratatui::backend::TestBackend;

    fn app() -> App<MemoryStorage> {
        App::new(
            TaskStore::open(MemoryStorage::new()),
            Some(Box::new(HeadlessWindow::new())),
        )
    }

    fn press(app: &mut App<MemoryStorage>, key: KeyCode) -> bool {
        app.handle_key(key, KeyModifiers::NONE)
    }

    fn type_str(app: &mut App<MemoryStorage>, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn screen(app: &mut App<MemoryStorage>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_starts_with_seed_tasks_selected() {
        let app = app();
        assert_eq!(app.filtered_tasks, vec!["1", "2"]);
        assert_eq!(app.selected_task().unwrap().id, "1");
    }

    #[test]
    fn test_navigation_and_toggle() {
        let mut app = app();
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.selected_task().unwrap().id, "2");
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected_task().unwrap().id, "2");
        press(&mut app, KeyCode::Char(' '));
        assert!(!app.store.get("2").unwrap().completed);
        assert_eq!(app.status_message, "Marked active");
        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Char('c'));
        assert!(app.store.get("1").unwrap().completed);
    }

    #[test]
    fn test_add_task_through_form() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.state, AppState::AddTask);
        type_str(&mut app, "Buy milk");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.state, AppState::TaskList);
        assert_eq!(app.status_message, "Task added");
        let added = app.store.list().last().unwrap();
        assert_eq!(added.text, "Buy milk");
        assert_eq!(added.priority, Priority::High);
        assert_eq!(added.category, "General");
        assert_eq!(app.selected_task().unwrap().id, added.id);
        assert_eq!(views::stats(app.store.list()).high_priority, 1);
    }

    #[test]
    fn test_add_with_blank_text_stays_in_form() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        type_str(&mut app, "   ");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state, AppState::AddTask);
        assert!(!app.status_message.is_empty());
        assert_eq!(app.store.list().len(), 2);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state, AppState::TaskList);
    }

    #[test]
    fn test_edit_selected_task() {
        let mut app = app();
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.state, AppState::EditTask);
        for _ in 0.."Go see cherry blossoms".len() {
            press(&mut app, KeyCode::Backspace);
        }
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state, AppState::EditTask);

        type_str(&mut app, "Hanami picnic");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state, AppState::TaskList);
        assert_eq!(app.store.get("1").unwrap().text, "Hanami picnic");
    }

    #[test]
    fn test_edit_cursor_follows_display_width() {
        let mut app = app();
        press(&mut app, KeyCode::Char('e'));
        for _ in 0.."Go see cherry blossoms".len() {
            press(&mut app, KeyCode::Backspace);
        }
        type_str(&mut app, "桜餅");

        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        let popup = centered_rect(60, 20, Rect::new(0, 0, 120, 30));
        let pos = terminal.backend_mut().get_cursor_position().unwrap();
        assert_eq!((pos.x, pos.y), (popup.x + 1 + 4, popup.y + 1));
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut app = app();
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.store.list().len(), 2);

        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.state, AppState::Confirm);
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.store.list().len(), 1);
        assert_eq!(app.selected_task().unwrap().id, "2");
    }

    #[test]
    fn test_filters_cycle() {
        let mut app = app();
        press(&mut app, KeyCode::Char('f'));
        assert_eq!(app.status_filter, StatusFilter::Active);
        assert_eq!(app.filtered_tasks, vec!["1"]);

        press(&mut app, KeyCode::Char('f'));
        assert_eq!(app.filtered_tasks, vec!["2"]);

        press(&mut app, KeyCode::Char('g'));
        assert_eq!(app.category_filter, "Work");
        assert!(app.filtered_tasks.is_empty());
        assert!(app.selected_task().is_none());
        assert!(screen(&mut app).contains("No completed tasks"));
    }

    #[test]
    fn test_window_commands() {
        let mut app = app();
        press(&mut app, KeyCode::F(10));
        assert!(app.window_state.is_maximized);
        press(&mut app, KeyCode::F(11));
        assert!(app.window_state.is_full_screen);
        assert!(!screen(&mut app).contains("Sakura Todo"));

        press(&mut app, KeyCode::F(11));
        press(&mut app, KeyCode::Char('+'));
        press(&mut app, KeyCode::Char('+'));
        assert_eq!(app.zoom().percent(), 120);
        assert!(screen(&mut app).contains("zoom 120%"));
        press(&mut app, KeyCode::Char('0'));
        assert_eq!(app.zoom().percent(), 100);

        press(&mut app, KeyCode::F(9));
        assert!(!app.window_state.is_focused);
        assert!(screen(&mut app).contains("[minimized, maximized, unfocused]"));
        app.handle_focus(true);
        assert!(app.window_state.is_focused);
        assert!(!screen(&mut app).contains("minimized"));
    }

    #[test]
    fn test_without_window_host() {
        let mut app = App::new(TaskStore::open(MemoryStorage::new()), None);
        app.handle_key(KeyCode::F(10), KeyModifiers::NONE);
        assert_eq!(app.status_message, "No window host");
        assert!(app.handle_key(KeyCode::Char('q'), KeyModifiers::NONE));
    }

    #[test]
    fn test_quit_closes_window() {
        let mut app = app();
        assert!(!press(&mut app, KeyCode::Char('h')));
        assert_eq!(app.state, AppState::Help);
        assert!(app.handle_key(KeyCode::Char('w'), KeyModifiers::CONTROL));
        assert!(app.window.as_ref().unwrap().is_closed());
    }

    #[test]
    fn test_render_list() {
        let mut app = app();
        let out = screen(&mut app);
        assert!(out.contains("Sakura Todo"));
        assert!(out.contains("Go see cherry blossoms"));
        assert!(out.contains("Try new Japanese sweets"));
        assert!(out.contains("Total 2"));
        assert!(out.contains("50%"));
        assert!(out.contains("Would like to see the night"));
    }
}
