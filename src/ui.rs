use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use std::io;
use tracing::debug;

use crate::filter::Filter;
use crate::store::{Intent, TaskStore};
use crate::task::{Difficulty, Task, TaskId};

const SIDEBAR_LETTERS: [&str; 8] = ["9", "9", "Y", "E", "L", "L", "O", "W"];
const CURSOR: &str = "\u{258C}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Description,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Inline edit of one field; Enter commits, Esc discards
    Edit {
        id: TaskId,
        field: Field,
        buffer: String,
    },
    /// A task is picked up; the selection is the drop cursor
    Move { from: usize },
    /// New-task form is open
    Form,
}

/// Inputs of the new-task form. Cleared only after the server accepted the task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskForm {
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub focus: Field,
}

impl Default for NewTaskForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            difficulty: Difficulty::Low,
            focus: Field::Title,
        }
    }
}

impl NewTaskForm {
    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            Field::Title => &mut self.title,
            Field::Description => &mut self.description,
        }
    }
}

pub struct App {
    pub store: TaskStore,
    pub filter: Filter,
    /// Index into the visible (filtered) list
    pub selected: usize,
    pub mode: Mode,
    pub form: NewTaskForm,
    pub should_quit: bool,
}

impl App {
    pub fn new(store: TaskStore) -> Self {
        Self {
            store,
            filter: Filter::All,
            selected: 0,
            mode: Mode::Navigate,
            form: NewTaskForm::default(),
            should_quit: false,
        }
    }

    pub fn visible(&self) -> Vec<&Task> {
        self.store.visible(self.filter)
    }

    fn selected_task(&self) -> Option<&Task> {
        self.visible().get(self.selected).copied()
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.visible().len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected as isize + delta).clamp(0, len as isize - 1) as usize;
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    /// Translate a key press into an intent. Pure apart from UI-local state.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Intent> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return None;
        }
        match self.mode.clone() {
            Mode::Navigate => self.handle_navigate(key),
            Mode::Edit { id, field, buffer } => self.handle_edit(key, id, field, buffer),
            Mode::Move { from } => self.handle_move(key, from),
            Mode::Form => self.handle_form(key),
        }
    }

    fn handle_navigate(&mut self, key: KeyEvent) -> Option<Intent> {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_selection(-1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_selection(1);
                None
            }
            KeyCode::Char('f') => {
                self.filter = self.filter.next();
                self.selected = 0;
                None
            }
            KeyCode::Char('r') => Some(Intent::Load),
            KeyCode::Char('a') => {
                self.mode = Mode::Form;
                None
            }
            KeyCode::Char('c') => self.selected_task().map(|t| Intent::Toggle { id: t.id.clone() }),
            KeyCode::Char('x') => self.selected_task().map(|t| Intent::Delete { id: t.id.clone() }),
            KeyCode::Char('e') => {
                let target = self.selected_task().and_then(|t| {
                    if t.completed {
                        debug!(task_id = %t.id, "Completed task title is not editable");
                        None
                    } else {
                        Some((t.id.clone(), t.display_title()))
                    }
                });
                if let Some((id, buffer)) = target {
                    self.mode = Mode::Edit {
                        id,
                        field: Field::Title,
                        buffer,
                    };
                }
                None
            }
            KeyCode::Char('i') => {
                // no editor for an empty description
                let target = self
                    .selected_task()
                    .filter(|t| !t.description.is_empty())
                    .map(|t| (t.id.clone(), t.display_description()));
                if let Some((id, buffer)) = target {
                    self.mode = Mode::Edit {
                        id,
                        field: Field::Description,
                        buffer,
                    };
                }
                None
            }
            KeyCode::Char('m') => {
                if self.selected_task().is_some() {
                    self.mode = Mode::Move {
                        from: self.selected,
                    };
                }
                None
            }
            _ => None,
        }
    }

    fn handle_edit(
        &mut self,
        key: KeyEvent,
        id: TaskId,
        field: Field,
        mut buffer: String,
    ) -> Option<Intent> {
        match key.code {
            KeyCode::Esc => {
                self.mode = Mode::Navigate;
                None
            }
            KeyCode::Enter => {
                self.mode = Mode::Navigate;
                Some(match field {
                    Field::Title => Intent::EditTitle { id, text: buffer },
                    Field::Description => Intent::EditDescription { id, text: buffer },
                })
            }
            KeyCode::Backspace => {
                buffer.pop();
                self.mode = Mode::Edit { id, field, buffer };
                None
            }
            KeyCode::Char(c) if is_text_input(&key) => {
                buffer.push(c);
                self.mode = Mode::Edit { id, field, buffer };
                None
            }
            _ => None,
        }
    }

    fn handle_move(&mut self, key: KeyEvent, from: usize) -> Option<Intent> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_selection(-1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_selection(1);
                None
            }
            KeyCode::Enter | KeyCode::Char('m') => {
                self.mode = Mode::Navigate;
                Some(Intent::Reorder {
                    filter: self.filter,
                    from,
                    to: Some(self.selected),
                })
            }
            KeyCode::Esc => {
                self.mode = Mode::Navigate;
                self.selected = from;
                Some(Intent::Reorder {
                    filter: self.filter,
                    from,
                    to: None,
                })
            }
            _ => None,
        }
    }

    fn handle_form(&mut self, key: KeyEvent) -> Option<Intent> {
        match key.code {
            KeyCode::Esc => {
                self.mode = Mode::Navigate;
                None
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.form.focus = match self.form.focus {
                    Field::Title => Field::Description,
                    Field::Description => Field::Title,
                };
                None
            }
            KeyCode::Left | KeyCode::Right => {
                self.form.difficulty = self.form.difficulty.toggled();
                None
            }
            KeyCode::Backspace => {
                self.form.focused_mut().pop();
                None
            }
            KeyCode::Char(c) if is_text_input(&key) => {
                self.form.focused_mut().push(c);
                None
            }
            KeyCode::Enter => Some(Intent::Add {
                title: self.form.title.clone(),
                description: self.form.description.clone(),
                difficulty: self.form.difficulty,
            }),
            _ => None,
        }
    }

    /// Dispatch an intent to the store and update UI state from the outcome.
    pub async fn apply(&mut self, intent: Intent) {
        let is_add = matches!(intent, Intent::Add { .. });
        let changed = self.store.dispatch(intent).await;
        if is_add && changed {
            self.form = NewTaskForm::default();
            self.mode = Mode::Navigate;
            self.selected = self.visible().len().saturating_sub(1);
        }
        self.clamp_selection();
    }
}

/// Plain or shifted characters only; Ctrl/Alt chords never become text.
fn is_text_input(key: &KeyEvent) -> bool {
    key.modifiers.difference(KeyModifiers::SHIFT).is_empty()
}

pub async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| draw(f, app))?;

        if let Event::Key(key) = tokio::task::block_in_place(event::read)? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if let Some(intent) = app.handle_key(key) {
                app.apply(intent).await;
            }
            if app.should_quit {
                return Ok(());
            }
        }
    }
}

pub fn draw(f: &mut Frame, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Length(5), Constraint::Min(0)])
        .split(f.area());

    draw_sidebar(f, columns[0]);

    let form_height = if app.mode == Mode::Form { 4 } else { 0 };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(form_height),
            Constraint::Length(1),
        ])
        .split(columns[1]);

    let header = Line::from(vec![
        Span::styled("Task Manager", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!("  filter: {}", app.filter)),
    ]);
    f.render_widget(Paragraph::new(header), rows[0]);

    draw_tasks(f, app, rows[1]);
    if app.mode == Mode::Form {
        draw_form(f, &app.form, rows[2]);
    }
    f.render_widget(
        Paragraph::new(Span::styled(
            key_hints(&app.mode),
            Style::default().fg(Color::DarkGray),
        )),
        rows[3],
    );
}

fn draw_sidebar(f: &mut Frame, area: Rect) {
    let lines: Vec<Line> = SIDEBAR_LETTERS
        .iter()
        .map(|l| Line::from(*l))
        .collect();
    let sidebar = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::White).bg(Color::Magenta))
        .block(Block::default().borders(Borders::RIGHT));
    f.render_widget(sidebar, area);
}

fn draw_tasks(f: &mut Frame, app: &App, area: Rect) {
    let editing = match &app.mode {
        Mode::Edit { field, buffer, .. } => Some((*field, buffer.as_str())),
        _ => None,
    };

    let items: Vec<ListItem> = app
        .visible()
        .into_iter()
        .enumerate()
        .map(|(i, t)| {
            let edit = editing.filter(|_| i == app.selected);
            ListItem::new(task_line(t, edit))
        })
        .collect();

    let title = match app.mode {
        Mode::Move { .. } => "Tasks (moving)",
        _ => "Tasks",
    };
    let list = List::new(items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol(if matches!(app.mode, Mode::Move { .. }) {
            "\u{2195} "
        } else {
            "> "
        });

    let mut state = ListState::default();
    if !app.visible().is_empty() {
        state.select(Some(app.selected));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn task_line(t: &Task, edit: Option<(Field, &str)>) -> Line<'static> {
    let title = match edit {
        Some((Field::Title, buffer)) => Span::styled(
            format!("{}{}", buffer, CURSOR),
            Style::default().fg(Color::Yellow),
        ),
        _ if t.completed => Span::styled(
            t.display_title(),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::CROSSED_OUT),
        ),
        _ => Span::styled(t.display_title(), Style::default().fg(Color::White)),
    };
    let description = match edit {
        Some((Field::Description, buffer)) => Span::styled(
            format!("{}{}", buffer, CURSOR),
            Style::default().fg(Color::Yellow),
        ),
        _ => Span::raw(t.display_description()),
    };
    Line::from(vec![
        title,
        Span::raw("  "),
        description,
        Span::styled(
            format!("  [{}]", t.difficulty),
            Style::default().fg(Color::Gray),
        ),
    ])
}

fn draw_form(f: &mut Frame, form: &NewTaskForm, area: Rect) {
    let field = |label: &str, value: &str, focused: bool| {
        let style = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        let cursor = if focused { CURSOR } else { "" };
        Line::from(vec![
            Span::styled(format!("{:<12}", label), style),
            Span::raw(format!("{}{}", value, cursor)),
        ])
    };
    let lines = vec![
        field("Task", &form.title, form.focus == Field::Title),
        field(
            "Description",
            &form.description,
            form.focus == Field::Description,
        ),
    ];
    let block = Block::default()
        .title(format!("New task [{}]", form.difficulty))
        .borders(Borders::TOP);
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn key_hints(mode: &Mode) -> &'static str {
    match mode {
        Mode::Navigate => {
            "a add  e title  i desc  c done  x delete  m move  f filter  r reload  q quit"
        }
        Mode::Edit { .. } => "Enter save  Esc cancel",
        Mode::Move { .. } => "\u{2191}\u{2193} choose slot  m/Enter drop  Esc cancel",
        Mode::Form => "Tab field  \u{2190}\u{2192} difficulty  Enter add  Esc close",
    }
}
