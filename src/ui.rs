use crate::model::{DraftField, TaskId};
use crate::render;
use crate::store::{FormMode, Submitted, TaskStore};
use crate::window::DateWindow;
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::{Alignment, Color, Modifier, Rect, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, TableState, Wrap};
use ratatui::Terminal;
use std::io::{stdout, Stdout};
use std::time::Duration;

pub fn run(store: TaskStore, window: DateWindow) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let mut app = App::new(store, window);
    let result = app.event_loop(&mut terminal);
    teardown_terminal(&mut terminal)?;
    result
}

struct App {
    store: TaskStore,
    window: DateWindow,
    selected: usize,
    mode: Mode,
    field: DraftField,
    cursor: usize,
    status: String,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Mode {
    Browse,
    Form,
    ConfirmDelete(TaskId),
}

impl App {
    fn new(store: TaskStore, window: DateWindow) -> Self {
        let status = format!(
            "{} tasks, {} .. {}",
            store.tasks().len(),
            window.dates().first().map(|d| d.to_string()).unwrap_or_default(),
            window.dates().last().map(|d| d.to_string()).unwrap_or_default(),
        );
        App {
            store,
            window,
            selected: 0,
            mode: Mode::Browse,
            field: DraftField::Name,
            cursor: 0,
            status,
        }
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| self.draw(f))?;
            if event::poll(Duration::from_millis(200))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key) {
                        break;
                    }
                }
            }
        }
        Ok(())
    }

    /// Returns true when the app should exit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self.mode {
            Mode::Browse => return self.handle_browse_key(key),
            Mode::Form => self.handle_form_key(key),
            Mode::ConfirmDelete(id) => self.handle_confirm_key(id, key),
        }
        false
    }

    fn handle_browse_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.store.tasks().len() {
                    self.selected += 1;
                }
            }
            KeyCode::Char(' ') | KeyCode::Char('x') => self.toggle_selected(),
            KeyCode::Char('e') | KeyCode::Enter => self.edit_selected(),
            KeyCode::Char('d') => match self.selected_id() {
                Some(id) => {
                    self.mode = Mode::ConfirmDelete(id);
                    self.status = format!("Delete #{}? (y to confirm, n/Esc to cancel)", id);
                }
                None => self.status = "No task selected to delete".into(),
            },
            KeyCode::Char('n') | KeyCode::Char('a') | KeyCode::Tab => {
                self.mode = Mode::Form;
                self.focus_field(DraftField::Name);
                self.status = match self.store.mode() {
                    FormMode::Create => {
                        "New task (dates as YYYY-MM-DD; Tab next field, Enter save, Esc back)".into()
                    }
                    FormMode::Edit(id) => format!("Editing #{}", id),
                };
            }
            KeyCode::Esc => {
                if let FormMode::Edit(id) = self.store.mode() {
                    self.store.cancel_edit();
                    self.status = format!("Stopped editing #{}", id);
                }
            }
            _ => {}
        }
        false
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.mode = Mode::Browse;
                self.status = if self.store.draft().is_empty() {
                    "Back to chart".into()
                } else {
                    "Form kept (n to resume)".into()
                };
            }
            KeyCode::Tab => self.focus_field(self.field.next()),
            KeyCode::BackTab => self.focus_field(self.field.prev()),
            KeyCode::Left => {
                self.cursor = prev_boundary(self.cursor, self.active_text());
            }
            KeyCode::Right => {
                self.cursor = next_boundary(self.cursor, self.active_text());
            }
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.active_text().len(),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Enter => self.submit(),
            KeyCode::Char(c) => {
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                {
                    self.insert_char(c);
                }
            }
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, id: TaskId, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                match self.store.delete(id) {
                    Some(task) => self.status = format!("Deleted \"{}\"", task.name),
                    None => self.status = format!("Task #{} is already gone", id),
                }
                self.clamp_selection();
                self.mode = Mode::Browse;
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                self.status = "Delete canceled".into();
                self.mode = Mode::Browse;
            }
            _ => {}
        }
    }

    fn selected_id(&self) -> Option<TaskId> {
        self.store.tasks().get(self.selected).map(|t| t.id)
    }

    fn clamp_selection(&mut self) {
        self.selected = self
            .selected
            .min(self.store.tasks().len().saturating_sub(1));
    }

    fn toggle_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            self.status = "No task selected".into();
            return;
        };
        if let Some(done) = self.store.toggle_complete(id) {
            self.status = if done {
                format!("Completed #{}", id)
            } else {
                format!("Reopened #{}", id)
            };
        }
    }

    fn edit_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            self.status = "No task selected to edit".into();
            return;
        };
        if self.store.begin_edit(id) {
            self.mode = Mode::Form;
            self.focus_field(DraftField::Name);
            self.status = format!("Editing #{} (Enter to update, Esc to leave form)", id);
        }
    }

    fn submit(&mut self) {
        match self.store.submit() {
            Ok(outcome) => {
                self.status = match outcome {
                    Submitted::Created(id) => {
                        self.selected = self.store.position(id).unwrap_or(self.selected);
                        format!("Added #{}", id)
                    }
                    Submitted::Updated(id) => format!("Updated #{}", id),
                    Submitted::EditTargetGone(id) => {
                        format!("Task #{} was deleted; nothing to update", id)
                    }
                };
                self.mode = Mode::Browse;
                self.focus_field(DraftField::Name);
            }
            Err(err) => {
                log::debug!("submit rejected: {}", err);
                self.status = format!("Not saved: {}", err);
            }
        }
    }

    fn active_text(&self) -> &str {
        self.store.draft().field(self.field)
    }

    fn focus_field(&mut self, field: DraftField) {
        self.field = field;
        self.cursor = self.active_text().len();
    }

    fn insert_char(&mut self, ch: char) {
        let field = self.field;
        let text = self.store.draft_mut().field_mut(field);
        let at = self.cursor.min(text.len());
        text.insert(at, ch);
        self.cursor = at + ch.len_utf8();
    }

    fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let field = self.field;
        let cursor = self.cursor;
        let text = self.store.draft_mut().field_mut(field);
        let prev = prev_boundary(cursor, text);
        text.drain(prev..cursor);
        self.cursor = prev;
    }

    fn draw(&mut self, f: &mut ratatui::Frame<'_>) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(2),
                Constraint::Length(4),
            ])
            .split(f.size());

        self.draw_header(f, layout[0]);
        self.draw_form(f, layout[1]);
        self.draw_chart(f, layout[2]);
        self.draw_legend(f, layout[3]);
        self.draw_footer(f, layout[4]);

        if let Mode::ConfirmDelete(id) = self.mode {
            self.draw_confirm(f, id);
        }
    }

    fn draw_header(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let mode = match self.store.mode() {
            FormMode::Create => "create".to_string(),
            FormMode::Edit(id) => format!("edit #{}", id),
        };
        let title = Line::from(vec![
            Span::styled(
                "gantt-todo ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  •  "),
            Span::styled(
                format!("today {}", self.window.today()),
                Style::default().fg(Color::LightYellow),
            ),
            Span::raw("  •  "),
            Span::styled(
                format!("{} tasks", self.store.tasks().len()),
                Style::default().fg(Color::Green),
            ),
            Span::raw("  •  "),
            Span::styled(mode, Style::default().fg(Color::Magenta)),
        ]);
        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray));
        let paragraph = Paragraph::new(title)
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(paragraph, area);
    }

    fn draw_form(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let focused = self.mode == Mode::Form;
        let (title, button) = match self.store.mode() {
            FormMode::Create => ("New Task".to_string(), "[ Add ]"),
            FormMode::Edit(id) => (format!("Edit Task #{}", id), "[ Update ]"),
        };
        let mut spans = Vec::new();
        for field in DraftField::ALL {
            let active = focused && self.field == field;
            spans.extend(field_spans(
                field.label(),
                self.store.draft().field(field),
                self.cursor,
                active,
            ));
            spans.push(Span::raw("   "));
        }
        spans.push(Span::styled(
            button,
            Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::BOLD),
        ));
        let accent = if focused { Color::Cyan } else { Color::DarkGray };
        let form = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .title(Span::styled(
                    title,
                    Style::default().fg(accent).add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent)),
        );
        f.render_widget(form, area);
    }

    fn draw_chart(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Span::styled(
                "Chart",
                Style::default().add_modifier(Modifier::BOLD),
            ));
        if self.store.tasks().is_empty() {
            let msg = Paragraph::new("No tasks yet. Press n to add one.")
                .alignment(Alignment::Center)
                .block(block);
            f.render_widget(msg, area);
            return;
        }
        let inner = block.inner(area);
        f.render_widget(block, area);
        let rows = render::project(self.store.tasks(), &self.window);
        let mut state = TableState::default();
        state.select(Some(self.selected));
        f.render_stateful_widget(render::table(&rows, &self.window), inner, &mut state);
    }

    fn draw_legend(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let legend = Paragraph::new(render::legend_line()).block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(Color::DarkGray))
                .title("Legend"),
        );
        f.render_widget(legend, area);
    }

    fn draw_footer(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Length(2)])
            .split(area);

        let help_bar = Paragraph::new(self.footer_help_line())
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
        f.render_widget(help_bar, rows[0]);

        let status = Paragraph::new(self.status.clone())
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
        f.render_widget(status, rows[1]);
    }

    fn footer_help_line(&self) -> Line<'static> {
        let keys: &[(&str, Color, &str)] = match self.mode {
            Mode::Form => &[
                ("Tab/Shift-Tab", Color::LightCyan, " field  "),
                ("←→", Color::LightCyan, " cursor  "),
                ("Enter", Color::LightGreen, " save  "),
                ("Esc", Color::LightRed, " back  "),
                ("YYYY-MM-DD", Color::Gray, " dates"),
            ],
            _ => &[
                ("↑↓ / j k", Color::LightCyan, " select  "),
                ("space", Color::LightGreen, " done  "),
                ("n", Color::LightMagenta, " new  "),
                ("e", Color::LightYellow, " edit  "),
                ("d", Color::LightRed, " delete  "),
                ("Esc", Color::Gray, " stop editing  "),
                ("q", Color::LightRed, " quit"),
            ],
        };
        let spans = keys
            .iter()
            .flat_map(|(key, color, what)| {
                [
                    Span::styled(*key, Style::default().fg(*color)),
                    Span::raw(*what),
                ]
            })
            .collect::<Vec<_>>();
        Line::from(spans)
    }

    fn draw_confirm(&self, f: &mut ratatui::Frame<'_>, id: TaskId) {
        let area = centered_rect(50, 30, f.size());
        let name = self
            .store
            .get(id)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| format!("#{}", id));
        let body = vec![
            Line::from(Span::styled(
                format!("Delete \"{}\"?", name),
                Style::default()
                    .fg(Color::LightRed)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Press y to confirm, n or Esc to cancel"),
        ];
        let dialog = Paragraph::new(body).alignment(Alignment::Center).block(
            Block::default()
                .title(Span::styled(
                    "Confirm Delete",
                    Style::default()
                        .fg(Color::LightRed)
                        .add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::LightRed)),
        );
        f.render_widget(Clear, area);
        f.render_widget(dialog, area);
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn teardown_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn field_spans(label: &str, value: &str, cursor: usize, active: bool) -> Vec<Span<'static>> {
    let label_style = Style::default()
        .fg(Color::Gray)
        .add_modifier(Modifier::BOLD | Modifier::DIM);
    let value_style = Style::default().fg(if active { Color::Cyan } else { Color::White });
    let text = if active {
        let mut text = value.to_string();
        text.insert_str(cursor.min(value.len()), "▌");
        text
    } else if value.is_empty() {
        "____".to_string()
    } else {
        value.to_string()
    };
    vec![
        Span::styled(format!("{}: ", label), label_style),
        Span::styled(text, value_style),
    ]
}

fn prev_boundary(cursor: usize, text: &str) -> usize {
    text[..cursor.min(text.len())]
        .char_indices()
        .last()
        .map(|(idx, _)| idx)
        .unwrap_or(0)
}

fn next_boundary(cursor: usize, text: &str) -> usize {
    match text.get(cursor..).and_then(|rest| rest.chars().next()) {
        Some(ch) => cursor + ch.len_utf8(),
        None => text.len(),
    }
}
