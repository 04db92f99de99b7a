use crate::model::{Task, TaskId};
use crate::status::{classify, task_status, BarCell, BarStyle, LegendKey, TaskStatus, LEGEND};
use crate::window::DateWindow;
use ratatui::layout::Constraint;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Cell, Row, Table};
use std::fmt::Write as _;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const NAME_WIDTH: u16 = 34;
pub const DAY_WIDTH: u16 = 3;
pub const TODAY_BG: Color = Color::Rgb(74, 66, 24);

/// One task projected onto the date window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartRow {
    pub id: TaskId,
    pub name: String,
    pub completed: bool,
    pub status: TaskStatus,
    pub cells: Vec<Option<BarCell>>,
}

impl ChartRow {
    fn label(&self) -> String {
        let check = if self.completed { "[x]" } else { "[ ]" };
        format!("{} #{} {}", check, self.id, self.name)
    }
}

pub fn project(tasks: &[Task], window: &DateWindow) -> Vec<ChartRow> {
    let today = window.today();
    tasks
        .iter()
        .map(|task| ChartRow {
            id: task.id,
            name: task.name.clone(),
            completed: task.completed,
            status: task_status(task, today),
            cells: window
                .dates()
                .iter()
                .map(|date| classify(task, *date, today))
                .collect(),
        })
        .collect()
}

pub fn bar_color(style: BarStyle) -> Color {
    match style {
        BarStyle::InProgress => Color::LightBlue,
        BarStyle::DueDate => Color::Blue,
        BarStyle::Completed => Color::LightGreen,
    }
}

fn overdue_style() -> Style {
    Style::default()
        .bg(bar_color(BarStyle::DueDate))
        .fg(Color::LightRed)
        .add_modifier(Modifier::BOLD)
}

/// In today's column the bar is one cell wide so the highlight stays
/// visible on both sides of it.
fn bar_line(cell: BarCell, today: bool) -> Line<'static> {
    let (text, style) = if cell.overdue_marker {
        ("!", overdue_style())
    } else {
        (" ", Style::default().bg(bar_color(cell.style)))
    };
    if today {
        let edge = Style::default().bg(TODAY_BG);
        Line::from(vec![
            Span::styled(" ", edge),
            Span::styled(text, style),
            Span::styled(" ", edge),
        ])
    } else {
        Line::from(Span::styled(format!(" {} ", text), style))
    }
}

fn label_style(row: &ChartRow) -> Style {
    match row.status {
        TaskStatus::Completed => Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT),
        TaskStatus::Overdue => Style::default().fg(Color::LightRed),
        TaskStatus::DueToday => Style::default().fg(Color::LightYellow),
        TaskStatus::InProgress => Style::default().fg(Color::White),
    }
}

fn today_style(window: &DateWindow, idx: usize) -> Style {
    if window.today_index() == Some(idx) {
        Style::default().bg(TODAY_BG)
    } else {
        Style::default()
    }
}

pub fn widths(window: &DateWindow) -> Vec<Constraint> {
    std::iter::once(Constraint::Length(NAME_WIDTH))
        .chain(std::iter::repeat(Constraint::Length(DAY_WIDTH)).take(window.len()))
        .collect()
}

fn header(window: &DateWindow) -> Row<'static> {
    let dates = window.dates().iter().enumerate().map(|(idx, date)| {
        let text = Text::from(vec![
            Line::from(format!("{:>2} ", date.day())),
            Line::from(Span::styled(
                date.month_label(),
                Style::default().fg(Color::Gray),
            )),
        ]);
        Cell::from(text).style(today_style(window, idx))
    });
    let title = Cell::from(Span::styled(
        "Task",
        Style::default().add_modifier(Modifier::BOLD),
    ));
    Row::new(std::iter::once(title).chain(dates))
        .height(2)
        .style(Style::default().fg(Color::Gray))
}

fn body_row(row: &ChartRow, window: &DateWindow) -> Row<'static> {
    let name = Cell::from(Span::styled(
        truncate_text(&row.label(), NAME_WIDTH as usize),
        label_style(row),
    ));
    let cells = row.cells.iter().enumerate().map(|(idx, cell)| {
        let content = match cell {
            Some(cell) => bar_line(*cell, window.today_index() == Some(idx)),
            None => Line::from(""),
        };
        Cell::from(content).style(today_style(window, idx))
    });
    Row::new(std::iter::once(name).chain(cells))
}

pub fn table(rows: &[ChartRow], window: &DateWindow) -> Table<'static> {
    Table::new(
        rows.iter().map(|row| body_row(row, window)).collect::<Vec<_>>(),
        widths(window),
    )
    .header(header(window))
    .column_spacing(0)
    .highlight_style(Style::default().add_modifier(Modifier::BOLD))
    .highlight_symbol("> ")
}

pub fn legend_line() -> Line<'static> {
    let mut spans = Vec::new();
    for (key, meaning) in LEGEND {
        let swatch = match key {
            LegendKey::Bar(style) => Span::styled("   ", Style::default().bg(bar_color(style))),
            LegendKey::Overdue => Span::styled(" ! ", overdue_style()),
            LegendKey::Today => Span::styled(
                " ▲ ",
                Style::default().bg(TODAY_BG).fg(Color::LightYellow),
            ),
        };
        spans.push(swatch);
        spans.push(Span::styled(
            format!(" {}   ", meaning),
            Style::default().fg(Color::Gray),
        ));
    }
    Line::from(spans)
}

fn glyph(cell: Option<BarCell>, today: bool) -> String {
    let swatch = match cell {
        None => " . ",
        Some(BarCell {
            overdue_marker: true,
            ..
        }) => "#!#",
        Some(BarCell { style, .. }) => plain_swatch(style),
    };
    if today {
        format!("|{}|", &swatch[1..2])
    } else {
        swatch.to_string()
    }
}

fn plain_swatch(style: BarStyle) -> &'static str {
    match style {
        BarStyle::InProgress => "===",
        BarStyle::DueDate => "###",
        BarStyle::Completed => "+++",
    }
}

/// The same chart as text, for output that is not a terminal UI.
pub fn plain(rows: &[ChartRow], window: &DateWindow) -> String {
    let name_width = NAME_WIDTH as usize;
    let mut out = String::new();

    let _ = write!(out, "{:<name_width$}", "Task");
    for date in window.dates() {
        let _ = write!(out, "{:>2} ", date.day());
    }
    out.push('\n');

    let _ = write!(out, "{:<name_width$}", "");
    for date in window.dates() {
        let _ = write!(out, "{:<3}", date.month_label());
    }
    out.push('\n');

    let _ = write!(out, "{:<name_width$}", "");
    for date in window.dates() {
        out.push_str(if window.is_today(*date) { " ^ " } else { "   " });
    }
    out.push('\n');

    for row in rows {
        let label = truncate_text(&row.label(), name_width.saturating_sub(1));
        out.push_str(&pad_text(&label, name_width));
        for (date, cell) in window.dates().iter().zip(&row.cells) {
            out.push_str(&glyph(*cell, window.is_today(*date)));
        }
        out.push('\n');
    }

    out.push('\n');
    out.push_str(&plain_legend());
    out.push('\n');
    out
}

pub fn plain_legend() -> String {
    LEGEND
        .iter()
        .map(|(key, meaning)| {
            let swatch = match key {
                LegendKey::Bar(style) => plain_swatch(*style),
                LegendKey::Overdue => "#!#",
                LegendKey::Today => "|.|",
            };
            format!("{} {}", swatch, meaning)
        })
        .collect::<Vec<_>>()
        .join("   ")
}

/// Cuts `text` to at most `max` terminal columns, ending in `...` when cut.
pub fn truncate_text(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let budget = max.saturating_sub(3);
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push_str(&"..."[..max.min(3)]);
    out
}

/// Pads with spaces up to `width` terminal columns.
fn pad_text(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(fill))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CalendarDate;
    use crate::store::TaskStore;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use ratatui::Terminal;

    fn date(s: &str) -> CalendarDate {
        CalendarDate::parse(s).unwrap()
    }

    fn buffer_text(buffer: &Buffer) -> String {
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|line| line.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn projection_has_one_cell_per_date() {
        let window = DateWindow::around(date("2025-03-08"));
        let rows = project(TaskStore::sample().tasks(), &window);
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.cells.len() == window.len()));
        // Window starts 2025-03-03; task 1 runs 03-01..03-10.
        let first = &rows[0];
        assert_eq!(first.cells.iter().filter(|c| c.is_some()).count(), 8);
        assert_eq!(
            first.cells[7].map(|c| c.style),
            Some(BarStyle::DueDate)
        );
        assert_eq!(first.cells[8], None);
    }

    #[test]
    fn toggled_task_renders_completed_everywhere() {
        let window = DateWindow::around(date("2025-03-08"));
        let mut store = TaskStore::sample();
        store.toggle_complete(1);
        let rows = project(store.tasks(), &window);
        let bars: Vec<BarCell> = rows[0].cells.iter().flatten().copied().collect();
        assert_eq!(bars.len(), 8);
        assert!(bars
            .iter()
            .all(|c| c.style == BarStyle::Completed && !c.overdue_marker));
    }

    #[test]
    fn plain_chart_marks_today_and_overdue() {
        let window = DateWindow::around(date("2025-03-08"));
        let mut store = TaskStore::sample();
        store.toggle_complete(3);
        let text = plain(&project(store.tasks(), &window), &window);
        let lines: Vec<&str> = text.lines().collect();
        let name_width = NAME_WIDTH as usize;
        assert!(lines[0].starts_with("Task"));
        assert_eq!(&lines[0][name_width..name_width + 3], " 3 ");
        assert_eq!(&lines[1][name_width..name_width + 3], "Mar");
        assert_eq!(&lines[2][name_width + 15..name_width + 18], " ^ ");
        assert!(lines[3].starts_with("[ ] #1 Write report"));
        assert!(lines[4].contains("+++"));
        assert!(lines[5].starts_with("[x] #3 Presentation slides"));
        assert!(text.contains("overdue"));
        // Today's column is bracketed in every task row.
        assert_eq!(&lines[3][name_width + 15..name_width + 18], "|=|");
        assert_eq!(&lines[4][name_width + 15..name_width + 18], "|.|");

        // Slides are due 2025-03-15, the first column of this window.
        let past = DateWindow::around(date("2025-03-20"));
        let fresh = TaskStore::sample();
        let text = plain(&project(fresh.tasks(), &past), &past);
        let slides = text.lines().nth(5).unwrap();
        assert_eq!(&slides[name_width..name_width + 3], "#!#");
    }

    #[test]
    fn table_highlights_today_column() {
        let window = DateWindow::around(date("2025-03-08"));
        let rows = project(TaskStore::sample().tasks(), &window);
        let width = NAME_WIDTH + DAY_WIDTH * window.len() as u16;
        let mut terminal = Terminal::new(TestBackend::new(width, 8)).unwrap();
        terminal
            .draw(|f| f.render_widget(table(&rows, &window), f.size()))
            .unwrap();
        let buffer = terminal.backend().buffer();
        let text = buffer_text(buffer);
        assert!(text.contains("Write report"));
        assert!(text.contains("Mar"));

        // No row is selected, so no highlight column is reserved.
        let today_x = NAME_WIDTH + DAY_WIDTH * 5;
        assert_eq!(buffer.get(today_x, 0).bg, TODAY_BG);
        // Row 3 is the meeting task, which ends before today.
        assert_eq!(buffer.get(today_x, 3).bg, TODAY_BG);
        // Row 2 is the report task, which runs through today.
        assert_eq!(buffer.get(today_x, 2).bg, TODAY_BG);
        assert_eq!(buffer.get(today_x + 1, 2).bg, bar_color(BarStyle::InProgress));
        assert_eq!(buffer.get(today_x + 2, 2).bg, TODAY_BG);
        assert_eq!(buffer.get(today_x - 1, 2).bg, bar_color(BarStyle::InProgress));
        let due_x = NAME_WIDTH + DAY_WIDTH * 2;
        assert_eq!(buffer.get(due_x, 3).bg, bar_color(BarStyle::Completed));
    }

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("a longer label", 8), "a lon...");
        assert_eq!(truncate_text("abc", 0), "");
    }

    #[test]
    fn truncate_counts_terminal_columns() {
        // Each of these characters is two columns wide.
        let cut = truncate_text("レポート作成", 8);
        assert_eq!(cut, "レポ...");
        assert!(cut.width() <= 8);
        assert_eq!(pad_text("レポ", 6).width(), 6);
    }

    #[test]
    fn plain_chart_aligns_wide_names() {
        let window = DateWindow::around(date("2025-03-08"));
        let start = date("2025-03-01");
        let due = date("2025-03-10");
        let tasks = vec![
            Task::new(1, "レポート作成", start, due),
            Task::new(2, "report", start, due),
            Task::new(3, "とても長いタスク名がここに入ります、さらに続きます", start, due),
        ];
        let text = plain(&project(&tasks, &window), &window);
        let lines: Vec<&str> = text.lines().collect();
        let expected = (NAME_WIDTH + DAY_WIDTH * window.len() as u16) as usize;
        for line in &lines[..6] {
            assert_eq!(line.width(), expected, "{:?}", line);
        }
        assert!(lines[3].ends_with(lines[4].split_at(lines[4].len() - 90).1));
        assert!(lines[5].contains("..."));
    }
}
