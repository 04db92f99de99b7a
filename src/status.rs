use crate::model::{CalendarDate, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarStyle {
    InProgress,
    DueDate,
    Completed,
}

/// What a chart cell shows for a date inside a task's span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarCell {
    pub style: BarStyle,
    /// Set on the due-date cell of an unfinished task whose due date has passed.
    pub overdue_marker: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    InProgress,
    DueToday,
    Overdue,
    Completed,
}

impl TaskStatus {
    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::InProgress => "in progress",
            TaskStatus::DueToday => "due today",
            TaskStatus::Overdue => "overdue",
            TaskStatus::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendKey {
    Bar(BarStyle),
    Overdue,
    Today,
}

pub const LEGEND: [(LegendKey, &str); 5] = [
    (LegendKey::Bar(BarStyle::InProgress), "in progress"),
    (LegendKey::Bar(BarStyle::DueDate), "due date"),
    (LegendKey::Overdue, "overdue"),
    (LegendKey::Bar(BarStyle::Completed), "completed"),
    (LegendKey::Today, "today"),
];

pub fn in_range(task: &Task, date: CalendarDate) -> bool {
    task.span().contains(&date)
}

pub fn is_past_due(task: &Task, today: CalendarDate) -> bool {
    !task.completed && task.due_date < today
}

/// `None` when `date` is outside the task's span.
pub fn classify(task: &Task, date: CalendarDate, today: CalendarDate) -> Option<BarCell> {
    if !in_range(task, date) {
        return None;
    }
    let cell = if task.completed {
        BarCell {
            style: BarStyle::Completed,
            overdue_marker: false,
        }
    } else if date == task.due_date {
        BarCell {
            style: BarStyle::DueDate,
            overdue_marker: is_past_due(task, today),
        }
    } else {
        BarCell {
            style: BarStyle::InProgress,
            overdue_marker: false,
        }
    };
    Some(cell)
}

pub fn task_status(task: &Task, today: CalendarDate) -> TaskStatus {
    if task.completed {
        TaskStatus::Completed
    } else if is_past_due(task, today) {
        TaskStatus::Overdue
    } else if task.due_date == today {
        TaskStatus::DueToday
    } else {
        TaskStatus::InProgress
    }
}
