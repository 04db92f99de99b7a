use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

pub type TaskId = u32;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A local calendar day with no time-of-day component.
///
/// Always written as zero-padded `YYYY-MM-DD`, so the textual form sorts the
/// same way the dates do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CalendarDate(NaiveDate);

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid date (use YYYY-MM-DD): {0}")]
pub struct DateParseError(pub String);

impl CalendarDate {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(CalendarDate)
    }

    pub fn parse(input: &str) -> Result<Self, DateParseError> {
        let raw = input.trim();
        if raw.len() != 10 {
            return Err(DateParseError(raw.to_string()));
        }
        NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map(CalendarDate)
            .map_err(|_| DateParseError(raw.to_string()))
    }

    pub fn today() -> Self {
        CalendarDate(Local::now().date_naive())
    }

    pub fn offset_days(self, days: i64) -> Option<Self> {
        self.0.checked_add_signed(Duration::days(days)).map(CalendarDate)
    }

    pub fn day(self) -> u32 {
        self.0.day()
    }

    pub fn month_label(self) -> String {
        self.0.format("%b").to_string()
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl FromStr for CalendarDate {
    type Err = DateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CalendarDate::parse(s)
    }
}

impl TryFrom<String> for CalendarDate {
    type Error = DateParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        CalendarDate::parse(&value)
    }
}

impl From<CalendarDate> for String {
    fn from(date: CalendarDate) -> Self {
        date.to_string()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub start_date: CalendarDate,
    pub due_date: CalendarDate,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    pub fn new(
        id: TaskId,
        name: impl Into<String>,
        start_date: CalendarDate,
        due_date: CalendarDate,
    ) -> Self {
        Task {
            id,
            name: name.into(),
            start_date,
            due_date,
            completed: false,
        }
    }

    /// Inclusive on both ends. Empty when the start is after the due date.
    pub fn span(&self) -> RangeInclusive<CalendarDate> {
        self.start_date..=self.due_date
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Name,
    StartDate,
    DueDate,
}

impl DraftField {
    pub const ALL: [DraftField; 3] = [DraftField::Name, DraftField::StartDate, DraftField::DueDate];

    pub fn label(self) -> &'static str {
        match self {
            DraftField::Name => "Task",
            DraftField::StartDate => "Start",
            DraftField::DueDate => "Due",
        }
    }

    pub fn next(self) -> Self {
        match self {
            DraftField::Name => DraftField::StartDate,
            DraftField::StartDate => DraftField::DueDate,
            DraftField::DueDate => DraftField::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            DraftField::Name => DraftField::DueDate,
            DraftField::StartDate => DraftField::Name,
            DraftField::DueDate => DraftField::StartDate,
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DraftField::Name => "name",
            DraftField::StartDate => "start date",
            DraftField::DueDate => "due date",
        };
        f.write_str(name)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    #[error("{0} is required")]
    MissingField(DraftField),
    #[error("{field} is not a date (use YYYY-MM-DD): {value}")]
    InvalidDate { field: DraftField, value: String },
}

/// Uncommitted form text for a task being created or edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub name: String,
    pub start_date: String,
    pub due_date: String,
}

/// A draft that passed the presence checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFields {
    pub name: String,
    pub start_date: CalendarDate,
    pub due_date: CalendarDate,
}

impl Draft {
    pub fn new(
        name: impl Into<String>,
        start_date: impl Into<String>,
        due_date: impl Into<String>,
    ) -> Self {
        Draft {
            name: name.into(),
            start_date: start_date.into(),
            due_date: due_date.into(),
        }
    }

    pub fn from_task(task: &Task) -> Self {
        Draft::new(
            task.name.clone(),
            task.start_date.to_string(),
            task.due_date.to_string(),
        )
    }

    pub fn field(&self, field: DraftField) -> &str {
        match field {
            DraftField::Name => &self.name,
            DraftField::StartDate => &self.start_date,
            DraftField::DueDate => &self.due_date,
        }
    }

    pub fn field_mut(&mut self, field: DraftField) -> &mut String {
        match field {
            DraftField::Name => &mut self.name,
            DraftField::StartDate => &mut self.start_date,
            DraftField::DueDate => &mut self.due_date,
        }
    }

    pub fn is_empty(&self) -> bool {
        DraftField::ALL.iter().all(|f| self.field(*f).is_empty())
    }

    pub fn validate(&self) -> Result<TaskFields, DraftError> {
        for field in DraftField::ALL {
            if self.field(field).is_empty() {
                return Err(DraftError::MissingField(field));
            }
        }
        Ok(TaskFields {
            name: self.name.clone(),
            start_date: parse_field(DraftField::StartDate, &self.start_date)?,
            due_date: parse_field(DraftField::DueDate, &self.due_date)?,
        })
    }
}

fn parse_field(field: DraftField, value: &str) -> Result<CalendarDate, DraftError> {
    CalendarDate::parse(value).map_err(|_| DraftError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> CalendarDate {
        CalendarDate::parse(s).unwrap()
    }

    #[test]
    fn date_order_matches_text_order() {
        let a = date("2025-02-28");
        let b = date("2025-03-01");
        let c = date("2025-12-31");
        assert!(a < b && b < c);
        assert!(a.to_string() < b.to_string() && b.to_string() < c.to_string());
    }

    #[test]
    fn parse_requires_zero_padding() {
        assert!(CalendarDate::parse("2025-3-1").is_err());
        assert!(CalendarDate::parse("2025-02-30").is_err());
        assert!(CalendarDate::parse("").is_err());
        assert_eq!(date(" 2025-03-01 ").to_string(), "2025-03-01");
    }

    #[test]
    fn offset_crosses_month_and_year() {
        assert_eq!(date("2025-02-28").offset_days(1), Some(date("2025-03-01")));
        assert_eq!(date("2025-01-01").offset_days(-1), Some(date("2024-12-31")));
    }

    #[test]
    fn span_is_inclusive() {
        let task = Task::new(1, "report", date("2025-03-01"), date("2025-03-10"));
        assert!(!task.span().contains(&date("2025-02-28")));
        assert!(task.span().contains(&date("2025-03-01")));
        assert!(task.span().contains(&date("2025-03-10")));
        assert!(!task.span().contains(&date("2025-03-11")));
    }

    #[test]
    fn validate_reports_first_missing_field() {
        let draft = Draft::new("", "", "2025-03-02");
        assert_eq!(
            draft.validate(),
            Err(DraftError::MissingField(DraftField::Name))
        );
        let draft = Draft::new("x", "2025-03-01", "");
        assert_eq!(
            draft.validate(),
            Err(DraftError::MissingField(DraftField::DueDate))
        );
    }

    #[test]
    fn validate_accepts_reversed_range() {
        let fields = Draft::new("x", "2025-03-10", "2025-03-01")
            .validate()
            .unwrap();
        assert!(fields.start_date > fields.due_date);
    }

    #[test]
    fn validate_rejects_malformed_date() {
        let err = Draft::new("x", "tomorrow", "2025-03-01")
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            DraftError::InvalidDate {
                field: DraftField::StartDate,
                ..
            }
        ));
    }

    #[test]
    fn task_yaml_uses_date_strings() {
        let task = Task::new(3, "slides", date("2025-03-05"), date("2025-03-15"));
        let yaml = serde_yaml::to_string(&task).unwrap();
        assert!(yaml.contains("2025-03-05"));
        let back: Task = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, task);
    }
}
