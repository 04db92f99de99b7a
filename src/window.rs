use crate::model::CalendarDate;

pub const DAYS_BEFORE_TODAY: usize = 5;
pub const WINDOW_DAYS: usize = 30;

/// The chart's columns: 30 consecutive days starting five days before
/// today. Built once per session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateWindow {
    today: CalendarDate,
    dates: Vec<CalendarDate>,
}

impl DateWindow {
    pub fn around(today: CalendarDate) -> Self {
        let first = -(DAYS_BEFORE_TODAY as i64);
        let dates = (first..first + WINDOW_DAYS as i64)
            .filter_map(|offset| today.offset_days(offset))
            .collect();
        DateWindow { today, dates }
    }

    pub fn today(&self) -> CalendarDate {
        self.today
    }

    pub fn dates(&self) -> &[CalendarDate] {
        &self.dates
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn today_index(&self) -> Option<usize> {
        self.dates.iter().position(|d| *d == self.today)
    }

    pub fn is_today(&self, date: CalendarDate) -> bool {
        date == self.today
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> CalendarDate {
        CalendarDate::parse(s).unwrap()
    }

    #[test]
    fn thirty_consecutive_days_with_today_sixth() {
        let today = date("2025-03-20");
        let window = DateWindow::around(today);
        assert_eq!(window.len(), WINDOW_DAYS);
        assert_eq!(window.today_index(), Some(DAYS_BEFORE_TODAY));
        assert_eq!(window.dates()[5], today);
        for pair in window.dates().windows(2) {
            assert_eq!(pair[0].offset_days(1), Some(pair[1]));
        }
        assert_eq!(window.dates()[0], date("2025-03-15"));
        assert_eq!(window.dates()[29], date("2025-04-13"));
    }

    #[test]
    fn window_spans_year_end() {
        let window = DateWindow::around(date("2025-01-02"));
        assert_eq!(window.dates()[0], date("2024-12-28"));
        assert!(window.is_today(date("2025-01-02")));
        assert!(!window.is_today(date("2025-01-03")));
    }

    #[test]
    fn leap_day_is_included() {
        let window = DateWindow::around(date("2024-02-27"));
        assert!(window.dates().contains(&date("2024-02-29")));
        assert_eq!(window.len(), WINDOW_DAYS);
    }
}
