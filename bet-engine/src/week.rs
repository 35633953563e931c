// Betting weeks run Monday through Sunday.

use chrono::{Datelike, Duration, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

pub fn week_start_for(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Monday through Sunday of the week containing `today`.
pub fn week_range(today: NaiveDate) -> WeekRange {
    let start = week_start_for(today);
    WeekRange {
        start,
        end: start + Duration::days(6),
    }
}

/// Whether `date` falls in the week that contains `week_start`.
pub fn is_date_in_week(date: NaiveDate, week_start: NaiveDate) -> bool {
    week_range(week_start).contains(date)
}
