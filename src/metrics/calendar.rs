use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc, Weekday};

use crate::error::MetricsError;

/// Which calendar days count as working days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workdays {
    AllDays,
    Weekdays,
}

impl Workdays {
    pub fn includes(&self, date: NaiveDate) -> bool {
        match self {
            Self::AllDays => true,
            Self::Weekdays => !matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
        }
    }
}

/// Measures elapsed time counting only working days, and within each
/// working day only the window between `day_start` and `day_end` (UTC).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessCalendar {
    workdays: Workdays,
    day_start: NaiveTime,
    day_end: NaiveTime,
}

impl BusinessCalendar {
    pub fn new(
        workdays: Workdays,
        day_start: NaiveTime,
        day_end: NaiveTime,
    ) -> Result<Self, MetricsError> {
        if day_start >= day_end {
            return Err(MetricsError::InvalidWorkday(format!(
                "start {day_start} must be before end {day_end}"
            )));
        }
        Ok(Self {
            workdays,
            day_start,
            day_end,
        })
    }

    /// Every day, 00:00:00 to 23:59:59.
    pub fn all_days() -> Self {
        Self::whole_days(Workdays::AllDays)
    }

    /// Monday to Friday, 00:00:00 to 23:59:59.
    pub fn weekdays() -> Self {
        Self::whole_days(Workdays::Weekdays)
    }

    /// Monday to Friday, 09:00 to 17:00.
    pub fn office_hours() -> Self {
        Self {
            workdays: Workdays::Weekdays,
            day_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
            day_end: NaiveTime::from_hms_opt(17, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }

    fn whole_days(workdays: Workdays) -> Self {
        Self {
            workdays,
            day_start: NaiveTime::MIN,
            day_end: NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN),
        }
    }

    pub fn workdays(&self) -> Workdays {
        self.workdays
    }

    pub fn is_workday(&self, date: NaiveDate) -> bool {
        self.workdays.includes(date)
    }

    pub fn workday_start(&self, date: NaiveDate) -> DateTime<Utc> {
        date.and_time(self.day_start).and_utc()
    }

    pub fn workday_end(&self, date: NaiveDate) -> DateTime<Utc> {
        date.and_time(self.day_end).and_utc()
    }

    /// Working time from `earlier` to `later`. Negative when `later`
    /// precedes `earlier`, with the same magnitude as the swapped call.
    pub fn working_duration(&self, later: DateTime<Utc>, earlier: DateTime<Utc>) -> Duration {
        if later < earlier {
            -self.hours_in_range(later, earlier)
        } else {
            self.hours_in_range(earlier, later)
        }
    }

    fn hours_in_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Duration {
        let last_day = end.date_naive();

        start
            .date_naive()
            .iter_days()
            .take_while(|day| *day <= last_day)
            .filter(|day| self.is_workday(*day))
            .map(|day| {
                let open = self.workday_start(day).max(start);
                let close = self.workday_end(day).min(end);
                if close > open {
                    close - open
                } else {
                    Duration::zero()
                }
            })
            .fold(Duration::zero(), |total, part| total + part)
    }
}

impl Default for BusinessCalendar {
    fn default() -> Self {
        Self::all_days()
    }
}
