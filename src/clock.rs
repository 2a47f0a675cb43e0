//! Wall-clock capability used for bill year stamping, chore recurrence and row timestamps

use chrono::{DateTime, Datelike, Local, NaiveDate, Utc};

/// Source of "now" and "today"
pub trait Clock: Send + Sync {
    /// Current instant, used for `createdAt`/`updatedAt`
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar date on the server
    fn today(&self) -> NaiveDate;

    /// Calendar year stamped on new bills
    fn current_year(&self) -> i32 {
        self.today().year()
    }

    /// Three-letter weekday abbreviation ("Mon", "Tue", ...) compared against `recurDate`
    fn weekday_abbrev(&self) -> String {
        self.today().format("%a").to_string()
    }
}

/// Clock backed by the host's local time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock frozen at a given instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Noon UTC on the given date
    pub fn on(date: NaiveDate) -> Self {
        let now = date
            .and_hms_opt(12, 0, 0)
            .map(|dt| dt.and_utc())
            .unwrap_or_else(Utc::now);
        Self { now }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }
}
