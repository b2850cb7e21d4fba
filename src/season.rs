use chrono::{Datelike, Local, NaiveDate};
use log::debug;

/// First season with electronic data in the portal.
pub const FIRST_SEASON: u32 = 37;

/// Calendar year the first season starts in.
pub const COLLECTION_START_YEAR: i32 = 1997;

/// ISO week in which a new flu season begins.
pub const SEASON_START_WEEK: u32 = 40;

/// Source of "today" for season arithmetic.
pub trait Clock {
    fn today(&self) -> NaiveDate;

    fn current_season(&self) -> u32 {
        current_season(self.today())
    }
}

/// Local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Most recent season id as of `today`.
///
/// Seasons roll over in ISO week 40, so early-year weeks still belong to the
/// season that started the previous autumn.
pub fn current_season(today: NaiveDate) -> u32 {
    let iso = today.iso_week();
    debug!("ISO date: year={} week={} weekday={}", iso.year(), iso.week(), today.weekday());

    let mut years = iso.year() - COLLECTION_START_YEAR;
    if iso.week() < SEASON_START_WEEK {
        years -= 1;
    }
    (years + FIRST_SEASON as i32).max(0) as u32
}
