use crate::grid::OutOfTimeError;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use time::{format_description::FormatItem, macros::format_description, Date, Month};

static ANCHOR_FMT: &[FormatItem<'_>] =
    format_description!("[year] [month repr:short case_sensitive:false] [day]");

/// A calendar date from which a month view is derived, written as
/// `YYYY MMM DD` (e.g., `2018 Jan 15`)
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct AnchorDate(Date);

impl AnchorDate {
    pub fn new(date: Date) -> AnchorDate {
        AnchorDate(date)
    }

    pub fn date(self) -> Date {
        self.0
    }

    /// Move the anchor by `offset` whole months, clamping the day of the
    /// month to the length of the target month
    pub fn shift(self, offset: i32) -> Result<AnchorDate, OutOfTimeError> {
        shift_months(self.0, offset).map(AnchorDate)
    }
}

impl From<Date> for AnchorDate {
    fn from(date: Date) -> AnchorDate {
        AnchorDate(date)
    }
}

impl FromStr for AnchorDate {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<AnchorDate, ParseError> {
        Date::parse(s, ANCHOR_FMT)
            .map(AnchorDate)
            .map_err(|source| ParseError {
                input: s.to_owned(),
                source,
            })
    }
}

// Only years 0 through 9999 come back out in a form that parses again; an
// earlier year is written with a sign and three digits (`-001 Jan 01`).
impl fmt::Display for AnchorDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04} {} {:02}",
            self.0.year(),
            month_abbrev(self.0.month()),
            self.0.day()
        )
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("invalid anchor date {input:?}: {source}")]
pub struct ParseError {
    input: String,
    source: time::error::Parse,
}

impl ParseError {
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// Add `offset` months (which may be negative) to `date`.
///
/// If `date`'s day of the month does not exist in the target month, the
/// result is the last day of the target month.
pub fn shift_months(date: Date, offset: i32) -> Result<Date, OutOfTimeError> {
    let index = i64::from(date.year()) * 12 + i64::from(u8::from(date.month()) - 1)
        + i64::from(offset);
    let year = i32::try_from(index.div_euclid(12)).map_err(|_| OutOfTimeError)?;
    let month0 = u8::try_from(index.rem_euclid(12)).map_err(|_| OutOfTimeError)?;
    if !(Date::MIN.year()..=Date::MAX.year()).contains(&year) {
        return Err(OutOfTimeError);
    }
    let month = Month::January.nth_next(month0);
    let day = date.day().min(month.length(year));
    Date::from_calendar_date(year, month, day).map_err(|_| OutOfTimeError)
}

fn month_abbrev(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}
