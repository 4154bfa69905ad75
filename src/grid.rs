use crate::anchor::{shift_months, AnchorDate, ParseError};
use crate::cell::CellFormat;
use std::iter::successors;
use std::slice::ChunksExact;
use thiserror::Error;
use time::{Date, Month, Weekday};

pub const DAYS_IN_WEEK: usize = 7;

/// Number of rows in a month view
pub const GRID_WEEKS: usize = 5;

/// Number of cells in a month view
pub const GRID_DAYS: usize = DAYS_IN_WEEK * GRID_WEEKS;

pub(crate) trait WeekdayExt {
    fn index0(&self) -> u8;
}

impl WeekdayExt for Weekday {
    fn index0(&self) -> u8 {
        self.number_days_from_sunday()
    }
}

/// A five-week month view: the month a grid is built for, preceded by the
/// tail of the previous month back to the nearest Sunday, and followed by as
/// many days of the next month as are needed to fill 35 cells.
///
/// A 31-day month starting on a Friday, or a 30- or 31-day month starting on
/// a Saturday, does not fit in five weeks; its last day or two are left off
/// the grid.  Use [`CalendarGrid::contains_whole_month()`] to detect this.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct CalendarGrid {
    year: i32,
    month: Month,
    month_len: usize,
    leading_days: u8,
    days: [Date; GRID_DAYS],
}

impl CalendarGrid {
    /// Build the grid for the month containing `anchor` shifted by `offset`
    /// months
    pub fn new(anchor: Date, offset: i32) -> Result<CalendarGrid, OutOfTimeError> {
        let target = shift_months(anchor, offset)?;
        CalendarGrid::for_month(target.year(), target.month())
    }

    pub fn for_month(year: i32, month: Month) -> Result<CalendarGrid, OutOfTimeError> {
        let first = Date::from_calendar_date(year, month, 1).map_err(|_| OutOfTimeError)?;
        let month_len = usize::from(month.length(year));
        let leading_days = leading_days(first);
        let lead = usize::from(leading_days);
        let mut prefix = iter_days_before(first).take(lead).collect::<Vec<_>>();
        prefix.reverse();
        let days = prefix
            .into_iter()
            .chain(iter_days_from(first).take(GRID_DAYS - lead))
            .collect::<Vec<_>>();
        // Falls short only when the grid would cross either end of time
        let days = <[Date; GRID_DAYS]>::try_from(days).map_err(|_| OutOfTimeError)?;
        Ok(CalendarGrid {
            year,
            month,
            month_len,
            leading_days,
            days,
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> Month {
        self.month
    }

    /// Number of days from the previous month at the start of the grid, in
    /// `0..7`
    pub fn leading_days(&self) -> u8 {
        self.leading_days
    }

    pub fn first_of_month(&self) -> Date {
        self.days[usize::from(self.leading_days)]
    }

    pub fn first_day(&self) -> Date {
        self.days[0]
    }

    pub fn last_day(&self) -> Date {
        self.days[GRID_DAYS - 1]
    }

    pub fn days(&self) -> &[Date; GRID_DAYS] {
        &self.days
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Date> {
        self.days.iter()
    }

    /// Iterate over the grid's rows, each running Sunday through Saturday
    pub fn weeks(&self) -> ChunksExact<'_, Date> {
        self.days.chunks_exact(DAYS_IN_WEEK)
    }

    /// The cells belonging to the grid's month
    pub fn month_days(&self) -> &[Date] {
        let start = usize::from(self.leading_days);
        let end = (start + self.month_len).min(GRID_DAYS);
        &self.days[start..end]
    }

    pub fn contains_whole_month(&self) -> bool {
        usize::from(self.leading_days) + self.month_len <= GRID_DAYS
    }

    pub fn contains(&self, date: Date) -> bool {
        (self.first_day()..=self.last_day()).contains(&date)
    }

    /// Render every cell in the given format
    pub fn render(&self, format: CellFormat) -> Vec<String> {
        self.days.iter().map(|&d| format.render(d)).collect()
    }
}

impl<'a> IntoIterator for &'a CalendarGrid {
    type Item = &'a Date;
    type IntoIter = std::slice::Iter<'a, Date>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Build the month view for the date `anchor` (written `YYYY MMM DD`) moved
/// `offset` months forwards (or backwards, if negative)
pub fn build_grid(anchor: &str, offset: i32) -> Result<CalendarGrid, GridError> {
    let anchor = anchor.parse::<AnchorDate>()?;
    Ok(CalendarGrid::new(anchor.date(), offset)?)
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum GridError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    OutOfTime(#[from] OutOfTimeError),
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("reached the end of time")]
pub struct OutOfTimeError;

// Weeks start on Sunday
fn leading_days(first_of_month: Date) -> u8 {
    first_of_month.weekday().index0() % 7
}

fn iter_days_from(date: Date) -> impl Iterator<Item = Date> {
    successors(Some(date), |&d| d.next_day())
}

fn iter_days_before(date: Date) -> impl Iterator<Item = Date> {
    successors(Some(date), |&d| d.previous_day()).skip(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;
    use time::Duration;

    fn assert_well_formed(grid: &CalendarGrid) {
        assert_eq!(grid.days().len(), GRID_DAYS);
        for pair in grid.days().windows(2) {
            assert_eq!(pair[1] - pair[0], Duration::DAY, "cells {pair:?}");
        }
        let first = grid.first_of_month();
        assert_eq!(first.day(), 1);
        assert_eq!(first.month(), grid.month());
        assert_eq!(first.year(), grid.year());
        let before = grid.iter().filter(|&&d| d < first).count();
        assert_eq!(before, usize::from(grid.leading_days()));
        assert_eq!(
            grid.leading_days(),
            first.weekday().number_days_from_sunday()
        );
        assert!(grid.leading_days() < 7);
        assert_eq!(grid.first_day().weekday(), Weekday::Sunday);
    }

    #[test]
    fn test_january_2018() {
        let grid = build_grid("2018 Jan 01", 0).unwrap();
        assert_well_formed(&grid);
        assert_eq!(grid.leading_days(), 1);
        assert_eq!(grid.days()[0], date!(2017 - 12 - 31));
        assert_eq!(grid.days()[1], date!(2018 - 01 - 01));
        assert_eq!(grid.days()[34], date!(2018 - 02 - 03));
        assert!(grid.contains_whole_month());
    }

    #[test]
    fn test_february_2018() {
        let grid = build_grid("2018 Feb 15", 0).unwrap();
        assert_well_formed(&grid);
        assert_eq!(grid.leading_days(), 4);
        assert_eq!(grid.first_day(), date!(2018 - 01 - 28));
        assert_eq!(grid.last_day(), date!(2018 - 03 - 03));
        let month_days = grid.month_days();
        assert_eq!(month_days.len(), 28);
        assert_eq!(month_days.first(), Some(&date!(2018 - 02 - 01)));
        assert_eq!(month_days.last(), Some(&date!(2018 - 02 - 28)));
        let march = grid
            .iter()
            .filter(|d| d.month() == Month::March)
            .count();
        assert_eq!(march, 3);
    }

    #[test]
    fn test_offset_forwards() {
        let shifted = build_grid("2018 Jan 15", 1).unwrap();
        let direct = build_grid("2018 Feb 01", 0).unwrap();
        assert_eq!(shifted.month(), Month::February);
        assert_eq!(shifted.year(), 2018);
        assert_eq!(shifted, direct);
    }

    #[test]
    fn test_offset_backwards() {
        let grid = build_grid("2018 Jan 15", -1).unwrap();
        assert_well_formed(&grid);
        assert_eq!(grid.year(), 2017);
        assert_eq!(grid.month(), Month::December);
        assert_eq!(grid.leading_days(), 5);
        assert_eq!(grid.first_day(), date!(2017 - 11 - 26));
        assert_eq!(grid.last_day(), date!(2017 - 12 - 30));
        assert!(!grid.contains_whole_month());
        assert_eq!(grid.month_days().len(), 30);
        assert!(!grid.contains(date!(2017 - 12 - 31)));
    }

    #[test]
    fn test_month_starting_on_sunday() {
        let grid = build_grid("2018 Apr 20", 0).unwrap();
        assert_well_formed(&grid);
        assert_eq!(grid.leading_days(), 0);
        assert_eq!(grid.first_day(), date!(2018 - 04 - 01));
        assert_eq!(grid.last_day(), date!(2018 - 05 - 05));
    }

    #[test]
    fn test_leap_february_fills_grid() {
        let grid = build_grid("2020 Feb 10", 0).unwrap();
        assert_well_formed(&grid);
        assert_eq!(grid.leading_days(), 6);
        assert_eq!(grid.first_day(), date!(2020 - 01 - 26));
        assert_eq!(grid.last_day(), date!(2020 - 02 - 29));
        assert!(grid.contains_whole_month());
    }

    #[test]
    fn test_offset_across_year_end() {
        let grid = build_grid("2018 Dec 31", 1).unwrap();
        assert_well_formed(&grid);
        assert_eq!(grid.year(), 2019);
        assert_eq!(grid.month(), Month::January);
        assert_eq!(grid.first_day(), date!(2018 - 12 - 30));
    }

    #[test]
    fn test_weeks() {
        let grid = build_grid("2018 Jan 01", 0).unwrap();
        let weeks = grid.weeks().collect::<Vec<_>>();
        assert_eq!(weeks.len(), GRID_WEEKS);
        for week in &weeks {
            assert_eq!(week.len(), DAYS_IN_WEEK);
            assert_eq!(week[0].weekday(), Weekday::Sunday);
            assert_eq!(week[6].weekday(), Weekday::Saturday);
        }
        assert_eq!(weeks[4][6], date!(2018 - 02 - 03));
    }

    #[test]
    fn test_repeatable() {
        let a = build_grid("2018 Jan 15", 0).unwrap();
        let b = build_grid("2018 Jan 15", 0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_offsets_compose() {
        for offset in -30..=30 {
            let grid = build_grid("2019 Oct 31", offset).unwrap();
            let reanchored = AnchorDate::new(grid.first_of_month()).to_string();
            let again = build_grid(&reanchored, 0).unwrap();
            assert_eq!(grid, again, "offset {offset}");
            let expected = shift_months(date!(2019 - 10 - 31), offset).unwrap();
            assert_eq!(
                (grid.year(), grid.month()),
                (expected.year(), expected.month())
            );
        }
    }

    #[test]
    fn test_every_month_in_range() {
        let mut whole = 0;
        for year in 1990..2040 {
            for month0 in 0..12 {
                let month = Month::January.nth_next(month0);
                let grid = CalendarGrid::for_month(year, month).unwrap();
                assert_well_formed(&grid);
                let next = CalendarGrid::for_month(
                    if month == Month::December { year + 1 } else { year },
                    month.next(),
                )
                .unwrap();
                let last = next.first_of_month().previous_day().unwrap();
                let month_len = usize::from(last.day());
                if grid.contains_whole_month() {
                    whole += 1;
                    assert_eq!(grid.month_days().len(), month_len);
                    assert!(grid.contains(last));
                } else {
                    assert!(usize::from(grid.leading_days()) + month_len > GRID_DAYS);
                    assert!(!grid.contains(last));
                }
            }
        }
        assert!(whole > 0);
    }

    #[test]
    fn test_negative_year_grid() {
        let grid = CalendarGrid::for_month(-4, Month::February).unwrap();
        assert_well_formed(&grid);
        assert_eq!(grid.month_days().len(), 29);
        let reanchored = AnchorDate::new(grid.first_of_month()).to_string();
        assert!(build_grid(&reanchored, 0).is_err());
    }

    #[test]
    fn test_edges_of_time() {
        let first = CalendarGrid::for_month(Date::MAX.year(), Month::November);
        assert!(first.is_ok());
        assert_eq!(
            CalendarGrid::for_month(Date::MAX.year() + 1, Month::January),
            Err(OutOfTimeError)
        );
        assert_eq!(
            CalendarGrid::for_month(Date::MIN.year() - 1, Month::December),
            Err(OutOfTimeError)
        );
    }

    #[test]
    fn test_invalid_anchor() {
        let e = build_grid("not a date", 0).unwrap_err();
        assert!(matches!(e, GridError::Parse(_)));
    }

    #[test]
    fn test_end_of_time() {
        assert_eq!(
            build_grid("9999 Dec 15", 1),
            Err(GridError::OutOfTime(OutOfTimeError))
        );
        assert_eq!(CalendarGrid::new(Date::MIN, -1), Err(OutOfTimeError));
        assert_eq!(CalendarGrid::new(Date::MAX, 1), Err(OutOfTimeError));
    }

    #[test]
    fn test_render_dates() {
        let grid = build_grid("2018 Jan 01", 0).unwrap();
        let cells = grid.render(CellFormat::Date);
        assert_eq!(cells.len(), GRID_DAYS);
        assert_eq!(cells[0], "2017-12-31");
        assert_eq!(cells[1], "2018-01-01");
        assert_eq!(cells[34], "2018-02-03");
    }
}
