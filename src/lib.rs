//! Five-week month views for calendar displays.
//!
//! [`build_grid()`] takes an anchor date written `YYYY MMM DD` and a number
//! of months to move it by, and returns the 35 consecutive days (Sunday
//! first) that a month-at-a-glance calendar shows for the resulting month.
//!
//! ```
//! use time::macros::date;
//!
//! let grid = calgrid::build_grid("2018 Jan 15", 1).unwrap();
//! assert_eq!(grid.first_day(), date!(2018 - 01 - 28));
//! assert_eq!(grid.first_of_month(), date!(2018 - 02 - 01));
//! assert_eq!(grid.last_day(), date!(2018 - 03 - 03));
//! ```
mod anchor;
mod cell;
mod grid;
pub mod port;
pub use crate::anchor::{shift_months, AnchorDate, ParseError};
pub use crate::cell::{CellFormat, UnknownFormatError};
pub use crate::grid::{
    build_grid, CalendarGrid, GridError, OutOfTimeError, DAYS_IN_WEEK, GRID_DAYS, GRID_WEEKS,
};
