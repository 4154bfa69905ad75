use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use time::Date;

/// How each day of a [`CalendarGrid`](crate::CalendarGrid) is written out
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum CellFormat {
    /// ISO 8601 calendar date, e.g. `2017-12-31`
    #[default]
    Date,
    /// RFC 3339 timestamp for midnight UTC, e.g. `2017-12-31T00:00:00Z`
    DateTime,
}

impl CellFormat {
    pub fn render(self, date: Date) -> String {
        match self {
            CellFormat::Date => date.to_string(),
            CellFormat::DateTime => format!("{date}T00:00:00Z"),
        }
    }

    fn name(self) -> &'static str {
        match self {
            CellFormat::Date => "date",
            CellFormat::DateTime => "datetime",
        }
    }
}

impl fmt::Display for CellFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CellFormat {
    type Err = UnknownFormatError;

    fn from_str(s: &str) -> Result<CellFormat, UnknownFormatError> {
        match s.to_ascii_lowercase().as_str() {
            "date" => Ok(CellFormat::Date),
            "datetime" | "date-time" => Ok(CellFormat::DateTime),
            _ => Err(UnknownFormatError(s.to_owned())),
        }
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("unknown cell format {0:?}; expected \"date\" or \"datetime\"")]
pub struct UnknownFormatError(String);
