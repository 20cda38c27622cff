use chrono::{Datelike, NaiveDate};
use std::error::Error;
use std::fmt;
use std::str::FromStr;

const TOKEN_FORMAT: &str = "%d/%m/%Y";

/// A calendar date rendered as `DD/MM/YYYY`, the way the Panel Harga API
/// and the exported CSV spell it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DateToken(String);

impl DateToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `DD-MM-YYYY`, used as a path segment in request URLs.
    pub fn url_segment(&self) -> String {
        self.0.replace('/', "-")
    }

    pub fn to_naive_date(&self) -> Result<NaiveDate, CustomError> {
        let (day, month, year) = self.parts()?;
        NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| CustomError::InvalidDateToken(self.0.clone()))
    }

    /// Splits the token on `/` and reads day, month, year in that order.
    pub fn parts(&self) -> Result<(u32, u32, i32), CustomError> {
        parse_parts(&self.0).ok_or_else(|| CustomError::InvalidDateToken(self.0.clone()))
    }
}

fn parse_parts(token: &str) -> Option<(u32, u32, i32)> {
    let mut fields = token.split('/');
    let day = fields.next()?.parse().ok()?;
    let month = fields.next()?.parse().ok()?;
    let year = fields.next()?.parse().ok()?;
    if fields.next().is_some() {
        return None;
    }
    Some((day, month, year))
}

impl From<NaiveDate> for DateToken {
    fn from(date: NaiveDate) -> Self {
        DateToken(date.format(TOKEN_FORMAT).to_string())
    }
}

impl FromStr for DateToken {
    type Err = CustomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let date = NaiveDate::parse_from_str(s, TOKEN_FORMAT)
            .map_err(|_| CustomError::InvalidDateToken(s.to_string()))?;
        Ok(DateToken::from(date))
    }
}

impl fmt::Display for DateToken {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn format_date(date: NaiveDate) -> DateToken {
    DateToken::from(date)
}

/// The following calendar day, or `None` past the last representable date.
pub fn next_day(date: NaiveDate) -> Option<NaiveDate> {
    date.succ_opt()
}

/// Why a record does or does not carry a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchStatus {
    Found,
    /// Response had no `data` collection.
    NoData,
    /// Collection present but the province was not in it.
    NotFound,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceRecord {
    pub date: DateToken,
    pub geomean: Option<f64>,
    pub status: FetchStatus,
}

impl PriceRecord {
    pub fn found(date: DateToken, geomean: Option<f64>) -> Self {
        PriceRecord {
            date,
            geomean,
            status: FetchStatus::Found,
        }
    }

    pub fn absent(date: DateToken, status: FetchStatus) -> Self {
        PriceRecord {
            date,
            geomean: None,
            status,
        }
    }
}

/// Days between two dates, used as the progress total.
pub fn day_span(start: NaiveDate, end: NaiveDate) -> i64 {
    end.signed_duration_since(start).num_days()
}

/// Inclusive number of calendar days in `[start, end]`, zero when reversed.
pub fn inclusive_day_count(start: NaiveDate, end: NaiveDate) -> usize {
    if start > end {
        return 0;
    }
    (end.num_days_from_ce() - start.num_days_from_ce()) as usize + 1
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomError {
    InvalidDateToken(String),
}

impl fmt::Display for CustomError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CustomError::InvalidDateToken(token) => {
                write!(f, "Invalid date token '{}', expected DD/MM/YYYY", token)
            }
        }
    }
}

impl Error for CustomError {}
