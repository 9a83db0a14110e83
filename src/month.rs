use crate::error::ReportError;
use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;

/// A calendar month a report is requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReportMonth {
    year: i32,
    month: u32,
}

impl ReportMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, ReportError> {
        let valid = (1..=12).contains(&month) && NaiveDate::from_ymd_opt(year, month, 1).is_some();
        if !valid {
            return Err(ReportError::InvalidMonth { year, month });
        }
        Ok(Self { year, month })
    }

    pub(crate) const fn new_unchecked(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn last_day(&self) -> NaiveDate {
        self.first_day()
            .checked_add_months(chrono::Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    /// The following month, or `None` past the last representable date.
    pub fn succ(&self) -> Option<Self> {
        let (year, month) = if self.month == 12 {
            (self.year.checked_add(1)?, 1)
        } else {
            (self.year, self.month + 1)
        };
        Self::new(year, month).ok()
    }

    /// Every month from `start` to `end`, both inclusive.
    pub fn range(start: Self, end: Self) -> Result<Months, ReportError> {
        if start > end {
            return Err(ReportError::InvalidMonthRange { start, end });
        }
        Ok(Months {
            next: Some(start),
            end,
        })
    }
}

impl fmt::Display for ReportMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

impl FromStr for ReportMonth {
    type Err = ReportError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let date = NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d")
            .map_err(|_| ReportError::InvalidMonthFormat(raw.to_string()))?;
        Self::new(date.year(), date.month())
    }
}

/// Iterator returned by [`ReportMonth::range`].
#[derive(Debug, Clone)]
pub struct Months {
    next: Option<ReportMonth>,
    end: ReportMonth,
}

impl Iterator for Months {
    type Item = ReportMonth;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.succ().filter(|next| *next <= self.end);
        Some(current)
    }
}
