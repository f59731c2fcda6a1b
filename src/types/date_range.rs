use crate::range::error::ScrapeError;
use chrono::{Days, NaiveDate};
use std::fmt;
use std::fmt::{Display, Formatter};

/// An inclusive span of calendar dates, `start..=end`.
///
/// Construction fails with [`ScrapeError::InvalidRange`] when `start > end`; a reversed
/// range is never swapped silently.
///
/// # Examples
///
/// ```
/// use weatherscrape::DateRange;
/// use chrono::NaiveDate;
///
/// let range = DateRange::new(
///     NaiveDate::from_ymd_opt(2020, 12, 31).unwrap(),
///     NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
/// ).unwrap();
/// assert_eq!(range.days().count(), 2);
/// assert_eq!(range.to_string(), "2020-12-31..=2021-01-01");
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ScrapeError> {
        if start > end {
            return Err(ScrapeError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Number of calendar dates in the range, both ends included.
    pub(crate) fn len(&self) -> usize {
        // start <= end is guaranteed by construction, so this is never negative.
        (self.end - self.start).num_days() as usize + 1
    }

    /// Every date in the range in ascending order, each exactly once.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        std::iter::successors(Some(self.start), move |date| {
            date.checked_add_days(Days::new(1)).filter(|next| *next <= end)
        })
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}
