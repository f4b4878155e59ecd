//! Time codec between wall-clock `HH:mm` strings and the decimal-hour timeline.
//!
//! Two representations are kept apart:
//! - [`ClockTime`]: a time of day as entered by a person (`"08:30"`)
//! - [`TimelineHours`]: elapsed decimal hours on one contiguous timeline,
//!   which may run past 24 when a curve crosses midnight
//!
//! The model only ever works on [`TimelineHours`]. Going back to a
//! [`ClockTime`] is for display.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A wall-clock time of day in 24-hour form.
///
/// Hours at or above 24 are accepted so that instants on the following day
/// can be expressed, but `00..=23` is the canonical input range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime {
    hour: u32,
    minute: u32,
}

impl ClockTime {
    /// Build a clock time, rejecting minutes outside `0..60`.
    pub fn new(hour: u32, minute: u32) -> Result<Self> {
        if minute >= 60 {
            return Err(Error::TimeFormat(format!(
                "minutes must be in 0..60, got {}",
                minute
            )));
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    /// Position of this clock time on the decimal-hour timeline.
    pub fn to_timeline(self) -> TimelineHours {
        TimelineHours(self.hour as f64 + self.minute as f64 / 60.0)
    }
}

impl FromStr for ClockTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = || Error::TimeFormat(format!("expected \"HH:mm\", got {:?}", s));

        let (hours, minutes) = s.split_once(':').ok_or_else(malformed)?;
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());

        if hours.len() < 2 || minutes.len() != 2 || !all_digits(hours) || !all_digits(minutes) {
            return Err(malformed());
        }

        let hour = hours.parse::<u32>().map_err(|_| malformed())?;
        let minute = minutes.parse::<u32>().map_err(|_| malformed())?;
        Self::new(hour, minute)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(time: ClockTime) -> Self {
        time.to_string()
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Decimal hours on the unwrapped timeline (`25.5` is 01:30 the next day).
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimelineHours(pub f64);

impl TimelineHours {
    pub fn hours(self) -> f64 {
        self.0
    }

    /// Hours elapsed from `earlier` to `self` (negative if `earlier` is later).
    pub fn since(self, earlier: TimelineHours) -> f64 {
        self.0 - earlier.0
    }

    pub fn offset(self, hours: f64) -> TimelineHours {
        TimelineHours(self.0 + hours)
    }

    /// True once the instant has crossed midnight of the first day.
    pub fn is_next_day(self) -> bool {
        self.0 >= 24.0
    }

    /// Nearest clock time, for display.
    ///
    /// Minutes are rounded; a value that rounds to 60 carries into the hour.
    /// With `wrap` the hour is reduced modulo 24.
    pub fn to_clock(self, wrap: bool) -> ClockTime {
        let value = self.0.max(0.0);
        let whole = value.floor();
        let mut hour = whole as u32;
        let mut minute = ((value - whole) * 60.0).round() as u32;

        if minute == 60 {
            hour += 1;
            minute = 0;
        }
        if wrap {
            hour %= 24;
        }

        ClockTime { hour, minute }
    }
}

impl From<ClockTime> for TimelineHours {
    fn from(time: ClockTime) -> Self {
        time.to_timeline()
    }
}

impl fmt::Display for TimelineHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}h", self.0)
    }
}
