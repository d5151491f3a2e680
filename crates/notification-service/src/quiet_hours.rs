//! Quiet hours
//!
//! A daily `[start, end)` window in which non-critical alerts are held back.
//! Times are compared as minutes since midnight; a window whose start is not
//! before its end wraps past midnight.

use chrono::{NaiveTime, Timelike};
use fund_core::{FundError, FundResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const MINUTES_PER_DAY: u16 = 24 * 60;

/// Wall-clock time with minute resolution, written as zero-padded "HH:MM"
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    minutes: u16,
}

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay { minutes: 0 };

    pub fn new(hour: u32, minute: u32) -> FundResult<Self> {
        if hour >= 24 || minute >= 60 {
            return Err(FundError::config(format!(
                "time {:02}:{:02} is out of range",
                hour, minute
            )));
        }
        Ok(Self {
            minutes: (hour * 60 + minute) as u16,
        })
    }

    /// Parse a 24-hour "HH:MM" string.
    pub fn parse(s: &str) -> FundResult<Self> {
        let invalid = || FundError::config(format!("invalid time '{}', expected HH:MM", s));

        let (hour, minute) = s.split_once(':').ok_or_else(invalid)?;
        if hour.len() != 2 || minute.len() != 2 {
            return Err(invalid());
        }
        if !hour.bytes().chain(minute.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let hour: u32 = hour.parse().map_err(|_| invalid())?;
        let minute: u32 = minute.parse().map_err(|_| invalid())?;
        Self::new(hour, minute).map_err(|_| invalid())
    }

    pub fn minutes_since_midnight(&self) -> u16 {
        self.minutes
    }

    pub fn hour(&self) -> u32 {
        u32::from(self.minutes / 60)
    }

    pub fn minute(&self) -> u32 {
        u32::from(self.minutes % 60)
    }
}

impl From<NaiveTime> for TimeOfDay {
    /// Seconds are dropped.
    fn from(time: NaiveTime) -> Self {
        Self {
            minutes: (time.hour() * 60 + time.minute()) as u16 % MINUTES_PER_DAY,
        }
    }
}

impl FromStr for TimeOfDay {
    type Err = FundError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = FundError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

/// Configured quiet-hours window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuietHoursWindow {
    pub enabled: bool,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl QuietHoursWindow {
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self {
            enabled: true,
            start,
            end,
        }
    }

    /// Build an enabled window from "HH:MM" strings.
    pub fn parse(start: &str, end: &str) -> FundResult<Self> {
        Ok(Self::new(TimeOfDay::parse(start)?, TimeOfDay::parse(end)?))
    }

    pub fn crosses_midnight(&self) -> bool {
        self.start >= self.end
    }

    pub fn is_active_at(&self, now: TimeOfDay) -> bool {
        is_quiet_hours_active(now, self)
    }
}

impl Default for QuietHoursWindow {
    /// Disabled, 22:00 to 07:00.
    fn default() -> Self {
        Self {
            enabled: false,
            start: TimeOfDay { minutes: 22 * 60 },
            end: TimeOfDay { minutes: 7 * 60 },
        }
    }
}

/// Whether `now` falls inside the window. Always false for a disabled
/// window. A window with `start == end` covers the whole day.
pub fn is_quiet_hours_active(now: TimeOfDay, window: &QuietHoursWindow) -> bool {
    if !window.enabled {
        return false;
    }

    if window.start < window.end {
        window.start <= now && now < window.end
    } else {
        now >= window.start || now < window.end
    }
}
