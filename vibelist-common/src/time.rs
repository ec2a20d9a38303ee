//! Listening context derived from the wall clock
//!
//! Produces the short natural-language descriptor ("evening on a weekday
//! Tuesday") that the vibe and playlist prompts use to shade their
//! interpretation of a request.

use chrono::{DateTime, Datelike, Local, TimeZone, Timelike, Weekday};
use std::fmt;

/// Time-of-day bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOfDay {
    /// 05:00 - 11:59
    Morning,
    /// 12:00 - 16:59
    Afternoon,
    /// 17:00 - 21:59
    Evening,
    /// 22:00 - 04:59
    LateNight,
}

impl TimeOfDay {
    /// Bucket an hour of the day (0-23)
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => TimeOfDay::Morning,
            12..=16 => TimeOfDay::Afternoon,
            17..=21 => TimeOfDay::Evening,
            _ => TimeOfDay::LateNight,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Afternoon => "afternoon",
            TimeOfDay::Evening => "evening",
            TimeOfDay::LateNight => "late night",
        }
    }
}

/// Time/day signals for one pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListeningContext {
    pub time_of_day: TimeOfDay,
    pub weekday: Weekday,
}

impl ListeningContext {
    /// Derive context from any timestamp
    pub fn at<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> Self {
        Self {
            time_of_day: TimeOfDay::from_hour(timestamp.hour()),
            weekday: timestamp.weekday(),
        }
    }

    /// Derive context from the local wall clock
    pub fn now() -> Self {
        Self::at(&Local::now())
    }

    /// Saturday and Sunday are the weekend
    pub fn is_weekend(&self) -> bool {
        matches!(self.weekday, Weekday::Sat | Weekday::Sun)
    }
}

impl fmt::Display for ListeningContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let work_context = if self.is_weekend() { "weekend" } else { "weekday" };
        write!(
            f,
            "{} on a {} {}",
            self.time_of_day.label(),
            work_context,
            weekday_name(self.weekday)
        )
    }
}

/// Full English weekday name (chrono's Display gives the short form)
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Context descriptor for the current local time
pub fn contextual_hints() -> String {
    ListeningContext::now().to_string()
}
