//! Availability configuration model.
//!
//! The shapes here mirror the JSON record the settings store keeps per clinic:
//!
//! ```json
//! {
//!   "timezone": "Europe/Berlin",
//!   "slotMinutes": 15,
//!   "clinic": {
//!     "mon": [{"start": "09:00", "end": "12:00"}, {"start": "14:00", "end": "18:00"}],
//!     "exceptions": [{"date": "2026-12-24", "closed": true}]
//!   },
//!   "rooms": {
//!     "R1": {"sat": [{"start": "10:00", "end": "12:00"}]}
//!   }
//! }
//! ```
//!
//! Time strings are kept verbatim and only parsed at resolution time, so a
//! malformed value degrades to "closed" for that range instead of failing the
//! whole record. Use [`crate::validation`] before persisting a schedule.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Weekdays in the order the week is stored (`mon` first).
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// The JSON key used for a weekday (`"mon"` … `"sun"`).
pub fn weekday_key(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "mon",
        Weekday::Tue => "tue",
        Weekday::Wed => "wed",
        Weekday::Thu => "thu",
        Weekday::Fri => "fri",
        Weekday::Sat => "sat",
        Weekday::Sun => "sun",
    }
}

/// Parse a wall-clock time in `HH:MM` or `HH:MM:SS` form.
pub fn parse_clock(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

/// Parse an ISO calendar date (`YYYY-MM-DD`).
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// A wall-clock range within a single day, e.g. `09:00`–`17:00`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: String,
    pub end: String,
}

impl TimeRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Both bounds parsed, or `None` if either is malformed.
    ///
    /// Does not check ordering; see [`TimeRange::on`].
    pub fn bounds(&self) -> Option<(NaiveTime, NaiveTime)> {
        Some((parse_clock(&self.start)?, parse_clock(&self.end)?))
    }

    /// Anchor this range on `date`.
    ///
    /// Returns `None` for malformed times and for ranges whose start is not
    /// before their end (overnight ranges are not supported).
    pub fn on(&self, date: NaiveDate) -> Option<SlotTime> {
        let (start, end) = self.bounds()?;
        SlotTime::new(date.and_time(start), date.and_time(end))
    }
}

/// A date-specific exception: either a full closure or replacement hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateException {
    /// ISO date (`YYYY-MM-DD`) the exception applies to.
    pub date: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub closed: bool,
    /// Ranges that fully replace the normal schedule for this date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<Vec<TimeRange>>,
}

impl DateException {
    pub fn closed(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            closed: true,
            overrides: None,
        }
    }

    pub fn overrides(date: impl Into<String>, ranges: Vec<TimeRange>) -> Self {
        Self {
            date: date.into(),
            closed: false,
            overrides: Some(ranges),
        }
    }

    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }

    /// Whether this exception changes anything when it matches.
    pub fn is_effective(&self) -> bool {
        self.closed || self.overrides.is_some()
    }
}

/// Weekly open hours plus date exceptions, for a clinic or a single room.
///
/// Missing weekdays are closed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    #[serde(default)]
    pub mon: Vec<TimeRange>,
    #[serde(default)]
    pub tue: Vec<TimeRange>,
    #[serde(default)]
    pub wed: Vec<TimeRange>,
    #[serde(default)]
    pub thu: Vec<TimeRange>,
    #[serde(default)]
    pub fri: Vec<TimeRange>,
    #[serde(default)]
    pub sat: Vec<TimeRange>,
    #[serde(default)]
    pub sun: Vec<TimeRange>,
    #[serde(default)]
    pub exceptions: Vec<DateException>,
}

impl DaySchedule {
    pub fn ranges_for(&self, weekday: Weekday) -> &[TimeRange] {
        match weekday {
            Weekday::Mon => &self.mon,
            Weekday::Tue => &self.tue,
            Weekday::Wed => &self.wed,
            Weekday::Thu => &self.thu,
            Weekday::Fri => &self.fri,
            Weekday::Sat => &self.sat,
            Weekday::Sun => &self.sun,
        }
    }

    pub fn ranges_for_mut(&mut self, weekday: Weekday) -> &mut Vec<TimeRange> {
        match weekday {
            Weekday::Mon => &mut self.mon,
            Weekday::Tue => &mut self.tue,
            Weekday::Wed => &mut self.wed,
            Weekday::Thu => &mut self.thu,
            Weekday::Fri => &mut self.fri,
            Weekday::Sat => &mut self.sat,
            Weekday::Sun => &mut self.sun,
        }
    }

    /// Builder-style setter for one weekday's ranges.
    pub fn with_day(mut self, weekday: Weekday, ranges: Vec<TimeRange>) -> Self {
        *self.ranges_for_mut(weekday) = ranges;
        self
    }

    pub fn with_exception(mut self, exception: DateException) -> Self {
        self.exceptions.push(exception);
        self
    }

    /// The exception for `date`, if any. When several share a date the first
    /// one in list order wins; exceptions with unparseable dates never match.
    pub fn exception_for(&self, date: NaiveDate) -> Option<&DateException> {
        self.exceptions
            .iter()
            .find(|e| e.parsed_date() == Some(date))
    }

    /// `(weekday, ranges)` pairs from Monday to Sunday.
    pub fn days(&self) -> impl Iterator<Item = (Weekday, &[TimeRange])> {
        WEEK.iter().map(move |&wd| (wd, self.ranges_for(wd)))
    }
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_slot_minutes() -> u32 {
    15
}

/// Root availability configuration for one clinic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityConfig {
    /// IANA timezone of the clinic (e.g. "America/New_York").
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Default slot length for calendar pick-lists.
    #[serde(default = "default_slot_minutes")]
    pub slot_minutes: u32,
    #[serde(default)]
    pub clinic: DaySchedule,
    /// Optional per-room refinements, keyed by room id.
    #[serde(default)]
    pub rooms: BTreeMap<String, DaySchedule>,
}

impl Default for AvailabilityConfig {
    /// Fallback used when a clinic has no stored record yet: Mon–Thu
    /// 09:00–17:00, Sat 10:00–14:00, Fri and Sun closed, 15-minute slots.
    fn default() -> Self {
        let weekday_hours = || vec![TimeRange::new("09:00", "17:00")];
        let clinic = DaySchedule::default()
            .with_day(Weekday::Mon, weekday_hours())
            .with_day(Weekday::Tue, weekday_hours())
            .with_day(Weekday::Wed, weekday_hours())
            .with_day(Weekday::Thu, weekday_hours())
            .with_day(Weekday::Sat, vec![TimeRange::new("10:00", "14:00")]);

        Self {
            timezone: default_timezone(),
            slot_minutes: default_slot_minutes(),
            clinic,
            rooms: BTreeMap::new(),
        }
    }
}

impl AvailabilityConfig {
    /// Deserialize a config from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The schedule for `room_id`, if the room has one of its own.
    pub fn room(&self, room_id: Option<&str>) -> Option<&DaySchedule> {
        room_id.and_then(|id| self.rooms.get(id))
    }

    /// The clinic timezone as a `chrono-tz` zone.
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse()
            .map_err(|_| EngineError::InvalidTimezone(self.timezone.clone()))
    }
}

/// A resolved interval bound to a concrete date, in local wall-clock time.
///
/// Always satisfies `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotTime {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl SlotTime {
    /// `None` unless `start < end`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    /// Whether `[start, end]` lies entirely inside this interval.
    pub fn contains(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.start <= start && end <= self.end
    }
}
