//! Resolve a weekly schedule with exceptions into open intervals for one date.
//!
//! Precedence, from weakest to strongest:
//!
//! 1. clinic weekly hours ∩ room weekly hours (a room without its own schedule
//!    inherits clinic hours)
//! 2. room exception for the date (closure, or override hours that bypass the
//!    clinic intersection)
//! 3. clinic exception for the date
//!
//! A clinic closure therefore always wins, while a room override can open a
//! room on a day the clinic's weekly hours leave closed.

use chrono::{Datelike, NaiveDate};

use crate::interval;
use crate::schedule::{AvailabilityConfig, DateException, DaySchedule, SlotTime, TimeRange};

/// Anchor a list of wall-clock ranges on `date`, dropping degenerate ones.
fn anchor(ranges: &[TimeRange], date: NaiveDate) -> Vec<SlotTime> {
    interval::merge(ranges.iter().filter_map(|r| r.on(date)))
}

/// Apply a matching exception on top of the current result.
fn apply_exception(
    current: Vec<SlotTime>,
    exception: Option<&DateException>,
    date: NaiveDate,
) -> Vec<SlotTime> {
    match exception {
        Some(e) if e.closed => Vec::new(),
        Some(DateException {
            overrides: Some(ranges),
            ..
        }) => anchor(ranges, date),
        _ => current,
    }
}

/// Open intervals of a single schedule on `date`: its weekday hours, replaced
/// or cleared by its own exception for that date.
pub fn resolve_day(schedule: &DaySchedule, date: NaiveDate) -> Vec<SlotTime> {
    let weekly = anchor(schedule.ranges_for(date.weekday()), date);
    apply_exception(weekly, schedule.exception_for(date), date)
}

/// Effective open intervals for `date`, optionally narrowed to a room.
///
/// When `room_id` is `None`, or names a room without its own schedule, clinic
/// hours apply unmodified. The result is sorted ascending, non-overlapping and
/// possibly empty.
pub fn resolve_availability(
    config: &AvailabilityConfig,
    date: NaiveDate,
    room_id: Option<&str>,
) -> Vec<SlotTime> {
    let weekday = date.weekday();
    let room = config.room(room_id);

    let clinic_ranges = anchor(config.clinic.ranges_for(weekday), date);
    let room_ranges = match room {
        Some(schedule) => anchor(schedule.ranges_for(weekday), date),
        None => clinic_ranges.clone(),
    };

    let mut result = interval::intersect(&clinic_ranges, &room_ranges);

    if let Some(schedule) = room {
        result = apply_exception(result, schedule.exception_for(date), date);
    }
    result = apply_exception(result, config.clinic.exception_for(date), date);

    interval::merge(result)
}
