//! Checks run on a schedule before it is persisted.
//!
//! The resolver never rejects input: malformed ranges silently resolve to
//! nothing and overlaps are merged. These functions surface those problems to
//! whoever edits the schedule, so they are fixed at the source.

use std::collections::HashSet;

use thiserror::Error;

use crate::schedule::{parse_clock, weekday_key, AvailabilityConfig, DaySchedule, TimeRange};

/// A problem found in a schedule. `Display` gives the message shown to staff.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleIssue {
    #[error("{context}: '{start}-{end}' is not a valid HH:MM range")]
    MalformedRange {
        context: String,
        start: String,
        end: String,
    },

    #[error("{context}: start {start} must be before end {end}")]
    StartNotBeforeEnd {
        context: String,
        start: String,
        end: String,
    },

    #[error("{context}: {first} overlaps {second}")]
    Overlap {
        context: String,
        first: String,
        second: String,
    },

    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    #[error("Slot length must be a positive number of minutes")]
    ZeroSlotLength,

    #[error("{context}: invalid exception date '{date}'")]
    InvalidExceptionDate { context: String, date: String },

    #[error("{context}: duplicate exception for {date}, only the first one is applied")]
    DuplicateException { context: String, date: String },

    #[error("{context}: exception for {date} neither closes the day nor overrides its hours")]
    IneffectiveException { context: String, date: String },
}

fn label(range: &TimeRange) -> String {
    format!("{}-{}", range.start, range.end)
}

fn check_ranges(context: &str, ranges: &[TimeRange], issues: &mut Vec<ScheduleIssue>) {
    let mut parsed = Vec::with_capacity(ranges.len());

    for range in ranges {
        match (parse_clock(&range.start), parse_clock(&range.end)) {
            (Some(start), Some(end)) if start < end => parsed.push((range, start, end)),
            (Some(_), Some(_)) => issues.push(ScheduleIssue::StartNotBeforeEnd {
                context: context.to_string(),
                start: range.start.clone(),
                end: range.end.clone(),
            }),
            _ => issues.push(ScheduleIssue::MalformedRange {
                context: context.to_string(),
                start: range.start.clone(),
                end: range.end.clone(),
            }),
        }
    }

    // Pairwise overlap; touching ranges (one ends as the next starts) are fine.
    for (i, (a, a_start, a_end)) in parsed.iter().enumerate() {
        for (b, b_start, b_end) in &parsed[i + 1..] {
            if a_start < b_end && b_start < a_end {
                issues.push(ScheduleIssue::Overlap {
                    context: context.to_string(),
                    first: label(a),
                    second: label(b),
                });
            }
        }
    }
}

/// Validate one day's list of ranges: malformed times, inverted ranges and
/// overlaps.
pub fn validate_time_ranges(ranges: &[TimeRange]) -> Vec<ScheduleIssue> {
    let mut issues = Vec::new();
    check_ranges("ranges", ranges, &mut issues);
    issues
}

fn check_schedule(name: &str, schedule: &DaySchedule, issues: &mut Vec<ScheduleIssue>) {
    for (weekday, ranges) in schedule.days() {
        check_ranges(&format!("{name}.{}", weekday_key(weekday)), ranges, issues);
    }

    let context = format!("{name}.exceptions");
    let mut seen = HashSet::new();

    for exception in &schedule.exceptions {
        let Some(date) = exception.parsed_date() else {
            issues.push(ScheduleIssue::InvalidExceptionDate {
                context: context.clone(),
                date: exception.date.clone(),
            });
            continue;
        };

        if !seen.insert(date) {
            issues.push(ScheduleIssue::DuplicateException {
                context: context.clone(),
                date: exception.date.clone(),
            });
        }

        if !exception.is_effective() {
            issues.push(ScheduleIssue::IneffectiveException {
                context: context.clone(),
                date: exception.date.clone(),
            });
        }

        if let Some(overrides) = &exception.overrides {
            check_ranges(&format!("{context}[{}]", exception.date), overrides, issues);
        }
    }
}

/// Validate a whole config: timezone, slot length, clinic and room schedules.
pub fn validate_config(config: &AvailabilityConfig) -> Vec<ScheduleIssue> {
    let mut issues = Vec::new();

    if config.tz().is_err() {
        issues.push(ScheduleIssue::UnknownTimezone(config.timezone.clone()));
    }
    if config.slot_minutes == 0 {
        issues.push(ScheduleIssue::ZeroSlotLength);
    }

    check_schedule("clinic", &config.clinic, &mut issues);
    for (room_id, schedule) in &config.rooms {
        check_schedule(&format!("rooms.{room_id}"), schedule, &mut issues);
    }

    issues
}
