//! Interval algebra over resolved [`SlotTime`] lists.
//!
//! All operations take and return half-open wall-clock intervals. Outputs of
//! [`merge`], [`intersect`] and [`complement`] are sorted ascending by start
//! and never overlap.

use chrono::NaiveDateTime;

use crate::schedule::SlotTime;

/// Merge overlapping or touching intervals.
///
/// Input may be unsorted and may overlap; upstream data-entry mistakes such
/// as `09:00-12:00` next to `11:00-13:00` collapse into one range.
pub fn merge(intervals: impl IntoIterator<Item = SlotTime>) -> Vec<SlotTime> {
    let mut sorted: Vec<SlotTime> = intervals.into_iter().collect();
    if sorted.is_empty() {
        return sorted;
    }

    // Sort by start time (then by end time for stability).
    sorted.sort();

    let mut merged: Vec<SlotTime> = Vec::with_capacity(sorted.len());
    for interval in sorted {
        if let Some(last) = merged.last_mut() {
            if interval.start <= last.end {
                last.end = last.end.max(interval.end);
                continue;
            }
        }
        merged.push(interval);
    }

    merged
}

/// Intersect two interval lists.
///
/// Both sides are merged first, then walked with two cursors. The result is
/// empty whenever either side is empty.
pub fn intersect(a: &[SlotTime], b: &[SlotTime]) -> Vec<SlotTime> {
    let a = merge(a.iter().copied());
    let b = merge(b.iter().copied());

    let mut out = Vec::new();
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        let start = a[i].start.max(b[j].start);
        let end = a[i].end.min(b[j].end);
        if let Some(overlap) = SlotTime::new(start, end) {
            out.push(overlap);
        }

        // Advance whichever interval finishes first.
        if a[i].end <= b[j].end {
            i += 1;
        } else {
            j += 1;
        }
    }

    merge(out)
}

/// The gaps of `intervals` inside `[window_start, window_end)`.
///
/// Intervals are clipped to the window; an empty list yields the whole window.
pub fn complement(
    intervals: &[SlotTime],
    window_start: NaiveDateTime,
    window_end: NaiveDateTime,
) -> Vec<SlotTime> {
    let clipped = merge(
        intervals
            .iter()
            .filter_map(|s| SlotTime::new(s.start.max(window_start), s.end.min(window_end))),
    );

    let mut gaps = Vec::new();
    let mut cursor = window_start;

    for busy in &clipped {
        if let Some(gap) = SlotTime::new(cursor, busy.start) {
            gaps.push(gap);
        }
        cursor = cursor.max(busy.end);
    }

    // Trailing gap after the last interval.
    if let Some(gap) = SlotTime::new(cursor, window_end) {
        gaps.push(gap);
    }

    gaps
}

/// Whether `[start, end]` fits entirely inside at least one interval.
///
/// Partial overlap does not count.
pub fn contains(intervals: &[SlotTime], start: NaiveDateTime, end: NaiveDateTime) -> bool {
    start < end && intervals.iter().any(|s| s.contains(start, end))
}
