//! Slice open intervals into fixed-length bookable slots.

use chrono::Duration;

use crate::schedule::SlotTime;

/// Split each range into consecutive `slot_minutes` slots.
///
/// A trailing remainder shorter than `slot_minutes` is dropped, so every
/// slot lies inside exactly one input range and none straddles a gap. Output
/// order follows input order. A zero slot length yields nothing.
pub fn generate_slots(ranges: &[SlotTime], slot_minutes: u32) -> Vec<SlotTime> {
    if slot_minutes == 0 {
        return Vec::new();
    }
    let step = Duration::minutes(i64::from(slot_minutes));

    let mut slots = Vec::new();
    for range in ranges {
        let mut cursor = range.start;
        while let Some(end) = cursor.checked_add_signed(step) {
            if end > range.end {
                break;
            }
            slots.push(SlotTime { start: cursor, end });
            cursor = end;
        }
    }

    slots
}
