//! Pin wall-clock slots to the clinic timezone.
//!
//! Resolution works purely in local wall-clock time. Consumers that need
//! absolute instants (reminder e-mails, external calendars) localize the
//! result here, where DST transitions have to be decided.

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::schedule::SlotTime;

/// Upper bound on a DST gap; real-world gaps are at most two hours.
const MAX_GAP_MINUTES: i64 = 180;

/// Policy for wall-clock times that do not exist on a DST spring-forward day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DstPolicy {
    /// Drop slots touching the gap (e.g. 02:30 while clocks jump 02:00 → 03:00)
    Skip,
    /// Move the missing time to the first valid minute after the gap
    #[default]
    ShiftForward,
}

/// A slot pinned to absolute instants in the clinic timezone.
#[derive(Debug, Clone, PartialEq)]
pub struct ZonedSlot {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

/// Localize a single wall-clock time.
///
/// Ambiguous times (fall-back overlap) resolve to the earliest instant.
pub fn localize(tz: &Tz, local: NaiveDateTime, policy: DstPolicy) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => match policy {
            DstPolicy::Skip => None,
            DstPolicy::ShiftForward => (1..=MAX_GAP_MINUTES).find_map(|m| {
                local
                    .checked_add_signed(Duration::minutes(m))
                    .and_then(|shifted| tz.from_local_datetime(&shifted).earliest())
            }),
        },
    }
}

/// Localize every slot, dropping those the policy rejects or whose localized
/// end is not after the localized start.
pub fn localize_slots(slots: &[SlotTime], tz: &Tz, policy: DstPolicy) -> Vec<ZonedSlot> {
    slots
        .iter()
        .filter_map(|slot| {
            let start = localize(tz, slot.start, policy)?;
            let end = localize(tz, slot.end, policy)?;
            (start < end).then_some(ZonedSlot { start, end })
        })
        .collect()
}
