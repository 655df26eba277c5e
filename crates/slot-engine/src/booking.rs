//! Booking facade used by appointment forms and calendar views.
//!
//! Wraps an optional [`AvailabilityConfig`] and applies the fail-open policy:
//! a clinic that has not configured its hours yet must never see bookings
//! blocked, and an internal error degrades to "available" for validation and
//! to an empty list for anything that feeds a calendar.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::{debug, error, warn};

use crate::error::{EngineError, Result};
use crate::interval;
use crate::resolver::resolve_availability;
use crate::schedule::{AvailabilityConfig, SlotTime};
use crate::slots::generate_slots;
use crate::zone::{localize_slots, DstPolicy, ZonedSlot};

/// Availability of one clinic, as seen by booking screens.
#[derive(Debug, Clone, Default)]
pub struct ClinicAvailability {
    config: Option<AvailabilityConfig>,
}

/// `[00:00, next midnight)` for `date`.
fn day_bounds(date: NaiveDate) -> Result<(NaiveDateTime, NaiveDateTime)> {
    let next = date
        .succ_opt()
        .ok_or_else(|| EngineError::DateOutOfRange(date.to_string()))?;
    Ok((date.and_time(NaiveTime::MIN), next.and_time(NaiveTime::MIN)))
}

impl ClinicAvailability {
    pub fn new(config: Option<AvailabilityConfig>) -> Self {
        Self { config }
    }

    pub fn configured(config: AvailabilityConfig) -> Self {
        Self::new(Some(config))
    }

    /// A clinic with no stored availability record.
    pub fn unconfigured() -> Self {
        Self::new(None)
    }

    pub fn config(&self) -> Option<&AvailabilityConfig> {
        self.config.as_ref()
    }

    /// Resolved open intervals, or an empty list without a config.
    pub fn resolve(&self, date: NaiveDate, room_id: Option<&str>) -> Vec<SlotTime> {
        self.config
            .as_ref()
            .map(|config| resolve_availability(config, date, room_id))
            .unwrap_or_default()
    }

    /// Whether `[start, end]` fits entirely inside one open interval of
    /// `start`'s date.
    ///
    /// Appointments may not span midnight. Without a config every range is
    /// accepted; an empty or inverted range never is.
    pub fn is_time_slot_available(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        room_id: Option<&str>,
    ) -> bool {
        let Some(config) = &self.config else {
            debug!("no availability config, accepting {start} - {end}");
            return true;
        };

        if end <= start {
            debug!("rejecting empty or inverted range {start} - {end}");
            return false;
        }

        let ranges = resolve_availability(config, start.date(), room_id);
        interval::contains(&ranges, start, end)
    }

    /// Fallible form of [`ClinicAvailability::get_available_slots`].
    pub fn try_available_slots(
        &self,
        date: NaiveDate,
        room_id: Option<&str>,
    ) -> Result<Vec<SlotTime>> {
        let Some(config) = &self.config else {
            return Ok(Vec::new());
        };
        if config.slot_minutes == 0 {
            return Err(EngineError::InvalidSlotLength(config.slot_minutes));
        }

        let ranges = resolve_availability(config, date, room_id);
        Ok(generate_slots(&ranges, config.slot_minutes))
    }

    /// Bookable slots of the configured length for `date`.
    pub fn get_available_slots(&self, date: NaiveDate, room_id: Option<&str>) -> Vec<SlotTime> {
        self.try_available_slots(date, room_id)
            .unwrap_or_else(|e| {
                error!("failed to generate slots for {date} (room {room_id:?}): {e}");
                Vec::new()
            })
    }

    /// Fallible form of [`ClinicAvailability::get_non_bookable_periods`].
    pub fn try_non_bookable_periods(
        &self,
        date: NaiveDate,
        room_id: Option<&str>,
    ) -> Result<Vec<SlotTime>> {
        if self.config.is_none() {
            return Ok(Vec::new());
        }

        let (day_start, day_end) = day_bounds(date)?;
        let ranges = self.resolve(date, room_id);
        Ok(interval::complement(&ranges, day_start, day_end))
    }

    /// Gaps between open intervals across the whole day, for greying out
    /// calendar cells. A closed day yields one period spanning the day.
    ///
    /// Only for display; validation goes through
    /// [`ClinicAvailability::is_time_slot_available`].
    pub fn get_non_bookable_periods(
        &self,
        date: NaiveDate,
        room_id: Option<&str>,
    ) -> Vec<SlotTime> {
        self.try_non_bookable_periods(date, room_id)
            .unwrap_or_else(|e| {
                error!("failed to compute non-bookable periods for {date} (room {room_id:?}): {e}");
                Vec::new()
            })
    }

    /// Validate a requested appointment and tell the user when it is refused.
    ///
    /// `notify` receives a human-readable message only on rejection.
    pub fn validate_and_notify<F>(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        room_id: Option<&str>,
        notify: F,
    ) -> bool
    where
        F: FnOnce(&str),
    {
        if self.is_time_slot_available(start, end, room_id) {
            return true;
        }

        let message = match room_id {
            Some(room) => format!(
                "{} - {} is outside the available hours for room {room}",
                start.format("%Y-%m-%d %H:%M"),
                end.format("%H:%M"),
            ),
            None => format!(
                "{} - {} is outside the clinic's available hours",
                start.format("%Y-%m-%d %H:%M"),
                end.format("%H:%M"),
            ),
        };
        warn!("{message}");
        notify(&message);
        false
    }

    /// Available slots pinned to the clinic timezone.
    pub fn zoned_slots(
        &self,
        date: NaiveDate,
        room_id: Option<&str>,
        policy: DstPolicy,
    ) -> Result<Vec<ZonedSlot>> {
        let Some(config) = &self.config else {
            return Ok(Vec::new());
        };
        let tz = config.tz()?;
        let slots = self.try_available_slots(date, room_id)?;
        Ok(localize_slots(&slots, &tz, policy))
    }
}
