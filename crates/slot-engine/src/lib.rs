//! # slot-engine
//!
//! Clinic and room availability resolution for appointment booking.
//!
//! A clinic publishes weekly open hours (optionally split into several ranges
//! per day), rooms may narrow those hours with their own weekly schedule, and
//! both levels can carry date-specific exceptions that close a day or replace
//! its hours outright. The engine turns that declarative configuration into
//! concrete wall-clock intervals for a given date, slices them into bookable
//! slots, derives the non-bookable gaps for calendar dimming, and checks
//! ad-hoc appointment ranges against the result.
//!
//! Every function is pure with respect to the [`AvailabilityConfig`] it is
//! given; there is no global state and no I/O.
//!
//! ## Modules
//!
//! - [`schedule`] — configuration model (`TimeRange`, `DaySchedule`, `DateException`, `AvailabilityConfig`)
//! - [`resolver`] — weekly schedule + exceptions → open intervals for one date
//! - [`slots`] — open intervals → fixed-length bookable slots
//! - [`interval`] — merge / intersect / complement primitives
//! - [`booking`] — fail-open booking facade used by forms and calendars
//! - [`validation`] — pre-persistence checks for schedules and configs
//! - [`zone`] — pin wall-clock slots to the clinic timezone (DST policies)
//! - [`error`] — Error types

pub mod booking;
pub mod error;
pub mod interval;
pub mod resolver;
pub mod schedule;
pub mod slots;
pub mod validation;
pub mod zone;

pub use booking::ClinicAvailability;
pub use error::EngineError;
pub use resolver::{resolve_availability, resolve_day};
pub use schedule::{AvailabilityConfig, DateException, DaySchedule, SlotTime, TimeRange};
pub use slots::generate_slots;
pub use validation::{validate_config, validate_time_ranges, ScheduleIssue};
pub use zone::{localize_slots, DstPolicy, ZonedSlot};
