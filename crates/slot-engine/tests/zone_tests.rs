//! Tests for localizing wall-clock slots across DST transitions.

use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;
use slot_engine::schedule::SlotTime;
use slot_engine::zone::{localize, localize_slots, DstPolicy};

fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
}

fn new_york() -> Tz {
    "America/New_York".parse().unwrap()
}

#[test]
fn ordinary_time_localizes_directly() {
    let dt = localize(&new_york(), at("2026-03-16 09:00"), DstPolicy::Skip).unwrap();

    assert_eq!(dt.to_rfc3339(), "2026-03-16T09:00:00-04:00");
}

#[test]
fn gap_time_shifts_forward() {
    // 2026-03-08 02:30 does not exist in New York (02:00 → 03:00).
    let dt = localize(&new_york(), at("2026-03-08 02:30"), DstPolicy::ShiftForward).unwrap();

    assert_eq!(dt.to_rfc3339(), "2026-03-08T03:00:00-04:00");
}

#[test]
fn gap_time_is_skipped() {
    assert!(localize(&new_york(), at("2026-03-08 02:30"), DstPolicy::Skip).is_none());
}

#[test]
fn ambiguous_time_takes_earliest_instant() {
    // 2026-11-01 01:30 happens twice in New York; the first is still EDT.
    let dt = localize(&new_york(), at("2026-11-01 01:30"), DstPolicy::Skip).unwrap();

    assert_eq!(dt.to_rfc3339(), "2026-11-01T01:30:00-04:00");
}

#[test]
fn slots_in_gap_follow_policy() {
    let slots = [
        SlotTime::new(at("2026-03-08 01:00"), at("2026-03-08 01:30")).unwrap(),
        SlotTime::new(at("2026-03-08 02:00"), at("2026-03-08 02:30")).unwrap(),
        SlotTime::new(at("2026-03-08 02:30"), at("2026-03-08 03:30")).unwrap(),
        SlotTime::new(at("2026-03-08 04:00"), at("2026-03-08 04:30")).unwrap(),
    ];

    let skipped = localize_slots(&slots, &new_york(), DstPolicy::Skip);
    assert_eq!(skipped.len(), 2);

    // 02:00-02:30 collapses to 03:00-03:00 and is dropped; 02:30-03:30 becomes 03:00-03:30.
    let shifted = localize_slots(&slots, &new_york(), DstPolicy::ShiftForward);
    assert_eq!(shifted.len(), 3);
    assert_eq!(shifted[1].start.to_rfc3339(), "2026-03-08T03:00:00-04:00");
    assert_eq!(shifted[1].end.to_rfc3339(), "2026-03-08T03:30:00-04:00");
}

#[test]
fn utc_is_identity() {
    let tz: Tz = "UTC".parse().unwrap();
    let local = at("2026-06-01 12:00");

    let dt = localize(&tz, local, DstPolicy::default()).unwrap();

    assert_eq!(dt.with_timezone(&Utc).naive_utc(), local);
}
