//! WASM bindings for slot-engine.
//!
//! Exposes availability resolution, slot generation, non-bookable periods and
//! booking validation to the web front end via `wasm-bindgen`. Complex values
//! cross the boundary as JSON strings; dates are `YYYY-MM-DD` and date-times
//! are local wall-clock `YYYY-MM-DDTHH:MM[:SS]`.
//!
//! The booking entry points take the config as `Option<String>` so a clinic
//! without a stored record can be passed as `undefined`/`null`; they then
//! follow the engine's fail-open policy.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir web/src/lib/slot-engine/ \
//!   target/wasm32-unknown-unknown/release/slot_engine_wasm.wasm
//! ```

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use slot_engine::{AvailabilityConfig, ClinicAvailability, SlotTime};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Serialize, Deserialize)]
struct SlotDto {
    start: String,
    end: String,
}

impl From<&SlotTime> for SlotDto {
    fn from(s: &SlotTime) -> Self {
        Self {
            start: s.start.format(DATETIME_FORMAT).to_string(),
            end: s.end.format(DATETIME_FORMAT).to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers: parse boundary values
// ---------------------------------------------------------------------------

fn parse_date(s: &str) -> Result<NaiveDate, JsValue> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| JsValue::from_str(&format!("Invalid date '{}': {}", s, e)))
}

/// Parse a local date-time with or without seconds.
fn parse_datetime(s: &str) -> Result<NaiveDateTime, JsValue> {
    NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .map_err(|e| JsValue::from_str(&format!("Invalid datetime '{}': {}", s, e)))
}

fn parse_config(json: &str) -> Result<AvailabilityConfig, JsValue> {
    AvailabilityConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Build the booking facade; an absent config stays absent.
fn clinic(config_json: Option<String>) -> Result<ClinicAvailability, JsValue> {
    let config = config_json.as_deref().map(parse_config).transpose()?;
    Ok(ClinicAvailability::new(config))
}

fn parse_slots_json(json: &str) -> Result<Vec<SlotTime>, JsValue> {
    let inputs: Vec<SlotDto> = serde_json::from_str(json)
        .map_err(|e| JsValue::from_str(&format!("Invalid ranges JSON: {}", e)))?;

    inputs
        .into_iter()
        .map(|input| {
            let start = parse_datetime(&input.start)?;
            let end = parse_datetime(&input.end)?;
            SlotTime::new(start, end).ok_or_else(|| {
                JsValue::from_str(&format!(
                    "Range start {} must be before end {}",
                    input.start, input.end
                ))
            })
        })
        .collect()
}

fn slots_to_json(slots: &[SlotTime]) -> Result<String, JsValue> {
    let dtos: Vec<SlotDto> = slots.iter().map(SlotDto::from).collect();
    serde_json::to_string(&dtos)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Resolve the open intervals for `date`, optionally narrowed to `room_id`.
///
/// Returns a JSON array of `{start, end}` objects.
#[wasm_bindgen(js_name = "resolveAvailability")]
pub fn resolve_availability(
    config_json: &str,
    date: &str,
    room_id: Option<String>,
) -> Result<String, JsValue> {
    let config = parse_config(config_json)?;
    let date = parse_date(date)?;
    let ranges = slot_engine::resolve_availability(&config, date, room_id.as_deref());
    slots_to_json(&ranges)
}

/// Slice a JSON array of `{start, end}` ranges into `slot_minutes` slots.
#[wasm_bindgen(js_name = "generateSlots")]
pub fn generate_slots(ranges_json: &str, slot_minutes: u32) -> Result<String, JsValue> {
    let ranges = parse_slots_json(ranges_json)?;
    slots_to_json(&slot_engine::generate_slots(&ranges, slot_minutes))
}

/// Bookable slots of the configured length; `[]` without a config.
#[wasm_bindgen(js_name = "getAvailableSlots")]
pub fn get_available_slots(
    config_json: Option<String>,
    date: &str,
    room_id: Option<String>,
) -> Result<String, JsValue> {
    let clinic = clinic(config_json)?;
    let date = parse_date(date)?;
    slots_to_json(&clinic.get_available_slots(date, room_id.as_deref()))
}

/// Periods of the day to grey out in the calendar; `[]` without a config.
#[wasm_bindgen(js_name = "getNonBookablePeriods")]
pub fn get_non_bookable_periods(
    config_json: Option<String>,
    date: &str,
    room_id: Option<String>,
) -> Result<String, JsValue> {
    let clinic = clinic(config_json)?;
    let date = parse_date(date)?;
    slots_to_json(&clinic.get_non_bookable_periods(date, room_id.as_deref()))
}

/// Whether an appointment from `start` to `end` fits the clinic's hours.
///
/// Fails open: a missing or unreadable config returns `true` so a settings
/// problem never blocks booking. Unparseable `start`/`end` are still errors.
#[wasm_bindgen(js_name = "isTimeSlotAvailable")]
pub fn is_time_slot_available(
    config_json: Option<String>,
    start: &str,
    end: &str,
    room_id: Option<String>,
) -> Result<bool, JsValue> {
    let start = parse_datetime(start)?;
    let end = parse_datetime(end)?;
    let config = config_json
        .as_deref()
        .and_then(|json| AvailabilityConfig::from_json(json).ok());
    Ok(ClinicAvailability::new(config).is_time_slot_available(start, end, room_id.as_deref()))
}

/// Validate a config before saving it. Returns a JSON array of messages.
#[wasm_bindgen(js_name = "validateConfig")]
pub fn validate_config(config_json: &str) -> Result<String, JsValue> {
    let config = parse_config(config_json)?;
    let messages: Vec<String> = slot_engine::validate_config(&config)
        .iter()
        .map(ToString::to_string)
        .collect();
    serde_json::to_string(&messages)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// The fallback config used for clinics without a stored record.
#[wasm_bindgen(js_name = "defaultConfig")]
pub fn default_config() -> Result<String, JsValue> {
    serde_json::to_string(&AvailabilityConfig::default())
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}
