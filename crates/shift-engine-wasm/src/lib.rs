//! WASM bindings for shift-engine.
//!
//! Exposes shift validation, conflict verdicts, reconciliation and booking
//! checks to JavaScript via `wasm-bindgen`. All complex types are passed as
//! JSON strings in the same camelCase shape the CLI prints.
//!
//! Engine calls take a `role` (`"medic"` or `"assistant"`) selecting the
//! preset configuration, and an optional config JSON whose fields override
//! the preset's.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p shift-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir packages/shift-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/shift_engine_wasm.wasm
//! ```

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use shift_engine::{
    Appointment, Booking, ConfigOverrides, EngineConfig, OwnerRole, RawShift, Shift, ShiftEngine,
    ShiftPatch, StoredShift, Verdict,
};
use wasm_bindgen::prelude::*;

/// Stored ids cross the boundary untouched: numbers, strings or UUIDs.
type Id = Value;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_json<T: DeserializeOwned>(json: &str, what: &str) -> Result<T, JsValue> {
    serde_json::from_str(json)
        .map_err(|e| JsValue::from_str(&format!("Invalid {} JSON: {}", what, e)))
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Build an engine from a role preset with `config_json` applied on top.
fn build_engine(role: &str, config_json: Option<String>) -> Result<ShiftEngine, JsValue> {
    let role = role
        .parse::<OwnerRole>()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let mut config = EngineConfig::for_role(role);
    if let Some(json) = config_json {
        config = parse_json::<ConfigOverrides>(&json, "config")?.apply(config);
    }
    ShiftEngine::new(config).map_err(|e| JsValue::from_str(&e.to_string()))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Validate a JSON array of `{checkIn, checkOut, days}` request shifts.
///
/// Returns the normalized shifts as a JSON array, or an `invalidShift`
/// verdict naming the first failing index.
#[wasm_bindgen(js_name = "validateShifts")]
pub fn validate_shifts(
    shifts_json: &str,
    role: &str,
    config_json: Option<String>,
) -> Result<String, JsValue> {
    let engine = build_engine(role, config_json)?;
    let raws: Vec<RawShift> = parse_json(shifts_json, "shifts")?;

    match engine.validate_batch(&raws) {
        Ok(shifts) => to_json(&shifts),
        Err((index, reason)) => to_json(&Verdict::<Id>::InvalidShift { index, reason }),
    }
}

/// Check adding a batch of request shifts to an owner's stored shifts.
///
/// `existing_json` is a JSON array of `{id, checkIn, checkOut, days}`.
/// Returns the verdict as JSON.
#[wasm_bindgen(js_name = "checkCreate")]
pub fn check_create(
    batch_json: &str,
    existing_json: &str,
    role: &str,
    config_json: Option<String>,
) -> Result<String, JsValue> {
    let engine = build_engine(role, config_json)?;
    let batch: Vec<RawShift> = parse_json(batch_json, "shifts")?;
    let existing: Vec<StoredShift<Id>> = parse_json(existing_json, "existing shifts")?;

    to_json(&engine.check_create(&batch, &existing))
}

/// Check editing the stored shift `id_json` (a JSON id, e.g. `3` or `"abc"`).
///
/// `shift_json` is a patch: fields it omits keep their stored values.
#[wasm_bindgen(js_name = "checkUpdate")]
pub fn check_update(
    id_json: &str,
    shift_json: &str,
    existing_json: &str,
    role: &str,
    config_json: Option<String>,
) -> Result<String, JsValue> {
    let engine = build_engine(role, config_json)?;
    let id: Id = parse_json(id_json, "id")?;
    let patch: ShiftPatch = parse_json(shift_json, "shift")?;
    let existing: Vec<StoredShift<Id>> = parse_json(existing_json, "existing shifts")?;

    to_json(&engine.check_patch(&id, &patch, &existing))
}

/// Check replacing the whole stored set with `desired_json`.
///
/// Returns `{verdict, changes}` where `changes` carries `toAdd` signatures,
/// `toRemove` and `unchanged` stored shifts when the verdict is `valid`.
#[wasm_bindgen(js_name = "planReplace")]
pub fn plan_replace(
    desired_json: &str,
    existing_json: &str,
    role: &str,
    config_json: Option<String>,
) -> Result<String, JsValue> {
    let engine = build_engine(role, config_json)?;
    let desired: Vec<RawShift> = parse_json(desired_json, "shifts")?;
    let existing: Vec<StoredShift<Id>> = parse_json(existing_json, "existing shifts")?;

    to_json(&engine.plan_replace(&desired, &existing))
}

/// Check removing the stored shift `id_json`.
#[wasm_bindgen(js_name = "checkRemove")]
pub fn check_remove(
    id_json: &str,
    existing_json: &str,
    role: &str,
    config_json: Option<String>,
) -> Result<String, JsValue> {
    let engine = build_engine(role, config_json)?;
    let id: Id = parse_json(id_json, "id")?;
    let existing: Vec<StoredShift<Id>> = parse_json(existing_json, "existing shifts")?;

    to_json(&engine.check_remove(&id, &existing))
}

/// True when two JSON shift arrays describe the same schedule, ignoring list
/// order and day order.
#[wasm_bindgen(js_name = "shiftSetsEqual")]
pub fn shift_sets_equal(a_json: &str, b_json: &str) -> Result<bool, JsValue> {
    let a: Vec<Shift> = parse_json(a_json, "shifts")?;
    let b: Vec<Shift> = parse_json(b_json, "shifts")?;

    Ok(shift_engine::shift_sets_equal(&a, &b))
}

/// Check an appointment `{start, end}` (naive local datetimes) against the
/// owner's shifts and existing bookings `[{id, start, end}]`.
///
/// `exclude_json` is the id of the booking being rescheduled, if any.
#[wasm_bindgen(js_name = "checkBooking")]
pub fn check_booking(
    appointment_json: &str,
    shifts_json: &str,
    bookings_json: &str,
    exclude_json: Option<String>,
) -> Result<String, JsValue> {
    let appointment: Appointment = parse_json(appointment_json, "appointment")?;
    let shifts: Vec<Shift> = parse_json(shifts_json, "shifts")?;
    let bookings: Vec<Booking<Id>> = parse_json(bookings_json, "bookings")?;
    let exclude: Option<Id> = exclude_json
        .map(|json| parse_json(&json, "id"))
        .transpose()?;

    to_json(&shift_engine::check_booking(
        &appointment,
        &shifts,
        &bookings,
        exclude.as_ref(),
    ))
}
