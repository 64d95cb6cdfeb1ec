use chrono::Duration;
use serde::Serialize;
use tracing::{info, warn};
use utoipa::ToSchema;

use super::{clock::Clock, geo};
use crate::error::{AppError, AppResult};
use crate::model::{
    attendance::{AttendanceLog, CheckType, GeoReading, GeofenceVerdict, NewAttendanceLog},
    company_location::CompanyLocation,
    employee::Employee,
};
use crate::store::HrStore;

/// Same-type punches closer together than this are treated as double taps.
pub const DEBOUNCE_MINUTES: i64 = 5;

pub const PIN_LENGTH: usize = 6;

/// Punches shown back on the kiosk after a successful punch.
pub const KIOSK_RECENT_LIMIT: u32 = 5;

pub fn validate_pin(pin: &str) -> AppResult<()> {
    if pin.len() == PIN_LENGTH && pin.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "PIN must be exactly {} digits",
            PIN_LENGTH
        )))
    }
}

/// Resolves a kiosk PIN to its active employee. Inactive employees never match.
pub async fn employee_by_pin<S>(store: &S, pin: &str) -> AppResult<Employee>
where
    S: HrStore + ?Sized,
{
    validate_pin(pin)?;
    store
        .find_active_employee_by_pin(pin)
        .await?
        .ok_or(AppError::InvalidPin)
}

/// Appends a punch unless the same employee already punched the same type
/// within the debounce window. No IN/OUT ordering is enforced.
pub async fn record_punch<S>(
    store: &S,
    clock: &dyn Clock,
    employee_id: u64,
    check_type: CheckType,
    reading: Option<GeoReading>,
    locations: &[CompanyLocation],
) -> AppResult<AttendanceLog>
where
    S: HrStore + ?Sized,
{
    let now = clock.now();
    let window_start = now - Duration::minutes(DEBOUNCE_MINUTES);

    // location is advisory: an off-site or unknown position never blocks the punch
    let geofence = reading.map(|r| geo::is_within_any_location(&r, locations));

    let punch = NewAttendanceLog {
        employee_id,
        check_type,
        checked_at: now,
        reading,
        geofence: geofence.clone(),
        is_makeup: false,
    };
    let Some(log) = store.insert_punch_debounced(punch, window_start).await? else {
        info!(employee_id, %check_type, "Duplicate punch suppressed");
        return Err(AppError::DuplicatePunch {
            check_type,
            window_minutes: DEBOUNCE_MINUTES,
        });
    };

    match &geofence {
        None => warn!(employee_id, punch_id = log.id, "Punch recorded without geolocation"),
        Some(v) if !v.in_range => warn!(
            employee_id,
            punch_id = log.id,
            location = %v.location_name,
            distance_meters = v.distance_meters,
            "Punch recorded outside geofence"
        ),
        Some(_) => {}
    }

    info!(employee_id, punch_id = log.id, %check_type, "Punch recorded");
    Ok(log)
}

pub async fn recent_punches<S>(store: &S, employee_id: u64, limit: u32) -> AppResult<Vec<AttendanceLog>>
where
    S: HrStore + ?Sized,
{
    Ok(store.recent_punches(employee_id, limit).await?)
}

/// Admin hard delete; punches are otherwise immutable.
pub async fn delete_punch<S>(store: &S, punch_id: u64) -> AppResult<()>
where
    S: HrStore + ?Sized,
{
    if store.delete_punch(punch_id).await? {
        info!(punch_id, "Punch deleted");
        Ok(())
    } else {
        Err(AppError::not_found("punch", punch_id))
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct KioskPunchResult {
    #[schema(example = "Lin Mei")]
    pub employee_name: String,
    pub punch: AttendanceLog,
    /// Absent when the kiosk could not obtain a position.
    pub geofence: Option<GeofenceVerdict>,
    pub recent: Vec<AttendanceLog>,
}

/// Full kiosk flow: PIN lookup, debounced punch, feedback list.
pub async fn kiosk_punch<S>(
    store: &S,
    clock: &dyn Clock,
    pin: &str,
    check_type: CheckType,
    reading: Option<GeoReading>,
    locations: &[CompanyLocation],
) -> AppResult<KioskPunchResult>
where
    S: HrStore + ?Sized,
{
    let employee = employee_by_pin(store, pin).await?;
    let punch = record_punch(store, clock, employee.id, check_type, reading, locations).await?;
    let recent = recent_punches(store, employee.id, KIOSK_RECENT_LIMIT).await?;

    Ok(KioskPunchResult {
        employee_name: employee.name,
        geofence: punch.location_name.clone().map(|location_name| GeofenceVerdict {
            location_name,
            distance_meters: punch.distance_meters.unwrap_or_default(),
            in_range: punch.is_in_range.unwrap_or(false),
        }),
        punch,
        recent,
    })
}
