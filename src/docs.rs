use crate::api::{RejectBody, kiosk::KioskPunchReq};
use crate::model::{
    attendance::{AttendanceLog, CheckType, GeoReading, GeofenceVerdict},
    car::{CarStatus, CarUsageRequest},
    employee::Employee,
    leave_request::LeaveRequest,
    leave_type::LeaveType,
    makeup_request::MakeupRequest,
    request::RequestStatus,
};
use crate::service::{
    ledger::KioskPunchResult,
    report::{DayReport, MonthTotals, MonthlyReport, TeamSummaryRow},
    request_flow::{CarUsageSubmission, LeaveSubmission, ListMode, MakeupSubmission, StatusFilter},
};
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance Hub API",
        version = "1.0.0",
        description = r#"
## Attendance and HR self-service

Kiosk clock-in/out with geofence auditing, leave and business-trip requests,
makeup attendance requests, company car reservations and monthly attendance
reports.

### Kiosk
`POST /kiosk/punch` is public and identifies the employee by a six digit PIN.
A punch of the same direction within 5 minutes is refused with `DUPLICATE_PUNCH`.
Location is recorded for audit and never blocks a punch.

### Requests
Every request kind moves `PENDING -> APPROVED` or `PENDING -> REJECTED` once.
List and review endpoints take `mode`:
- `supervisor` (default): direct reports only
- `admin`: company wide, HR and Admin only
- `mine`: the caller's own requests (listing only)

### Security
Endpoints under `/api` require a **JWT Bearer** access token.

### Errors
Failures are returned as `{"error": CODE, "message": text}`.
"#,
    ),
    paths(
        crate::api::kiosk::punch,

        crate::api::attendance::recent,
        crate::api::attendance::monthly_report,
        crate::api::attendance::team_summary,
        crate::api::attendance::delete_punch,

        crate::api::leave_request::leave_types,
        crate::api::leave_request::create_leave,
        crate::api::leave_request::leave_list,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,

        crate::api::makeup_request::create_makeup,
        crate::api::makeup_request::makeup_list,
        crate::api::makeup_request::approve_makeup,
        crate::api::makeup_request::reject_makeup,

        crate::api::car_request::create_car_request,
        crate::api::car_request::car_request_list,
        crate::api::car_request::approve_car_request,
        crate::api::car_request::reject_car_request
    ),
    components(
        schemas(
            KioskPunchReq,
            KioskPunchResult,
            CheckType,
            GeoReading,
            GeofenceVerdict,
            AttendanceLog,
            Employee,
            LeaveType,
            LeaveRequest,
            MakeupRequest,
            CarUsageRequest,
            CarStatus,
            RequestStatus,
            LeaveSubmission,
            MakeupSubmission,
            CarUsageSubmission,
            RejectBody,
            ListMode,
            StatusFilter,
            DayReport,
            MonthTotals,
            MonthlyReport,
            TeamSummaryRow
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Kiosk", description = "PIN based clock-in/out"),
        (name = "Attendance", description = "Punch history and monthly reports"),
        (name = "Leave", description = "Leave and business-trip requests"),
        (name = "Makeup", description = "Makeup attendance requests"),
        (name = "Car", description = "Company car reservations"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
