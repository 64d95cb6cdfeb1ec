//! Persistence boundary for the attendance core.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::model::{
    attendance::{AttendanceLog, NewAttendanceLog},
    car::{Car, CarStatus, NewCarUsageRequest},
    company_location::CompanyLocation,
    employee::Employee,
    leave_request::{LeaveRequest, NewLeaveRequest},
    leave_type::LeaveType,
    makeup_request::NewMakeupRequest,
    request::{RequestFilter, RequestKind, Review, ReviewableRequest},
};

#[cfg(test)]
pub mod memory;
pub mod mysql;

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait HrStore: Send + Sync {
    async fn find_active_employee_by_pin(&self, pin: &str) -> StoreResult<Option<Employee>>;

    async fn get_employee(&self, id: u64) -> StoreResult<Option<Employee>>;

    /// Active employees, optionally only the direct reports of `manager_id`.
    async fn list_active_employees(&self, manager_id: Option<u64>) -> StoreResult<Vec<Employee>>;

    async fn active_locations(&self) -> StoreResult<Vec<CompanyLocation>>;

    /// Writes `punch` unless the employee already has a punch of the same
    /// type at or after `since`, in which case nothing is written and `None`
    /// is returned. Concurrent calls for one employee are serialized, so two
    /// double taps cannot both pass the check.
    async fn insert_punch_debounced(
        &self,
        punch: NewAttendanceLog,
        since: DateTime<Utc>,
    ) -> StoreResult<Option<AttendanceLog>>;

    /// Newest first.
    async fn recent_punches(&self, employee_id: u64, limit: u32) -> StoreResult<Vec<AttendanceLog>>;

    /// Punches in `[from, to)`, oldest first.
    async fn punches_between(
        &self,
        employee_id: u64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> StoreResult<Vec<AttendanceLog>>;

    async fn delete_punch(&self, id: u64) -> StoreResult<bool>;

    async fn get_leave_type(&self, id: u64) -> StoreResult<Option<LeaveType>>;

    /// Active leave types ordered by `sort_order`.
    async fn list_leave_types(&self) -> StoreResult<Vec<LeaveType>>;

    async fn get_car(&self, id: u64) -> StoreResult<Option<Car>>;

    async fn set_car_status(&self, id: u64, status: CarStatus) -> StoreResult<()>;

    async fn insert_leave_request(&self, request: NewLeaveRequest) -> StoreResult<ReviewableRequest>;

    async fn insert_makeup_request(&self, request: NewMakeupRequest) -> StoreResult<ReviewableRequest>;

    async fn insert_car_request(&self, request: NewCarUsageRequest) -> StoreResult<ReviewableRequest>;

    async fn get_request(&self, kind: RequestKind, id: u64) -> StoreResult<Option<ReviewableRequest>>;

    /// Newest first.
    async fn list_requests(
        &self,
        kind: RequestKind,
        filter: &RequestFilter,
    ) -> StoreResult<Vec<ReviewableRequest>>;

    /// Moves a request out of PENDING. The status check and the write are a
    /// single conditional update; returns false when the request was not pending.
    async fn finalize_request(&self, kind: RequestKind, id: u64, review: &Review) -> StoreResult<bool>;

    /// Approves a makeup request and writes its punch in one transaction.
    /// Returns `None` when the request was not pending; nothing is written then,
    /// and nothing is written when any step fails.
    async fn approve_makeup_with_punch(
        &self,
        id: u64,
        review: &Review,
        punch: NewAttendanceLog,
    ) -> StoreResult<Option<AttendanceLog>>;

    /// Approved leave overlapping `[from, to)`.
    async fn approved_leaves_between(
        &self,
        employee_id: u64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> StoreResult<Vec<LeaveRequest>>;
}
