//! In-process `HrStore` for tests.

use std::sync::{
    Mutex, MutexGuard,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{HrStore, StoreResult};
use crate::error::StoreError;
use crate::model::{
    attendance::{AttendanceLog, NewAttendanceLog},
    car::{Car, CarStatus, CarUsageRequest, NewCarUsageRequest},
    company_location::CompanyLocation,
    employee::Employee,
    leave_request::{LeaveRequest, NewLeaveRequest},
    leave_type::LeaveType,
    makeup_request::{MakeupRequest, NewMakeupRequest},
    request::{RequestFilter, RequestKind, RequestStatus, Review, ReviewableRequest},
};

fn into_log(punch: NewAttendanceLog, id: u64) -> AttendanceLog {
    AttendanceLog {
        id,
        employee_id: punch.employee_id,
        check_type: punch.check_type,
        checked_at: punch.checked_at,
        latitude: punch.reading.map(|r| r.latitude),
        longitude: punch.reading.map(|r| r.longitude),
        accuracy_meters: punch.reading.and_then(|r| r.accuracy_meters),
        location_name: punch.geofence.as_ref().map(|g| g.location_name.clone()),
        distance_meters: punch.geofence.as_ref().map(|g| g.distance_meters),
        is_in_range: punch.geofence.as_ref().map(|g| g.in_range),
        is_makeup: punch.is_makeup,
    }
}

#[derive(Default)]
pub struct Tables {
    pub employees: Vec<Employee>,
    pub locations: Vec<CompanyLocation>,
    pub punches: Vec<AttendanceLog>,
    pub leave_types: Vec<LeaveType>,
    pub cars: Vec<Car>,
    pub leaves: Vec<LeaveRequest>,
    pub makeups: Vec<MakeupRequest>,
    pub car_requests: Vec<CarUsageRequest>,
    next_id: u64,
}

impl Tables {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn push_punch(&mut self, punch: NewAttendanceLog) -> AttendanceLog {
        let id = self.next_id();
        let log = into_log(punch, id);
        self.punches.push(log.clone());
        log
    }

    fn manager_of(&self, employee_id: u64) -> Option<u64> {
        self.employees
            .iter()
            .find(|e| e.id == employee_id)
            .and_then(|e| e.manager_id)
    }

    fn all_requests(&self, kind: RequestKind) -> Vec<ReviewableRequest> {
        match kind {
            RequestKind::Leave => self.leaves.iter().cloned().map(ReviewableRequest::Leave).collect(),
            RequestKind::Makeup => self.makeups.iter().cloned().map(ReviewableRequest::Makeup).collect(),
            RequestKind::CarUsage => self
                .car_requests
                .iter()
                .cloned()
                .map(ReviewableRequest::CarUsage)
                .collect(),
        }
    }

    fn apply_review(&mut self, kind: RequestKind, id: u64, review: &Review) -> bool {
        let pending = RequestStatus::Pending;
        match kind {
            RequestKind::Leave => match self.leaves.iter_mut().find(|r| r.id == id && r.status == pending) {
                Some(r) => {
                    r.status = review.status;
                    r.approver_id = Some(review.reviewer_id);
                    r.approved_at = Some(review.reviewed_at);
                    r.review_comment = review.comment.clone();
                    true
                }
                None => false,
            },
            RequestKind::Makeup => match self.makeups.iter_mut().find(|r| r.id == id && r.status == pending) {
                Some(r) => {
                    r.status = review.status;
                    r.reviewer_id = Some(review.reviewer_id);
                    r.reviewed_at = Some(review.reviewed_at);
                    r.review_comment = review.comment.clone();
                    true
                }
                None => false,
            },
            RequestKind::CarUsage => {
                match self.car_requests.iter_mut().find(|r| r.id == id && r.status == pending) {
                    Some(r) => {
                        r.status = review.status;
                        r.approver_id = Some(review.reviewer_id);
                        r.reviewed_at = Some(review.reviewed_at);
                        r.review_comment = review.comment.clone();
                        true
                    }
                    None => false,
                }
            }
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    fail_punch_inserts: AtomicBool,
    fail_car_updates: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    /// Makes every subsequent punch write fail.
    pub fn fail_punch_inserts(&self, fail: bool) {
        self.fail_punch_inserts.store(fail, Ordering::SeqCst);
    }

    pub fn fail_car_updates(&self, fail: bool) {
        self.fail_car_updates.store(fail, Ordering::SeqCst);
    }

    pub fn add_employee(&self, employee: Employee) {
        self.tables().employees.push(employee);
    }

    pub fn add_location(&self, location: CompanyLocation) {
        self.tables().locations.push(location);
    }

    pub fn add_leave_type(&self, leave_type: LeaveType) {
        self.tables().leave_types.push(leave_type);
    }

    pub fn add_car(&self, car: Car) {
        self.tables().cars.push(car);
    }

    /// Seeds a punch without the debounce check.
    pub fn insert_punch(&self, punch: NewAttendanceLog) -> AttendanceLog {
        self.tables().push_punch(punch)
    }

    fn punch_write_check(&self) -> StoreResult<()> {
        if self.fail_punch_inserts.load(Ordering::SeqCst) {
            return Err(StoreError::Inconsistent("punch insert failed".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl HrStore for MemoryStore {
    async fn find_active_employee_by_pin(&self, pin: &str) -> StoreResult<Option<Employee>> {
        Ok(self
            .tables()
            .employees
            .iter()
            .find(|e| e.is_active && e.pin == pin)
            .cloned())
    }

    async fn get_employee(&self, id: u64) -> StoreResult<Option<Employee>> {
        Ok(self.tables().employees.iter().find(|e| e.id == id).cloned())
    }

    async fn list_active_employees(&self, manager_id: Option<u64>) -> StoreResult<Vec<Employee>> {
        Ok(self
            .tables()
            .employees
            .iter()
            .filter(|e| e.is_active)
            .filter(|e| manager_id.is_none() || e.manager_id == manager_id)
            .cloned()
            .collect())
    }

    async fn active_locations(&self) -> StoreResult<Vec<CompanyLocation>> {
        Ok(self
            .tables()
            .locations
            .iter()
            .filter(|l| l.is_active)
            .cloned()
            .collect())
    }

    async fn insert_punch_debounced(
        &self,
        punch: NewAttendanceLog,
        since: DateTime<Utc>,
    ) -> StoreResult<Option<AttendanceLog>> {
        // check and write under one lock
        let mut tables = self.tables();
        let duplicate = tables.punches.iter().any(|p| {
            p.employee_id == punch.employee_id && p.check_type == punch.check_type && p.checked_at >= since
        });
        if duplicate {
            return Ok(None);
        }

        self.punch_write_check()?;
        Ok(Some(tables.push_punch(punch)))
    }

    async fn recent_punches(&self, employee_id: u64, limit: u32) -> StoreResult<Vec<AttendanceLog>> {
        let mut punches: Vec<AttendanceLog> = self
            .tables()
            .punches
            .iter()
            .filter(|p| p.employee_id == employee_id)
            .cloned()
            .collect();
        punches.sort_by(|a, b| b.checked_at.cmp(&a.checked_at).then(b.id.cmp(&a.id)));
        punches.truncate(limit as usize);
        Ok(punches)
    }

    async fn punches_between(
        &self,
        employee_id: u64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> StoreResult<Vec<AttendanceLog>> {
        let mut punches: Vec<AttendanceLog> = self
            .tables()
            .punches
            .iter()
            .filter(|p| p.employee_id == employee_id && p.checked_at >= from && p.checked_at < to)
            .cloned()
            .collect();
        punches.sort_by(|a, b| a.checked_at.cmp(&b.checked_at).then(a.id.cmp(&b.id)));
        Ok(punches)
    }

    async fn delete_punch(&self, id: u64) -> StoreResult<bool> {
        let mut tables = self.tables();
        let before = tables.punches.len();
        tables.punches.retain(|p| p.id != id);
        Ok(tables.punches.len() != before)
    }

    async fn get_leave_type(&self, id: u64) -> StoreResult<Option<LeaveType>> {
        Ok(self.tables().leave_types.iter().find(|t| t.id == id).cloned())
    }

    async fn list_leave_types(&self) -> StoreResult<Vec<LeaveType>> {
        let mut types: Vec<LeaveType> = self
            .tables()
            .leave_types
            .iter()
            .filter(|t| t.is_active)
            .cloned()
            .collect();
        types.sort_by_key(|t| (t.sort_order, t.id));
        Ok(types)
    }

    async fn get_car(&self, id: u64) -> StoreResult<Option<Car>> {
        Ok(self.tables().cars.iter().find(|c| c.id == id).cloned())
    }

    async fn set_car_status(&self, id: u64, status: CarStatus) -> StoreResult<()> {
        if self.fail_car_updates.load(Ordering::SeqCst) {
            return Err(StoreError::Inconsistent("car update failed".into()));
        }
        if let Some(car) = self.tables().cars.iter_mut().find(|c| c.id == id) {
            car.status = status;
        }
        Ok(())
    }

    async fn insert_leave_request(&self, request: NewLeaveRequest) -> StoreResult<ReviewableRequest> {
        let mut tables = self.tables();
        let id = tables.next_id();
        let row = LeaveRequest {
            id,
            employee_id: request.employee_id,
            leave_type_id: request.leave_type_id,
            start_at: request.start_at,
            end_at: request.end_at,
            reason: request.reason,
            hours: request.hours,
            car_id: request.car_id,
            status: RequestStatus::Pending,
            approver_id: None,
            approved_at: None,
            review_comment: None,
            created_at: Utc::now(),
        };
        tables.leaves.push(row.clone());
        Ok(ReviewableRequest::Leave(row))
    }

    async fn insert_makeup_request(&self, request: NewMakeupRequest) -> StoreResult<ReviewableRequest> {
        let mut tables = self.tables();
        let id = tables.next_id();
        let row = MakeupRequest {
            id,
            employee_id: request.employee_id,
            request_date: request.request_date,
            request_time: request.request_time,
            check_type: request.check_type,
            reason: request.reason,
            status: RequestStatus::Pending,
            reviewer_id: None,
            reviewed_at: None,
            review_comment: None,
            created_at: Utc::now(),
        };
        tables.makeups.push(row.clone());
        Ok(ReviewableRequest::Makeup(row))
    }

    async fn insert_car_request(&self, request: NewCarUsageRequest) -> StoreResult<ReviewableRequest> {
        let mut tables = self.tables();
        let id = tables.next_id();
        let row = CarUsageRequest {
            id,
            employee_id: request.employee_id,
            car_id: request.car_id,
            start_at: request.start_at,
            end_at: request.end_at,
            purpose: request.purpose,
            status: RequestStatus::Pending,
            approver_id: None,
            reviewed_at: None,
            review_comment: None,
            created_at: Utc::now(),
        };
        tables.car_requests.push(row.clone());
        Ok(ReviewableRequest::CarUsage(row))
    }

    async fn get_request(&self, kind: RequestKind, id: u64) -> StoreResult<Option<ReviewableRequest>> {
        Ok(self
            .tables()
            .all_requests(kind)
            .into_iter()
            .find(|r| r.id() == id))
    }

    async fn list_requests(
        &self,
        kind: RequestKind,
        filter: &RequestFilter,
    ) -> StoreResult<Vec<ReviewableRequest>> {
        let tables = self.tables();
        let mut rows: Vec<ReviewableRequest> = tables
            .all_requests(kind)
            .into_iter()
            .filter(|r| filter.employee_id.is_none_or(|id| r.employee_id() == id))
            .filter(|r| {
                filter
                    .manager_id
                    .is_none_or(|m| tables.manager_of(r.employee_id()) == Some(m))
            })
            .filter(|r| filter.status.is_none_or(|s| r.status() == s))
            .collect();
        rows.reverse();
        Ok(rows)
    }

    async fn finalize_request(&self, kind: RequestKind, id: u64, review: &Review) -> StoreResult<bool> {
        Ok(self.tables().apply_review(kind, id, review))
    }

    async fn approve_makeup_with_punch(
        &self,
        id: u64,
        review: &Review,
        punch: NewAttendanceLog,
    ) -> StoreResult<Option<AttendanceLog>> {
        let mut tables = self.tables();
        let pending = tables
            .makeups
            .iter()
            .any(|r| r.id == id && r.status == RequestStatus::Pending);
        if !pending {
            return Ok(None);
        }

        // fail before touching anything, as a rolled back transaction would leave it
        self.punch_write_check()?;

        tables.apply_review(RequestKind::Makeup, id, review);
        Ok(Some(tables.push_punch(punch)))
    }

    async fn approved_leaves_between(
        &self,
        employee_id: u64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> StoreResult<Vec<LeaveRequest>> {
        Ok(self
            .tables()
            .leaves
            .iter()
            .filter(|l| l.employee_id == employee_id && l.status == RequestStatus::Approved)
            .filter(|l| l.start_at < to && l.end_at > from)
            .cloned()
            .collect())
    }
}
