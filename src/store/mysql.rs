use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Executor, MySql, MySqlPool};
use tracing::debug;

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

const EMPLOYEE_COLUMNS: &str = "id, name, pin, department, manager_id, work_start, work_end, \
     break1_start, break1_end, break2_start, break2_end, break3_start, break3_end, is_active";

const PUNCH_COLUMNS: &str = "id, employee_id, check_type, checked_at, latitude, longitude, \
     accuracy_meters, location_name, distance_meters, is_in_range, is_makeup";

const LEAVE_COLUMNS: &str = "id, employee_id, leave_type_id, start_at, end_at, reason, hours, \
     car_id, status, approver_id, approved_at, review_comment, created_at";

const MAKEUP_COLUMNS: &str = "id, employee_id, request_date, request_time, check_type, reason, \
     status, reviewer_id, reviewed_at, review_comment, created_at";

const CAR_REQUEST_COLUMNS: &str = "id, employee_id, car_id, start_at, end_at, purpose, status, \
     approver_id, reviewed_at, review_comment, created_at";

fn columns_for(kind: RequestKind) -> &'static str {
    match kind {
        RequestKind::Leave => LEAVE_COLUMNS,
        RequestKind::Makeup => MAKEUP_COLUMNS,
        RequestKind::CarUsage => CAR_REQUEST_COLUMNS,
    }
}

// Helper enum for typed SQLx binding
enum FilterValue {
    U64(u64),
    Str(&'static str),
}

/// `HrStore` backed by the MySQL schema in `sql/schema.sql`.
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn fetch_requests(
        &self,
        kind: RequestKind,
        where_sql: &str,
        args: Vec<FilterValue>,
    ) -> StoreResult<Vec<ReviewableRequest>> {
        let sql = format!(
            "SELECT {} FROM {} {} ORDER BY created_at DESC, id DESC",
            columns_for(kind),
            kind.table(),
            where_sql
        );
        debug!(sql = %sql, "Fetching requests");

        macro_rules! run {
            ($row:ty, $variant:path) => {{
                let mut q = sqlx::query_as::<_, $row>(&sql);
                for arg in &args {
                    q = match arg {
                        FilterValue::U64(v) => q.bind(*v),
                        FilterValue::Str(s) => q.bind(*s),
                    };
                }
                q.fetch_all(&self.pool)
                    .await?
                    .into_iter()
                    .map($variant)
                    .collect()
            }};
        }

        let rows = match kind {
            RequestKind::Leave => run!(LeaveRequest, ReviewableRequest::Leave),
            RequestKind::Makeup => run!(MakeupRequest, ReviewableRequest::Makeup),
            RequestKind::CarUsage => run!(CarUsageRequest, ReviewableRequest::CarUsage),
        };
        Ok(rows)
    }

    async fn inserted_request(&self, kind: RequestKind, id: u64) -> StoreResult<ReviewableRequest> {
        self.get_request(kind, id)
            .await?
            .ok_or_else(|| StoreError::Inconsistent(format!("{} {} missing after insert", kind, id)))
    }
}

async fn insert_punch_row<'e, E>(executor: E, punch: &NewAttendanceLog) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = MySql>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO attendance_logs
            (employee_id, check_type, checked_at, latitude, longitude, accuracy_meters,
             location_name, distance_meters, is_in_range, is_makeup)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(punch.employee_id)
    .bind(punch.check_type.as_ref())
    .bind(punch.checked_at)
    .bind(punch.reading.map(|r| r.latitude))
    .bind(punch.reading.map(|r| r.longitude))
    .bind(punch.reading.and_then(|r| r.accuracy_meters))
    .bind(punch.geofence.as_ref().map(|g| g.location_name.clone()))
    .bind(punch.geofence.as_ref().map(|g| g.distance_meters))
    .bind(punch.geofence.as_ref().map(|g| g.in_range))
    .bind(punch.is_makeup)
    .execute(executor)
    .await?;

    Ok(result.last_insert_id())
}

async fn fetch_punch<'e, E>(executor: E, id: u64) -> Result<Option<AttendanceLog>, sqlx::Error>
where
    E: Executor<'e, Database = MySql>,
{
    let sql = format!("SELECT {} FROM attendance_logs WHERE id = ?", PUNCH_COLUMNS);
    sqlx::query_as::<_, AttendanceLog>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await
}

#[async_trait]
impl HrStore for MySqlStore {
    async fn find_active_employee_by_pin(&self, pin: &str) -> StoreResult<Option<Employee>> {
        let sql = format!(
            "SELECT {} FROM employees WHERE pin = ? AND is_active = TRUE LIMIT 1",
            EMPLOYEE_COLUMNS
        );
        Ok(sqlx::query_as::<_, Employee>(&sql)
            .bind(pin)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn get_employee(&self, id: u64) -> StoreResult<Option<Employee>> {
        let sql = format!("SELECT {} FROM employees WHERE id = ?", EMPLOYEE_COLUMNS);
        Ok(sqlx::query_as::<_, Employee>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_active_employees(&self, manager_id: Option<u64>) -> StoreResult<Vec<Employee>> {
        let employees = match manager_id {
            Some(manager_id) => {
                let sql = format!(
                    "SELECT {} FROM employees WHERE is_active = TRUE AND manager_id = ? ORDER BY id",
                    EMPLOYEE_COLUMNS
                );
                sqlx::query_as::<_, Employee>(&sql)
                    .bind(manager_id)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "SELECT {} FROM employees WHERE is_active = TRUE ORDER BY id",
                    EMPLOYEE_COLUMNS
                );
                sqlx::query_as::<_, Employee>(&sql)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(employees)
    }

    async fn active_locations(&self) -> StoreResult<Vec<CompanyLocation>> {
        Ok(sqlx::query_as::<_, CompanyLocation>(
            r#"
            SELECT id, name, latitude, longitude, radius_meters, is_active
            FROM company_locations
            WHERE is_active = TRUE
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn insert_punch_debounced(
        &self,
        punch: NewAttendanceLog,
        since: DateTime<Utc>,
    ) -> StoreResult<Option<AttendanceLog>> {
        let mut tx = self.pool.begin().await?;

        // the employee row lock is held until commit; a concurrent punch for
        // the same employee waits here and then sees this one
        let locked: Option<(u64,)> = sqlx::query_as("SELECT id FROM employees WHERE id = ? FOR UPDATE")
            .bind(punch.employee_id)
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            tx.rollback().await?;
            return Err(StoreError::Inconsistent(format!(
                "employee {} missing while punching",
                punch.employee_id
            )));
        }

        let duplicate: Option<(u64,)> = sqlx::query_as(
            "SELECT id FROM attendance_logs \
             WHERE employee_id = ? AND check_type = ? AND checked_at >= ? LIMIT 1",
        )
        .bind(punch.employee_id)
        .bind(punch.check_type.as_ref())
        .bind(since)
        .fetch_optional(&mut *tx)
        .await?;
        if let Some((existing,)) = duplicate {
            debug!(employee_id = punch.employee_id, existing, "Punch inside debounce window");
            tx.rollback().await?;
            return Ok(None);
        }

        let id = insert_punch_row(&mut *tx, &punch).await?;
        let log = fetch_punch(&mut *tx, id)
            .await?
            .ok_or_else(|| StoreError::Inconsistent(format!("punch {} missing after insert", id)))?;

        tx.commit().await?;
        Ok(Some(log))
    }

    async fn recent_punches(&self, employee_id: u64, limit: u32) -> StoreResult<Vec<AttendanceLog>> {
        let sql = format!(
            "SELECT {} FROM attendance_logs WHERE employee_id = ? \
             ORDER BY checked_at DESC, id DESC LIMIT ?",
            PUNCH_COLUMNS
        );
        Ok(sqlx::query_as::<_, AttendanceLog>(&sql)
            .bind(employee_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn punches_between(
        &self,
        employee_id: u64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> StoreResult<Vec<AttendanceLog>> {
        let sql = format!(
            "SELECT {} FROM attendance_logs \
             WHERE employee_id = ? AND checked_at >= ? AND checked_at < ? \
             ORDER BY checked_at ASC, id ASC",
            PUNCH_COLUMNS
        );
        Ok(sqlx::query_as::<_, AttendanceLog>(&sql)
            .bind(employee_id)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn delete_punch(&self, id: u64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM attendance_logs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_leave_type(&self, id: u64) -> StoreResult<Option<LeaveType>> {
        Ok(sqlx::query_as::<_, LeaveType>(
            "SELECT id, name, code, color, is_active, sort_order FROM leave_types WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn list_leave_types(&self) -> StoreResult<Vec<LeaveType>> {
        Ok(sqlx::query_as::<_, LeaveType>(
            r#"
            SELECT id, name, code, color, is_active, sort_order
            FROM leave_types
            WHERE is_active = TRUE
            ORDER BY sort_order, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_car(&self, id: u64) -> StoreResult<Option<Car>> {
        Ok(sqlx::query_as::<_, Car>(
            "SELECT id, plate_number, model, status, is_active FROM cars WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn set_car_status(&self, id: u64, status: CarStatus) -> StoreResult<()> {
        sqlx::query("UPDATE cars SET status = ? WHERE id = ?")
            .bind(status.as_ref())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_leave_request(&self, request: NewLeaveRequest) -> StoreResult<ReviewableRequest> {
        let result = sqlx::query(
            r#"
            INSERT INTO leave_requests
                (employee_id, leave_type_id, start_at, end_at, reason, hours, car_id, status)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(request.employee_id)
        .bind(request.leave_type_id)
        .bind(request.start_at)
        .bind(request.end_at)
        .bind(&request.reason)
        .bind(request.hours)
        .bind(request.car_id)
        .bind(RequestStatus::Pending.as_ref())
        .execute(&self.pool)
        .await?;

        self.inserted_request(RequestKind::Leave, result.last_insert_id())
            .await
    }

    async fn insert_makeup_request(&self, request: NewMakeupRequest) -> StoreResult<ReviewableRequest> {
        let result = sqlx::query(
            r#"
            INSERT INTO makeup_requests
                (employee_id, request_date, request_time, check_type, reason, status)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(request.employee_id)
        .bind(request.request_date)
        .bind(request.request_time)
        .bind(request.check_type.as_ref())
        .bind(&request.reason)
        .bind(RequestStatus::Pending.as_ref())
        .execute(&self.pool)
        .await?;

        self.inserted_request(RequestKind::Makeup, result.last_insert_id())
            .await
    }

    async fn insert_car_request(&self, request: NewCarUsageRequest) -> StoreResult<ReviewableRequest> {
        let result = sqlx::query(
            r#"
            INSERT INTO car_usage_requests
                (employee_id, car_id, start_at, end_at, purpose, status)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(request.employee_id)
        .bind(request.car_id)
        .bind(request.start_at)
        .bind(request.end_at)
        .bind(&request.purpose)
        .bind(RequestStatus::Pending.as_ref())
        .execute(&self.pool)
        .await?;

        self.inserted_request(RequestKind::CarUsage, result.last_insert_id())
            .await
    }

    async fn get_request(&self, kind: RequestKind, id: u64) -> StoreResult<Option<ReviewableRequest>> {
        let mut found = self
            .fetch_requests(kind, "WHERE id = ?", vec![FilterValue::U64(id)])
            .await?;
        Ok(found.pop())
    }

    async fn list_requests(
        &self,
        kind: RequestKind,
        filter: &RequestFilter,
    ) -> StoreResult<Vec<ReviewableRequest>> {
        let mut where_sql = String::from("WHERE 1=1");
        let mut args: Vec<FilterValue> = Vec::new();

        if let Some(employee_id) = filter.employee_id {
            where_sql.push_str(" AND employee_id = ?");
            args.push(FilterValue::U64(employee_id));
        }

        if let Some(manager_id) = filter.manager_id {
            where_sql.push_str(" AND employee_id IN (SELECT id FROM employees WHERE manager_id = ?)");
            args.push(FilterValue::U64(manager_id));
        }

        if let Some(status) = filter.status {
            where_sql.push_str(" AND status = ?");
            args.push(FilterValue::Str(status.into()));
        }

        self.fetch_requests(kind, &where_sql, args).await
    }

    async fn finalize_request(&self, kind: RequestKind, id: u64, review: &Review) -> StoreResult<bool> {
        let sql = format!(
            "UPDATE {} SET status = ?, {} = ?, {} = ?, review_comment = ? \
             WHERE id = ? AND status = ?",
            kind.table(),
            kind.reviewer_column(),
            kind.reviewed_at_column()
        );
        let result = sqlx::query(&sql)
            .bind(review.status.as_ref())
            .bind(review.reviewer_id)
            .bind(review.reviewed_at)
            .bind(review.comment.as_deref())
            .bind(id)
            .bind(RequestStatus::Pending.as_ref())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn approve_makeup_with_punch(
        &self,
        id: u64,
        review: &Review,
        punch: NewAttendanceLog,
    ) -> StoreResult<Option<AttendanceLog>> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE makeup_requests
            SET status = ?, reviewer_id = ?, reviewed_at = ?, review_comment = ?
            WHERE id = ? AND status = ?
            "#,
        )
        .bind(review.status.as_ref())
        .bind(review.reviewer_id)
        .bind(review.reviewed_at)
        .bind(review.comment.as_deref())
        .bind(id)
        .bind(RequestStatus::Pending.as_ref())
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        // any error past this point drops `tx`, rolling back the status change
        let punch_id = insert_punch_row(&mut *tx, &punch).await?;
        let log = fetch_punch(&mut *tx, punch_id).await?.ok_or_else(|| {
            StoreError::Inconsistent(format!("punch {} missing after insert", punch_id))
        })?;

        tx.commit().await?;
        Ok(Some(log))
    }

    async fn approved_leaves_between(
        &self,
        employee_id: u64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> StoreResult<Vec<LeaveRequest>> {
        let sql = format!(
            "SELECT {} FROM leave_requests \
             WHERE employee_id = ? AND status = ? AND start_at < ? AND end_at > ? \
             ORDER BY start_at",
            LEAVE_COLUMNS
        );
        Ok(sqlx::query_as::<_, LeaveRequest>(&sql)
            .bind(employee_id)
            .bind(RequestStatus::Approved.as_ref())
            .bind(to)
            .bind(from)
            .fetch_all(&self.pool)
            .await?)
    }
}
