//! Attendance reconciliation.
//!
//! Every record is keyed by (subject, calendar day in UTC). Writes are
//! upserts on that key, so repeated submissions for one day converge on a
//! single record.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use tracing::info;
use uuid::Uuid;

use crate::{
    db::Repositories,
    error::{AppError, AppResult},
    models::{
        attendance::{
            ChildAttendance, ChildAttendanceStatus, ChildAttendanceUpsert, ChildAttendanceWithChild,
            MarkAttendanceRequest, StaffAttendance, StaffAttendanceRequest, StaffAttendanceStatus,
            StaffAttendanceUpsert,
        },
        user::UserRole,
        ParseEnumError,
    },
    services::{metrics, optional_text},
};

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Truncate to 00:00:00.000 UTC of the same day.
pub fn normalize_day(instant: DateTime<Utc>) -> DateTime<Utc> {
    Utc.from_utc_datetime(&instant.date_naive().and_time(NaiveTime::MIN))
}

/// The `[start, start + 1 day)` window of the UTC day containing `instant`.
pub fn day_window(instant: DateTime<Utc>) -> AppResult<(DateTime<Utc>, DateTime<Utc>)> {
    let start = normalize_day(instant);
    let end = start
        .checked_add_signed(Duration::days(1))
        .ok_or_else(|| AppError::invalid(format!("Date out of range: {}", start.date_naive())))?;
    Ok((start, end))
}

/// Parse a client-supplied date. Naive values are taken as UTC; absent means `now`.
pub fn parse_date_input(raw: Option<&str>, now: DateTime<Utc>) -> AppResult<DateTime<Utc>> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(now),
        Some(r) => r,
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Utc.from_utc_datetime(&dt));
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(Utc.from_utc_datetime(&d.and_time(NaiveTime::MIN)));
    }
    Err(AppError::invalid(format!("Invalid date: {raw}")))
}

fn parse_status<T>(raw: Option<&str>) -> AppResult<T>
where
    T: std::str::FromStr<Err = ParseEnumError>,
{
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::invalid("Status is required"))?;
    raw.parse()
        .map_err(|e: ParseEnumError| AppError::InvalidStatus(e.to_string()))
}

pub struct AttendanceService;

impl AttendanceService {
    /// Record a child's attendance for the day of `req.date`. The caller has
    /// already checked that `child_id` exists and is within scope.
    pub async fn upsert_child_attendance(
        repos: &Repositories,
        child_id: Uuid,
        req: MarkAttendanceRequest,
        now: DateTime<Utc>,
    ) -> AppResult<ChildAttendance> {
        let status: ChildAttendanceStatus = parse_status(req.status.as_deref())?;
        let date = normalize_day(parse_date_input(req.date.as_deref(), now)?);

        let record = repos
            .attendance
            .upsert_child(&ChildAttendanceUpsert {
                child_id,
                date,
                status,
                check_in: optional_text(req.check_in),
                check_out: optional_text(req.check_out),
                remarks: req.remarks,
            })
            .await?;

        metrics::record_attendance_upsert("child");
        info!(child_id = %child_id, date = %date.date_naive(), status = %status, "Child attendance recorded");
        Ok(record)
    }

    /// Record a staff member's attendance. `staffId` wins over the legacy `staff` field.
    pub async fn upsert_staff_attendance(
        repos: &Repositories,
        req: StaffAttendanceRequest,
        now: DateTime<Utc>,
    ) -> AppResult<StaffAttendance> {
        let staff_id = req
            .staff_id
            .or(req.staff)
            .ok_or_else(|| AppError::invalid("Staff ID is required"))?;
        let status: StaffAttendanceStatus = parse_status(req.status.as_deref())?;
        let date = normalize_day(parse_date_input(req.date.as_deref(), now)?);

        match repos.users.find_by_id(staff_id).await? {
            Some(u) if u.role == UserRole::Staff => {}
            _ => return Err(AppError::not_found("Staff not found")),
        }

        let record = repos
            .attendance
            .upsert_staff(&StaffAttendanceUpsert {
                staff_id,
                date,
                status,
                remarks: req.remarks,
            })
            .await?;

        metrics::record_attendance_upsert("staff");
        info!(staff_id = %staff_id, date = %date.date_naive(), status = %status, "Staff attendance recorded");
        Ok(record)
    }

    /// Child records within the UTC day containing `date`.
    pub async fn list_child_attendance_for_day(
        repos: &Repositories,
        date: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<ChildAttendanceWithChild>> {
        let (start, end) = day_window(parse_date_input(date, now)?)?;
        Ok(repos.attendance.list_child_between(start, end).await?)
    }

    /// Staff records keyed exactly at the normalized `date`.
    pub async fn list_staff_attendance_on(
        repos: &Repositories,
        date: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<StaffAttendance>> {
        let day = normalize_day(parse_date_input(date, now)?);
        Ok(repos.attendance.list_staff_on(day).await?)
    }

    pub async fn list_child_attendance_history(
        repos: &Repositories,
        child_id: Uuid,
    ) -> AppResult<Vec<ChildAttendance>> {
        Ok(repos.attendance.list_child_history(child_id).await?)
    }
}
