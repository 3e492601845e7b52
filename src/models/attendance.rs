use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::text_enum;

text_enum!(
    /// Child attendance status. Capitalized on the wire, unlike staff attendance.
    ChildAttendanceStatus, "child attendance status" {
        Present => "Present",
        Absent => "Absent",
    }
);

text_enum!(
    /// Staff attendance status. Lower-case on the wire.
    StaffAttendanceStatus, "staff attendance status" {
        Present => "present",
        Absent => "absent",
    }
);

/// One child's attendance for one day. `date` is always midnight UTC.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ChildAttendance {
    pub id: Uuid,
    #[serde(rename = "child")]
    pub child_id: Uuid,
    pub date: DateTime<Utc>,
    #[sqlx(try_from = "String")]
    pub status: ChildAttendanceStatus,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Child attendance joined with the identifying fields of the child.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ChildAttendanceWithChild {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub record: ChildAttendance,
    pub child_name: String,
    pub parent_name: String,
    pub parent_phone: String,
}

/// One staff member's attendance for one day.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StaffAttendance {
    pub id: Uuid,
    #[serde(rename = "staff")]
    pub staff_id: Uuid,
    pub date: DateTime<Utc>,
    #[sqlx(try_from = "String")]
    pub status: StaffAttendanceStatus,
    pub remarks: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated child attendance write, keyed by (child_id, date).
#[derive(Debug, Clone, PartialEq)]
pub struct ChildAttendanceUpsert {
    pub child_id: Uuid,
    pub date: DateTime<Utc>,
    pub status: ChildAttendanceStatus,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub remarks: Option<String>,
}

/// Validated staff attendance write, keyed by (staff_id, date).
#[derive(Debug, Clone, PartialEq)]
pub struct StaffAttendanceUpsert {
    pub staff_id: Uuid,
    pub date: DateTime<Utc>,
    pub status: StaffAttendanceStatus,
    pub remarks: Option<String>,
}

/// Body for POST /staff/mark-attendance.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAttendanceRequest {
    #[serde(alias = "child")]
    pub child_id: Option<Uuid>,
    pub status: Option<String>,
    pub date: Option<String>,
    pub remarks: Option<String>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
}

/// Body for POST /admin/staff-attendance. `staff` is the legacy field name.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffAttendanceRequest {
    pub staff_id: Option<Uuid>,
    pub staff: Option<Uuid>,
    pub date: Option<String>,
    pub status: Option<String>,
    pub remarks: Option<String>,
}

/// Query params for the admin attendance listings.
#[derive(Debug, Default, Deserialize)]
pub struct AttendanceDateQuery {
    pub date: Option<String>,
}
