use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{staff::StaffProfile, Gender};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Child {
    pub id: Uuid,
    pub child_name: String,
    pub dob: NaiveDate,
    #[sqlx(try_from = "String")]
    pub gender: Gender,
    pub blood_group: String,
    pub admission_date: NaiveDate,
    pub parent_name: String,
    pub parent_email: String,
    pub parent_phone: String,
    pub emergency_contact_name: String,
    pub emergency_contact_number: String,
    pub allergies: Option<String>,
    pub medical_conditions: Option<String>,
    pub assigned_teacher: Option<Uuid>,
    pub assigned_caretaker: Option<Uuid>,
    /// Parent identity this child is linked to, if any.
    #[serde(rename = "parent")]
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Child {
    /// True when `staff_id` is this child's teacher or caretaker.
    pub fn is_assigned_to(&self, staff_id: Uuid) -> bool {
        self.assigned_teacher == Some(staff_id) || self.assigned_caretaker == Some(staff_id)
    }
}

/// Validated fields of a child record.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildFields {
    pub child_name: String,
    pub dob: NaiveDate,
    pub gender: Gender,
    pub blood_group: String,
    pub admission_date: NaiveDate,
    pub parent_name: String,
    pub parent_email: String,
    pub parent_phone: String,
    pub emergency_contact_name: String,
    pub emergency_contact_number: String,
    pub allergies: Option<String>,
    pub medical_conditions: Option<String>,
    pub assigned_teacher: Option<Uuid>,
    pub assigned_caretaker: Option<Uuid>,
    pub parent_id: Option<Uuid>,
}

/// Body of `POST /children` and `PUT /children/:id`; create requires the
/// mandatory fields, update applies whatever is present.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildRequest {
    pub child_name: Option<String>,
    pub dob: Option<NaiveDate>,
    pub gender: Option<String>,
    pub blood_group: Option<String>,
    pub admission_date: Option<NaiveDate>,
    pub parent_name: Option<String>,
    pub parent_email: Option<String>,
    pub parent_phone: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_number: Option<String>,
    pub allergies: Option<String>,
    pub medical_conditions: Option<String>,
    pub assigned_teacher: Option<Uuid>,
    pub assigned_caretaker: Option<Uuid>,
    pub parent: Option<Uuid>,
}

/// A child with its assigned staff resolved, as shown to parents.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildWithStaff {
    #[serde(flatten)]
    pub child: Child,
    pub teacher: Option<StaffProfile>,
    pub caretaker: Option<StaffProfile>,
}
