//! Data access traits, one per aggregate.
//!
//! `PgStore` implements them against PostgreSQL; the test suite uses an
//! in-memory implementation. Handlers only ever see these traits.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{
    activity::{Activity, NewActivity},
    attendance::{
        ChildAttendance, ChildAttendanceUpsert, ChildAttendanceWithChild, StaffAttendance,
        StaffAttendanceUpsert,
    },
    child::{Child, ChildFields},
    fee::Fee,
    staff::{ProfileStatus, StaffProfile, StaffProfileFields},
    user::{AccountStatus, NewUser, ParentSummary, User, UserRole},
};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert an identity. Returns `None` when the email is already taken.
    async fn create(&self, user: &NewUser) -> Result<Option<User>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Identities of one role, optionally restricted to one status, oldest first.
    async fn list_by_role(&self, role: UserRole, status: Option<AccountStatus>) -> Result<Vec<User>>;

    async fn list_parents(&self) -> Result<Vec<ParentSummary>>;

    /// Move a staff identity from `from` to `to` and mirror the change onto its
    /// linked profile, atomically. Returns `None` if the identity was not in `from`.
    async fn transition_staff_status(
        &self,
        id: Uuid,
        from: AccountStatus,
        to: AccountStatus,
    ) -> Result<Option<User>>;
}

#[async_trait]
pub trait StaffRepository: Send + Sync {
    /// Insert a profile. Returns `None` when the email is already taken.
    async fn create(&self, fields: &StaffProfileFields, user_id: Option<Uuid>) -> Result<Option<StaffProfile>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<StaffProfile>>;

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<StaffProfile>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<StaffProfile>>;

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<StaffProfile>>;

    async fn list(&self, status: Option<ProfileStatus>) -> Result<Vec<StaffProfile>>;

    /// Overwrite a profile. `None` if it does not exist.
    async fn update(&self, id: Uuid, fields: &StaffProfileFields) -> Result<Option<StaffProfile>>;

    /// Insert or update the profile owned by `user_id`, keyed by its email. An
    /// unlinked profile with the same email is adopted. `None` if the email
    /// belongs to a profile linked to someone else.
    async fn upsert_for_user(&self, user_id: Uuid, fields: &StaffProfileFields) -> Result<Option<StaffProfile>>;

    /// Attach an unlinked profile with this email to `user_id`, if one exists.
    async fn link_user(&self, email: &str, user_id: Uuid) -> Result<()>;

    async fn delete(&self, id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait ChildRepository: Send + Sync {
    async fn create(&self, fields: &ChildFields) -> Result<Child>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Child>>;

    async fn list(&self) -> Result<Vec<Child>>;

    /// Children whose teacher or caretaker is `staff_id`.
    async fn list_assigned_to(&self, staff_id: Uuid) -> Result<Vec<Child>>;

    async fn find_for_parent(&self, parent_id: Uuid) -> Result<Option<Child>>;

    async fn update(&self, id: Uuid, fields: &ChildFields) -> Result<Option<Child>>;

    async fn delete(&self, id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    /// Atomic insert-or-update on (child_id, date).
    async fn upsert_child(&self, record: &ChildAttendanceUpsert) -> Result<ChildAttendance>;

    /// Atomic insert-or-update on (staff_id, date).
    async fn upsert_staff(&self, record: &StaffAttendanceUpsert) -> Result<StaffAttendance>;

    /// Child records with `start <= date < end`, joined with child details.
    async fn list_child_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ChildAttendanceWithChild>>;

    /// Child records for a set of children with `start <= date < end`.
    async fn list_for_children_between(
        &self,
        child_ids: &[Uuid],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ChildAttendance>>;

    /// One child's records, newest first.
    async fn list_child_history(&self, child_id: Uuid) -> Result<Vec<ChildAttendance>>;

    /// Staff records whose date equals `date` exactly.
    async fn list_staff_on(&self, date: DateTime<Utc>) -> Result<Vec<StaffAttendance>>;
}

#[async_trait]
pub trait ActivityRepository: Send + Sync {
    async fn create(&self, activity: &NewActivity) -> Result<Activity>;

    /// One child's activities, newest first.
    async fn list_for_child(&self, child_id: Uuid) -> Result<Vec<Activity>>;

    async fn count_for_children_between(
        &self,
        child_ids: &[Uuid],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64>;
}

#[async_trait]
pub trait FeeRepository: Send + Sync {
    /// One child's fees, latest due date first.
    async fn list_for_child(&self, child_id: Uuid) -> Result<Vec<Fee>>;
}

#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn ping(&self) -> Result<()>;
}
