//! In-memory repositories for tests. A single write lock spans every
//! find-then-write so upserts behave like the unique indexes in PostgreSQL.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use super::{
    repository::{
        ActivityRepository, AttendanceRepository, ChildRepository, FeeRepository, HealthProbe,
        StaffRepository, UserRepository,
    },
    Repositories,
};
use crate::models::{
    activity::{Activity, NewActivity},
    attendance::{
        ChildAttendance, ChildAttendanceUpsert, ChildAttendanceWithChild, StaffAttendance,
        StaffAttendanceUpsert,
    },
    child::{Child, ChildFields},
    fee::{Fee, FeeStatus},
    staff::{ProfileStatus, StaffProfile, StaffProfileFields},
    user::{AccountStatus, NewUser, ParentSummary, User, UserRole},
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    staff: Vec<StaffProfile>,
    children: Vec<Child>,
    child_attendance: Vec<ChildAttendance>,
    staff_attendance: Vec<StaffAttendance>,
    activities: Vec<Activity>,
    fees: Vec<Fee>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn repositories(&self) -> Repositories {
        let store = Arc::new(self.clone());
        Repositories {
            users: store.clone(),
            staff: store.clone(),
            children: store.clone(),
            attendance: store.clone(),
            activities: store.clone(),
            fees: store.clone(),
            probe: store,
        }
    }

    /// Fees have no write path in the API; tests seed them directly.
    pub fn insert_fee(&self, child_id: Uuid, amount: f64, status: FeeStatus, due_date: NaiveDate) -> Fee {
        let fee = Fee {
            id: Uuid::new_v4(),
            child_id,
            amount,
            status,
            due_date,
            created_at: Utc::now(),
        };
        self.tables.write().fees.push(fee.clone());
        fee
    }

    pub fn child_attendance_count(&self) -> usize {
        self.tables.read().child_attendance.len()
    }

    pub fn staff_attendance_count(&self) -> usize {
        self.tables.read().staff_attendance.len()
    }
}

fn profile_from(id: Uuid, user_id: Option<Uuid>, f: &StaffProfileFields, now: DateTime<Utc>) -> StaffProfile {
    StaffProfile {
        id,
        user_id,
        name: f.name.clone(),
        email: f.email.clone(),
        phone: f.phone.clone(),
        title: f.title,
        dob: f.dob,
        gender: f.gender,
        joining_date: f.joining_date,
        qualification: f.qualification.clone(),
        experience: f.experience.clone(),
        address: f.address.clone(),
        status: f.status,
        created_at: now,
        updated_at: now,
    }
}

fn apply_child_fields(child: &mut Child, f: &ChildFields) {
    child.child_name = f.child_name.clone();
    child.dob = f.dob;
    child.gender = f.gender;
    child.blood_group = f.blood_group.clone();
    child.admission_date = f.admission_date;
    child.parent_name = f.parent_name.clone();
    child.parent_email = f.parent_email.clone();
    child.parent_phone = f.parent_phone.clone();
    child.emergency_contact_name = f.emergency_contact_name.clone();
    child.emergency_contact_number = f.emergency_contact_number.clone();
    child.allergies = f.allergies.clone();
    child.medical_conditions = f.medical_conditions.clone();
    child.assigned_teacher = f.assigned_teacher;
    child.assigned_caretaker = f.assigned_caretaker;
    child.parent_id = f.parent_id;
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: &NewUser) -> Result<Option<User>> {
        let mut t = self.tables.write();
        if t.users.iter().any(|u| u.email == user.email) {
            return Ok(None);
        }
        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            role: user.role,
            status: user.status,
            created_at: now,
            updated_at: now,
        };
        t.users.push(created.clone());
        Ok(Some(created))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.tables.read().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.tables.read().users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_by_role(&self, role: UserRole, status: Option<AccountStatus>) -> Result<Vec<User>> {
        Ok(self
            .tables
            .read()
            .users
            .iter()
            .filter(|u| u.role == role && status.map_or(true, |s| u.status == s))
            .cloned()
            .collect())
    }

    async fn list_parents(&self) -> Result<Vec<ParentSummary>> {
        let mut parents: Vec<ParentSummary> = self
            .tables
            .read()
            .users
            .iter()
            .filter(|u| u.role == UserRole::Parent)
            .map(|u| ParentSummary {
                id: u.id,
                full_name: u.full_name.clone(),
                email: u.email.clone(),
            })
            .collect();
        parents.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(parents)
    }

    async fn transition_staff_status(
        &self,
        id: Uuid,
        from: AccountStatus,
        to: AccountStatus,
    ) -> Result<Option<User>> {
        let mut t = self.tables.write();
        let now = Utc::now();
        let Some(user) = t
            .users
            .iter_mut()
            .find(|u| u.id == id && u.role == UserRole::Staff && u.status == from)
        else {
            return Ok(None);
        };
        user.status = to;
        user.updated_at = now;
        let updated = user.clone();
        if let Some(profile) = t.staff.iter_mut().find(|p| p.user_id == Some(id)) {
            profile.status = ProfileStatus::from(to);
            profile.updated_at = now;
        }
        Ok(Some(updated))
    }
}

#[async_trait]
impl StaffRepository for MemoryStore {
    async fn create(&self, fields: &StaffProfileFields, user_id: Option<Uuid>) -> Result<Option<StaffProfile>> {
        let mut t = self.tables.write();
        if t.staff.iter().any(|p| p.email == fields.email) {
            return Ok(None);
        }
        let profile = profile_from(Uuid::new_v4(), user_id, fields, Utc::now());
        t.staff.push(profile.clone());
        Ok(Some(profile))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<StaffProfile>> {
        Ok(self.tables.read().staff.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<StaffProfile>> {
        Ok(self
            .tables
            .read()
            .staff
            .iter()
            .find(|p| p.user_id == Some(user_id))
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<StaffProfile>> {
        Ok(self.tables.read().staff.iter().find(|p| p.email == email).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<StaffProfile>> {
        Ok(self
            .tables
            .read()
            .staff
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn list(&self, status: Option<ProfileStatus>) -> Result<Vec<StaffProfile>> {
        let mut profiles: Vec<StaffProfile> = self
            .tables
            .read()
            .staff
            .iter()
            .filter(|p| status.map_or(true, |s| p.status == s))
            .cloned()
            .collect();
        profiles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(profiles)
    }

    async fn update(&self, id: Uuid, fields: &StaffProfileFields) -> Result<Option<StaffProfile>> {
        let mut t = self.tables.write();
        let Some(existing) = t.staff.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        let updated = StaffProfile {
            created_at: existing.created_at,
            ..profile_from(id, existing.user_id, fields, Utc::now())
        };
        *existing = updated.clone();
        Ok(Some(updated))
    }

    async fn upsert_for_user(&self, user_id: Uuid, fields: &StaffProfileFields) -> Result<Option<StaffProfile>> {
        let mut t = self.tables.write();
        let now = Utc::now();
        let position = t.staff.iter().position(|p| p.email == fields.email);
        match position {
            Some(i) if t.staff[i].user_id.map_or(true, |owner| owner == user_id) => {
                let existing = &mut t.staff[i];
                let updated = StaffProfile {
                    created_at: existing.created_at,
                    status: existing.status,
                    ..profile_from(existing.id, Some(user_id), fields, now)
                };
                *existing = updated.clone();
                Ok(Some(updated))
            }
            Some(_) => Ok(None),
            None => {
                let profile = profile_from(Uuid::new_v4(), Some(user_id), fields, now);
                t.staff.push(profile.clone());
                Ok(Some(profile))
            }
        }
    }

    async fn link_user(&self, email: &str, user_id: Uuid) -> Result<()> {
        let mut t = self.tables.write();
        if let Some(profile) = t
            .staff
            .iter_mut()
            .find(|p| p.email == email && p.user_id.is_none())
        {
            profile.user_id = Some(user_id);
            profile.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut t = self.tables.write();
        let before = t.staff.len();
        t.staff.retain(|p| p.id != id);
        if t.staff.len() == before {
            return Ok(false);
        }
        for child in t.children.iter_mut() {
            if child.assigned_teacher == Some(id) {
                child.assigned_teacher = None;
            }
            if child.assigned_caretaker == Some(id) {
                child.assigned_caretaker = None;
            }
        }
        Ok(true)
    }
}

#[async_trait]
impl ChildRepository for MemoryStore {
    async fn create(&self, fields: &ChildFields) -> Result<Child> {
        let now = Utc::now();
        let mut child = Child {
            id: Uuid::new_v4(),
            child_name: String::new(),
            dob: fields.dob,
            gender: fields.gender,
            blood_group: String::new(),
            admission_date: fields.admission_date,
            parent_name: String::new(),
            parent_email: String::new(),
            parent_phone: String::new(),
            emergency_contact_name: String::new(),
            emergency_contact_number: String::new(),
            allergies: None,
            medical_conditions: None,
            assigned_teacher: None,
            assigned_caretaker: None,
            parent_id: None,
            created_at: now,
            updated_at: now,
        };
        apply_child_fields(&mut child, fields);
        self.tables.write().children.push(child.clone());
        Ok(child)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Child>> {
        Ok(self.tables.read().children.iter().find(|c| c.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Child>> {
        let mut children = self.tables.read().children.clone();
        children.sort_by(|a, b| a.child_name.cmp(&b.child_name));
        Ok(children)
    }

    async fn list_assigned_to(&self, staff_id: Uuid) -> Result<Vec<Child>> {
        let mut children: Vec<Child> = self
            .tables
            .read()
            .children
            .iter()
            .filter(|c| c.is_assigned_to(staff_id))
            .cloned()
            .collect();
        children.sort_by(|a, b| a.child_name.cmp(&b.child_name));
        Ok(children)
    }

    async fn find_for_parent(&self, parent_id: Uuid) -> Result<Option<Child>> {
        Ok(self
            .tables
            .read()
            .children
            .iter()
            .find(|c| c.parent_id == Some(parent_id))
            .cloned())
    }

    async fn update(&self, id: Uuid, fields: &ChildFields) -> Result<Option<Child>> {
        let mut t = self.tables.write();
        let Some(child) = t.children.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        apply_child_fields(child, fields);
        child.updated_at = Utc::now();
        Ok(Some(child.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut t = self.tables.write();
        let before = t.children.len();
        t.children.retain(|c| c.id != id);
        if t.children.len() == before {
            return Ok(false);
        }
        t.child_attendance.retain(|a| a.child_id != id);
        t.activities.retain(|a| a.child_id != id);
        t.fees.retain(|f| f.child_id != id);
        Ok(true)
    }
}

#[async_trait]
impl AttendanceRepository for MemoryStore {
    async fn upsert_child(&self, r: &ChildAttendanceUpsert) -> Result<ChildAttendance> {
        let mut t = self.tables.write();
        let now = Utc::now();
        if let Some(existing) = t
            .child_attendance
            .iter_mut()
            .find(|a| a.child_id == r.child_id && a.date == r.date)
        {
            existing.status = r.status;
            if r.check_in.is_some() {
                existing.check_in = r.check_in.clone();
            }
            if r.check_out.is_some() {
                existing.check_out = r.check_out.clone();
            }
            if r.remarks.is_some() {
                existing.remarks = r.remarks.clone();
            }
            existing.updated_at = now;
            return Ok(existing.clone());
        }
        let record = ChildAttendance {
            id: Uuid::new_v4(),
            child_id: r.child_id,
            date: r.date,
            status: r.status,
            check_in: r.check_in.clone(),
            check_out: r.check_out.clone(),
            remarks: r.remarks.clone(),
            created_at: now,
            updated_at: now,
        };
        t.child_attendance.push(record.clone());
        Ok(record)
    }

    async fn upsert_staff(&self, r: &StaffAttendanceUpsert) -> Result<StaffAttendance> {
        let mut t = self.tables.write();
        let now = Utc::now();
        if let Some(existing) = t
            .staff_attendance
            .iter_mut()
            .find(|a| a.staff_id == r.staff_id && a.date == r.date)
        {
            existing.status = r.status;
            if let Some(remarks) = &r.remarks {
                existing.remarks = remarks.clone();
            }
            existing.updated_at = now;
            return Ok(existing.clone());
        }
        let record = StaffAttendance {
            id: Uuid::new_v4(),
            staff_id: r.staff_id,
            date: r.date,
            status: r.status,
            remarks: r.remarks.clone().unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };
        t.staff_attendance.push(record.clone());
        Ok(record)
    }

    async fn list_child_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ChildAttendanceWithChild>> {
        let t = self.tables.read();
        let mut records: Vec<ChildAttendanceWithChild> = t
            .child_attendance
            .iter()
            .filter(|a| a.date >= start && a.date < end)
            .filter_map(|a| {
                let child = t.children.iter().find(|c| c.id == a.child_id)?;
                Some(ChildAttendanceWithChild {
                    record: a.clone(),
                    child_name: child.child_name.clone(),
                    parent_name: child.parent_name.clone(),
                    parent_phone: child.parent_phone.clone(),
                })
            })
            .collect();
        records.sort_by(|a, b| a.child_name.cmp(&b.child_name));
        Ok(records)
    }

    async fn list_for_children_between(
        &self,
        child_ids: &[Uuid],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ChildAttendance>> {
        Ok(self
            .tables
            .read()
            .child_attendance
            .iter()
            .filter(|a| child_ids.contains(&a.child_id) && a.date >= start && a.date < end)
            .cloned()
            .collect())
    }

    async fn list_child_history(&self, child_id: Uuid) -> Result<Vec<ChildAttendance>> {
        let mut records: Vec<ChildAttendance> = self
            .tables
            .read()
            .child_attendance
            .iter()
            .filter(|a| a.child_id == child_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(records)
    }

    async fn list_staff_on(&self, date: DateTime<Utc>) -> Result<Vec<StaffAttendance>> {
        Ok(self
            .tables
            .read()
            .staff_attendance
            .iter()
            .filter(|a| a.date == date)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ActivityRepository for MemoryStore {
    async fn create(&self, a: &NewActivity) -> Result<Activity> {
        let activity = Activity {
            id: Uuid::new_v4(),
            child_id: a.child_id,
            title: a.title.clone(),
            description: a.description.clone(),
            meals: a.meals.clone(),
            nap_time: a.nap_time.clone(),
            health_notes: a.health_notes.clone(),
            behavior_notes: a.behavior_notes.clone(),
            timestamp: a.timestamp,
            created_at: Utc::now(),
        };
        self.tables.write().activities.push(activity.clone());
        Ok(activity)
    }

    async fn list_for_child(&self, child_id: Uuid) -> Result<Vec<Activity>> {
        let mut activities: Vec<Activity> = self
            .tables
            .read()
            .activities
            .iter()
            .filter(|a| a.child_id == child_id)
            .cloned()
            .collect();
        activities.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(activities)
    }

    async fn count_for_children_between(
        &self,
        child_ids: &[Uuid],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64> {
        let count = self
            .tables
            .read()
            .activities
            .iter()
            .filter(|a| child_ids.contains(&a.child_id) && a.timestamp >= start && a.timestamp < end)
            .count();
        Ok(count as i64)
    }
}

#[async_trait]
impl FeeRepository for MemoryStore {
    async fn list_for_child(&self, child_id: Uuid) -> Result<Vec<Fee>> {
        let mut fees: Vec<Fee> = self
            .tables
            .read()
            .fees
            .iter()
            .filter(|f| f.child_id == child_id)
            .cloned()
            .collect();
        fees.sort_by(|a, b| b.due_date.cmp(&a.due_date));
        Ok(fees)
    }
}

#[async_trait]
impl HealthProbe for MemoryStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
