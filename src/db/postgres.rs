use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::repository::{
    ActivityRepository, AttendanceRepository, ChildRepository, FeeRepository, HealthProbe,
    StaffRepository, UserRepository,
};
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

/// PostgreSQL-backed implementation of every repository trait.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn create(&self, user: &NewUser) -> Result<Option<User>> {
        let created = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, full_name, email, password_hash, role, status)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (email) DO NOTHING
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.status.as_str())
        .fetch_optional(&self.pool)
        .await?;
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn list_by_role(&self, role: UserRole, status: Option<AccountStatus>) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users
             WHERE role = $1 AND ($2::TEXT IS NULL OR status = $2)
             ORDER BY created_at",
        )
        .bind(role.as_str())
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn list_parents(&self) -> Result<Vec<ParentSummary>> {
        let parents = sqlx::query_as::<_, ParentSummary>(
            "SELECT id, full_name, email FROM users WHERE role = 'parent' ORDER BY full_name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(parents)
    }

    async fn transition_staff_status(
        &self,
        id: Uuid,
        from: AccountStatus,
        to: AccountStatus,
    ) -> Result<Option<User>> {
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET status = $1, updated_at = NOW()
             WHERE id = $2 AND role = 'staff' AND status = $3
             RETURNING *",
        )
        .bind(to.as_str())
        .bind(id)
        .bind(from.as_str())
        .fetch_optional(&mut *tx)
        .await?;

        if user.is_some() {
            // No linked profile is fine: zero rows updated.
            sqlx::query(
                "UPDATE staff_profiles SET status = $1, updated_at = NOW() WHERE user_id = $2",
            )
            .bind(ProfileStatus::from(to).as_str())
            .bind(id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(user)
    }
}

#[async_trait]
impl StaffRepository for PgStore {
    async fn create(&self, f: &StaffProfileFields, user_id: Option<Uuid>) -> Result<Option<StaffProfile>> {
        let profile = sqlx::query_as::<_, StaffProfile>(
            "INSERT INTO staff_profiles
                 (id, user_id, name, email, phone, title, dob, gender, joining_date,
                  qualification, experience, address, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             ON CONFLICT (email) DO NOTHING
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&f.name)
        .bind(&f.email)
        .bind(&f.phone)
        .bind(f.title.as_str())
        .bind(f.dob)
        .bind(f.gender.as_str())
        .bind(f.joining_date)
        .bind(&f.qualification)
        .bind(&f.experience)
        .bind(&f.address)
        .bind(f.status.as_str())
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<StaffProfile>> {
        let profile = sqlx::query_as::<_, StaffProfile>("SELECT * FROM staff_profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(profile)
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<StaffProfile>> {
        let profile =
            sqlx::query_as::<_, StaffProfile>("SELECT * FROM staff_profiles WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(profile)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<StaffProfile>> {
        let profile =
            sqlx::query_as::<_, StaffProfile>("SELECT * FROM staff_profiles WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
        Ok(profile)
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<StaffProfile>> {
        let profiles =
            sqlx::query_as::<_, StaffProfile>("SELECT * FROM staff_profiles WHERE id = ANY($1)")
                .bind(ids)
                .fetch_all(&self.pool)
                .await?;
        Ok(profiles)
    }

    async fn list(&self, status: Option<ProfileStatus>) -> Result<Vec<StaffProfile>> {
        let profiles = sqlx::query_as::<_, StaffProfile>(
            "SELECT * FROM staff_profiles
             WHERE ($1::TEXT IS NULL OR status = $1)
             ORDER BY name",
        )
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;
        Ok(profiles)
    }

    async fn update(&self, id: Uuid, f: &StaffProfileFields) -> Result<Option<StaffProfile>> {
        let profile = sqlx::query_as::<_, StaffProfile>(
            "UPDATE staff_profiles
             SET name = $1, email = $2, phone = $3, title = $4, dob = $5, gender = $6,
                 joining_date = $7, qualification = $8, experience = $9, address = $10,
                 status = $11, updated_at = NOW()
             WHERE id = $12
             RETURNING *",
        )
        .bind(&f.name)
        .bind(&f.email)
        .bind(&f.phone)
        .bind(f.title.as_str())
        .bind(f.dob)
        .bind(f.gender.as_str())
        .bind(f.joining_date)
        .bind(&f.qualification)
        .bind(&f.experience)
        .bind(&f.address)
        .bind(f.status.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }

    async fn upsert_for_user(&self, user_id: Uuid, f: &StaffProfileFields) -> Result<Option<StaffProfile>> {
        // Status stays out of the update set; self-edits never change it.
        let profile = sqlx::query_as::<_, StaffProfile>(
            "INSERT INTO staff_profiles
                 (id, user_id, name, email, phone, title, dob, gender, joining_date,
                  qualification, experience, address, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             ON CONFLICT (email) DO UPDATE SET
                 user_id       = EXCLUDED.user_id,
                 name          = EXCLUDED.name,
                 phone         = EXCLUDED.phone,
                 title         = EXCLUDED.title,
                 dob           = EXCLUDED.dob,
                 gender        = EXCLUDED.gender,
                 joining_date  = EXCLUDED.joining_date,
                 qualification = EXCLUDED.qualification,
                 experience    = EXCLUDED.experience,
                 address       = EXCLUDED.address,
                 updated_at    = NOW()
             WHERE staff_profiles.user_id IS NULL OR staff_profiles.user_id = EXCLUDED.user_id
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&f.name)
        .bind(&f.email)
        .bind(&f.phone)
        .bind(f.title.as_str())
        .bind(f.dob)
        .bind(f.gender.as_str())
        .bind(f.joining_date)
        .bind(&f.qualification)
        .bind(&f.experience)
        .bind(&f.address)
        .bind(f.status.as_str())
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }

    async fn link_user(&self, email: &str, user_id: Uuid) -> Result<()> {
        sqlx::query(
            "UPDATE staff_profiles SET user_id = $1, updated_at = NOW()
             WHERE email = $2 AND user_id IS NULL",
        )
        .bind(user_id)
        .bind(email)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM staff_profiles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ChildRepository for PgStore {
    async fn create(&self, f: &ChildFields) -> Result<Child> {
        let child = sqlx::query_as::<_, Child>(
            "INSERT INTO children
                 (id, child_name, dob, gender, blood_group, admission_date, parent_name,
                  parent_email, parent_phone, emergency_contact_name, emergency_contact_number,
                  allergies, medical_conditions, assigned_teacher, assigned_caretaker, parent_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&f.child_name)
        .bind(f.dob)
        .bind(f.gender.as_str())
        .bind(&f.blood_group)
        .bind(f.admission_date)
        .bind(&f.parent_name)
        .bind(&f.parent_email)
        .bind(&f.parent_phone)
        .bind(&f.emergency_contact_name)
        .bind(&f.emergency_contact_number)
        .bind(&f.allergies)
        .bind(&f.medical_conditions)
        .bind(f.assigned_teacher)
        .bind(f.assigned_caretaker)
        .bind(f.parent_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(child)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Child>> {
        let child = sqlx::query_as::<_, Child>("SELECT * FROM children WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(child)
    }

    async fn list(&self) -> Result<Vec<Child>> {
        let children = sqlx::query_as::<_, Child>("SELECT * FROM children ORDER BY child_name")
            .fetch_all(&self.pool)
            .await?;
        Ok(children)
    }

    async fn list_assigned_to(&self, staff_id: Uuid) -> Result<Vec<Child>> {
        let children = sqlx::query_as::<_, Child>(
            "SELECT * FROM children
             WHERE assigned_teacher = $1 OR assigned_caretaker = $1
             ORDER BY child_name",
        )
        .bind(staff_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(children)
    }

    async fn find_for_parent(&self, parent_id: Uuid) -> Result<Option<Child>> {
        let child = sqlx::query_as::<_, Child>(
            "SELECT * FROM children WHERE parent_id = $1 ORDER BY created_at LIMIT 1",
        )
        .bind(parent_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(child)
    }

    async fn update(&self, id: Uuid, f: &ChildFields) -> Result<Option<Child>> {
        let child = sqlx::query_as::<_, Child>(
            "UPDATE children
             SET child_name = $1, dob = $2, gender = $3, blood_group = $4, admission_date = $5,
                 parent_name = $6, parent_email = $7, parent_phone = $8,
                 emergency_contact_name = $9, emergency_contact_number = $10,
                 allergies = $11, medical_conditions = $12,
                 assigned_teacher = $13, assigned_caretaker = $14, parent_id = $15,
                 updated_at = NOW()
             WHERE id = $16
             RETURNING *",
        )
        .bind(&f.child_name)
        .bind(f.dob)
        .bind(f.gender.as_str())
        .bind(&f.blood_group)
        .bind(f.admission_date)
        .bind(&f.parent_name)
        .bind(&f.parent_email)
        .bind(&f.parent_phone)
        .bind(&f.emergency_contact_name)
        .bind(&f.emergency_contact_number)
        .bind(&f.allergies)
        .bind(&f.medical_conditions)
        .bind(f.assigned_teacher)
        .bind(f.assigned_caretaker)
        .bind(f.parent_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(child)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        // Attendance, activities and fees go with it (ON DELETE CASCADE).
        let result = sqlx::query("DELETE FROM children WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl AttendanceRepository for PgStore {
    async fn upsert_child(&self, r: &ChildAttendanceUpsert) -> Result<ChildAttendance> {
        let record = sqlx::query_as::<_, ChildAttendance>(
            "INSERT INTO child_attendance (id, child_id, date, status, check_in, check_out, remarks)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (child_id, date) DO UPDATE SET
                 status     = EXCLUDED.status,
                 check_in   = COALESCE(EXCLUDED.check_in, child_attendance.check_in),
                 check_out  = COALESCE(EXCLUDED.check_out, child_attendance.check_out),
                 remarks    = COALESCE(EXCLUDED.remarks, child_attendance.remarks),
                 updated_at = NOW()
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(r.child_id)
        .bind(r.date)
        .bind(r.status.as_str())
        .bind(&r.check_in)
        .bind(&r.check_out)
        .bind(&r.remarks)
        .fetch_one(&self.pool)
        .await?;
        Ok(record)
    }

    async fn upsert_staff(&self, r: &StaffAttendanceUpsert) -> Result<StaffAttendance> {
        let record = sqlx::query_as::<_, StaffAttendance>(
            "INSERT INTO staff_attendance (id, staff_id, date, status, remarks)
             VALUES ($1, $2, $3, $4, COALESCE($5, ''))
             ON CONFLICT (staff_id, date) DO UPDATE SET
                 status     = EXCLUDED.status,
                 remarks    = COALESCE($5, staff_attendance.remarks),
                 updated_at = NOW()
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(r.staff_id)
        .bind(r.date)
        .bind(r.status.as_str())
        .bind(&r.remarks)
        .fetch_one(&self.pool)
        .await?;
        Ok(record)
    }

    async fn list_child_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ChildAttendanceWithChild>> {
        let records = sqlx::query_as::<_, ChildAttendanceWithChild>(
            "SELECT a.*, c.child_name, c.parent_name, c.parent_phone
             FROM child_attendance a
             JOIN children c ON c.id = a.child_id
             WHERE a.date >= $1 AND a.date < $2
             ORDER BY c.child_name",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    async fn list_for_children_between(
        &self,
        child_ids: &[Uuid],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ChildAttendance>> {
        let records = sqlx::query_as::<_, ChildAttendance>(
            "SELECT * FROM child_attendance
             WHERE child_id = ANY($1) AND date >= $2 AND date < $3",
        )
        .bind(child_ids)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    async fn list_child_history(&self, child_id: Uuid) -> Result<Vec<ChildAttendance>> {
        let records = sqlx::query_as::<_, ChildAttendance>(
            "SELECT * FROM child_attendance WHERE child_id = $1 ORDER BY date DESC",
        )
        .bind(child_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    async fn list_staff_on(&self, date: DateTime<Utc>) -> Result<Vec<StaffAttendance>> {
        let records = sqlx::query_as::<_, StaffAttendance>(
            "SELECT * FROM staff_attendance WHERE date = $1 ORDER BY created_at",
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }
}

#[async_trait]
impl ActivityRepository for PgStore {
    async fn create(&self, a: &NewActivity) -> Result<Activity> {
        let activity = sqlx::query_as::<_, Activity>(
            r#"INSERT INTO activities
                   (id, child_id, title, description, meals, nap_time, health_notes,
                    behavior_notes, "timestamp")
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
               RETURNING *"#,
        )
        .bind(Uuid::new_v4())
        .bind(a.child_id)
        .bind(&a.title)
        .bind(&a.description)
        .bind(&a.meals)
        .bind(&a.nap_time)
        .bind(&a.health_notes)
        .bind(&a.behavior_notes)
        .bind(a.timestamp)
        .fetch_one(&self.pool)
        .await?;
        Ok(activity)
    }

    async fn list_for_child(&self, child_id: Uuid) -> Result<Vec<Activity>> {
        let activities = sqlx::query_as::<_, Activity>(
            r#"SELECT * FROM activities WHERE child_id = $1 ORDER BY "timestamp" DESC"#,
        )
        .bind(child_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(activities)
    }

    async fn count_for_children_between(
        &self,
        child_ids: &[Uuid],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM activities
               WHERE child_id = ANY($1) AND "timestamp" >= $2 AND "timestamp" < $3"#,
        )
        .bind(child_ids)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}

#[async_trait]
impl FeeRepository for PgStore {
    async fn list_for_child(&self, child_id: Uuid) -> Result<Vec<Fee>> {
        let fees = sqlx::query_as::<_, Fee>(
            "SELECT * FROM fees WHERE child_id = $1 ORDER BY due_date DESC",
        )
        .bind(child_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(fees)
    }
}

#[async_trait]
impl HealthProbe for PgStore {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
