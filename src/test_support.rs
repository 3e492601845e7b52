//! Fixtures shared by the unit and router tests.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    config::Config,
    db::memory::MemoryStore,
    models::{
        auth::BOOTSTRAP_ADMIN_ID,
        child::{Child, ChildFields, ChildRequest},
        staff::{ProfileStatus, StaffProfile, StaffProfileFields, StaffProfileRequest, StaffTitle},
        user::{AccountStatus, NewUser, User, UserRole},
        Gender,
    },
    services::auth::AuthService,
    AppState,
};

pub const PASSWORD: &str = "secret123";

pub struct TestApp {
    pub store: MemoryStore,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let state = AppState::new(store.repositories(), Config::for_tests());
        Self { store, state }
    }

    pub async fn user(&self, name: &str, email: &str, role: UserRole, status: AccountStatus) -> User {
        let password_hash = bcrypt::hash(PASSWORD, 4).unwrap();
        self.state
            .repos
            .users
            .create(&NewUser {
                full_name: name.into(),
                email: email.into(),
                password_hash,
                role,
                status,
            })
            .await
            .unwrap()
            .unwrap()
    }

    pub async fn profile(&self, name: &str, email: &str, user_id: Option<Uuid>) -> StaffProfile {
        self.state
            .repos
            .staff
            .create(&profile_fields(name, email), user_id)
            .await
            .unwrap()
            .unwrap()
    }

    /// An approved staff identity with an active linked profile.
    pub async fn staff_member(&self, name: &str, email: &str) -> (User, StaffProfile) {
        let user = self.user(name, email, UserRole::Staff, AccountStatus::Active).await;
        let mut fields = profile_fields(name, email);
        fields.status = ProfileStatus::Active;
        let profile = self
            .state
            .repos
            .staff
            .create(&fields, Some(user.id))
            .await
            .unwrap()
            .unwrap();
        (user, profile)
    }

    pub async fn child(
        &self,
        name: &str,
        teacher: Option<Uuid>,
        caretaker: Option<Uuid>,
        parent: Option<Uuid>,
    ) -> Child {
        let mut fields = child_fields(name);
        fields.assigned_teacher = teacher;
        fields.assigned_caretaker = caretaker;
        fields.parent_id = parent;
        self.state.repos.children.create(&fields).await.unwrap()
    }

    pub fn token(&self, user: &User) -> String {
        self.sign(&user.id.to_string())
    }

    pub fn admin_token(&self) -> String {
        self.sign(BOOTSTRAP_ADMIN_ID)
    }

    fn sign(&self, subject: &str) -> String {
        let config = &self.state.config;
        AuthService::generate_token(subject, &config.jwt_secret, config.jwt_expiry_days).unwrap()
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn profile_fields(name: &str, email: &str) -> StaffProfileFields {
    StaffProfileFields {
        name: name.into(),
        email: email.into(),
        phone: "555-0100".into(),
        title: StaffTitle::Teacher,
        dob: date(1990, 6, 15),
        gender: Gender::Female,
        joining_date: date(2023, 9, 1),
        qualification: "B.Ed".into(),
        experience: "5 years".into(),
        address: "12 Elm Street".into(),
        status: ProfileStatus::Pending,
    }
}

pub fn child_fields(name: &str) -> ChildFields {
    ChildFields {
        child_name: name.into(),
        dob: date(2021, 2, 10),
        gender: Gender::Male,
        blood_group: "O+".into(),
        admission_date: date(2023, 9, 1),
        parent_name: "Jordan Reyes".into(),
        parent_email: "jordan@example.com".into(),
        parent_phone: "555-0199".into(),
        emergency_contact_name: "Sam Reyes".into(),
        emergency_contact_number: "555-0142".into(),
        allergies: None,
        medical_conditions: None,
        assigned_teacher: None,
        assigned_caretaker: None,
        parent_id: None,
    }
}

pub fn child_request(name: &str) -> ChildRequest {
    ChildRequest {
        child_name: Some(name.into()),
        dob: Some(date(2021, 2, 10)),
        gender: Some("Male".into()),
        blood_group: Some("O+".into()),
        admission_date: Some(date(2023, 9, 1)),
        parent_name: Some("Jordan Reyes".into()),
        parent_email: Some("jordan@example.com".into()),
        parent_phone: Some("555-0199".into()),
        emergency_contact_name: Some("Sam Reyes".into()),
        emergency_contact_number: Some("555-0142".into()),
        ..Default::default()
    }
}

pub fn staff_request(name: &str, email: &str) -> StaffProfileRequest {
    StaffProfileRequest {
        name: Some(name.into()),
        email: Some(email.into()),
        phone: Some("555-0100".into()),
        role: Some("Teacher".into()),
        dob: Some(date(1990, 6, 15)),
        gender: Some("Female".into()),
        joining_date: None,
        qualification: Some("B.Ed".into()),
        experience: Some("5 years".into()),
        address: Some("12 Elm Street".into()),
        status: None,
    }
}
