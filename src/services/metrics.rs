use lazy_static::lazy_static;
use prometheus::{register_counter_vec, CounterVec};

lazy_static! {
    pub static ref LOGINS_COUNTER: CounterVec = register_counter_vec!(
        "api_logins_total",
        "Login attempts by outcome",
        &["status"]
    ).unwrap();

    pub static ref REGISTRATIONS_COUNTER: CounterVec = register_counter_vec!(
        "api_registrations_total",
        "Accounts created by role",
        &["role"]
    ).unwrap();

    pub static ref ATTENDANCE_UPSERTS_COUNTER: CounterVec = register_counter_vec!(
        "api_attendance_upserts_total",
        "Attendance records written, by subject kind",
        &["kind"]
    ).unwrap();

    pub static ref APPROVALS_COUNTER: CounterVec = register_counter_vec!(
        "api_staff_approvals_total",
        "Staff account transitions by target status",
        &["status"]
    ).unwrap();
}

pub fn record_login(status: &str) {
    LOGINS_COUNTER.with_label_values(&[status]).inc();
}

pub fn record_registration(role: &str) {
    REGISTRATIONS_COUNTER.with_label_values(&[role]).inc();
}

pub fn record_attendance_upsert(kind: &str) {
    ATTENDANCE_UPSERTS_COUNTER.with_label_values(&[kind]).inc();
}

pub fn record_approval(status: &str) {
    APPROVALS_COUNTER.with_label_values(&[status]).inc();
}
