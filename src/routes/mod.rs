pub mod admin;
pub mod auth;
pub mod children;
pub mod health;
pub mod metrics;
pub mod parent;
pub mod staff;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, patch, post},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::AppState;

/// The whole HTTP surface: the API under `/api` plus the operational endpoints.
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(state.config.cors_origin.as_deref());

    let api = Router::new()
        // Auth
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
        .route("/auth/parents", get(auth::list_parents))
        // Admin
        .route("/admin/staff", get(admin::list_staff))
        .route("/admin/staff/pending", get(admin::list_pending_staff))
        .route("/admin/staff/active", get(admin::list_active_staff))
        .route("/admin/staff/approve/{id}", patch(admin::approve_staff))
        .route("/admin/staff/reject/{id}", patch(admin::reject_staff))
        .route(
            "/admin/staff-attendance",
            get(admin::list_staff_attendance).post(admin::mark_staff_attendance),
        )
        .route("/admin/children-attendance", get(admin::list_children_attendance))
        // Children
        .route("/children", get(children::list_children).post(children::create_child))
        .route(
            "/children/{id}",
            get(children::get_child)
                .put(children::update_child)
                .delete(children::delete_child),
        )
        // Staff self-service (static segments win over /staff/{id})
        .route("/staff/assigned-children", get(staff::assigned_children))
        .route("/staff/mark-attendance", post(staff::mark_attendance))
        .route("/staff/add-activity", post(staff::add_activity))
        .route("/staff/dashboard-stats", get(staff::dashboard_stats))
        .route("/staff/me", get(staff::get_me).put(staff::update_me))
        // Staff profiles
        .route("/staff", get(staff::list_staff).post(staff::create_staff))
        .route(
            "/staff/{id}",
            get(staff::get_staff)
                .put(staff::update_staff)
                .delete(staff::delete_staff),
        )
        // Parent
        .route("/parent/child", get(parent::my_child))
        .route("/parent/attendance/child/{id}", get(parent::child_attendance))
        .route("/parent/activities/child/{id}", get(parent::child_activities))
        .route("/parent/fees/child/{id}", get(parent::child_fees));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics::metrics_handler))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let allow_origin = match origin.map(HeaderValue::from_str) {
        Some(Ok(value)) => AllowOrigin::exact(value),
        Some(Err(_)) => {
            warn!("CORS_ORIGIN is not a valid header value; mirroring request origins");
            AllowOrigin::mirror_request()
        }
        None => AllowOrigin::mirror_request(),
    };
    CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_origin(allow_origin)
}
