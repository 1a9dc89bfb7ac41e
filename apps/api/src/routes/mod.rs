pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::accounts::handlers as accounts;
use crate::ats::handlers as ats;
use crate::catalog::handlers as catalog;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(health::root_handler))
        .route("/api/health", get(health::health_handler))
        // ATS checker
        .route(
            "/api/ats/check",
            post(ats::handle_ats_check).layer(DefaultBodyLimit::max(upload_limit)),
        )
        // Catalog listings
        .route("/api/jobs", get(catalog::handle_list_jobs))
        .route("/api/courses", get(catalog::handle_list_courses))
        .route("/api/events", get(catalog::handle_list_events))
        // Accounts
        .route("/api/signup", post(accounts::handle_signup))
        .route("/api/login", post(accounts::handle_login))
        .route("/api/auth/check", get(accounts::handle_auth_check))
        .route(
            "/api/user/profile",
            get(accounts::handle_get_profile).put(accounts::handle_update_profile),
        )
        .with_state(state)
}
