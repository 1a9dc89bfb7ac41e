//! Axum route handlers for the catalog listings.

use axum::{
    extract::{Query, State},
    Json,
};

use crate::catalog::ListQuery;
use crate::errors::AppError;
use crate::models::catalog::{CourseRow, EventRow, JobRow};
use crate::state::AppState;

/// GET /api/jobs
///
/// Newest postings first.
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<Vec<JobRow>>, AppError> {
    let jobs = sqlx::query_as::<_, JobRow>(
        r#"
        SELECT id, title, company, location, employment_type, description, posted_at
        FROM jobs
        WHERE ($1::TEXT IS NULL OR title ILIKE $1)
        ORDER BY posted_at DESC
        LIMIT $2
        "#,
    )
    .bind(params.title_pattern())
    .bind(params.effective_limit())
    .fetch_all(&state.db)
    .await?;

    Ok(Json(jobs))
}

/// GET /api/courses
pub async fn handle_list_courses(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<Vec<CourseRow>>, AppError> {
    let courses = sqlx::query_as::<_, CourseRow>(
        r#"
        SELECT id, title, provider, url, duration, level, created_at
        FROM courses
        WHERE ($1::TEXT IS NULL OR title ILIKE $1)
        ORDER BY created_at DESC
        LIMIT $2
        "#,
    )
    .bind(params.title_pattern())
    .bind(params.effective_limit())
    .fetch_all(&state.db)
    .await?;

    Ok(Json(courses))
}

/// GET /api/events
///
/// Ordered by start time, soonest first.
pub async fn handle_list_events(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<Vec<EventRow>>, AppError> {
    let events = sqlx::query_as::<_, EventRow>(
        r#"
        SELECT id, title, location, url, starts_at, created_at
        FROM events
        WHERE ($1::TEXT IS NULL OR title ILIKE $1)
        ORDER BY starts_at ASC
        LIMIT $2
        "#,
    )
    .bind(params.title_pattern())
    .bind(params.effective_limit())
    .fetch_all(&state.db)
    .await?;

    Ok(Json(events))
}
