//! Axum route handlers for signup, login and the user profile.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::accounts::auth::AuthUser;
use crate::accounts::store::{NewProfile, ProfileUpdate};
use crate::accounts::{UserView, DEFAULT_USER_TYPE, MIN_PASSWORD_CHARS};
use crate::errors::AppError;
use crate::identity_client::{IdentityError, IdentityErrorKind, NewAccount};
use crate::models::user::UserProfileRow;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub user_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub message: String,
    pub user: UserView,
    /// Provider-issued ID token; the frontend sends it back as a Bearer token.
    pub id_token: String,
}

#[derive(Debug, Serialize)]
pub struct AuthCheckResponse {
    pub authenticated: bool,
    pub user: UserView,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub user: UserView,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/signup
///
/// Creates the identity account, then the profile document. A failed profile
/// write is logged and does not fail the signup.
pub async fn handle_signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let (email, password) = require_credentials(request.email, request.password)?;
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_CHARS} characters"
        )));
    }

    let first_name = clean(request.first_name);
    let last_name = clean(request.last_name);
    let display_name = format!("{first_name} {last_name}").trim().to_string();
    let user_type = Some(clean(request.user_type))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_USER_TYPE.to_string());

    let session = state
        .identity
        .sign_up(&NewAccount {
            email,
            password,
            display_name: (!display_name.is_empty()).then_some(display_name),
        })
        .await
        .map_err(signup_error)?;

    let profile = NewProfile {
        uid: session.user.uid.clone(),
        email: session.user.email.clone(),
        first_name,
        last_name,
        phone: clean(request.phone),
        user_type,
    };
    let stored = match state.profiles.create_profile(&profile).await {
        Ok(row) => Some(row),
        Err(e) => {
            warn!(uid = %profile.uid, error = %e, "Profile write failed; continuing signup");
            None
        }
    };

    info!(uid = %session.user.uid, "Signup succeeded");

    // Without a stored row, echo what we tried to write.
    let mut user = UserView::from_parts(&session.user, stored.as_ref());
    if stored.is_none() {
        user.first_name = profile.first_name;
        user.last_name = profile.last_name;
        user.phone = profile.phone;
        user.user_type = profile.user_type;
    }

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User created successfully!".to_string(),
            user,
            id_token: session.id_token,
        }),
    ))
}

/// POST /api/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let (email, password) = require_credentials(request.email, request.password)?;

    let session = state
        .identity
        .sign_in(&email, &password)
        .await
        .map_err(login_error)?;

    let profile = load_profile(&state, &session.user.uid).await;

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        user: UserView::from_parts(&session.user, profile.as_ref()),
        id_token: session.id_token,
    }))
}

/// GET /api/auth/check
pub async fn handle_auth_check(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<AuthCheckResponse>, AppError> {
    let profile = load_profile(&state, &identity.uid).await;
    Ok(Json(AuthCheckResponse {
        authenticated: true,
        user: UserView::from_parts(&identity, profile.as_ref()),
    }))
}

/// GET /api/user/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = load_profile(&state, &identity.uid).await;
    Ok(Json(ProfileResponse {
        message: None,
        user: UserView::from_parts(&identity, profile.as_ref()),
    }))
}

/// PUT /api/user/profile
///
/// Missing fields are written as empty strings; the profile is marked complete.
pub async fn handle_update_profile(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Json(request): Json<ProfileUpdateRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    let update = ProfileUpdate {
        uid: identity.uid.clone(),
        email: identity.email.clone(),
        first_name: clean(request.first_name),
        last_name: clean(request.last_name),
        phone: clean(request.phone),
    };
    let row = state.profiles.upsert_profile(&update).await?;

    info!(uid = %identity.uid, "Profile updated");

    Ok(Json(ProfileResponse {
        message: Some("Profile updated successfully".to_string()),
        user: UserView::from_parts(&identity, Some(&row)),
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn require_credentials(
    email: Option<String>,
    password: Option<String>,
) -> Result<(String, String), AppError> {
    let email = email.map(|e| e.trim().to_string()).unwrap_or_default();
    let password = password.unwrap_or_default();
    if email.is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    }
    Ok((email, password))
}

fn clean(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Profile reads are best-effort: a store failure degrades to identity-only fields.
async fn load_profile(state: &AppState, uid: &str) -> Option<UserProfileRow> {
    match state.profiles.get_profile(uid).await {
        Ok(profile) => profile,
        Err(e) => {
            warn!(%uid, error = %e, "Profile read failed; using defaults");
            None
        }
    }
}

fn signup_error(e: IdentityError) -> AppError {
    warn!(error = %e, "Signup rejected by identity provider");
    match e.kind() {
        IdentityErrorKind::EmailAlreadyExists => AppError::Conflict(
            "This email is already registered. Please use a different email or try logging in."
                .to_string(),
        ),
        IdentityErrorKind::InvalidEmail => {
            AppError::Validation("The email address is not valid.".to_string())
        }
        IdentityErrorKind::WeakPassword => AppError::Validation(
            "The password is too weak. Please use a stronger password.".to_string(),
        ),
        IdentityErrorKind::Unavailable => AppError::Upstream(e.to_string()),
        _ => AppError::Validation("Registration failed. Please try again.".to_string()),
    }
}

fn login_error(e: IdentityError) -> AppError {
    match e.kind() {
        IdentityErrorKind::Unavailable => AppError::Upstream(e.to_string()),
        _ => {
            warn!(error = %e, "Login rejected by identity provider");
            AppError::Unauthorized("Invalid email or password".to_string())
        }
    }
}
