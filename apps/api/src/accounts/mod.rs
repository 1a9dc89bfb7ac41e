// Signup/login/profile glue. Identity lives with the external provider,
// profile documents live in Postgres. Both are reached through traits held
// in `AppState`.

pub mod auth;
pub mod handlers;
pub mod store;

use serde::Serialize;

use crate::identity_client::IdentityUser;
use crate::models::user::UserProfileRow;

pub const DEFAULT_USER_TYPE: &str = "job_seeker";
pub const MIN_PASSWORD_CHARS: usize = 6;

/// User as returned to the frontend: identity fields merged with the profile document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub uid: String,
    pub email: String,
    pub display_name: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub user_type: String,
    pub profile_complete: bool,
    pub email_verified: bool,
}

impl UserView {
    /// A missing profile (store down or never written) falls back to defaults.
    pub fn from_parts(identity: &IdentityUser, profile: Option<&UserProfileRow>) -> Self {
        let display_name = identity
            .display_name
            .clone()
            .unwrap_or_else(|| email_local_part(&identity.email).to_string());

        match profile {
            Some(p) => Self {
                uid: identity.uid.clone(),
                email: identity.email.clone(),
                display_name,
                first_name: p.first_name.clone(),
                last_name: p.last_name.clone(),
                phone: p.phone.clone(),
                user_type: p.user_type.clone(),
                profile_complete: p.profile_complete,
                email_verified: identity.email_verified || p.email_verified,
            },
            None => Self {
                uid: identity.uid.clone(),
                email: identity.email.clone(),
                display_name,
                first_name: String::new(),
                last_name: String::new(),
                phone: String::new(),
                user_type: DEFAULT_USER_TYPE.to_string(),
                profile_complete: false,
                email_verified: identity.email_verified,
            },
        }
    }
}

fn email_local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}
