/// Identity client. The single point of entry for the external identity platform.
///
/// No other module may call the identity REST API directly. Handlers only see
/// the `IdentityProvider` trait and the typed `IdentityErrorKind`; provider
/// error strings are mapped once, here.
///
/// Calls are pass-through: no retries, no caching, no session state.
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";
const REQUEST_TIMEOUT_SECS: u64 = 15;

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

/// Provider failures, classified once at the client boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityErrorKind {
    EmailAlreadyExists,
    InvalidEmail,
    WeakPassword,
    InvalidCredentials,
    UserNotFound,
    InvalidToken,
    Unavailable,
    Other,
}

impl IdentityErrorKind {
    /// Maps a provider error message such as `"WEAK_PASSWORD : Password should be at least 6 characters"`.
    pub fn from_provider_message(message: &str) -> Self {
        let code = message.split([' ', ':']).next().unwrap_or_default();
        match code {
            "EMAIL_EXISTS" => IdentityErrorKind::EmailAlreadyExists,
            "INVALID_EMAIL" | "MISSING_EMAIL" => IdentityErrorKind::InvalidEmail,
            "WEAK_PASSWORD" | "MISSING_PASSWORD" => IdentityErrorKind::WeakPassword,
            "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" | "USER_DISABLED" => {
                IdentityErrorKind::InvalidCredentials
            }
            "EMAIL_NOT_FOUND" | "USER_NOT_FOUND" => IdentityErrorKind::UserNotFound,
            "INVALID_ID_TOKEN" | "TOKEN_EXPIRED" | "CREDENTIAL_TOO_OLD_LOGIN_AGAIN" => {
                IdentityErrorKind::InvalidToken
            }
            "TOO_MANY_ATTEMPTS_TRY_LATER" | "OPERATION_NOT_ALLOWED" => {
                IdentityErrorKind::Unavailable
            }
            _ => IdentityErrorKind::Other,
        }
    }
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("identity provider rejected request (status {status}): {message}")]
    Rejected {
        kind: IdentityErrorKind,
        status: u16,
        message: String,
    },

    #[error("identity provider returned no user")]
    MissingUser,
}

impl IdentityError {
    pub fn kind(&self) -> IdentityErrorKind {
        match self {
            IdentityError::Http(_) => IdentityErrorKind::Unavailable,
            IdentityError::Rejected { kind, .. } => *kind,
            IdentityError::MissingUser => IdentityErrorKind::UserNotFound,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Domain types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct IdentityUser {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub email_verified: bool,
}

/// A successful sign-up or sign-in. The token is issued and owned by the provider.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: IdentityUser,
    pub id_token: String,
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
}

/// The identity collaborator. Carried in `AppState` as `Arc<dyn IdentityProvider>`.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_up(&self, account: &NewAccount) -> Result<AuthSession, IdentityError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, IdentityError>;

    /// Resolves a provider-issued ID token to its user.
    async fn verify_token(&self, id_token: &str) -> Result<IdentityUser, IdentityError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire format
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignUpRequest<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<&'a str>,
    return_secure_token: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupRequest<'a> {
    id_token: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    id_token: String,
    local_id: String,
    email: String,
    #[serde(default)]
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    email_verified: bool,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

impl TokenResponse {
    fn into_session(self) -> AuthSession {
        AuthSession {
            user: IdentityUser {
                uid: self.local_id,
                email: self.email,
                display_name: self.display_name.filter(|n| !n.is_empty()),
                email_verified: false,
            },
            id_token: self.id_token,
        }
    }
}

impl LookupUser {
    fn into_user(self) -> IdentityUser {
        IdentityUser {
            uid: self.local_id,
            email: self.email.unwrap_or_default(),
            display_name: self.display_name.filter(|n| !n.is_empty()),
            email_verified: self.email_verified,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// REST client
// ────────────────────────────────────────────────────────────────────────────

/// Identity platform REST client. Cheap to clone; share one per process.
#[derive(Clone)]
pub struct IdentityClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl IdentityClient {
    pub fn new(api_key: String, base_url: String) -> Result<Self, IdentityError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/accounts:{method}", self.base_url)
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<T, IdentityError> {
        let response = self
            .client
            .post(self.endpoint(method))
            .query(&[("key", &self.api_key)])
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = parse_provider_message(&body);
            let kind = if status.is_server_error() {
                IdentityErrorKind::Unavailable
            } else {
                IdentityErrorKind::from_provider_message(&message)
            };
            warn!(method, status = status.as_u16(), ?kind, "Identity call rejected");
            return Err(IdentityError::Rejected {
                kind,
                status: status.as_u16(),
                message,
            });
        }

        debug!(method, "Identity call succeeded");
        Ok(response.json().await?)
    }
}

/// Pulls `error.message` from a provider error body, falling back to the raw body.
fn parse_provider_message(body: &str) -> String {
    serde_json::from_str::<ProviderError>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string())
}

#[async_trait]
impl IdentityProvider for IdentityClient {
    async fn sign_up(&self, account: &NewAccount) -> Result<AuthSession, IdentityError> {
        let request = SignUpRequest {
            email: &account.email,
            password: &account.password,
            display_name: account.display_name.as_deref(),
            return_secure_token: true,
        };
        let response: TokenResponse = self.post("signUp", &request).await?;
        let mut session = response.into_session();
        if session.user.display_name.is_none() {
            session.user.display_name = account.display_name.clone();
        }
        Ok(session)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, IdentityError> {
        let request = SignInRequest {
            email,
            password,
            return_secure_token: true,
        };
        let response: TokenResponse = self.post("signInWithPassword", &request).await?;
        Ok(response.into_session())
    }

    async fn verify_token(&self, id_token: &str) -> Result<IdentityUser, IdentityError> {
        let response: LookupResponse = self.post("lookup", &LookupRequest { id_token }).await?;
        response
            .users
            .into_iter()
            .next()
            .map(LookupUser::into_user)
            .ok_or(IdentityError::MissingUser)
    }
}
