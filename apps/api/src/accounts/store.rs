//! Profile document store. `AppState` holds an `Arc<dyn ProfileStore>`;
//! production uses `PgProfileStore`.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::user::UserProfileRow;

#[derive(Debug, Clone)]
pub struct NewProfile {
    pub uid: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub user_type: String,
}

#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub uid: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn create_profile(&self, profile: &NewProfile) -> Result<UserProfileRow, sqlx::Error>;

    async fn get_profile(&self, uid: &str) -> Result<Option<UserProfileRow>, sqlx::Error>;

    /// Writes the editable fields and marks the profile complete, creating the
    /// document if signup never managed to.
    async fn upsert_profile(&self, update: &ProfileUpdate) -> Result<UserProfileRow, sqlx::Error>;
}

#[derive(Clone)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn create_profile(&self, profile: &NewProfile) -> Result<UserProfileRow, sqlx::Error> {
        sqlx::query_as::<_, UserProfileRow>(
            r#"
            INSERT INTO users (uid, email, first_name, last_name, phone, user_type)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&profile.uid)
        .bind(&profile.email)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.phone)
        .bind(&profile.user_type)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_profile(&self, uid: &str) -> Result<Option<UserProfileRow>, sqlx::Error> {
        sqlx::query_as::<_, UserProfileRow>("SELECT * FROM users WHERE uid = $1")
            .bind(uid)
            .fetch_optional(&self.pool)
            .await
    }

    async fn upsert_profile(&self, update: &ProfileUpdate) -> Result<UserProfileRow, sqlx::Error> {
        sqlx::query_as::<_, UserProfileRow>(
            r#"
            INSERT INTO users (uid, email, first_name, last_name, phone, profile_complete)
            VALUES ($1, $2, $3, $4, $5, TRUE)
            ON CONFLICT (uid) DO UPDATE SET
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                phone = EXCLUDED.phone,
                profile_complete = TRUE,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(&update.uid)
        .bind(&update.email)
        .bind(&update.first_name)
        .bind(&update.last_name)
        .bind(&update.phone)
        .fetch_one(&self.pool)
        .await
    }
}
