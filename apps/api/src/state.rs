use std::sync::Arc;

use sqlx::PgPool;

use crate::accounts::store::ProfileStore;
use crate::ats::extract::TextExtractor;
use crate::config::Config;
use crate::identity_client::IdentityProvider;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Every external collaborator is an explicit handle built in `main`.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Identity platform. Default: `IdentityClient` (REST).
    pub identity: Arc<dyn IdentityProvider>,
    /// Profile documents. Default: `PgProfileStore`.
    pub profiles: Arc<dyn ProfileStore>,
    /// Resume text extraction. Default: `DocumentExtractor`.
    pub extractor: Arc<dyn TextExtractor>,
}
