use std::sync::Arc;

use crate::config::cors::CorsConfig;
use crate::config::database::init_db_pool;
use crate::config::jwt::JwtConfig;
use crate::modules::audit::AuditLogger;
use crate::store::{DocumentStore, PgStore};

/// Shared application state.
///
/// The store handle is constructed once and passed explicitly; there is no
/// process-global client. Requests share nothing mutable beyond the audit
/// logger's bounded queue.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub audit: AuditLogger,
}

impl AppState {
    /// Assembles state around an explicit store handle. Tests use this with
    /// [`crate::store::MemoryStore`]; production goes through
    /// [`init_app_state`]. Must be called within a tokio runtime (the audit
    /// worker is spawned here).
    pub fn with_store(
        store: Arc<dyn DocumentStore>,
        jwt_config: JwtConfig,
        cors_config: CorsConfig,
    ) -> Self {
        let audit = AuditLogger::new(store.clone());
        Self {
            store,
            jwt_config,
            cors_config,
            audit,
        }
    }
}

pub async fn init_app_state() -> AppState {
    let pool = init_db_pool().await;
    AppState::with_store(
        Arc::new(PgStore::new(pool)),
        JwtConfig::from_env(),
        CorsConfig::from_env(),
    )
}
