use harvest_db::Database;

use crate::settings::ServerConfig;

/// Shared application state, available to all route handlers via `State<Arc<AppState>>`.
pub struct AppState {
    pub db: Database,
    pub settings: ServerConfig,
}
