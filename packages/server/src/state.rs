use std::sync::Arc;

use common::storage::ObjectStore;
use genai::GenerativeClient;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;

/// Shared per-process state. The store and provider client are stateless
/// with respect to individual requests and safe to share across tasks.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub store: Arc<dyn ObjectStore>,
    pub genai: Arc<GenerativeClient>,
    pub config: AppConfig,
}
