use std::sync::Arc;

use axum::extract::FromRef;
use directory_core::DirectoryService;
use sqlx::PgPool;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<DirectoryService>,
    /// Pinged by the readiness probe; absent for in-memory deployments
    pub db_pool: Option<PgPool>,
}

impl AppState {
    pub fn new(directory: Arc<DirectoryService>, db_pool: Option<PgPool>) -> Self {
        Self { directory, db_pool }
    }
}

impl FromRef<AppState> for Arc<DirectoryService> {
    fn from_ref(state: &AppState) -> Self {
        state.directory.clone()
    }
}
