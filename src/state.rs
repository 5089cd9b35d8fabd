use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AuthConfig;

#[derive(Clone)]
pub struct AppState {
    pub orm: DatabaseConnection,
    pub auth: Arc<AuthConfig>,
}

impl AppState {
    pub fn new(orm: DatabaseConnection, auth: AuthConfig) -> Self {
        Self {
            orm,
            auth: Arc::new(auth),
        }
    }
}
