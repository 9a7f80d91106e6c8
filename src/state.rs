//! Estado compartido de la aplicación

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::services::email_service::Mailer;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig, mailer: Arc<dyn Mailer>) -> Self {
        Self { pool, config, mailer }
    }
}
