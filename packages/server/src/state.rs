use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::quiz::{Catalog, Feedback, Grader, Leaderboard, Progression, Registry};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub feedback: Arc<Feedback>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: AppConfig, feedback: Feedback) -> Self {
        Self {
            db,
            config,
            feedback: Arc::new(feedback),
        }
    }

    pub fn registry(&self) -> Registry<'_, DatabaseConnection> {
        Registry::new(&self.db, self.config.database.read_retry)
    }

    pub fn progression(&self) -> Progression<'_, DatabaseConnection> {
        Progression::new(&self.db, self.config.database.read_retry)
    }

    pub fn grader(&self) -> Grader<'_, DatabaseConnection> {
        Grader::new(&self.db, self.config.database.read_retry, &self.feedback)
    }

    pub fn leaderboard(&self) -> Leaderboard<'_, DatabaseConnection> {
        Leaderboard::new(&self.db, self.config.database.read_retry)
    }

    pub fn catalog(&self) -> Catalog<'_, DatabaseConnection> {
        Catalog::new(&self.db, self.config.database.read_retry)
    }
}
