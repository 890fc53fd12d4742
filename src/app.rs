// src/app.rs
use std::sync::Arc;

use crate::auth::{AuthProvider, SessionRegistry};
use crate::backend::RowSource;
use crate::config::AppConfig;
use crate::repository::ConstructionRepository;

/// Everything a request handler needs, built once in `main`.
pub struct App {
    pub config: AppConfig,
    pub repo: ConstructionRepository,
    pub auth: Arc<dyn AuthProvider>,
    pub sessions: SessionRegistry,
}

impl App {
    pub fn new(config: AppConfig, source: Arc<dyn RowSource>, auth: Arc<dyn AuthProvider>) -> Self {
        Self {
            config,
            repo: ConstructionRepository::new(source),
            auth,
            sessions: SessionRegistry::new(),
        }
    }

    /// Absolute URL for links the auth service emails out.
    pub fn public_url(&self, path: &str) -> String {
        format!("{}{}", self.config.public_base_url.trim_end_matches('/'), path)
    }
}
