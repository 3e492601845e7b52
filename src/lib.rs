// Library exports for the API binary, tools and tests
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Arc;

use config::Config;
use db::Repositories;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repos: Repositories,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(repos: Repositories, config: Config) -> Self {
        Self {
            repos,
            config: Arc::new(config),
        }
    }
}
