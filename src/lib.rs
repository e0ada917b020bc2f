pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod policy;
pub mod routes;
pub mod views;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: DatabaseConnection,
}
