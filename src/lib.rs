pub mod config;
pub mod db;
pub mod domain;
pub mod dto;
pub mod entities;
pub mod error;
pub mod handlers;
pub mod notify;
pub mod patch;
pub mod repository;
pub mod routes;
pub mod validation;

use sea_orm::DatabaseConnection;

pub use config::Config;
pub use error::{AppError, AppResult};

use crate::notify::Mailer;
use crate::repository::MemoryStore;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub memory: MemoryStore,
    pub mailer: Mailer,
}
