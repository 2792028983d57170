pub mod app;
pub mod config;
pub mod domain;
pub mod http;
pub mod infra;

use axum::http::HeaderName;

use crate::infra::db::Db;

#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub identity_header: HeaderName,
}
