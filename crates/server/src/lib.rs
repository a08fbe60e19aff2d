//! folio: a portfolio content server.
//!
//! A JSON API for the portfolio documents (profile, projects, skills,
//! achievements, engineering approaches, contact messages), a server-rendered
//! landing page and a small admin dashboard, all on one SQLite file.

pub mod app_state;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod html;
pub mod logging;
pub mod models;
pub mod notify;
pub mod rate_limit;
pub mod render;
pub mod schema;
pub mod secrets;

pub use app_state::AppState;
pub use config::{ConfigError, ServerConfig};
pub use handlers::router;
