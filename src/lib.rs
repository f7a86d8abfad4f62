pub mod auth;
pub mod config;
pub mod context;
pub mod database;
pub mod dates;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod services;
pub mod state;
