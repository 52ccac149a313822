//! HTTP API: configuration, routing, authentication middleware and
//! request/response mapping.

pub mod app;
pub mod authz;
pub mod config;
pub mod context;
pub mod middleware;

pub use config::AppConfig;
