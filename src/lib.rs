pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod pagination;
pub mod query;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod validation;
