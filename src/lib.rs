pub mod api;
pub mod config;
pub mod email;
pub mod error;
pub mod models;
pub mod observability;
pub mod services;
pub mod state;
pub mod store;
