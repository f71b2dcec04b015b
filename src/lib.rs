pub mod clock;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod prompts;
pub mod rate_limit;
pub mod router;
pub mod state;
pub mod store;
pub mod validation;
