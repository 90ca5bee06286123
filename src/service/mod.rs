//! Web service for pharmacogenomic variant predictions
//!
//! Serves the variant catalog and molecular-effect predictions over HTTP.
//! Predictions come either from the AlphaGenome model (when the
//! `alphagenome` feature is built and an API key is configured) or from a
//! fixed table of mock figures.

pub mod config;
pub mod handlers;
pub mod predictors;
pub mod rate_limit;
pub mod server;
pub mod types;

pub use config::ServiceConfig;
pub use predictors::{PredictionClient, VariantPredictor};
pub use rate_limit::SlidingWindowRateLimiter;
pub use server::{build_router, create_app, AppState};
pub use types::*;
