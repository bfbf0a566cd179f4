//! Salary Prediction API
//!
//! HTTP surface over a single pre-trained regression model:
//! - `GET /` returns a welcome message
//! - `POST /predict` validates four bounded integers and returns the model's
//!   salary estimate
//!
//! The model is loaded before the listener is bound; a missing or unusable
//! artifact stops the process before any request is accepted.

pub mod cli;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use cli::Cli;
pub use config::ServiceConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
