//! Salary Core
//!
//! Core types and validation shared across the salary prediction service.
//!
//! This crate provides:
//! - The validated prediction request and its fixed-order feature vector
//! - Field-level validation errors for rejected request bodies
//! - Error types and result handling

pub mod error;
pub mod types;
pub mod validation;

pub use error::{Error, Result};
pub use types::{
    FeatureVector, Field, PredictionRequest, PredictionResponse, WelcomeMessage, WELCOME_MESSAGE,
};
pub use validation::{FieldError, FieldErrorKind, ValidationErrors};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{FeatureVector, PredictionRequest, PredictionResponse};
    pub use crate::validation::{FieldError, ValidationErrors};
}
