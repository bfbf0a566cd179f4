//! Error types for the salary prediction service

/// Result type alias using the service's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for model loading and inference
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration errors (missing artifact, bad config file)
    #[error("configuration error: {0}")]
    Config(String),

    /// The artifact exists but does not describe a usable predictor
    #[error("model error: {0}")]
    Model(String),

    /// Failure while running the predictor on a feature vector
    #[error("inference error: {0}")]
    Inference(String),

    /// Filesystem errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new model error
    pub fn model(msg: impl Into<String>) -> Self {
        Self::Model(msg.into())
    }

    /// Create a new inference error
    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    /// Whether this error should abort startup rather than fail a request
    pub fn is_startup_fatal(&self) -> bool {
        !matches!(self, Self::Inference(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("Model file not found: \"model.json\"");
        assert_eq!(
            err.to_string(),
            "configuration error: Model file not found: \"model.json\""
        );

        let err = Error::inference("prediction is not finite");
        assert_eq!(err.to_string(), "inference error: prediction is not finite");
    }

    #[test]
    fn test_startup_fatal() {
        assert!(Error::config("x").is_startup_fatal());
        assert!(Error::model("x").is_startup_fatal());
        assert!(!Error::inference("x").is_startup_fatal());
    }
}
