use axum::http::StatusCode;
use thiserror::Error;

/// Main error type for the prediction service
#[derive(Error, Debug)]
pub enum HealError {
    // Artifact errors (scaler / classifier files)
    #[error("Artifact error: {0}")]
    Artifact(String),

    // Request input errors
    #[error("Missing features in the request")]
    MissingFeatures,

    #[error("could not convert string to float: '{0}'")]
    InvalidNumber(String),

    // Computation errors
    #[error("Inference error: {0}")]
    Inference(String),

    // Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl HealError {
    /// HTTP status reported for this failure.
    ///
    /// Only an absent required field is a client error; a value that fails to
    /// parse is reported alongside computation faults as a server error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            HealError::MissingFeatures => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short classification used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            HealError::MissingFeatures | HealError::InvalidNumber(_) => "input",
            HealError::Inference(_) | HealError::Validation(_) => "computation",
            HealError::Artifact(_) => "startup",
            HealError::Io(_) | HealError::Internal(_) => "internal",
        }
    }
}

/// Result type alias for HealError
pub type Result<T> = std::result::Result<T, HealError>;
