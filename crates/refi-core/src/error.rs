use thiserror::Error;

#[derive(Debug, Error)]
pub enum RefiError {
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Non-amortizing loan: {0}")]
    NonAmortizing(String),

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for RefiError {
    fn from(e: serde_json::Error) -> Self {
        RefiError::SerializationError(e.to_string())
    }
}
