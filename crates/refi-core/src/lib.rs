pub mod annuity;
pub mod error;
pub mod refinance;
pub mod types;

pub use error::RefiError;
pub use types::*;

/// Standard result type for all refi operations
pub type RefiResult<T> = Result<T, RefiError>;
