//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`InvalidInput`] thrown when request data is malformed or violates a
//!   split policy.
//! - [`NotFound`] thrown when a participant, group or expense is missing.
//! - [`PreconditionFailed`] thrown when a settlement check blocks a
//!   destructive operation.
//! - [`PermissionDenied`] thrown when the requester is not the group
//!   administrator.
//!
//!  [`InvalidInput`]: EngineError::InvalidInput
//!  [`NotFound`]: EngineError::NotFound
//!  [`PreconditionFailed`]: EngineError::PreconditionFailed
//!  [`PermissionDenied`]: EngineError::PermissionDenied
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("\"{0}\" not found!")]
    NotFound(String),
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
}
